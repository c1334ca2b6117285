//! Report structures wrapping one analysis result

use crate::input::LoadedDocument;
use crate::llm::ModelAnalysis;
use crate::processing::document::{AnalysisResult, MatchRating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finished analysis plus the context it was produced in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub rating: Option<MatchRating>,
    pub next_steps: Vec<NextStep>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
    pub resume_file: String,
    pub resume_media_type: String,
    pub model_used: String,
    pub processing_time_ms: u64,
}

/// Generic follow-up advice shown after every analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub title: String,
    pub detail: String,
}

const NEXT_STEPS: [(&str, &str); 4] = [
    ("Update your resume", "with the missing keywords where applicable"),
    ("Quantify your achievements", "with numbers and metrics"),
    ("Tailor your resume", "specifically for this job"),
    ("Create a targeted cover letter", "that addresses the gaps"),
];

impl AnalysisReport {
    pub fn new(analysis: ModelAnalysis, resume: &LoadedDocument) -> Self {
        Self {
            rating: analysis.result.rating(),
            next_steps: NEXT_STEPS
                .iter()
                .map(|(title, detail)| NextStep {
                    title: title.to_string(),
                    detail: detail.to_string(),
                })
                .collect(),
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume.file_name.clone(),
                resume_media_type: resume.media_type.to_string(),
                model_used: analysis.model_used,
                processing_time_ms: analysis.processing_time_ms,
            },
            result: analysis.result,
        }
    }

    /// Section label paired with its extracted text, in reply order.
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("Key Strengths", self.result.strengths.as_str()),
            ("Areas for Improvement", self.result.improvements.as_str()),
            ("Keywords Missing", self.result.missing_keywords.as_str()),
            ("Summary", self.result.summary.as_str()),
        ]
    }
}

/// Rewrite `• ` bullets as Markdown list items.
pub fn markdown_bullets(section: &str) -> String {
    section.replace("• ", "* ")
}
