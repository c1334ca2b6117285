//! One-shot match analysis: render, complete, parse

use crate::error::Result;
use crate::llm::client::CompletionModel;
use crate::llm::prompts::PromptTemplates;
use crate::processing::document::{AnalysisRequest, AnalysisResult};
use crate::processing::response_parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Parsed reply plus what produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAnalysis {
    pub result: AnalysisResult,
    pub model_used: String,
    pub processing_time_ms: u64,
}

pub struct MatchAnalyzer<M> {
    model: M,
    prompt_templates: PromptTemplates,
}

impl<M: CompletionModel> MatchAnalyzer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            prompt_templates: PromptTemplates::default(),
        }
    }

    pub fn with_templates(mut self, prompt_templates: PromptTemplates) -> Self {
        self.prompt_templates = prompt_templates;
        self
    }

    /// Invoke the model exactly once for `request`.
    ///
    /// Only the model call can fail; parsing degrades field by field.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ModelAnalysis> {
        let start_time = Instant::now();
        let prompt = self.prompt_templates.render(request);

        let raw_reply = self.model.complete(&prompt).await?;
        let result = response_parser::parse_response(&raw_reply);

        if result.score.is_none() {
            warn!("No match score found in model reply");
        }
        for (label, section) in [
            (response_parser::KEY_STRENGTHS, &result.strengths),
            (response_parser::AREAS_FOR_IMPROVEMENT, &result.improvements),
            (response_parser::KEYWORDS_MISSING, &result.missing_keywords),
            (response_parser::SUMMARY, &result.summary),
        ] {
            if !AnalysisResult::is_extracted(section) {
                warn!("Could not extract '{}' from model reply", label);
            }
        }

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis finished in {}ms", processing_time_ms);

        Ok(ModelAnalysis {
            result,
            model_used: self.model.model_name().to_string(),
            processing_time_ms,
        })
    }
}
