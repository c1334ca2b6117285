//! Request and result structures for a single analysis

use crate::error::{MatcherError, Result};
use crate::processing::response_parser::EXTRACTION_FAILED;
use serde::{Deserialize, Serialize};

/// One resume/job pair submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    resume_text: String,
    job_description: String,
}

impl AnalysisRequest {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Result<Self> {
        let resume_text = resume_text.into();
        let job_description = job_description.into();

        if resume_text.trim().is_empty() || job_description.trim().is_empty() {
            return Err(MatcherError::InvalidInput(
                "Please provide both a resume and a job description to start the analysis."
                    .to_string(),
            ));
        }

        Ok(Self {
            resume_text,
            job_description,
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

/// Structured fields recovered from the model's reply.
///
/// Every field is derived from `raw_text`; sections that could not be located
/// hold [`EXTRACTION_FAILED`] and `score` is `None` when no score was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: Option<u8>,
    pub strengths: String,
    pub improvements: String,
    pub missing_keywords: String,
    pub summary: String,
    pub raw_text: String,
}

impl AnalysisResult {
    /// False when `section` is the extraction-failure sentinel.
    pub fn is_extracted(section: &str) -> bool {
        section != EXTRACTION_FAILED
    }

    pub fn rating(&self) -> Option<MatchRating> {
        self.score.map(MatchRating::from_score)
    }

    pub fn score_label(&self) -> String {
        match self.score {
            Some(score) => format!("{}/100", score),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchRating {
    Excellent,
    Good,
    NeedsWork,
}

impl MatchRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => MatchRating::Excellent,
            60..=79 => MatchRating::Good,
            _ => MatchRating::NeedsWork,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MatchRating::Excellent => "Excellent match!",
            MatchRating::Good => "Good match with room for improvement",
            MatchRating::NeedsWork => "Significant improvements needed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_requires_both_inputs() {
        assert!(AnalysisRequest::new("Rust dev", "  \n").is_err());
        assert!(AnalysisRequest::new("", "Seeking Rust dev").is_err());

        let request = AnalysisRequest::new("Rust dev", "Seeking Rust dev").unwrap();
        assert_eq!(request.resume_text(), "Rust dev");
        assert_eq!(request.job_description(), "Seeking Rust dev");
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(MatchRating::from_score(100), MatchRating::Excellent);
        assert_eq!(MatchRating::from_score(80), MatchRating::Excellent);
        assert_eq!(MatchRating::from_score(79), MatchRating::Good);
        assert_eq!(MatchRating::from_score(60), MatchRating::Good);
        assert_eq!(MatchRating::from_score(59), MatchRating::NeedsWork);
        assert_eq!(MatchRating::from_score(0), MatchRating::NeedsWork);
    }

    #[test]
    fn test_sentinel_is_not_extracted() {
        assert!(!AnalysisResult::is_extracted(EXTRACTION_FAILED));
        assert!(AnalysisResult::is_extracted(""));
        assert!(AnalysisResult::is_extracted("• Go experience"));
    }
}
