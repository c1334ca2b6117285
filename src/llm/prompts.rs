//! Fixed two-message prompt for resume/job match analysis
//!
//! The human template spells out the exact reply layout that
//! [`crate::processing::response_parser`] expects; edit both together.

use crate::processing::document::AnalysisRequest;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    System,
    Human,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// System and human messages ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub system: ChatMessage,
    pub human: ChatMessage,
}

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub human: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: SYSTEM_TEMPLATE.to_string(),
            human: HUMAN_TEMPLATE.to_string(),
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(resume|job)\}").expect("placeholder pattern is valid"));

impl PromptTemplates {
    /// Substitute `{resume}` and `{job}` in a single pass, so placeholder-like
    /// text inside either document is left as written.
    pub fn render(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let human = PLACEHOLDER.replace_all(&self.human, |caps: &Captures| match &caps[1] {
            "resume" => request.resume_text().to_string(),
            _ => request.job_description().to_string(),
        });

        RenderedPrompt {
            system: ChatMessage {
                role: Role::System,
                content: self.system.clone(),
            },
            human: ChatMessage {
                role: Role::Human,
                content: human.into_owned(),
            },
        }
    }
}

const SYSTEM_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) AI and career coach with extensive HR knowledge.
Your task is to thoroughly analyze a resume against a job description and provide detailed feedback.
Be precise, honest, and actionable in your assessment.
Focus on keyword matching, experience alignment, skills gap analysis, and overall presentation.
"#;

const HUMAN_TEMPLATE: &str = r#"
Resume:
{resume}

Job Description:
{job}

Perform a comprehensive analysis of how well this resume matches the job description.

Return your analysis in this exact format:

Match Score: <score out of 100>

Key Strengths:
• <strength 1>
• <strength 2>
• <strength 3>
• <additional strengths as needed>

Areas for Improvement:
• <improvement 1>
• <improvement 2>
• <improvement 3>
• <additional improvements as needed>

Keywords Missing:
• <missing keyword 1>
• <missing keyword 2>
• <additional missing keywords as needed>

Summary:
<2-3 sentence conclusion with your overall assessment and most important next steps>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::response_parser::{
        AREAS_FOR_IMPROVEMENT, KEYWORDS_MISSING, KEY_STRENGTHS, MATCH_SCORE, SUMMARY,
    };

    fn request(resume: &str, job: &str) -> AnalysisRequest {
        AnalysisRequest::new(resume, job).unwrap()
    }

    #[test]
    fn test_render_embeds_documents_verbatim() {
        let prompt = PromptTemplates::default().render(&request(
            "Python, Go, 5 years backend",
            "Seeking Go engineer, 3+ years, cloud",
        ));

        assert_eq!(prompt.system.role, Role::System);
        assert_eq!(prompt.human.role, Role::Human);
        assert!(prompt
            .human
            .content
            .contains("Resume:\nPython, Go, 5 years backend\n\nJob Description:\nSeeking Go engineer, 3+ years, cloud\n"));
        assert!(!prompt.human.content.contains("{resume}"));
        assert!(!prompt.human.content.contains("{job}"));
    }

    #[test]
    fn test_placeholders_inside_documents_are_not_expanded() {
        let prompt = PromptTemplates::default().render(&request("I wrote {job} templating", "Role"));
        assert!(prompt.human.content.contains("I wrote {job} templating"));
    }

    #[test]
    fn test_template_requests_every_parsed_label() {
        let templates = PromptTemplates::default();
        for label in [MATCH_SCORE, KEY_STRENGTHS, AREAS_FOR_IMPROVEMENT, KEYWORDS_MISSING, SUMMARY] {
            assert!(
                templates.human.contains(&format!("\n{}:", label)),
                "missing label {}",
                label
            );
        }
        assert!(templates.system.contains("Applicant Tracking System"));
    }
}
