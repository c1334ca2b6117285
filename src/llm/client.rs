//! Completion model seam and the Gemini REST client behind it

use crate::config::{ApiKey, ModelConfig};
use crate::error::{MatcherError, Result};
use crate::llm::prompts::RenderedPrompt;
use backon::{ExponentialBuilder, Retryable};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// A text-completion service answering one rendered prompt with one reply.
pub trait CompletionModel {
    fn complete(&self, prompt: &RenderedPrompt) -> impl Future<Output = Result<String>> + Send;

    fn model_name(&self) -> &str;
}

/// Google Gemini `generateContent` client.
///
/// Transport failures, 429 and 5xx responses are retried with exponential
/// backoff up to `max_retries` times; each attempt is bounded by the timeout.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: ApiKey,
    settings: ModelConfig,
}

impl GeminiClient {
    pub fn new(settings: &ModelConfig, api_key: ApiKey) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            settings: settings.clone(),
        })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.name
        )
    }

    async fn send_once(&self, url: &str, body: &GenerateContentRequest<'_>) -> Result<String> {
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(MatcherError::ModelStatus {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.into_text()
    }
}

impl CompletionModel for GeminiClient {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String> {
        let url = self.endpoint_url();
        let body = GenerateContentRequest::new(prompt, &self.settings);
        info!(
            "Calling {} (temperature {}, max output tokens {}, max retries {})",
            self.settings.name,
            self.settings.temperature,
            self.settings.max_output_tokens,
            self.settings.max_retries
        );
        debug!("Prompt length: {} characters", prompt.human.content.len());

        let url = url.as_str();
        let body = &body;
        let text = (|| async move { self.send_once(url, body).await })
            .retry(
                ExponentialBuilder::default().with_max_times(self.settings.max_retries as usize),
            )
            .when(is_retryable)
            .notify(|err: &MatcherError, delay: Duration| {
                warn!("Model request failed ({}), retrying in {:?}", err, delay);
            })
            .await?;

        debug!("Reply length: {} characters", text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.settings.name
    }
}

fn is_retryable(err: &MatcherError) -> bool {
    match err {
        MatcherError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        MatcherError::ModelStatus { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a RenderedPrompt, settings: &ModelConfig) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &prompt.system.content,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &prompt.human.content,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(MatcherError::ModelInvocation(format!(
                "prompt was blocked by the model service ({})",
                reason
            )));
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            MatcherError::ModelInvocation("model service returned no candidates".to_string())
        })?;

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(MatcherError::ModelInvocation(format!(
                "model returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
