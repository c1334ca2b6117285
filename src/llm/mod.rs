//! LLM integration module

pub mod analyzer;
pub mod client;
pub mod prompts;

pub use analyzer::{MatchAnalyzer, ModelAnalysis};
pub use client::{CompletionModel, GeminiClient};
