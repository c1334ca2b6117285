//! Analysis request/result types and model reply parsing

pub mod document;
pub mod response_parser;

pub use document::{AnalysisRequest, AnalysisResult, MatchRating};
