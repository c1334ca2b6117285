//! Error handling for the resume matcher application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0} not found in environment variables. Please set it in your .env file.")]
    MissingCredential(String),

    #[error("Model invocation error: {0}")]
    ModelInvocation(String),

    #[error("Model service returned HTTP {status}: {body}")]
    ModelStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

/// Reasons a document could not be turned into plain text.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Error: Could not extract text from PDF. The PDF might be scanned or image-based.")]
    ScannedPdf,

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Error extracting text: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, MatcherError>;

impl From<askama::Error> for MatcherError {
    fn from(err: askama::Error) -> Self {
        MatcherError::OutputFormatting(err.to_string())
    }
}
