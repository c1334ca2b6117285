//! Input manager: reads documents from disk and routes them to extractors

use crate::error::{MatcherError, Result};
use crate::input::file_detector::MediaType;
use crate::input::text_extractor;
use log::info;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// A document read from disk, before and after extraction.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedDocument {
    pub file_name: String,
    pub media_type: MediaType,
    pub size_bytes: u64,
    pub text: String,
}

impl LoadedDocument {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

#[derive(Debug, Default)]
pub struct InputManager {
    declared_type: Option<MediaType>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the media type instead of deriving it from the file extension.
    pub fn with_declared_type(mut self, media_type: Option<MediaType>) -> Self {
        self.declared_type = media_type;
        self
    }

    pub async fn load_resume(&self, path: &Path) -> Result<LoadedDocument> {
        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let media_type = self
            .declared_type
            .clone()
            .unwrap_or_else(|| MediaType::from_path(path));

        let bytes = fs::read(path).await?;
        info!(
            "Extracting text from {} ({}, {} bytes)",
            path.display(),
            media_type,
            bytes.len()
        );

        let text = text_extractor::extract(&bytes, &media_type)?;

        Ok(LoadedDocument {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            media_type,
            size_bytes: bytes.len() as u64,
            text,
        })
    }

    /// Job descriptions are always plain text.
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        if path == Path::new("-") {
            info!("Reading job description from stdin");
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            return Ok(text);
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Reading job description: {}", path.display());
        Ok(fs::read_to_string(path).await?)
    }
}
