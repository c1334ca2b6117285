//! Declared media types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Media type declared by the caller for an uploaded document.
///
/// The tag is trusted as-is; content is never sniffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Pdf,
    PlainText,
    OctetStream,
    Docx,
    Other(String),
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_lowercase().as_str() {
            PDF_MIME => MediaType::Pdf,
            TEXT_MIME => MediaType::PlainText,
            OCTET_STREAM_MIME => MediaType::OctetStream,
            DOCX_MIME => MediaType::Docx,
            _ => MediaType::Other(mime.trim().to_string()),
        }
    }

    /// Tag a file by extension, the way a browser upload would.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => MediaType::Pdf,
            "txt" | "text" | "md" | "markdown" => MediaType::PlainText,
            "docx" => MediaType::Docx,
            "doc" => MediaType::Other("application/msword".to_string()),
            "png" => MediaType::Other("image/png".to_string()),
            "jpg" | "jpeg" => MediaType::Other("image/jpeg".to_string()),
            "gif" => MediaType::Other("image/gif".to_string()),
            "webp" => MediaType::Other("image/webp".to_string()),
            _ => MediaType::OctetStream,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(MediaType::OctetStream)
    }

    pub fn as_mime(&self) -> &str {
        match self {
            MediaType::Pdf => PDF_MIME,
            MediaType::PlainText => TEXT_MIME,
            MediaType::OctetStream => OCTET_STREAM_MIME,
            MediaType::Docx => DOCX_MIME,
            MediaType::Other(mime) => mime,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}
