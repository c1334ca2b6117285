//! Input processing module
//! Handles declared media types, text extraction, and input management

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::MediaType;
pub use manager::{InputManager, LoadedDocument};
