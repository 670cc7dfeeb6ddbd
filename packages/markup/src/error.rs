//! Error types for the markup crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Invalid document state: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Editing surface is not active for {0}")]
    SurfaceInactive(String),
}
