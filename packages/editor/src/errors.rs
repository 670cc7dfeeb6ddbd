//! Error types for the editor

use resonance_common::CommonError;
use resonance_content::{ContentError, EditMode, PathError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot {operation} while {mode:?}")]
    Refused {
        operation: &'static str,
        mode: EditMode,
    },

    #[error("Nothing to publish")]
    NothingToPublish,

    #[error("A publish is already in flight")]
    AlreadyPublishing,

    #[error("Unknown region '{0}'")]
    UnknownRegion(String),

    #[error("Path '{0}' does not address a field")]
    InvalidTarget(String),

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No acknowledgment after {attempts} attempt(s)")]
    Unacknowledged { attempts: u32 },

    #[error("Acknowledgment channel closed")]
    ChannelClosed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] CommonError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;
