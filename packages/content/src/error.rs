//! Error types for content scopes

use resonance_common::CommonError;
use resonance_markup::MarkupError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,

    #[error("Empty segment in path '{0}'")]
    EmptySegment(String),

    #[error("Malformed list index in path '{0}'")]
    MalformedIndex(String),

    #[error("List segment without attribute in path '{0}'")]
    DanglingListSegment(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListError {
    #[error("Index {index} out of range for list '{attribute}' of length {len}")]
    IndexOutOfRange {
        attribute: String,
        index: usize,
        len: usize,
    },

    #[error("List '{0}' has no items")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Duplicate attribute descriptor '{0}'")]
    DuplicateDescriptor(String),

    #[error("Unknown attribute '{key}' in scope '{scope}'")]
    UnknownAttribute { scope: String, key: String },

    #[error("Unknown list '{attribute}' in scope '{scope}'")]
    UnknownList { scope: String, attribute: String },

    #[error("Invalid value for '{attribute}': {reason}")]
    InvalidValue { attribute: String, reason: String },

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("List error: {0}")]
    List(#[from] ListError),

    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ContentError {
    pub fn invalid(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        ContentError::InvalidValue {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
