use thiserror::Error;

/// Loading errors shared by the Resonance crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CommonResult<T> = Result<T, CommonError>;
