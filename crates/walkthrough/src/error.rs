//! Error types for the walkthrough
//!
//! `ExampleError` is what an example unit may fail with; the runner catches
//! it at the unit boundary. `WalkthroughError` is for the binary's own setup.

use dom::DomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExampleError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum WalkthroughError {
    #[error("Failed to load page: {0}")]
    Dom(#[from] DomError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WalkthroughError>;
