//! Error types for hh-analysis

use hh_core::HhError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid numeric input or mismatched arrays
    #[error(transparent)]
    Core(#[from] HhError),

    /// Config file could not be parsed
    #[error("config error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
