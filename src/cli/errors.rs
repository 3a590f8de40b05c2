use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No input images: pass --input or --input-dir")]
    NoInputs,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Library(#[from] photomark::Error),

    #[error("Could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
