//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, codec, and config errors, and provides semantic variants
//! for argument validation and per-image processing failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("Encode error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    pub fn resize<E: std::fmt::Display>(e: E) -> Self {
        Error::Resize(e.to_string())
    }
}
