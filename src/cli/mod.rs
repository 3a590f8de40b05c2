//! Command Line Interface (CLI) layer for photomark.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that gathers input files, builds
//! `ProcessingParams` and hands everything to `photomark::BatchProcessor`.
//!
//! If you are embedding photomark into another application, prefer using
//! the high-level `photomark::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
