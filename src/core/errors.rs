/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for ring buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bounded ring buffer errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BufferError {
    #[error("Operation timed out after {elapsed_ms}ms (timeout: {timeout_ms}ms)")]
    #[diagnostic(
        code(buffer::timeout),
        help("The buffer stayed full (write) or empty (drain) for the whole timeout.")
    )]
    Timeout { elapsed_ms: u64, timeout_ms: u64 },

    #[error("Buffer closed")]
    #[diagnostic(
        code(buffer::closed),
        help("The buffer was closed for shutdown. No further writes are accepted.")
    )]
    Closed,

    #[error("Invalid buffer capacity: {0}")]
    #[diagnostic(code(buffer::invalid_capacity), help("Capacity must be at least 1."))]
    InvalidCapacity(usize),
}

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(config::invalid))]
    Invalid { field: &'static str, reason: String },

    #[error("Environment variable {var} has unusable value {value:?}")]
    #[diagnostic(
        code(config::env),
        help("Numeric overrides must be non-negative integers.")
    )]
    Env { var: &'static str, value: String },

    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    #[diagnostic(code(config::parse), help("Config files are JSON objects."))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Pipeline errors
#[derive(Error, Debug, Diagnostic)]
pub enum PipelineError {
    #[error("Failed to spawn thread {name}: {source}")]
    #[diagnostic(
        code(pipeline::spawn_failed),
        help("The OS refused to create a thread. Check process thread limits.")
    )]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread {0} panicked")]
    #[diagnostic(code(pipeline::worker_panicked))]
    WorkerPanicked(String),

    #[error("Buffer error: {0}")]
    #[diagnostic(transparent)]
    Buffer(#[from] BufferError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
