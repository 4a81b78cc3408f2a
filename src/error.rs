//! Error types for fleetctl
//!
//! Library code returns `crate::error::Result<T>` (`FleetctlError`).
//! The CLI entry point maps errors to exit codes in `src/exit_codes.rs`
//! instead of letting AWS failures propagate as unhandled panics.
//!
//! AWS SDK errors are complex generics, so they are flattened to the
//! `Aws`/`Ses` string variants at the call site, keeping the service
//! error message (which is what the operator needs).

use thiserror::Error;

/// Main error type for fleetctl
#[derive(Error, Debug)]
pub enum FleetctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("AWS EC2 error: {0}")]
    Aws(String),

    #[error("SES error: {0}")]
    Ses(String),

    #[error("Resource not found: {resource_type} - {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FleetctlError>;
