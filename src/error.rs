//! Error types for infractl
//!
//! Library code uses `crate::error::Result<T>` which returns `InfractlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling; the
//! conversion happens at the CLI boundary so error chains are preserved.
//!
//! AWS failures are split by service (`Aws`, `CloudWatch`, `CostExplorer`)
//! because the commands that hit them fail in different ways: EC2 mutations
//! should surface loudly, CloudWatch gaps usually mean "no datapoints" and
//! render as N/A upstream, and Cost Explorer is only reachable from
//! us-east-1. Retries are left to the SDK's own retry config (see
//! `aws_utils::load_sdk_config`); there is no retry layer here.

use thiserror::Error;

/// Main error type for infractl
#[derive(Error, Debug)]
pub enum InfractlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("AWS EC2 error: {0}")]
    Aws(String),

    #[error("CloudWatch error: {0}")]
    CloudWatch(String),

    #[error("Cost Explorer error: {0}")]
    CostExplorer(String),

    #[error("Not enough data to detect anomalies: need at least 2 daily cost points, got {points}")]
    InsufficientData { points: usize },

    #[error("Email delivery error: {0}")]
    Email(String),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
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
pub type Result<T> = std::result::Result<T, InfractlError>;
