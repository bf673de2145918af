//! Error types.
//!
//! One enum per failure family, folded into [`Error`]. Configuration problems
//! surface before any network call; read and decrypt failures are fatal for
//! the `password()` call that hit them and are never retried here.

use thiserror::Error;

/// Boxed source error from a backend client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Invalid or unusable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("invalid proxy port '{value}': {reason}")]
    InvalidProxyPort { value: String, reason: String },

    #[error("invalid proxy '{0}'")]
    InvalidProxy(String),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("unsupported record schema {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("credential not found: {0}")]
    NotFound(String),

    #[error("credential already exists: {0} (use --force to replace)")]
    Duplicate(String),

    #[error("no credential store at {0}")]
    NotInitialized(String),

    #[error("failed to read credential store: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse credential store: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize credential store: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("{0}")]
    BackendUnavailable(String),
}

/// Failure to get or read an object from the bucket.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to get s3://{bucket}/{key}: {source}")]
    Request {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("failed reading s3://{bucket}/{key}: {source}")]
    Body {
        bucket: String,
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of the KMS decrypt call.
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("KMS decrypt failed: {0}")]
    Request(#[source] BoxError),

    #[error("KMS decrypt returned no plaintext")]
    MissingPlaintext,
}

pub type Result<T> = std::result::Result<T, Error>;
