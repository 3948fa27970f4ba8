use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocRagError {
    /// Missing credential, bad directory, invalid settings
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingestion or indexing failure, wrapping the lower-layer cause
    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("System not initialized. Run process first.")]
    NotInitialized,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transport, auth or rate-limit failure from the hosted model/embedding API
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Vector index unavailable: no index has been built")]
    IndexUnavailable,

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocRagError>;

/// Stable error kinds surfaced at the HTTP and CLI boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Processing,
    NotInitialized,
    InvalidArgument,
    Upstream,
    IndexUnavailable,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Configuration => "configuration_error",
            Self::Processing => "processing_error",
            Self::NotInitialized => "not_initialized",
            Self::InvalidArgument => "invalid_argument",
            Self::Upstream => "upstream_error",
            Self::IndexUnavailable => "index_unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl DocRagError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigError(_) | Self::TomlParsing(_) => ErrorKind::Configuration,
            Self::ProcessingError(_) | Self::Pdf(_) | Self::Serialization(_) | Self::Io(_) => {
                ErrorKind::Processing
            }
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UpstreamError(_) => ErrorKind::Upstream,
            Self::IndexUnavailable => ErrorKind::IndexUnavailable,
        }
    }

    /// Wrap any failure raised below the session as a processing failure.
    /// Errors that are already processing errors pass through unchanged.
    #[must_use]
    pub fn into_processing(self) -> Self {
        match self {
            Self::ProcessingError(_) => self,
            other => Self::ProcessingError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for DocRagError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamError(err.to_string())
    }
}

impl From<walkdir::Error> for DocRagError {
    fn from(err: walkdir::Error) -> Self {
        Self::ConfigError(format!("Failed to scan directory: {err}"))
    }
}
