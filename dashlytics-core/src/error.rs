//! Error types shared across the pipeline

use std::path::PathBuf;

/// Why a fetch did not produce records.
///
/// The variants are kept for diagnostics only; controllers and the UI just
/// see a failed outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never reached the server or no response came back.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },
    /// The body was not a JSON array of well-formed records.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request URL could not be built from the base URL and endpoint.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Taxonomy name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            // a malformed URL never reaches the wire
            FetchError::Network(_) | FetchError::InvalidUrl(_) => "NetworkError",
            FetchError::Http { .. } => "HttpError",
            FetchError::Decode(_) => "DecodeError",
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Raised by a notification sink that could not render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("notification sink failed: {0}")]
pub struct SinkError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        assert_eq!(FetchError::Network("refused".into()).kind(), "NetworkError");
        assert_eq!(FetchError::InvalidUrl("bad".into()).kind(), "NetworkError");
        assert_eq!(FetchError::Http { status: 500 }.kind(), "HttpError");
        assert_eq!(FetchError::Decode("eof".into()).kind(), "DecodeError");
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Http { status: 503 }.to_string(), "HTTP error: status 503");
    }
}
