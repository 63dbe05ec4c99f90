//! Error taxonomy for a page generation run.
//!
//! Every failure is fatal: the pipeline propagates an [`AppError`] with `?`
//! and the binary turns it into a non-zero exit status. Nothing here is
//! retried.

use std::path::PathBuf;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required setting (the API credential) is missing or blank.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("request to {endpoint} failed with HTTP {status}")]
    Http { endpoint: String, status: u16 },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be turned into records.
    #[error("could not parse {source_name} response: {reason}")]
    Parse {
        source_name: &'static str,
        reason: String,
    },

    /// The output directory or file could not be written.
    #[error("could not write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// `true` for failures talking to one of the two sources.
    pub fn is_request_error(&self) -> bool {
        matches!(self, AppError::Http { .. } | AppError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_names_endpoint_and_status() {
        let err = AppError::Http {
            endpoint: "https://news.google.com/rss".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "request to https://news.google.com/rss failed with HTTP 503"
        );
        assert!(err.is_request_error());
    }

    #[test]
    fn test_output_error_displays_path() {
        let err = AppError::Output {
            path: PathBuf::from("site/index.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("could not write site/index.html"));
        assert!(!err.is_request_error());
    }

    #[test]
    fn test_configuration_error_is_not_a_request_error() {
        let err = AppError::Configuration("YOUTUBE_API_KEY is not set".to_string());
        assert!(!err.is_request_error());
        assert!(err.to_string().contains("YOUTUBE_API_KEY"));
    }
}
