//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("response too large: {size} bytes exceeds limit of {limit} bytes")]
    ResponseTooLarge { size: u64, limit: u64 },

    #[error("rate limited: retry after {seconds} seconds")]
    RateLimited { seconds: u64 },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) => {
                Some("Check your network connection and the registry base URL.")
            }
            Self::RateLimited { .. } => Some("Wait before retrying or configure a registry token."),
            Self::HttpError { status, .. } if *status == 401 || *status == 403 => {
                Some("Check the registry token in your configuration.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) | Self::RateLimited { .. } => true,
            Self::HttpError { status, .. } => *status >= 500,
            Self::DownloadFailed(_) => true,
            Self::InvalidUrl(_) | Self::ResponseTooLarge { .. } => false,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::DownloadFailed(_) => "network.download_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
            Self::ResponseTooLarge { .. } => "network.response_too_large",
            Self::RateLimited { .. } => "network.rate_limited",
        };
        Some(code)
    }
}
