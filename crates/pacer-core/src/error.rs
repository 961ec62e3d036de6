//! Error types for call admission and remote generation.
//!
//! The taxonomy separates transient remote faults, which the retry
//! controller absorbs up to its budget, from fatal classifications that
//! cross the component boundary immediately.

use crate::types::ResourceKind;
use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `PacerError`
pub type PacerResult<T> = Result<T, PacerError>;

/// Error type covering admission, retry, and remote call outcomes
#[derive(Debug, Error)]
pub enum PacerError {
    /// Remote service signalled that its own quota was exceeded
    #[error("Rate limited by remote service: {message}")]
    RateLimited {
        /// Duration suggested by the service before retrying, if reported
        retry_after: Option<Duration>,
        /// Error message
        message: String,
    },

    /// Transient server-side fault (5xx class)
    #[error("Server error: {message}")]
    Server {
        /// HTTP status code from the service, if applicable
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Request rejected by the service (malformed request, authentication
    /// failure, or any other 4xx besides 429). Never retried.
    #[error("Client error: {message}")]
    Client {
        /// HTTP status code from the service, if applicable
        status: Option<u16>,
        /// Error message
        message: String,
    },

    /// Transport-level failure before a classified response was received.
    /// Never retried.
    #[error("Network error: {message}")]
    Network {
        /// Error message
        message: String,
    },

    /// A bucket could not cover a debit that admission already checked.
    /// Indicates a bucket-accounting bug, not an operational condition.
    #[error("Insufficient {resource} budget: requested {requested}, available {available}")]
    InsufficientTokens {
        /// Quota dimension whose bucket was short
        resource: ResourceKind,
        /// Units the debit asked for
        requested: f64,
        /// Units the bucket held after refill
        available: f64,
    },

    /// The admission wait loop failed to converge, pointing at a clock or
    /// configuration anomaly. Fatal for the call.
    #[error("Admission wait did not converge after {cycles} cycles")]
    Stalled {
        /// Wait-recheck cycles executed before giving up
        cycles: u32,
    },

    /// Configuration rejected at construction
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl PacerError {
    /// Check if the retry controller may re-attempt after this error
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }

    /// Get the error kind string for log fields and summaries
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::Server { .. } => "server_error",
            Self::Client { .. } => "client_error",
            Self::Network { .. } => "network_error",
            Self::InsufficientTokens { .. } => "insufficient_tokens",
            Self::Stalled { .. } => "stalled",
            Self::Configuration { .. } => "configuration_error",
        }
    }

    /// Classify a provider HTTP status code into the taxonomy
    #[must_use]
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited {
                retry_after: None,
                message,
            }
        } else if status.is_server_error() {
            Self::Server {
                status: Some(status.as_u16()),
                message,
            }
        } else if status.is_client_error() {
            Self::Client {
                status: Some(status.as_u16()),
                message,
            }
        } else {
            Self::Network { message }
        }
    }

    /// Create a rate limit error
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            retry_after: None,
            message: message.into(),
        }
    }

    /// Create a server error
    #[must_use]
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a client error
    #[must_use]
    pub fn client(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    /// Create a network error
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
