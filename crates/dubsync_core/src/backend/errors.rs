//! Error types for the sync engine client.

use thiserror::Error;

/// Failure talking to the sync engine.
///
/// Messages are stored as text so errors stay `Clone` and can be built
/// by test doubles without a live connection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never got a response (refused, reset, DNS...).
    #[error("{endpoint}: engine unreachable: {message}")]
    Unreachable {
        endpoint: &'static str,
        message: String,
    },

    /// The engine answered with a non-success HTTP status.
    #[error("{endpoint}: HTTP {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    /// The engine answered successfully but reported an error in the body.
    #[error("{endpoint}: rejected: {message}")]
    Rejected {
        endpoint: &'static str,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("{endpoint}: invalid response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl BackendError {
    pub fn unreachable(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Unreachable {
            endpoint,
            message: message.into(),
        }
    }

    pub fn status(endpoint: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            endpoint,
            status,
            message: message.into(),
        }
    }

    pub fn rejected(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            endpoint,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint,
            message: message.into(),
        }
    }

    /// Whether the engine could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unreachable { .. } | Self::Setup(_))
    }

    /// Human-readable detail without the endpoint prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Unreachable { message, .. }
            | Self::Rejected { message, .. }
            | Self::Decode { message, .. }
            | Self::Setup(message) => message.clone(),
            Self::Status {
                status, message, ..
            } if message.is_empty() => format!("HTTP {}", status),
            Self::Status {
                status, message, ..
            } => format!("HTTP {}: {}", status, message),
        }
    }
}

/// Result type for engine requests.
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_endpoint() {
        let err = BackendError::status("/analyze", 404, "Not Found");
        assert_eq!(err.to_string(), "/analyze: HTTP 404: Not Found");
        assert_eq!(err.detail(), "HTTP 404: Not Found");
        assert!(!err.is_transport());
    }

    #[test]
    fn transport_classification() {
        assert!(BackendError::unreachable("/progress", "connection refused").is_transport());
        assert!(!BackendError::rejected("/analyze", "no such file").is_transport());
        assert_eq!(BackendError::status("/logs", 500, "").detail(), "HTTP 500");
    }
}
