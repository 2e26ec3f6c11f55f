//! API Error Types
//!
//! Failures that can occur while talking to the sensor server.

use thiserror::Error;

/// Errors returned by [`SensorApi`](super::SensorApi) calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server could not be reached (connection refused, DNS failure, ...)
    #[error("Sensor server unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport-level failure
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Body was not JSON or did not match the expected shape
    #[error("Malformed response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    /// Classify a reqwest send error the same way for every call
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }

    pub(crate) fn decode(path: &str, err: impl std::fmt::Display) -> Self {
        ApiError::Decode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Timeout;
        assert_eq!(err.to_string(), "Request timeout");

        let err = ApiError::decode("/api/sensor-data", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Malformed response from /api/sensor-data: expected value at line 1 column 1"
        );
    }
}
