use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Every failure mode surfaced by the MaLLaM client.
///
/// Fatal failures are returned to the caller of the invoking method. Nothing in the
/// crate retries: a [`MallamError::Http`] or [`MallamError::Transport`] is final for
/// that call.
#[derive(Debug, Error)]
pub enum MallamError {
    /// Connection, DNS, TLS or body-read failures.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The API answered with a non-success status code.
    #[error("http error {status}: {message}")]
    Http {
        /// Status code returned by the API.
        status: u16,
        /// Upstream error message when one could be extracted, otherwise the raw body.
        message: String,
    },
    /// A complete (non-streamed) response body was not the expected JSON shape.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    /// The outgoing request could not be serialized.
    #[error("invalid request: {message}")]
    Validation { message: String },
    /// Raised when building or validating configuration fails.
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// Name of the configuration field that failed validation.
        field: String,
        /// Additional context explaining why the field is invalid.
        reason: String,
    },
}

impl MallamError {
    /// Creates a [`MallamError::Transport`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use mallam::error::MallamError;
    ///
    /// let err = MallamError::transport("dns lookup failed");
    /// assert!(matches!(err, MallamError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a [`MallamError::Decode`] from a textual description.
    pub fn decode<T: Into<String>>(message: T) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code when the error came from a non-success response.
    ///
    /// # Examples
    ///
    /// ```
    /// use mallam::error::MallamError;
    ///
    /// let err = MallamError::Http { status: 401, message: "bad key".into() };
    /// assert_eq!(err.status(), Some(401));
    /// assert_eq!(MallamError::transport("reset").status(), None);
    /// ```
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds a [`MallamError::Http`] from a non-success status and its body.
///
/// The API is not consistent about its error envelope, so the common shapes
/// (`{"error": {"message"}}`, `{"error": "..."}`, `{"detail"}`, `{"message"}`) are tried
/// before falling back to the raw body text.
pub(crate) fn parse_api_error(status: u16, body: &str) -> MallamError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<Value>,
        detail: Option<Value>,
        message: Option<String>,
    }

    let extracted = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| {
            let from_error = parsed.error.and_then(|error| match error {
                Value::String(text) => Some(text),
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            });
            from_error
                .or_else(|| {
                    parsed.detail.map(|detail| match detail {
                        Value::String(text) => text,
                        other => other.to_string(),
                    })
                })
                .or(parsed.message)
        });

    let message = match extracted {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    };
    MallamError::Http { status, message }
}
