use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use futures_util::StreamExt;
use serde::Serialize;

use crate::error::MallamError;

/// Minimal POST request handed to an [`HttpTransport`].
///
/// The MaLLaM API only accepts JSON POST bodies, so the method is implied.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request with a JSON request body.
    ///
    /// # Examples
    ///
    /// ```
    /// use mallam::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec());
    /// assert_eq!(request.headers.get("Content-Type"), Some(&"application/json".to_string()));
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body,
            timeout: None,
        }
    }

    /// Merges extra headers into the request, replacing existing values with the same name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use mallam::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec())
    ///     .with_headers(HashMap::from([("Authorization".into(), "Bearer test".into())]));
    /// assert_eq!(request.headers.get("Authorization"), Some(&"Bearer test".to_string()));
    /// assert_eq!(request.headers.len(), 2);
    /// ```
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Minimal HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of the upstream `x-request-id` header, if any.
    pub fn request_id(&self) -> Option<&str> {
        request_id(&self.headers)
    }

    /// Converts the body into a UTF-8 string.
    ///
    /// # Examples
    ///
    /// ```
    /// use mallam::http::HttpResponse;
    ///
    /// let response = HttpResponse { status: 200, headers: Default::default(), body: b"ok".to_vec() };
    /// assert_eq!(response.into_string().unwrap(), "ok");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MallamError::Decode`] when the body is not valid UTF-8.
    pub fn into_string(self) -> Result<String, MallamError> {
        String::from_utf8(self.body)
            .map_err(|err| MallamError::decode(format!("response body is not UTF-8: {err}")))
    }
}

/// HTTP response that carries a streaming body.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: HttpBodyStream,
}

impl HttpStreamResponse {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Value of the upstream `x-request-id` header, if any.
    pub fn request_id(&self) -> Option<&str> {
        request_id(&self.headers)
    }
}

fn request_id(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("x-request-id"))
        .map(|(_, value)| value.as_str())
}

/// Alias for the body stream returned by [`HttpTransport::send_stream`].
///
/// Dropping the stream must release the underlying connection.
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, MallamError>> + Send>>;

/// Transport abstraction decoupling the client from the concrete HTTP stack.
///
/// Implementations must not interpret status codes: a non-2xx answer is still an
/// `Ok` response, the client decides what to do with it.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves when the full response is available.
    ///
    /// # Examples
    ///
    /// ```
    /// # use async_trait::async_trait;
    /// # use mallam::http::{HttpTransport, HttpRequest, HttpResponse, HttpStreamResponse};
    /// # use mallam::error::MallamError;
    /// # use futures_util::stream;
    /// struct MemoryTransport;
    ///
    /// #[async_trait]
    /// impl HttpTransport for MemoryTransport {
    ///     async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MallamError> {
    ///         Ok(HttpResponse { status: 200, headers: request.headers, body: b"ok".to_vec() })
    ///     }
    ///     async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, MallamError> {
    ///         Ok(HttpStreamResponse { status: 200, headers: request.headers, body: Box::pin(stream::empty()) })
    ///     }
    /// }
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let response = MemoryTransport
    ///     .send(HttpRequest::post_json("https://example.com", br"{}".to_vec()))
    ///     .await
    ///     .unwrap();
    /// assert_eq!(response.status, 200);
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// Implementations should map network failures to [`MallamError::Transport`].
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MallamError>;

    /// Sends a request and returns the body as a stream of chunks.
    ///
    /// # Errors
    ///
    /// Implementations should map network failures to [`MallamError::Transport`].
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, MallamError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

fn encode_body<T: Serialize>(body: &T) -> Result<Vec<u8>, MallamError> {
    serde_json::to_vec(body).map_err(|err| MallamError::Validation {
        message: format!("failed to serialize request: {err}"),
    })
}

/// Serializes a body to JSON, attaches headers, and issues a POST request.
///
/// # Errors
///
/// Returns [`MallamError::Validation`] if serialization fails or forwards the error raised by
/// [`HttpTransport::send`].
pub async fn post_json_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpResponse, MallamError> {
    let payload = encode_body(body)?;
    let request = HttpRequest::post_json(url, payload).with_headers(headers);
    transport.send(request).await
}

/// Issues a JSON POST request and returns the streaming response.
///
/// Mirrors [`post_json_with_headers`] but calls [`HttpTransport::send_stream`] so that
/// server-sent events can be consumed incrementally.
///
/// # Errors
///
/// Returns [`MallamError::Validation`] when serialization fails or propagates any error from
/// [`HttpTransport::send_stream`].
pub async fn post_json_stream_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpStreamResponse, MallamError> {
    let payload = encode_body(body)?;
    let request = HttpRequest::post_json(url, payload).with_headers(headers);
    transport.send_stream(request).await
}

/// Drains a streaming body into raw bytes, used for error bodies of streamed calls.
///
/// # Errors
///
/// Propagates the first transport error raised by the body.
pub async fn read_body_stream(mut body: HttpBodyStream) -> Result<Vec<u8>, MallamError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(bytes)
}

pub mod reqwest;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser;

    /// Transport that panics if `send` or `send_stream` are invoked.
    struct PanicTransport;

    #[async_trait]
    impl HttpTransport for PanicTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, MallamError> {
            panic!("send should not be called");
        }

        async fn send_stream(
            &self,
            _request: HttpRequest,
        ) -> Result<HttpStreamResponse, MallamError> {
            panic!("send_stream should not be called");
        }
    }

    /// Body type that intentionally fails serialization.
    struct NonSerializableBody;

    impl Serialize for NonSerializableBody {
        fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(ser::Error::custom(
                "intentional serialization failure for test",
            ))
        }
    }

    #[tokio::test]
    async fn post_json_with_headers_returns_validation_on_serde_error() {
        let result = post_json_with_headers(
            &PanicTransport,
            "http://example.com",
            HashMap::new(),
            &NonSerializableBody,
        )
        .await;

        match result {
            Err(MallamError::Validation { message }) => {
                assert!(
                    message.contains("failed to serialize request"),
                    "unexpected validation message: {message}"
                );
            }
            Ok(_) => panic!("expected validation error for non serializable body"),
            Err(other) => panic!("unexpected error type: {other:?}"),
        }
    }

    #[tokio::test]
    async fn post_json_stream_with_headers_returns_validation_on_serde_error() {
        let result = post_json_stream_with_headers(
            &PanicTransport,
            "http://example.com",
            HashMap::new(),
            &NonSerializableBody,
        )
        .await;
        assert!(matches!(result, Err(MallamError::Validation { .. })));
    }

    #[tokio::test]
    async fn read_body_stream_joins_chunks() {
        let body: HttpBodyStream = Box::pin(futures_util::stream::iter(vec![
            Ok::<_, MallamError>(b"{\"error\":".to_vec()),
            Ok(b"\"nope\"}".to_vec()),
        ]));
        assert_eq!(read_body_stream(body).await.unwrap(), b"{\"error\":\"nope\"}");
    }

    #[test]
    fn into_string_reports_invalid_utf8_as_decode_error() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: vec![0xff, 0xfe],
        };
        assert!(matches!(
            response.into_string(),
            Err(MallamError::Decode { .. })
        ));
    }

    #[test]
    fn request_id_lookup_ignores_header_case() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::from([("X-Request-Id".to_string(), "req-42".to_string())]),
            body: Vec::new(),
        };
        assert_eq!(response.request_id(), Some("req-42"));

        let response = HttpResponse {
            headers: HashMap::new(),
            ..response
        };
        assert_eq!(response.request_id(), None);
    }

    #[test]
    fn is_success_covers_2xx_only() {
        let ok = HttpResponse {
            status: 204,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        let redirect = HttpResponse {
            status: 302,
            ..ok.clone()
        };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
