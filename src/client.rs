use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use crate::chat::request::build_chat_body;
use crate::chat::response::map_chat_response;
use crate::chat::{ChatCompletion, ChatCompletionStream};
use crate::config::{DEFAULT_BASE_URL, Endpoints, MallamConfig, build_client_from_config};
use crate::embedding::{build_embedding_body, map_embedding_response};
use crate::error::{MallamError, parse_api_error};
use crate::http::reqwest::default_dyn_transport;
use crate::http::{
    DynHttpTransport, HttpBodyStream, post_json_stream_with_headers, post_json_with_headers,
    read_body_stream,
};
use crate::options::{ChatCompletionOptions, EmbeddingOptions, TranslationOptions};
use crate::translation::{build_translation_body, map_translation_response};
use crate::types::{ChatCompletionResult, EmbeddingResult, Prompt, TranslationResult};

/// Client for the MaLLaM API.
///
/// The client only holds the credential, the endpoint layout and a shared transport,
/// so it is cheap to clone and every method can run concurrently from `&self`.
///
/// # Examples
///
/// ```no_run
/// # async fn run() -> Result<(), mallam::MallamError> {
/// use mallam::{ChatCompletionOptions, Mallam};
///
/// let client = Mallam::with_default_transport("my-api-key")?;
/// let reply = client
///     .chat_completion("Apa khabar?", ChatCompletionOptions::default())
///     .await?;
/// println!("{}", reply.message);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Mallam {
    transport: DynHttpTransport,
    api_key: String,
    base_url: String,
    endpoints: Endpoints,
}

impl fmt::Debug for Mallam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mallam")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl Mallam {
    /// Creates a client against [`DEFAULT_BASE_URL`].
    pub fn new(transport: DynHttpTransport, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints: Endpoints::default(),
        }
    }

    /// Creates a client using the default `reqwest` transport.
    pub fn with_default_transport(api_key: impl Into<String>) -> Result<Self, MallamError> {
        Ok(Self::new(default_dyn_transport()?, api_key))
    }

    /// Creates a client from `MALLAM_API_KEY` / `MALLAM_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`MallamError::InvalidConfig`] when the API key is not set.
    pub fn from_env() -> Result<Self, MallamError> {
        Self::from_config(&MallamConfig::from_env()?, default_dyn_transport()?)
    }

    /// Creates a client from an explicit [`MallamConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`MallamError::InvalidConfig`] for a blank API key or base URL.
    pub fn from_config(
        config: &MallamConfig,
        transport: DynHttpTransport,
    ) -> Result<Self, MallamError> {
        build_client_from_config(config, transport)
    }

    /// Points the client at another deployment, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the endpoint paths appended to the base URL.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Base URL exactly as configured.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint paths in use.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn build_headers(&self) -> HashMap<String, String> {
        HashMap::from([
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }

    async fn post(&self, url: String, body: &Value) -> Result<String, MallamError> {
        let transport = self.transport.as_ref();
        let headers = self.build_headers();
        let response = post_json_with_headers(transport, &url, headers, body).await?;
        if !response.is_success() {
            let status = response.status;
            warn!(
                status,
                endpoint = %url,
                request_id = response.request_id().unwrap_or("-"),
                "MaLLaM API returned an error status"
            );
            return Err(parse_api_error(status, &String::from_utf8_lossy(&response.body)));
        }
        debug!(
            endpoint = %url,
            request_id = response.request_id().unwrap_or("-"),
            "response received"
        );
        response.into_string()
    }

    async fn post_stream(&self, url: String, body: &Value) -> Result<HttpBodyStream, MallamError> {
        let transport = self.transport.as_ref();
        let headers = self.build_headers();
        let response = post_json_stream_with_headers(transport, &url, headers, body).await?;
        if response.is_success() {
            debug!(
                endpoint = %url,
                request_id = response.request_id().unwrap_or("-"),
                "event stream opened"
            );
            return Ok(response.body);
        }

        let status = response.status;
        warn!(
            status,
            endpoint = %url,
            request_id = response.request_id().unwrap_or("-"),
            "MaLLaM API returned an error status"
        );
        match read_body_stream(response.body).await {
            Ok(bytes) => Err(parse_api_error(status, &String::from_utf8_lossy(&bytes))),
            Err(err) => Err(MallamError::Http {
                status,
                message: format!("failed to read error body: {err}"),
            }),
        }
    }

    /// Requests a complete chat reply.
    ///
    /// Always sent with `stream: false`; `options.stream` is ignored here.
    ///
    /// # Errors
    ///
    /// [`MallamError::Http`] for non-2xx answers, [`MallamError::Decode`] when the body
    /// lacks `id`, `choices[0].message` or `usage`, [`MallamError::Transport`] for network
    /// failures.
    pub async fn chat_completion(
        &self,
        prompt: impl Into<Prompt>,
        options: ChatCompletionOptions,
    ) -> Result<ChatCompletionResult, MallamError> {
        let mut params = options.resolve();
        params.stream = false;
        let body = build_chat_body(&params, &prompt.into().into_messages());
        let url = self.endpoint(&self.endpoints.chat);
        debug!(endpoint = %url, model = %params.model, "sending chat completion request");

        let text = self.post(url, &body).await?;
        let result = map_chat_response(&text)?;
        debug!(id = %result.id, total_tokens = result.usage.total_tokens, "chat completion received");
        Ok(result)
    }

    /// Requests a streamed chat reply and returns the fragment stream.
    ///
    /// Always sent with `stream: true`. The call resolves once the response headers are
    /// in; fragments are then read lazily from the returned stream.
    ///
    /// # Errors
    ///
    /// [`MallamError::Http`] for non-2xx answers, [`MallamError::Transport`] for network
    /// failures. Undecodable frames are not errors: they are logged and skipped.
    pub async fn chat_completion_stream(
        &self,
        prompt: impl Into<Prompt>,
        options: ChatCompletionOptions,
    ) -> Result<ChatCompletionStream, MallamError> {
        let mut params = options.resolve();
        params.stream = true;
        let body = build_chat_body(&params, &prompt.into().into_messages());
        let url = self.endpoint(&self.endpoints.chat);
        debug!(endpoint = %url, model = %params.model, "sending streaming chat completion request");

        let body = self.post_stream(url, &body).await?;
        Ok(ChatCompletionStream::new(body))
    }

    /// Sends a chat request in the mode selected by `options.stream` (default `false`).
    pub async fn chat(
        &self,
        prompt: impl Into<Prompt>,
        options: ChatCompletionOptions,
    ) -> Result<ChatCompletion, MallamError> {
        if options.stream.unwrap_or(false) {
            self.chat_completion_stream(prompt, options)
                .await
                .map(ChatCompletion::Stream)
        } else {
            self.chat_completion(prompt, options)
                .await
                .map(ChatCompletion::Complete)
        }
    }

    /// Embeds a single text.
    pub async fn create_embedding(
        &self,
        text: &str,
        options: EmbeddingOptions,
    ) -> Result<EmbeddingResult, MallamError> {
        let params = options.resolve();
        let body = build_embedding_body(&params, text);
        let url = self.endpoint(&self.endpoints.embedding);
        debug!(endpoint = %url, model = %params.model, "sending embedding request");

        let text = self.post(url, &body).await?;
        map_embedding_response(&text)
    }

    /// Translates a text, into Malay unless `options.to_lang` says otherwise.
    pub async fn translate(
        &self,
        text: &str,
        options: TranslationOptions,
    ) -> Result<TranslationResult, MallamError> {
        let params = options.resolve();
        let body = build_translation_body(&params, text);
        let url = self.endpoint(&self.endpoints.translation);
        debug!(endpoint = %url, model = %params.model, to_lang = %params.to_lang, "sending translation request");

        let text = self.post(url, &body).await?;
        map_translation_response(&text)
    }
}
