//! Per-operation options and their documented defaults.
//!
//! Each operation takes a partial `*Options` record; every field left as `None`
//! is filled from the matching `DEFAULT_*` constant by `resolve()`. Values are passed
//! through as given, nothing is range-checked.

use serde::{Deserialize, Serialize};

use crate::types::ChatModel;

pub const DEFAULT_CHAT_TEMPERATURE: f64 = 0.9;
pub const DEFAULT_CHAT_TOP_P: f64 = 0.95;
pub const DEFAULT_CHAT_TOP_K: u32 = 50;
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 256;
pub const DEFAULT_CHAT_REPETITION_PENALTY: f64 = 1.05;
pub const DEFAULT_CHAT_PRESENCE_PENALTY: f64 = 0.0;
pub const DEFAULT_CHAT_FREQUENCY_PENALTY: f64 = 0.0;

pub const DEFAULT_EMBEDDING_MODEL: &str = "base";

pub const DEFAULT_TRANSLATION_TO_LANG: &str = "ms";
pub const DEFAULT_TRANSLATION_MODEL: &str = "small";
pub const DEFAULT_TRANSLATION_TOP_K: u32 = 1;
pub const DEFAULT_TRANSLATION_TOP_P: f64 = 1.0;
pub const DEFAULT_TRANSLATION_REPETITION_PENALTY: f64 = 1.1;
pub const DEFAULT_TRANSLATION_TEMPERATURE: f64 = 0.0;

/// Caller-facing chat completion options.
///
/// # Examples
///
/// ```
/// use mallam::options::ChatCompletionOptions;
/// use mallam::types::ChatModel;
///
/// let params = ChatCompletionOptions::default()
///     .with_temperature(0.2)
///     .with_max_tokens(64)
///     .resolve();
/// assert_eq!(params.model, ChatModel::MallamSmall);
/// assert_eq!(params.temperature, 0.2);
/// assert_eq!(params.top_k, 50);
/// assert_eq!(params.max_tokens, 64);
/// assert!(!params.stream);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionOptions {
    #[serde(default)]
    pub model: Option<ChatModel>,
    /// Higher values mean more randomness.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold.
    #[serde(default)]
    pub top_p: Option<f64>,
    /// Size of the candidate pool.
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Only consulted by [`crate::Mallam::chat`]; the dedicated entry points pick the
    /// mode themselves.
    #[serde(default)]
    pub stream: Option<bool>,
    #[serde(default)]
    pub repetition_penalty: Option<f64>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
}

impl ChatCompletionOptions {
    /// Sets the chat model (default `mallam-small`).
    pub fn with_model(mut self, model: impl Into<ChatModel>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature (default 0.9).
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the nucleus sampling threshold (default 0.95).
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the candidate pool size (default 50).
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Caps the reply length in tokens (default 256).
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Selects the response mode used by [`crate::Mallam::chat`].
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Sets the repetition penalty (default 1.05).
    pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }

    /// Sets the presence penalty (default 0).
    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Sets the frequency penalty (default 0).
    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Fills every unset field with its default.
    pub fn resolve(self) -> ChatCompletionParams {
        ChatCompletionParams {
            model: self.model.unwrap_or_default(),
            temperature: self.temperature.unwrap_or(DEFAULT_CHAT_TEMPERATURE),
            top_p: self.top_p.unwrap_or(DEFAULT_CHAT_TOP_P),
            top_k: self.top_k.unwrap_or(DEFAULT_CHAT_TOP_K),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_CHAT_MAX_TOKENS),
            stream: self.stream.unwrap_or(false),
            repetition_penalty: self
                .repetition_penalty
                .unwrap_or(DEFAULT_CHAT_REPETITION_PENALTY),
            presence_penalty: self
                .presence_penalty
                .unwrap_or(DEFAULT_CHAT_PRESENCE_PENALTY),
            frequency_penalty: self
                .frequency_penalty
                .unwrap_or(DEFAULT_CHAT_FREQUENCY_PENALTY),
        }
    }
}

/// Fully populated chat options, ready to be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionParams {
    pub model: ChatModel,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_tokens: u32,
    pub stream: bool,
    pub repetition_penalty: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

impl Default for ChatCompletionParams {
    fn default() -> Self {
        ChatCompletionOptions::default().resolve()
    }
}

/// Caller-facing embedding options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingOptions {
    #[serde(default)]
    pub model: Option<String>,
}

impl EmbeddingOptions {
    /// Sets the embedding model (default `base`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Fills the model with its default when unset.
    pub fn resolve(self) -> EmbeddingParams {
        EmbeddingParams {
            model: self
                .model
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingParams {
    pub model: String,
}

/// Caller-facing translation options.
///
/// # Examples
///
/// ```
/// use mallam::options::TranslationOptions;
///
/// let params = TranslationOptions::default().with_to_lang("en").resolve();
/// assert_eq!(params.to_lang, "en");
/// assert_eq!(params.model, "small");
/// assert_eq!(params.repetition_penalty, 1.1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationOptions {
    /// Target language code, `ms` by default.
    #[serde(default)]
    pub to_lang: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub repetition_penalty: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl TranslationOptions {
    /// Sets the target language code (default `ms`).
    pub fn with_to_lang(mut self, to_lang: impl Into<String>) -> Self {
        self.to_lang = Some(to_lang.into());
        self
    }

    /// Sets the translation model (default `small`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the candidate pool size (default 1).
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Sets the nucleus sampling threshold (default 1).
    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the repetition penalty (default 1.1).
    pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }

    /// Sets the sampling temperature (default 0).
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Fills every unset field with its default.
    pub fn resolve(self) -> TranslationParams {
        TranslationParams {
            to_lang: self
                .to_lang
                .unwrap_or_else(|| DEFAULT_TRANSLATION_TO_LANG.to_string()),
            model: self
                .model
                .unwrap_or_else(|| DEFAULT_TRANSLATION_MODEL.to_string()),
            top_k: self.top_k.unwrap_or(DEFAULT_TRANSLATION_TOP_K),
            top_p: self.top_p.unwrap_or(DEFAULT_TRANSLATION_TOP_P),
            repetition_penalty: self
                .repetition_penalty
                .unwrap_or(DEFAULT_TRANSLATION_REPETITION_PENALTY),
            temperature: self.temperature.unwrap_or(DEFAULT_TRANSLATION_TEMPERATURE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationParams {
    pub to_lang: String,
    pub model: String,
    pub top_k: u32,
    pub top_p: f64,
    pub repetition_penalty: f64,
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chat_options_resolve_to_documented_defaults() {
        let params = ChatCompletionOptions::default().resolve();
        assert_eq!(
            params,
            ChatCompletionParams {
                model: ChatModel::MallamSmall,
                temperature: 0.9,
                top_p: 0.95,
                top_k: 50,
                max_tokens: 256,
                stream: false,
                repetition_penalty: 1.05,
                presence_penalty: 0.0,
                frequency_penalty: 0.0,
            }
        );
    }

    #[test]
    fn caller_chat_fields_override_defaults_field_by_field() {
        let params = ChatCompletionOptions::default()
            .with_model(ChatModel::MallamRoleplay)
            .with_top_p(0.5)
            .with_stream(true)
            .with_frequency_penalty(0.3)
            .resolve();
        assert_eq!(params.model, ChatModel::MallamRoleplay);
        assert_eq!(params.top_p, 0.5);
        assert!(params.stream);
        assert_eq!(params.frequency_penalty, 0.3);
        // untouched fields keep their defaults
        assert_eq!(params.temperature, DEFAULT_CHAT_TEMPERATURE);
        assert_eq!(params.top_k, DEFAULT_CHAT_TOP_K);
        assert_eq!(params.max_tokens, DEFAULT_CHAT_MAX_TOKENS);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let params = ChatCompletionOptions::default()
            .with_temperature(7.5)
            .with_top_p(-1.0)
            .resolve();
        assert_eq!(params.temperature, 7.5);
        assert_eq!(params.top_p, -1.0);
    }

    #[test]
    fn embedding_model_defaults_to_base() {
        assert_eq!(EmbeddingOptions::default().resolve().model, "base");
        assert_eq!(
            EmbeddingOptions::default()
                .with_model("large")
                .resolve()
                .model,
            "large"
        );
    }

    #[test]
    fn translation_defaults_and_overrides() {
        let params = TranslationOptions::default().resolve();
        assert_eq!(
            params,
            TranslationParams {
                to_lang: "ms".to_string(),
                model: "small".to_string(),
                top_k: 1,
                top_p: 1.0,
                repetition_penalty: 1.1,
                temperature: 0.0,
            }
        );

        let params = TranslationOptions::default()
            .with_to_lang("en")
            .with_temperature(0.4)
            .resolve();
        assert_eq!(params.to_lang, "en");
        assert_eq!(params.temperature, 0.4);
        assert_eq!(params.model, "small");
    }

    #[test]
    fn options_deserialize_from_partial_json() {
        let options: ChatCompletionOptions =
            serde_json::from_str(r#"{"model":"mallam-tiny","max_tokens":10}"#).unwrap();
        let params = options.resolve();
        assert_eq!(params.model, ChatModel::MallamTiny);
        assert_eq!(params.max_tokens, 10);
        assert_eq!(params.top_k, 50);
    }
}
