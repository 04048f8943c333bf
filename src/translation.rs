//! Translation request and response mapping.

use serde_json::{Value, json};

use crate::error::MallamError;
use crate::options::TranslationParams;
use crate::types::TranslationResult;

pub(crate) fn build_translation_body(params: &TranslationParams, input: &str) -> Value {
    json!({
        "input": input,
        "to_lang": params.to_lang,
        "model": params.model,
        "top_k": params.top_k,
        "top_p": params.top_p,
        "repetition_penalty": params.repetition_penalty,
        "temperature": params.temperature,
    })
}

/// Decodes a translation response. Extra usage fields such as `completion_tokens`
/// are dropped by [`crate::types::TranslationUsage`].
pub(crate) fn map_translation_response(text: &str) -> Result<TranslationResult, MallamError> {
    serde_json::from_str(text)
        .map_err(|err| MallamError::decode(format!("invalid translation body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TranslationOptions;

    #[test]
    fn body_carries_translation_defaults() {
        let body = build_translation_body(&TranslationOptions::default().resolve(), "good morning");
        assert_eq!(
            body,
            json!({
                "input": "good morning",
                "to_lang": "ms",
                "model": "small",
                "top_k": 1,
                "top_p": 1.0,
                "repetition_penalty": 1.1,
                "temperature": 0.0,
            })
        );
    }

    #[test]
    fn every_supplied_option_lands_in_the_body() {
        let params = TranslationOptions::default()
            .with_to_lang("en")
            .with_model("base")
            .with_top_k(3)
            .with_top_p(0.8)
            .with_repetition_penalty(1.3)
            .with_temperature(0.7)
            .resolve();
        let body = build_translation_body(&params, "selamat pagi");
        assert_eq!(
            body,
            json!({
                "input": "selamat pagi",
                "to_lang": "en",
                "model": "base",
                "top_k": 3,
                "top_p": 0.8,
                "repetition_penalty": 1.3,
                "temperature": 0.7,
            })
        );
    }

    #[test]
    fn response_never_exposes_completion_tokens() {
        let text = r#"{"result":"selamat pagi","usage":{"prompt_tokens":3,"completion_tokens":4,"total_tokens":7}}"#;
        let result = map_translation_response(text).expect("map");
        assert_eq!(result.result, "selamat pagi");
        assert_eq!(result.usage.prompt_tokens, 3);
        assert_eq!(result.usage.total_tokens, 7);

        let reserialized = serde_json::to_value(&result).expect("serialize");
        assert!(reserialized["usage"].get("completion_tokens").is_none());
    }

    #[test]
    fn missing_result_is_a_decode_error() {
        assert!(matches!(
            map_translation_response(r#"{"usage":{"prompt_tokens":1,"total_tokens":1}}"#),
            Err(MallamError::Decode { .. })
        ));
    }
}
