use crate::error::MallamError;
use crate::types::ChatCompletionResult;

use super::types::WireChatResponse;

/// Normalizes a complete chat completion body into [`ChatCompletionResult`].
///
/// Only the first choice is read. A `null` message content maps to an empty string.
pub(crate) fn map_chat_response(text: &str) -> Result<ChatCompletionResult, MallamError> {
    let parsed: WireChatResponse = serde_json::from_str(text)
        .map_err(|err| MallamError::decode(format!("invalid chat completion body: {err}")))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| MallamError::decode("chat completion body has no choices"))?;

    Ok(ChatCompletionResult {
        id: parsed.id,
        message: choice.message.content.unwrap_or_default(),
        usage: parsed.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Usage;

    #[test]
    fn maps_first_choice_and_usage() {
        let body = r#"{
            "id": "x1",
            "object": "chat.completion",
            "model": "mallam-small",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi there"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}
        }"#;

        let result = map_chat_response(body).expect("map");
        assert_eq!(
            result,
            ChatCompletionResult {
                id: "x1".to_string(),
                message: "hi there".to_string(),
                usage: Usage {
                    prompt_tokens: 1,
                    completion_tokens: 2,
                    total_tokens: 3,
                },
            }
        );
    }

    #[test]
    fn null_content_becomes_empty_message() {
        let body = r#"{"id":"x2","choices":[{"message":{"content":null}}],
            "usage":{"prompt_tokens":1,"completion_tokens":0,"total_tokens":1}}"#;
        assert_eq!(map_chat_response(body).expect("map").message, "");
    }

    #[test]
    fn missing_choice_is_a_decode_error() {
        let body = r#"{"id":"x3","choices":[],"usage":{"prompt_tokens":1,"completion_tokens":0,"total_tokens":1}}"#;
        match map_chat_response(body) {
            Err(MallamError::Decode { message }) => assert!(message.contains("no choices")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            map_chat_response("{\"id\": \"x4\", "),
            Err(MallamError::Decode { .. })
        ));
        assert!(matches!(
            map_chat_response(r#"{"id":"x5","choices":[{"message":{"content":"x"}}]}"#),
            Err(MallamError::Decode { .. })
        ));
    }
}
