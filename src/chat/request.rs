use serde_json::{Value, json};

use crate::options::ChatCompletionParams;
use crate::types::Message;

/// Stop sequences sent with every chat request.
pub const STOP_SEQUENCES: [&str; 3] = ["[/INST]", "[INST]", "<s>"];

/// Builds the chat completion body. Tool calling is not supported, so `tools` is
/// always `null`.
pub(crate) fn build_chat_body(params: &ChatCompletionParams, messages: &[Message]) -> Value {
    json!({
        "model": params.model,
        "temperature": params.temperature,
        "top_p": params.top_p,
        "top_k": params.top_k,
        "max_tokens": params.max_tokens,
        "repetition_penalty": params.repetition_penalty,
        "presence_penalty": params.presence_penalty,
        "frequency_penalty": params.frequency_penalty,
        "stop": STOP_SEQUENCES,
        "messages": messages,
        "tools": Value::Null,
        "stream": params.stream,
    })
}
