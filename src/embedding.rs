//! Text embedding request and response mapping.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::MallamError;
use crate::options::EmbeddingParams;
use crate::types::{EmbeddingResult, Usage};

#[derive(Debug, Deserialize)]
struct WireEmbeddingResponse {
    data: Vec<WireEmbedding>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct WireEmbedding {
    embedding: Vec<f64>,
}

pub(crate) fn build_embedding_body(params: &EmbeddingParams, input: &str) -> Value {
    json!({
        "input": input,
        "model": params.model,
    })
}

/// Reads `data[0].embedding` and `usage` from a complete embedding response.
pub(crate) fn map_embedding_response(text: &str) -> Result<EmbeddingResult, MallamError> {
    let parsed: WireEmbeddingResponse = serde_json::from_str(text)
        .map_err(|err| MallamError::decode(format!("invalid embedding body: {err}")))?;
    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| MallamError::decode("embedding body has no data"))?;
    Ok(EmbeddingResult {
        embedding: first.embedding,
        usage: parsed.usage,
    })
}
