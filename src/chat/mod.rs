//! Chat completion: request building, response normalization, and streaming.

pub(crate) mod request;
pub(crate) mod response;
pub mod stream;
pub(crate) mod types;

pub use request::STOP_SEQUENCES;
pub use stream::ChatCompletionStream;

use crate::types::ChatCompletionResult;

/// Outcome of [`crate::Mallam::chat`], tagged by the response mode that was requested.
pub enum ChatCompletion {
    /// `stream` was false: the whole reply in one record.
    Complete(ChatCompletionResult),
    /// `stream` was true: fragments arrive lazily.
    Stream(ChatCompletionStream),
}

impl ChatCompletion {
    /// Resolves either variant into a single result, draining the stream if needed.
    ///
    /// # Errors
    ///
    /// Returns the transport error that interrupted a streamed reply.
    pub async fn into_result(self) -> Result<ChatCompletionResult, crate::MallamError> {
        match self {
            ChatCompletion::Complete(result) => Ok(result),
            ChatCompletion::Stream(stream) => stream.collect_result().await,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, ChatCompletion::Stream(_))
    }
}
