use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures_core::Stream;
use futures_util::StreamExt;
use tracing::warn;

use crate::error::MallamError;
use crate::http::HttpBodyStream;
use crate::stream::SseFrameDecoder;
use crate::types::{ChatCompletionChunk, ChatCompletionResult, Usage};

use super::types::WireStreamChunk;

/// Lazy sequence of chat completion fragments.
///
/// Each `data: ` frame of the event stream that decodes successfully yields exactly
/// one [`ChatCompletionChunk`], in arrival order. Frames that fail to decode are
/// logged and skipped. The sequence ends when the server closes the body; a
/// transport failure is yielded once and ends it as well. Dropping the stream
/// early releases the connection.
pub struct ChatCompletionStream {
    frames: SseFrameDecoder,
    last_usage: Option<Usage>,
}

enum Frame {
    Chunk(ChatCompletionChunk),
    Done,
}

impl ChatCompletionStream {
    pub(crate) fn new(body: HttpBodyStream) -> Self {
        Self {
            frames: SseFrameDecoder::new(body),
            last_usage: None,
        }
    }

    /// Drains the stream and concatenates every fragment into a single result.
    ///
    /// The id is taken from the last fragment and the usage is the last one the
    /// server reported (zeroes if it never did).
    ///
    /// # Errors
    ///
    /// Returns the transport error that interrupted the stream, if any.
    pub async fn collect_result(mut self) -> Result<ChatCompletionResult, MallamError> {
        let mut id = String::new();
        let mut message = String::new();
        let mut usage = None;
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            id = chunk.id;
            message.push_str(&chunk.message);
            usage = chunk.usage.or(usage);
        }
        Ok(ChatCompletionResult {
            id,
            message,
            usage: usage.unwrap_or_default(),
        })
    }

    fn decode(&mut self, frame: &[u8]) -> Result<Frame, String> {
        let text = std::str::from_utf8(frame).map_err(|err| format!("invalid UTF-8: {err}"))?;
        if text.trim() == "[DONE]" {
            return Ok(Frame::Done);
        }
        let chunk: WireStreamChunk =
            serde_json::from_str(text).map_err(|err| format!("invalid JSON: {err}"))?;
        let choice = chunk
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| "frame has no choices".to_string())?;

        if chunk.usage.is_some() {
            self.last_usage = chunk.usage;
        }
        Ok(Frame::Chunk(ChatCompletionChunk {
            id: chunk.id,
            message: choice
                .delta
                .and_then(|delta| delta.content)
                .unwrap_or_default(),
            usage: self.last_usage,
        }))
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<ChatCompletionChunk, MallamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match ready!(this.frames.poll_next_unpin(cx)) {
                Some(Ok(frame)) => match this.decode(&frame) {
                    Ok(Frame::Chunk(chunk)) => return Poll::Ready(Some(Ok(chunk))),
                    Ok(Frame::Done) => continue,
                    Err(reason) => {
                        warn!(
                            reason = %reason,
                            frame = %String::from_utf8_lossy(&frame),
                            "dropping undecodable chat completion frame"
                        );
                    }
                },
                Some(Err(err)) => return Poll::Ready(Some(Err(err))),
                None => return Poll::Ready(None),
            }
        }
    }
}
