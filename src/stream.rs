use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::stream;

use crate::error::MallamError;
use crate::http::HttpBodyStream;

/// Prefix marking a payload line in the event stream.
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Splits a server-sent-event body into `data: ` payloads, one per line.
///
/// Only complete lines are inspected; a partial line stays buffered until the next
/// chunk (or the end of the body) completes it. Lines without the `data: ` prefix
/// are dropped. A transport error is yielded once and closes the decoder; once
/// closed the body is released even if the decoder itself is still alive.
pub struct SseFrameDecoder {
    body: HttpBodyStream,
    buffer: Vec<u8>,
    pending: VecDeque<Vec<u8>>,
    closed: bool,
}

impl SseFrameDecoder {
    /// Wraps a raw HTTP body stream.
    pub fn new(body: HttpBodyStream) -> Self {
        Self {
            body,
            buffer: Vec::new(),
            pending: VecDeque::new(),
            closed: false,
        }
    }

    fn handle_line(&mut self, line: &[u8]) {
        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            self.pending.push_back(payload.to_vec());
        }
    }

    fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
        buffer.iter().position(|b| *b == b'\n').map(|pos| {
            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            line
        })
    }

    fn close(&mut self) {
        self.closed = true;
        self.body = Box::pin(stream::empty());
    }
}

impl Stream for SseFrameDecoder {
    type Item = Result<Vec<u8>, MallamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(frame) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(frame)));
            }
            if this.closed {
                return Poll::Ready(None);
            }

            match this.body.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                    while let Some(line) = Self::drain_line(&mut this.buffer) {
                        this.handle_line(&line);
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    this.buffer.clear();
                    this.close();
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    let mut tail = std::mem::take(&mut this.buffer);
                    if tail.last() == Some(&b'\r') {
                        tail.pop();
                    }
                    this.handle_line(&tail);
                    this.close();
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
