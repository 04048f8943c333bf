//! Typed async client for the MaLLaM API: chat completion (optionally streamed),
//! text embedding and translation.
//!
//! Requests go through an [`http::HttpTransport`], so the client can run on the bundled
//! `reqwest` transport or on any other HTTP stack.
//!
//! ```no_run
//! # async fn run() -> Result<(), mallam::MallamError> {
//! use futures_util::StreamExt;
//! use mallam::{ChatCompletionOptions, Mallam};
//!
//! let client = Mallam::from_env()?;
//! let mut stream = client
//!     .chat_completion_stream("Terangkan Rust dalam satu ayat.", ChatCompletionOptions::default())
//!     .await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod client;
pub mod config;
mod embedding;
pub mod error;
pub mod http;
pub mod options;
pub mod stream;
mod translation;
pub mod types;

pub use chat::{ChatCompletion, ChatCompletionStream};
pub use client::Mallam;
pub use config::{Endpoints, MallamConfig};
pub use error::MallamError;
pub use options::{ChatCompletionOptions, EmbeddingOptions, TranslationOptions};
pub use types::*;
