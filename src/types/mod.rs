//! Value types exchanged with the MaLLaM API.
//!
//! Everything here is an immutable record built per call; the client never caches
//! any of it between requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

/// A single chat message.
///
/// # Examples
///
/// ```
/// use mallam::types::{Message, Role};
///
/// let msg = Message::system("Jawab dalam Bahasa Melayu.");
/// assert_eq!(msg.role, Role::System);
/// assert_eq!(
///     serde_json::to_value(&msg).unwrap(),
///     serde_json::json!({"role": "system", "content": "Jawab dalam Bahasa Melayu."})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Chat input: either raw text or an explicit, ordered conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Text(String),
    Messages(Vec<Message>),
}

impl Prompt {
    /// Converts the prompt into the message list sent upstream.
    ///
    /// Raw text becomes a single `user` message; an explicit conversation is returned
    /// untouched, in the order it was supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use mallam::types::{Message, Prompt};
    ///
    /// assert_eq!(Prompt::from("hello").into_messages(), vec![Message::user("hello")]);
    /// ```
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Prompt::Text(text) => vec![Message::user(text)],
            Prompt::Messages(messages) => messages,
        }
    }
}

impl From<&str> for Prompt {
    fn from(value: &str) -> Self {
        Prompt::Text(value.to_string())
    }
}

impl From<String> for Prompt {
    fn from(value: String) -> Self {
        Prompt::Text(value)
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(value: Vec<Message>) -> Self {
        Prompt::Messages(value)
    }
}

impl From<&[Message]> for Prompt {
    fn from(value: &[Message]) -> Self {
        Prompt::Messages(value.to_vec())
    }
}

/// Chat model served by the API.
///
/// `Custom` carries model names the crate does not know about yet; upstream model
/// names have changed before.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChatModel {
    #[default]
    MallamSmall,
    MallamTiny,
    MallamRoleplay,
    Custom(String),
}

impl ChatModel {
    pub fn as_str(&self) -> &str {
        match self {
            ChatModel::MallamSmall => "mallam-small",
            ChatModel::MallamTiny => "mallam-tiny",
            ChatModel::MallamRoleplay => "mallam-roleplay",
            ChatModel::Custom(name) => name,
        }
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ChatModel {
    fn from(value: &str) -> Self {
        match value {
            "mallam-small" => ChatModel::MallamSmall,
            "mallam-tiny" => ChatModel::MallamTiny,
            "mallam-roleplay" => ChatModel::MallamRoleplay,
            other => ChatModel::Custom(other.to_string()),
        }
    }
}

impl From<String> for ChatModel {
    fn from(value: String) -> Self {
        ChatModel::from(value.as_str())
    }
}

impl FromStr for ChatModel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ChatModel::from(s))
    }
}

impl Serialize for ChatModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(ChatModel::from(name.as_str()))
    }
}

/// Token accounting reported by the API.
///
/// `total_tokens == prompt_tokens + completion_tokens` is expected to hold but is
/// not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Token accounting for translations. The API does not report completion tokens
/// for this endpoint, so the field does not exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslationUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Complete, non-streamed chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResult {
    pub id: String,
    pub message: String,
    pub usage: Usage,
}

/// One streamed fragment of a chat completion.
///
/// `message` holds only the text generated since the previous fragment; callers
/// concatenate fragments to rebuild the full reply. `usage` is the most recent usage
/// the server reported on this stream, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub message: String,
    pub usage: Option<Usage>,
}

/// Embedding vector for a single input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResult {
    pub embedding: Vec<f64>,
    pub usage: Usage,
}

/// Translated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub result: String,
    pub usage: TranslationUsage,
}
