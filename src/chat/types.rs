use serde::Deserialize;

use crate::types::Usage;

#[derive(Debug, Deserialize)]
pub(crate) struct WireChatResponse {
    pub(crate) id: String,
    pub(crate) choices: Vec<WireChoice>,
    pub(crate) usage: Usage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChoice {
    pub(crate) message: WireMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStreamChunk {
    pub(crate) id: String,
    pub(crate) choices: Vec<WireStreamChoice>,
    #[serde(default)]
    pub(crate) usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStreamChoice {
    #[serde(default)]
    pub(crate) delta: Option<WireDelta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDelta {
    #[serde(default)]
    pub(crate) content: Option<String>,
}
