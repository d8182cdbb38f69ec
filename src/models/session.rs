use serde::{Deserialize, Serialize};

use super::chat::{ChatSummary, Message};

/// Lifecycle of the active session. `loading` is the synchronous guard for
/// Send-class actions; `phase` names where in the lifecycle the guard holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Bootstrapping,
    Sending,
    Ready,
}

/// Everything the chat view renders: the active chat, its transcript, the
/// sidebar list and the status flags. This is a thin cache over server state,
/// never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub chat_id: Option<String>,
    pub messages: Vec<Message>,
    pub chat_list: Vec<ChatSummary>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            chat_id: None,
            messages: Vec::new(),
            chat_list: Vec::new(),
            loading: false,
            error: None,
            phase: Phase::Idle,
        }
    }
}
