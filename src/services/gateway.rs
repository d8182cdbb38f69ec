use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::{ChatSummary, Message};
use super::{auth_service, config_service};

// ============================================================================
// ERRORS
// ============================================================================

/// Failure of one gateway call. Flattened to a display string at the
/// controller boundary; nothing structured crosses it.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },
    #[error("not signed in")]
    Unauthenticated,
}

/// FastAPI error payloads arrive as `{"detail": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Pull the human-readable detail out of an error body, falling back to the
/// raw text when it is not the expected JSON shape.
pub(crate) fn server_error(status: u16, body: &str) -> GatewayError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.trim().to_string());
    GatewayError::Server { status, detail }
}

async fn fail(response: Response) -> GatewayError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    server_error(status, &body)
}

// ============================================================================
// CONTRACT
// ============================================================================

/// The remote service boundary the session controller depends on. Every call
/// is plain request/response: no streaming, no pagination, no partial
/// results. Authentication is attached out of band; the controller never
/// sees credentials.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Ask the server for a fresh chat; it assigns the id.
    async fn create_chat(&self) -> Result<String, GatewayError>;

    /// All chats owned by the user, in the order the server returns them.
    async fn list_chats(&self) -> Result<Vec<ChatSummary>, GatewayError>;

    /// Full transcript of one chat.
    async fn load_chat(&self, chat_id: &str) -> Result<Vec<Message>, GatewayError>;

    /// Post one user message and get the assistant's complete reply.
    async fn post_message(&self, chat_id: &str, content: &str) -> Result<String, GatewayError>;
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct NewChatResponse {
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct ChatListEntry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    created_at: String,
    #[serde(default)]
    finished: bool,
}

impl From<ChatListEntry> for ChatSummary {
    fn from(entry: ChatListEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            created_at: entry.created_at,
            finished: entry.finished,
        }
    }
}

/// The chat-state endpoint returns the whole chat document; only the
/// transcript matters here. Extra per-message fields (timestamps) are
/// ignored.
#[derive(Debug, Deserialize)]
struct ChatStateResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    reply: String,
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// reqwest-backed gateway against the onlyjobless backend. The base URL comes
/// from the config file on every call so a settings change applies without a
/// restart; the bearer token comes from the stored auth state.
pub struct HttpChatGateway {
    client: Client,
}

impl HttpChatGateway {
    pub fn new() -> Self {
        let client = Client::builder()
            // Interview replies can take a while on a slow model.
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    fn bearer(&self) -> Result<String, GatewayError> {
        auth_service::access_token()
            .ok()
            .flatten()
            .ok_or(GatewayError::Unauthenticated)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", config_service::server_url(), path)
    }

    async fn get(&self, path: &str) -> Result<Response, GatewayError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(fail(response).await);
        }
        Ok(response)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, GatewayError> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.bearer()?))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(fail(response).await);
        }
        Ok(response)
    }
}

impl Default for HttpChatGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn create_chat(&self) -> Result<String, GatewayError> {
        let response = self
            .post("/chat/new", &serde_json::json!({}))
            .await?
            .json::<NewChatResponse>()
            .await?;
        Ok(response.chat_id)
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>, GatewayError> {
        let entries = self
            .get("/chat")
            .await?
            .json::<Vec<ChatListEntry>>()
            .await?;
        Ok(entries.into_iter().map(ChatSummary::from).collect())
    }

    async fn load_chat(&self, chat_id: &str) -> Result<Vec<Message>, GatewayError> {
        let state = self
            .get(&format!("/chat/{}", chat_id))
            .await?
            .json::<ChatStateResponse>()
            .await?;
        Ok(state.messages)
    }

    async fn post_message(&self, chat_id: &str, content: &str) -> Result<String, GatewayError> {
        let response = self
            .post(&format!("/chat/{}/message", chat_id), &MessageRequest { content })
            .await?
            .json::<MessageResponse>()
            .await?;
        Ok(response.reply)
    }
}
