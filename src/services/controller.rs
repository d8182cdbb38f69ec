use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::models::{Message, Phase, SessionState};
use super::gateway::{ChatGateway, GatewayError};
use super::session::SessionStore;
use super::typing::{self, RevealHandle};

// ============================================================================
// CANONICAL PROMPTS
// ============================================================================

// The hint/answer/finish actions go through the ordinary message channel;
// the backend distinguishes them by prompt content, not by endpoint.
pub const HINT_PROMPT: &str = "give a hint";
pub const ANSWER_PROMPT: &str = "give an ideal answer";
pub const FINISH_PROMPT: &str = "end the interview and grade it";

const EMPTY_REPLY_PLACEHOLDER: &str = "(empty model reply)";
const CREATE_CHAT_FALLBACK: &str = "Failed to create chat";

// ============================================================================
// CONTROLLER
// ============================================================================

/// Orchestrates the interview session: bootstrap, send-class actions, chat
/// switching and list refresh. Owns the session store, the gateway and the
/// live reveal tasks.
///
/// Ordering guarantees: at most one Send-class call is outstanding at a time
/// (the `loading` flag is checked and set under one lock before the network
/// call is issued), and the user's message is appended to the transcript
/// before the async gap begins, so submitted intent stays visible even when
/// the reply is slow or fails.
pub struct ChatController<G: ChatGateway> {
    store: SessionStore,
    gateway: G,
    reveal_speed: Duration,
    active_reveals: Mutex<Vec<RevealHandle>>,
}

impl<G: ChatGateway> ChatController<G> {
    pub fn new(store: SessionStore, gateway: G) -> Self {
        Self {
            store,
            gateway,
            reveal_speed: typing::DEFAULT_SPEED,
            active_reveals: Mutex::new(Vec::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_reveal_speed(mut self, speed: Duration) -> Self {
        self.reveal_speed = speed;
        self
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Start a fresh interview and make it active. Used at app start and for
    /// the "+ New interview" action. On failure the error is surfaced and the
    /// session stays usable; actions that need an active chat reject silently
    /// until one exists.
    pub async fn start_new_chat(&self) {
        self.cancel_reveals();
        self.store.update(|s| {
            s.error = None;
            s.loading = true;
            s.phase = Phase::Bootstrapping;
        });

        match self.gateway.create_chat().await {
            Ok(chat_id) => {
                self.store.update(|s| {
                    s.chat_id = Some(chat_id);
                    s.messages.clear();
                });
                self.refresh_chat_list().await;
            }
            Err(e) => {
                log::error!("chat creation failed: {}", e);
                let message = match &e {
                    GatewayError::Server { detail, .. } if !detail.is_empty() => detail.clone(),
                    _ => CREATE_CHAT_FALLBACK.to_string(),
                };
                self.store.update(|s| s.error = Some(message));
            }
        }

        self.store.update(|s| {
            s.loading = false;
            s.phase = Phase::Ready;
        });
    }

    /// Switch to another chat from the sidebar. The requested id becomes
    /// active immediately; the transcript is replaced wholesale with the
    /// loaded messages. A load failure keeps the previous (stale) transcript
    /// and is logged rather than surfaced.
    pub async fn open_chat(&self, chat_id: &str) {
        // The reveal for the outgoing chat must not keep writing into a
        // transcript it no longer owns.
        self.cancel_reveals();
        self.store.update(|s| {
            s.chat_id = Some(chat_id.to_string());
            s.loading = true;
        });

        match self.gateway.load_chat(chat_id).await {
            Ok(messages) => self.store.update(|s| s.messages = messages),
            Err(e) => log::warn!("failed to load chat {}: {}", chat_id, e),
        }

        self.store.update(|s| {
            s.loading = false;
            s.phase = Phase::Ready;
        });
    }

    /// Send a user-typed message. No-op when the text is empty, no chat is
    /// active, or another Send-class call is in flight.
    pub async fn send(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.send_prompt(text, false).await;
    }

    pub async fn hint(&self) {
        self.send_prompt(HINT_PROMPT, false).await;
    }

    pub async fn ideal_answer(&self) {
        self.send_prompt(ANSWER_PROMPT, false).await;
    }

    /// End the interview and ask for a grade. Completion can flip the chat's
    /// `finished` flag server-side, so the list is refreshed on success.
    pub async fn finish(&self) {
        self.send_prompt(FINISH_PROMPT, true).await;
    }

    /// Replace the sidebar list with the server's. Failures are swallowed;
    /// the list just stays stale.
    pub async fn refresh_chat_list(&self) {
        match self.gateway.list_chats().await {
            Ok(list) => self.store.update(|s| s.chat_list = list),
            Err(e) => log::warn!("failed to refresh chat list: {}", e),
        }
    }

    /// Drop the session on logout: stop any reveal and reset to defaults.
    pub fn teardown(&self) {
        self.cancel_reveals();
        self.store.update(|s| *s = SessionState::default());
    }

    // ------------------------------------------------------------------
    // send pipeline
    // ------------------------------------------------------------------

    async fn send_prompt(&self, text: &str, refresh_after: bool) {
        let chat_id = match self.begin_send(text) {
            Some(id) => id,
            None => return,
        };

        match self.gateway.post_message(&chat_id, text).await {
            Ok(reply) => {
                let reply = if reply.trim().is_empty() {
                    EMPTY_REPLY_PLACEHOLDER.to_string()
                } else {
                    reply
                };
                self.start_reveal(reply);
                if refresh_after {
                    self.refresh_chat_list().await;
                }
            }
            Err(e) => {
                log::error!("send failed: {}", e);
                self.store.update(|s| s.error = Some(e.to_string()));
            }
        }

        // Guaranteed cleanup regardless of success or failure.
        self.store.update(|s| {
            s.loading = false;
            s.phase = Phase::Ready;
        });
    }

    /// The synchronous guard: check and flip `loading` and append the user
    /// message under a single lock, so no second Send-class call can slip in
    /// before the network call is issued.
    fn begin_send(&self, text: &str) -> Option<String> {
        self.store.update(|s| {
            if s.loading {
                return None;
            }
            let chat_id = s.chat_id.clone()?;
            s.error = None;
            s.messages.push(Message::user(text));
            s.loading = true;
            s.phase = Phase::Sending;
            Some(chat_id)
        })
    }

    /// Append an empty assistant placeholder and start a reveal that rewrites
    /// that slot. The slot index is fixed at append time; sends are
    /// serialized, so no other reveal targets it.
    fn start_reveal(&self, reply: String) {
        let slot = self.store.update(|s| {
            s.messages.push(Message::assistant(""));
            s.messages.len() - 1
        });

        let store = self.store.clone();
        let handle = typing::reveal(reply, self.reveal_speed, move |prefix| {
            store.update(|s| {
                if let Some(message) = s.messages.get_mut(slot) {
                    message.content = prefix.to_string();
                }
            });
        });

        let mut reveals = self
            .active_reveals
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        reveals.retain(|h| !h.is_finished());
        reveals.push(handle);
    }

    fn cancel_reveals(&self) {
        let handles: Vec<RevealHandle> = self
            .active_reveals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            handle.cancel();
        }
    }

    /// Test hook: wait for every live reveal to finish.
    #[cfg(test)]
    pub(crate) async fn flush_reveals(&self) {
        let handles: Vec<RevealHandle> = self
            .active_reveals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            handle.join().await;
        }
    }
}
