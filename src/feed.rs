//! Message Feed
//!
//! The signed-in user's handshakes (newest first) and the composer text.

use crate::backend::{Backend, HandshakeMessage};
use crate::notice::Notices;

pub const EMPTY_MESSAGE_NOTICE: &str = "Enter a handshake message.";

/// What happened to a `create` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Stored and the feed refreshed
    Created,
    /// Rejected locally, nothing sent
    Empty,
    /// The backend refused; composer text kept
    Failed,
}

/// Feed controller for one view
#[derive(Debug, Default)]
pub struct MessageFeed {
    items: Vec<HandshakeMessage>,
    draft: String,
}

impl MessageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[HandshakeMessage] {
        &self.items
    }

    /// Current composer text
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Forget everything (session ended)
    pub fn clear(&mut self) {
        self.items.clear();
        self.draft.clear();
    }

    /// Replace the list with the backend's view of `user_id`'s handshakes.
    ///
    /// Failures are logged and otherwise ignored; the old list stays.
    pub async fn refresh(&mut self, backend: &dyn Backend, user_id: &str) -> bool {
        match backend.query_messages(user_id).await {
            Ok(mut rows) => {
                rows.retain(|m| m.user_id == user_id);
                rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

                tracing::debug!(user_id, count = rows.len(), "Feed refreshed");
                self.items = rows;
                true
            }
            Err(e) => {
                tracing::warn!(user_id, "Feed refresh failed: {}", e);
                false
            }
        }
    }

    /// Store `text` as a new handshake for `user_id`, then refresh.
    pub async fn create(
        &mut self,
        backend: &dyn Backend,
        user_id: &str,
        text: &str,
        notices: &mut Notices,
    ) -> CreateOutcome {
        if text.is_empty() {
            notices.error(EMPTY_MESSAGE_NOTICE);
            return CreateOutcome::Empty;
        }

        if let Err(e) = backend.insert_message(user_id, text).await {
            tracing::warn!(user_id, "Handshake insert failed: {}", e);
            self.draft = text.to_string();
            notices.error(e.user_message());
            return CreateOutcome::Failed;
        }

        tracing::info!(user_id, "Handshake sent");
        self.draft.clear();
        self.refresh(backend, user_id).await;

        CreateOutcome::Created
    }
}
