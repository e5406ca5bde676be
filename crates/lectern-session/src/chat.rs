//! Append-only, session-scoped chat log.

use chrono::{DateTime, Utc};
use lectern_core::entities::ChatMessage;

use crate::error::SessionError;

/// Ordered chat history for one open session. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    next_id: u64,
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message with the next sequence id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] for an empty or whitespace-only
    /// body; nothing is appended in that case.
    pub fn post(
        &mut self,
        sender_name: &str,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<ChatMessage, SessionError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(SessionError::validation("message body is empty"));
        }
        self.next_id += 1;
        let message = ChatMessage {
            id: self.next_id,
            sender_name: sender_name.to_string(),
            body: body.to_string(),
            sent_at,
        };
        self.messages.push(message.clone());
        Ok(message)
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
