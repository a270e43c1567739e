//! Assistant chat panel state

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::api::ApiRequest;
use crate::config::Settings;

/// Minutes without activity before the conversation is cleared
pub const DEFAULT_INACTIVITY_MINUTES: i64 = 15;

pub const RETRY_MESSAGE: &str = "Failed to get response. Tap to retry.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("still waiting for the previous reply")]
    Busy,

    #[error("no message with id {0}")]
    UnknownMessage(String),

    #[error("message {0} has not failed")]
    NotRetryable(String),

    #[error("original message not found for retry")]
    NoUserMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Agent,
}

/// Message as exchanged with the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Sent,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub status: MessageStatus,
}

impl LocalMessage {
    fn is_user_sent(&self) -> bool {
        self.role == Role::User && self.id.starts_with("u_")
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<LocalMessage>,
    is_typing: bool,
    last_activity: DateTime<Utc>,
    timeout: Duration,
}

impl ChatSession {
    pub fn new(timeout: Duration, now: DateTime<Utc>) -> Self {
        Self {
            messages: Vec::new(),
            is_typing: false,
            last_activity: now,
            timeout,
        }
    }

    pub fn with_default_timeout(now: DateTime<Utc>) -> Self {
        Self::new(Duration::minutes(DEFAULT_INACTIVITY_MINUTES), now)
    }

    /// Inactivity window taken from `chatInactivityMinutes`
    pub fn from_settings(settings: &Settings, now: DateTime<Utc>) -> Self {
        Self::new(Duration::minutes(settings.chat_inactivity_minutes), now)
    }

    /// `GET /chat/history`, answered with a list of [`ChatMessage`]s
    pub fn history_request() -> ApiRequest {
        ApiRequest::new("chat/history")
    }

    /// `POST /chat` with the raw message text; the reply is plain text
    pub fn send_request(text: &str) -> ApiRequest {
        ApiRequest::post("chat").text(text.trim())
    }

    /// `DELETE /chat` wipes the stored conversation
    pub fn clear_request() -> ApiRequest {
        ApiRequest::delete("chat")
    }

    pub fn messages(&self) -> &[LocalMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn get(&self, id: &str) -> Option<&LocalMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Replace the conversation with stored history
    pub fn load_history(&mut self, history: Vec<ChatMessage>) {
        self.messages = history
            .into_iter()
            .enumerate()
            .map(|(i, m)| LocalMessage {
                id: format!("h_{}", i),
                role: m.role,
                content: m.content,
                status: MessageStatus::Sent,
            })
            .collect();
    }

    /// Append the user's message and a pending agent reply
    ///
    /// Returns the id of the pending reply; the caller resolves or fails it
    /// once the backend answers.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.is_typing {
            return Err(ChatError::Busy);
        }

        self.touch(now);
        let stamp = Uuid::new_v4().simple().to_string();
        let placeholder = format!("a_{}", stamp);

        self.messages.push(LocalMessage {
            id: format!("u_{}", stamp),
            role: Role::User,
            content: text.to_string(),
            status: MessageStatus::Sent,
        });
        self.messages.push(LocalMessage {
            id: placeholder.clone(),
            role: Role::Agent,
            content: String::new(),
            status: MessageStatus::Pending,
        });
        self.is_typing = true;
        Ok(placeholder)
    }

    pub fn resolve(&mut self, id: &str, reply: &str) -> Result<(), ChatError> {
        let message = self.find_mut(id)?;
        message.content = reply.to_string();
        message.status = MessageStatus::Sent;
        self.is_typing = false;
        Ok(())
    }

    pub fn fail(&mut self, id: &str) -> Result<(), ChatError> {
        let message = self.find_mut(id)?;
        message.content = RETRY_MESSAGE.to_string();
        message.status = MessageStatus::Error;
        self.is_typing = false;
        debug!(id, "chat reply failed");
        Ok(())
    }

    /// Put a failed reply back to pending
    ///
    /// Returns the text of the latest user message, which is what gets resent.
    pub fn retry(&mut self, id: &str, now: DateTime<Utc>) -> Result<String, ChatError> {
        let message = self
            .messages
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ChatError::UnknownMessage(id.to_string()))?;
        if message.role != Role::Agent || message.status != MessageStatus::Error {
            return Err(ChatError::NotRetryable(id.to_string()));
        }

        let original = self
            .messages
            .iter()
            .rev()
            .find(|m| m.is_user_sent())
            .map(|m| m.content.clone())
            .ok_or(ChatError::NoUserMessage)?;

        let message = self.find_mut(id)?;
        message.content.clear();
        message.status = MessageStatus::Pending;
        self.is_typing = true;
        self.touch(now);
        Ok(original)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn is_inactive(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity >= self.timeout
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.is_typing = false;
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut LocalMessage, ChatError> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ChatError::UnknownMessage(id.to_string()))
    }
}
