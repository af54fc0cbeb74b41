use crate::error::{Result, VocardsError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Trait for text completion.
///
/// This trait allows swapping implementations (real API vs mock).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the reply to `messages`, expected to be a JSON object.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the name of the model answering
    fn model_name(&self) -> &str;
}

/// Implement TextGenerator for Arc<T> to allow sharing across stations.
#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        (**self).complete(messages).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock generator for testing.
///
/// Replies are picked by the first needle found in the user message.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    replies: Vec<(String, String)>,
    default_reply: Option<String>,
    fail_on: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` whenever the user message contains `needle`.
    pub fn with_reply(mut self, needle: &str, reply: &str) -> Self {
        self.replies.push((needle.to_string(), reply.to_string()));
        self
    }

    /// Reply with `reply` when no needle matches.
    pub fn with_default_reply(mut self, reply: &str) -> Self {
        self.default_reply = Some(reply.to_string());
        self
    }

    /// Fail whenever the user message contains `needle`.
    pub fn failing_on(mut self, needle: &str) -> Self {
        self.fail_on.push(needle.to_string());
        self
    }

    /// User messages received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(user.clone());
        }

        if self.fail_on.iter().any(|needle| user.contains(needle.as_str())) {
            return Err(VocardsError::Service {
                service: "mock completion".to_string(),
                message: format!("refused: {user}"),
            });
        }

        self.replies
            .iter()
            .find(|(needle, _)| user.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default_reply.clone())
            .ok_or_else(|| VocardsError::Service {
                service: "mock completion".to_string(),
                message: format!("no reply configured for: {user}"),
            })
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
