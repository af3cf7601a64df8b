//! Dummy LLM provider for offline runs and tests.
//!
//! `echo` mirrors the last user message back prefixed with `[echo]`, so the
//! whole request path can be exercised without an API key. `reply` and
//! `failing` give tests a fixed answer or an injected provider fault.

use crate::llm::{ChatMessage, LlmResponse, ProviderError, Role};

#[derive(Debug, Clone)]
enum Mode {
    Echo,
    Reply(String),
    Fail(String),
}

#[derive(Debug, Clone)]
pub struct DummyProvider {
    mode: Mode,
}

impl DummyProvider {
    pub fn echo() -> Self {
        Self { mode: Mode::Echo }
    }

    /// Always answer `text`, whatever the conversation.
    pub fn reply(text: impl Into<String>) -> Self {
        Self { mode: Mode::Reply(text.into()) }
    }

    /// Always fail with a request error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { mode: Mode::Fail(reason.into()) }
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<LlmResponse, ProviderError> {
        let text = match &self.mode {
            Mode::Echo => {
                let last_user = messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.content.as_str())
                    .unwrap_or("");
                format!("[echo] {last_user}")
            }
            Mode::Reply(text) => text.clone(),
            Mode::Fail(reason) => return Err(ProviderError::Request(reason.clone())),
        };
        Ok(LlmResponse { text: text.trim().to_string(), usage: None })
    }
}
