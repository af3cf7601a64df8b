//! Chat service: turns a client transcript into one provider call and a
//! fixed-shape reply.
//!
//! `ChatService::answer` never fails. Provider errors are logged here and
//! replaced with the fallback message and an empty source list; the HTTP
//! layer always sees a [`ChatReply`].

pub mod history;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::ChatConfig;
use crate::error::AppError;
use crate::llm::{ChatMessage, LlmProvider};

pub use history::parse_history;
pub use prompt::{build_conversation, load_system_prompt, SYSTEM_INSTRUCTION};

/// Answer used whenever the provider call does not produce text.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "I’m having trouble contacting the BallotBuddy model right now. \
For urgent help with voting, please contact your local election office \
or call the non-partisan voter hotline at 866-OUR-VOTE.";

/// A reference link attached to every successful answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// The built-in source list: official Georgia election resources.
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("Georgia Secretary of State – Elections", "https://sos.ga.gov/elections"),
        Source::new("Georgia My Voter Page (MVP)", "https://mvp.sos.ga.gov/"),
        Source::new("Georgia DDS – Free Voter ID", "https://dds.georgia.gov/voter-id"),
    ]
}

/// Response body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<Source>,
}

/// Stateless request handler core. Everything inside is immutable after
/// construction, so one instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct ChatService {
    provider: LlmProvider,
    system_prompt: Arc<str>,
    sources: Arc<[Source]>,
    fallback_message: Arc<str>,
}

impl ChatService {
    pub fn new(
        provider: LlmProvider,
        system_prompt: impl Into<Arc<str>>,
        sources: Vec<Source>,
        fallback_message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            sources: sources.into(),
            fallback_message: fallback_message.into(),
        }
    }

    /// Build from `[chat]` config, reading the prompt file if one is set.
    pub fn from_config(config: &ChatConfig, provider: LlmProvider) -> Result<Self, AppError> {
        let system_prompt = load_system_prompt(config.prompt_file.as_deref())?;
        Ok(Self::new(
            provider,
            system_prompt,
            config.sources.clone(),
            config.fallback_message.as_str(),
        ))
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// The exact message list the provider will receive for `history`.
    pub fn prepare(&self, history: Vec<ChatMessage>) -> Vec<ChatMessage> {
        build_conversation(&self.system_prompt, history)
    }

    /// Parse the raw `messages` form field and answer it.
    pub async fn answer_raw(&self, raw_messages: Option<&str>) -> ChatReply {
        self.answer(parse_history(raw_messages)).await
    }

    /// One provider round-trip. Success carries the fixed sources; any
    /// failure becomes the fallback reply with no sources.
    pub async fn answer(&self, history: Vec<ChatMessage>) -> ChatReply {
        let messages = self.prepare(history);

        match self.provider.complete(&messages).await {
            Ok(response) => {
                info!(
                    provider = self.provider.name(),
                    messages = messages.len(),
                    answer_len = response.text.len(),
                    input_tokens = response.usage.map(|u| u.input_tokens),
                    output_tokens = response.usage.map(|u| u.output_tokens),
                    "answered"
                );
                ChatReply { answer: response.text, sources: self.sources.to_vec() }
            }
            Err(e) => {
                error!(provider = self.provider.name(), model = self.provider.model(), error = %e, "provider call failed; sending fallback");
                ChatReply { answer: self.fallback_message.to_string(), sources: Vec::new() }
            }
        }
    }
}
