//! Minimal capability surface for chat-framework integrations.
//!
//! Orchestration frameworks only need "give it a prompt, get text back".
//! [`Prompter`] is that surface, and [`BoundClient`] implements it for one
//! fixed role so the registry's shape never leaks into the framework side.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::OllamaClient;
use crate::wire::Message;

/// Something that can turn a prompt or conversation into text. Failures
/// fold into an empty string; integrations treat that as "no answer".
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn invoke(&self, prompt: &str) -> String;

    async fn chat(&self, messages: Vec<Message>) -> String;
}

/// An [`OllamaClient`] pinned to a single role.
#[derive(Clone)]
pub struct BoundClient {
    client: Arc<OllamaClient>,
    role: String,
}

impl BoundClient {
    pub fn new(client: Arc<OllamaClient>, role: impl Into<String>) -> Self {
        Self {
            client,
            role: role.into(),
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Model name the bound role maps to, if the role exists.
    pub fn model(&self) -> Option<String> {
        self.client
            .registry()
            .resolve(&self.role)
            .map(|spec| spec.model.clone())
    }

    /// Base URL of the bound role's server, if the role exists.
    pub fn base_url(&self) -> Option<String> {
        self.client
            .registry()
            .target(&self.role)
            .map(|t| t.base_url())
    }
}

#[async_trait]
impl Prompter for BoundClient {
    async fn invoke(&self, prompt: &str) -> String {
        self.client
            .generate(&self.role, prompt, Default::default())
            .await
            .unwrap_or_default()
    }

    async fn chat(&self, messages: Vec<Message>) -> String {
        self.client
            .chat(&self.role, messages)
            .await
            .unwrap_or_default()
    }
}
