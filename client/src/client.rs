//! HTTP client issuing generation and chat requests for resolved roles.

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

use registry::{RoleRegistry, Target};

use crate::wire::{ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, Message};

/// Generation can involve a long-running model; give it far more room than
/// a liveness probe.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unknown role {0:?}")]
    UnknownRole(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    BadStatus(u16),
    #[error("malformed response body")]
    InvalidResponse,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Issues generate and chat requests against whichever server a role
/// resolves to. The registry decides the target; this type only speaks the
/// wire format.
pub struct OllamaClient {
    registry: RoleRegistry,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(registry: RoleRegistry) -> Self {
        Self {
            registry,
            http: reqwest::Client::new(),
        }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Generate text with the model behind `role`, with the failure cause
    /// intact. Unknown roles fail before any network traffic.
    pub async fn try_generate(
        &self,
        role: &str,
        prompt: &str,
        options: Map<String, Value>,
    ) -> Result<String, ClientError> {
        let spec = self
            .registry
            .resolve(role)
            .ok_or_else(|| ClientError::UnknownRole(role.to_string()))?;
        let target = Target::new(self.registry.host(), spec.port);
        let body = GenerateRequest::new(spec.model.clone(), prompt).with_options(options);
        let resp = self
            .http
            .post(format!("{}/api/generate", target.base_url()))
            .timeout(GENERATE_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClientError::BadStatus(resp.status().as_u16()));
        }
        let decoded: GenerateResponse =
            resp.json().await.map_err(|_| ClientError::InvalidResponse)?;
        Ok(decoded.response)
    }

    /// Fail-soft [`try_generate`]: any failure logs and folds into `None`.
    ///
    /// [`try_generate`]: OllamaClient::try_generate
    pub async fn generate(
        &self,
        role: &str,
        prompt: &str,
        options: Map<String, Value>,
    ) -> Option<String> {
        match self.try_generate(role, prompt, options).await {
            Ok(text) => Some(text),
            Err(err) => {
                error!(role, %err, "generate request failed");
                None
            }
        }
    }

    /// Run a chat exchange with the model behind `role`, returning the
    /// assistant's reply content.
    pub async fn try_chat(
        &self,
        role: &str,
        messages: Vec<Message>,
    ) -> Result<String, ClientError> {
        let spec = self
            .registry
            .resolve(role)
            .ok_or_else(|| ClientError::UnknownRole(role.to_string()))?;
        let target = Target::new(self.registry.host(), spec.port);
        let body = ChatRequest::new(spec.model.clone(), messages);
        let resp = self
            .http
            .post(format!("{}/api/chat", target.base_url()))
            .timeout(GENERATE_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClientError::BadStatus(resp.status().as_u16()));
        }
        let decoded: ChatResponse = resp.json().await.map_err(|_| ClientError::InvalidResponse)?;
        Ok(decoded.message.content)
    }

    /// Fail-soft [`try_chat`]: any failure logs and folds into `None`.
    ///
    /// [`try_chat`]: OllamaClient::try_chat
    pub async fn chat(&self, role: &str, messages: Vec<Message>) -> Option<String> {
        match self.try_chat(role, messages).await {
            Ok(text) => Some(text),
            Err(err) => {
                error!(role, %err, "chat request failed");
                None
            }
        }
    }
}
