//! JSON bodies for the generate and chat endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker roles for a chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Message in a chat exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body for `POST /api/generate`. `stream` is pinned to `false` because the
/// response is decoded as a single JSON object.
#[derive(Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options: Map::new(),
        }
    }

    /// Extra top-level fields to merge into the request body.
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// Body for `POST /api/chat`, also non-streaming.
#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            stream: false,
        }
    }
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_flattens_options() {
        let mut options = Map::new();
        options.insert("temperature".into(), Value::from(0.2));
        let req = GenerateRequest::new("m1", "hi").with_options(options);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["model"], "m1");
        assert_eq!(body["prompt"], "hi");
        assert_eq!(body["stream"], false);
        assert_eq!(body["temperature"], 0.2);
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        let req = ChatRequest::new("m1", vec![Message::user("hello")]);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }
}
