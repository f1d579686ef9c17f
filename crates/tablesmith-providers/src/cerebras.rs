use serde::Serialize;
use serde_json::Value;

use crate::adapter::{GenerationProvider, ProviderKind};

pub const CEREBRAS_ENDPOINT: &str = "https://api.cerebras.ai/v1/chat/completions";
pub const CEREBRAS_MODEL: &str = "qwen-3-235b-a22b-instruct-2507";
pub const CEREBRAS_MAX_TOKENS: u32 = 20_000;
pub const CEREBRAS_TEMPERATURE: f64 = 0.7;
pub const CEREBRAS_TOP_P: f64 = 0.8;

/// Cerebras chat-completion backend. The prompt is sent as a single system
/// message and the key as a bearer token.
#[derive(Debug, Clone)]
pub struct CerebrasProvider {
    endpoint: String,
    http_client: reqwest::Client,
}

impl CerebrasProvider {
    pub fn new() -> Self {
        Self {
            endpoint: CEREBRAS_ENDPOINT.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }
}

impl Default for CerebrasProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    stream: bool,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl GenerationProvider for CerebrasProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cerebras
    }

    fn request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder {
        let body = ChatCompletionRequest {
            model: CEREBRAS_MODEL,
            stream: false,
            max_tokens: CEREBRAS_MAX_TOKENS,
            temperature: CEREBRAS_TEMPERATURE,
            top_p: CEREBRAS_TOP_P,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        self.http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
