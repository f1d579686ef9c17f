use serde::Serialize;
use serde_json::Value;

use crate::adapter::{GenerationProvider, ProviderKind};

pub const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Gemini `generateContent` backend. The API key travels as the `key` query
/// parameter.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    http_client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new() -> Self {
        Self {
            endpoint: GEMINI_ENDPOINT.to_string(),
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

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

impl GenerationProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        self.http_client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
