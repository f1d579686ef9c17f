use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tablesmith_core::redact_api_key;

use crate::cerebras::CerebrasProvider;
use crate::errors::GenerationError;
use crate::gemini::GeminiProvider;

/// Supported generation backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    #[default]
    Cerebras,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::Cerebras];

    /// Identifier used in configuration and key names.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Cerebras => "cerebras",
        }
    }

    /// Key under which a user override for this provider is persisted.
    pub fn key_name(self) -> String {
        format!("apiKey_{}", self.as_str())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => f.write_str("Gemini"),
            ProviderKind::Cerebras => f.write_str("Cerebras"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "cerebras" => Ok(ProviderKind::Cerebras),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// Trait implemented by generation backends.
///
/// Implementors only describe their request envelope and where the text sits
/// in the response; sending, status handling and extraction are shared.
/// Providers hold no mutable state and can serve concurrent requests.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Build the HTTP request carrying `prompt`, authenticated with `api_key`.
    fn request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder;

    /// Pull the generated text out of a decoded response body.
    fn extract_text(&self, body: &Value) -> Option<String>;

    /// Send a single request. Failures are returned as-is; nothing is retried.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GenerationError> {
        let provider = self.kind();
        tracing::info!(
            event = "provider_request",
            provider = provider.as_str(),
            api_key = %redact_api_key(api_key),
            prompt_bytes = prompt.len()
        );

        let response = self.request(api_key, prompt).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                event = "provider_status",
                provider = provider.as_str(),
                status = status.as_u16()
            );
            return Err(GenerationError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let text = self
            .extract_text(&body)
            .filter(|text| !text.is_empty())
            .ok_or(GenerationError::EmptyResponse { provider })?;

        tracing::info!(
            event = "provider_response",
            provider = provider.as_str(),
            response_bytes = text.len()
        );
        Ok(text)
    }
}

/// Build the default provider for `kind`.
pub fn provider_for(kind: ProviderKind) -> Box<dyn GenerationProvider> {
    match kind {
        ProviderKind::Gemini => Box::new(GeminiProvider::new()),
        ProviderKind::Cerebras => Box::new(CerebrasProvider::new()),
    }
}
