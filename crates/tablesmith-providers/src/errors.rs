use thiserror::Error;

use crate::adapter::ProviderKind;

/// Errors raised while calling a generation provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{provider} API error: {status}")]
    Status { provider: ProviderKind, status: u16 },
    #[error("empty response")]
    EmptyResponse { provider: ProviderKind },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
