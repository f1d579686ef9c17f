//! Generation backends for Tablesmith.
//!
//! Each provider turns a compiled prompt into a provider-specific HTTP
//! request and pulls the generated text back out of the response envelope.

pub mod adapter;
pub mod cerebras;
pub mod errors;
pub mod gemini;
pub mod keys;

pub use adapter::{GenerationProvider, ProviderKind, provider_for};
pub use cerebras::CerebrasProvider;
pub use errors::GenerationError;
pub use gemini::GeminiProvider;
pub use keys::ApiKeys;
