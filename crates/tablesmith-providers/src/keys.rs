use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adapter::ProviderKind;

/// Built-in placeholder key for Gemini.
pub const DEFAULT_GEMINI_KEY: &str = "zyz-asd";
/// Built-in placeholder key for Cerebras.
pub const DEFAULT_CEREBRAS_KEY: &str = "zyz-dsa";

impl ProviderKind {
    pub fn default_api_key(self) -> &'static str {
        match self {
            ProviderKind::Gemini => DEFAULT_GEMINI_KEY,
            ProviderKind::Cerebras => DEFAULT_CEREBRAS_KEY,
        }
    }
}

/// Per-provider API key overrides, keyed `apiKey_<provider>`.
///
/// These are plain strings; they are not a security boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeys {
    overrides: BTreeMap<String, String>,
}

impl ApiKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, provider: ProviderKind, key: &str) {
        self.overrides
            .insert(provider.key_name(), key.trim().to_string());
    }

    pub fn clear(&mut self, provider: ProviderKind) -> bool {
        self.overrides.remove(&provider.key_name()).is_some()
    }

    /// The stored override, if one is set and non-empty.
    pub fn override_for(&self, provider: ProviderKind) -> Option<&str> {
        self.overrides
            .get(&provider.key_name())
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// Override first, built-in default second.
    pub fn resolve(&self, provider: ProviderKind) -> &str {
        self.override_for(provider)
            .unwrap_or_else(|| provider.default_api_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_key() {
        let keys = ApiKeys::new();
        assert_eq!(keys.resolve(ProviderKind::Gemini), DEFAULT_GEMINI_KEY);
        assert_eq!(keys.resolve(ProviderKind::Cerebras), DEFAULT_CEREBRAS_KEY);
    }

    #[test]
    fn override_wins_per_provider() {
        let mut keys = ApiKeys::new();
        keys.set(ProviderKind::Gemini, " user-key ");
        assert_eq!(keys.resolve(ProviderKind::Gemini), "user-key");
        assert_eq!(keys.resolve(ProviderKind::Cerebras), DEFAULT_CEREBRAS_KEY);
    }

    #[test]
    fn empty_override_is_ignored() {
        let mut keys = ApiKeys::new();
        keys.set(ProviderKind::Cerebras, "");
        assert_eq!(keys.resolve(ProviderKind::Cerebras), DEFAULT_CEREBRAS_KEY);
        assert!(keys.clear(ProviderKind::Cerebras));
        assert!(!keys.clear(ProviderKind::Cerebras));
    }

    #[test]
    fn serializes_with_storage_key_names() {
        let mut keys = ApiKeys::new();
        keys.set(ProviderKind::Gemini, "abc");
        let json = serde_json::to_value(&keys).expect("serialize keys");
        assert_eq!(json, serde_json::json!({ "apiKey_gemini": "abc" }));
    }
}
