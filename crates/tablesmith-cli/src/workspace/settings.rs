use serde::{Deserialize, Serialize};

use tablesmith_generate::Quantity;
use tablesmith_providers::ProviderKind;

use super::atomic::write_bytes_atomic;
use super::{WorkspaceError, WorkspacePaths, WorkspaceResult};

pub const DEFAULT_QUANTITY: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Provider used when no `--provider` flag is given.
    pub provider: ProviderKind,
    /// Rows requested when no `--quantity` flag is given.
    pub quantity: Quantity,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            quantity: Quantity::new(DEFAULT_QUANTITY),
        }
    }
}

impl WorkspaceSettings {
    /// Apply a `config set` pair.
    pub fn set(&mut self, key: &str, value: &str) -> WorkspaceResult<()> {
        match key {
            "provider" => {
                self.provider = value.parse().map_err(WorkspaceError::Invalid)?;
            }
            "quantity" => {
                self.quantity = Quantity::parse(value);
            }
            other => {
                return Err(WorkspaceError::Invalid(format!(
                    "unknown setting: {other} (expected provider or quantity)"
                )));
            }
        }
        Ok(())
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: WorkspaceSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let path = paths.settings_path();
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&path, encoded.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let settings = WorkspaceSettings::default();
        assert_eq!(settings.provider, ProviderKind::Cerebras);
        assert_eq!(settings.quantity.get(), DEFAULT_QUANTITY);
    }

    #[test]
    fn set_coerces_quantity_and_rejects_unknown_keys() {
        let mut settings = WorkspaceSettings::default();
        settings.set("quantity", "-4").expect("set quantity");
        assert_eq!(settings.quantity, Quantity::MIN);
        settings.set("provider", "gemini").expect("set provider");
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert!(settings.set("provider", "other").is_err());
        assert!(settings.set("color", "blue").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let settings = WorkspaceSettings {
            provider: ProviderKind::Gemini,
            quantity: Quantity::new(5),
        };
        let encoded = toml::to_string_pretty(&settings).expect("encode");
        assert!(encoded.contains("provider = \"gemini\""));
        let decoded: WorkspaceSettings = toml::from_str(&encoded).expect("decode");
        assert_eq!(decoded, settings);
    }
}
