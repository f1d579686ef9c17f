use tablesmith_providers::ApiKeys;

use super::atomic::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

/// Load the per-provider key overrides, creating an empty file on first use.
pub fn load_or_create_keys(paths: &WorkspacePaths) -> WorkspaceResult<ApiKeys> {
    let path = paths.keys_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let keys: ApiKeys = toml::from_str(&content)?;
        return Ok(keys);
    }

    let keys = ApiKeys::default();
    save_keys(paths, &keys)?;
    Ok(keys)
}

pub fn save_keys(paths: &WorkspacePaths, keys: &ApiKeys) -> WorkspaceResult<()> {
    let path = paths.keys_path();
    let encoded = toml::to_string_pretty(keys)?;
    write_bytes_atomic(&path, encoded.as_bytes())
}
