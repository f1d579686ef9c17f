use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tablesmith_core::{SCHEMA_VERSION, Schema};
use tablesmith_generate::{Dataset, EXPORT_FILE_NAME, Quantity};
use tablesmith_providers::ProviderKind;

use super::RegistryResult;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub provider: ProviderKind,
    pub quantity: Quantity,
    /// Redacted form of the key in use.
    pub api_key: String,
    /// Where the schema came from (file path or template name).
    pub schema_source: String,
    pub schema: Schema,
    pub run_dir: PathBuf,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub schema_version: String,
    pub provider: ProviderKind,
    pub quantity: Quantity,
    pub api_key: String,
    pub schema_source: String,
    pub schema: Schema,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub prompt_path: PathBuf,
    pub response_path: PathBuf,
    pub dataset_path: PathBuf,
    pub csv_path: PathBuf,
    pub logs_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        schema_version: SCHEMA_VERSION.to_string(),
        provider: ctx.provider,
        quantity: ctx.quantity,
        api_key: ctx.api_key.clone(),
        schema_source: ctx.schema_source.clone(),
        schema: ctx.schema.clone(),
        git: collect_git_info(),
    };
    write_json(&root.join("config.json"), &config)?;

    let logs_path = root.join("logs.ndjson");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)?;

    Ok(RunPaths {
        prompt_path: root.join("prompt.txt"),
        response_path: root.join("response.txt"),
        dataset_path: root.join("dataset.json"),
        csv_path: root.join(EXPORT_FILE_NAME),
        logs_path,
        root,
    })
}

pub fn write_prompt(paths: &RunPaths, prompt: &str) -> RegistryResult<()> {
    std::fs::write(&paths.prompt_path, prompt)?;
    Ok(())
}

pub fn write_response(paths: &RunPaths, raw: &str) -> RegistryResult<()> {
    std::fs::write(&paths.response_path, raw)?;
    Ok(())
}

pub fn write_dataset(paths: &RunPaths, dataset: &Dataset) -> RegistryResult<()> {
    write_json(&paths.dataset_path, dataset)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}
