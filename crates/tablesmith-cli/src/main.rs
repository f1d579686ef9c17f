mod registry;
mod session;
mod templates;
mod view;
mod workspace;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tablesmith_core::{
    Error as CoreError, Schema, import_exchange, redact_api_key, to_exchange_json,
};
use tablesmith_generate::{
    AppState, DispatchError, ExportError, Quantity, Trigger, compile, write_csv,
};
use tablesmith_providers::{GenerationProvider, ProviderKind, provider_for};
use thiserror::Error;
use uuid::Uuid;

use registry::{
    RunContext, init_file_logging, start_run, write_dataset, write_prompt, write_response,
};
use session::Session;
use templates::{TEMPLATES, find_template};
use view::render_table;
use workspace::{
    WorkspacePaths, load_or_create_keys, load_or_create_settings, save_keys, save_settings,
};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "tablesmith", version, about = "Generate tabular fake data with an LLM")]
struct Cli {
    /// Workspace directory holding settings, keys, runs and logs.
    #[arg(long, global = true, default_value = ".tablesmith")]
    workspace: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate rows once and write a run directory.
    Generate(GenerateArgs),
    /// Print the compiled instruction without calling a provider.
    Prompt(PromptArgs),
    /// List or show built-in schema templates.
    Templates {
        #[command(subcommand)]
        action: Option<TemplatesAction>,
    },
    /// Manage per-provider API key overrides.
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Show or change workspace defaults.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Edit a schema and generate interactively.
    Session(SessionArgs),
}

#[derive(Args, Debug)]
struct SchemaSource {
    /// Schema exchange document: a JSON array of {name, description}.
    #[arg(long, value_name = "FILE", conflicts_with = "template")]
    schema: Option<PathBuf>,
    /// Built-in template name (e.g. `users`).
    #[arg(long, value_name = "NAME")]
    template: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    source: SchemaSource,
    /// Number of rows to request.
    #[arg(long)]
    quantity: Option<String>,
    /// Provider to call (gemini or cerebras).
    #[arg(long)]
    provider: Option<ProviderKind>,
    /// Extra copy of the CSV export.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output directory for runs (defaults to the workspace runs dir).
    #[arg(long)]
    run_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PromptArgs {
    #[command(flatten)]
    source: SchemaSource,
    #[arg(long)]
    quantity: Option<String>,
}

#[derive(Args, Debug)]
struct SessionArgs {
    #[command(flatten)]
    source: SchemaSource,
}

#[derive(Subcommand, Debug)]
enum TemplatesAction {
    List,
    /// Print a template as a schema exchange document.
    Show { name: String },
}

#[derive(Subcommand, Debug)]
enum KeysAction {
    Show,
    Set { provider: ProviderKind, key: String },
    Clear { provider: ProviderKind },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let paths = WorkspacePaths::new(cli.workspace);

    match cli.command {
        Command::Generate(args) => run_generate(&paths, args).await,
        Command::Prompt(args) => run_prompt(&paths, args),
        Command::Templates { action } => run_templates(action.unwrap_or(TemplatesAction::List)),
        Command::Keys { action } => run_keys(&paths, action),
        Command::Config { action } => run_config(&paths, action),
        Command::Session(args) => run_session(&paths, args).await,
    }
}

async fn run_generate(paths: &WorkspacePaths, args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        source,
        quantity,
        provider,
        out,
        run_dir,
    } = args;

    paths.ensure_dirs()?;
    let settings = load_or_create_settings(paths)?;
    let keys = load_or_create_keys(paths)?;

    let (schema, schema_source) = load_schema(&source)?;
    let provider_kind = provider.unwrap_or(settings.provider);
    let quantity = quantity
        .as_deref()
        .map(Quantity::parse)
        .unwrap_or(settings.quantity);
    let api_key = keys.resolve(provider_kind).to_string();

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        provider: provider_kind,
        quantity,
        api_key: redact_api_key(&api_key),
        schema_source,
        schema: schema.clone(),
        run_dir: run_dir.unwrap_or_else(|| paths.runs_dir.clone()),
    };

    let run_paths = start_run(&run_ctx)?;
    init_file_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, provider = provider_kind.as_str());
    let timer = Instant::now();

    let mut state = AppState::with_schema(schema);
    let trigger = Trigger::new("generate");
    let provider = provider_for(provider_kind);

    let commit = {
        let _guard = trigger.engage()?;
        let request = state.prepare(provider_kind, &api_key, quantity)?;
        write_prompt(&run_paths, request.prompt())?;

        let outcome = provider.generate(request.api_key(), request.prompt()).await;
        if let Ok(raw) = &outcome {
            write_response(&run_paths, raw)?;
        }
        state.settle(&request, outcome)
    };

    let commit = match commit {
        Ok(commit) => commit,
        Err(err) => {
            tracing::info!(
                event = "run_finished",
                status = "failed",
                duration_ms = timer.elapsed().as_millis() as u64
            );
            return Err(err.into());
        }
    };

    write_dataset(&run_paths, state.dataset())?;
    let bytes = write_csv(&run_paths.csv_path, state.schema(), state.dataset())?;
    tracing::info!(event = "csv_written", path = %run_paths.csv_path.display(), bytes = bytes);

    if let Some(out) = out {
        if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_csv(&out, state.schema(), state.dataset())?;
        tracing::info!(event = "csv_written", path = %out.display());
    }

    println!("{}", render_table(state.schema(), state.dataset()));
    println!(
        "{} rows from {} -> {}",
        commit.rows,
        provider_kind,
        run_paths.root.display()
    );

    tracing::info!(
        event = "run_finished",
        status = "success",
        rows = commit.rows,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

fn run_prompt(paths: &WorkspacePaths, args: PromptArgs) -> Result<(), CliError> {
    let (schema, _) = load_schema(&args.source)?;
    let quantity = match args.quantity.as_deref() {
        Some(value) => Quantity::parse(value),
        None if paths.settings_path().exists() => load_or_create_settings(paths)?.quantity,
        None => workspace::WorkspaceSettings::default().quantity,
    };

    tablesmith_core::validate_for_generation(&schema)?;
    println!("{}", compile(&schema, quantity));
    Ok(())
}

fn run_templates(action: TemplatesAction) -> Result<(), CliError> {
    match action {
        TemplatesAction::List => {
            for template in TEMPLATES {
                println!(
                    "{:<16} {:<10} {}",
                    template.table_name,
                    template.columns.len(),
                    template.name
                );
            }
        }
        TemplatesAction::Show { name } => {
            let template = find_template(&name)
                .ok_or_else(|| CliError::InvalidConfig(format!("unknown template: {name}")))?;
            println!("{}", to_exchange_json(&template.schema())?);
        }
    }
    Ok(())
}

fn run_keys(paths: &WorkspacePaths, action: KeysAction) -> Result<(), CliError> {
    paths.ensure_dirs()?;
    let mut keys = load_or_create_keys(paths)?;

    match action {
        KeysAction::Show => {
            for provider in ProviderKind::ALL {
                let origin = if keys.override_for(provider).is_some() {
                    "override"
                } else {
                    "default"
                };
                println!(
                    "{:<24} {:<12} {}",
                    provider.key_name(),
                    redact_api_key(keys.resolve(provider)),
                    origin
                );
            }
        }
        KeysAction::Set { provider, key } => {
            keys.set(provider, &key);
            save_keys(paths, &keys)?;
            println!("{} = {}", provider.key_name(), redact_api_key(&key));
        }
        KeysAction::Clear { provider } => {
            if keys.clear(provider) {
                save_keys(paths, &keys)?;
                println!("{} cleared", provider.key_name());
            } else {
                println!("{} was not set", provider.key_name());
            }
        }
    }
    Ok(())
}

fn run_config(paths: &WorkspacePaths, action: ConfigAction) -> Result<(), CliError> {
    paths.ensure_dirs()?;
    let mut settings = load_or_create_settings(paths)?;

    match action {
        ConfigAction::Show => {
            println!("provider: {}", settings.provider.as_str());
            println!("quantity: {}", settings.quantity);
            println!("workspace: {}", paths.root.display());
        }
        ConfigAction::Set { key, value } => {
            settings.set(&key, &value)?;
            save_settings(paths, &settings)?;
            println!("{key} updated");
        }
    }
    Ok(())
}

async fn run_session(paths: &WorkspacePaths, args: SessionArgs) -> Result<(), CliError> {
    paths.ensure_dirs()?;
    let settings = load_or_create_settings(paths)?;
    let keys = load_or_create_keys(paths)?;
    init_file_logging(&paths.cli_log_path())?;

    let schema = if args.source.schema.is_some() || args.source.template.is_some() {
        load_schema(&args.source)?.0
    } else {
        Schema::new()
    };

    tracing::info!(event = "session_started", columns = schema.len());
    let session = Session::new(paths.clone(), schema, settings.provider, settings.quantity, keys);
    session::run(session).await
}

/// Resolve `--schema` / `--template` into a schema and a label for it.
fn load_schema(source: &SchemaSource) -> Result<(Schema, String), CliError> {
    if let Some(path) = &source.schema {
        let text = std::fs::read_to_string(path)?;
        let import = import_exchange(&text)?;
        for issue in &import.issues {
            eprintln!("warning: {issue}");
        }
        return Ok((import.schema, path.display().to_string()));
    }

    if let Some(name) = &source.template {
        let template = find_template(name)
            .ok_or_else(|| CliError::InvalidConfig(format!("unknown template: {name}")))?;
        return Ok((template.schema(), format!("template:{}", template.table_name)));
    }

    Err(CliError::InvalidConfig(
        "either --schema or --template is required".to_string(),
    ))
}
