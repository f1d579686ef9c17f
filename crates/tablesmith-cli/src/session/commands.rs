use std::path::PathBuf;

use tablesmith_core::{import_exchange, to_exchange_json};
use tablesmith_generate::{EXPORT_FILE_NAME, Quantity, write_csv};
use tablesmith_providers::provider_for;

use super::Session;
use crate::templates::{TEMPLATES, find_template};

/// Execute one line of input. Output is queued on `session.messages`.
pub async fn handle_line(session: &mut Session, input: &str) {
    let input = input.trim();
    if input.is_empty() {
        return;
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    match command {
        "/help" => cmd_help(session),
        "/columns" => {
            let columns = crate::view::render_columns(session.state.schema());
            session.push_message(columns);
        }
        "/add" => cmd_add(session, rest),
        "/edit" => cmd_edit(session, rest),
        "/rm" => cmd_remove(session, rest),
        "/move" => cmd_move(session, rest),
        "/json" => cmd_json(session),
        "/import" => cmd_import(session, rest),
        "/templates" => cmd_templates(session),
        "/template" => cmd_template(session, rest),
        "/quantity" => cmd_quantity(session, rest),
        "/provider" => cmd_provider(session, rest),
        "/generate" => cmd_generate(session).await,
        "/table" => {
            let table =
                crate::view::render_table(session.state.schema(), session.state.dataset());
            session.push_message(table);
        }
        "/export" => cmd_export(session, rest),
        "/quit" | "/exit" => session.should_quit = true,
        other => session.push_message(format!("unknown command: {other} (try /help)")),
    }
}

fn cmd_help(session: &mut Session) {
    session.push_message("schema:");
    session.push_message("  /columns");
    session.push_message("  /add [name [| description]]");
    session.push_message("  /edit <index> <name> [| description]");
    session.push_message("  /rm <index>");
    session.push_message("  /move <from> <to>");
    session.push_message("  /json");
    session.push_message("  /import <file>");
    session.push_message("  /templates");
    session.push_message("  /template <name>");
    session.push_message("generation:");
    session.push_message("  /quantity <n>");
    session.push_message("  /provider <gemini|cerebras>");
    session.push_message("  /generate");
    session.push_message("  /table");
    session.push_message("  /export [path]");
    session.push_message("  /quit");
}

fn cmd_add(session: &mut Session, rest: &str) {
    if rest.is_empty() {
        session.state.add_default_column();
        session.render();
        return;
    }

    let (name, description) = split_description(rest);
    match session.state.add_column(name, description.unwrap_or_default()) {
        Ok(_) => session.render(),
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

fn cmd_edit(session: &mut Session, rest: &str) {
    let Some((index, rest)) = rest.split_once(char::is_whitespace) else {
        session.push_message("usage: /edit <index> <name> [| description]");
        return;
    };
    let Some(index) = parse_index(session, index) else {
        return;
    };

    let (name, description) = split_description(rest.trim());
    let description = match description {
        Some(description) => description.to_string(),
        None => session
            .state
            .schema()
            .get(index)
            .map(|col| col.description.clone())
            .unwrap_or_default(),
    };

    match session.state.update_column(index, name, &description) {
        Ok(()) => session.render(),
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

fn cmd_remove(session: &mut Session, rest: &str) {
    let Some(index) = parse_index(session, rest) else {
        return;
    };
    match session.state.remove_column(index) {
        Ok(_) => session.render(),
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

fn cmd_move(session: &mut Session, rest: &str) {
    let mut parts = rest.split_whitespace();
    let (Some(from), Some(to)) = (parts.next(), parts.next()) else {
        session.push_message("usage: /move <from> <to>");
        return;
    };
    let (Some(from), Some(to)) = (parse_index(session, from), parse_index(session, to)) else {
        return;
    };
    match session.state.move_column(from, to) {
        Ok(()) => session.render(),
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

fn cmd_json(session: &mut Session) {
    match to_exchange_json(session.state.schema()) {
        Ok(json) => session.push_message(json),
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

fn cmd_import(session: &mut Session, rest: &str) {
    if rest.is_empty() {
        session.push_message("usage: /import <file>");
        return;
    }

    let text = match std::fs::read_to_string(rest) {
        Ok(text) => text,
        Err(err) => {
            session.push_message(format!("error: cannot read {rest}: {err}"));
            return;
        }
    };

    match import_exchange(&text) {
        Ok(import) => {
            for issue in &import.issues {
                session.push_message(format!("warning: {issue}"));
            }
            session.state.replace_schema(import.schema);
            session.render();
        }
        Err(err) => session.push_message(format!("error: {err} (schema unchanged)")),
    }
}

fn cmd_templates(session: &mut Session) {
    for template in TEMPLATES {
        session.push_message(format!(
            "  {} ({}): {} columns",
            template.name,
            template.table_name,
            template.columns.len()
        ));
    }
}

fn cmd_template(session: &mut Session, rest: &str) {
    match find_template(rest) {
        Some(template) => {
            session.state.replace_schema(template.schema());
            session.render();
        }
        None => session.push_message(format!("unknown template: {rest} (try /templates)")),
    }
}

fn cmd_quantity(session: &mut Session, rest: &str) {
    session.quantity = Quantity::parse(rest);
    session.push_message(format!("quantity: {}", session.quantity));
}

fn cmd_provider(session: &mut Session, rest: &str) {
    match rest.parse() {
        Ok(provider) => {
            session.provider = provider;
            session.push_message(format!("provider: {}", session.provider));
        }
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

async fn cmd_generate(session: &mut Session) {
    let provider = provider_for(session.provider);
    let api_key = session.keys.resolve(session.provider).to_string();
    session.push_message(format!(
        "generating {} rows with {}...",
        session.quantity, session.provider
    ));

    let result = session
        .state
        .generate(
            &session.trigger,
            provider.as_ref(),
            &api_key,
            session.quantity,
        )
        .await;

    match result {
        Ok(commit) => session.push_message(format!(
            "committed {} rows (version {})",
            commit.rows, commit.version
        )),
        Err(err) => session.push_message(format!("error: {err}")),
    }
    session.render();
}

fn cmd_export(session: &mut Session, rest: &str) {
    if session.state.dataset().is_empty() {
        session.push_message("nothing to export: generate data first");
        return;
    }

    let path = if rest.is_empty() {
        session.paths.out_dir.join(EXPORT_FILE_NAME)
    } else {
        PathBuf::from(rest)
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            session.push_message(format!("error: {err}"));
            return;
        }
    }

    match write_csv(&path, session.state.schema(), session.state.dataset()) {
        Ok(bytes) => {
            tracing::info!(event = "csv_exported", path = %path.display(), bytes = bytes);
            session.push_message(format!("exported {} ({bytes} bytes)", path.display()));
        }
        Err(err) => session.push_message(format!("error: {err}")),
    }
}

/// Split `name | description`. No separator means no description was given.
fn split_description(input: &str) -> (&str, Option<&str>) {
    match input.split_once('|') {
        Some((name, description)) => (name.trim(), Some(description.trim())),
        None => (input.trim(), None),
    }
}

fn parse_index(session: &mut Session, input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => {
            session.push_message(format!("error: not a column index: {input}"));
            None
        }
    }
}
