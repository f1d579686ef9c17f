//! Interactive, line-driven schema editor and generator.

pub mod commands;

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use tablesmith_core::Schema;
use tablesmith_generate::{AppState, Quantity, Trigger};
use tablesmith_providers::{ApiKeys, ProviderKind};

use crate::CliError;
use crate::view::{render_columns, render_table};
use crate::workspace::WorkspacePaths;

pub use commands::handle_line;

pub const MAX_MESSAGES: usize = 1000;

/// Everything one interactive session owns.
pub struct Session {
    pub state: AppState,
    pub trigger: Trigger,
    pub provider: ProviderKind,
    pub quantity: Quantity,
    pub keys: ApiKeys,
    pub paths: WorkspacePaths,
    pub messages: Vec<String>,
    pub should_quit: bool,
}

impl Session {
    pub fn new(
        paths: WorkspacePaths,
        schema: Schema,
        provider: ProviderKind,
        quantity: Quantity,
        keys: ApiKeys,
    ) -> Self {
        Self {
            state: AppState::with_schema(schema),
            trigger: Trigger::new("session"),
            provider,
            quantity,
            keys,
            paths,
            messages: Vec::new(),
            should_quit: false,
        }
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > MAX_MESSAGES {
            let overflow = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(0..overflow);
        }
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Re-render the column list and table from current state.
    pub fn render(&mut self) {
        let columns = render_columns(self.state.schema());
        let table = render_table(self.state.schema(), self.state.dataset());
        self.push_message("columns:");
        self.push_message(columns);
        self.push_message(table);
    }
}

/// Read commands from stdin until `/quit` or end of input.
pub async fn run(mut session: Session) -> Result<(), CliError> {
    session.push_message("tablesmith session: type /help for commands");
    session.render();
    flush_messages(&mut session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while !session.should_quit {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        handle_line(&mut session, &line).await;
        flush_messages(&mut session)?;
    }

    tracing::info!(event = "session_finished", version = session.state.version());
    Ok(())
}

fn flush_messages(session: &mut Session) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    for message in session.take_messages() {
        writeln!(stdout, "{message}")?;
    }
    stdout.flush()?;
    Ok(())
}
