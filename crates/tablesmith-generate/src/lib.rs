//! Prompt compilation and response reconciliation for Tablesmith.
//!
//! This crate turns a column schema into a provider-agnostic instruction,
//! dispatches it through a [`GenerationProvider`], reconciles the raw reply
//! into rows against the live schema and encodes the committed dataset as CSV.

pub mod compiler;
pub mod errors;
pub mod model;
pub mod output;
pub mod reconcile;
pub mod state;
pub mod store;

pub use compiler::{Quantity, compile};
pub use errors::{DispatchError, ExportError, ReconciliationError};
pub use model::{Dataset, GenerationRequest, Row};
pub use output::csv::{EXPORT_FILE_NAME, encode_csv, write_csv};
pub use reconcile::{cell_text, reconcile};
pub use state::{AppState, Commit, Trigger, TriggerGuard};
pub use store::DatasetStore;

pub use tablesmith_providers::GenerationProvider;
