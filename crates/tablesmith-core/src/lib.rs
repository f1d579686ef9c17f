//! Core contracts and helpers for Tablesmith.
//!
//! This crate defines the column schema model, the JSON exchange format used
//! to edit it, and utilities shared by the providers, the generation pipeline
//! and the CLI.

pub mod error;
pub mod exchange;
pub mod redaction;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
pub use exchange::{ExchangeImport, exchange_json_schema, import_exchange, to_exchange_json};
pub use redaction::redact_api_key;
pub use schema::{ColumnDefinition, DEFAULT_COLUMN_DESCRIPTION, Schema};
pub use validation::validate_for_generation;

/// Contract version for exported schema documents.
pub const SCHEMA_VERSION: &str = "0.1";
