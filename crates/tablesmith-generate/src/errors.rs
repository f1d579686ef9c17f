use thiserror::Error;

use tablesmith_providers::GenerationError;

/// The provider reply could not be parsed. Carries the reply verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    #[error("{0}")]
    Unparseable(String),
}

impl ReconciliationError {
    /// The offending provider text, unchanged.
    pub fn raw(&self) -> &str {
        match self {
            ReconciliationError::Unparseable(raw) => raw,
        }
    }
}

/// Everything that can end a generation attempt at the dispatch boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{0} is already generating")]
    Busy(String),
    #[error(transparent)]
    Validation(#[from] tablesmith_core::Error),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
}

/// Errors emitted while encoding or writing the CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
