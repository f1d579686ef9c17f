use std::sync::atomic::{AtomicBool, Ordering};

use tablesmith_core::{ColumnDefinition, Result as CoreResult, Schema, validate_for_generation};
use tablesmith_providers::{GenerationError, GenerationProvider, ProviderKind};

use crate::compiler::Quantity;
use crate::errors::DispatchError;
use crate::model::{Dataset, GenerationRequest};
use crate::reconcile::reconcile;
use crate::store::DatasetStore;

/// A control that starts generations and stays disabled while one is in flight.
///
/// Triggers are independent of each other: two triggers can each have a
/// request in flight and their commits race (last commit wins).
#[derive(Debug)]
pub struct Trigger {
    name: String,
    in_flight: AtomicBool,
}

impl Trigger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    /// Disable the trigger until the returned guard is dropped.
    pub fn engage(&self) -> Result<TriggerGuard<'_>, DispatchError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DispatchError::Busy(self.name.clone()))?;
        Ok(TriggerGuard { trigger: self })
    }
}

/// Re-enables its trigger on drop, whatever the outcome.
#[derive(Debug)]
pub struct TriggerGuard<'a> {
    trigger: &'a Trigger,
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.trigger.in_flight.store(false, Ordering::Release);
    }
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub version: u64,
    pub rows: usize,
}

/// Application state: the live schema and the dataset store.
///
/// Schema edits are synchronous and complete before the next read. Only the
/// settle step writes the dataset.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    schema: Schema,
    store: DatasetStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            store: DatasetStore::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn dataset(&self) -> &Dataset {
        self.store.current()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn add_column(&mut self, name: &str, description: &str) -> CoreResult<usize> {
        let index = self.schema.add_column(name, description)?;
        tracing::info!(event = "column_added", index = index, name = %name.trim());
        Ok(index)
    }

    pub fn add_default_column(&mut self) -> usize {
        let index = self.schema.add_default_column();
        tracing::info!(event = "column_added", index = index, default = true);
        index
    }

    pub fn update_column(&mut self, index: usize, name: &str, description: &str) -> CoreResult<()> {
        self.schema.update_column(index, name, description)?;
        tracing::info!(event = "column_updated", index = index);
        Ok(())
    }

    pub fn remove_column(&mut self, index: usize) -> CoreResult<ColumnDefinition> {
        let removed = self.schema.remove_column(index)?;
        tracing::info!(event = "column_removed", index = index, name = %removed.name);
        Ok(removed)
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> CoreResult<()> {
        self.schema.move_column(from, to)?;
        tracing::info!(event = "column_moved", from = from, to = to);
        Ok(())
    }

    /// Replace the whole schema. The committed dataset is kept and projected
    /// onto the new columns by readers.
    pub fn replace_schema(&mut self, schema: Schema) {
        tracing::info!(event = "schema_replaced", columns = schema.len());
        self.schema = schema;
    }

    /// Snapshot the live schema into a request. Fails on an empty schema.
    pub fn prepare(
        &self,
        provider: ProviderKind,
        api_key: &str,
        quantity: Quantity,
    ) -> Result<GenerationRequest, DispatchError> {
        validate_for_generation(&self.schema)?;
        Ok(GenerationRequest::new(
            self.schema.clone(),
            quantity,
            provider,
            api_key,
        ))
    }

    /// Apply the terminal action for a finished request: commit the
    /// reconciled rows, or clear the dataset and hand back the error.
    ///
    /// Rows are shaped by the schema that is live now, not the snapshot.
    pub fn settle(
        &mut self,
        request: &GenerationRequest,
        outcome: Result<String, GenerationError>,
    ) -> Result<Commit, DispatchError> {
        let result = outcome
            .map_err(DispatchError::from)
            .and_then(|raw| reconcile(&raw, &self.schema).map_err(DispatchError::from));

        match result {
            Ok(dataset) => {
                let rows = dataset.len();
                let version = self
                    .store
                    .commit(dataset.with_source(request.schema().clone()));
                tracing::info!(
                    event = "generation_committed",
                    provider = request.provider().as_str(),
                    rows = rows,
                    version = version
                );
                Ok(Commit { version, rows })
            }
            Err(err) => {
                self.reset_after(&err);
                Err(err)
            }
        }
    }

    /// Run one generation end to end behind `trigger`.
    ///
    /// Exactly one terminal action happens: a commit, or a clear plus the
    /// returned error. A busy trigger is rejected without touching state.
    ///
    /// The state stays mutably borrowed across the provider call, so nothing
    /// can edit the schema or start a second generation until it returns.
    /// Callers that need edits or other triggers to run while a request is in
    /// flight use [`AppState::prepare`] and [`AppState::settle`] directly.
    pub async fn generate(
        &mut self,
        trigger: &Trigger,
        provider: &dyn GenerationProvider,
        api_key: &str,
        quantity: Quantity,
    ) -> Result<Commit, DispatchError> {
        let _guard = trigger.engage()?;

        let request = match self.prepare(provider.kind(), api_key, quantity) {
            Ok(request) => request,
            Err(err) => {
                self.reset_after(&err);
                return Err(err);
            }
        };

        tracing::info!(
            event = "generation_started",
            trigger = trigger.name(),
            provider = request.provider().as_str(),
            quantity = request.quantity().get(),
            columns = request.schema().len()
        );

        let outcome = provider.generate(request.api_key(), request.prompt()).await;
        self.settle(&request, outcome)
    }

    fn reset_after(&mut self, err: &DispatchError) {
        tracing::warn!(event = "generation_failed", error = %err);
        let version = self.store.clear();
        tracing::info!(event = "dataset_cleared", version = version);
    }
}
