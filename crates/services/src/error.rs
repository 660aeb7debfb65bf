//! Shared error types for the services crate.

use thiserror::Error;

use greeting_core::SequenceError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StageController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StageError {
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
