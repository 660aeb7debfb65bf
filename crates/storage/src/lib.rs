#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{FlagRecord, FlagRepository, InMemoryRepository, Storage, StorageError};
