//! # Arena Persistence
//!
//! Storage for the rating ledger: every parameter rating, combination
//! rating and experiment record, kept as one document.
//!
//! Supports:
//! - In-memory (for testing)
//! - JSON file with atomic replace (for single-node)

pub mod backend;
pub mod file;

pub use backend::{LedgerStore, MemoryLedgerStore, StorageError};
pub use file::JsonFileStore;
