//! Storage layer for hooks-store
//!
//! Meilisearch-backed event store plus the backfill passes that keep
//! previously indexed documents in line with the current transformation.

mod error;
pub mod meili;
mod migrations;
#[cfg(test)]
mod tests;
mod traits;

pub use error::StorageError;
pub use meili::{MeiliConfig, MeiliStore};
pub use migrations::{MigrationError, Migrator};
pub use traits::{BackfillStore, DocumentPage, EventStore};
