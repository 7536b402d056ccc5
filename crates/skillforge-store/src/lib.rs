//! Persistence layer for skillforge.
//!
//! All state lives under a handful of well-known keys, read and written
//! as whole JSON blobs behind the [`KeyValueStore`] trait, injected into
//! anything that needs persistence so the plan/enrichment core can be
//! tested without a real database. Two implementations ship:
//! [`SqliteStore`] for the CLI and [`MemoryStore`] for tests and
//! ephemeral runs.

pub mod config;
pub mod keys;
pub mod kv;
pub mod sqlite;

pub use config::StoreConfig;
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::SqliteStore;
