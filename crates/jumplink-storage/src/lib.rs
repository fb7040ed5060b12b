//! Storage backends for the Jumplink short-link store.
//!
//! Two interchangeable implementations of [`Repository`]:
//!
//! - [`FlatFileRepository`]: an append-only `code,url` text file.
//! - [`SqliteRepository`]: a `urls` table with a hit counter.

pub mod flat_file;
pub mod sqlite;

pub use flat_file::FlatFileRepository;
pub use jumplink_core::{ReadRepository, Repository, StorageError};
pub use sqlite::SqliteRepository;
