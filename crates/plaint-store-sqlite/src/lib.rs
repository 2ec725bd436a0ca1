//! SQLite backend for the Plaint complaint store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That thread is the single writer; the
//! version checks in [`SqliteStore`] turn stale read-then-write attempts into
//! conflicts.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
