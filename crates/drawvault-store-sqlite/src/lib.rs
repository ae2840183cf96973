//! SQLite backend for the Drawvault draw-results store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The reconcile policy runs
//! inside a single transaction per record, so the lookup and the
//! insert-or-merge decision cannot race against another writer.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
