//! Core types and trait definitions for the Drawvault lottery-results store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod draw;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod quality;
pub mod store;

pub use error::{Error, Result};
