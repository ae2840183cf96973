//! Import layer for Drawvault.
//!
//! Each source the results come from (AI/OCR extraction, spreadsheet
//! export, page scrape) has its own record shape and its own adapter into
//! the canonical [`drawvault_core::draw::NewDraw`]. The batch runner feeds
//! adapter output through the store's reconcile policy, tolerating
//! per-record failures.

pub mod batch;
pub mod error;
pub mod ocr;
pub mod scrape;
pub mod sheet;

pub use batch::{
  BatchReport, import_ocr_file, import_scrape_file, import_sheet_file, run_batch,
};
pub use error::{Error, Result};
