//! Data pipeline layer for Fitdash.
//!
//! Responsible for obtaining the raw training log (local file or object
//! store), decoding and normalising it into day records, deriving the
//! summary, frequency and trend tables, exporting them as CSV, and
//! running the top-level dashboard pass.

pub mod aggregator;
pub mod cache;
pub mod export;
pub mod frequency;
pub mod loader;
pub mod report;
pub mod store;
pub mod trends;

pub use fitdash_core as core;
