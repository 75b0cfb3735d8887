//! Core domain types for the fitness dashboard.
//!
//! Holds the normalised day-record model, the column-mapping schema,
//! null-skipping numeric helpers, CLI settings with last-used
//! persistence, and the shared error type. Everything here is pure:
//! loading and aggregation live in `fitdash-data`.

pub mod credentials;
pub mod error;
pub mod formatting;
pub mod models;
pub mod numeric;
pub mod schema;
pub mod settings;

pub use error::{FitdashError, Result};
