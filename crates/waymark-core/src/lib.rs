// Public fallible APIs in this crate share one concrete error contract (`WaymarkError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod ranking;
pub mod store;

pub use error::{ErrorPayload, Result, WaymarkError};
pub use store::SqliteMarkerStore;
