//! Core types for the weather forecast pipeline.
//!
//! Holds the error taxonomy, the serialized document model, the day-keyed
//! temperature aggregator and the runtime configuration shared by the data
//! and binary crates.

pub mod aggregator;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
