//! Data layer for the fund monitor.
//!
//! Responsible for reading fund record files, normalising them into a typed
//! dataset, filtering by date range, aggregating a metric per calendar month
//! and running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;
pub mod store;

pub use monitor_core as core;
