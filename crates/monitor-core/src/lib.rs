//! Shared building blocks for the fund monitor: the typed dataset model,
//! error taxonomy, statistics, date handling, number formatting and CLI
//! settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod statistics;
pub mod time_utils;

pub use error::{ErrorCategory, MonitorError, Result};
