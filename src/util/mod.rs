//! Utility functions.

pub mod format;

pub use format::{format_date_only, format_instant};
