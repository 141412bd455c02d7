//! acerto - provider financial settlement engine.
//!
//! Computes how much a service provider is owed for a vehicle-recovery
//! incident, and rolls per-incident settlements into a provider dashboard
//! summary. Pure computation over in-memory records: no I/O, no shared
//! state, safe to call concurrently. The embedding web layer owns
//! persistence, routing and authorization.

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod core;
pub mod error;
pub mod util;

/// Test utilities module - included in test builds or when the
/// test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use self::core::{
    DashboardReport, DashboardSummary, Incident, Provider, ProviderDefaults, Settlement, settle,
    settle_at, summarize, summarize_at,
};
pub use error::{EngineError, Result};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
