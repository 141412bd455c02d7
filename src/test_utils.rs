//! Test utilities for acerto.
//!
//! Provides shared test data factories and assertion macros for use
//! across unit and integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use acerto::test_utils::*;
//!
//! let provider = make_test_provider();
//! let incident = make_test_incident(1, "Concluída");
//! ```

use crate::core::models::{Incident, Provider, ProviderDefaults};
use chrono::{DateTime, Utc};

// =============================================================================
// Test Data Factories
// =============================================================================

/// Parse a fixed RFC 3339 instant; panics on malformed test input.
#[must_use]
pub fn test_instant(text: &str) -> DateTime<Utc> {
    text.parse().expect("valid RFC 3339 instant in test data")
}

/// Create a test `Provider` with realistic contract defaults:
/// 120 trigger fee, 40/h and 2/km beyond a 3-hour / 50-km allowance.
#[must_use]
pub fn make_test_provider() -> Provider {
    Provider {
        id: Some(7),
        name: Some("Base Guarulhos".to_string()),
        email: Some("base.guarulhos@example.com".to_string()),
        phone: Some("+55 11 4002-8922".to_string()),
        city: Some("Guarulhos".to_string()),
        state: Some("SP".to_string()),
        defaults: make_test_defaults(),
    }
}

/// Create test `ProviderDefaults` matching [`make_test_provider`].
#[must_use]
pub fn make_test_defaults() -> ProviderDefaults {
    ProviderDefaults {
        trigger_fee: Some(120.0),
        hour_rate: Some(40.0),
        km_rate: Some(2.0),
        hour_allowance: Some("3 horas".to_string()),
        km_allowance: Some(50.0),
    }
}

/// Create a test `Incident` in São Paulo capital with the given id and
/// status. Timestamps span a 2-hour attendance on 2025-06-02; no result
/// code and no expenses.
#[must_use]
pub fn make_test_incident(id: i64, status: &str) -> Incident {
    Incident {
        id: Some(id),
        client: Some("Rastrear Seguros".to_string()),
        status: Some(status.to_string()),
        plate: Some("BRA2E19".to_string()),
        state: Some("São Paulo".to_string()),
        city: Some("São Paulo".to_string()),
        created_at: Some(test_instant("2025-06-02T06:40:00Z")),
        triggered_at: Some(test_instant("2025-06-02T07:00:00Z")),
        started_at: Some(test_instant("2025-06-02T07:20:00Z")),
        arrived_at: Some(test_instant("2025-06-02T08:00:00Z")),
        ended_at: Some(test_instant("2025-06-02T10:00:00Z")),
        km: Some(35.0),
        ..Incident::default()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert two floats are equal within a small tolerance.
#[macro_export]
macro_rules! assert_float_eq {
    ($left:expr, $right:expr) => {
        let left: f64 = $left;
        let right: f64 = $right;
        assert!(
            (left - right).abs() < 1e-9,
            "Expected {left} to equal {right} (within 1e-9)"
        );
    };
}

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_produce_consistent_records() {
        let provider = make_test_provider();
        assert_eq!(provider.defaults.km_allowance, Some(50.0));

        let incident = make_test_incident(3, "Concluída");
        assert_eq!(incident.id, Some(3));
        assert_eq!(incident.status.as_deref(), Some("Concluída"));
        assert!(incident.arrived_at < incident.ended_at);
    }

    #[test]
    fn float_macro_tolerates_rounding() {
        assert_float_eq!(0.1 + 0.2, 0.3);
    }
}
