//! Display formatting for dashboard detail rows.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format an instant as a date-only string (`YYYY-MM-DD`).
#[must_use]
pub fn format_date_only(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|v| v.format("%Y-%m-%d").to_string())
}

/// Format an instant as an RFC 3339 string with second precision.
#[must_use]
pub fn format_instant(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|v| v.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> DateTime<Utc> {
        "2025-04-07T13:45:30Z".parse().unwrap()
    }

    #[test]
    fn date_only() {
        assert_eq!(
            format_date_only(Some(instant())),
            Some("2025-04-07".to_string())
        );
        assert_eq!(format_date_only(None), None);
    }

    #[test]
    fn rfc3339_instant() {
        assert_eq!(
            format_instant(Some(instant())),
            Some("2025-04-07T13:45:30Z".to_string())
        );
        assert_eq!(format_instant(None), None);
    }
}
