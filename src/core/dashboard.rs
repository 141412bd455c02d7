//! Provider dashboard aggregation.
//!
//! [`summarize`] folds the settlement calculator over a provider's
//! incident collection in one pass: running totals, a 30-day
//! productivity/recovery window, a month-bucketed productivity series and
//! one detail row per incident. Detail rows keep the input order; the
//! caller is expected to have sorted the collection (trigger date
//! descending in the web layer).

use crate::core::models::{
    DashboardReport, DashboardSummary, Incident, IncidentRow, MonthlyProductivity, Provider,
    ProviderProfile, Settlement,
};
use crate::core::settlement::settle_at;
use crate::util::format::{format_date_only, format_instant};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Normalized statuses whose settlement totals count as receivable.
const PAYABLE_STATUSES: &[&str] = &["concluida", "finalizada", "recuperada", "recuperado"];

/// Build the dashboard payload for one provider, using the current time
/// for the 30-day window and today's local date for payment checks.
#[must_use]
pub fn summarize(provider: &Provider, incidents: &[Incident]) -> DashboardReport {
    summarize_at(provider, incidents, Utc::now(), Local::now().date_naive())
}

/// [`summarize`] with explicit clock inputs, for deterministic evaluation.
#[must_use]
pub fn summarize_at(
    provider: &Provider,
    incidents: &[Incident],
    now: DateTime<Utc>,
    today: NaiveDate,
) -> DashboardReport {
    tracing::debug!(
        provider_id = ?provider.id,
        incidents = incidents.len(),
        "building provider dashboard"
    );

    let window_start = now - Duration::days(30);
    let mut summary = DashboardSummary {
        total_incidents: incidents.len() as i64,
        ..DashboardSummary::default()
    };
    let mut by_month: BTreeMap<String, i64> = BTreeMap::new();

    let rows: Vec<IncidentRow> = incidents
        .iter()
        .map(|incident| {
            let settlement = settle_at(incident, &provider.defaults, today);

            if settlement.finalized {
                summary.finalized += 1;
            } else {
                summary.open += 1;
            }

            if incident.created_at.is_some_and(|created| created >= window_start) {
                summary.productivity.last_30_days += 1;
            }

            let reference = incident.triggered_at.or(incident.created_at);
            if let Some(reference) = reference {
                *by_month.entry(reference.format("%Y-%m").to_string()).or_insert(0) += 1;
            }

            summary.total_km += settlement.km_total;
            summary.total_hours += settlement.hours_total;
            summary.total_expenses += settlement.expenses;
            summary.total_projected += settlement.total;

            if PAYABLE_STATUSES.contains(&settlement.status_normalized.as_str()) {
                summary.total_receivable += settlement.total;
            }

            if reference.is_some_and(|r| r >= window_start) {
                if settlement.paid {
                    summary.paid_last_30_days += settlement.total;
                } else {
                    summary.unpaid_last_30_days += settlement.total;
                }

                if !settlement.cancelled {
                    summary.attended_last_30_days += 1;
                    if settlement.outcome_label.to_lowercase().contains("recuperado") {
                        summary.recovered_last_30_days += 1;
                    }
                }
            }

            build_row(incident, settlement)
        })
        .collect();

    if summary.attended_last_30_days > 0 {
        summary.recovery_rate_last_30_days =
            summary.recovered_last_30_days as f64 / summary.attended_last_30_days as f64 * 100.0;
    }

    // Most recent month first.
    summary.productivity.by_month = by_month
        .into_iter()
        .rev()
        .map(|(month, total)| MonthlyProductivity { month, total })
        .collect();

    DashboardReport {
        provider: ProviderProfile::from(provider),
        summary,
        incidents: rows,
    }
}

/// Assemble one detail row from an incident and its settlement.
fn build_row(incident: &Incident, settlement: Settlement) -> IncidentRow {
    IncidentRow {
        id: incident.id,
        client: incident.client.clone(),
        incident_type: incident.incident_type.clone(),
        status: incident.status.clone(),
        plate: incident.plate.clone(),
        triggered_date: format_date_only(incident.triggered_at),
        started_at: format_instant(incident.started_at),
        arrived_at: format_instant(incident.arrived_at),
        ended_at: format_instant(incident.ended_at),
        km_total: settlement.km_total,
        hours_total: settlement.hours_total,
        allowance_km: settlement.allowance_km,
        allowance_hours: settlement.allowance_hours,
        extra_km: settlement.extra_km,
        extra_hours: settlement.extra_hours,
        trigger_fee: settlement.trigger_fee,
        extra_hour_amount: settlement.extra_hour_amount,
        extra_km_amount: settlement.extra_km_amount,
        expenses: settlement.expenses,
        total: settlement.total,
        outcome_label: settlement.outcome_label,
        region: settlement.region,
        cancelled: settlement.cancelled,
        due_date: settlement.due_date,
        paid: settlement.paid,
        created_at: format_instant(incident.created_at),
    }
}
