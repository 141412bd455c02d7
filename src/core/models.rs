//! Core data models for the settlement engine.
//!
//! Inputs (`Incident`, `Provider`) arrive from the web layer as
//! already-loaded records; outputs (`Settlement`, `DashboardReport`) are
//! pure data handed back for JSON serialization. Field absence is always
//! tolerated on input, never an error.

use crate::core::normalize::{to_datetime, to_number};
use crate::core::region::MacroRegion;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Lenient field deserializers
// =============================================================================

/// Accept a number, a comma/dot decimal string, or null; malformed values
/// degrade to `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).map(|v| to_number(&v)))
}

/// Accept an ISO-like timestamp string or null; malformed values degrade
/// to `None`.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_datetime))
}

// =============================================================================
// Inputs
// =============================================================================

/// A recovery/service incident as loaded by the web layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Free-text incident type, e.g. "Roubo/Furto" or "Apropriação Indébita".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Raw result code, e.g. "RECUPERADO".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Raw sub-result code, e.g. "COM_RASTREIO".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_result: Option<String>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the provider was triggered ("data de acionamento").
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub triggered_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub arrived_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_datetime")]
    pub ended_at: Option<DateTime<Utc>>,

    /// Explicit odometer total; wins over the start/end pair when positive.
    #[serde(default, deserialize_with = "lenient_number")]
    pub km: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub km_start: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub km_end: Option<f64>,

    /// Declared scalar expense amount.
    #[serde(default, deserialize_with = "lenient_number")]
    pub expenses: Option<f64>,

    /// Detailed expense items: a JSON array of `{descricao, valor}` objects
    /// or the same array JSON-encoded as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_items: Option<Value>,

    /// Incident-level trigger-fee override; used when positive.
    #[serde(default, deserialize_with = "lenient_number")]
    pub trigger_fee: Option<f64>,

    /// Incident-level additional-hour rate override; used when positive.
    #[serde(default, deserialize_with = "lenient_number")]
    pub hour_rate: Option<f64>,

    /// Incident-level additional-km rate override; used when positive.
    #[serde(default, deserialize_with = "lenient_number")]
    pub km_rate: Option<f64>,
}

/// A single declared expense item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
}

/// Contractual default rates and allowances for a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDefaults {
    /// Base trigger fee per incident.
    #[serde(default, deserialize_with = "lenient_number")]
    pub trigger_fee: Option<f64>,

    /// Rate per additional hour beyond the allowance.
    #[serde(default, deserialize_with = "lenient_number")]
    pub hour_rate: Option<f64>,

    /// Rate per additional km beyond the allowance.
    #[serde(default, deserialize_with = "lenient_number")]
    pub km_rate: Option<f64>,

    /// Hour allowance as free text, e.g. "3 horas".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_allowance: Option<String>,

    /// Km allowance.
    #[serde(default, deserialize_with = "lenient_number")]
    pub km_allowance: Option<f64>,
}

/// A provider record: identity/contact profile plus contract defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(flatten)]
    pub defaults: ProviderDefaults,
}

// =============================================================================
// Settlement output
// =============================================================================

/// Complete financial breakdown for one incident.
///
/// Computed fresh per call and never persisted. When `cancelled` is true
/// every monetary field is zero; distance and elapsed time are still
/// reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub region: MacroRegion,

    /// Human-readable outcome, e.g. "Recuperado com rastreio".
    pub outcome_label: String,

    pub status_raw: String,
    pub status_normalized: String,
    pub cancelled: bool,

    /// Status is in the terminal set (concluded, recovered, cancelled, …).
    pub finalized: bool,

    /// Payment due date: reference instant + 10 calendar days, shifted off
    /// weekends. `None` when the incident carries no usable timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Today (local calendar) is strictly past the due date.
    pub paid: bool,

    pub km_total: f64,
    pub hours_total: f64,
    pub extra_hours: f64,
    pub extra_km: f64,
    pub allowance_hours: f64,
    pub allowance_km: f64,
    pub trigger_fee: f64,
    pub extra_hour_amount: f64,
    pub extra_km_amount: f64,
    pub expenses: f64,

    /// Grand total owed to the provider for this incident.
    pub total: f64,
}

// =============================================================================
// Dashboard output
// =============================================================================

/// Incident count for one `YYYY-MM` bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProductivity {
    pub month: String,
    pub total: i64,
}

/// Productivity counters for the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivitySummary {
    pub last_30_days: i64,

    /// Month buckets, most recent month first.
    pub by_month: Vec<MonthlyProductivity>,
}

/// Rolled-up totals for a provider's incident collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_incidents: i64,
    pub open: i64,
    pub finalized: i64,

    /// Sum of settlement totals restricted to payable statuses.
    pub total_receivable: f64,

    /// Sum of all settlement totals, payable or not.
    pub total_projected: f64,

    pub total_km: f64,
    pub total_hours: f64,
    pub total_expenses: f64,

    /// 30-day window: settlement totals not yet past due.
    pub unpaid_last_30_days: f64,

    /// 30-day window: settlement totals already past due.
    pub paid_last_30_days: f64,

    pub attended_last_30_days: i64,
    pub recovered_last_30_days: i64,

    /// Recovered / attended × 100 over the 30-day window; 0 when nothing
    /// was attended.
    pub recovery_rate_last_30_days: f64,

    pub productivity: ProductivitySummary,
}

/// Provider identity block echoed in the dashboard payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl From<&Provider> for ProviderProfile {
    fn from(provider: &Provider) -> Self {
        Self {
            id: provider.id,
            name: provider.name.clone(),
            email: provider.email.clone(),
            phone: provider.phone.clone(),
            city: provider.city.clone(),
            state: provider.state.clone(),
        }
    }
}

/// Per-incident detail row: the settlement breakdown plus display-ready
/// timestamps. Row order mirrors the input collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,

    /// Trigger date, date-only.
    pub triggered_date: Option<String>,

    pub started_at: Option<String>,
    pub arrived_at: Option<String>,
    pub ended_at: Option<String>,

    pub km_total: f64,
    pub hours_total: f64,
    pub allowance_km: f64,
    pub allowance_hours: f64,
    pub extra_km: f64,
    pub extra_hours: f64,
    pub trigger_fee: f64,
    pub extra_hour_amount: f64,
    pub extra_km_amount: f64,
    pub expenses: f64,
    pub total: f64,

    pub outcome_label: String,
    pub region: MacroRegion,
    pub cancelled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    pub paid: bool,

    pub created_at: Option<String>,
}

/// Full dashboard payload for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub provider: ProviderProfile,
    pub summary: DashboardSummary,
    pub incidents: Vec<IncidentRow>,
}
