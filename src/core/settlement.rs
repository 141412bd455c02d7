//! Per-incident settlement calculation.
//!
//! [`settle`] is the core of the engine: given one incident and a
//! provider's contractual defaults it produces the complete financial
//! breakdown for that incident. It is a pure function and never fails;
//! malformed input degrades to zeros and nulls per the crate-wide policy.
//!
//! Pricing has two layers. A fixed table of special-case rules covers the
//! contractual incident categories (antenna support, judicial recovery,
//! robbery/theft, …), keyed on category, macro-region and outcome and
//! evaluated in priority order, first match wins. When no rule matches,
//! the provider's own rates and allowances apply, with incident-level
//! overrides taking precedence when positive.

use crate::core::models::{Incident, ProviderDefaults, Settlement};
use crate::core::normalize::{
    hours_between, normalize, parse_allowance_hours, parse_expense_items,
};
use crate::core::outcome::{IncidentKind, format_outcome};
use crate::core::region::{MacroRegion, classify_region};
use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

// =============================================================================
// Fixed contractual tables
// =============================================================================

/// Normalized statuses that mark an incident as terminal.
const TERMINAL_STATUSES: &[&str] = &[
    "concluida",
    "finalizada",
    "encerrada",
    "recuperada",
    "recuperado",
    "nao_recuperado",
    "nao recuperado",
    "não recuperado",
    "cancelada",
];

/// Allowances shared by every special-case rule: 3 hours and 50 km.
const SPECIAL_ALLOWANCE_HOURS: f64 = 3.0;
const SPECIAL_ALLOWANCE_KM: f64 = 50.0;

/// Extra-km rate shared by every special-case rule: 1 unit per km.
const SPECIAL_KM_RATE: f64 = 1.0;

/// Extra-hour rates by macro-region for rules priced "30/35".
const HOUR_RATE_SP: f64 = 30.0;
const HOUR_RATE_OTHER: f64 = 35.0;

/// Region constraint on a special-case rule.
#[derive(Debug, Clone, Copy)]
enum RegionScope {
    Any,
    SaoPaulo,
    Outside,
}

impl RegionScope {
    const fn admits(self, region: MacroRegion) -> bool {
        match self {
            Self::Any => true,
            Self::SaoPaulo => region.is_sao_paulo(),
            Self::Outside => !region.is_sao_paulo(),
        }
    }
}

/// Outcome constraint on a special-case rule, tested by substring against
/// the normalized outcome label.
#[derive(Debug, Clone, Copy)]
enum OutcomeScope {
    Any,
    /// Outcome is decided: recovered or not recovered.
    Decided,
    /// Label contains "recuperado" (which includes "nao recuperado").
    ContainsRecovered,
    /// Not recovered, or located on a simple check.
    NotRecoveredOrLocated,
}

impl OutcomeScope {
    fn admits(self, outcome: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Decided => {
                outcome.contains("recuperado") || outcome.contains("nao recuperado")
            }
            Self::ContainsRecovered => outcome.contains("recuperado"),
            Self::NotRecoveredOrLocated => {
                outcome.contains("nao recuperado") || outcome.contains("localizado")
            }
        }
    }
}

/// Trigger fee charged by a special-case rule.
#[derive(Debug, Clone, Copy)]
enum FeeRule {
    Fixed(f64),
    /// Higher fee only for a strictly recovered outcome ("recuperado" but
    /// not "nao recuperado").
    RecoveredStrict { recovered: f64, otherwise: f64 },
    /// Higher fee whenever the label contains "recuperado".
    RecoveredContains { recovered: f64, otherwise: f64 },
}

impl FeeRule {
    fn amount(self, outcome: &str) -> f64 {
        match self {
            Self::Fixed(fee) => fee,
            Self::RecoveredStrict {
                recovered,
                otherwise,
            } => {
                if outcome.contains("recuperado") && !outcome.contains("nao recuperado") {
                    recovered
                } else {
                    otherwise
                }
            }
            Self::RecoveredContains {
                recovered,
                otherwise,
            } => {
                if outcome.contains("recuperado") {
                    recovered
                } else {
                    otherwise
                }
            }
        }
    }
}

/// Extra-hour rate charged by a special-case rule.
#[derive(Debug, Clone, Copy)]
enum HourRate {
    Fixed(f64),
    /// 30 inside São Paulo territory, 35 elsewhere.
    ByRegion,
}

impl HourRate {
    const fn amount(self, region: MacroRegion) -> f64 {
        match self {
            Self::Fixed(rate) => rate,
            Self::ByRegion => {
                if region.is_sao_paulo() {
                    HOUR_RATE_SP
                } else {
                    HOUR_RATE_OTHER
                }
            }
        }
    }
}

/// One row of the special-case pricing table.
#[derive(Debug, Clone, Copy)]
struct SpecialRule {
    kind: IncidentKind,
    region: RegionScope,
    outcome: OutcomeScope,
    fee: FeeRule,
    hour_rate: HourRate,
}

/// The contractual pricing table, in priority order. Evaluation stops at
/// the first rule whose kind, region and outcome all admit the incident.
const SPECIAL_RULES: &[SpecialRule] = &[
    SpecialRule {
        kind: IncidentKind::Antenna,
        region: RegionScope::Any,
        outcome: OutcomeScope::Any,
        fee: FeeRule::Fixed(250.0),
        hour_rate: HourRate::ByRegion,
    },
    SpecialRule {
        kind: IncidentKind::JudicialRecovery,
        region: RegionScope::Any,
        outcome: OutcomeScope::Any,
        fee: FeeRule::RecoveredStrict {
            recovered: 250.0,
            otherwise: 100.0,
        },
        hour_rate: HourRate::ByRegion,
    },
    SpecialRule {
        kind: IncidentKind::RobberyTheft,
        region: RegionScope::SaoPaulo,
        outcome: OutcomeScope::Any,
        fee: FeeRule::Fixed(150.0),
        hour_rate: HourRate::Fixed(HOUR_RATE_SP),
    },
    SpecialRule {
        kind: IncidentKind::Suspicion,
        region: RegionScope::SaoPaulo,
        outcome: OutcomeScope::Any,
        fee: FeeRule::Fixed(150.0),
        hour_rate: HourRate::Fixed(HOUR_RATE_SP),
    },
    SpecialRule {
        kind: IncidentKind::Suspicion,
        region: RegionScope::Outside,
        outcome: OutcomeScope::Decided,
        fee: FeeRule::Fixed(200.0),
        hour_rate: HourRate::Fixed(HOUR_RATE_OTHER),
    },
    SpecialRule {
        kind: IncidentKind::Preservation,
        region: RegionScope::Any,
        outcome: OutcomeScope::Any,
        fee: FeeRule::Fixed(200.0),
        hour_rate: HourRate::ByRegion,
    },
    SpecialRule {
        kind: IncidentKind::RobberyTheft,
        region: RegionScope::Outside,
        outcome: OutcomeScope::Decided,
        fee: FeeRule::Fixed(200.0),
        hour_rate: HourRate::Fixed(HOUR_RATE_OTHER),
    },
    SpecialRule {
        kind: IncidentKind::Misappropriation,
        region: RegionScope::SaoPaulo,
        outcome: OutcomeScope::Any,
        fee: FeeRule::RecoveredContains {
            recovered: 200.0,
            otherwise: 100.0,
        },
        hour_rate: HourRate::Fixed(HOUR_RATE_SP),
    },
    SpecialRule {
        kind: IncidentKind::SimpleVerification,
        region: RegionScope::Any,
        outcome: OutcomeScope::Any,
        fee: FeeRule::Fixed(100.0),
        hour_rate: HourRate::ByRegion,
    },
    SpecialRule {
        kind: IncidentKind::Misappropriation,
        region: RegionScope::Outside,
        outcome: OutcomeScope::ContainsRecovered,
        fee: FeeRule::Fixed(250.0),
        hour_rate: HourRate::Fixed(HOUR_RATE_OTHER),
    },
    SpecialRule {
        kind: IncidentKind::Misappropriation,
        region: RegionScope::Any,
        outcome: OutcomeScope::NotRecoveredOrLocated,
        fee: FeeRule::Fixed(100.0),
        hour_rate: HourRate::ByRegion,
    },
];

// =============================================================================
// Building blocks
// =============================================================================

/// Payment due date for an incident.
///
/// The reference instant is the first available of end, arrival, trigger
/// and creation time. Ten calendar days are added; a Saturday result moves
/// forward two days, a Sunday one day, so the due date always lands on a
/// business-adjacent weekday.
#[must_use]
pub fn due_date(incident: &Incident) -> Option<NaiveDate> {
    let reference = incident
        .ended_at
        .or(incident.arrived_at)
        .or(incident.triggered_at)
        .or(incident.created_at)?;

    let mut due = reference.date_naive() + Days::new(10);
    match due.weekday() {
        Weekday::Sat => due = due + Days::new(2),
        Weekday::Sun => due = due + Days::new(1),
        _ => {}
    }
    Some(due)
}

/// Total distance: the explicit odometer total when positive, else the
/// end−start difference clamped to ≥ 0.
fn km_total(incident: &Incident) -> f64 {
    let explicit = incident.km.unwrap_or(0.0);
    if explicit > 0.0 {
        return explicit;
    }
    match (incident.km_start, incident.km_end) {
        (Some(start), Some(end)) if end > start => end - start,
        _ => 0.0,
    }
}

/// Elapsed hours: arrival→end when positive, else start→end.
fn elapsed_hours(incident: &Incident) -> f64 {
    let from_arrival = hours_between(incident.arrived_at, incident.ended_at);
    if from_arrival > 0.0 {
        from_arrival
    } else {
        hours_between(incident.started_at, incident.ended_at)
    }
}

/// Quantity beyond an allowance and its billed amount. Strictly greater
/// than: a value exactly at the allowance yields no extras.
fn extras_beyond(total: f64, allowance: f64, rate: f64) -> (f64, f64) {
    if total > allowance {
        let extra = total - allowance;
        (extra, extra * rate)
    } else {
        (0.0, 0.0)
    }
}

/// An override value, kept only when positive.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

// =============================================================================
// Settlement
// =============================================================================

/// Settle one incident against a provider's defaults, using today's local
/// calendar date for the payment check.
#[must_use]
pub fn settle(incident: &Incident, defaults: &ProviderDefaults) -> Settlement {
    settle_at(incident, defaults, Local::now().date_naive())
}

/// [`settle`] with an explicit "today", for deterministic evaluation.
#[must_use]
pub fn settle_at(incident: &Incident, defaults: &ProviderDefaults, today: NaiveDate) -> Settlement {
    let due_date = due_date(incident);
    let paid = due_date.is_some_and(|due| today > due);

    let region = classify_region(incident.state.as_deref(), incident.city.as_deref());
    let outcome_label = format_outcome(incident.result.as_deref(), incident.sub_result.as_deref());
    let outcome_normalized = normalize(&outcome_label);

    let status_raw = incident.status.clone().unwrap_or_default();
    let status_normalized = normalize(&status_raw);
    let cancelled = status_normalized.contains("cancelad");
    let finalized = TERMINAL_STATUSES.contains(&status_normalized.as_str());

    let hours_total = elapsed_hours(incident);
    let km_total = km_total(incident);

    let item_total: f64 = parse_expense_items(incident.expense_items.as_ref())
        .iter()
        .map(|item| item.amount)
        .sum();
    let expenses = if cancelled {
        0.0
    } else {
        incident.expenses.unwrap_or(0.0) + item_total
    };

    let provider_allowance_hours = parse_allowance_hours(defaults.hour_allowance.as_deref());
    let provider_allowance_km = defaults.km_allowance.unwrap_or(0.0);

    if cancelled {
        return Settlement {
            region,
            outcome_label,
            status_raw,
            status_normalized,
            cancelled: true,
            finalized,
            due_date,
            paid,
            km_total,
            hours_total,
            extra_hours: 0.0,
            extra_km: 0.0,
            allowance_hours: provider_allowance_hours,
            allowance_km: provider_allowance_km,
            trigger_fee: 0.0,
            extra_hour_amount: 0.0,
            extra_km_amount: 0.0,
            expenses: 0.0,
            total: 0.0,
        };
    }

    let type_normalized = normalize(incident.incident_type.as_deref().unwrap_or(""));

    for rule in SPECIAL_RULES {
        if rule.kind.matches(&type_normalized)
            && rule.region.admits(region)
            && rule.outcome.admits(&outcome_normalized)
        {
            tracing::trace!(incident_id = ?incident.id, kind = ?rule.kind, "special pricing rule matched");

            let (extra_hours, extra_hour_amount) = extras_beyond(
                hours_total,
                SPECIAL_ALLOWANCE_HOURS,
                rule.hour_rate.amount(region),
            );
            let (extra_km, extra_km_amount) =
                extras_beyond(km_total, SPECIAL_ALLOWANCE_KM, SPECIAL_KM_RATE);
            let trigger_fee = rule.fee.amount(&outcome_normalized);

            return Settlement {
                region,
                outcome_label,
                status_raw,
                status_normalized,
                cancelled: false,
                finalized,
                due_date,
                paid,
                km_total,
                hours_total,
                extra_hours,
                extra_km,
                allowance_hours: SPECIAL_ALLOWANCE_HOURS,
                allowance_km: SPECIAL_ALLOWANCE_KM,
                trigger_fee,
                extra_hour_amount,
                extra_km_amount,
                expenses,
                total: trigger_fee + extra_hour_amount + extra_km_amount + expenses,
            };
        }
    }

    // Default pricing: the provider's contract, with per-incident overrides.
    let trigger_fee = positive(incident.trigger_fee)
        .or_else(|| positive(defaults.trigger_fee))
        .unwrap_or(0.0);
    let hour_rate = positive(incident.hour_rate)
        .or_else(|| positive(defaults.hour_rate))
        .unwrap_or(0.0);
    let km_rate = positive(incident.km_rate)
        .or_else(|| positive(defaults.km_rate))
        .unwrap_or(0.0);

    let (extra_hours, extra_hour_amount) =
        extras_beyond(hours_total, provider_allowance_hours, hour_rate);
    let (extra_km, extra_km_amount) = extras_beyond(km_total, provider_allowance_km, km_rate);

    Settlement {
        region,
        outcome_label,
        status_raw,
        status_normalized,
        cancelled: false,
        finalized,
        due_date,
        paid,
        km_total,
        hours_total,
        extra_hours,
        extra_km,
        allowance_hours: provider_allowance_hours,
        allowance_km: provider_allowance_km,
        trigger_fee,
        extra_hour_amount,
        extra_km_amount,
        expenses,
        total: trigger_fee + extra_hour_amount + extra_km_amount + expenses,
    }
}
