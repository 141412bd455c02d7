//! Core computation: normalization, classification, settlement and
//! dashboard aggregation.

pub mod dashboard;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod outcome;
pub mod region;
pub mod settlement;

pub use dashboard::{summarize, summarize_at};
pub use models::{
    DashboardReport, DashboardSummary, ExpenseItem, Incident, IncidentRow, MonthlyProductivity,
    Provider, ProviderDefaults, ProviderProfile, ProductivitySummary, Settlement,
};
pub use outcome::{IncidentKind, format_outcome};
pub use region::{MacroRegion, classify_region};
pub use settlement::{due_date, settle, settle_at};
