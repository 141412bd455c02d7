//! Outcome labels and incident-type classification.

use crate::core::normalize::normalize;

/// Format a raw result code (plus optional sub-result) into the human
/// label shown on reports and used by the pricing predicates.
///
/// Unknown codes degrade to "underscores to spaces, lowercased"; an absent
/// result is rendered as "-".
#[must_use]
pub fn format_outcome(result: Option<&str>, sub_result: Option<&str>) -> String {
    let Some(result) = result else {
        return "-".to_string();
    };

    match result {
        "RECUPERADO" => match sub_result {
            Some("COM_RASTREIO") => "Recuperado com rastreio".to_string(),
            Some("SEM_RASTREIO") => "Recuperado sem rastreio".to_string(),
            Some("SEM_RASTREIO_COM_CONSULTA_APOIO") => {
                "Recuperado com consulta do apoio".to_string()
            }
            _ => "Recuperado".to_string(),
        },
        "NAO_RECUPERADO" => "Não recuperado".to_string(),
        "CANCELADO" => "Cancelado".to_string(),
        "LOCALIZADO" => "Localizado (simples verificação)".to_string(),
        other => other.replace('_', " ").to_lowercase(),
    }
}

/// Incident category recognized by the special-case pricing table.
///
/// Categories are keyword matches over the normalized type text and are
/// not mutually exclusive; the pricing table tests them in a fixed
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    /// Antenna-tracking support ("antenista").
    Antenna,
    /// Judicial recovery mandate.
    JudicialRecovery,
    /// Robbery or theft response.
    RobberyTheft,
    /// Suspicion check.
    Suspicion,
    /// Vehicle preservation.
    Preservation,
    /// Misappropriation ("apropriação indébita").
    Misappropriation,
    /// Simple verification visit.
    SimpleVerification,
}

impl IncidentKind {
    /// Whether the normalized incident-type text falls in this category.
    #[must_use]
    pub fn matches(self, normalized_type: &str) -> bool {
        match self {
            Self::Antenna => normalized_type.contains("antenista"),
            Self::JudicialRecovery => normalized_type.contains("recuperacao judicial"),
            Self::RobberyTheft => {
                normalized_type.contains("roubo") || normalized_type.contains("furto")
            }
            Self::Suspicion => normalized_type.contains("suspeita"),
            Self::Preservation => normalized_type.contains("preserva"),
            Self::Misappropriation => normalized_type.contains("apropria"),
            Self::SimpleVerification => normalized_type.contains("simples verific"),
        }
    }

    /// Classify raw incident-type text, trying categories in the pricing
    /// table's priority order and returning the first match.
    #[must_use]
    pub fn classify(type_text: Option<&str>) -> Option<Self> {
        let normalized = normalize(type_text.unwrap_or(""));
        [
            Self::Antenna,
            Self::JudicialRecovery,
            Self::RobberyTheft,
            Self::Suspicion,
            Self::Preservation,
            Self::Misappropriation,
            Self::SimpleVerification,
        ]
        .into_iter()
        .find(|kind| kind.matches(&normalized))
    }
}
