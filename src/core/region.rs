//! Macro-region classification.
//!
//! Pricing differs between the São Paulo capital, the greater São Paulo
//! belt, the São Paulo countryside and everywhere else. The tables below
//! are fixed contractual data, not configuration.

use crate::core::normalize::fold_diacritics;
use serde::{Deserialize, Serialize};

/// Geographic macro-region of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MacroRegion {
    #[serde(rename = "CAPITAL")]
    Capital,
    #[serde(rename = "GRANDE SP")]
    GrandeSp,
    #[serde(rename = "INTERIOR")]
    Interior,
    #[serde(rename = "OUTROS ESTADOS")]
    OutrosEstados,
}

impl MacroRegion {
    /// Display label, matching the contractual wording.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Capital => "CAPITAL",
            Self::GrandeSp => "GRANDE SP",
            Self::Interior => "INTERIOR",
            Self::OutrosEstados => "OUTROS ESTADOS",
        }
    }

    /// Whether special-case pricing treats this as São Paulo territory.
    #[must_use]
    pub const fn is_sao_paulo(self) -> bool {
        matches!(self, Self::Capital | Self::GrandeSp)
    }
}

impl std::fmt::Display for MacroRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Brazilian state name to UF code. Input is matched after diacritic
/// folding and uppercasing; two-letter codes pass through unchanged.
const STATE_CODES: &[(&str, &str)] = &[
    ("ACRE", "AC"),
    ("ALAGOAS", "AL"),
    ("AMAPA", "AP"),
    ("AMAZONAS", "AM"),
    ("BAHIA", "BA"),
    ("CEARA", "CE"),
    ("DISTRITO FEDERAL", "DF"),
    ("ESPIRITO SANTO", "ES"),
    ("GOIAS", "GO"),
    ("MARANHAO", "MA"),
    ("MATO GROSSO", "MT"),
    ("MATO GROSSO DO SUL", "MS"),
    ("MINAS GERAIS", "MG"),
    ("PARA", "PA"),
    ("PARAIBA", "PB"),
    ("PARANA", "PR"),
    ("PERNAMBUCO", "PE"),
    ("PIAUI", "PI"),
    ("RIO DE JANEIRO", "RJ"),
    ("RIO GRANDE DO NORTE", "RN"),
    ("RIO GRANDE DO SUL", "RS"),
    ("RONDONIA", "RO"),
    ("RORAIMA", "RR"),
    ("SANTA CATARINA", "SC"),
    ("SAO PAULO", "SP"),
    ("SERGIPE", "SE"),
    ("TOCANTINS", "TO"),
];

/// Municipalities billed as greater São Paulo. Matched by substring
/// against the folded, uppercased city name.
const GRANDE_SP_CITIES: &[&str] = &[
    "ARUJA",
    "BARUERI",
    "BIRITIBA-MIRIM",
    "CAIEIRAS",
    "CAJAMAR",
    "CARAPICUIBA",
    "COTIA",
    "DIADEMA",
    "EMBU-GUACU",
    "EMBU DAS ARTES",
    "FERRAZ DE VASCONCELOS",
    "FRANCISCO MORATO",
    "FRANCO DA ROCHA",
    "GUARULHOS",
    "GUAIANASES",
    "ITAPECERICA DA SERRA",
    "ITAPEVI",
    "ITAQUAQUECETUBA",
    "JANDIRA",
    "JUQUITIBA",
    "MAIRIPORA",
    "MAUA",
    "MOGI DAS CRUZES",
    "OSASCO",
    "POA",
    "RIBEIRAO PIRES",
    "RIO GRANDE DA SERRA",
    "SANTA ISABEL",
    "SANTANA DE PARNAIBA",
    "SANTO ANDRE",
    "SAO BERNARDO",
    "SAO CAETANO",
    "SUZANO",
    "TABOAO DA SERRA",
    "VARGEM GRANDE PAULISTA",
];

/// Resolve a state name or abbreviation to its UF code.
fn state_code(state: &str) -> String {
    let folded = fold_diacritics(state).to_uppercase();
    STATE_CODES
        .iter()
        .find(|(name, _)| *name == folded)
        .map_or(folded, |(_, code)| (*code).to_string())
}

/// Classify an incident's location into a macro-region.
///
/// Any state other than São Paulo is `OUTROS ESTADOS`. Within São Paulo
/// the city decides: a name containing "SAO PAULO" is the capital, a match
/// in the greater São Paulo list is `GRANDE SP`, everything else is
/// `INTERIOR`.
#[must_use]
pub fn classify_region(state: Option<&str>, city: Option<&str>) -> MacroRegion {
    let code = state_code(state.unwrap_or(""));
    if code != "SP" {
        return MacroRegion::OutrosEstados;
    }

    let city = fold_diacritics(city.unwrap_or("")).to_uppercase();
    if city.contains("SAO PAULO") {
        return MacroRegion::Capital;
    }

    if GRANDE_SP_CITIES.iter().any(|c| city.contains(c)) {
        return MacroRegion::GrandeSp;
    }

    MacroRegion::Interior
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capital_by_city_name() {
        assert_eq!(
            classify_region(Some("São Paulo"), Some("São Paulo")),
            MacroRegion::Capital
        );
        assert_eq!(
            classify_region(Some("SP"), Some("SAO PAULO - ZONA LESTE")),
            MacroRegion::Capital
        );
    }

    #[test]
    fn grande_sp_belt() {
        assert_eq!(
            classify_region(Some("São Paulo"), Some("Guarulhos")),
            MacroRegion::GrandeSp
        );
        assert_eq!(
            classify_region(Some("SP"), Some("Taboão da Serra")),
            MacroRegion::GrandeSp
        );
    }

    #[test]
    fn interior_fallback() {
        assert_eq!(
            classify_region(Some("São Paulo"), Some("Ribeirão Preto")),
            MacroRegion::Interior
        );
    }

    #[test]
    fn other_states() {
        assert_eq!(
            classify_region(Some("Bahia"), Some("Salvador")),
            MacroRegion::OutrosEstados
        );
        assert_eq!(classify_region(Some("RJ"), None), MacroRegion::OutrosEstados);
        assert_eq!(classify_region(None, Some("Osasco")), MacroRegion::OutrosEstados);
    }

    #[test]
    fn state_name_resolves_to_code() {
        assert_eq!(state_code("Minas Gerais"), "MG");
        assert_eq!(state_code("sp"), "SP");
        assert_eq!(state_code("Espírito Santo"), "ES");
    }

    #[test]
    fn sao_paulo_scope() {
        assert!(MacroRegion::Capital.is_sao_paulo());
        assert!(MacroRegion::GrandeSp.is_sao_paulo());
        assert!(!MacroRegion::Interior.is_sao_paulo());
        assert!(!MacroRegion::OutrosEstados.is_sao_paulo());
    }
}
