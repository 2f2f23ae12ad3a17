//! Request documents sent to the remote evaluator.
//!
//! Documents are assembled once per evaluation attempt and never mutated
//! afterwards; every list field holds at least one entry.

use serde::{Deserialize, Serialize};

use crate::NamedValues;

/// Orientation assumed when a criterion row leaves its kind blank.
pub const DEFAULT_CRITERION_KIND: &str = "beneficio";

// =============================================================================
// Variant A: weighted criteria
// =============================================================================

/// Deterministic weighted-scoring problem (SAW / ranking modes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedDocument {
    /// Scoring mode, lower-cased (e.g. "ranking")
    #[serde(rename = "modo", alias = "mode")]
    pub mode: String,
    /// Serialized as `null` when the config sheet had no numeric alpha
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(rename = "criterios", alias = "criteria")]
    pub criteria: Vec<Criterion>,
    #[serde(rename = "alternativas", alias = "alternatives")]
    pub alternatives: Vec<WeightedAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(rename = "criterio")]
    pub name: String,
    #[serde(rename = "peso")]
    pub weight: f64,
    /// "beneficio" or "costo"; not checked here, the evaluator validates it
    #[serde(rename = "tipo")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedAlternative {
    #[serde(rename = "nombre")]
    pub name: String,
    /// Criterion name → value. Only cells that held a number.
    #[serde(rename = "valores")]
    pub values: NamedValues,
}

// =============================================================================
// Variant B: risk / uncertainty
// =============================================================================

/// Payoff-matrix problem evaluated under a classical decision criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDocument {
    pub config: RiskConfig,
    #[serde(rename = "estados", alias = "states")]
    pub states: Vec<State>,
    #[serde(rename = "alternativas", alias = "alternatives")]
    pub alternatives: Vec<PayoffAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// "riesgo", "incertidumbre" or "certidumbre", lower-cased
    #[serde(rename = "modo", alias = "mode")]
    pub mode: String,
    /// Decision criterion, lower-cased (e.g. "maximin", "hurwicz")
    #[serde(rename = "criterio", alias = "criterion")]
    pub criterion: String,
    #[serde(rename = "hurwiczAlpha", default, skip_serializing_if = "Option::is_none")]
    pub hurwicz_alpha: Option<f64>,
    #[serde(rename = "actualState", default, skip_serializing_if = "Option::is_none")]
    pub actual_state: Option<String>,
}

/// A state of nature. Probability is `null` when the sheet left it blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "probabilidad", default)]
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffAlternative {
    #[serde(rename = "nombre")]
    pub name: String,
    /// State name → payoff. Only cells that held a number.
    pub payoffs: NamedValues,
}

// =============================================================================
// Either variant
// =============================================================================

/// The request body for one evaluation attempt.
///
/// Untagged: the variants are told apart by their required fields
/// (`modo`/`criterios` vs `config`/`estados`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecisionDocument {
    Weighted(WeightedDocument),
    Risk(RiskDocument),
}

impl DecisionDocument {
    pub fn mode(&self) -> &str {
        match self {
            Self::Weighted(doc) => &doc.mode,
            Self::Risk(doc) => &doc.config.mode,
        }
    }

    /// Decision criterion. Weighted documents have none.
    pub fn criterion(&self) -> Option<&str> {
        match self {
            Self::Weighted(_) => None,
            Self::Risk(doc) => Some(&doc.config.criterion),
        }
    }

    pub fn alternative_names(&self) -> Vec<&str> {
        match self {
            Self::Weighted(doc) => doc.alternatives.iter().map(|a| a.name.as_str()).collect(),
            Self::Risk(doc) => doc.alternatives.iter().map(|a| a.name.as_str()).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> String {
        // Documents only hold strings, finite floats and nulls.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl From<WeightedDocument> for DecisionDocument {
    fn from(doc: WeightedDocument) -> Self {
        Self::Weighted(doc)
    }
}

impl From<RiskDocument> for DecisionDocument {
    fn from(doc: RiskDocument) -> Self {
        Self::Risk(doc)
    }
}
