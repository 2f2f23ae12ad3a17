//! Result document returned by the remote evaluator.
//!
//! Deserialization is lenient on purpose: the evaluator has shipped several
//! field names for the same value (`puntajeMejor` / `puntaje`, `mensaje` /
//! `message`), and a missing ranking is a rendering concern, not a parse
//! failure. All of that variance is folded into one canonical struct here.

use serde::{Deserialize, Serialize};

/// One row of the ranking. Index 0 of the ranking is the best alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "alternativa", alias = "alternative")]
    pub alternative: String,
    #[serde(rename = "puntaje", alias = "score", default)]
    pub score: Option<f64>,
}

/// Canonical evaluation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireResult")]
pub struct EvaluationResult {
    #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ranking: Vec<RankingEntry>,
    #[serde(rename = "mejorAlternativa", skip_serializing_if = "Option::is_none")]
    pub best_alternative: Option<String>,
    #[serde(rename = "puntajeMejor", skip_serializing_if = "Option::is_none")]
    pub best_score: Option<f64>,
    #[serde(rename = "modo", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(rename = "criterio", skip_serializing_if = "Option::is_none")]
    pub criterion: Option<String>,
}

impl EvaluationResult {
    /// The winning alternative: the explicit field if the evaluator sent one,
    /// else the head of the ranking.
    pub fn winner(&self) -> Option<&str> {
        self.best_alternative
            .as_deref()
            .or_else(|| self.ranking.first().map(|r| r.alternative.as_str()))
    }
}

/// Everything the evaluator has been seen to send.
#[derive(Deserialize)]
struct WireResult {
    #[serde(default)]
    mensaje: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ranking: Option<Vec<RankingEntry>>,
    #[serde(rename = "mejorAlternativa", default)]
    mejor_alternativa: Option<String>,
    #[serde(rename = "puntajeMejor", default)]
    puntaje_mejor: Option<f64>,
    #[serde(default)]
    puntaje: Option<f64>,
    #[serde(default)]
    modo: Option<String>,
    #[serde(default)]
    criterio: Option<String>,
}

impl From<WireResult> for EvaluationResult {
    fn from(wire: WireResult) -> Self {
        Self {
            message: wire.mensaje.or(wire.message),
            ranking: wire.ranking.unwrap_or_default(),
            best_alternative: wire.mejor_alternativa,
            best_score: wire.puntaje_mejor.or(wire.puntaje),
            mode: wire.modo,
            criterion: wire.criterio,
        }
    }
}
