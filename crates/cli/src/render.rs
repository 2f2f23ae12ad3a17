//! Plain-text rendering of an evaluation result.
//!
//! ```text
//! Best alternative: Expandir
//! Mode:        Incertidumbre
//! Criterion:   Hurwicz
//! Best score:  60
//!
//!     #  Alternative  Score
//! ★   1  Expandir     60.0000
//!     2  Mantener     28.0000
//! ```

use std::fmt::Write;

use dss_model::{criterion_label, mode_label, DecisionDocument, EvaluationResult};
use unicode_width::UnicodeWidthStr;

const MISSING: &str = "—";
const BEST_MARKER: &str = "★";

/// Summary block plus ranking table.
///
/// `request` fills in mode and criterion when the evaluator did not echo them.
pub fn render_result(result: &EvaluationResult, request: Option<&DecisionDocument>) -> String {
    let mut out = String::new();

    let mode = result.mode.as_deref().or_else(|| request.map(|d| d.mode()));
    let criterion = result.criterion.as_deref().or_else(|| request.and_then(|d| d.criterion()));

    let _ = writeln!(out, "Best alternative: {}", result.winner().unwrap_or(MISSING));
    if let Some(mode) = mode {
        let _ = writeln!(out, "Mode:        {}", mode_label(mode));
    }
    if let Some(criterion) = criterion {
        let _ = writeln!(out, "Criterion:   {}", criterion_label(criterion));
    }
    let best = result.best_score.map(|s| s.to_string());
    let _ = writeln!(out, "Best score:  {}", best.as_deref().unwrap_or(MISSING));

    if !result.ranking.is_empty() {
        out.push('\n');
        out.push_str(&render_ranking(result));
    }
    if let Some(message) = result.message.as_deref().filter(|m| !m.trim().is_empty()) {
        let _ = write!(out, "\n{}\n", message.trim());
    }
    out
}

/// Ranking table. Position 1 carries the best-alternative marker.
pub fn render_ranking(result: &EvaluationResult) -> String {
    let name_width = result
        .ranking
        .iter()
        .map(|r| r.alternative.width())
        .chain(std::iter::once("Alternative".width()))
        .max()
        .unwrap_or(0);
    let pos_width = result.ranking.len().to_string().len().max(1);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {:>pw$}  {}  Score",
        " ",
        "#",
        pad_right("Alternative", name_width),
        pw = pos_width + 1
    );
    for (i, entry) in result.ranking.iter().enumerate() {
        let marker = if i == 0 { BEST_MARKER } else { " " };
        let score = entry
            .score
            .map(|s| format!("{:.4}", s))
            .unwrap_or_else(|| MISSING.to_string());
        let line = format!(
            "{}  {:>pw$}  {}  {}",
            marker,
            i + 1,
            pad_right(&entry.alternative, name_width),
            score,
            pw = pos_width + 1
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// The canonical result as pretty JSON.
pub fn render_json(result: &EvaluationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Right-pad to `width` display columns (accents and CJK count correctly).
fn pad_right(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}
