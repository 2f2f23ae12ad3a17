//! Decision-model wire format.
//!
//! This crate defines the JSON documents exchanged with the remote evaluator:
//! the two request variants produced by workbook ingestion, and the result
//! document the evaluator answers with.
//!
//! # Wire names
//!
//! The evaluator's contract uses Spanish field names (`modo`, `criterios`,
//! `alternativas`, ...). Rust field names are English; the mapping lives in
//! the serde attributes and is pinned by the golden tests in `tests/`.
//!
//! # Usage
//!
//! ```ignore
//! use dss_model::{DecisionDocument, EvaluationResult};
//!
//! let body = serde_json::to_string(&document)?;
//! let result: EvaluationResult = serde_json::from_str(&response_text)?;
//! ```

mod document;
mod labels;
mod result;

pub use document::{
    Criterion, DecisionDocument, PayoffAlternative, RiskConfig, RiskDocument, State,
    WeightedAlternative, WeightedDocument, DEFAULT_CRITERION_KIND,
};
pub use labels::{criterion_label, mode_label, KNOWN_MODES};
pub use result::{EvaluationResult, RankingEntry};

/// `name → number` mapping whose keys follow the header column order of the
/// source sheet. Re-inserting a name overwrites the value in place.
pub type NamedValues = indexmap::IndexMap<String, f64>;
