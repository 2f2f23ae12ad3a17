//! Document assembly.
//!
//! Each workbook schema has its own assembler; both implement
//! [`DocumentAssembler`]. The caller chooses the variant, assemblers never
//! guess which schema a workbook follows.
//!
//! Check order is fixed: required sheets first (all of them, before reading
//! any), then `config`, then the list sheet, then the table sheet.

use dss_model::{
    DecisionDocument, PayoffAlternative, RiskConfig, RiskDocument, WeightedAlternative,
    WeightedDocument,
};

use crate::error::IngestError;
use crate::extract;
use crate::workbook::{RawSheet, RawWorkbook};

/// Turns a decoded workbook into one decision-document variant.
pub trait DocumentAssembler {
    type Document: Into<DecisionDocument>;

    /// Sheet names that must exist, in the order they are checked.
    fn required_sheets(&self) -> &'static [&'static str];

    fn assemble(&self, workbook: &RawWorkbook) -> Result<Self::Document, IngestError>;
}

/// Which workbook schema to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `config`, `criterios`, `alternativas`
    Weighted,
    /// `config`, `estados`, `payoffs`
    Risk,
}

impl Variant {
    pub fn required_sheets(self) -> &'static [&'static str] {
        match self {
            Variant::Weighted => WeightedAssembler.required_sheets(),
            Variant::Risk => RiskAssembler.required_sheets(),
        }
    }
}

/// Assemble with the assembler for `variant`.
pub fn assemble(variant: Variant, workbook: &RawWorkbook) -> Result<DecisionDocument, IngestError> {
    match variant {
        Variant::Weighted => run(&WeightedAssembler, workbook),
        Variant::Risk => run(&RiskAssembler, workbook),
    }
}

fn run<A: DocumentAssembler>(assembler: &A, workbook: &RawWorkbook) -> Result<DecisionDocument, IngestError> {
    tracing::debug!(sheets = ?workbook.sheet_names(), "assembling document");
    match assembler.assemble(workbook) {
        Ok(doc) => Ok(doc.into()),
        Err(e) => {
            tracing::info!(error = %e, sheet = ?e.sheet(), "workbook rejected");
            Err(e)
        }
    }
}

// ── Variant A ───────────────────────────────────────────────────────

const WEIGHTED_SHEETS: &[&str] = &["config", "criterios", "alternativas"];

/// Weighted-criteria schema.
///
/// - `config` row 1: `modo | alpha`
/// - `criterios`: `criterio | peso | tipo`
/// - `alternativas`: header `_ | <criterio>...`, rows `nombre | valores...`
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAssembler;

impl DocumentAssembler for WeightedAssembler {
    type Document = WeightedDocument;

    fn required_sheets(&self) -> &'static [&'static str] {
        WEIGHTED_SHEETS
    }

    fn assemble(&self, workbook: &RawWorkbook) -> Result<WeightedDocument, IngestError> {
        let [config, criterios, alternativas] = require_sheets::<3>(workbook, WEIGHTED_SHEETS)?;

        let row = extract::config_row(config)?;
        let mode = row.required_keyword(0, "modo")?;
        let alpha = row.optional_number(1, "alpha")?;

        let criteria = extract::criteria(criterios)?;
        if criteria.is_empty() {
            return Err(IngestError::no_rows(&criterios.name, "criterios"));
        }

        let alternatives: Vec<WeightedAlternative> = extract::value_table(alternativas)?
            .into_iter()
            .map(|(name, values)| WeightedAlternative { name, values })
            .collect();
        if alternatives.is_empty() {
            return Err(IngestError::no_rows(&alternativas.name, "alternativas"));
        }

        tracing::debug!(
            mode = %mode,
            criteria = criteria.len(),
            alternatives = alternatives.len(),
            "weighted document assembled"
        );
        Ok(WeightedDocument { mode, alpha, criteria, alternatives })
    }
}

// ── Variant B ───────────────────────────────────────────────────────

const RISK_SHEETS: &[&str] = &["config", "estados", "payoffs"];

/// Risk/uncertainty schema.
///
/// - `config` row 1: `modo | criterio | hurwiczAlpha | actualState`
/// - `estados`: `estado | probabilidad`
/// - `payoffs`: header `_ | <estado>...`, rows `alternativa | payoffs...`
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssembler;

impl DocumentAssembler for RiskAssembler {
    type Document = RiskDocument;

    fn required_sheets(&self) -> &'static [&'static str] {
        RISK_SHEETS
    }

    fn assemble(&self, workbook: &RawWorkbook) -> Result<RiskDocument, IngestError> {
        let [config, estados, payoffs] = require_sheets::<3>(workbook, RISK_SHEETS)?;

        let row = extract::config_row(config)?;
        let config = RiskConfig {
            mode: row.required_keyword(0, "modo")?,
            criterion: row.required_keyword(1, "criterio")?,
            hurwicz_alpha: row.optional_number(2, "hurwiczAlpha")?,
            actual_state: row.optional_text(3),
        };

        let states = extract::states(estados)?;
        if states.is_empty() {
            return Err(IngestError::no_rows(&estados.name, "estados"));
        }

        let alternatives: Vec<PayoffAlternative> = extract::value_table(payoffs)?
            .into_iter()
            .map(|(name, payoffs)| PayoffAlternative { name, payoffs })
            .collect();
        if alternatives.is_empty() {
            return Err(IngestError::no_rows(&payoffs.name, "alternativas"));
        }

        tracing::debug!(
            mode = %config.mode,
            criterion = %config.criterion,
            states = states.len(),
            alternatives = alternatives.len(),
            "risk document assembled"
        );
        Ok(RiskDocument { config, states, alternatives })
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Look up every required sheet, failing on the first missing one.
fn require_sheets<'a, const N: usize>(
    workbook: &'a RawWorkbook,
    names: &'static [&'static str],
) -> Result<[&'a RawSheet; N], IngestError> {
    let mut found: Vec<&RawSheet> = Vec::with_capacity(N);
    for &name in names {
        match workbook.sheet(name) {
            Some(sheet) => found.push(sheet),
            None => {
                return Err(IngestError::MissingSheet { sheet: name, required: names });
            }
        }
    }
    found
        .try_into()
        .map_err(|_| IngestError::Decode(format!("expected {} required sheets", N)))
}
