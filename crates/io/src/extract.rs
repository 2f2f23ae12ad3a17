// Sheet extractors
//
// Positional contract shared by every sheet:
// - fewer than 2 rows means the sheet is empty
// - config sheets: row 0 is a label row, row 1 is the only data row
// - list/table sheets: row 0 is a header, data starts at row 1
// - a data row whose first cell is absent is skipped, nothing else filters rows

use dss_model::{Criterion, NamedValues, State, DEFAULT_CRITERION_KIND};

use crate::cell::{Cell, Numeric};
use crate::error::IngestError;
use crate::workbook::RawSheet;

/// The single data row of a config sheet (row 1).
pub fn config_row(sheet: &RawSheet) -> Result<ConfigRow<'_>, IngestError> {
    ensure_not_empty(sheet)?;
    Ok(ConfigRow {
        sheet: &sheet.name,
        cells: &sheet.rows[1],
    })
}

/// Positional view over the config data row.
pub struct ConfigRow<'a> {
    sheet: &'a str,
    cells: &'a [Cell],
}

impl<'a> ConfigRow<'a> {
    fn cell(&self, col: usize) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(col).unwrap_or(&EMPTY)
    }

    /// Required keyword (trimmed, lower-cased).
    pub fn required_keyword(&self, col: usize, field: &str) -> Result<String, IngestError> {
        self.cell(col)
            .keyword()
            .ok_or_else(|| IngestError::empty_field(self.sheet, field))
    }

    /// Optional number: absent → `None`, unparseable → error naming the field.
    pub fn optional_number(&self, col: usize, field: &str) -> Result<Option<f64>, IngestError> {
        optional_number(self.cell(col), self.sheet, field)
    }

    /// Optional trimmed text.
    pub fn optional_text(&self, col: usize) -> Option<String> {
        self.cell(col).text()
    }
}

/// Criteria list: `name | weight | kind`.
///
/// Blank weight defaults to 0, blank kind to "beneficio".
pub fn criteria(sheet: &RawSheet) -> Result<Vec<Criterion>, IngestError> {
    ensure_not_empty(sheet)?;

    let mut criteria = Vec::new();
    for (idx, row) in data_rows(sheet) {
        let Some(name) = row[0].text() else { continue };
        let field = format!("peso ({})", name);
        let weight = optional_number(cell_at(row, 1), &sheet.name, &field)?.unwrap_or(0.0);
        let kind = cell_at(row, 2)
            .keyword()
            .unwrap_or_else(|| DEFAULT_CRITERION_KIND.to_string());

        tracing::trace!(sheet = %sheet.name, row = idx, criterion = %name, "criterion read");
        criteria.push(Criterion { name, weight, kind });
    }
    Ok(criteria)
}

/// States list: `name | probability`. Blank probability stays `None`.
pub fn states(sheet: &RawSheet) -> Result<Vec<State>, IngestError> {
    ensure_not_empty(sheet)?;

    let mut states = Vec::new();
    for (idx, row) in data_rows(sheet) {
        let Some(name) = row[0].text() else { continue };
        let field = format!("probabilidad ({})", name);
        let probability = optional_number(cell_at(row, 1), &sheet.name, &field)?;

        tracing::trace!(sheet = %sheet.name, row = idx, state = %name, "state read");
        states.push(State { name, probability });
    }
    Ok(states)
}

/// A row-key × column-entity table (alternatives × criteria, alternatives × states).
///
/// Header cells 1..N name the columns; header cell 0 is discarded and blank
/// header cells name nothing. Only numeric cells become mapping entries.
pub fn value_table(sheet: &RawSheet) -> Result<Vec<(String, NamedValues)>, IngestError> {
    ensure_not_empty(sheet)?;

    let columns: Vec<(usize, String)> = sheet.rows[0]
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(col, cell)| cell.text().map(|name| (col, name)))
        .collect();

    let mut table = Vec::new();
    for (idx, row) in data_rows(sheet) {
        let Some(key) = row[0].text() else { continue };

        let mut values = NamedValues::new();
        for (col, column_name) in &columns {
            match cell_at(row, *col).number() {
                Numeric::Value(n) => {
                    values.insert(column_name.clone(), n);
                }
                Numeric::Absent => {}
                Numeric::Invalid(raw) => {
                    tracing::warn!(
                        sheet = %sheet.name,
                        row = idx,
                        column = %column_name,
                        value = %raw,
                        "non-numeric cell omitted"
                    );
                }
            }
        }
        table.push((key, values));
    }
    Ok(table)
}

// ── Helpers ─────────────────────────────────────────────────────────

fn ensure_not_empty(sheet: &RawSheet) -> Result<(), IngestError> {
    if sheet.rows.len() < 2 {
        return Err(IngestError::EmptySheet { sheet: sheet.name.clone() });
    }
    Ok(())
}

/// Data rows (index ≥ 1) whose first cell is present.
fn data_rows(sheet: &RawSheet) -> impl Iterator<Item = (usize, &[Cell])> {
    sheet
        .rows
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(idx, row)| {
            let keep = row.first().map(|c| !c.is_absent()).unwrap_or(false);
            if !keep {
                tracing::trace!(sheet = %sheet.name, row = idx, "row skipped: empty key");
            }
            keep
        })
        .map(|(idx, row)| (idx, row.as_slice()))
}

fn cell_at(row: &[Cell], col: usize) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    row.get(col).unwrap_or(&EMPTY)
}

fn optional_number(cell: &Cell, sheet: &str, field: &str) -> Result<Option<f64>, IngestError> {
    match cell.number() {
        Numeric::Absent => Ok(None),
        Numeric::Value(n) => Ok(Some(n)),
        Numeric::Invalid(raw) => Err(IngestError::not_numeric(sheet, field, &raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, rows: Vec<Vec<Cell>>) -> RawSheet {
        RawSheet::new(name, rows)
    }

    fn t(s: &str) -> Cell {
        Cell::from(s)
    }

    fn n(v: f64) -> Cell {
        Cell::from(v)
    }

    #[test]
    fn test_config_with_header_only_is_empty() {
        let s = sheet("config", vec![vec![t("modo"), t("alpha")]]);
        let err = config_row(&s).err().unwrap();
        assert_eq!(err, IngestError::EmptySheet { sheet: "config".into() });
    }

    #[test]
    fn test_config_row_reads_second_row_only() {
        let s = sheet(
            "config",
            vec![
                vec![t("modo"), t("alpha")],
                vec![t(" Ranking "), n(0.3)],
                vec![t("ignored"), n(0.9)],
            ],
        );
        let row = config_row(&s).unwrap();
        assert_eq!(row.required_keyword(0, "modo").unwrap(), "ranking");
        assert_eq!(row.optional_number(1, "alpha").unwrap(), Some(0.3));
        assert_eq!(row.optional_number(5, "alpha").unwrap(), None);
        assert_eq!(row.optional_text(7), None);
    }

    #[test]
    fn test_config_blank_required_field() {
        let s = sheet("config", vec![vec![t("modo")], vec![t("  ")]]);
        let err = config_row(&s).unwrap().required_keyword(0, "modo").unwrap_err();
        assert_eq!(err.to_string(), "field \"modo\" is empty in sheet \"config\"");
    }

    #[test]
    fn test_criteria_defaults_and_skips() {
        let s = sheet(
            "criterios",
            vec![
                vec![t("criterio"), t("peso"), t("tipo")],
                vec![t("Costo"), n(0.6), t("COSTO")],
                vec![],
                vec![Cell::Empty, n(0.9), t("costo")],
                vec![t("  "), n(0.1)],
                vec![t("Calidad")],
                vec![t("Plazo"), t(""), t("")],
            ],
        );
        let criteria = criteria(&s).unwrap();
        assert_eq!(criteria.len(), 3);
        assert_eq!(criteria[0], Criterion { name: "Costo".into(), weight: 0.6, kind: "costo".into() });
        assert_eq!(criteria[1].weight, 0.0);
        assert_eq!(criteria[1].kind, "beneficio");
        assert_eq!(criteria[2].name, "Plazo");
        assert_eq!(criteria[2].kind, "beneficio");
    }

    #[test]
    fn test_criteria_numeric_name_is_kept() {
        let s = sheet("criterios", vec![vec![t("criterio")], vec![n(2024.0), n(1.0)]]);
        let criteria = criteria(&s).unwrap();
        assert_eq!(criteria[0].name, "2024");
    }

    #[test]
    fn test_criteria_bad_weight_names_criterion() {
        let s = sheet("criterios", vec![vec![t("criterio")], vec![t("Costo"), t("mucho")]]);
        let err = criteria(&s).unwrap_err();
        match &err {
            IngestError::Field { sheet, field, .. } => {
                assert_eq!(sheet, "criterios");
                assert_eq!(field, "peso (Costo)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("\"mucho\""));
    }

    #[test]
    fn test_states_probability_optional() {
        let s = sheet(
            "estados",
            vec![
                vec![t("estado"), t("probabilidad")],
                vec![t("Alta"), n(0.7)],
                vec![t("Baja")],
                vec![Cell::Empty, n(0.3)],
            ],
        );
        let states = states(&s).unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].probability, Some(0.7));
        assert_eq!(states[1].probability, None);
    }

    #[test]
    fn test_value_table_header_positions() {
        let s = sheet(
            "alternativas",
            vec![
                vec![t("alternativa"), t(" Costo "), Cell::Empty, t("Calidad")],
                vec![t("A"), n(10.0), n(99.0), n(8.0)],
                vec![t("B"), Cell::Empty, n(1.0), t("4")],
                vec![t(""), n(1.0), n(1.0), n(1.0)],
                vec![t("C"), t("n/a")],
            ],
        );
        let table = value_table(&s).unwrap();
        assert_eq!(table.len(), 3);

        let (name, values) = &table[0];
        assert_eq!(name, "A");
        assert_eq!(values.len(), 2);
        assert_eq!(values.get("Costo"), Some(&10.0));
        assert_eq!(values.get("Calidad"), Some(&8.0));

        // Missing cell omitted, not zero
        let (_, values) = &table[1];
        assert!(!values.contains_key("Costo"));
        assert_eq!(values.get("Calidad"), Some(&4.0));

        // Non-numeric omitted
        let (name, values) = &table[2];
        assert_eq!(name, "C");
        assert!(values.is_empty());
    }

    #[test]
    fn test_value_table_needs_data_row() {
        let s = sheet("payoffs", vec![vec![t("alternativa"), t("Alta")]]);
        assert_eq!(
            value_table(&s).unwrap_err(),
            IngestError::EmptySheet { sheet: "payoffs".into() }
        );
    }
}
