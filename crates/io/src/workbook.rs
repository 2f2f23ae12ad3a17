// Workbook decoding (xlsx only)
//
// Sheets are materialized relative to their used range: row 0 / column 0 are
// the first used row and column, wherever the data starts.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use crate::cell::Cell;
use crate::error::IngestError;

/// Maximum dimensions read from a sheet
const MAX_ROWS: usize = 65536;
const MAX_COLS: usize = 256;

/// One sheet as an ordered sequence of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { name: name.into(), rows }
    }

    pub fn row(&self, idx: usize) -> Option<&[Cell]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }
}

/// A decoded workbook: sheet name → rows, in workbook order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawWorkbook {
    sheets: Vec<RawSheet>,
}

impl RawWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet (builder style). A sheet with the same name is replaced.
    pub fn with_sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.push(RawSheet::new(name, rows));
        self
    }

    pub fn push(&mut self, sheet: RawSheet) {
        match self.sheets.iter_mut().find(|s| s.name == sheet.name) {
            Some(existing) => *existing = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Decode an `.xlsx` file on disk.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| IngestError::Decode(format!("{}: {}", path.display(), e)))?;
        read_sheets(&mut workbook)
    }

    /// Decode `.xlsx` bytes already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        read_sheets(&mut workbook)
    }
}

fn read_sheets<RS: Read + Seek>(workbook: &mut Xlsx<RS>) -> Result<RawWorkbook, IngestError> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IngestError::Decode("workbook contains no sheets".to_string()));
    }

    let mut result = RawWorkbook::new();

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| IngestError::Decode(format!("sheet '{}': {}", sheet_name, e)))?;

        let (height, width) = range.get_size();
        if height == 0 || width == 0 {
            result.push(RawSheet::new(sheet_name.as_str(), Vec::new()));
            continue;
        }

        if height > MAX_ROWS || width > MAX_COLS {
            tracing::warn!(
                sheet = %sheet_name,
                height,
                width,
                "sheet truncated to {}x{}",
                height.min(MAX_ROWS),
                width.min(MAX_COLS)
            );
        }

        if let Some((start_row, start_col)) = range.start() {
            if start_row > 0 || start_col > 0 {
                tracing::debug!(sheet = %sheet_name, start_row, start_col, "used range starts past A1");
            }
        }

        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(height.min(MAX_ROWS));
        for row in range.rows().take(MAX_ROWS) {
            let mut cells: Vec<Cell> = row.iter().take(MAX_COLS).map(Cell::from).collect();
            // Trim trailing empty cells
            while matches!(cells.last(), Some(Cell::Empty)) {
                cells.pop();
            }
            rows.push(cells);
        }

        tracing::trace!(sheet = %sheet_name, rows = rows.len(), "sheet decoded");
        result.push(RawSheet::new(sheet_name.as_str(), rows));
    }

    Ok(result)
}

/// True when the file name carries the `.xlsx` extension (case-insensitive).
pub fn is_xlsx_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}
