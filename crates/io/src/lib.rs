// Workbook ingestion
//
// .xlsx bytes → RawWorkbook → DecisionDocument. Decoding, cell coercion and
// assembly are separate steps so each can be exercised without the others.

pub mod assemble;
pub mod cell;
pub mod error;
pub mod extract;
pub mod workbook;

use std::path::Path;

use dss_model::DecisionDocument;

pub use assemble::{assemble, DocumentAssembler, RiskAssembler, Variant, WeightedAssembler};
pub use cell::{Cell, Numeric};
pub use error::{FieldProblem, IngestError};
pub use workbook::{is_xlsx_name, RawSheet, RawWorkbook};

/// Read an `.xlsx` file from disk into a document of the given variant.
///
/// The extension is checked before the file is opened.
pub fn ingest_path(path: &Path, variant: Variant) -> Result<DecisionDocument, IngestError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_xlsx_name(&file_name) {
        return Err(IngestError::FileType { file_name });
    }
    let workbook = RawWorkbook::from_path(path)?;
    assemble(variant, &workbook)
}

/// Same as [`ingest_path`], for a file already held in memory.
pub fn ingest_bytes(file_name: &str, bytes: &[u8], variant: Variant) -> Result<DecisionDocument, IngestError> {
    if !is_xlsx_name(file_name) {
        return Err(IngestError::FileType { file_name: file_name.to_string() });
    }
    let workbook = RawWorkbook::from_bytes(bytes)?;
    assemble(variant, &workbook)
}
