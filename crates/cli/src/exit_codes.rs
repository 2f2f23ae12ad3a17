//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unreadable workbook, bad response)    |
//! | 2    | Usage error (bad args, missing file)                 |
//! | 3    | File type rejected (not `.xlsx`)                     |
//! | 4    | Required sheet missing or empty                      |
//! | 5    | Field validation failed                              |
//! | 6    | Evaluator unreachable                                |
//! | 7    | Evaluator rejected the document                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the mapping functions below

use dss_evaluator_client::EvaluatorError;
use dss_io::IngestError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file.
pub const EXIT_USAGE: u8 = 2;

/// Selected file is not an `.xlsx` workbook.
pub const EXIT_FILE_TYPE: u8 = 3;

/// A required sheet is missing, or has no data row.
pub const EXIT_SHEET: u8 = 4;

/// A required field is empty or not a number, or a list has no valid rows.
pub const EXIT_FIELD: u8 = 5;

/// No response from the evaluator (refused, timeout, DNS).
pub const EXIT_TRANSPORT: u8 = 6;

/// Evaluator answered with a non-success status.
pub const EXIT_REMOTE: u8 = 7;

/// Map an IngestError to its exit code.
pub fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::FileType { .. } => EXIT_FILE_TYPE,
        IngestError::MissingSheet { .. } | IngestError::EmptySheet { .. } => EXIT_SHEET,
        IngestError::Field { .. } => EXIT_FIELD,
        IngestError::Decode(_) => EXIT_ERROR,
    }
}

/// Map an EvaluatorError to its exit code.
pub fn evaluator_exit_code(err: &EvaluatorError) -> u8 {
    match err {
        EvaluatorError::Transport { .. } => EXIT_TRANSPORT,
        EvaluatorError::Remote { .. } => EXIT_REMOTE,
        EvaluatorError::Parse(_) => EXIT_ERROR,
    }
}
