use thiserror::Error;

/// Why a workbook could not be turned into a decision document.
///
/// Every variant names the sheet or field at fault so the message can be
/// shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    /// Selected file does not have the `.xlsx` extension.
    #[error("only .xlsx files are accepted")]
    FileType { file_name: String },

    /// The container could not be read as a workbook.
    #[error("could not read workbook: {0}")]
    Decode(String),

    /// A required sheet is absent.
    #[error("missing sheet \"{sheet}\"; required sheets: {}", .required.join(", "))]
    MissingSheet {
        sheet: &'static str,
        required: &'static [&'static str],
    },

    /// A required sheet has no data row.
    #[error("sheet \"{sheet}\" is empty")]
    EmptySheet { sheet: String },

    /// A required scalar is empty or unparseable, or a list ended up empty.
    #[error("{problem} in sheet \"{sheet}\"")]
    Field {
        sheet: String,
        field: String,
        problem: FieldProblem,
    },
}

impl IngestError {
    pub(crate) fn empty_field(sheet: &str, field: &str) -> Self {
        Self::Field {
            sheet: sheet.to_string(),
            field: field.to_string(),
            problem: FieldProblem::Empty { field: field.to_string() },
        }
    }

    pub(crate) fn not_numeric(sheet: &str, field: &str, raw: &str) -> Self {
        Self::Field {
            sheet: sheet.to_string(),
            field: field.to_string(),
            problem: FieldProblem::NotNumeric {
                field: field.to_string(),
                raw: raw.to_string(),
            },
        }
    }

    pub(crate) fn no_rows(sheet: &str, field: &str) -> Self {
        Self::Field {
            sheet: sheet.to_string(),
            field: field.to_string(),
            problem: FieldProblem::NoValidRows { field: field.to_string() },
        }
    }

    /// Sheet the error refers to, if any.
    pub fn sheet(&self) -> Option<&str> {
        match self {
            Self::MissingSheet { sheet, .. } => Some(*sheet),
            Self::EmptySheet { sheet } | Self::Field { sheet, .. } => Some(sheet.as_str()),
            Self::FileType { .. } | Self::Decode(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldProblem {
    #[error("field \"{field}\" is empty")]
    Empty { field: String },
    #[error("field \"{field}\" is not a number (\"{raw}\")")]
    NotNumeric { field: String, raw: String },
    #[error("no valid {field} found")]
    NoValidRows { field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_sheet_and_field() {
        let err = IngestError::empty_field("config", "modo");
        assert_eq!(err.to_string(), "field \"modo\" is empty in sheet \"config\"");

        let err = IngestError::no_rows("criterios", "criterios");
        assert_eq!(err.to_string(), "no valid criterios found in sheet \"criterios\"");

        let err = IngestError::MissingSheet {
            sheet: "payoffs",
            required: &["config", "estados", "payoffs"],
        };
        assert_eq!(
            err.to_string(),
            "missing sheet \"payoffs\"; required sheets: config, estados, payoffs"
        );
        assert_eq!(err.sheet(), Some("payoffs"));
    }

    #[test]
    fn test_file_type_message_is_fixed() {
        let csv = IngestError::FileType { file_name: "datos.csv".into() };
        let xls = IngestError::FileType { file_name: "viejo.xls".into() };
        assert_eq!(csv.to_string(), "only .xlsx files are accepted");
        assert_eq!(csv.to_string(), xls.to_string());
        assert!(matches!(csv, IngestError::FileType { ref file_name } if file_name == "datos.csv"));
    }
}
