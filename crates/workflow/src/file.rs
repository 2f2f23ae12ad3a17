use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dss_io::{ingest_bytes, ingest_path, IngestError, Variant};
use dss_model::DecisionDocument;

/// A file picked for evaluation: on disk, or already in memory (uploads).
#[derive(Clone, PartialEq)]
pub struct SelectedFile {
    name: String,
    source: Source,
}

#[derive(Clone, PartialEq)]
enum Source {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, source: Source::Path(path) }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            name: name.into(),
            source: Source::Bytes(Arc::from(bytes)),
        }
    }

    /// File name as shown to the user (no directory).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::Path(p) => Some(p),
            Source::Bytes(_) => None,
        }
    }

    /// Decode the workbook and assemble a document of `variant`.
    pub fn parse(&self, variant: Variant) -> Result<DecisionDocument, IngestError> {
        match &self.source {
            Source::Path(path) => ingest_path(path, variant),
            Source::Bytes(bytes) => ingest_bytes(&self.name, bytes, variant),
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SelectedFile");
        s.field("name", &self.name);
        match &self.source {
            Source::Path(p) => s.field("path", p),
            Source::Bytes(b) => s.field("bytes", &b.len()),
        };
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_path() {
        let f = SelectedFile::from_path("/data/modelos/decision.xlsx");
        assert_eq!(f.name(), "decision.xlsx");
        assert_eq!(f.path(), Some(Path::new("/data/modelos/decision.xlsx")));
    }

    #[test]
    fn test_bytes_debug_hides_content() {
        let f = SelectedFile::from_bytes("subido.xlsx", vec![1u8, 2, 3]);
        assert_eq!(f.path(), None);
        assert_eq!(format!("{:?}", f), "SelectedFile { name: \"subido.xlsx\", bytes: 3 }");
    }

    #[test]
    fn test_parse_garbage_bytes() {
        let f = SelectedFile::from_bytes("roto.xlsx", b"PK nope".to_vec());
        assert!(matches!(f.parse(Variant::Weighted), Err(IngestError::Decode(_))));
    }

    #[test]
    fn test_parse_checks_extension_before_decoding() {
        let f = SelectedFile::from_bytes("datos.csv", b"PK nope".to_vec());
        assert!(matches!(f.parse(Variant::Risk), Err(IngestError::FileType { .. })));
    }
}
