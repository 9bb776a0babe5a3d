use std::fmt;
use std::path::Path;

use crate::error::FormatError;

/// File encodings the filesystem connector understands.
///
/// Variant order is the order directory reads process format groups in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileFormat {
    Csv,
    Json,
    Jsonl,
    Parquet,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Csv,
        FileFormat::Json,
        FileFormat::Jsonl,
        FileFormat::Parquet,
    ];

    /// Detect the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "jsonl" => Ok(FileFormat::Jsonl),
            "parquet" => Ok(FileFormat::Parquet),
            "" => Err(FormatError::Unsupported(path.display().to_string())),
            other => Err(FormatError::Unsupported(format!(".{other}"))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Jsonl => "jsonl",
            FileFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension_ignoring_case() {
        assert_eq!(FileFormat::from_path(Path::new("a/b.CSV")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("x.jsonl")).unwrap(), FileFormat::Jsonl);
        assert_eq!(
            FileFormat::from_path(Path::new("x.Parquet")).unwrap(),
            FileFormat::Parquet
        );
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = FileFormat::from_path(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported(ref e) if e == ".xlsx"));
        assert!(FileFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn processing_order() {
        let mut shuffled = vec![FileFormat::Parquet, FileFormat::Csv, FileFormat::Jsonl, FileFormat::Json];
        shuffled.sort();
        assert_eq!(shuffled, FileFormat::ALL.to_vec());
    }
}
