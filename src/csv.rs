//! An interface to CSV (comma-separated values).

mod encoding;
pub(crate) mod reader;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::table::TableError;
use crate::Table;

pub use encoding::{decode, Decoded, Encoding};
pub use reader::{read_table, Record};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input is not valid UTF-8, Windows-1251, or Latin-1 text")]
    Undecodable,
    #[error("no columns to parse from file")]
    NoColumns,
    #[error("line {line}: expected {expected} fields, saw {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Loads a CSV file into a `Table`.
///
/// The bytes are decoded with the first encoding in [`Encoding::ATTEMPTS`]
/// that accepts them; the decoded text is then parsed once. A parse failure
/// is final and does not trigger another encoding attempt.
///
/// # Errors
///
/// Returns an error if the file cannot be read, cannot be decoded, has no
/// header row, or has a row with more fields than the header.
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = decode(&bytes).ok_or(LoadError::Undecodable)?;
    log::debug!("decoded {} as {}", path.display(), decoded.encoding);
    read_table(&decoded.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnType;
    use encoding_rs::WINDOWS_1251;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn load_utf8() {
        let file = write_temp("name,age\nЖанна,31\nZoë,28\n".as_bytes());
        let table = load(file.path()).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.row(1).unwrap().unwrap(),
            vec!["Zoë".to_string(), "28".to_string()]
        );
    }

    #[test]
    fn load_windows_1251() {
        let (bytes, _, unmappable) = WINDOWS_1251.encode("город,население\nМосква,12600000\n");
        assert!(!unmappable);
        assert!(std::str::from_utf8(&bytes).is_err());
        let file = write_temp(&bytes);
        let table = load(file.path()).unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec!["город", "население"]
        );
        assert_eq!(table.column(1).unwrap().column_type(), ColumnType::Int64);
        assert_eq!(
            table.row(0).unwrap().unwrap(),
            vec!["Москва".to_string(), "12600000".to_string()]
        );
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn load_empty_file() {
        let file = write_temp(b"");
        assert!(matches!(
            load(file.path()).unwrap_err(),
            LoadError::NoColumns
        ));
    }
}
