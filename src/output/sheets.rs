//! CSV writer for export sheets.

use super::json::ensure_parent_dir;
use crate::report::Sheet;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Write each sheet to `<dir>/<name>.csv`
///
/// Creates `dir` when missing. Returns the written paths in sheet order.
///
/// # Errors
/// * `OutputError::InvalidPath` - `dir` is a file or cannot be created
/// * `OutputError::SheetFailed` - CSV write error
pub fn write_sheets(sheets: &[Sheet], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, OutputError> {
    let dir = dir.as_ref();

    if dir.is_file() {
        return Err(OutputError::InvalidPath(format!(
            "Export path is a file: {}",
            dir.display()
        )));
    }

    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let path = dir.join(format!("{}.csv", sheet.name));
        ensure_parent_dir(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(OutputError::WriteFailed)?;

        debug!("Wrote sheet '{}' ({} rows)", sheet.name, sheet.rows.len());
        written.push(path);
    }

    info!("Exported {} sheets to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = Sheet {
            name: "what_if".to_string(),
            headers: vec!["scenario".to_string(), "savings".to_string()],
            rows: vec![vec!["total".to_string(), "150".to_string()]],
        };

        let out = dir.path().join("export");
        let paths = write_sheets(&[sheet], &out).unwrap();

        assert_eq!(paths, vec![out.join("what_if.csv")]);
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(content, "scenario,savings\ntotal,150\n");
    }

    #[test]
    fn test_rejects_file_target() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            write_sheets(&[], file.path()),
            Err(OutputError::InvalidPath(_))
        ));
    }
}
