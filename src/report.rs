/// JSON report output for completed runs.
///
/// Every organize run can leave behind a JSON file listing the moves it
/// performed, one timestamped file per run under a configurable directory.
use crate::organizer::ActionRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while writing a report.
#[derive(Debug)]
pub enum ReportError {
    /// Failed to create the report directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write the report file.
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize the records to JSON.
    SerializeFailed { source: serde_json::Error },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create report directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write report {}: {}", path.display(), source)
            }
            Self::SerializeFailed { source } => {
                write!(f, "Failed to serialize report: {}", source)
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Writes run reports into a report directory.
pub struct ReportWriter {
    report_dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer targeting `report_dir`. Nothing is touched on disk
    /// until [`ReportWriter::write`] is called.
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// The directory reports are written into.
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Writes one report file holding `records` and returns its path.
    ///
    /// The report directory is created if missing. The file is named with
    /// the local wall-clock time of the run, e.g. `report_20260821_143501.json`.
    pub fn write(&self, records: &[ActionRecord]) -> ReportResult<PathBuf> {
        fs::create_dir_all(&self.report_dir).map_err(|e| ReportError::DirectoryCreationFailed {
            path: self.report_dir.clone(),
            source: e,
        })?;

        let file_name = format!(
            "report_{}.json",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        let report_path = self.report_dir.join(file_name);

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| ReportError::SerializeFailed { source: e })?;

        fs::write(&report_path, json).map_err(|e| ReportError::WriteFailed {
            path: report_path.clone(),
            source: e,
        })?;

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::ActionKind;
    use tempfile::TempDir;

    fn sample_record(name: &str) -> ActionRecord {
        ActionRecord {
            file_name: name.to_string(),
            source_dir: PathBuf::from("/downloads"),
            dest_dir: PathBuf::from("/downloads/Documents"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            action: ActionKind::Moved,
        }
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report_dir = temp_dir.path().join("reports");
        let writer = ReportWriter::new(&report_dir);

        let path = writer
            .write(&[sample_record("report.pdf")])
            .expect("Failed to write report");

        assert_eq!(writer.report_dir(), report_dir.as_path());
        assert!(report_dir.is_dir());
        assert!(path.exists());
        assert_eq!(path.parent(), Some(writer.report_dir()));

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        assert!(name.starts_with("report_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_write_round_trips_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let writer = ReportWriter::new(temp_dir.path().join("reports"));

        let records = vec![sample_record("a.pdf"), sample_record("b.pdf")];
        let path = writer.write(&records).expect("Failed to write report");

        let json = fs::read_to_string(&path).expect("Failed to read report");
        let parsed: Vec<ActionRecord> =
            serde_json::from_str(&json).expect("Failed to parse report");

        assert_eq!(parsed, records);
    }

    #[test]
    fn test_write_empty_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let writer = ReportWriter::new(temp_dir.path().join("reports"));

        let path = writer.write(&[]).expect("Failed to write report");

        let json = fs::read_to_string(&path).expect("Failed to read report");
        let parsed: Vec<ActionRecord> =
            serde_json::from_str(&json).expect("Failed to parse report");
        assert!(parsed.is_empty());
    }
}
