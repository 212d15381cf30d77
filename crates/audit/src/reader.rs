//! Sequential journal reader

use crate::error::AuditError;
use crate::record::AuditRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads records from all journal files in date order
pub struct AuditReader {
    files: Vec<PathBuf>,
}

impl AuditReader {
    /// Create a reader over a journal directory
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let entry = entry?;
                let file_path = entry.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        // Daily file names sort chronologically
        files.sort();

        Ok(Self { files })
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<AuditRecord>, AuditError> {
        let mut records = Vec::new();

        for file_path in &self.files {
            let file = File::open(file_path)?;
            let reader = BufReader::new(file);

            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let record: AuditRecord = serde_json::from_str(&line)?;
                records.push(record);
            }
        }

        Ok(records)
    }

    /// The newest record across all files, if any
    pub fn last_record(&self) -> Result<Option<AuditRecord>, AuditError> {
        Ok(self.read_all()?.into_iter().last())
    }

    /// Count records across all files
    pub fn count(&self) -> Result<usize, AuditError> {
        Ok(self.read_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::AuditJournal;
    use crate::record::AuditEvent;
    use tempfile::tempdir;

    #[test]
    fn test_missing_directory_reads_empty() {
        let dir = tempdir().unwrap();
        let reader = AuditReader::from_directory(dir.path().join("absent")).unwrap();
        assert!(reader.read_all().unwrap().is_empty());
        assert!(reader.last_record().unwrap().is_none());
        assert_eq!(reader.count().unwrap(), 0);
    }

    #[test]
    fn test_reads_back_appended_records() {
        let dir = tempdir().unwrap();
        let mut journal = AuditJournal::open(dir.path()).unwrap();
        for n in 1..=3 {
            journal
                .append(
                    "compliance.iris",
                    AuditEvent::AssessmentAccepted {
                        assessment_id: format!("a-{}", n),
                        client_id: "client-1".to_string(),
                        risk_level: "medium".to_string(),
                    },
                )
                .unwrap();
        }
        journal.close().unwrap();

        let reader = AuditReader::from_directory(dir.path()).unwrap();
        assert_eq!(reader.count().unwrap(), 3);
        let last = reader.last_record().unwrap().unwrap();
        assert_eq!(last.sequence, 3);
    }

    #[test]
    fn test_non_jsonl_files_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a journal").unwrap();

        let reader = AuditReader::from_directory(dir.path()).unwrap();
        assert_eq!(reader.count().unwrap(), 0);
    }
}
