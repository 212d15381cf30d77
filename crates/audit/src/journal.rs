//! Append-only journal writer with daily file rotation
//!
//! One JSONL file per UTC day under the journal directory. The writer
//! resumes the chain from the newest record on disk at open, so restarts
//! never fork the chain.

use crate::chain::GENESIS;
use crate::error::AuditError;
use crate::reader::AuditReader;
use crate::record::{AuditEvent, AuditRecord};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only chained journal
pub struct AuditJournal {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    next_sequence: u64,
    last_hash: String,
}

impl AuditJournal {
    /// Open (or create) the journal directory and resume the chain
    pub fn open(base_path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let reader = AuditReader::from_directory(&base_path)?;
        let (next_sequence, last_hash) = match reader.last_record()? {
            Some(last) => (last.sequence + 1, last.hash),
            None => (1, GENESIS.to_string()),
        };

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            next_sequence,
            last_hash,
        })
    }

    /// Append one event, chained to the previous record.
    ///
    /// The line is flushed before returning; a crash after `append`
    /// returns never loses the record.
    pub fn append(&mut self, actor: &str, event: AuditEvent) -> Result<AuditRecord, AuditError> {
        let record = AuditRecord::next(self.next_sequence, self.last_hash.clone(), actor, event);

        let date = record.timestamp.format("%Y-%m-%d").to_string();
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(&record)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.next_sequence += 1;
        self.last_hash = record.hash.clone();
        Ok(record)
    }

    /// Rotate to a new file for the given date
    fn rotate_file(&mut self, date: &str) -> Result<(), AuditError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new().create(true).append(true).open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    /// Next sequence number this journal will assign
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), AuditError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for AuditJournal {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
