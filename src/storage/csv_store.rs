//! CSV-backed record store
//!
//! The store is a single CSV file: one header row (see [`HEADER`]) followed by
//! one row per record, in the order records were appended.

use crate::storage::schema::{header_matches, HEADER};
use crate::storage::traits::{RecordSink, StorageError, StorageResult};
use crate::storage::TradeRecord;
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How an existing store file is treated when opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Discard any existing content and start over with a fresh header
    Truncate,

    /// Keep existing rows and append after them; the header is written only
    /// if the file is missing or empty
    Append,
}

/// Append-only CSV record store
///
/// Each row is encoded in memory and written to the file in one piece. A
/// failed append truncates the file back to its last committed length, so a
/// later append never carries a leftover fragment of an earlier one.
pub struct CsvStore {
    path: PathBuf,
    file: File,
}

impl CsvStore {
    /// Opens (or creates) the store at `path`
    ///
    /// Either mode leaves the file with exactly one header row. In
    /// [`OpenMode::Append`] an existing header is checked against the schema
    /// and a mismatch is reported instead of appending misaligned rows.
    pub fn open(path: &Path, mode: OpenMode) -> StorageResult<Self> {
        let (file, needs_header) = match mode {
            OpenMode::Truncate => (File::create(path)?, true),
            OpenMode::Append => {
                let existing_len = match std::fs::metadata(path) {
                    Ok(meta) => meta.len(),
                    Err(e) if e.kind() == ErrorKind::NotFound => 0,
                    Err(e) => return Err(e.into()),
                };

                if existing_len > 0 {
                    verify_header(path)?;
                }

                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                if existing_len > 0 && !ends_with_newline(path)? {
                    file.write_all(b"\n")?;
                }
                (file, existing_len == 0)
            }
        };

        let mut store = Self {
            path: path.to_path_buf(),
            file,
        };

        if needs_header {
            tracing::debug!("Writing header to {}", path.display());
            let mut writer = row_writer();
            writer.write_record(HEADER)?;
            store.commit(&finish(writer)?)?;
        }

        Ok(store)
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record currently in the store at `path`
    ///
    /// A missing or empty file yields no records. Rows that cannot be decoded
    /// are skipped with a warning.
    pub fn load_records(path: &Path) -> StorageResult<Vec<TradeRecord>> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() == 0 => return Ok(Vec::new()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("{} not found, starting fresh", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        }

        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
        check_header(path, reader.headers()?)?;

        let mut records = Vec::new();
        for (row, result) in reader.deserialize::<TradeRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping unreadable row {} in {}: {}",
                        row + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    /// Writes one encoded row and forces it to disk
    ///
    /// On failure the file is cut back to its length before the write.
    fn commit(&mut self, row: &[u8]) -> StorageResult<()> {
        let committed = self.file.metadata()?.len();

        let written = self
            .file
            .write_all(row)
            .and_then(|()| self.file.sync_data());

        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(committed) {
                tracing::error!(
                    "Could not roll back partial write to {}: {}",
                    self.path.display(),
                    rollback
                );
            }
            return Err(e.into());
        }

        Ok(())
    }
}

impl RecordSink for CsvStore {
    fn append(&mut self, record: &TradeRecord) -> StorageResult<()> {
        let mut writer = row_writer();
        writer.serialize(record)?;
        let row = finish(writer)?;
        self.commit(&row)
    }
}

fn row_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> StorageResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| StorageError::Io(e.into_error()))
}

fn verify_header(path: &Path) -> StorageResult<()> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    check_header(path, reader.headers()?)
}

fn check_header(path: &Path, headers: &csv::StringRecord) -> StorageResult<()> {
    let found: Vec<String> = headers.iter().map(str::to_string).collect();
    if header_matches(found.as_slice()) {
        Ok(())
    } else {
        Err(StorageError::SchemaMismatch {
            path: path.display().to_string(),
            found,
        })
    }
}

fn ends_with_newline(path: &Path) -> StorageResult<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
