//! Append-only chain report log.
//!
//! One UTF-8 text file per analysed source file, named after the source
//! file (`<dir>/<file name>.txt`), one line per chain record:
//! `<call-text> -> <dependency-text> in line <n>`. Files are created on
//! first write and appended to afterwards.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use apiguard_core::types::ChainRecord;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create report directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("source path {0} has no file name")]
    NoFileName(String),
}

pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Report path for a source file: `Foo.java` → `<dir>/Foo.java.txt`.
    pub fn report_path(&self, source_file: &Path) -> Result<PathBuf, ReportError> {
        let name = source_file
            .file_name()
            .ok_or_else(|| ReportError::NoFileName(source_file.display().to_string()))?;
        let mut file_name = name.to_os_string();
        file_name.push(".txt");
        Ok(self.dir.join(file_name))
    }

    /// Append one line per record. Nothing is written, and no file is
    /// created, when `records` is empty.
    pub fn append(
        &self,
        source_file: &Path,
        records: &[ChainRecord],
    ) -> Result<Option<PathBuf>, ReportError> {
        if records.is_empty() {
            return Ok(None);
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| ReportError::CreateDir {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let path = self.report_path(source_file)?;
        let write_err = |e| ReportError::Write {
            path: path.display().to_string(),
            source: e,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;

        let mut body = String::new();
        for record in records {
            body.push_str(&record.report_line());
            body.push('\n');
        }
        file.write_all(body.as_bytes()).map_err(write_err)?;

        tracing::debug!(path = %path.display(), lines = records.len(), "appended chain report");
        Ok(Some(path))
    }
}
