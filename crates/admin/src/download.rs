//! Saving exported reports to disk.
//!
//! Exports arrive as an in-memory binary payload. A [`DownloadSink`] turns
//! the payload into a file the admin can open; [`DirectorySink`] writes it
//! next to the other downloads under a dated filename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("download I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Filenames must be a single path component.
    #[error("invalid download filename: {0}")]
    InvalidFilename(String),
}

/// Destination for exported files.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Persist `bytes` as `filename` and return where it ended up.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError>;
}

/// Writes downloads into a directory.
///
/// The payload goes to `<name>.part` first and is renamed into place once
/// fully written, so a reader never sees a half-written export.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    #[instrument(skip(self, bytes), fields(dir = %self.dir.display(), size = bytes.len()))]
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        validate_filename(filename)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.dir.join(filename);
        let partial = self.dir.join(format!("{filename}.part"));

        if let Err(e) = tokio::fs::write(&partial, bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        tokio::fs::rename(&partial, &target).await?;

        debug!(path = %target.display(), "Saved download");
        Ok(target)
    }
}

fn validate_filename(filename: &str) -> Result<(), DownloadError> {
    let single_component = Path::new(filename)
        .file_name()
        .is_some_and(|name| name == filename);
    if filename.is_empty() || !single_component {
        return Err(DownloadError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// `<prefix>-YYYY-MM-DD.<extension>`
#[must_use]
pub fn dated_filename(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}-{}.{extension}", date.format("%Y-%m-%d"))
}

/// Today's date in the local time zone.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
