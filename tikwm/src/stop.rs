use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::VideoRecord;

/// Decides whether a profile batch should end at a given video.
///
/// Feeds are returned newest first, so the first video already on disk
/// means everything after it was fetched by an earlier run.
pub trait StopPolicy: Send + Sync {
    fn should_stop(&self, video: &VideoRecord) -> Result<bool>;
}

/// Stops at the first video whose id appears in any file name in the
/// directory.
///
/// Matching on the id alone still works after the author renames their
/// account, when the username part of existing file names no longer matches.
#[derive(Debug, Clone)]
pub struct DownloadedInDirectory {
    directory: PathBuf
}

impl DownloadedInDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into()
        }
    }

    /// Lists the directory on every call so files written by another process
    /// in the meantime are seen.
    pub fn is_downloaded(&self, id: &str) -> Result<bool> {
        is_downloaded(&self.directory, id)
    }
}

impl StopPolicy for DownloadedInDirectory {
    fn should_stop(&self, video: &VideoRecord) -> Result<bool> {
        self.is_downloaded(&video.id)
    }
}

pub fn is_downloaded(directory: &Path, id: &str) -> Result<bool> {
    let entries = std::fs::read_dir(directory).map_err(|e| Error::filesystem(directory, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::filesystem(directory, e))?;
        if entry.file_name().to_string_lossy().contains(id) {
            return Ok(true);
        }
    }
    Ok(false)
}
