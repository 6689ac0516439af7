use std::path::PathBuf;

use crate::error::Error;
use crate::types::VideoRecord;

/// A lookup result with the source URL that should be fetched.
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    pub record: VideoRecord,
    pub source_url: String,
    /// `false` when only the standard-quality source was available.
    pub hd: bool
}

/// A video that is now on disk.
#[derive(Debug)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub hd: bool,
    /// Set when conversion was requested and failed. The file at `path` is
    /// then the untouched original download.
    pub transcode_error: Option<Error>
}

/// One item of a profile batch stream.
#[derive(Debug)]
pub enum BatchResult {
    Downloaded(PathBuf),
    Failed(BatchFailure)
}

#[derive(Debug)]
pub struct BatchFailure {
    /// The video being processed, if the failure is tied to one.
    pub video_id: Option<String>,
    pub error: Error
}

impl BatchResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, BatchResult::Failed(_))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            BatchResult::Downloaded(path) => Some(path),
            BatchResult::Failed(_) => None
        }
    }
}

impl BatchFailure {
    pub fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }
}

impl std::fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.video_id {
            Some(id) => write!(f, "video {id}: {}", self.error),
            None => write!(f, "{}", self.error)
        }
    }
}
