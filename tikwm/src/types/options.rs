use std::path::PathBuf;

use crate::transcode::DEFAULT_FFMPEG_BINARY;

/// Settings for one profile download run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub username: String,
    pub directory: PathBuf,
    pub ffmpeg: PathBuf,
    /// Keep going past videos that are already on disk.
    pub check_all: bool,
    pub convert: bool
}

impl BatchConfig {
    /// Starts a config for `username` downloading into a directory of the
    /// same (normalised) name.
    pub fn new(username: &str) -> Self {
        let username = normalize_username(username);
        Self {
            directory: PathBuf::from(&username),
            username,
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG_BINARY),
            check_all: false,
            convert: false
        }
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = path.into();
        self
    }

    pub fn check_all(mut self, check_all: bool) -> Self {
        self.check_all = check_all;
        self
    }

    pub fn convert(mut self, convert: bool) -> Self {
        self.convert = convert;
        self
    }
}

/// Strips the `@` people tend to paste along with a handle and lowercases it.
pub fn normalize_username(username: &str) -> String {
    username
        .trim_matches(|c: char| c == '@' || c.is_whitespace())
        .to_lowercase()
}
