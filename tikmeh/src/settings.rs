use std::path::{Path, PathBuf};

use tikwm::normalize_username;

pub const DEFAULT_WORKING_DIRECTORY: &str = ".";

/// Where single videos go when no directory was given.
pub fn videos_directory(directory: Option<&Path>) -> PathBuf {
    directory.map_or_else(|| PathBuf::from(DEFAULT_WORKING_DIRECTORY), Path::to_path_buf)
}

/// Where a profile goes when no directory was given: a folder named after the
/// user.
pub fn profile_directory(directory: Option<&Path>, username: &str) -> PathBuf {
    directory.map_or_else(|| PathBuf::from(normalize_username(username)), Path::to_path_buf)
}
