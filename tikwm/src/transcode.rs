use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::command::CommandBuilder;
use crate::error::{Error, Result};

pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Thin wrapper around an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new()
    }
}

impl Ffmpeg {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_FFMPEG_BINARY)
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: path.into()
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the first line of `ffmpeg -version`.
    pub async fn check_binary(&self) -> Result<String> {
        let output = CommandBuilder::new(&self.binary)
            .arg("-version")
            .build()
            .output()
            .await
            .map_err(|e| Error::Transcode {
                path: self.binary.clone(),
                reason: format!("failed to execute {}: {e}", self.binary.display())
            })?;

        if !output.status.success() {
            return Err(Error::Transcode {
                path: self.binary.clone(),
                reason: format!("{} -version exited with {}", self.binary.display(), output.status)
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Re-encodes `input` into a sibling file `<input>.h264.mp4` and returns
    /// its path. The input is left untouched.
    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    pub async fn convert_to_h264(&self, input: &Path) -> Result<PathBuf> {
        let output_path = h264_path(input);
        let builder = CommandBuilder::new(&self.binary).h264(input, &output_path);

        tracing::debug!(
            binary = %self.binary.display(),
            args = ?builder.get_args(),
            "spawning ffmpeg"
        );

        let output = builder.build().output().await.map_err(|e| Error::Transcode {
            path: input.to_path_buf(),
            reason: format!("failed to execute {}: {e}", self.binary.display())
        })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Transcode {
                path: input.to_path_buf(),
                reason: format!(
                    "ffmpeg exited with code {}\n{}{}",
                    output.status.code().unwrap_or(-1),
                    stdout.trim_end(),
                    stderr.trim_end()
                )
            });
        }

        Ok(output_path)
    }
}

pub fn h264_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".h264.mp4");
    PathBuf::from(name)
}
