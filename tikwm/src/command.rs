use std::path::{Path, PathBuf};
use tokio::process::Command;

pub struct CommandBuilder {
    binary: PathBuf,
    args: Vec<String>
}

impl CommandBuilder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.arg("-vcodec").arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.arg("-acodec").arg(codec)
    }

    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.arg("-preset").arg(preset)
    }

    pub fn output(self, path: impl AsRef<Path>) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Re-encodes to H.264/AAC, which every player handles, unlike the HEVC
    /// streams tikwm often serves.
    pub fn h264(self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        self.input(input)
            .video_codec("libx264")
            .audio_codec("aac")
            .overwrite()
            .preset("fast")
            .output(output)
    }

    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&self.args);
        cmd.kill_on_drop(true);
        cmd
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}
