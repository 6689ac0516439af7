use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tikwm::DEFAULT_BASE_URL;

/// Download TikTok videos in the best quality.
#[derive(Parser, Debug)]
#[command(name = "tikmeh", version, about)]
#[command(after_help = "\
Examples:
  tikmeh                                                     start in interactive mode
  tikmeh tiktok.com/@shrimpydimpy/video/7133412834960018730  download a tiktok to the current directory
  tikmeh --convert --directory goddess 7133412834960018730   download to ./goddess and convert to h.264
  tikmeh --convert profile shrimpydimpy                      download shrimpydimpy videos and convert them to h.264")]
pub struct Cli {
    /// Video links or ids to download
    pub videos: Vec<String>,

    /// Target directory, created if not found [default: username of the profile, or current for videos]
    #[arg(short, long, global = true, env = "TIKMEH_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Convert downloaded files to h264 with ffmpeg
    #[arg(short, long, global = true)]
    pub convert: bool,

    /// Path to ffmpeg (only needed with --convert)
    #[arg(short, long, global = true, default_value = "ffmpeg", env = "TIKMEH_FFMPEG")]
    pub ffmpeg: PathBuf,

    /// Print output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Minimum delay between tikwm API calls in milliseconds (0 to disable)
    #[arg(long, global = true, default_value_t = 11_000, env = "TIKMEH_INTERVAL_MS")]
    pub interval: u64,

    /// tikwm API base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL, env = "TIKWM_BASE_URL")]
    pub base_url: String,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download all videos of TikTok users, until an already downloaded one is met
    #[command(visible_alias = "p")]
    #[command(after_help = "\
Examples:
  tikmeh profile shrimpydimpy losertron    download their videos to ./shrimpydimpy and ./losertron
  tikmeh -d . -c profile --all losertron   download all losertron videos to the current directory, convert to h.264")]
    Profile {
        /// Usernames, with or without the leading @
        #[arg(required = true)]
        usernames: Vec<String>,

        /// Don't stop when an already downloaded video is met, to ensure everything is downloaded
        #[arg(short, long)]
        all: bool
    }
}

impl Cli {
    /// Default `tracing` filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "tikmeh=error,tikwm=error";
        }
        match self.verbose {
            0 => "tikmeh=info,tikwm=info",
            1 => "tikmeh=debug,tikwm=debug",
            _ => "tikmeh=trace,tikwm=trace"
        }
    }
}
