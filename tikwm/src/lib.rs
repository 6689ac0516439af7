//! Async client for the tikwm TikTok mirror API.
//!
//! This library resolves TikTok videos to their best available source,
//! downloads them, optionally re-encodes them to H.264 with ffmpeg, and
//! downloads whole profiles incrementally. All API calls made through one
//! [`Tikwm`] client (and its clones) are spaced out by a shared [`RateGate`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tikwm::{BatchConfig, BatchResult, RateGate, Tikwm};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> tikwm::Result<()> {
//!     let client = Tikwm::new(Arc::new(RateGate::default()));
//!
//!     // Download a single video into the current directory
//!     let video = client
//!         .download("https://www.tiktok.com/@shrimpydimpy/video/7133412834960018730", None)
//!         .await?;
//!     println!("downloaded {}", video.path.display());
//!
//!     // Download a profile until an already downloaded video is met
//!     let mut results = client.profile(BatchConfig::new("shrimpydimpy")).stream();
//!     while let Some(result) = results.next().await {
//!         match result {
//!             BatchResult::Downloaded(path) => println!("downloaded {}", path.display()),
//!             BatchResult::Failed(failure) => eprintln!("{failure}")
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod command;
pub mod error;
mod fetch;
pub mod filename;
mod profile;
mod rate_gate;
pub mod stop;
mod transcode;
pub mod types;

pub use client::{DEFAULT_BASE_URL, DownloadBuilder, Tikwm};
pub use error::{Error, ErrorKind, Result};
pub use fetch::fetch;
pub use filename::generate_filename;
pub use profile::ProfileDownloader;
pub use rate_gate::{DEFAULT_MIN_INTERVAL, RateGate};
pub use stop::{DownloadedInDirectory, StopPolicy};
pub use transcode::{DEFAULT_FFMPEG_BINARY, Ffmpeg};
pub use types::{
    Author, BatchConfig, BatchFailure, BatchResult, DownloadedVideo, Page, ResolvedVideo,
    VideoRecord, normalize_username
};
