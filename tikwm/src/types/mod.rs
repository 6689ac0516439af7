mod options;
mod outcome;
mod video_info;

pub use options::{BatchConfig, normalize_username};
pub use outcome::{BatchFailure, BatchResult, DownloadedVideo, ResolvedVideo};
pub(crate) use video_info::Envelope;
pub use video_info::{Author, Page, VideoRecord, video_page_url};
