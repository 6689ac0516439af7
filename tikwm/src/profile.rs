//! Downloading every video of a profile.
//!
//! [`ProfileDownloader::stream`] walks the feed newest first and downloads one
//! video at a time, yielding a [`BatchResult`] as soon as each video is done.
//! Nothing runs in the background: work only advances while the stream is
//! polled, and dropping the stream abandons the batch without issuing further
//! requests.

use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use tokio_stream::StreamExt;

use crate::client::Tikwm;
use crate::error::{Error, Result};
use crate::filename::filename_for;
use crate::stop::{DownloadedInDirectory, StopPolicy};
use crate::transcode::Ffmpeg;
use crate::types::{BatchConfig, BatchFailure, BatchResult};

pub struct ProfileDownloader {
    client: Tikwm,
    config: BatchConfig,
    stop_policy: Arc<dyn StopPolicy>
}

impl Tikwm {
    pub fn profile(&self, config: BatchConfig) -> ProfileDownloader {
        ProfileDownloader::new(self.clone(), config)
    }
}

impl ProfileDownloader {
    /// Uses [`DownloadedInDirectory`] on the configured directory as the stop
    /// policy.
    pub fn new(client: Tikwm, config: BatchConfig) -> Self {
        let stop_policy = Arc::new(DownloadedInDirectory::new(&config.directory));
        Self {
            client,
            config,
            stop_policy
        }
    }

    /// Replaces the stop policy. It is still ignored when `check_all` is set.
    pub fn with_stop_policy(mut self, policy: impl StopPolicy + 'static) -> Self {
        self.stop_policy = Arc::new(policy);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs the batch, yielding one result per downloaded video.
    ///
    /// A failed transcode yields a non-fatal [`BatchResult::Failed`] followed
    /// by the [`BatchResult::Downloaded`] of the unconverted file. Any other
    /// failure is yielded once and ends the stream. Reaching a video the stop
    /// policy recognises ends the stream without an error, unless
    /// `check_all` is set.
    pub fn stream(self) -> Pin<Box<dyn Stream<Item = BatchResult> + Send + 'static>> {
        let ProfileDownloader {
            client,
            config,
            stop_policy
        } = self;

        Box::pin(async_stream::stream! {
            tracing::info!(
                "Downloading profile {} into {}",
                config.username,
                config.directory.display()
            );

            if let Err(e) = tokio::fs::create_dir_all(&config.directory).await {
                let error = Error::filesystem(&config.directory, e);
                tracing::error!("Failed to create download directory: {}", error);
                yield failed(None, error);
                return;
            }

            let transcoder = config.convert.then(|| Ffmpeg::with_binary(&config.ffmpeg));
            let mut pages = client.user_posts(&config.username);

            while let Some(page) = pages.next().await {
                let page = match page {
                    Ok(page) => page,
                    Err(error) => {
                        tracing::error!("Failed to fetch feed of {}: {}", config.username, error);
                        yield failed(None, error);
                        return;
                    }
                };

                for mut video in page.videos {
                    if video.author.username.is_empty() {
                        video.author.username.clone_from(&config.username);
                    }

                    if !config.check_all {
                        match stop_policy.should_stop(&video) {
                            Ok(false) => {}
                            Ok(true) => {
                                tracing::info!("{} is already downloaded, stopping", video.id);
                                return;
                            }
                            Err(error) => {
                                yield failed(Some(&video.id), error);
                                return;
                            }
                        }
                    }

                    let destination = config.directory.join(filename_for(&video));
                    let mut download = client.build_download(&video.page_url()).destination(destination);
                    if let Some(ref ffmpeg) = transcoder {
                        download = download.convert_with(ffmpeg.clone());
                    }

                    match download.download().await {
                        Ok(downloaded) => {
                            if let Some(error) = downloaded.transcode_error {
                                yield failed(Some(&video.id), error);
                            }
                            yield BatchResult::Downloaded(downloaded.path);
                        }
                        Err(error) => {
                            tracing::error!("Failed to download {}: {}", video.id, error);
                            yield failed(Some(&video.id), error);
                            return;
                        }
                    }
                }
            }

            tracing::info!("Finished profile {}", config.username);
        })
    }

    /// Runs the batch to completion and returns the downloaded files.
    ///
    /// Transcoding failures are logged and skipped; the first other failure
    /// is returned instead.
    pub async fn download_all(self) -> Result<Vec<PathBuf>> {
        let mut stream = self.stream();
        let mut files = Vec::new();

        while let Some(result) = stream.next().await {
            match result {
                BatchResult::Downloaded(path) => files.push(path),
                BatchResult::Failed(failure) if !failure.is_fatal() => {
                    tracing::warn!("{}", failure);
                }
                BatchResult::Failed(failure) => return Err(failure.error)
            }
        }

        Ok(files)
    }
}

fn failed(video_id: Option<&str>, error: Error) -> BatchResult {
    BatchResult::Failed(BatchFailure {
        video_id: video_id.map(str::to_string),
        error
    })
}
