use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use futures_core::Stream;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::fetch::fetch;
use crate::filename::filename_for;
use crate::rate_gate::RateGate;
use crate::transcode::{Ffmpeg, h264_path};
use crate::types::{DownloadedVideo, Envelope, Page, ResolvedVideo, VideoRecord};

pub const DEFAULT_BASE_URL: &str = "https://www.tikwm.com";

/// Page size requested from the profile listing; the largest tikwm accepts.
const POSTS_PER_PAGE: &str = "34";

/// Client for the tikwm mirror API.
///
/// Cheap to clone; clones share the HTTP connection pool and the rate gate.
#[derive(Debug, Clone)]
pub struct Tikwm {
    http: reqwest::Client,
    base_url: String,
    gate: Arc<RateGate>
}

impl Tikwm {
    pub fn new(gate: Arc<RateGate>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            gate
        }
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = url.into().trim_end_matches('/').to_string();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Posts `form` to `endpoint` once the rate gate allows it and returns the
    /// raw response body.
    pub async fn gated_request(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));

        self.gate.acquire().await;
        tracing::debug!(url = %url, "calling tikwm");

        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::network(&url, e))?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url,
                status: response.status().as_u16()
            });
        }

        let body = response.bytes().await.map_err(|e| Error::network(&url, e))?;
        Ok(body.to_vec())
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &str, form: &[(&str, &str)]) -> Result<T> {
        let body = self.gated_request(endpoint, form).await?;
        Envelope::parse(endpoint, &body)?.into_data(endpoint)
    }

    /// Looks up a single video by page URL or bare id.
    #[tracing::instrument(skip(self))]
    pub async fn get_video_info(&self, reference: &str) -> Result<VideoRecord> {
        self.call("api/", &[("url", reference), ("hd", "1")]).await
    }

    /// Looks up a video and picks the best source to download.
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedVideo> {
        let record = self.get_video_info(reference).await?;
        select_source(reference, record)
    }

    /// Fetches one page of `username`'s feed starting at `cursor`.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_posts(&self, username: &str, cursor: &str) -> Result<Page> {
        self.call("api/user/posts/", &[
            ("unique_id", username),
            ("count", POSTS_PER_PAGE),
            ("cursor", cursor)
        ])
        .await
    }

    /// Walks `username`'s feed page by page, newest videos first.
    ///
    /// Each page is requested only when the previous one has been consumed.
    /// The stream ends after a page without more results, or with the first
    /// error.
    pub fn user_posts<'a>(
        &'a self,
        username: &'a str
    ) -> Pin<Box<dyn Stream<Item = Result<Page>> + Send + 'a>> {
        Box::pin(async_stream::try_stream! {
            let mut cursor = "0".to_string();

            loop {
                let page = self.get_user_posts(username, &cursor).await?;
                tracing::debug!(
                    username,
                    cursor = %cursor,
                    videos = page.videos.len(),
                    has_more = page.has_more,
                    "fetched feed page"
                );

                let next = if page.has_more { Some(page.cursor.clone()) } else { None };
                yield page;

                match next {
                    Some(next) => cursor = next,
                    None => break
                }
            }
        })
    }

    /// Downloads a video to `destination`, or to a generated file name in the
    /// current directory when `None`. See [`DownloadBuilder::destination`].
    pub async fn download(
        &self,
        reference: &str,
        destination: Option<&Path>
    ) -> Result<DownloadedVideo> {
        let mut builder = self.build_download(reference);
        if let Some(destination) = destination {
            builder = builder.destination(destination);
        }
        builder.download().await
    }

    pub fn build_download(&self, reference: &str) -> DownloadBuilder {
        DownloadBuilder::new(self.clone(), reference.to_string())
    }
}

fn select_source(reference: &str, record: VideoRecord) -> Result<ResolvedVideo> {
    if let Some(url) = record.hd_source().map(str::to_string) {
        return Ok(ResolvedVideo {
            record,
            source_url: url,
            hd: true
        });
    }

    if let Some(url) = record.sd_source().map(str::to_string) {
        tracing::info!("tikwm couldn't find HD version for {}, downloading how it is", reference);
        return Ok(ResolvedVideo {
            record,
            source_url: url,
            hd: false
        });
    }

    Err(Error::NotFound {
        reference: reference.to_string()
    })
}

/// Where a download lands: a generated name inside `destination` if that is
/// an existing directory, `destination` itself otherwise, or a generated name
/// in the working directory when no destination was given.
fn destination_path(destination: Option<&Path>, filename: &str) -> PathBuf {
    match destination {
        Some(path) if path.as_os_str().is_empty() => PathBuf::from(filename),
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename)
    }
}

pub struct DownloadBuilder {
    client: Tikwm,
    reference: String,
    destination: Option<PathBuf>,
    transcoder: Option<Ffmpeg>
}

impl DownloadBuilder {
    fn new(client: Tikwm, reference: String) -> Self {
        Self {
            client,
            reference,
            destination: None,
            transcoder: None
        }
    }

    /// A directory to place the generated file name in, or the exact file
    /// path to write.
    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    /// Re-encode to H.264 after downloading.
    pub fn convert_with(mut self, ffmpeg: Ffmpeg) -> Self {
        self.transcoder = Some(ffmpeg);
        self
    }

    #[tracing::instrument(skip(self), fields(reference = %self.reference))]
    pub async fn download(self) -> Result<DownloadedVideo> {
        let resolved = self.client.resolve(&self.reference).await?;
        let path = destination_path(self.destination.as_deref(), &filename_for(&resolved.record));

        fetch(self.client.http(), &resolved.source_url, &path).await?;
        tracing::info!("Downloaded {}", path.display());

        let transcode_error = match self.transcoder {
            Some(ref ffmpeg) => convert_in_place(ffmpeg, &path).await?,
            None => None
        };

        Ok(DownloadedVideo {
            path,
            hd: resolved.hd,
            transcode_error
        })
    }
}

/// Replaces `path` with its H.264 re-encode.
///
/// A failed conversion is returned as `Ok(Some(_))` and leaves `path` as it
/// was; only a failed rename of a finished conversion is an `Err`.
async fn convert_in_place(ffmpeg: &Ffmpeg, path: &Path) -> Result<Option<Error>> {
    match ffmpeg.convert_to_h264(path).await {
        Ok(converted) => {
            tokio::fs::rename(&converted, path)
                .await
                .map_err(|e| Error::filesystem(path, e))?;
            tracing::info!("Converted {} to h264", path.display());
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("Failed to convert {}: {}", path.display(), e);
            let _ = tokio::fs::remove_file(h264_path(path)).await;
            Ok(Some(e))
        }
    }
}
