use std::path::PathBuf;

/// Coarse classification of [`Error`] used by callers that only care about
/// how to react, not about the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Upstream,
    NotFound,
    Network,
    Filesystem,
    Transcode
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tikwm responded with code {code}: {message}")]
    Upstream { code: i64, message: String },

    #[error("failed to parse response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error
    },

    #[error("no download links found for {reference}")]
    NotFound { reference: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error
    },

    #[error("{url} responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("while converting {path}, an error occurred: {reason}")]
    Transcode { path: PathBuf, reason: String }
}

impl Error {
    pub(crate) fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Upstream { .. } | Error::InvalidResponse { .. } => ErrorKind::Upstream,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Network { .. } | Error::HttpStatus { .. } => ErrorKind::Network,
            Error::Filesystem { .. } => ErrorKind::Filesystem,
            Error::Transcode { .. } => ErrorKind::Transcode
        }
    }

    /// Whether this error ends a profile batch. Only transcoding failures
    /// leave the downloaded file usable.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Transcode
    }
}

pub type Result<T> = std::result::Result<T, Error>;
