use std::path::Path;

use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, Result};

/// Streams `url` into `path`, replacing any existing file, and returns the
/// number of bytes written. A partially written file is removed on failure.
///
/// Media hosts are not the API, so this does not go through the rate gate.
pub async fn fetch(http: &reqwest::Client, url: &str, path: &Path) -> Result<u64> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| Error::network(url, e))?;

    if !response.status().is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16()
        });
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::filesystem(parent, e))?;
    }

    let file = fs::File::create(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?;

    match write_body(file, response, url, path).await {
        Ok(bytes) => {
            tracing::debug!("Fetched {} bytes from {} to {}", bytes, url, path.display());
            Ok(bytes)
        }
        Err(e) => {
            let _ = fs::remove_file(path).await;
            Err(e)
        }
    }
}

async fn write_body(
    file: fs::File,
    mut response: reqwest::Response,
    url: &str,
    path: &Path
) -> Result<u64> {
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(|e| Error::network(url, e))? {
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| Error::filesystem(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| Error::filesystem(path, e))?;

    Ok(bytes_written)
}
