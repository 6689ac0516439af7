use std::path::PathBuf;
use std::sync::Arc;

use tikwm::{BatchConfig, BatchResult, Ffmpeg, RateGate, Tikwm};
use tokio_stream::StreamExt;

use crate::cli::{Cli, Command};
use crate::output::Output;
use crate::settings;

/// Runs one parsed command line against the process-wide rate gate.
pub async fn run(cli: &Cli, gate: &Arc<RateGate>) -> anyhow::Result<()> {
    let mut client = Tikwm::new(Arc::clone(gate));
    client.set_base_url(&cli.base_url);

    let mut out = Output::new(cli.json);

    match &cli.command {
        Some(Command::Profile { usernames, all }) => {
            download_profiles(&client, cli, usernames, *all, &mut out).await;
        }
        None => download_videos(&client, cli, &mut out).await
    }

    out.finish()?;
    Ok(())
}

async fn download_videos(client: &Tikwm, cli: &Cli, out: &mut Output) {
    if cli.videos.is_empty() {
        tracing::info!("Nothing to download, see --help");
        return;
    }

    let directory = settings::videos_directory(cli.directory.as_deref());
    if let Err(e) = tokio::fs::create_dir_all(&directory).await {
        out.error(format!(
            "while creating directory {}, an error occurred: {e}",
            directory.display()
        ));
        return;
    }

    for video in &cli.videos {
        let mut download = client.build_download(video).destination(&directory);
        if cli.convert {
            download = download.convert_with(Ffmpeg::with_binary(&cli.ffmpeg));
        }

        match download.download().await {
            Ok(downloaded) => {
                if let Some(e) = downloaded.transcode_error {
                    out.error(e.to_string());
                    return;
                }
                out.file(&downloaded.path);
            }
            Err(e) => {
                out.error(format!("while downloading {video}, an error occurred: {e}"));
                return;
            }
        }
    }
}

async fn download_profiles(
    client: &Tikwm,
    cli: &Cli,
    usernames: &[String],
    all: bool,
    out: &mut Output
) {
    for username in usernames {
        let config = BatchConfig::new(username)
            .directory(profile_directory(cli, username))
            .ffmpeg(&cli.ffmpeg)
            .check_all(all)
            .convert(cli.convert);

        let mut results = client.profile(config).stream();
        while let Some(result) = results.next().await {
            match result {
                BatchResult::Downloaded(path) => out.file(&path),
                BatchResult::Failed(failure) if !failure.is_fatal() => {
                    out.warning(&failure.to_string());
                }
                BatchResult::Failed(failure) => {
                    out.error(format!("while downloading {username}, an error occurred: {failure}"));
                }
            }
        }
    }
}

fn profile_directory(cli: &Cli, username: &str) -> PathBuf {
    settings::profile_directory(cli.directory.as_deref(), username)
}
