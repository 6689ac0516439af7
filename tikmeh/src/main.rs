mod cli;
mod commands;
mod output;
mod settings;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tikwm::RateGate;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args_os().len() > 1 {
        let cli = Cli::parse();
        init_tracing(cli.log_filter());
        let gate = rate_gate(&cli);
        return commands::run(&cli, &gate).await;
    }

    let defaults = Cli::try_parse_from(["tikmeh"])?;
    init_tracing(defaults.log_filter());
    interactive(rate_gate(&defaults)).await
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into())
        )
        .init();
}

/// One gate for the whole process, so interactive commands share the spacing.
fn rate_gate(cli: &Cli) -> Arc<RateGate> {
    let gate = if cli.interval == 0 {
        RateGate::disabled()
    } else {
        RateGate::new(Duration::from_millis(cli.interval))
    };
    Arc::new(gate)
}

async fn interactive(gate: Arc<RateGate>) -> anyhow::Result<()> {
    println!("tikmeh {} - TikTok downloader", env!("CARGO_PKG_VERSION"));
    println!("Enter 'help' to get help message.");
    println!("Empty line to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(">>> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let args = std::iter::once("tikmeh").chain(line.split_whitespace());
        match Cli::try_parse_from(args) {
            Ok(cli) => {
                if let Err(e) = commands::run(&cli, &gate).await {
                    tracing::error!("{e:#}");
                }
            }
            Err(e) => e.print()?
        }
    }

    Ok(())
}
