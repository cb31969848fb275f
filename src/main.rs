mod api;
mod cli;
mod config;
mod error;
mod health;
mod poller;
mod ui;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::{ApiClient, Submission};
use cli::{Cli, Command};
use config::AegisConfig;
use error::AegisError;
use health::HealthMonitor;
use poller::Poller;
use ui::PollProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "aegis=debug" } else { "aegis=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), AegisError> {
    let mut config = AegisConfig::load()?;
    // CLI flags override both the file and the environment.
    config.apply_base_override(cli.api_base);
    if let Some(interval_ms) = cli.interval_ms {
        config.poll_interval_ms = interval_ms;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }

    let client = ApiClient::new(config.api_base.clone());

    match cli.command {
        Command::Protect {
            file,
            method,
            owner,
        } => {
            let mut submission = Submission::new(file_name_of(&file), std::fs::read(&file)?)
                .part_name("image");
            if let Some(owner) = owner {
                submission = submission.field("owner", owner);
            }

            if method == "fawkes" {
                // Legacy synchronous path: no queue, no polling.
                let result = client.protect_sync(&submission).await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let submission = submission.field("type", method);
            let handle = client.enqueue(&submission).await?;

            let progress = PollProgress::start(&handle.id);
            let mut session = Poller::start(client, handle, config.poll_config());
            while let Some(update) = session.next_update().await {
                progress.update(&update);
            }
            let report = session.outcome().await?;
            progress.complete(&report);
            progress.print_report(&report);
        }

        Command::Analyze { file } => {
            let submission = Submission::new(file_name_of(&file), std::fs::read(&file)?)
                .part_name("audio");
            let result = client.analyze(&submission).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Verify { id } => {
            let result = client.verify(&id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Health { watch } => {
            if !watch {
                let connectivity = match client.health().await {
                    Ok(()) => health::Connectivity::Connected,
                    Err(_) => health::Connectivity::Disconnected,
                };
                ui::print_connectivity(connectivity);
                return Ok(());
            }

            let interval = Duration::from_secs(config.health_interval_secs);
            let mut handle = HealthMonitor::start(client, interval);
            loop {
                tokio::select! {
                    connectivity = handle.changed() => ui::print_connectivity(connectivity),
                    _ = tokio::signal::ctrl_c() => {
                        handle.stop();
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}
