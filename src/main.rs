use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketwatch::cli::{formatters, Cli};
use ticketwatch::config::TrackerConfig;
use ticketwatch::notify::AlertChannel;
use ticketwatch::scraping::HttpPageSource;
use ticketwatch::tracker::{self, RunOptions};

fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout only carries the summary)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = TrackerConfig::from_env()?;
    cli.apply_to(&mut config)?;
    info!("Tracking {} into {:?}", config.url, config.csv_path);

    let options = RunOptions {
        dry_run: cli.dry_run,
        no_alert: cli.no_alert,
    };

    let source = HttpPageSource::new(config.request_timeout)?;
    let outcome = tracker::run(&config, options, &source, AlertChannel::Environment)?;

    print!("{}", formatters::format_outcome(&outcome, &config.csv_path));
    Ok(())
}
