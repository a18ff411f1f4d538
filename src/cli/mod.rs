use clap::Parser;
use std::path::PathBuf;

use crate::config::{parse_threshold, TrackerConfig};
use crate::error::Result;

pub mod formatters;

#[derive(Parser, Debug)]
#[command(name = "ticketwatch")]
#[command(version, about = "Shanghai Disneyland ticket price tracker")]
#[command(
    long_about = "Fetches the Shanghai Disneyland ticket page once, appends today's USD/CNY/AUD price to a CSV log and emails an alert when the USD price drops below the threshold. Meant to be run by an external scheduler."
)]
pub struct Cli {
    /// Ticket page URL
    #[arg(long)]
    pub url: Option<String>,

    /// CSV log to append to
    #[arg(long = "csv-path")]
    pub csv_path: Option<PathBuf>,

    /// IANA timezone used for the row date
    #[arg(long)]
    pub timezone: Option<String>,

    /// Alert when the USD price is below this value
    #[arg(long)]
    pub threshold: Option<String>,

    /// Fetch and print the record without writing it or alerting
    #[arg(long)]
    pub dry_run: bool,

    /// Do not send the price alert
    #[arg(long)]
    pub no_alert: bool,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut TrackerConfig) -> Result<()> {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(path) = &self.csv_path {
            config.csv_path = path.clone();
        }
        if let Some(tz) = &self.timezone {
            config.timezone = tz.clone();
        }
        if let Some(raw) = &self.threshold {
            config.threshold_usd = parse_threshold(raw)?;
        }
        Ok(())
    }
}
