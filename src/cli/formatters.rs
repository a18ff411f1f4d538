//! Output formatting module for CLI display
//!
//! Keeps the terminal summary of a run separate from the pipeline itself.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::records::PriceRecord;
use crate::tracker::{AlertStatus, RunOutcome};
use crate::utils::{format_optional, CurrencySymbol};

/// Format a record as a one-row table
pub fn format_record_table(record: &PriceRecord) -> String {
    #[derive(Tabled)]
    struct RecordRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "USD")]
        usd: String,
        #[tabled(rename = "CNY")]
        cny: String,
        #[tabled(rename = "AUD")]
        aud: String,
    }

    let row = RecordRow {
        date: record.date.format("%Y-%m-%d").to_string(),
        usd: format_optional(record.price_usd, CurrencySymbol::Usd),
        cny: format_optional(record.price_cny, CurrencySymbol::Cny),
        aud: format_optional(record.price_aud, CurrencySymbol::Aud),
    };

    Table::new([row]).with(Style::rounded()).to_string()
}

/// Full terminal summary of a run
pub fn format_outcome(outcome: &RunOutcome, csv_path: &std::path::Path) -> String {
    let mut output = String::new();

    output.push_str(&format_record_table(&outcome.record));
    output.push('\n');

    if outcome.written {
        output.push_str(&format!(
            "\n{} Recorded in {}\n",
            "✓".green().bold(),
            csv_path.display()
        ));
    } else {
        output.push_str(&format!(
            "\n{} Dry run - nothing written\n",
            "ℹ".blue().bold()
        ));
    }

    let alert_line = match outcome.alert {
        AlertStatus::Sent => Some(format!("{} Price alert sent", "✉".yellow().bold())),
        AlertStatus::Disabled => Some(format!(
            "{} Price below threshold, email alerts not configured",
            "!".yellow().bold()
        )),
        AlertStatus::NotTriggered | AlertStatus::Skipped => None,
    };
    if let Some(line) = alert_line {
        output.push_str(&line);
        output.push('\n');
    }

    output
}
