//! One tracking run: fetch, extract, date, record, alert.
//!
//! Every step blocks and the first failure aborts the run. Nothing is
//! written when fetching, extraction or date resolution fail.

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::notify::{compose_alert, should_alert, AlertChannel};
use crate::records::{self, PriceRecord};
use crate::scraping::{PageSource, PriceExtractor};
use crate::utils::dates;

/// What happened with the alert step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    /// Price at or above the threshold
    NotTriggered,
    /// Price below the threshold and the notifier delivered the message
    Sent,
    /// Price below the threshold but no notifier is configured
    Disabled,
    /// Alert step skipped by the caller
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub record: PriceRecord,
    /// False for dry runs
    pub written: bool,
    pub alert: AlertStatus,
}

/// Per-run switches layered on top of [`TrackerConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build the record but do not write it or alert
    pub dry_run: bool,
    /// Skip the alert step
    pub no_alert: bool,
}

/// Fetch the page and build today's record without touching the log.
pub fn collect_record(
    config: &TrackerConfig,
    source: &dyn PageSource,
    today: impl FnOnce(chrono_tz::Tz) -> NaiveDate,
) -> Result<PriceRecord> {
    let html = source
        .fetch_page(&config.url)
        .context("failed to fetch ticket page")?;

    let extractor = PriceExtractor::new(config.rates)?;
    let prices = extractor.extract(&html)?;

    let tz = dates::resolve_timezone(&config.timezone)?;
    let date = today(tz);

    Ok(PriceRecord::new(date, prices))
}

/// Run the full pipeline once.
///
/// The alert `channel` is only resolved after the row is written and the
/// price is below the threshold.
pub fn run(
    config: &TrackerConfig,
    options: RunOptions,
    source: &dyn PageSource,
    channel: AlertChannel<'_>,
) -> Result<RunOutcome> {
    run_on(config, options, source, channel, dates::today_in)
}

/// [`run`] with an injectable clock.
pub fn run_on(
    config: &TrackerConfig,
    options: RunOptions,
    source: &dyn PageSource,
    channel: AlertChannel<'_>,
    today: impl FnOnce(chrono_tz::Tz) -> NaiveDate,
) -> Result<RunOutcome> {
    let record = collect_record(config, source, today)?;

    if options.dry_run {
        info!("Dry run: not writing {:?}", config.csv_path);
        return Ok(RunOutcome {
            record,
            written: false,
            alert: AlertStatus::Skipped,
        });
    }

    records::append_record(&config.csv_path, &record)?;

    let alert = if options.no_alert {
        AlertStatus::Skipped
    } else {
        check_alert(&record, config, channel)?
    };

    Ok(RunOutcome {
        record,
        written: true,
        alert,
    })
}

/// Send an alert when the record's USD price is below the threshold.
///
/// Relay configuration errors surface here, never for prices that do not
/// alert.
pub fn check_alert(
    record: &PriceRecord,
    config: &TrackerConfig,
    channel: AlertChannel<'_>,
) -> Result<AlertStatus> {
    if !should_alert(record, config.threshold_usd) {
        info!(
            "USD price {:?} is not below threshold {}, no alert",
            record.price_usd, config.threshold_usd
        );
        return Ok(AlertStatus::NotTriggered);
    }

    let (subject, body) = compose_alert(record, config.threshold_usd);
    let sent = channel
        .with_notifier(|notifier| notifier.notify(&subject, &body))
        .context("failed to send price alert")?;

    match sent {
        Some(()) => Ok(AlertStatus::Sent),
        None => {
            info!("Price below threshold but email alerts are disabled");
            Ok(AlertStatus::Disabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::notify::Notifier;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct StaticPage(&'static str);

    impl PageSource for StaticPage {
        fn fetch_page(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, subject: &str, body: &str) -> Result<()> {
            self.sent
                .borrow_mut()
                .push((subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    fn config_in(dir: &TempDir) -> TrackerConfig {
        TrackerConfig {
            csv_path: dir.path().join("data").join("prices.csv"),
            ..TrackerConfig::default()
        }
    }

    fn fixed_day(_: chrono_tz::Tz) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_cheap_price_sends_alert() {
        let dir = TempDir::new().unwrap();
        let notifier = RecordingNotifier::default();

        let outcome = run_on(
            &config_in(&dir),
            RunOptions::default(),
            &StaticPage(r#""offers":{"price":40.00}"#),
            AlertChannel::Notifier(&notifier),
            fixed_day,
        )
        .unwrap();

        assert_eq!(outcome.alert, AlertStatus::Sent);
        assert!(outcome.written);
        assert_eq!(notifier.sent.borrow().len(), 1);
    }

    #[test]
    fn test_expensive_price_does_not_alert() {
        let dir = TempDir::new().unwrap();
        let notifier = RecordingNotifier::default();

        let outcome = run_on(
            &config_in(&dir),
            RunOptions::default(),
            &StaticPage(r#""offers":{"price":60.00}"#),
            AlertChannel::Notifier(&notifier),
            fixed_day,
        )
        .unwrap();

        assert_eq!(outcome.alert, AlertStatus::NotTriggered);
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_missing_notifier_still_succeeds() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let outcome = run_on(
            &config,
            RunOptions::default(),
            &StaticPage(r#""offers":{"price":40.00}"#),
            AlertChannel::Off,
            fixed_day,
        )
        .unwrap();

        assert_eq!(outcome.alert, AlertStatus::Disabled);
        assert!(config.csv_path.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let notifier = RecordingNotifier::default();

        let outcome = run_on(
            &config,
            RunOptions {
                dry_run: true,
                no_alert: false,
            },
            &StaticPage(r#""ActPrice":"299""#),
            AlertChannel::Notifier(&notifier),
            fixed_day,
        )
        .unwrap();

        assert!(!outcome.written);
        assert_eq!(outcome.record.price_usd, Some(dec!(41.86)));
        assert!(!config.csv_path.exists());
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_extraction_failure_writes_no_row() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = run_on(
            &config,
            RunOptions::default(),
            &StaticPage("<html>maintenance</html>"),
            AlertChannel::Off,
            fixed_day,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Extraction(_))
        ));
        assert!(!config.csv_path.exists());
    }

    #[test]
    fn test_bad_timezone_writes_no_row() {
        let dir = TempDir::new().unwrap();
        let config = TrackerConfig {
            timezone: "Nowhere/Land".to_string(),
            ..config_in(&dir)
        };

        let err = run(
            &config,
            RunOptions::default(),
            &StaticPage(r#""offers":{"price":40.00}"#),
            AlertChannel::Off,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Date(_))
        ));
        assert!(!config.csv_path.exists());
    }

    #[test]
    fn test_environment_channel_untouched_above_threshold() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let outcome = run_on(
            &config,
            RunOptions::default(),
            &StaticPage(r#""offers":{"price":60.00}"#),
            AlertChannel::Environment,
            fixed_day,
        )
        .unwrap();

        assert_eq!(outcome.alert, AlertStatus::NotTriggered);
        assert_eq!(records::read_records(&config.csv_path).unwrap().len(), 1);
    }

    #[test]
    fn test_off_channel_below_threshold_is_disabled() {
        let dir = TempDir::new().unwrap();
        let record = PriceRecord {
            date: fixed_day(chrono_tz::UTC),
            price_usd: Some(dec!(40)),
            price_cny: None,
            price_aud: None,
        };

        let status = check_alert(&record, &config_in(&dir), AlertChannel::Off).unwrap();
        assert_eq!(status, AlertStatus::Disabled);
    }
}
