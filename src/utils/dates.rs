//! Calendar date of a run in a fixed timezone
//!
//! The log is keyed by the local date where the tracker is operated, not
//! by UTC, so a run shortly after local midnight lands on the new day.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{Result, TrackerError};

/// Parse an IANA timezone name such as `Australia/Melbourne`.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| TrackerError::Date(format!("unknown timezone '{}': {}", name, e)).into())
}

/// Local calendar date of `instant` in `tz`.
pub fn date_in(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    date_in(tz, Utc::now())
}
