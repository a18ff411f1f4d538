// Price extraction from the activity page markup
//
// The page embeds two machine-readable price fields: a JSON-LD style
// `"offers": { ... "price": 40.0 }` object (USD) and an `"ActPrice":"299"`
// field in the page state (CNY). Either one is enough.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::pricing::{ConversionRates, ExtractedPrices};

const USD_PRICE_PATTERN: &str = r#""offers"\s*:\s*\{[^{}]*?"price"\s*:\s*([0-9]+\.?[0-9]*)"#;
const CNY_PRICE_PATTERN: &str = r#""ActPrice":"(\d+\.?\d*)""#;

/// Compiled price patterns plus the rates used to fill missing currencies
pub struct PriceExtractor {
    usd_re: Regex,
    cny_re: Regex,
    rates: ConversionRates,
}

impl PriceExtractor {
    pub fn new(rates: ConversionRates) -> Result<Self> {
        Ok(Self {
            usd_re: Regex::new(USD_PRICE_PATTERN)?,
            cny_re: Regex::new(CNY_PRICE_PATTERN)?,
            rates,
        })
    }

    /// Extract USD/CNY prices from page text and derive the rest.
    ///
    /// Fails with [`TrackerError::Extraction`] when neither field is present.
    pub fn extract(&self, html: &str) -> Result<ExtractedPrices> {
        let usd = capture_price(&self.usd_re, html)?;
        let cny = capture_price(&self.cny_re, html)?;

        if usd.is_none() && cny.is_none() {
            return Err(TrackerError::Extraction(
                "couldn't find price fields in page HTML".to_string(),
            )
            .into());
        }

        debug!("Matched price fields: usd={:?} cny={:?}", usd, cny);
        let prices = self.rates.derive(usd, cny)?;
        info!(
            "Extracted prices: USD {:?}, CNY {:?}, AUD {:?}",
            prices.usd, prices.cny, prices.aud
        );
        Ok(prices)
    }
}

fn capture_price(re: &Regex, text: &str) -> Result<Option<Decimal>> {
    let Some(literal) = re.captures(text).and_then(|caps| caps.get(1)) else {
        return Ok(None);
    };
    parse_price_literal(literal.as_str()).map(Some)
}

/// Parse a matched numeric literal; a bare trailing dot (`40.`) is allowed.
fn parse_price_literal(literal: &str) -> Result<Decimal> {
    let trimmed = literal.strip_suffix('.').unwrap_or(literal);
    Decimal::from_str(trimmed).map_err(|e| {
        TrackerError::Extraction(format!("invalid price literal '{}': {}", literal, e)).into()
    })
}
