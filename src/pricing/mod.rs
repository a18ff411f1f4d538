// Pricing module - fixed-rate currency conversion

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Result, TrackerError};

/// USD per 1 CNY, used when the page only exposes the CNY price
pub const USD_PER_CNY: Decimal = Decimal::from_parts(14, 0, 0, false, 2);

/// AUD per 1 USD
pub const AUD_PER_USD: Decimal = Decimal::from_parts(154, 0, 0, false, 2);

/// Static multipliers standing in for a live exchange-rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRates {
    pub usd_per_cny: Decimal,
    pub aud_per_usd: Decimal,
}

impl Default for ConversionRates {
    fn default() -> Self {
        Self {
            usd_per_cny: USD_PER_CNY,
            aud_per_usd: AUD_PER_USD,
        }
    }
}

/// Prices found on the page plus the values derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedPrices {
    pub usd: Option<Decimal>,
    pub cny: Option<Decimal>,
    pub aud: Option<Decimal>,
}

impl ConversionRates {
    /// Fill in the currencies the page did not expose.
    ///
    /// USD falls back to `cny * usd_per_cny`; AUD is always `usd * aud_per_usd`
    /// when a USD value exists. A product outside the Decimal range is an
    /// extraction error.
    pub fn derive(&self, usd: Option<Decimal>, cny: Option<Decimal>) -> Result<ExtractedPrices> {
        let usd = match (usd, cny) {
            (Some(usd), _) => Some(usd),
            (None, Some(cny)) => {
                let derived = convert(cny, self.usd_per_cny, "CNY", "USD")?;
                debug!("USD price missing, derived {} from CNY {}", derived, cny);
                Some(derived)
            }
            (None, None) => None,
        };
        let aud = usd
            .map(|usd| convert(usd, self.aud_per_usd, "USD", "AUD"))
            .transpose()?;

        Ok(ExtractedPrices { usd, cny, aud })
    }
}

fn convert(amount: Decimal, rate: Decimal, from: &str, to: &str) -> Result<Decimal> {
    amount.checked_mul(rate).ok_or_else(|| {
        TrackerError::Extraction(format!(
            "{} {} is out of range when converted to {}",
            from, amount, to
        ))
        .into()
    })
}
