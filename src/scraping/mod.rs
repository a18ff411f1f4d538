// Web scraping module for the ticket activity page
// Plain blocking HTTP fetch plus regex extraction, no browser needed

pub mod extract;
pub mod fetch;

pub use extract::PriceExtractor;
pub use fetch::{HttpPageSource, PageSource};
