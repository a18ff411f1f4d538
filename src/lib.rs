//! Ticketwatch - Shanghai Disneyland ticket price tracker
//!
//! This library fetches the ticket activity page, extracts its price,
//! converts it with fixed rates, appends a row to a CSV log and emails an
//! alert when the USD price drops below a threshold.

pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod pricing;
pub mod records;
pub mod scraping;
pub mod tracker;
pub mod utils;
