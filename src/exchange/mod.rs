//! Exchange report module.
//!
//! This module provides the `exchange` chat command:
//! - Argument parsing into a day count and currency list
//! - Concurrent per-currency fetching from the NBP API
//! - Merging into a date-indexed report with per-currency errors
//! - Plain text and JSON rendering
//! - Audit logging of executed commands

pub mod aggregator;
pub mod audit;
pub mod command;
pub mod fetcher;
pub mod formatter;
pub mod query;
pub mod types;

pub use aggregator::{merge, RateAggregator};
pub use audit::AuditLog;
pub use command::{parse_input, ChatInput, CommandDispatcher, EXCHANGE_COMMAND};
#[cfg(test)]
pub use fetcher::FixedRates;
pub use fetcher::{NbpFetcher, RateSource};
pub use formatter::{format_report, report_json, CURRENCY_ERROR};
pub use query::{parse_args, parse_day_count};
pub use types::{
    AggregationResult, CurrencySeries, DailyRates, ExchangeQuery, Quote, RatePoint,
    DEFAULT_CURRENCIES, DEFAULT_DAY_COUNT, MAX_DAY_COUNT,
};
