//! Data types for the exchange report pipeline.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day count used when the command does not give a usable one.
pub const DEFAULT_DAY_COUNT: u32 = 1;

/// Largest day count the pricing service is asked for.
pub const MAX_DAY_COUNT: u32 = 10;

/// Currencies included in every exchange report.
pub const DEFAULT_CURRENCIES: &[&str] = &["usd", "eur"];

/// Date format used for report keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of one exchange command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeQuery {
    /// Number of most recent quotations per currency, in `1..=MAX_DAY_COUNT`.
    pub day_count: u32,
    /// Lower-cased currency codes in request order. Duplicates are kept.
    pub currency_codes: Vec<String>,
}

impl Default for ExchangeQuery {
    fn default() -> Self {
        Self {
            day_count: DEFAULT_DAY_COUNT,
            currency_codes: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// One bid/ask quotation as published by the pricing service.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatePoint {
    /// Effective date of the quotation.
    #[serde(rename = "effectiveDate")]
    pub date: NaiveDate,
    /// Bid price (what the bank pays).
    pub bid: f64,
    /// Ask price (what the bank charges).
    pub ask: f64,
}

/// Outcome of fetching one currency.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrencySeries {
    /// The currency's quotations. Order is whatever the source returned.
    Rates {
        /// Upper-cased currency code.
        code: String,
        /// Quotations.
        rates: Vec<RatePoint>,
    },
    /// The currency could not be fetched.
    Failed {
        /// Currency code as requested.
        code: String,
    },
}

impl CurrencySeries {
    /// Create a successful series; the code is upper-cased.
    pub fn rates(code: &str, rates: Vec<RatePoint>) -> Self {
        Self::Rates {
            code: code.to_uppercase(),
            rates,
        }
    }

    /// Create a failure marker for the requested code.
    pub fn failed(code: impl Into<String>) -> Self {
        Self::Failed { code: code.into() }
    }

    /// Whether this result is a failure marker.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Sale and purchase price of one currency on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    /// Sale price (the service's ask).
    pub sale: f64,
    /// Purchase price (the service's bid).
    pub purchase: f64,
}

impl From<&RatePoint> for Quote {
    fn from(point: &RatePoint) -> Self {
        Self {
            sale: point.ask,
            purchase: point.bid,
        }
    }
}

/// Date-indexed quotes: date -> currency code -> quote.
///
/// Dates iterate oldest first no matter in which order currencies were
/// merged in. Currency codes within one date iterate alphabetically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyRates {
    days: BTreeMap<NaiveDate, BTreeMap<String, Quote>>,
}

impl DailyRates {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code`'s quote for `date`.
    ///
    /// Only the `code` key of that date is written: an earlier quote for the
    /// same code on the same date is replaced, quotes of other currencies
    /// for that date are left untouched. Each currency therefore owns its
    /// own key and merge order across currencies does not matter.
    pub fn insert(&mut self, date: NaiveDate, code: impl Into<String>, quote: Quote) {
        self.days.entry(date).or_default().insert(code.into(), quote);
    }

    /// Quote of `code` on `date`, if reported.
    pub fn get(&self, date: NaiveDate, code: &str) -> Option<&Quote> {
        self.days.get(&date).and_then(|day| day.get(code))
    }

    /// Quotes reported for `date`.
    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<String, Quote>> {
        self.days.get(&date)
    }

    /// Iterate days oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &BTreeMap<String, Quote>)> {
        self.days.iter()
    }

    /// Reported dates, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    /// Number of reported dates.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no date was reported.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Merged outcome of one exchange command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Quotes of every currency that was fetched successfully.
    pub daily_rates: DailyRates,
    /// Codes that failed, in request order.
    pub errors: Vec<String>,
}

impl AggregationResult {
    /// Whether every requested currency was fetched.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_default_query() {
        let query = ExchangeQuery::default();
        assert_eq!(query.day_count, 1);
        assert_eq!(query.currency_codes, vec!["usd", "eur"]);
    }

    #[test]
    fn test_rate_point_deserialize() {
        let json = r#"{"no": "023/C/NBP/2024", "effectiveDate": "2024-02-01", "bid": 3.9439, "ask": 4.0235}"#;
        let point: RatePoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.date, date("2024-02-01"));
        assert_eq!(point.bid, 3.9439);
        assert_eq!(point.ask, 4.0235);
    }

    #[test]
    fn test_rate_point_rejects_bad_date() {
        let json = r#"{"effectiveDate": "yesterday", "bid": 1.0, "ask": 2.0}"#;
        assert!(serde_json::from_str::<RatePoint>(json).is_err());
    }

    #[test]
    fn test_quote_from_rate_point() {
        let point = RatePoint {
            date: date("2024-02-01"),
            bid: 3.9,
            ask: 4.1,
        };
        let quote = Quote::from(&point);
        assert_eq!(quote.sale, 4.1);
        assert_eq!(quote.purchase, 3.9);
    }

    #[test]
    fn test_currency_series_constructors() {
        let ok = CurrencySeries::rates("usd", vec![]);
        assert!(matches!(&ok, CurrencySeries::Rates { code, .. } if code == "USD"));
        assert!(!ok.is_failed());

        let failed = CurrencySeries::failed("xyz");
        assert_eq!(failed, CurrencySeries::Failed { code: "xyz".to_string() });
        assert!(failed.is_failed());
    }

    #[test]
    fn test_daily_rates_insert_keeps_other_currencies() {
        let mut rates = DailyRates::new();
        let day = date("2024-02-01");
        rates.insert(day, "USD", Quote { sale: 4.0, purchase: 3.9 });
        rates.insert(day, "EUR", Quote { sale: 4.3, purchase: 4.2 });
        rates.insert(day, "USD", Quote { sale: 4.1, purchase: 4.0 });

        assert_eq!(rates.day(day).unwrap().len(), 2);
        assert_eq!(rates.get(day, "USD").unwrap().sale, 4.1);
        assert_eq!(rates.get(day, "EUR").unwrap().sale, 4.3);
    }

    #[test]
    fn test_daily_rates_dates_ascending() {
        let mut rates = DailyRates::new();
        let quote = Quote { sale: 1.0, purchase: 1.0 };
        rates.insert(date("2024-02-03"), "USD", quote);
        rates.insert(date("2024-02-01"), "USD", quote);
        rates.insert(date("2024-02-02"), "EUR", quote);

        assert_eq!(
            rates.dates(),
            vec![date("2024-02-01"), date("2024-02-02"), date("2024-02-03")]
        );
        assert_eq!(rates.len(), 3);
        assert!(rates.get(date("2024-02-02"), "USD").is_none());
    }

    #[test]
    fn test_aggregation_result_is_complete() {
        let mut result = AggregationResult::default();
        assert!(result.is_complete());
        result.errors.push("xyz".to_string());
        assert!(!result.is_complete());
    }
}
