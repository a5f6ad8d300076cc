//! Concurrent fan-out over a [`RateSource`] and merge into a daily report.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use super::fetcher::RateSource;
use super::types::{AggregationResult, CurrencySeries, DailyRates, ExchangeQuery, Quote};

/// Runs one fetch per requested currency and merges the results.
pub struct RateAggregator<S> {
    source: S,
    fetch_timeout: Duration,
}

impl<S: RateSource> RateAggregator<S> {
    /// Create an aggregator.
    ///
    /// A fetch that has not resolved within `fetch_timeout` counts as failed.
    pub fn new(source: S, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
        }
    }

    /// Fetch every currency of `query` concurrently and merge the results.
    ///
    /// All fetches are started together and the call returns once each of
    /// them has either resolved or timed out.
    pub async fn aggregate(&self, query: &ExchangeQuery) -> AggregationResult {
        let fetches = query
            .currency_codes
            .iter()
            .map(|code| self.fetch_bounded(code, query.day_count));

        let series = join_all(fetches).await;
        let result = merge(series);

        debug!(
            "Aggregated {} currencies over {} days: {} dates, {} errors",
            query.currency_codes.len(),
            query.day_count,
            result.daily_rates.len(),
            result.errors.len()
        );
        result
    }

    async fn fetch_bounded(&self, code: &str, day_count: u32) -> CurrencySeries {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch(code, day_count)).await {
            Ok(series) => series,
            Err(_) => {
                warn!(
                    "Fetching {} timed out after {:?}",
                    code, self.fetch_timeout
                );
                CurrencySeries::failed(code)
            }
        }
    }
}

/// Merge fetched series into an [`AggregationResult`].
///
/// Each successful series is sorted by date before its quotes are written,
/// so the source's ordering is not relied upon. Failures are listed in the
/// order they appear in `series` and contribute no dates.
pub fn merge(series: impl IntoIterator<Item = CurrencySeries>) -> AggregationResult {
    let mut daily_rates = DailyRates::new();
    let mut errors = Vec::new();

    for item in series {
        match item {
            CurrencySeries::Rates { code, mut rates } => {
                rates.sort_by_key(|point| point.date);
                for point in &rates {
                    daily_rates.insert(point.date, code.clone(), Quote::from(point));
                }
            }
            CurrencySeries::Failed { code } => errors.push(code),
        }
    }

    AggregationResult {
        daily_rates,
        errors,
    }
}
