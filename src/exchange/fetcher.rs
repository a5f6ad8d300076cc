//! Currency rate fetching from the NBP pricing service.
//!
//! Every request is bounded by the configured timeouts. Any failure
//! (transport error, non-success status, unreadable body) is turned into
//! a [`CurrencySeries::Failed`] marker so one currency never fails a whole
//! exchange command.

#[cfg(test)]
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::RatesConfig;
use crate::error::{HubError, Result};

use super::types::{CurrencySeries, RatePoint};

/// User agent string for rate requests.
const USER_AGENT: &str = "exchange-hub/0.1 (NBP rates)";

/// A source of per-currency rate series.
pub trait RateSource: Send + Sync {
    /// Fetch the last `day_count` quotations of `code`.
    ///
    /// Never fails: problems are reported as [`CurrencySeries::Failed`].
    fn fetch(&self, code: &str, day_count: u32) -> impl Future<Output = CurrencySeries> + Send;
}

/// Body of a table C rates response.
#[derive(Debug, Deserialize)]
struct NbpRatesResponse {
    rates: Vec<RatePoint>,
}

/// Fetcher for the NBP exchange rates API (table C, bid/ask).
pub struct NbpFetcher {
    client: Client,
    base_url: Url,
}

impl NbpFetcher {
    /// Create a fetcher from the rates configuration.
    pub fn new(config: &RatesConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| HubError::Config(format!("invalid rates.base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HubError::Config(format!(
                "rates.base_url cannot be a base: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HubError::Http(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// URL of the last `day_count` table C quotations of `code`.
    pub fn rates_url(&self, code: &str, day_count: u32) -> Url {
        let days = day_count.to_string();
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "api",
                "exchangerates",
                "rates",
                "c",
                code,
                "last",
                days.as_str(),
                "",
            ]);
        }
        url.set_query(Some("format=json"));
        url
    }

    async fn try_fetch(&self, code: &str, day_count: u32) -> Result<Vec<RatePoint>> {
        let url = self.rates_url(code, day_count);
        debug!("Fetching rates from {}", url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(HubError::Http(format!(
                "status {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response.bytes().await?;
        let body: NbpRatesResponse =
            serde_json::from_slice(&bytes).map_err(|e| HubError::Payload(e.to_string()))?;
        Ok(body.rates)
    }
}

impl RateSource for NbpFetcher {
    async fn fetch(&self, code: &str, day_count: u32) -> CurrencySeries {
        match self.try_fetch(code, day_count).await {
            Ok(rates) => CurrencySeries::rates(code, rates),
            Err(e) => {
                warn!("Failed to pull data for currency {}: {}", code, e);
                CurrencySeries::failed(code)
            }
        }
    }
}

/// In-memory rate source for unit tests.
///
/// Serves fixed series by lower-cased code and reports every other code
/// as failed. Honors `day_count` by returning the most recent points.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FixedRates {
    series: HashMap<String, Vec<RatePoint>>,
}

#[cfg(test)]
impl FixedRates {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series for `code`.
    pub fn with_series(mut self, code: &str, rates: Vec<RatePoint>) -> Self {
        self.series.insert(code.to_lowercase(), rates);
        self
    }
}

#[cfg(test)]
impl RateSource for FixedRates {
    async fn fetch(&self, code: &str, day_count: u32) -> CurrencySeries {
        match self.series.get(&code.to_lowercase()) {
            Some(rates) => {
                let mut rates = rates.clone();
                rates.sort_by_key(|point| point.date);
                let skip = rates.len().saturating_sub(day_count as usize);
                CurrencySeries::rates(code, rates.split_off(skip))
            }
            None => CurrencySeries::failed(code),
        }
    }
}
