//! Test helpers for hub integration tests.
//!
//! Provides a hub started on an ephemeral port, a WebSocket test client
//! and rate sources that need no network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use exchange_hub::chat::ClientRegistry;
use exchange_hub::config::ServerConfig;
use exchange_hub::exchange::{CurrencySeries, RatePoint};
use exchange_hub::{AuditLog, CommandDispatcher, HubServer, HubState, RateAggregator, RateSource};

/// Default timeout for test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a rate point.
pub fn point(date: &str, bid: f64, ask: f64) -> RatePoint {
    RatePoint {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        bid,
        ask,
    }
}

/// Rate source serving canned series by lower-cased code.
///
/// Unknown codes are reported as failed. The latest `day_count` points of
/// a series are returned, in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct CannedRates {
    series: HashMap<String, Vec<RatePoint>>,
}

impl CannedRates {
    pub fn with_series(mut self, code: &str, rates: Vec<RatePoint>) -> Self {
        self.series.insert(code.to_lowercase(), rates);
        self
    }

    fn lookup(&self, code: &str, day_count: u32) -> CurrencySeries {
        match self.series.get(&code.to_lowercase()) {
            Some(rates) => {
                let mut latest = rates.clone();
                latest.sort_by(|a, b| b.date.cmp(&a.date));
                latest.truncate(day_count as usize);
                CurrencySeries::rates(code, latest)
            }
            None => CurrencySeries::failed(code),
        }
    }
}

impl RateSource for CannedRates {
    async fn fetch(&self, code: &str, day_count: u32) -> CurrencySeries {
        self.lookup(code, day_count)
    }
}

/// USD and EUR quotations for 2024-02-01 and 2024-02-02, newest first.
pub fn sample_rates() -> CannedRates {
    CannedRates::default()
        .with_series(
            "usd",
            vec![point("2024-02-02", 3.9558, 4.0358), point("2024-02-01", 3.9439, 4.0235)],
        )
        .with_series(
            "eur",
            vec![point("2024-02-02", 4.2829, 4.3695), point("2024-02-01", 4.291, 4.3776)],
        )
}

/// Source that answers "slow" only after a delay and everything else
/// through the sample rates.
pub struct DelayedRates {
    pub delay: Duration,
    pub inner: CannedRates,
}

impl RateSource for DelayedRates {
    fn fetch(&self, code: &str, day_count: u32) -> impl Future<Output = CurrencySeries> + Send {
        let code = code.to_string();
        let delay = self.delay;
        let inner = self.inner.clone();
        async move {
            if code == "slow" {
                tokio::time::sleep(delay).await;
            }
            inner.lookup(&code, day_count)
        }
    }
}

/// A running hub.
pub struct TestHub {
    pub addr: SocketAddr,
    pub registry: Arc<ClientRegistry>,
}

impl TestHub {
    /// Start a hub on 127.0.0.1 with an ephemeral port.
    pub async fn start<S: RateSource + 'static>(source: S, audit: AuditLog) -> Self {
        let dispatcher =
            CommandDispatcher::new(RateAggregator::new(source, Duration::from_secs(2)), audit);
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let server = HubServer::bind(&config, HubState::new(dispatcher))
            .await
            .expect("Failed to bind hub");
        let registry = server.registry();
        let addr = server.spawn().expect("Failed to start hub");
        Self { addr, registry }
    }

    /// Connect a client and wait until the hub has registered it.
    pub async fn connect(&self) -> TestClient {
        let expected = self.registry.len() + 1;
        let client = TestClient::connect(self.addr).await;
        self.wait_for_clients(expected).await;
        client
    }

    /// Wait until exactly `count` clients are registered.
    pub async fn wait_for_clients(&self, count: usize) {
        let registry = Arc::clone(&self.registry);
        timeout(DEFAULT_TIMEOUT, async move {
            while registry.len() != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("Expected {} registered clients", count));
    }
}

/// WebSocket test client.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect to the hub.
    pub async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{addr}/"))
            .await
            .expect("Failed to connect");
        Self { stream }
    }

    /// Send a text frame.
    pub async fn send(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send");
    }

    /// Receive the next text frame.
    pub async fn recv(&mut self) -> String {
        loop {
            let frame = timeout(DEFAULT_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a message")
                .expect("Connection closed")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return text.to_string();
            }
        }
    }

    /// Check that nothing arrives within `wait`.
    pub async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(frame)) = timeout(wait, self.stream.next()).await {
            panic!("Unexpected frame: {:?}", frame);
        }
    }

    /// Send a close frame.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }

    /// Drop the TCP connection without a close handshake.
    pub fn abort(self) {
        drop(self.stream);
    }
}
