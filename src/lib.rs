//! Exchange Hub - broadcast chat with NBP exchange rate reports
//!
//! Every WebSocket client joins one flat chat group. A message starting
//! with `exchange` is replaced by a currency report fetched from the NBP
//! API before it is broadcast.

pub mod chat;
pub mod config;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod web;

pub use chat::{ClientHandle, ClientRegistry, RegisteredClient};
pub use config::Config;
pub use error::{HubError, Result};
pub use exchange::{
    AggregationResult, AuditLog, CommandDispatcher, ExchangeQuery, NbpFetcher, RateAggregator,
    RateSource,
};
pub use web::{HubServer, HubState};
