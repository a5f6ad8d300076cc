//! Exchange command detection and dispatch.
//!
//! A chat line whose first word is `exchange` (any case) is replaced by a
//! rate report before it is broadcast. Every other line passes through
//! unchanged.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::Result;

use super::aggregator::RateAggregator;
use super::audit::AuditLog;
use super::fetcher::{NbpFetcher, RateSource};
use super::formatter::format_report;
use super::query::parse_args;
use super::types::{ExchangeQuery, MAX_DAY_COUNT};

/// Command word that triggers an exchange report.
pub const EXCHANGE_COMMAND: &str = "exchange";

/// Result of parsing a chat input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Plain chat text, kept exactly as received.
    Message(String),
    /// Exchange command with its parsed arguments.
    Exchange(ExchangeQuery),
}

/// Parse a chat input line into a message or an exchange command.
///
/// The day count of an exchange command is capped at `max_days`.
pub fn parse_input(input: &str, max_days: u32) -> ChatInput {
    let mut tokens = input.split_whitespace();

    match tokens.next() {
        Some(first) if first.eq_ignore_ascii_case(EXCHANGE_COMMAND) => {
            let args: Vec<&str> = tokens.collect();
            ChatInput::Exchange(parse_args(&args, max_days))
        }
        _ => ChatInput::Message(input.to_string()),
    }
}

/// Turns inbound chat lines into outbound chat text.
pub struct CommandDispatcher<S> {
    aggregator: RateAggregator<S>,
    audit: AuditLog,
    max_days: u32,
}

impl CommandDispatcher<NbpFetcher> {
    /// Create a dispatcher backed by the NBP API as configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = NbpFetcher::new(&config.rates)?;
        let aggregator =
            RateAggregator::new(fetcher, Duration::from_secs(config.rates.timeout_secs));
        Ok(Self::new(aggregator, AuditLog::from_config(&config.audit))
            .with_max_days(config.rates.max_days))
    }
}

impl<S: RateSource> CommandDispatcher<S> {
    /// Create a dispatcher allowing up to `MAX_DAY_COUNT` days.
    pub fn new(aggregator: RateAggregator<S>, audit: AuditLog) -> Self {
        Self {
            aggregator,
            audit,
            max_days: MAX_DAY_COUNT,
        }
    }

    /// Set the largest day count a command may request.
    pub fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }

    /// Produce the text to broadcast for `message` sent by `sender_name`.
    ///
    /// Exchange commands are written to the audit log first; a failing
    /// audit write is logged and otherwise ignored.
    pub async fn dispatch(&self, sender_name: &str, message: &str) -> String {
        match parse_input(message, self.max_days) {
            ChatInput::Message(text) => text,
            ChatInput::Exchange(query) => {
                if let Err(e) = self.audit.record(sender_name, message).await {
                    warn!("Failed to write audit log: {}", e);
                }

                info!(
                    "{} requested exchange: {} days, {:?}",
                    sender_name, query.day_count, query.currency_codes
                );
                let result = self.aggregator.aggregate(&query).await;
                format_report(&result)
            }
        }
    }
}
