//! Parsing of exchange command arguments into an [`ExchangeQuery`].

use super::types::{ExchangeQuery, DEFAULT_DAY_COUNT};

/// Build a query from the arguments following the command word.
///
/// If the first argument is an integer it is the day count: values in
/// `1..=max_days` are kept, larger values become `max_days`, zero and
/// negative values leave the default. All remaining arguments are
/// currency codes, lower-cased and appended after the default pair.
pub fn parse_args<S: AsRef<str>>(args: &[S], max_days: u32) -> ExchangeQuery {
    let mut query = ExchangeQuery::default();

    let codes = match args
        .first()
        .and_then(|first| parse_day_count(first.as_ref(), max_days))
    {
        Some(day_count) => {
            query.day_count = day_count;
            &args[1..]
        }
        None => args,
    };

    query
        .currency_codes
        .extend(codes.iter().map(|code| code.as_ref().to_lowercase()));
    query
}

/// Interpret a token as a day count capped at `max_days`.
///
/// Returns `None` when the token is not an integer. Integers outside the
/// accepted range are clamped (or fall back to the default) rather than
/// rejected.
pub fn parse_day_count(token: &str, max_days: u32) -> Option<u32> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if negative {
        return Some(DEFAULT_DAY_COUNT);
    }

    let max_days = max_days.max(DEFAULT_DAY_COUNT);
    let day_count = match digits.parse::<u64>() {
        Ok(0) => DEFAULT_DAY_COUNT,
        Ok(n) if n > u64::from(max_days) => max_days,
        Ok(n) => n as u32,
        // Only overflow gets here: the digits are all ASCII.
        Err(_) => max_days,
    };
    Some(day_count)
}
