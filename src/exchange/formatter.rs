//! Rendering of an [`AggregationResult`] for chat and for the CLI.

use serde_json::{json, Map, Value};

use super::types::{AggregationResult, DATE_FORMAT};

/// Prefix of each failed currency, both in chat and in the JSON report.
pub const CURRENCY_ERROR: &str = "failed to pull data for the currency:";

/// Render the report as plain text.
///
/// One block per date, oldest first, each listing sale and purchase of
/// every currency reported that day. Failed currencies follow in their own
/// section.
pub fn format_report(result: &AggregationResult) -> String {
    let mut lines = Vec::new();

    if result.daily_rates.is_empty() {
        lines.push("No exchange rates available.".to_string());
    } else {
        lines.push("Exchange rates (sale / purchase):".to_string());
        for (date, quotes) in result.daily_rates.iter() {
            lines.push(date.format(DATE_FORMAT).to_string());
            for (code, quote) in quotes {
                lines.push(format!(
                    "  {code}: sale {:.4} / purchase {:.4}",
                    quote.sale, quote.purchase
                ));
            }
        }
    }

    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        for code in &result.errors {
            lines.push(format!("  {CURRENCY_ERROR} {code}"));
        }
    }

    lines.join("\n")
}

/// Render the report as JSON.
///
/// The first element maps each date to its currencies' `sale`/`purchase`
/// values. When some currencies failed, a second element lists them as
/// `{"failed to pull data for the currency:": code}` objects.
pub fn report_json(result: &AggregationResult) -> Value {
    let mut dates = Map::new();
    for (date, quotes) in result.daily_rates.iter() {
        let day: Map<String, Value> = quotes
            .iter()
            .map(|(code, quote)| {
                (
                    code.clone(),
                    json!({ "sale": quote.sale, "purchase": quote.purchase }),
                )
            })
            .collect();
        dates.insert(date.format(DATE_FORMAT).to_string(), Value::Object(day));
    }

    let mut report = vec![Value::Object(dates)];
    if !result.errors.is_empty() {
        let errors = result
            .errors
            .iter()
            .map(|code| json!({ CURRENCY_ERROR: code }))
            .collect();
        report.push(Value::Array(errors));
    }
    Value::Array(report)
}
