pub mod chart;
pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::{self, Write};
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print the full envelope to stdout.
fn print_json(value: &Value) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = serde_json::to_writer_pretty(&mut out, value) {
        eprintln!("JSON serialization error: {}", e);
        return;
    }
    let _ = writeln!(out);
}

/// Locate the analysis object inside an envelope.
///
/// Column reports nest it under `result.analysis`; sample reports put it
/// directly in `result`.
pub(crate) fn find_analysis(value: &Value) -> Option<&Value> {
    let result = value.get("result")?;
    if let Some(analysis) = result.get("analysis") {
        return Some(analysis);
    }
    result.get("statistics").map(|_| result)
}

/// Decimals are serialised as strings; accept either representation.
pub(crate) fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Round a decimal field to `dp` places for display.
pub(crate) fn fixed(value: &Value, dp: u32) -> String {
    match decimal_of(value) {
        Some(d) => format!("{:.*}", dp as usize, d.round_dp(dp)),
        None => match value {
            Value::Null => "-".to_string(),
            other => other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_analysis_nested_and_flat() {
        let nested = json!({ "result": { "analysis": { "statistics": {} } } });
        assert!(find_analysis(&nested).is_some());
        let flat = json!({ "result": { "statistics": {}, "verdict": "non-conformity" } });
        assert_eq!(find_analysis(&flat).unwrap()["verdict"], "non-conformity");
        assert!(find_analysis(&json!({ "result": [] })).is_none());
    }

    #[test]
    fn test_fixed_formats_strings_and_numbers() {
        assert_eq!(fixed(&json!("64.78661"), 2), "64.79");
        assert_eq!(fixed(&json!(0.5), 2), "0.50");
        assert_eq!(fixed(&Value::Null, 2), "-");
    }
}
