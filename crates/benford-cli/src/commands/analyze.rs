use clap::Args;
use serde_json::{json, Value};

use benford_core::analyzer::{self, chi_square_p_value};
use benford_core::{ColumnSelector, NumericSample};

use crate::input;

/// Arguments for a single-column conformity check
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a delimited text file (CSV by default); reads stdin when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Column to analyse: zero-based index or header name
    #[arg(long, default_value = "0")]
    pub column: String,

    /// Treat the first line as data rather than headers
    #[arg(long)]
    pub no_header: bool,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    pub delimiter: char,
}

/// Arguments for analysing an explicit list of values
#[derive(Args)]
pub struct DigitsArgs {
    /// Comma-separated values (e.g. "120.5,88,3100")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Option<Vec<String>>,

    /// Path to a JSON array of values, or an object with a 'values' array
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if let Some(ref path) = args.input {
        input::file::read_text(path)?
    } else if let Some(text) = input::stdin::read_stdin_text()? {
        text
    } else {
        return Err("--input <file.csv> or stdin required".into());
    };

    let table = input::table::parse_table(&text, args.delimiter, !args.no_header)?;
    let selector = ColumnSelector::parse(&args.column);
    tracing::info!(column = %selector, rows = table.rows.len(), "analysing column");

    let report = analyzer::analyze_column_report(&table, &selector)?;
    let p_value = chi_square_p_value(report.result.analysis.statistics.chi_square)?;

    let mut value = serde_json::to_value(report)?;
    value["result"]["analysis"]["statistics"]["chi_square_p_value"] = json!(p_value);
    Ok(value)
}

pub fn run_digits(args: DigitsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fields = get_fields(&args.input, &args.values)?;
    let extraction = NumericSample::from_raw(fields.iter().map(|f| Some(f.as_str())))?;

    let mut report = analyzer::analyze_sample_report(&extraction.sample)?;
    if extraction.rejected() > 0 {
        report.warnings.insert(
            0,
            format!(
                "{} of {} values were skipped ({} non-numeric, {} zero or negative).",
                extraction.rejected(),
                extraction.rejected() + extraction.accepted,
                extraction.rejected_non_numeric,
                extraction.rejected_non_positive
            ),
        );
    }
    let p_value = chi_square_p_value(report.result.statistics.chi_square)?;

    let mut value = serde_json::to_value(report)?;
    value["result"]["statistics"]["chi_square_p_value"] = json!(p_value);
    Ok(value)
}

/// Collect raw value fields from a file, the command line, or stdin.
fn get_fields(
    input_path: &Option<String>,
    cli_values: &Option<Vec<String>>,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if let Some(ref path) = input_path {
        json_fields(&input::file::read_json_value(path)?)
    } else if let Some(ref values) = cli_values {
        Ok(values.clone())
    } else if let Some(data) = input::stdin::read_stdin_json()? {
        json_fields(&data)
    } else {
        Err("Provide --values or --input file or pipe JSON via stdin".into())
    }
}

fn json_fields(data: &Value) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let arr = if let Some(arr) = data.as_array() {
        arr
    } else if let Some(arr) = data.get("values").and_then(|v| v.as_array()) {
        arr
    } else {
        return Err("Expected a JSON array of values or object with 'values' key".into());
    };

    Ok(arr
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            // anything else fails numeric coercion and is counted as skipped
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_fields_array() {
        let data = json!([1, "2.5", null, 300.25]);
        assert_eq!(json_fields(&data).unwrap(), vec!["1", "2.5", "null", "300.25"]);
    }

    #[test]
    fn test_json_fields_object() {
        let data = json!({ "values": ["7", 8] });
        assert_eq!(json_fields(&data).unwrap(), vec!["7", "8"]);
    }

    #[test]
    fn test_json_fields_rejects_scalar() {
        assert!(json_fields(&json!(42)).is_err());
    }

    #[test]
    fn test_run_digits_inline() {
        let args = DigitsArgs {
            values: Some(vec!["100".into(), "200".into(), "-3".into(), "x".into()]),
            input: None,
        };
        let value = run_digits(args).unwrap();
        assert_eq!(value["result"]["sample_size"], json!(2));
        assert_eq!(value["result"]["verdict"], json!("non-conformity"));
        assert!(value["warnings"][0].as_str().unwrap().contains("2 of 4"));
        assert!(value["result"]["statistics"]["chi_square_p_value"].is_number());
    }
}
