use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use benford_core::analyzer;
use benford_core::{ColumnSelector, NumericSample, RawTable};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Either an explicit list of values or raw delimited text plus a column.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnalyzeRequest {
    Values {
        values: Vec<serde_json::Value>,
    },
    Text {
        text: String,
        #[serde(default)]
        column: Option<String>,
        #[serde(default = "default_true")]
        has_headers: bool,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
}

fn default_true() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

fn field_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_benford(input_json: String) -> NapiResult<String> {
    let request: AnalyzeRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    match request {
        AnalyzeRequest::Values { values } => {
            let fields: Vec<String> = values.iter().map(field_text).collect();
            let extraction = NumericSample::from_raw(fields.iter().map(|f| Some(f.as_str())))
                .map_err(to_napi_error)?;
            let output =
                analyzer::analyze_sample_report(&extraction.sample).map_err(to_napi_error)?;
            serde_json::to_string(&output).map_err(to_napi_error)
        }
        AnalyzeRequest::Text {
            text,
            column,
            has_headers,
            delimiter,
        } => {
            let table = RawTable::from_delimited(&text, delimiter, has_headers);
            let selector = column
                .as_deref()
                .map(ColumnSelector::parse)
                .unwrap_or_default();
            let output =
                analyzer::analyze_column_report(&table, &selector).map_err(to_napi_error)?;
            serde_json::to_string(&output).map_err(to_napi_error)
        }
    }
}

#[napi]
pub fn column_headers(text: String, delimiter: Option<String>) -> NapiResult<Vec<String>> {
    let delimiter = delimiter
        .as_deref()
        .and_then(|d| d.chars().next())
        .unwrap_or(',');
    Ok(RawTable::from_delimited(&text, delimiter, true).headers)
}

// ---------------------------------------------------------------------------
// Reference
// ---------------------------------------------------------------------------

#[napi]
pub fn benford_reference() -> NapiResult<String> {
    serde_json::to_string(&benford_core::reference::reference_table()).map_err(to_napi_error)
}

#[napi]
pub fn chi_square_p_value(statistic: String) -> NapiResult<f64> {
    let statistic = statistic
        .parse::<rust_decimal::Decimal>()
        .map_err(to_napi_error)?;
    analyzer::chi_square_p_value(statistic).map_err(to_napi_error)
}
