use serde_json::Value;

use super::{find_analysis, fixed};

/// Print just the verdict label, or the first field for non-analysis output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    if let Some(analysis) = find_analysis(value) {
        if let Some(Value::String(verdict)) = analysis.get("verdict") {
            return verdict.clone();
        }
    }

    // Reference table: one "digit=frequency" pair per entry
    if let Value::Array(rows) = value {
        return rows
            .iter()
            .filter_map(|row| {
                let digit = row.get("digit")?;
                Some(format!("{}={}", digit, fixed(row.get("frequency")?, 3)))
            })
            .collect::<Vec<_>>()
            .join(" ");
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    match result_obj {
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| format!("{}: {}", key, val))
            .unwrap_or_default(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_verdict() {
        let v = json!({ "result": { "analysis": { "statistics": {}, "verdict": "strong conformity" } } });
        assert_eq!(minimal_line(&v), "strong conformity");
    }

    #[test]
    fn test_minimal_reference() {
        let v = json!([
            { "digit": 1, "frequency": "0.301", "exact": "0.30103" },
            { "digit": 2, "frequency": "0.176", "exact": "0.17609" }
        ]);
        assert_eq!(minimal_line(&v), "1=0.301 2=0.176");
    }
}
