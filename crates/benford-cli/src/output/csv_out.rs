use serde_json::Value;
use std::io;

use super::find_analysis;

/// Write output as CSV to stdout.
///
/// Analyses become one row per digit; other arrays (the reference table)
/// are written with headers taken from the first object.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(Value::Array(rows)) = find_analysis(value).and_then(|a| a.get("breakdown")) {
        write_array_csv(&mut wtr, rows);
    } else if let Value::Array(arr) = value {
        write_array_csv(&mut wtr, arr);
    } else if let Value::Object(map) = value {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(value)]);
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_breakdown_rows_written() {
        let rows = json!([
            { "digit": 1, "observed_pct": "50", "direction": "over" },
            { "digit": 2, "observed_pct": "0", "direction": "under" }
        ]);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, rows.as_array().unwrap());
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("digit,direction,observed_pct"));
        assert_eq!(lines.next(), Some("1,over,50"));
        assert_eq!(lines.next(), Some("2,under,0"));
    }
}
