use colored::Colorize;
use serde_json::Value;
use tabled::{builder::Builder, Table};

use benford_core::thresholds;

use super::chart::render_chart;
use super::{find_analysis, fixed};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(analysis) = find_analysis(value) {
        print_analysis(value, analysis);
        return;
    }
    match value {
        Value::Array(arr) => print_array_table(arr),
        Value::Object(_) => print_flat_object(value),
        _ => println!("{}", value),
    }
}

fn print_analysis(envelope: &Value, analysis: &Value) {
    let size = analysis.get("sample_size").cloned().unwrap_or(Value::Null);
    match envelope["result"].get("column_title").and_then(Value::as_str) {
        Some(title) => println!(
            "{}",
            format!("Benford's Law Analysis ({} rows of data) - Column: {}", size, title).bold()
        ),
        None => println!(
            "{}",
            format!("Benford's Law Analysis ({} values)", size).bold()
        ),
    }

    let stats = &analysis["statistics"];
    let advisory = &analysis["advisory"];
    let mut builder = Builder::default();
    builder.push_record(["Statistic", "Value", "Guide"]);
    builder.push_record([
        "MAPE".to_string(),
        format!("{}%", fixed(&stats["mape"], 2)),
        "< 10% strong, < 20% partial".to_string(),
    ]);
    builder.push_record([
        "Chi-Square".to_string(),
        fixed(&stats["chi_square"], 2),
        format!(
            "< {} (8 df, alpha {})",
            fixed(&advisory["chi_square_critical"], 2),
            fixed(&advisory["significance_level"], 2)
        ),
    ]);
    builder.push_record([
        "Kolmogorov-Smirnov".to_string(),
        fixed(&stats["ks"], 2),
        format!("< {}", fixed(&advisory["ks_guide"], 1)),
    ]);
    if let Some(p) = stats.get("chi_square_p_value").and_then(Value::as_f64) {
        builder.push_record([
            "Chi-Square p-value".to_string(),
            format!("{:.4}", p),
            "reported only".to_string(),
        ]);
    }
    println!("{}", Table::from(builder));

    if let Some(Value::String(verdict)) = analysis.get("verdict") {
        let label = match verdict.as_str() {
            "strong conformity" => verdict.green().bold(),
            "partial conformity" => verdict.yellow().bold(),
            _ => verdict.red().bold(),
        };
        println!("\nVerdict: {}", label);
        if let Some(text) = verdict_explanation(verdict) {
            println!("{}", text);
        }
    }

    if let Some(Value::Array(rows)) = analysis.get("breakdown") {
        let mut builder = Builder::default();
        builder.push_record(["Digit", "Count", "Observed", "Expected", "Difference"]);
        for row in rows {
            builder.push_record([
                row["digit"].to_string(),
                row["observed_count"].to_string(),
                format!("{}%", fixed(&row["observed_pct"], 2)),
                format!("{}%", fixed(&row["expected_pct"], 2)),
                format!("{}%", fixed(&row["difference_pct"], 2)),
            ]);
        }
        println!("\n{}", Table::from(builder));
        println!("\n{}", render_chart(rows));
    }

    println!("Notes:");
    for note in [
        thresholds::explain_mape(),
        thresholds::explain_chi_square(),
        thresholds::explain_ks(),
    ] {
        println!("  - {}", note);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w.yellow());
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn verdict_explanation(label: &str) -> Option<&'static str> {
    use benford_core::Verdict;
    [
        Verdict::StrongConformity,
        Verdict::PartialConformity,
        Verdict::NonConformity,
    ]
    .into_iter()
    .find(|v| v.label() == label)
    .map(|v| v.explanation())
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_explanation_lookup() {
        assert!(verdict_explanation("strong conformity")
            .unwrap()
            .contains("closely follows"));
        assert!(verdict_explanation("unknown").is_none());
    }

    #[test]
    fn test_format_value_array() {
        assert_eq!(format_value(&json!([1, "a", true])), "1, a, true");
    }
}
