use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::decimal_of;

/// Width in characters of a bar at 100%.
const FULL_WIDTH: usize = 50;

/// Horizontal bar chart of observed frequencies with the expected
/// frequency marked by `|` on each row.
pub fn render_chart(breakdown: &[Value]) -> String {
    let mut out = String::new();
    for row in breakdown {
        let digit = row.get("digit").map(|d| d.to_string()).unwrap_or_default();
        let observed = row.get("observed_pct").and_then(decimal_of).unwrap_or_default();
        let expected = row.get("expected_pct").and_then(decimal_of).unwrap_or_default();
        let over = matches!(row.get("direction"), Some(Value::String(s)) if s == "over");

        let bar = bar_line(observed, expected);
        let bar = if over { bar.red() } else { bar.green() };
        out.push_str(&format!(
            "{} {} {:>6.2}% (exp {:>5.2}%)\n",
            digit,
            bar,
            observed.round_dp(2),
            expected.round_dp(2)
        ));
    }
    out
}

fn cells(pct: Decimal) -> usize {
    let scaled = (pct * Decimal::from(FULL_WIDTH) / Decimal::from(100)).round();
    scaled.to_usize().unwrap_or(0).min(FULL_WIDTH)
}

fn bar_line(observed_pct: Decimal, expected_pct: Decimal) -> String {
    let filled = cells(observed_pct);
    let marker = cells(expected_pct).min(FULL_WIDTH - 1);
    (0..FULL_WIDTH)
        .map(|i| {
            if i == marker {
                '|'
            } else if i < filled {
                '#'
            } else {
                ' '
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bar_line_marks_expected() {
        let line = bar_line(dec!(50), dec!(30.1));
        assert_eq!(line.len(), FULL_WIDTH);
        assert_eq!(line.chars().nth(15), Some('|'));
        assert_eq!(line.chars().filter(|c| *c == '#').count(), 24);
    }

    #[test]
    fn test_bar_line_full_and_empty() {
        assert_eq!(bar_line(dec!(100), dec!(0)).chars().filter(|c| *c == '#').count(), 49);
        assert_eq!(bar_line(dec!(0), dec!(4.6)).trim(), "|");
    }
}
