//! Numeric coercion of raw fields into a validated `NumericSample`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::digits::leading_digit;
use crate::error::BenfordError;
use crate::table::{ColumnSelector, RawTable};
use crate::BenfordResult;

/// A non-empty sequence of strictly positive values, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct NumericSample {
    values: Vec<Decimal>,
}

/// A sample together with how many raw fields were discarded to build it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleExtraction {
    pub sample: NumericSample,
    pub accepted: usize,
    pub rejected_non_numeric: usize,
    pub rejected_non_positive: usize,
}

impl SampleExtraction {
    pub fn rejected(&self) -> usize {
        self.rejected_non_numeric + self.rejected_non_positive
    }
}

impl NumericSample {
    /// Validate already-numeric values. Zero and negatives are errors here,
    /// not silently dropped; use `from_raw` for filtering.
    pub fn new(values: Vec<Decimal>) -> BenfordResult<Self> {
        if values.is_empty() {
            return Err(BenfordError::EmptySample(
                "At least one positive value is required.".into(),
            ));
        }
        if let Some(pos) = values.iter().position(|v| *v <= Decimal::ZERO) {
            return Err(BenfordError::InvalidInput {
                field: format!("values[{}]", pos),
                reason: format!("{} is not strictly positive", values[pos]),
            });
        }
        Ok(Self { values })
    }

    /// Parse and filter raw fields. `None` stands for a missing field.
    pub fn from_raw<'a, I>(fields: I) -> BenfordResult<SampleExtraction>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut values = Vec::new();
        let (mut non_numeric, mut non_positive) = (0usize, 0usize);

        for field in fields {
            match field.and_then(parse_leading_number) {
                Some(v) if v > Decimal::ZERO => values.push(v),
                Some(_) => non_positive += 1,
                None => non_numeric += 1,
            }
        }

        if non_numeric + non_positive > 0 {
            warn!(
                non_numeric,
                non_positive, "discarded fields that are not positive numbers"
            );
        }
        if values.is_empty() {
            return Err(BenfordError::EmptySample(format!(
                "No valid numeric data found ({} non-numeric, {} non-positive fields).",
                non_numeric, non_positive
            )));
        }

        let accepted = values.len();
        debug!(accepted, "built numeric sample");
        Ok(SampleExtraction {
            sample: Self { values },
            accepted,
            rejected_non_numeric: non_numeric,
            rejected_non_positive: non_positive,
        })
    }

    /// Resolve `selector` against `table` and extract that column.
    /// Returns the column title alongside the extraction.
    pub fn from_table(
        table: &RawTable,
        selector: &ColumnSelector,
    ) -> BenfordResult<(String, SampleExtraction)> {
        let (index, title) = table.resolve(selector)?;
        let extraction = Self::from_raw(table.column(index))?;
        Ok((title, extraction))
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TryFrom<Vec<Decimal>> for NumericSample {
    type Error = BenfordError;

    fn try_from(values: Vec<Decimal>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<NumericSample> for Vec<Decimal> {
    fn from(sample: NumericSample) -> Self {
        sample.values
    }
}

/// Lenient number parse: the longest numeric prefix of `field` wins.
///
/// Leading whitespace and an optional sign are accepted, then digits with an
/// optional fraction and an optional exponent. Anything after the prefix is
/// ignored, so `"12abc"` parses as 12. Returns `None` when there is no
/// numeric prefix or the value does not fit in a `Decimal`, including values
/// whose first significant digit would be lost to rounding.
pub fn parse_leading_number(field: &str) -> Option<Decimal> {
    let s = field.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };
    let body_start = end;

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut probe = end + 1;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        frac_digits = probe - end - 1;
        if int_digits > 0 || frac_digits > 0 {
            end = probe;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    let mantissa_end = end;

    let mut exponent: Option<&str> = None;
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut probe = end + 1;
        if probe < bytes.len() && (bytes[probe] == b'+' || bytes[probe] == b'-') {
            probe += 1;
        }
        let exp_digits_start = probe;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        if probe > exp_digits_start {
            exponent = Some(&s[end + 1..probe]);
        }
    }

    let mut mantissa = s[body_start..mantissa_end].to_string();
    if mantissa.starts_with('.') {
        mantissa.insert(0, '0');
    }
    if mantissa.ends_with('.') {
        mantissa.pop();
    }

    let value = match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix('+').unwrap_or(exp);
            Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok()?
        }
        None => Decimal::from_str(&mantissa).ok()?,
    };

    // more than 28 fractional digits rounds silently; the leading digit must survive
    if let Some(first) = mantissa.bytes().find(|b| (b'1'..=b'9').contains(b)) {
        if leading_digit(value).ok() != Some(u32::from(first - b'0')) {
            return None;
        }
    }
    Some(if negative { -value } else { value })
}
