//! Leading-digit extraction and per-digit tallies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BenfordError;
use crate::reference::{is_leading_digit, BENFORD_FREQUENCIES, MAX_DIGIT, MIN_DIGIT};
use crate::types::Frequency;
use crate::BenfordResult;

/// First significant digit of `value`'s canonical decimal form.
///
/// Leading zeros, the sign and the decimal point are skipped, so
/// `0.0042` yields 4. Only defined for strictly positive values.
pub fn leading_digit(value: Decimal) -> BenfordResult<u32> {
    if value <= Decimal::ZERO {
        return Err(BenfordError::InvalidDigit { digit: 0 });
    }
    let digit = value
        .to_string()
        .chars()
        .find(|c| c.is_ascii_digit() && *c != '0')
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0);
    if !is_leading_digit(digit) {
        return Err(BenfordError::InvalidDigit { digit });
    }
    Ok(digit)
}

/// Occurrences per leading digit. Slot 0 is kept for alignment and stays zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u64; 10]", into = "[u64; 10]")]
pub struct DigitCounts([u64; 10]);

impl DigitCounts {
    /// Tally the leading digit of every value.
    pub fn tally<'a, I>(values: I) -> BenfordResult<Self>
    where
        I: IntoIterator<Item = &'a Decimal>,
    {
        let mut counts = [0u64; 10];
        for v in values {
            counts[leading_digit(*v)? as usize] += 1;
        }
        Ok(Self(counts))
    }

    /// Count for `digit`, zero for anything outside 1-9.
    pub fn get(&self, digit: u32) -> u64 {
        if is_leading_digit(digit) {
            self.0[digit as usize]
        } else {
            0
        }
    }

    pub fn total(&self) -> u64 {
        self.0[MIN_DIGIT as usize..=MAX_DIGIT as usize].iter().sum()
    }

    /// `(digit, count)` pairs for digits 1 through 9.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        (MIN_DIGIT..=MAX_DIGIT).map(move |d| (d, self.0[d as usize]))
    }

    /// Divide every count by the total.
    pub fn normalize(&self) -> BenfordResult<DigitFrequencies> {
        let total = self.total();
        if total == 0 {
            return Err(BenfordError::EmptySample(
                "Cannot normalise counts of an empty sample.".into(),
            ));
        }
        let n = Decimal::from(total);
        let mut freqs = [Decimal::ZERO; 10];
        for (d, count) in self.iter() {
            freqs[d as usize] = Decimal::from(count) / n;
        }
        Ok(DigitFrequencies(freqs))
    }
}

/// Relative frequency per leading digit. Slot 0 is unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Frequency; 10]", into = "[Frequency; 10]")]
pub struct DigitFrequencies([Frequency; 10]);

impl DigitFrequencies {
    /// The theoretical Benford distribution.
    pub fn benford() -> Self {
        Self(BENFORD_FREQUENCIES)
    }

    /// Frequency for `digit`, zero for anything outside 1-9.
    pub fn get(&self, digit: u32) -> Frequency {
        if is_leading_digit(digit) {
            self.0[digit as usize]
        } else {
            Decimal::ZERO
        }
    }

    /// `(digit, frequency)` pairs for digits 1 through 9.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Frequency)> + '_ {
        (MIN_DIGIT..=MAX_DIGIT).map(move |d| (d, self.0[d as usize]))
    }

    /// Running totals over digits 1 to 9, in ascending order.
    pub fn cumulative(&self) -> [Frequency; 9] {
        let mut out = [Decimal::ZERO; 9];
        let mut running = Decimal::ZERO;
        for (i, (_, f)) in self.iter().enumerate() {
            running += f;
            out[i] = running;
        }
        out
    }

    pub fn sum(&self) -> Frequency {
        self.iter().map(|(_, f)| f).sum()
    }
}

impl TryFrom<[u64; 10]> for DigitCounts {
    type Error = BenfordError;

    fn try_from(counts: [u64; 10]) -> Result<Self, Self::Error> {
        if counts[0] != 0 {
            return Err(BenfordError::InvalidInput {
                field: "counts[0]".into(),
                reason: "no value has a leading digit of 0".into(),
            });
        }
        Ok(Self(counts))
    }
}

impl From<DigitCounts> for [u64; 10] {
    fn from(counts: DigitCounts) -> Self {
        counts.0
    }
}

impl TryFrom<[Frequency; 10]> for DigitFrequencies {
    type Error = BenfordError;

    fn try_from(freqs: [Frequency; 10]) -> Result<Self, Self::Error> {
        if !freqs[0].is_zero() {
            return Err(BenfordError::InvalidInput {
                field: "frequencies[0]".into(),
                reason: "no value has a leading digit of 0".into(),
            });
        }
        if let Some(d) = freqs
            .iter()
            .position(|f| *f < Decimal::ZERO || *f > Decimal::ONE)
        {
            return Err(BenfordError::InvalidInput {
                field: format!("frequencies[{}]", d),
                reason: format!("{} is outside [0, 1]", freqs[d]),
            });
        }
        Ok(Self(freqs))
    }
}

impl From<DigitFrequencies> for [Frequency; 10] {
    fn from(freqs: DigitFrequencies) -> Self {
        freqs.0
    }
}
