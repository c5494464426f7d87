//! The theoretical first-digit distribution predicted by Benford's Law.
//!
//! The table is fixed to three decimal places. `exact_benford_frequency`
//! gives the closed-form `log10(1 + 1/d)` value for reporting.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BenfordError;
use crate::types::Frequency;
use crate::BenfordResult;

/// Smallest valid leading digit.
pub const MIN_DIGIT: u32 = 1;

/// Largest valid leading digit.
pub const MAX_DIGIT: u32 = 9;

/// Benford first-digit probabilities, indexed by digit. Slot 0 is unused.
pub const BENFORD_FREQUENCIES: [Frequency; 10] = [
    Decimal::ZERO,
    dec!(0.301),
    dec!(0.176),
    dec!(0.125),
    dec!(0.097),
    dec!(0.079),
    dec!(0.067),
    dec!(0.058),
    dec!(0.051),
    dec!(0.046),
];

/// One row of the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub digit: u32,
    /// Tabulated probability used by every test
    pub frequency: Frequency,
    /// Closed-form log10(1 + 1/d), for display only
    pub exact: Frequency,
}

/// Returns true when `digit` is a valid leading digit.
pub fn is_leading_digit(digit: u32) -> bool {
    (MIN_DIGIT..=MAX_DIGIT).contains(&digit)
}

/// Theoretical probability of `digit` appearing as the leading digit.
pub fn benford_frequency(digit: u32) -> BenfordResult<Frequency> {
    if !is_leading_digit(digit) {
        return Err(BenfordError::InvalidDigit { digit });
    }
    Ok(BENFORD_FREQUENCIES[digit as usize])
}

/// log10(1 + 1/d), computed rather than tabulated.
pub fn exact_benford_frequency(digit: u32) -> BenfordResult<Frequency> {
    if !is_leading_digit(digit) {
        return Err(BenfordError::InvalidDigit { digit });
    }
    Ok((Decimal::ONE + Decimal::ONE / Decimal::from(digit)).log10())
}

/// The full reference table, digits 1 through 9.
pub fn reference_table() -> Vec<ReferenceEntry> {
    (MIN_DIGIT..=MAX_DIGIT)
        .map(|digit| ReferenceEntry {
            digit,
            frequency: BENFORD_FREQUENCIES[digit as usize],
            exact: (Decimal::ONE + Decimal::ONE / Decimal::from(digit)).log10(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sums_to_one() {
        let total: Decimal = BENFORD_FREQUENCIES.iter().sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_lookup_matches_table() {
        assert_eq!(benford_frequency(1).unwrap(), dec!(0.301));
        assert_eq!(benford_frequency(5).unwrap(), dec!(0.079));
        assert_eq!(benford_frequency(9).unwrap(), dec!(0.046));
    }

    #[test]
    fn test_lookup_is_stable() {
        for d in MIN_DIGIT..=MAX_DIGIT {
            assert_eq!(benford_frequency(d).unwrap(), benford_frequency(d).unwrap());
        }
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            benford_frequency(0),
            Err(BenfordError::InvalidDigit { digit: 0 })
        ));
    }

    #[test]
    fn test_ten_rejected() {
        assert!(matches!(
            benford_frequency(10),
            Err(BenfordError::InvalidDigit { digit: 10 })
        ));
        assert!(exact_benford_frequency(10).is_err());
    }

    #[test]
    fn test_frequencies_decrease() {
        for d in MIN_DIGIT..MAX_DIGIT {
            assert!(benford_frequency(d).unwrap() > benford_frequency(d + 1).unwrap());
        }
    }

    #[test]
    fn test_exact_close_to_table() {
        for entry in reference_table() {
            assert!(
                (entry.exact - entry.frequency).abs() < dec!(0.001),
                "digit {}: exact {} vs table {}",
                entry.digit,
                entry.exact,
                entry.frequency
            );
        }
    }

    #[test]
    fn test_reference_table_has_nine_rows() {
        let table = reference_table();
        assert_eq!(table.len(), 9);
        assert_eq!(table[0].digit, 1);
        assert_eq!(table[8].digit, 9);
    }
}
