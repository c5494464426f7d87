//! Advisory cut-offs for reading the fit statistics.
//!
//! Only the MAPE bounds feed the verdict. The chi-square and KS guides are
//! reported next to it for the reader and never change the outcome.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BenfordError;
use crate::BenfordResult;

/// MAPE (percent) below which conformity is strong.
pub const MAPE_STRONG_BOUND: Decimal = dec!(10);

/// MAPE (percent) below which conformity is partial.
pub const MAPE_PARTIAL_BOUND: Decimal = dec!(20);

/// KS statistic below which the fit is generally considered close.
pub const KS_GUIDE: Decimal = dec!(0.1);

/// Nine digit classes, one constraint.
pub const DEGREES_OF_FREEDOM: u32 = 8;

/// Significance level used when the caller does not choose one.
pub const DEFAULT_SIGNIFICANCE: Decimal = dec!(0.05);

/// Chi-square critical value for 8 degrees of freedom.
///
/// Levels between the tabulated ones round towards the stricter table entry.
pub fn chi_square_critical(significance_level: Decimal) -> BenfordResult<Decimal> {
    if significance_level <= Decimal::ZERO || significance_level >= Decimal::ONE {
        return Err(BenfordError::InvalidInput {
            field: "significance_level".into(),
            reason: "Must be between 0 and 1 exclusive.".into(),
        });
    }
    Ok(if significance_level <= dec!(0.01) {
        dec!(20.090)
    } else if significance_level <= dec!(0.05) {
        dec!(15.507)
    } else if significance_level <= dec!(0.10) {
        dec!(13.362)
    } else {
        dec!(11.030)
    })
}

/// How the non-verdict statistics compare with their guides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryReading {
    pub significance_level: Decimal,
    pub chi_square_critical: Decimal,
    pub chi_square_below_critical: bool,
    pub ks_guide: Decimal,
    pub ks_below_guide: bool,
}

impl AdvisoryReading {
    pub fn new(
        chi_square: Decimal,
        ks: Decimal,
        significance_level: Decimal,
    ) -> BenfordResult<Self> {
        let critical = chi_square_critical(significance_level)?;
        Ok(Self {
            significance_level,
            chi_square_critical: critical,
            chi_square_below_critical: chi_square < critical,
            ks_guide: KS_GUIDE,
            ks_below_guide: ks < KS_GUIDE,
        })
    }
}

pub fn explain_mape() -> &'static str {
    "MAPE (Mean Absolute Percentage Error) measures the accuracy of the observed \
     frequencies compared to the expected frequencies from Benford's Law. A lower MAPE \
     indicates a closer fit to Benford's Law. Typically, a MAPE less than 10% suggests a \
     strong conformity to Benford's Law."
}

pub fn explain_chi_square() -> &'static str {
    "The Chi-Square test compares the observed frequencies with the expected frequencies \
     from Benford's Law. A lower Chi-Square value indicates a better fit. Significant \
     deviations from Benford's Law are indicated by higher Chi-Square values. As a rough \
     guide, a Chi-Square value less than 15.51 (for 8 degrees of freedom at the 95% \
     confidence level) suggests the data fits Benford's Law well."
}

pub fn explain_ks() -> &'static str {
    "The Kolmogorov-Smirnov (K-S) test measures the maximum difference between the \
     cumulative distribution of the observed data and the expected cumulative \
     distribution from Benford's Law. A lower K-S test value indicates a better fit. \
     Generally, a K-S statistic below 0.1 suggests a strong conformity to Benford's Law."
}
