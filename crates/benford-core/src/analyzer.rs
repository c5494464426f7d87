//! First-digit conformity analysis against Benford's Law.
//!
//! Three goodness-of-fit measures are computed over digits 1-9:
//!
//! - MAPE: mean of |observed - expected| / expected, as a percentage
//! - Chi-square: sum of (count - expected count)^2 / expected count
//! - Kolmogorov-Smirnov: largest gap between the cumulative curves
//!
//! The verdict is decided by MAPE alone. Chi-square and KS are reported with
//! advisory readings but never change the label.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use crate::digits::{DigitCounts, DigitFrequencies};
use crate::reference::MAX_DIGIT;
use crate::sample::NumericSample;
use crate::table::{ColumnSelector, RawTable};
use crate::thresholds::{
    AdvisoryReading, DEFAULT_SIGNIFICANCE, MAPE_PARTIAL_BOUND, MAPE_STRONG_BOUND,
};
use crate::types::{with_metadata, ComputationOutput, Frequency, Percent};
use crate::BenfordResult;

/// Below this many values the first-digit tests lose most of their power.
pub const SMALL_SAMPLE_WARNING: usize = 100;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The three goodness-of-fit measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitStatistics {
    /// Mean absolute percentage error, already multiplied by 100
    pub mape: Percent,
    pub chi_square: Decimal,
    /// Kolmogorov-Smirnov statistic, in [0, 1]
    pub ks: Decimal,
}

/// Qualitative reading of the MAPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "strong conformity")]
    StrongConformity,
    #[serde(rename = "partial conformity")]
    PartialConformity,
    #[serde(rename = "non-conformity")]
    NonConformity,
}

impl Verdict {
    /// MAPE < 10 is strong, 10 <= MAPE < 20 partial, anything else non-conforming.
    pub fn from_mape(mape: Percent) -> Self {
        if mape < MAPE_STRONG_BOUND {
            Verdict::StrongConformity
        } else if mape < MAPE_PARTIAL_BOUND {
            Verdict::PartialConformity
        } else {
            Verdict::NonConformity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StrongConformity => "strong conformity",
            Verdict::PartialConformity => "partial conformity",
            Verdict::NonConformity => "non-conformity",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Verdict::StrongConformity => {
                "The observed data closely follows Benford's Law. This suggests that the \
                 data is naturally occurring and has not been manipulated."
            }
            Verdict::PartialConformity => {
                "The observed data somewhat follows Benford's Law. There might be some \
                 deviations, but it generally aligns with expectations."
            }
            Verdict::NonConformity => {
                "The observed data does not follow Benford's Law well. This could suggest \
                 that the data might have been manipulated or does not naturally follow \
                 Benford's distribution."
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a digit appears more or less often than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    Over,
    Under,
    Match,
}

/// One row of the per-digit breakdown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitBreakdown {
    pub digit: u32,
    pub observed_count: u64,
    pub expected_count: Decimal,
    pub observed_pct: Percent,
    pub expected_pct: Percent,
    /// observed_pct - expected_pct
    pub difference_pct: Percent,
    pub direction: Deviation,
    /// Highlight strength for renderers: min(|observed - expected| * 5, 1)
    pub intensity: Decimal,
}

/// Everything a renderer needs about one analysed sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sample_size: u64,
    pub counts: DigitCounts,
    pub observed: DigitFrequencies,
    pub expected: DigitFrequencies,
    pub statistics: FitStatistics,
    pub verdict: Verdict,
    pub breakdown: Vec<DigitBreakdown>,
    pub advisory: AdvisoryReading,
}

/// Analysis of one column of a raw table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnAnalysis {
    pub column_title: String,
    pub accepted: usize,
    pub rejected_non_numeric: usize,
    pub rejected_non_positive: usize,
    pub analysis: AnalysisResult,
}

#[derive(Serialize)]
struct ReportAssumptions<'a> {
    column: Option<&'a ColumnSelector>,
    significance_level: Decimal,
    reference: &'static str,
    verdict_basis: &'static str,
}

impl<'a> ReportAssumptions<'a> {
    fn new(column: Option<&'a ColumnSelector>) -> Self {
        Self {
            column,
            significance_level: DEFAULT_SIGNIFICANCE,
            reference: "Benford first-digit table, three decimal places",
            verdict_basis: "MAPE only",
        }
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Analyse a validated sample at the default significance level.
pub fn analyze(sample: &NumericSample) -> BenfordResult<AnalysisResult> {
    analyze_with_significance(sample, DEFAULT_SIGNIFICANCE)
}

/// Analyse raw positive values; an empty slice is an `EmptySample` error.
pub fn analyze_values(values: &[Decimal]) -> BenfordResult<AnalysisResult> {
    let sample = NumericSample::new(values.to_vec())?;
    analyze(&sample)
}

/// Analyse a sample, reading chi-square against `significance_level`.
pub fn analyze_with_significance(
    sample: &NumericSample,
    significance_level: Decimal,
) -> BenfordResult<AnalysisResult> {
    let counts = DigitCounts::tally(sample.values())?;
    let observed = counts.normalize()?;
    let expected = DigitFrequencies::benford();
    let n = counts.total();

    let statistics = FitStatistics {
        mape: mape(&observed, &expected),
        chi_square: chi_square(&counts, &expected),
        ks: kolmogorov_smirnov(&observed, &expected),
    };
    let verdict = Verdict::from_mape(statistics.mape);
    let advisory =
        AdvisoryReading::new(statistics.chi_square, statistics.ks, significance_level)?;
    let breakdown = breakdown(&counts, &observed, &expected);

    debug!(
        sample_size = n,
        mape = %statistics.mape,
        chi_square = %statistics.chi_square,
        ks = %statistics.ks,
        verdict = %verdict,
        "benford analysis complete"
    );

    Ok(AnalysisResult {
        sample_size: n,
        counts,
        observed,
        expected,
        statistics,
        verdict,
        breakdown,
        advisory,
    })
}

/// Extract `selector` from `table` and analyse it.
pub fn analyze_column(
    table: &RawTable,
    selector: &ColumnSelector,
) -> BenfordResult<ColumnAnalysis> {
    let (column_title, extraction) = NumericSample::from_table(table, selector)?;
    let analysis = analyze(&extraction.sample)?;
    Ok(ColumnAnalysis {
        column_title,
        accepted: extraction.accepted,
        rejected_non_numeric: extraction.rejected_non_numeric,
        rejected_non_positive: extraction.rejected_non_positive,
        analysis,
    })
}

/// `analyze_column` wrapped in the standard output envelope.
pub fn analyze_column_report(
    table: &RawTable,
    selector: &ColumnSelector,
) -> BenfordResult<ComputationOutput<ColumnAnalysis>> {
    let start = Instant::now();
    let column = analyze_column(table, selector)?;

    let mut warnings = Vec::new();
    let rejected = column.rejected_non_numeric + column.rejected_non_positive;
    if rejected > 0 {
        warnings.push(format!(
            "{} of {} rows in column '{}' were skipped ({} non-numeric, {} zero or negative).",
            rejected,
            rejected + column.accepted,
            column.column_title,
            column.rejected_non_numeric,
            column.rejected_non_positive
        ));
    }
    push_sample_size_warning(&mut warnings, column.accepted);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Benford first-digit test (MAPE, chi-square, Kolmogorov-Smirnov)",
        &ReportAssumptions::new(Some(selector)),
        warnings,
        elapsed,
        column,
    ))
}

/// `analyze` wrapped in the standard output envelope.
pub fn analyze_sample_report(
    sample: &NumericSample,
) -> BenfordResult<ComputationOutput<AnalysisResult>> {
    let start = Instant::now();
    let result = analyze(sample)?;

    let mut warnings = Vec::new();
    push_sample_size_warning(&mut warnings, sample.len());

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Benford first-digit test (MAPE, chi-square, Kolmogorov-Smirnov)",
        &ReportAssumptions::new(None),
        warnings,
        elapsed,
        result,
    ))
}

/// Upper-tail probability of the chi-square statistic with 8 degrees of freedom.
#[cfg(feature = "p_values")]
pub fn chi_square_p_value(statistic: Decimal) -> BenfordResult<f64> {
    use rust_decimal::prelude::ToPrimitive;
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    let x = statistic
        .to_f64()
        .ok_or_else(|| crate::error::BenfordError::InvalidInput {
            field: "chi_square".into(),
            reason: format!("{} cannot be represented as f64", statistic),
        })?;
    let dist = ChiSquared::new(f64::from(crate::thresholds::DEGREES_OF_FREEDOM)).map_err(|e| {
        crate::error::BenfordError::InvalidInput {
            field: "degrees_of_freedom".into(),
            reason: e.to_string(),
        }
    })?;
    Ok(1.0 - dist.cdf(x))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

fn mape(observed: &DigitFrequencies, expected: &DigitFrequencies) -> Percent {
    let total: Decimal = expected
        .iter()
        .map(|(d, e)| (observed.get(d) - e).abs() / e)
        .sum();
    total / Decimal::from(MAX_DIGIT) * dec!(100)
}

fn chi_square(counts: &DigitCounts, expected: &DigitFrequencies) -> Decimal {
    let n = Decimal::from(counts.total());
    expected
        .iter()
        .map(|(d, e)| {
            let expected_count = e * n;
            let diff = Decimal::from(counts.get(d)) - expected_count;
            diff * diff / expected_count
        })
        .sum()
}

fn kolmogorov_smirnov(observed: &DigitFrequencies, expected: &DigitFrequencies) -> Decimal {
    observed
        .cumulative()
        .iter()
        .zip(expected.cumulative().iter())
        .map(|(o, e)| (*o - *e).abs())
        .fold(Decimal::ZERO, Decimal::max)
}

fn breakdown(
    counts: &DigitCounts,
    observed: &DigitFrequencies,
    expected: &DigitFrequencies,
) -> Vec<DigitBreakdown> {
    let hundred = dec!(100);
    let n = Decimal::from(counts.total());
    expected
        .iter()
        .map(|(d, e)| {
            let o: Frequency = observed.get(d);
            let diff = o - e;
            let direction = if diff > Decimal::ZERO {
                Deviation::Over
            } else if diff < Decimal::ZERO {
                Deviation::Under
            } else {
                Deviation::Match
            };
            DigitBreakdown {
                digit: d,
                observed_count: counts.get(d),
                expected_count: e * n,
                observed_pct: o * hundred,
                expected_pct: e * hundred,
                difference_pct: diff * hundred,
                direction,
                intensity: (diff.abs() * dec!(5)).min(Decimal::ONE),
            }
        })
        .collect()
}

fn push_sample_size_warning(warnings: &mut Vec<String>, n: usize) {
    if n < SMALL_SAMPLE_WARNING {
        warnings.push(format!(
            "Only {} values analysed; first-digit tests are unreliable below {}.",
            n, SMALL_SAMPLE_WARNING
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenfordError;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn sample(values: &[Decimal]) -> NumericSample {
        NumericSample::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_verdict_bounds() {
        assert_eq!(Verdict::from_mape(dec!(0)), Verdict::StrongConformity);
        assert_eq!(Verdict::from_mape(dec!(9.99)), Verdict::StrongConformity);
        assert_eq!(Verdict::from_mape(dec!(10)), Verdict::PartialConformity);
        assert_eq!(Verdict::from_mape(dec!(19.99)), Verdict::PartialConformity);
        assert_eq!(Verdict::from_mape(dec!(20)), Verdict::NonConformity);
    }

    #[test]
    fn test_verdict_labels_serialize() {
        let j = serde_json::to_string(&Verdict::PartialConformity).unwrap();
        assert_eq!(j, "\"partial conformity\"");
        assert_eq!(Verdict::NonConformity.to_string(), "non-conformity");
    }

    #[test]
    fn test_single_value() {
        let out = analyze(&sample(&[dec!(7)])).unwrap();
        assert_eq!(out.sample_size, 1);
        assert_eq!(out.observed.get(7), Decimal::ONE);
        assert_eq!(out.observed.get(1), Decimal::ZERO);
        // 0.942 from the eight empty digits, plus 0.942^2 / 0.058
        assert!(
            approx_eq(out.statistics.chi_square, dec!(16.2414), dec!(0.001)),
            "chi2={}",
            out.statistics.chi_square
        );
        // cumulative gap peaks just before digit 7: 0.845
        assert_eq!(out.statistics.ks, dec!(0.845));
    }

    #[test]
    fn test_ks_is_max_cumulative_gap() {
        // all mass on digit 1: gap at digit 1 is 1 - 0.301
        let out = analyze(&sample(&[dec!(1), dec!(10), dec!(150)])).unwrap();
        assert_eq!(out.statistics.ks, dec!(0.699));
    }

    #[test]
    fn test_mape_all_ones() {
        let out = analyze(&sample(&[dec!(1)])).unwrap();
        // digit 1: 0.699 / 0.301; every other digit contributes exactly 1
        let expected = (dec!(0.699) / dec!(0.301) + dec!(8)) / dec!(9) * dec!(100);
        assert!(approx_eq(out.statistics.mape, expected, dec!(0.0001)));
        assert_eq!(out.verdict, Verdict::NonConformity);
    }

    #[test]
    fn test_breakdown_rows() {
        let out = analyze(&sample(&[dec!(1), dec!(2)])).unwrap();
        assert_eq!(out.breakdown.len(), 9);
        let one = &out.breakdown[0];
        assert_eq!(one.digit, 1);
        assert_eq!(one.observed_count, 1);
        assert_eq!(one.observed_pct, dec!(50));
        assert_eq!(one.expected_pct, dec!(30.1));
        assert_eq!(one.difference_pct, dec!(19.9));
        assert_eq!(one.direction, Deviation::Over);
        // |0.199| * 5 = 0.995
        assert_eq!(one.intensity, dec!(0.995));
        let nine = &out.breakdown[8];
        assert_eq!(nine.direction, Deviation::Under);
        assert_eq!(nine.intensity, dec!(0.230));
    }

    #[test]
    fn test_intensity_capped() {
        let out = analyze(&sample(&[dec!(5)])).unwrap();
        assert_eq!(out.breakdown[4].intensity, Decimal::ONE);
    }

    #[test]
    fn test_analyze_values_empty() {
        assert!(matches!(
            analyze_values(&[]),
            Err(BenfordError::EmptySample(_))
        ));
    }

    #[test]
    fn test_advisory_uses_default_alpha() {
        let out = analyze(&sample(&[dec!(3)])).unwrap();
        assert_eq!(out.advisory.significance_level, dec!(0.05));
        assert_eq!(out.advisory.chi_square_critical, dec!(15.507));
    }

    #[test]
    fn test_custom_significance() {
        let out = analyze_with_significance(&sample(&[dec!(3)]), dec!(0.01)).unwrap();
        assert_eq!(out.advisory.chi_square_critical, dec!(20.090));
        assert!(analyze_with_significance(&sample(&[dec!(3)]), dec!(1.5)).is_err());
    }

    #[test]
    fn test_sample_report_warns_small_sample() {
        let report = analyze_sample_report(&sample(&[dec!(4), dec!(44)])).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.methodology.contains("Benford"));
        assert_eq!(report.result.sample_size, 2);
    }

    #[test]
    fn test_column_report_counts_skipped_rows() {
        let table = RawTable::from_delimited("v\n1\nx\n-2\n30\n", ',', true);
        let report = analyze_column_report(&table, &ColumnSelector::Index(0)).unwrap();
        assert_eq!(report.result.accepted, 2);
        assert_eq!(report.result.rejected_non_numeric, 1);
        assert_eq!(report.result.rejected_non_positive, 1);
        assert!(report.warnings[0].contains("2 of 4 rows"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let out = analyze(&sample(&[dec!(12), dec!(0.7), dec!(3300)])).unwrap();
        let j = serde_json::to_string(&out).unwrap();
        let back: AnalysisResult = serde_json::from_str(&j).unwrap();
        assert_eq!(back, out);
    }

    #[cfg(feature = "p_values")]
    #[test]
    fn test_p_value_bounds() {
        let p_zero = chi_square_p_value(Decimal::ZERO).unwrap();
        assert!((p_zero - 1.0).abs() < 1e-9);
        let p_crit = chi_square_p_value(dec!(15.507)).unwrap();
        assert!((p_crit - 0.05).abs() < 0.001);
    }
}
