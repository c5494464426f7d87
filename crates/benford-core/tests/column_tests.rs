use benford_core::analyzer::{analyze_column, analyze_column_report, Deviation, Verdict};
use benford_core::{BenfordError, ColumnSelector, RawTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// End-to-end: delimited text -> column selection -> analysis.
// ===========================================================================

const LEDGER: &str = "\
invoice,amount,vendor
1001,1200.50,acme
1002,185.00,globex
1003,0,initech
1004,3100,acme
1005,n/a,umbrella
1006,142.75,globex
1007,-50,initech
1008,19.99,acme
1009,2500,hooli
1010,0.0075,acme
";

#[test]
fn test_column_by_name() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let out = analyze_column(&table, &ColumnSelector::Name("amount".into())).unwrap();

    assert_eq!(out.column_title, "amount");
    assert_eq!(out.accepted, 7);
    assert_eq!(out.rejected_non_numeric, 1);
    assert_eq!(out.rejected_non_positive, 2);
    assert_eq!(out.analysis.sample_size, 7);
    // 1200.50, 185, 142.75, 19.99
    assert_eq!(out.analysis.counts.get(1), 4);
    assert_eq!(out.analysis.counts.get(2), 1);
    assert_eq!(out.analysis.counts.get(3), 1);
    assert_eq!(out.analysis.counts.get(7), 1);
}

#[test]
fn test_column_by_index_matches_name() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let by_name = analyze_column(&table, &ColumnSelector::Name("amount".into())).unwrap();
    let by_index = analyze_column(&table, &ColumnSelector::parse("1")).unwrap();
    assert_eq!(by_name.analysis, by_index.analysis);
}

#[test]
fn test_text_column_is_empty_sample() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let err = analyze_column(&table, &ColumnSelector::Name("vendor".into())).unwrap_err();
    assert!(matches!(err, BenfordError::EmptySample(_)));
}

#[test]
fn test_unknown_column() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let err = analyze_column(&table, &ColumnSelector::Index(9)).unwrap_err();
    assert!(matches!(err, BenfordError::ColumnNotFound(_)));
}

#[test]
fn test_report_envelope() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let report = analyze_column_report(&table, &ColumnSelector::Name("amount".into())).unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings[0].contains("3 of 10 rows"));
    assert_eq!(report.metadata.precision, "rust_decimal_128bit");
    assert_eq!(report.assumptions["verdict_basis"], "MAPE only");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["result"]["analysis"]["verdict"], "non-conformity");
}

#[test]
fn test_breakdown_directions() {
    let table = RawTable::from_delimited(LEDGER, ',', true);
    let out = analyze_column(&table, &ColumnSelector::Name("amount".into())).unwrap();
    let rows = &out.analysis.breakdown;

    // 4 of 7 lead with 1, well above 30.1%
    assert_eq!(rows[0].direction, Deviation::Over);
    assert_eq!(rows[8].direction, Deviation::Under);
    assert_eq!(rows[8].observed_count, 0);
    let total: u64 = rows.iter().map(|r| r.observed_count).sum();
    assert_eq!(total, 7);
    assert_eq!(out.analysis.verdict, Verdict::NonConformity);
}

#[test]
fn test_headerless_semicolon_input() {
    let table = RawTable::from_delimited("a;1\nb;2\nc;30\n", ';', false);
    let out = analyze_column(&table, &ColumnSelector::Index(1)).unwrap();
    assert_eq!(out.column_title, "column_2");
    assert_eq!(out.analysis.sample_size, 3);
    assert_eq!(out.analysis.observed.get(3), Decimal::ONE / dec!(3));
}
