//! CSV and JSON rendering of schedules and trajectories
//!
//! Every writer takes any `io::Write`, so callers choose between stdout, files and buffers.

use std::io::Write;

use serde::Serialize;

use crate::amortization::{AmortizationResult, YearlyTotals};
use crate::compound::CompoundYear;
use crate::error::CalcResult;
use crate::growth::{GrowthResult, GrowthYear};

/// Serialize `rows` as CSV with a header taken from the row type's field names
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> CalcResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// One line per period: index, date, payment, principal, interest, balance
pub fn write_amortization_csv<W: Write>(writer: W, result: &AmortizationResult) -> CalcResult<()> {
    write_rows(writer, &result.rows)
}

pub fn write_growth_csv<W: Write>(writer: W, result: &GrowthResult) -> CalcResult<()> {
    write_rows(writer, &result.rows)
}

pub fn write_yearly_totals_csv<W: Write>(writer: W, years: &[YearlyTotals]) -> CalcResult<()> {
    write_rows(writer, years)
}

pub fn write_growth_years_csv<W: Write>(writer: W, years: &[GrowthYear]) -> CalcResult<()> {
    write_rows(writer, years)
}

pub fn write_compound_years_csv<W: Write>(writer: W, years: &[CompoundYear]) -> CalcResult<()> {
    write_rows(writer, years)
}

/// Pretty-printed JSON with a trailing newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> CalcResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{AmortizationEngine, LoanTerms};
    use crate::growth::{GrowthBasis, GrowthConfig, GrowthProjectionEngine};
    use chrono::NaiveDate;

    #[test]
    fn test_amortization_csv() {
        let terms = LoanTerms::new(1200.0, 0.0, 12, 3)
            .with_start_date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        let result = AmortizationEngine::new().generate_for_terms(&terms).unwrap();

        let mut buf = Vec::new();
        write_amortization_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "period_index,date,payment_amount,principal_portion,interest_portion,ending_balance"
        );
        assert_eq!(lines.len(), 4);
        // Month-end start clamps to the shorter month
        assert_eq!(lines[1], "1,2025-02-28,400.0,400.0,0.0,800.0");
        assert_eq!(lines[3], "3,2025-04-30,400.0,400.0,0.0,0.0");
    }

    #[test]
    fn test_undated_rows_leave_date_empty() {
        let result = AmortizationEngine::new()
            .generate_for_terms(&LoanTerms::new(1200.0, 0.0, 12, 3))
            .unwrap();
        let mut buf = Vec::new();
        write_amortization_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("1,,400.0"));
    }

    #[test]
    fn test_growth_csv_header_and_rows() {
        let config = GrowthConfig::new(0.0, 100.0, 0.0, 10, GrowthBasis::GrowThenContribute);
        let result = GrowthProjectionEngine::new(config).project().unwrap();

        let mut buf = Vec::new();
        write_growth_csv(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("period_index,starting_balance,employee_contribution,"));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_yearly_csv() {
        let result = AmortizationEngine::new()
            .generate_for_terms(&LoanTerms::new(24_000.0, 0.0, 12, 24))
            .unwrap();
        let mut buf = Vec::new();
        write_yearly_totals_csv(&mut buf, &result.yearly_totals(12)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("year,"));
    }

    #[test]
    fn test_json_round_trips_through_value() {
        let result = AmortizationEngine::new()
            .generate_for_terms(&LoanTerms::new(1200.0, 0.0, 12, 3))
            .unwrap();
        let mut buf = Vec::new();
        write_json(&mut buf, &result).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["total_paid"], 1200.0);
    }
}
