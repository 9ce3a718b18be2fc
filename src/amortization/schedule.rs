//! Amortization schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::summary::{LedgerKind, LedgerRow, ProjectionSummarizer, ProjectionSummary};

/// One payment period of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number
    pub period_index: u32,

    /// Payment date, when the schedule was dated
    pub date: Option<NaiveDate>,

    pub payment_amount: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,

    /// Balance after this payment, never negative
    pub ending_balance: f64,
}

impl AmortizationRow {
    pub fn new(period_index: u32) -> Self {
        Self {
            period_index,
            date: None,
            payment_amount: 0.0,
            principal_portion: 0.0,
            interest_portion: 0.0,
            ending_balance: 0.0,
        }
    }
}

impl LedgerRow for AmortizationRow {
    const KIND: LedgerKind = LedgerKind::Amortization;

    fn period_index(&self) -> u32 {
        self.period_index
    }
    fn ending_balance(&self) -> f64 {
        self.ending_balance
    }
    fn payment(&self) -> f64 {
        self.payment_amount
    }
    fn principal_repaid(&self) -> f64 {
        self.principal_portion
    }
    fn interest(&self) -> f64 {
        self.interest_portion
    }
}

/// Complete amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal level payment (the final row may differ after settlement)
    pub periodic_payment: f64,

    /// One row per period, in order
    pub rows: Vec<AmortizationRow>,

    /// Sum of every row's payment
    pub total_paid: f64,

    /// Sum of every row's interest; equals `total_paid - principal`
    pub total_interest: f64,
}

impl AmortizationResult {
    pub fn new(principal: f64, periodic_payment: f64) -> Self {
        Self {
            principal,
            periodic_payment,
            rows: Vec::new(),
            total_paid: 0.0,
            total_interest: 0.0,
        }
    }

    /// Add a schedule row
    pub fn add_row(&mut self, row: AmortizationRow) {
        self.rows.push(row);
    }

    /// Recompute the totals from the rows
    pub(crate) fn finalize(&mut self) {
        let summary = self.summary();
        self.total_paid = summary.total_paid;
        self.total_interest = summary.total_interest;
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummarizer::summarize(self.principal, &self.rows)
    }

    pub fn final_balance(&self) -> f64 {
        self.rows.last().map(|r| r.ending_balance).unwrap_or(self.principal)
    }

    /// Payment of the last row, which absorbs any rounding residual
    pub fn final_payment(&self) -> f64 {
        self.rows.last().map(|r| r.payment_amount).unwrap_or(0.0)
    }

    /// Roll the schedule up into calendar-agnostic loan years of `periods_per_year` rows.
    /// A trailing partial year is reported as its own entry.
    pub fn yearly_totals(&self, periods_per_year: u32) -> Vec<YearlyTotals> {
        if periods_per_year == 0 {
            return Vec::new();
        }

        self.rows
            .chunks(periods_per_year as usize)
            .enumerate()
            .map(|(i, chunk)| YearlyTotals {
                year: i as u32 + 1,
                payments: chunk.iter().map(|r| r.payment_amount).sum(),
                principal: chunk.iter().map(|r| r.principal_portion).sum(),
                interest: chunk.iter().map(|r| r.interest_portion).sum(),
                ending_balance: chunk.last().map(|r| r.ending_balance).unwrap_or(0.0),
            })
            .collect()
    }
}

/// Per-year roll-up of a schedule, as charted by loan calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyTotals {
    pub year: u32,
    pub payments: f64,
    pub principal: f64,
    pub interest: f64,
    pub ending_balance: f64,
}
