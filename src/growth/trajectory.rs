//! Growth projection output structures

use serde::{Deserialize, Serialize};

use crate::summary::{LedgerKind, LedgerRow, ProjectionSummarizer, ProjectionSummary};

/// One period of a growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    /// 1-based period number
    pub period_index: u32,
    pub starting_balance: f64,
    pub employee_contribution: f64,
    pub employer_contribution: f64,

    /// `ending - starting - contributions`
    pub period_return: f64,
    pub ending_balance: f64,

    /// Ending balance deflated to period-0 money; equals `ending_balance` without inflation
    pub real_balance: f64,
}

impl GrowthRow {
    pub fn new(period_index: u32) -> Self {
        Self {
            period_index,
            starting_balance: 0.0,
            employee_contribution: 0.0,
            employer_contribution: 0.0,
            period_return: 0.0,
            ending_balance: 0.0,
            real_balance: 0.0,
        }
    }
}

impl LedgerRow for GrowthRow {
    const KIND: LedgerKind = LedgerKind::Growth;

    fn period_index(&self) -> u32 {
        self.period_index
    }
    fn ending_balance(&self) -> f64 {
        self.ending_balance
    }
    fn employee_contribution(&self) -> f64 {
        self.employee_contribution
    }
    fn employer_contribution(&self) -> f64 {
        self.employer_contribution
    }
    fn period_return(&self) -> f64 {
        self.period_return
    }
}

/// Complete growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub opening_balance: f64,
    pub rows: Vec<GrowthRow>,
    pub final_balance: f64,
    pub total_employee_contributions: f64,
    pub total_employer_contributions: f64,
    pub total_returns: f64,

    /// Final balance in period-0 money
    pub real_final_balance: f64,
}

impl GrowthResult {
    pub fn new(opening_balance: f64) -> Self {
        Self {
            opening_balance,
            rows: Vec::new(),
            final_balance: opening_balance,
            total_employee_contributions: 0.0,
            total_employer_contributions: 0.0,
            total_returns: 0.0,
            real_final_balance: opening_balance,
        }
    }

    pub fn add_row(&mut self, row: GrowthRow) {
        self.rows.push(row);
    }

    /// Recompute the totals from the rows
    pub(crate) fn finalize(&mut self) {
        let summary = self.summary();
        self.final_balance = summary.final_balance;
        self.total_employee_contributions = summary.total_employee_contributions;
        self.total_employer_contributions = summary.total_employer_contributions;
        self.total_returns = summary.total_returns;
        self.real_final_balance = self
            .rows
            .last()
            .map(|r| r.real_balance)
            .unwrap_or(self.opening_balance);
    }

    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummarizer::summarize(self.opening_balance, &self.rows)
    }

    /// Year-end snapshots every `periods_per_year` rows; a trailing partial year is included
    pub fn yearly_snapshots(&self, periods_per_year: u32) -> Vec<GrowthYear> {
        if periods_per_year == 0 {
            return Vec::new();
        }

        self.rows
            .chunks(periods_per_year as usize)
            .enumerate()
            .map(|(i, chunk)| {
                let last = chunk.last();
                GrowthYear {
                    year: i as u32 + 1,
                    employee_contributions: chunk.iter().map(|r| r.employee_contribution).sum(),
                    employer_contributions: chunk.iter().map(|r| r.employer_contribution).sum(),
                    returns: chunk.iter().map(|r| r.period_return).sum(),
                    ending_balance: last.map(|r| r.ending_balance).unwrap_or(0.0),
                    real_balance: last.map(|r| r.real_balance).unwrap_or(0.0),
                }
            })
            .collect()
    }
}

/// Per-year view of a growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub employee_contributions: f64,
    pub employer_contributions: f64,
    pub returns: f64,
    pub ending_balance: f64,
    pub real_balance: f64,
}
