//! Reduction of a period ledger into headline totals
//!
//! Both loan schedules and growth trajectories reduce to the same summary shape,
//! so tables and charts can show totals without knowing which engine produced them.
//! Nothing here computes beyond summation.

use serde::{Deserialize, Serialize};

/// Which engine a ledger came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Amortization,
    Growth,
}

/// A single period of a ledger. Categories a ledger does not track default to zero.
pub trait LedgerRow {
    const KIND: LedgerKind;

    fn period_index(&self) -> u32;
    fn ending_balance(&self) -> f64;

    fn payment(&self) -> f64 {
        0.0
    }
    fn principal_repaid(&self) -> f64 {
        0.0
    }
    fn interest(&self) -> f64 {
        0.0
    }
    fn employee_contribution(&self) -> f64 {
        0.0
    }
    fn employer_contribution(&self) -> f64 {
        0.0
    }
    fn period_return(&self) -> f64 {
        0.0
    }
}

/// Headline totals for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub kind: LedgerKind,
    pub total_periods: u32,
    pub opening_balance: f64,
    pub final_balance: f64,

    // Loan ledgers
    pub total_paid: f64,
    pub total_principal: f64,
    pub total_interest: f64,

    // Growth ledgers
    pub total_employee_contributions: f64,
    pub total_employer_contributions: f64,
    pub total_returns: f64,

    /// Returns over everything put in (opening balance plus contributions).
    /// None for loan ledgers and when nothing was invested.
    pub return_on_investment: Option<f64>,
}

impl ProjectionSummary {
    pub fn total_contributions(&self) -> f64 {
        self.total_employee_contributions + self.total_employer_contributions
    }
}

/// Sums a ledger into a `ProjectionSummary`
pub struct ProjectionSummarizer;

impl ProjectionSummarizer {
    /// Summarize `rows`, an ordered ledger that started from `opening_balance`.
    /// An empty ledger keeps the opening balance as its final balance.
    pub fn summarize<R: LedgerRow>(opening_balance: f64, rows: &[R]) -> ProjectionSummary {
        let mut total_paid = 0.0;
        let mut total_principal = 0.0;
        let mut total_interest = 0.0;
        let mut total_employee = 0.0;
        let mut total_employer = 0.0;
        let mut total_returns = 0.0;

        for row in rows {
            total_paid += row.payment();
            total_principal += row.principal_repaid();
            total_interest += row.interest();
            total_employee += row.employee_contribution();
            total_employer += row.employer_contribution();
            total_returns += row.period_return();
        }

        let final_balance = rows.last().map(|r| r.ending_balance()).unwrap_or(opening_balance);

        let return_on_investment = match R::KIND {
            LedgerKind::Amortization => None,
            LedgerKind::Growth => {
                let invested = opening_balance + total_employee + total_employer;
                if invested > 0.0 {
                    Some(total_returns / invested)
                } else {
                    None
                }
            }
        };

        ProjectionSummary {
            kind: R::KIND,
            total_periods: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            opening_balance,
            final_balance,
            total_paid,
            total_principal,
            total_interest,
            total_employee_contributions: total_employee,
            total_employer_contributions: total_employer,
            total_returns,
            return_on_investment,
        }
    }
}
