//! Period-by-period amortization of a level-payment loan

use chrono::NaiveDate;
use log::{debug, trace, warn};

use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::rates::{self, PaymentFrequency, LONG_SCHEDULE_WARN_PERIODS};
use super::schedule::{AmortizationResult, AmortizationRow};
use super::terms::LoanTerms;

/// Calendar placement of schedule rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDating {
    pub start_date: NaiveDate,
    pub frequency: PaymentFrequency,
}

/// Running state of a loan between periods
#[derive(Debug, Clone)]
struct LoanState {
    balance: f64,
}

/// Builds amortization schedules. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    dating: Option<ScheduleDating>,
}

impl AmortizationEngine {
    /// Engine producing undated rows
    pub fn new() -> Self {
        Self { dating: None }
    }

    /// Engine dating period `k` at `start_date` plus `k` steps of `frequency`
    pub fn dated(start_date: NaiveDate, frequency: PaymentFrequency) -> Self {
        Self {
            dating: Some(ScheduleDating { start_date, frequency }),
        }
    }

    /// Amortize `principal` at `periodic_rate` with a level `payment` for `period_count` periods.
    ///
    /// Each period charges `balance · rate` interest and applies the rest of the payment to
    /// principal. The balance never goes below zero: a period whose payment covers more than the
    /// remaining balance pays off exactly what remains, and the final period always settles the
    /// residual so floating-point drift cannot leave a non-zero terminal balance.
    ///
    /// A payment below the first period's interest is accepted and produces a growing
    /// balance that the final period settles.
    pub fn generate_schedule(
        &self,
        principal: f64,
        periodic_rate: f64,
        period_count: i64,
        payment: f64,
    ) -> CalcResult<AmortizationResult> {
        ensure_finite("principal", principal)?;
        ensure_finite("periodic_rate", periodic_rate)?;
        ensure_finite("payment", payment)?;
        if principal < 0.0 {
            return Err(CalcError::InvalidPrincipal { value: principal });
        }
        if periodic_rate < -1.0 {
            return Err(CalcError::rate("periodic_rate", periodic_rate));
        }
        if payment < 0.0 {
            return Err(CalcError::input("payment", "must be >= 0"));
        }
        if period_count < 0 {
            return Err(CalcError::term("period_count", period_count as f64));
        }
        let periods = u32::try_from(period_count).map_err(|_| {
            CalcError::input("period_count", "exceeds the supported schedule length")
        })?;

        debug!(
            "Amortizing principal={:.2} rate={:.8} periods={} payment={:.2}",
            principal, periodic_rate, periods, payment
        );
        if period_count > LONG_SCHEDULE_WARN_PERIODS {
            warn!("Generating a {}-period schedule", period_count);
        }
        if principal > 0.0 && payment <= principal * periodic_rate {
            warn!(
                "Payment {:.2} does not cover first-period interest {:.2}; balance will grow",
                payment,
                principal * periodic_rate
            );
        }

        let mut result = AmortizationResult::new(principal, payment);
        result.rows.reserve_exact(periods as usize);
        let mut state = LoanState { balance: principal };

        for period in 1..=periods {
            let is_final = period == periods;
            let row = self.calculate_period(&mut state, period, is_final, periodic_rate, payment);
            trace!(
                "period {} interest={:.4} principal={:.4} balance={:.4}",
                row.period_index, row.interest_portion, row.principal_portion, row.ending_balance
            );
            result.add_row(row);
        }

        result.finalize();

        let settlement = result.final_payment() - payment;
        if periods > 0 && principal > 0.0 && settlement.abs() > 1e-6 * payment.max(1.0) {
            warn!("Final period settles with an adjustment of {:.2}", settlement);
        }

        Ok(result)
    }

    /// Validate `terms`, derive the level payment and build the full schedule.
    /// Rows are dated when the terms carry a start date and a standard frequency.
    pub fn generate_for_terms(&self, terms: &LoanTerms) -> CalcResult<AmortizationResult> {
        terms.validate()?;
        let periodic_rate = terms.periodic_rate()?;
        let payment = rates::periodic_payment(terms.principal, periodic_rate, terms.term_periods)?;

        let dating = match (terms.start_date, terms.frequency()) {
            (Some(start_date), Some(frequency)) => Some(ScheduleDating { start_date, frequency }),
            _ => self.dating,
        };

        let engine = AmortizationEngine { dating };
        engine.generate_schedule(terms.principal, periodic_rate, terms.term_periods, payment)
    }

    /// Calculate a single period and advance the balance
    fn calculate_period(
        &self,
        state: &mut LoanState,
        period_index: u32,
        is_final: bool,
        periodic_rate: f64,
        payment: f64,
    ) -> AmortizationRow {
        let mut row = AmortizationRow::new(period_index);
        row.date = self
            .dating
            .and_then(|d| d.frequency.period_date(d.start_date, period_index));

        let interest = state.balance * periodic_rate;
        let nominal_principal = payment - interest;

        if is_final || nominal_principal >= state.balance {
            // Settle whatever remains
            row.principal_portion = state.balance;
            row.interest_portion = interest;
            row.payment_amount = state.balance + interest;
            state.balance = 0.0;
        } else {
            row.principal_portion = nominal_principal;
            row.interest_portion = interest;
            row.payment_amount = payment;
            state.balance = (state.balance - nominal_principal).max(0.0);
        }

        row.ending_balance = state.balance;
        row
    }
}
