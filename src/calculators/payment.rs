//! Generic loan payment calculator
//!
//! Solves either direction: the payment for a given term, or the term for a given payment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, AmortizationResult, LoanTerms, YearlyTotals};
use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::rates::{self, PaymentFrequency, MAX_TERM_YEARS};

/// What the borrower fixes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTarget {
    /// Fixed term, solve for the payment
    TermYears(f64),
    /// Fixed payment per period, solve for the term
    Payment(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub target: PaymentTarget,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub terms: LoanTerms,
    pub periodic_payment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub yearly: Vec<YearlyTotals>,
    pub schedule: AmortizationResult,
}

/// Whole periods needed to repay `principal` with a level `payment`; the last may be partial.
/// None when the payment never covers the interest.
pub fn periods_to_repay(
    principal: f64,
    periodic_rate: f64,
    payment: f64,
) -> CalcResult<Option<i64>> {
    ensure_finite("principal", principal)?;
    ensure_finite("periodic_rate", periodic_rate)?;
    ensure_finite("payment", payment)?;
    if principal < 0.0 {
        return Err(CalcError::InvalidPrincipal { value: principal });
    }
    if periodic_rate < 0.0 {
        return Err(CalcError::rate("periodic_rate", periodic_rate));
    }
    if principal == 0.0 {
        return Ok(Some(0));
    }
    if payment <= principal * periodic_rate {
        return Ok(None);
    }

    let periods = if periodic_rate == 0.0 {
        principal / payment
    } else {
        // n = -ln(1 - P·r/PMT) / ln(1 + r)
        -(-principal * periodic_rate / payment).ln_1p() / periodic_rate.ln_1p()
    };

    // Shave float noise so an exact fit is not pushed into an extra period
    Ok(Some((periods - 1e-9).ceil().max(1.0) as i64))
}

pub fn calculate(inputs: &PaymentInputs) -> CalcResult<PaymentQuote> {
    let periods_per_year = inputs.frequency.periods_per_year();
    let engine = match inputs.start_date {
        Some(start) => AmortizationEngine::dated(start, inputs.frequency),
        None => AmortizationEngine::new(),
    };

    let (terms, schedule) = match inputs.target {
        PaymentTarget::TermYears(years) => {
            let years = rates::ensure_term_years("term_years", years)?;
            let terms = LoanTerms::from_years(
                inputs.principal,
                inputs.annual_rate_percent,
                years,
                inputs.frequency,
            )?;
            let schedule = engine.generate_for_terms(&terms)?;
            (terms, schedule)
        }
        PaymentTarget::Payment(payment) => {
            let base =
                LoanTerms::new(inputs.principal, inputs.annual_rate_percent, periods_per_year, 1);
            base.validate()?;
            let periodic_rate = base.periodic_rate()?;
            let periods = match periods_to_repay(inputs.principal, periodic_rate, payment)? {
                Some(periods) => periods,
                None => {
                    return Err(CalcError::input(
                        "payment",
                        "does not cover the interest; the loan is never repaid",
                    ))
                }
            };
            if periods > MAX_TERM_YEARS * i64::from(periods_per_year) {
                return Err(CalcError::input(
                    "payment",
                    format!("would take more than {} years to repay", MAX_TERM_YEARS),
                ));
            }
            let terms = LoanTerms { term_periods: periods.max(1), ..base };
            let schedule = engine.generate_schedule(
                terms.principal,
                periodic_rate,
                terms.term_periods,
                payment,
            )?;
            (terms, schedule)
        }
    };

    let terms = LoanTerms { start_date: inputs.start_date, ..terms };
    Ok(PaymentQuote {
        periodic_payment: schedule.periodic_payment,
        total_paid: schedule.total_paid,
        total_interest: schedule.total_interest,
        yearly: schedule.yearly_totals(periods_per_year),
        terms,
        schedule,
    })
}
