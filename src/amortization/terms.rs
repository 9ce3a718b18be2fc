//! Loan terms as entered by a calculator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::rates::{self, PaymentFrequency};

/// A fixed-rate, level-payment loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate as a percentage (6.5 = 6.5%)
    pub annual_rate_percent: f64,

    /// Payments per year (12 = monthly)
    pub periods_per_year: u32,

    /// Total number of payments
    pub term_periods: i64,

    /// First payment falls one period after this date
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        periods_per_year: u32,
        term_periods: i64,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            periods_per_year,
            term_periods,
            start_date: None,
        }
    }

    /// Terms for a loan quoted in years at a given payment frequency
    pub fn from_years(
        principal: f64,
        annual_rate_percent: f64,
        years: f64,
        frequency: PaymentFrequency,
    ) -> CalcResult<Self> {
        let periods_per_year = frequency.periods_per_year();
        let term_periods = rates::periods_for_years(years, periods_per_year)?;
        Ok(Self::new(principal, annual_rate_percent, periods_per_year, term_periods))
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Check every invariant; negative rates are outside what these calculators model
    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("principal", self.principal)?;
        ensure_finite("annual_rate_percent", self.annual_rate_percent)?;
        if self.principal < 0.0 {
            return Err(CalcError::InvalidPrincipal { value: self.principal });
        }
        if self.periods_per_year == 0 {
            return Err(CalcError::term("periods_per_year", self.periods_per_year));
        }
        if self.term_periods <= 0 {
            return Err(CalcError::term("term_periods", self.term_periods as f64));
        }
        if self.annual_rate_percent < 0.0 {
            return Err(CalcError::rate("annual_rate_percent", self.annual_rate_percent));
        }
        Ok(())
    }

    pub fn periodic_rate(&self) -> CalcResult<f64> {
        rates::periodic_rate(self.annual_rate_percent, self.periods_per_year)
    }

    /// Level payment that retires the loan over its full term
    pub fn periodic_payment(&self) -> CalcResult<f64> {
        self.validate()?;
        rates::periodic_payment(self.principal, self.periodic_rate()?, self.term_periods)
    }

    pub fn frequency(&self) -> Option<PaymentFrequency> {
        PaymentFrequency::from_periods_per_year(self.periods_per_year)
    }

    /// Term length in years (fractional for terms that are not whole years)
    pub fn term_years(&self) -> f64 {
        self.term_periods as f64 / self.periods_per_year as f64
    }
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self::new(200_000.0, 6.0, 12, 360)
    }
}
