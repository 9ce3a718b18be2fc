//! Closed-form compound and simple interest
//!
//! Used by interest calculators over short, non-amortizing horizons. No per-period loop:
//! the balance at any time comes straight from the future-value formulas.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{checked_div, ensure_finite, CalcError, CalcResult};

/// Compound interest with optional recurring contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestConfig {
    pub principal: f64,

    /// Nominal annual rate as a percentage
    pub annual_rate_percent: f64,

    /// Horizon in years, may be fractional
    pub years: f64,

    pub compounds_per_year: u32,

    /// Amount added at the end of every contribution period
    #[serde(default)]
    pub periodic_contribution: f64,

    #[serde(default = "default_contributions_per_year")]
    pub contributions_per_year: u32,
}

fn default_contributions_per_year() -> u32 {
    12
}

impl Default for CompoundInterestConfig {
    fn default() -> Self {
        Self {
            principal: 10_000.0,
            annual_rate_percent: 5.0,
            years: 10.0,
            compounds_per_year: 12,
            periodic_contribution: 0.0,
            contributions_per_year: default_contributions_per_year(),
        }
    }
}

impl CompoundInterestConfig {
    fn validate(&self) -> CalcResult<()> {
        ensure_finite("principal", self.principal)?;
        ensure_finite("annual_rate_percent", self.annual_rate_percent)?;
        ensure_finite("years", self.years)?;
        ensure_finite("periodic_contribution", self.periodic_contribution)?;

        if self.principal < 0.0 {
            return Err(CalcError::InvalidPrincipal { value: self.principal });
        }
        if self.years < 0.0 {
            return Err(CalcError::term("years", self.years));
        }
        if self.compounds_per_year == 0 {
            return Err(CalcError::term("compounds_per_year", self.compounds_per_year));
        }
        if self.periodic_contribution < 0.0 {
            return Err(CalcError::input("periodic_contribution", "must be >= 0"));
        }
        if self.periodic_contribution != 0.0 && self.contributions_per_year == 0 {
            return Err(CalcError::term("contributions_per_year", self.contributions_per_year));
        }
        if self.annual_rate_percent / 100.0 / (self.compounds_per_year as f64) < -1.0 {
            return Err(CalcError::rate("annual_rate_percent", self.annual_rate_percent));
        }
        Ok(())
    }
}

/// Outcome of a compound interest calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub final_balance: f64,
    pub interest_earned: f64,

    /// Principal plus every contribution
    pub total_contributed: f64,
}

/// Outcome of a simple interest calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleInterestResult {
    pub final_balance: f64,
    pub interest_earned: f64,
}

/// Balance at the end of a year of a compound interest projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundYear {
    pub year: u32,
    /// Elapsed time, equal to `year` except for a trailing partial year
    pub elapsed_years: f64,
    pub balance: f64,
    pub interest_earned: f64,
    pub total_contributed: f64,
}

/// Closed-form interest calculator
pub struct CompoundInterestEngine;

impl CompoundInterestEngine {
    /// Future value of `principal` compounded `n` times a year for `t` years at nominal `r`:
    /// `P·(1 + r/n)^(n·t)`, plus the future value of an ordinary annuity of
    /// `m` contributions a year, `PMT·((1 + r/n)^(n·t) − 1) / ((1 + r/n)^(n/m) − 1)`.
    ///
    /// The annuity term assumes contributions earn the same nominal rate as the principal,
    /// compounded on the principal's schedule; when `m ≠ n` it is an approximation of
    /// what an account crediting interest only on compounding dates would pay.
    /// At a zero rate the balance is `P + PMT·m·t`.
    pub fn compute_future_value(
        config: &CompoundInterestConfig,
    ) -> CalcResult<CompoundInterestResult> {
        config.validate()?;
        debug!(
            "Compound interest: principal={:.2} rate={}% years={} n={} pmt={:.2} m={}",
            config.principal,
            config.annual_rate_percent,
            config.years,
            config.compounds_per_year,
            config.periodic_contribution,
            config.contributions_per_year
        );
        Self::balance_at(config, config.years)
    }

    /// Balance at each whole year up to the horizon; the last entry lands exactly on `years`
    pub fn yearly_balances(config: &CompoundInterestConfig) -> CalcResult<Vec<CompoundYear>> {
        config.validate()?;

        let whole_years = config.years.ceil() as u32;
        (1..=whole_years)
            .map(|year| {
                let elapsed = (year as f64).min(config.years);
                let at = Self::balance_at(config, elapsed)?;
                Ok(CompoundYear {
                    year,
                    elapsed_years: elapsed,
                    balance: at.final_balance,
                    interest_earned: at.interest_earned,
                    total_contributed: at.total_contributed,
                })
            })
            .collect()
    }

    /// Simple interest baseline: `P·(1 + r·t)`
    pub fn compute_simple_interest(
        principal: f64,
        rate_percent: f64,
        years: f64,
    ) -> CalcResult<SimpleInterestResult> {
        ensure_finite("principal", principal)?;
        ensure_finite("rate_percent", rate_percent)?;
        ensure_finite("years", years)?;
        if principal < 0.0 {
            return Err(CalcError::InvalidPrincipal { value: principal });
        }
        if years < 0.0 {
            return Err(CalcError::term("years", years));
        }
        if rate_percent < -100.0 {
            return Err(CalcError::rate("rate_percent", rate_percent));
        }

        let interest_earned = principal * rate_percent / 100.0 * years;
        Ok(SimpleInterestResult {
            final_balance: principal + interest_earned,
            interest_earned,
        })
    }

    /// Closed-form balance after `years`; assumes a validated config
    fn balance_at(
        config: &CompoundInterestConfig,
        years: f64,
    ) -> CalcResult<CompoundInterestResult> {
        if years == 0.0 {
            return Ok(CompoundInterestResult {
                final_balance: config.principal,
                interest_earned: 0.0,
                total_contributed: config.principal,
            });
        }

        let n = config.compounds_per_year as f64;
        let rate = config.annual_rate_percent / 100.0;
        let log_growth = (rate / n).ln_1p();

        let contributions = if config.periodic_contribution == 0.0 {
            0.0
        } else {
            config.periodic_contribution * config.contributions_per_year as f64 * years
        };

        let principal_fv = config.principal * (n * years * log_growth).exp();

        let annuity_fv = if config.periodic_contribution == 0.0 {
            0.0
        } else {
            let m = config.contributions_per_year as f64;
            let per_contribution = (n / m * log_growth).exp_m1();
            if rate == 0.0 || per_contribution == 0.0 {
                // No growth between contributions
                contributions
            } else {
                let accumulated = (n * years * log_growth).exp_m1();
                let factor = checked_div(accumulated, per_contribution, "annuity factor")?;
                config.periodic_contribution * factor
            }
        };

        let final_balance = principal_fv + annuity_fv;
        let total_contributed = config.principal + contributions;
        Ok(CompoundInterestResult {
            final_balance,
            interest_earned: final_balance - total_contributed,
            total_contributed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn config(
        principal: f64,
        rate: f64,
        years: f64,
        n: u32,
        pmt: f64,
        m: u32,
    ) -> CompoundInterestConfig {
        CompoundInterestConfig {
            principal,
            annual_rate_percent: rate,
            years,
            compounds_per_year: n,
            periodic_contribution: pmt,
            contributions_per_year: m,
        }
    }

    fn future_value(config: CompoundInterestConfig) -> CompoundInterestResult {
        CompoundInterestEngine::compute_future_value(&config).unwrap()
    }

    #[test]
    fn test_monthly_compounding_one_year() {
        let result = future_value(config(1000.0, 5.0, 1.0, 12, 0.0, 12));
        assert_abs_diff_eq!(result.final_balance, 1051.16, epsilon = 0.005);
        assert_abs_diff_eq!(result.interest_earned, 51.16, epsilon = 0.005);
        assert_eq!(result.total_contributed, 1000.0);
    }

    #[test]
    fn test_matches_simple_interest_for_single_annual_period() {
        let compound = future_value(config(1000.0, 5.0, 1.0, 1, 0.0, 12));
        let simple = CompoundInterestEngine::compute_simple_interest(1000.0, 5.0, 1.0).unwrap();
        assert_relative_eq!(compound.final_balance, simple.final_balance, max_relative = 1e-12);
        assert_relative_eq!(compound.final_balance, 1050.0, max_relative = 1e-12);
    }

    #[test]
    fn test_diverges_from_simple_interest_when_compounding_more_often() {
        let compound = future_value(config(1000.0, 5.0, 1.0, 12, 0.0, 12));
        let simple = CompoundInterestEngine::compute_simple_interest(1000.0, 5.0, 1.0).unwrap();
        assert!(compound.final_balance > simple.final_balance + 1.0);
    }

    #[test]
    fn test_contributions_match_ordinary_annuity() {
        // $100/month for 10 years at 6% compounded monthly
        let result = future_value(config(0.0, 6.0, 10.0, 12, 100.0, 12));
        let expected = 100.0 * (1.005_f64.powi(120) - 1.0) / 0.005;
        assert_relative_eq!(result.final_balance, expected, max_relative = 1e-10);
        assert_abs_diff_eq!(result.final_balance, 16_387.93, epsilon = 0.01);
        assert_eq!(result.total_contributed, 12_000.0);
    }

    #[test]
    fn test_annual_contributions_monthly_compounding() {
        let result = future_value(config(0.0, 12.0, 2.0, 12, 1000.0, 1));
        // Each annual deposit earns a full year of monthly compounding before the next
        let year_growth = 1.01_f64.powi(12);
        let expected = 1000.0 * year_growth + 1000.0;
        assert_relative_eq!(result.final_balance, expected, max_relative = 1e-10);
    }

    #[test]
    fn test_zero_rate() {
        let result = future_value(config(5000.0, 0.0, 3.0, 12, 200.0, 12));
        assert_eq!(result.final_balance, 5000.0 + 200.0 * 12.0 * 3.0);
        assert_eq!(result.interest_earned, 0.0);
    }

    #[test]
    fn test_balance_reconciles() {
        let result = future_value(config(2500.0, 7.25, 8.5, 4, 150.0, 12));
        assert_relative_eq!(
            result.final_balance,
            result.total_contributed + result.interest_earned,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_yearly_balances_end_on_horizon() {
        let cfg = config(1000.0, 5.0, 2.5, 12, 50.0, 12);
        let years = CompoundInterestEngine::yearly_balances(&cfg).unwrap();
        let total = CompoundInterestEngine::compute_future_value(&cfg).unwrap();

        assert_eq!(years.len(), 3);
        assert_eq!(years[0].elapsed_years, 1.0);
        assert_eq!(years[2].elapsed_years, 2.5);
        assert_eq!(years[2].balance, total.final_balance);
        assert!(years[0].balance < years[1].balance);
    }

    #[test]
    fn test_zero_years() {
        let result = future_value(config(1000.0, 5.0, 0.0, 12, 100.0, 12));
        assert_eq!(result.final_balance, 1000.0);
        assert!(CompoundInterestEngine::yearly_balances(&config(1000.0, 5.0, 0.0, 12, 0.0, 12))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            CompoundInterestEngine::compute_future_value(&config(1000.0, 5.0, -1.0, 12, 0.0, 12)),
            Err(CalcError::InvalidTerm { .. })
        ));
        assert!(matches!(
            CompoundInterestEngine::compute_future_value(&config(1000.0, 5.0, 1.0, 0, 0.0, 12)),
            Err(CalcError::InvalidTerm { .. })
        ));
        assert!(matches!(
            CompoundInterestEngine::compute_future_value(&config(1000.0, 5.0, 1.0, 12, 10.0, 0)),
            Err(CalcError::InvalidTerm { .. })
        ));
        assert!(matches!(
            CompoundInterestEngine::compute_future_value(&config(-1.0, 5.0, 1.0, 12, 0.0, 12)),
            Err(CalcError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            CompoundInterestEngine::compute_future_value(&config(1000.0, -250.0, 1.0, 2, 0.0, 12)),
            Err(CalcError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_simple_interest() {
        let result = CompoundInterestEngine::compute_simple_interest(2000.0, 4.0, 3.0).unwrap();
        assert_relative_eq!(result.final_balance, 2240.0, max_relative = 1e-12);
        assert_relative_eq!(result.interest_earned, 240.0, max_relative = 1e-12);
        assert!(CompoundInterestEngine::compute_simple_interest(2000.0, 4.0, -3.0).is_err());
    }
}
