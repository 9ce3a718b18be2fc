//! Interest calculator: compound growth next to its simple-interest baseline

use serde::{Deserialize, Serialize};

use crate::compound::{
    CompoundInterestConfig, CompoundInterestEngine, CompoundInterestResult, CompoundYear,
    SimpleInterestResult,
};
use crate::error::CalcResult;
use crate::rates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestComparison {
    pub compound: CompoundInterestResult,
    /// Same principal, rate and horizon without compounding or contributions
    pub simple: SimpleInterestResult,
    pub effective_annual_rate_percent: f64,
    pub yearly: Vec<CompoundYear>,
}

impl InterestComparison {
    /// Interest earned beyond the simple baseline
    pub fn compounding_advantage(&self) -> f64 {
        self.compound.interest_earned - self.simple.interest_earned
    }
}

pub fn calculate(config: &CompoundInterestConfig) -> CalcResult<InterestComparison> {
    rates::ensure_term_years("years", config.years)?;
    let compound = CompoundInterestEngine::compute_future_value(config)?;
    let simple = CompoundInterestEngine::compute_simple_interest(
        config.principal,
        config.annual_rate_percent,
        config.years,
    )?;
    let yearly = CompoundInterestEngine::yearly_balances(config)?;
    let effective =
        rates::effective_annual_rate(config.annual_rate_percent, config.compounds_per_year)?;

    Ok(InterestComparison {
        compound,
        simple,
        effective_annual_rate_percent: effective * 100.0,
        yearly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_side_by_side() {
        let comparison = calculate(&CompoundInterestConfig {
            principal: 1000.0,
            annual_rate_percent: 5.0,
            years: 1.0,
            compounds_per_year: 12,
            periodic_contribution: 0.0,
            contributions_per_year: 12,
        })
        .unwrap();

        assert_abs_diff_eq!(comparison.compound.final_balance, 1051.16, epsilon = 0.005);
        assert_relative_eq!(comparison.simple.final_balance, 1050.0, max_relative = 1e-12);
        assert_abs_diff_eq!(comparison.effective_annual_rate_percent, 5.116, epsilon = 0.001);
        assert_eq!(comparison.yearly.len(), 1);
        assert_abs_diff_eq!(comparison.compounding_advantage(), 1.16, epsilon = 0.005);
    }

    #[test]
    fn test_horizon_past_limit_rejected() {
        let result = calculate(&CompoundInterestConfig {
            years: 3e9,
            ..CompoundInterestConfig::default()
        });
        assert!(matches!(result, Err(crate::error::CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_default_config() {
        let comparison = calculate(&CompoundInterestConfig::default()).unwrap();
        assert_eq!(comparison.yearly.len(), 10);
        assert_relative_eq!(
            comparison.yearly[9].balance,
            comparison.compound.final_balance,
            max_relative = 1e-12
        );
        assert!(comparison.compounding_advantage() > 0.0);
    }
}
