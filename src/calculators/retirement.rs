//! Retirement calculators: employer-sponsored 401(k) and personal retirement savings
//!
//! Both map their form fields onto a `GrowthConfig` and run the shared growth engine.
//! The 401(k) deposits each paycheck's contribution before the period's return accrues;
//! personal savings grow first and receive the deposit at period end.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::growth::{
    ContributionPlan, GrowthBasis, GrowthConfig, GrowthProjectionEngine, GrowthResult, GrowthYear,
};
use crate::rates::{self, PaymentFrequency};

/// 401(k) form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retirement401kInputs {
    #[serde(default)]
    pub current_balance: f64,
    pub annual_salary: f64,
    /// Employee deferral as a percentage of salary
    pub contribution_percent: f64,
    #[serde(default)]
    pub employer_match_percent: f64,
    /// Salary percentage the employer matches up to; unlimited when absent
    #[serde(default)]
    pub employer_match_cap_percent: Option<f64>,
    #[serde(default)]
    pub annual_raise_percent: f64,
    /// Nominal annual return, credited per pay period
    pub annual_return_percent: f64,
    pub years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Inflation used to report balances in today's money
    #[serde(default)]
    pub annual_inflation_percent: Option<f64>,
}

/// Personal retirement savings form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementSavingsInputs {
    #[serde(default)]
    pub current_savings: f64,
    pub monthly_contribution: f64,
    /// Effective annual return
    pub annual_return_percent: f64,
    #[serde(default)]
    pub annual_inflation_percent: f64,
    pub years: u32,
    /// Share of the final balance drawn in the first retirement year
    #[serde(default = "default_withdrawal_rate_percent")]
    pub withdrawal_rate_percent: f64,
}

fn default_withdrawal_rate_percent() -> f64 {
    4.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProjection {
    pub final_balance: f64,
    /// Final balance in today's money
    pub real_final_balance: f64,
    pub total_employee_contributions: f64,
    pub total_employer_contributions: f64,
    pub total_returns: f64,
    /// Real return after inflation, annualized, as a percentage
    pub real_annual_return_percent: f64,
    /// First-year retirement income per month at the withdrawal rate, in today's money
    pub sustainable_monthly_income: Option<f64>,
    pub yearly: Vec<GrowthYear>,
    pub trajectory: GrowthResult,
}

pub fn calculate_401k(inputs: &Retirement401kInputs) -> CalcResult<RetirementProjection> {
    ensure_finite("annual_return_percent", inputs.annual_return_percent)?;
    rates::ensure_term_years("years", f64::from(inputs.years))?;
    let periods_per_year = inputs.frequency.periods_per_year();
    let periodic_return = rates::periodic_rate(inputs.annual_return_percent, periods_per_year)?;
    let plan = ContributionPlan::growing_salary(
        inputs.annual_salary,
        inputs.contribution_percent,
        inputs.annual_raise_percent,
        periods_per_year,
        inputs.years,
    )?;

    let mut config = GrowthConfig::new(
        inputs.current_balance,
        0.0,
        periodic_return,
        i64::from(inputs.years) * i64::from(periods_per_year),
        GrowthBasis::ContributionThenGrow,
    )
    .with_contribution(plan)
    .with_employer_match(inputs.employer_match_percent, inputs.employer_match_cap_percent);

    if let Some(inflation) = inputs.annual_inflation_percent {
        config = config.with_inflation(rates::periodic_growth_rate(inflation, periods_per_year)?);
    }

    debug!(
        "401(k): salary={:.2} deferral={}% match={}% years={} frequency={:?}",
        inputs.annual_salary,
        inputs.contribution_percent,
        inputs.employer_match_percent,
        inputs.years,
        inputs.frequency
    );

    let real_annual = match inputs.annual_inflation_percent {
        Some(inflation) => {
            let nominal =
                rates::effective_annual_rate(inputs.annual_return_percent, periods_per_year)?;
            rates::real_rate(nominal, inflation / 100.0)?
        }
        None => rates::effective_annual_rate(inputs.annual_return_percent, periods_per_year)?,
    };

    build_projection(config, periods_per_year, real_annual, None)
}

pub fn calculate_savings(inputs: &RetirementSavingsInputs) -> CalcResult<RetirementProjection> {
    ensure_finite("monthly_contribution", inputs.monthly_contribution)?;
    ensure_finite("withdrawal_rate_percent", inputs.withdrawal_rate_percent)?;
    rates::ensure_term_years("years", f64::from(inputs.years))?;
    if inputs.withdrawal_rate_percent < 0.0 {
        return Err(CalcError::input("withdrawal_rate_percent", "must be >= 0"));
    }

    let periods_per_year = PaymentFrequency::Monthly.periods_per_year();
    let monthly_return =
        rates::periodic_growth_rate(inputs.annual_return_percent, periods_per_year)?;
    let monthly_inflation =
        rates::periodic_growth_rate(inputs.annual_inflation_percent, periods_per_year)?;

    let config = GrowthConfig::new(
        inputs.current_savings,
        inputs.monthly_contribution,
        monthly_return,
        i64::from(inputs.years) * i64::from(periods_per_year),
        GrowthBasis::GrowThenContribute,
    )
    .with_inflation(monthly_inflation);

    let real_annual = rates::real_rate(
        inputs.annual_return_percent / 100.0,
        inputs.annual_inflation_percent / 100.0,
    )?;

    build_projection(config, periods_per_year, real_annual, Some(inputs.withdrawal_rate_percent))
}

fn build_projection(
    config: GrowthConfig,
    periods_per_year: u32,
    real_annual_return: f64,
    withdrawal_rate_percent: Option<f64>,
) -> CalcResult<RetirementProjection> {
    let trajectory = GrowthProjectionEngine::new(config).project()?;

    let sustainable_monthly_income =
        withdrawal_rate_percent.map(|pct| trajectory.real_final_balance * pct / 100.0 / 12.0);

    Ok(RetirementProjection {
        final_balance: trajectory.final_balance,
        real_final_balance: trajectory.real_final_balance,
        total_employee_contributions: trajectory.total_employee_contributions,
        total_employer_contributions: trajectory.total_employer_contributions,
        total_returns: trajectory.total_returns,
        real_annual_return_percent: real_annual_return * 100.0,
        sustainable_monthly_income,
        yearly: trajectory.yearly_snapshots(periods_per_year),
        trajectory,
    })
}
