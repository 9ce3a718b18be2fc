//! Configuration for contribution-and-growth projections

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, CalcError, CalcResult};

/// Order of contribution and growth inside a period.
/// The two are not numerically equivalent whenever the growth rate is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthBasis {
    /// `balance = (balance + contributions) · (1 + g)`
    ContributionThenGrow,
    /// `balance = balance · (1 + g) + contributions`
    GrowThenContribute,
}

impl Default for GrowthBasis {
    fn default() -> Self {
        GrowthBasis::GrowThenContribute
    }
}

impl FromStr for GrowthBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "contribution-then-grow" | "start" => Ok(GrowthBasis::ContributionThenGrow),
            "grow-then-contribute" | "end" => Ok(GrowthBasis::GrowThenContribute),
            _ => Err(format!("unknown growth basis: {}", s)),
        }
    }
}

/// Where each period's employee contribution comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContributionPlan {
    /// Same amount every period
    Flat { amount: f64 },

    /// A percentage of a per-period base (e.g. salary per pay period).
    /// `bases[k]` is the base for period `k + 1`; the caller supplies any growth in the base.
    PercentOfBase { percent: f64, bases: Vec<f64> },
}

/// Employee contribution for one period and the base it was drawn from
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PeriodContribution {
    pub employee: f64,
    pub base: Option<f64>,
}

impl ContributionPlan {
    pub fn flat(amount: f64) -> Self {
        ContributionPlan::Flat { amount }
    }

    /// Salary-percentage plan where the salary is paid in `periods_per_year` equal installments
    /// and steps up by `annual_raise_percent` at the start of every year after the first.
    pub fn growing_salary(
        annual_salary: f64,
        contribution_percent: f64,
        annual_raise_percent: f64,
        periods_per_year: u32,
        years: u32,
    ) -> CalcResult<Self> {
        ensure_finite("annual_salary", annual_salary)?;
        ensure_finite("annual_raise_percent", annual_raise_percent)?;
        if annual_salary < 0.0 {
            return Err(CalcError::input("annual_salary", "must be >= 0"));
        }
        if annual_raise_percent < -100.0 {
            return Err(CalcError::rate("annual_raise_percent", annual_raise_percent));
        }
        if periods_per_year == 0 {
            return Err(CalcError::term("periods_per_year", periods_per_year));
        }

        let raise = 1.0 + annual_raise_percent / 100.0;
        let mut salary = annual_salary;
        let mut bases = Vec::with_capacity(periods_per_year as usize * years as usize);
        for _year in 0..years {
            let per_period = salary / periods_per_year as f64;
            bases.extend(std::iter::repeat(per_period).take(periods_per_year as usize));
            salary *= raise;
        }

        Ok(ContributionPlan::PercentOfBase {
            percent: contribution_percent,
            bases,
        })
    }

    pub(crate) fn validate(&self, period_count: usize, capped_match: bool) -> CalcResult<()> {
        match self {
            ContributionPlan::Flat { amount } => {
                ensure_finite("contribution", *amount)?;
                if *amount < 0.0 {
                    return Err(CalcError::input("contribution", "must be >= 0"));
                }
                if capped_match {
                    return Err(CalcError::input(
                        "employer_match_cap_percent",
                        "a match cap needs a percent-of-base contribution plan",
                    ));
                }
            }
            ContributionPlan::PercentOfBase { percent, bases } => {
                ensure_finite("contribution_percent", *percent)?;
                if *percent < 0.0 {
                    return Err(CalcError::input("contribution_percent", "must be >= 0"));
                }
                if bases.len() < period_count {
                    return Err(CalcError::input(
                        "bases",
                        format!("{} bases supplied for {} periods", bases.len(), period_count),
                    ));
                }
                for base in bases.iter().take(period_count) {
                    ensure_finite("bases", *base)?;
                    if *base < 0.0 {
                        return Err(CalcError::input("bases", "must be >= 0"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Contribution for the 0-based period `index`; assumes `validate` passed
    pub(crate) fn for_period(&self, index: usize) -> PeriodContribution {
        match self {
            ContributionPlan::Flat { amount } => PeriodContribution {
                employee: *amount,
                base: None,
            },
            ContributionPlan::PercentOfBase { percent, bases } => {
                let base = bases[index];
                PeriodContribution {
                    employee: base * percent / 100.0,
                    base: Some(base),
                }
            }
        }
    }
}

/// A balance growing under recurring contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub opening_balance: f64,

    pub contribution: ContributionPlan,

    /// Employer adds this percentage of the (capped) employee contribution
    #[serde(default)]
    pub employer_match_percent: f64,

    /// Employee contributions above this percentage of the base are not matched
    #[serde(default)]
    pub employer_match_cap_percent: Option<f64>,

    /// Growth per period as a decimal fraction; -1.0 is a total loss
    pub periodic_growth_rate: f64,

    pub period_count: i64,

    #[serde(default)]
    pub growth_basis: GrowthBasis,

    /// Inflation per period as a decimal fraction, for real (today's money) balances
    #[serde(default)]
    pub periodic_inflation_rate: Option<f64>,
}

impl GrowthConfig {
    /// Flat-contribution projection without match or inflation
    pub fn new(
        opening_balance: f64,
        periodic_contribution: f64,
        periodic_growth_rate: f64,
        period_count: i64,
        growth_basis: GrowthBasis,
    ) -> Self {
        Self {
            opening_balance,
            contribution: ContributionPlan::flat(periodic_contribution),
            employer_match_percent: 0.0,
            employer_match_cap_percent: None,
            periodic_growth_rate,
            period_count,
            growth_basis,
            periodic_inflation_rate: None,
        }
    }

    pub fn with_contribution(mut self, plan: ContributionPlan) -> Self {
        self.contribution = plan;
        self
    }

    pub fn with_employer_match(mut self, match_percent: f64, cap_percent: Option<f64>) -> Self {
        self.employer_match_percent = match_percent;
        self.employer_match_cap_percent = cap_percent;
        self
    }

    pub fn with_inflation(mut self, periodic_inflation_rate: f64) -> Self {
        self.periodic_inflation_rate = Some(periodic_inflation_rate);
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        ensure_finite("opening_balance", self.opening_balance)?;
        ensure_finite("periodic_growth_rate", self.periodic_growth_rate)?;
        ensure_finite("employer_match_percent", self.employer_match_percent)?;

        if self.period_count < 0 {
            return Err(CalcError::term("period_count", self.period_count as f64));
        }
        if self.periodic_growth_rate < -1.0 {
            return Err(CalcError::rate("periodic_growth_rate", self.periodic_growth_rate));
        }
        if self.opening_balance < 0.0 {
            return Err(CalcError::InvalidPrincipal { value: self.opening_balance });
        }
        if self.employer_match_percent < 0.0 {
            return Err(CalcError::input("employer_match_percent", "must be >= 0"));
        }
        if let Some(cap) = self.employer_match_cap_percent {
            ensure_finite("employer_match_cap_percent", cap)?;
            if cap < 0.0 {
                return Err(CalcError::input("employer_match_cap_percent", "must be >= 0"));
            }
        }
        if let Some(inflation) = self.periodic_inflation_rate {
            ensure_finite("periodic_inflation_rate", inflation)?;
            if inflation <= -1.0 {
                return Err(CalcError::rate("periodic_inflation_rate", inflation));
            }
        }

        let periods = u32::try_from(self.period_count).map_err(|_| {
            CalcError::input("period_count", "exceeds the supported projection length")
        })?;
        self.contribution
            .validate(periods as usize, self.employer_match_cap_percent.is_some())
    }

    /// Employer contribution matching `contribution`
    pub(crate) fn employer_match(&self, contribution: &PeriodContribution) -> f64 {
        let matched = match (self.employer_match_cap_percent, contribution.base) {
            (Some(cap), Some(base)) => contribution.employee.min(base * cap / 100.0),
            _ => contribution.employee,
        };
        matched * self.employer_match_percent / 100.0
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::new(0.0, 500.0, 0.07 / 12.0, 120, GrowthBasis::GrowThenContribute)
    }
}
