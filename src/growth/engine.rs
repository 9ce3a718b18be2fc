//! Period-by-period projection of a balance under contributions and growth

use log::{debug, trace, warn};

use crate::error::CalcResult;
use crate::rates::LONG_SCHEDULE_WARN_PERIODS;
use super::config::{GrowthBasis, GrowthConfig};
use super::trajectory::{GrowthResult, GrowthRow};

/// Running state of the balance between periods
#[derive(Debug, Clone)]
struct GrowthState {
    balance: f64,
    /// Cumulative inflation since period 0
    price_index: f64,
}

/// Projects a `GrowthConfig`. The engine owns its configuration and keeps no state between runs.
pub struct GrowthProjectionEngine {
    config: GrowthConfig,
}

impl GrowthProjectionEngine {
    pub fn new(config: GrowthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// Run the projection
    pub fn project(&self) -> CalcResult<GrowthResult> {
        self.config.validate()?;
        let config = &self.config;

        debug!(
            "Projecting growth: opening={:.2} rate={:.8} periods={} basis={:?}",
            config.opening_balance,
            config.periodic_growth_rate,
            config.period_count,
            config.growth_basis
        );
        if config.period_count > LONG_SCHEDULE_WARN_PERIODS {
            warn!("Projecting {} periods", config.period_count);
        }

        let periods = config.period_count as usize;
        let mut result = GrowthResult::new(config.opening_balance);
        result.rows.reserve_exact(periods);

        let mut state = GrowthState {
            balance: config.opening_balance,
            price_index: 1.0,
        };

        for index in 0..periods {
            let row = self.calculate_period(&mut state, index);
            trace!(
                "period {} contribution={:.4} match={:.4} return={:.4} balance={:.4}",
                row.period_index,
                row.employee_contribution,
                row.employer_contribution,
                row.period_return,
                row.ending_balance
            );
            result.add_row(row);
        }

        result.finalize();
        Ok(result)
    }

    /// Calculate a single period and advance the state
    fn calculate_period(&self, state: &mut GrowthState, index: usize) -> GrowthRow {
        let config = &self.config;
        let mut row = GrowthRow::new(index as u32 + 1);

        let contribution = config.contribution.for_period(index);
        let employer = config.employer_match(&contribution);
        let deposits = contribution.employee + employer;
        let growth = 1.0 + config.periodic_growth_rate;

        let starting = state.balance;
        let ending = match config.growth_basis {
            GrowthBasis::ContributionThenGrow => (starting + deposits) * growth,
            GrowthBasis::GrowThenContribute => starting * growth + deposits,
        };

        if let Some(inflation) = config.periodic_inflation_rate {
            state.price_index *= 1.0 + inflation;
        }
        state.balance = ending;

        row.starting_balance = starting;
        row.employee_contribution = contribution.employee;
        row.employer_contribution = employer;
        row.period_return = ending - starting - contribution.employee - employer;
        row.ending_balance = ending;
        row.real_balance = ending / state.price_index;
        row
    }
}
