//! Randomized reconciliation of growth projections:
//! final balance == opening + employee + employer contributions + returns

use proptest::prelude::*;

use fincalc::{ContributionPlan, GrowthBasis, GrowthConfig, GrowthProjectionEngine};

fn basis() -> impl Strategy<Value = GrowthBasis> {
    prop_oneof![Just(GrowthBasis::ContributionThenGrow), Just(GrowthBasis::GrowThenContribute)]
}

fn flat_config() -> impl Strategy<Value = GrowthConfig> {
    (
        0.0..1_000_000.0f64,
        0.0..5_000.0f64,
        0.0..200.0f64,
        -0.05..0.05f64,
        0i64..600,
        basis(),
        proptest::option::of(0.0..0.01f64),
    )
        .prop_map(|(opening, contribution, match_pct, rate, periods, basis, inflation)| {
            let config = GrowthConfig::new(opening, contribution, rate, periods, basis)
                .with_employer_match(match_pct, None);
            match inflation {
                Some(i) => config.with_inflation(i),
                None => config,
            }
        })
}

fn salary_config() -> impl Strategy<Value = GrowthConfig> {
    (
        0.0..500_000.0f64,
        10_000.0..400_000.0f64,
        0.0..25.0f64,
        0.0..150.0f64,
        proptest::option::of(0.0..10.0f64),
        -0.02..0.02f64,
        0u32..40,
        basis(),
    )
        .prop_map(|(opening, salary, deferral, match_pct, cap, rate, years, basis)| {
            let bases: Vec<f64> = (0..years as usize * 12)
                .map(|k| salary / 12.0 * 1.03f64.powi((k / 12) as i32))
                .collect();
            GrowthConfig::new(opening, 0.0, rate, i64::from(years) * 12, basis)
                .with_contribution(ContributionPlan::PercentOfBase { percent: deferral, bases })
                .with_employer_match(match_pct, cap)
        })
}

fn assert_reconciles(config: GrowthConfig) -> Result<(), TestCaseError> {
    let result = GrowthProjectionEngine::new(config.clone())
        .project()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;

    let reconstructed = config.opening_balance
        + result.total_employee_contributions
        + result.total_employer_contributions
        + result.total_returns;
    let invested = config.opening_balance
        + result.total_employee_contributions
        + result.total_employer_contributions;
    let scale = result
        .final_balance
        .abs()
        .max(result.total_returns.abs())
        .max(invested)
        .max(1.0);

    prop_assert!(
        (result.final_balance - reconstructed).abs() <= 1e-9 * scale,
        "final {} vs reconstructed {}",
        result.final_balance,
        reconstructed
    );
    prop_assert_eq!(result.rows.len() as i64, config.period_count);
    prop_assert!(result
        .rows
        .iter()
        .all(|r| r.ending_balance.is_finite() && r.ending_balance >= 0.0));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_flat_contributions_reconcile(config in flat_config()) {
        assert_reconciles(config)?;
    }

    #[test]
    fn prop_salary_contributions_reconcile(config in salary_config()) {
        assert_reconciles(config)?;
    }
}
