//! Rate math: nominal-to-periodic conversions and the annuity payment formula
//!
//! All rates returned here are decimal fractions (0.005 = 0.5% per period).
//! Inputs named `*_percent` are percentages as typed into a calculator form.

mod frequency;

pub use frequency::{CalendarStep, PaymentFrequency};

use crate::error::{checked_div, ensure_finite, CalcError, CalcResult};

/// Schedules longer than this are logged; callers usually cap interactive terms well below it
pub const LONG_SCHEDULE_WARN_PERIODS: i64 = 6000;

/// Longest horizon a calculator accepts
pub const MAX_TERM_YEARS: i64 = 100;

/// Most rows a calculator will materialize: a `MAX_TERM_YEARS` term of daily periods
pub const MAX_SCHEDULE_PERIODS: i64 = MAX_TERM_YEARS * 365;

/// Caller-side bound on a period count before an engine builds its rows.
/// The engines themselves accept any count memory allows.
pub fn ensure_schedule_periods(field: &str, periods: i64) -> CalcResult<i64> {
    if periods > MAX_SCHEDULE_PERIODS {
        return Err(CalcError::input(
            field,
            format!("{} periods exceeds the limit of {}", periods, MAX_SCHEDULE_PERIODS),
        ));
    }
    Ok(periods)
}

/// Caller-side bound on a horizon given in years
pub fn ensure_term_years(field: &str, years: f64) -> CalcResult<f64> {
    ensure_finite(field, years)?;
    if years > MAX_TERM_YEARS as f64 {
        return Err(CalcError::input(field, format!("must be at most {} years", MAX_TERM_YEARS)));
    }
    Ok(years)
}

/// Periodic rate from a nominal annual percentage: `(annual / 100) / periods_per_year`
pub fn periodic_rate(annual_rate_percent: f64, periods_per_year: u32) -> CalcResult<f64> {
    ensure_finite("annual_rate_percent", annual_rate_percent)?;
    if periods_per_year == 0 {
        return Err(CalcError::term("periods_per_year", periods_per_year));
    }
    Ok(annual_rate_percent / 100.0 / periods_per_year as f64)
}

/// Number of whole periods in a term of `years`, rounded to the nearest period
pub fn periods_for_years(years: f64, periods_per_year: u32) -> CalcResult<i64> {
    ensure_finite("years", years)?;
    if periods_per_year == 0 {
        return Err(CalcError::term("periods_per_year", periods_per_year));
    }
    let periods = (years * periods_per_year as f64).round();
    if periods <= 0.0 {
        return Err(CalcError::term("years", years));
    }
    Ok(periods as i64)
}

/// Fixed payment that fully amortizes `principal` over `period_count` periods.
///
/// * `period_count <= 0` fails with `InvalidTerm`
/// * `principal <= 0` needs no payment and returns 0
/// * a zero rate is straight-line: `principal / period_count`
/// * otherwise `P·r·(1+r)^n / ((1+r)^n − 1)`
///
/// The annuity branch is evaluated as `P·r / (1 − (1+r)^−n)` through `ln_1p`/`exp_m1`,
/// which keeps the denominator away from catastrophic cancellation for tiny rates
/// and from overflow for long terms at high rates.
pub fn periodic_payment(principal: f64, periodic_rate: f64, period_count: i64) -> CalcResult<f64> {
    ensure_finite("principal", principal)?;
    ensure_finite("periodic_rate", periodic_rate)?;
    if period_count <= 0 {
        return Err(CalcError::term("period_count", period_count as f64));
    }
    if periodic_rate <= -1.0 {
        return Err(CalcError::rate("periodic_rate", periodic_rate));
    }
    if principal <= 0.0 {
        return Ok(0.0);
    }

    let n = period_count as f64;
    if periodic_rate == 0.0 {
        return checked_div(principal, n, "straight-line payment");
    }

    let discount = -(-n * periodic_rate.ln_1p()).exp_m1();
    checked_div(principal * periodic_rate, discount, "annuity factor")
}

/// Growth factor `(1 + r)^n` for a whole number of periods
pub fn growth_factor(periodic_rate: f64, periods: u32) -> f64 {
    (periods as f64 * periodic_rate.ln_1p()).exp()
}

/// Effective annual rate of a nominal annual percentage compounded `compounds_per_year` times
pub fn effective_annual_rate(annual_rate_percent: f64, compounds_per_year: u32) -> CalcResult<f64> {
    let r = periodic_rate(annual_rate_percent, compounds_per_year)?;
    if r < -1.0 {
        return Err(CalcError::rate("annual_rate_percent", annual_rate_percent));
    }
    Ok((compounds_per_year as f64 * r.ln_1p()).exp_m1())
}

/// Per-period rate equivalent to an effective annual percentage: `(1 + a)^(1/p) − 1`
pub fn periodic_growth_rate(annual_rate_percent: f64, periods_per_year: u32) -> CalcResult<f64> {
    ensure_finite("annual_rate_percent", annual_rate_percent)?;
    if periods_per_year == 0 {
        return Err(CalcError::term("periods_per_year", periods_per_year));
    }
    let annual = annual_rate_percent / 100.0;
    if annual < -1.0 {
        return Err(CalcError::rate("annual_rate_percent", annual_rate_percent));
    }
    Ok((annual.ln_1p() / periods_per_year as f64).exp_m1())
}

/// Fisher real rate for a nominal and an inflation rate of the same period:
/// `(1+n)/(1+i) − 1`
pub fn real_rate(nominal_rate: f64, inflation_rate: f64) -> CalcResult<f64> {
    ensure_finite("nominal_rate", nominal_rate)?;
    ensure_finite("inflation_rate", inflation_rate)?;
    if inflation_rate <= -1.0 {
        return Err(CalcError::rate("inflation_rate", inflation_rate));
    }
    Ok((1.0 + nominal_rate) / (1.0 + inflation_rate) - 1.0)
}
