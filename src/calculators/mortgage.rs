//! Mortgage calculator: home price and escrow items on top of a monthly amortizing loan

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, AmortizationResult, LoanTerms};
use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::rates::{self, PaymentFrequency};

/// Down payment as entered: a dollar amount or a percentage of the home price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPayment {
    Amount(f64),
    Percent(f64),
}

impl DownPayment {
    fn resolve(&self, home_price: f64) -> CalcResult<f64> {
        let amount = match *self {
            DownPayment::Amount(amount) => ensure_finite("down_payment", amount)?,
            DownPayment::Percent(pct) => {
                ensure_finite("down_payment_percent", pct)?;
                if !(0.0..=100.0).contains(&pct) {
                    return Err(CalcError::input(
                        "down_payment_percent",
                        "must be between 0 and 100",
                    ));
                }
                home_price * pct / 100.0
            }
        };
        if amount < 0.0 {
            return Err(CalcError::input("down_payment", "must be >= 0"));
        }
        if amount > home_price {
            return Err(CalcError::input("down_payment", "exceeds the home price"));
        }
        Ok(amount)
    }
}

impl Default for DownPayment {
    fn default() -> Self {
        DownPayment::Percent(20.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub home_price: f64,
    #[serde(default)]
    pub down_payment: DownPayment,
    pub annual_rate_percent: f64,
    #[serde(default = "default_term_years")]
    pub term_years: f64,
    #[serde(default)]
    pub annual_property_tax: f64,
    #[serde(default)]
    pub annual_insurance: f64,
    #[serde(default)]
    pub monthly_hoa: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_term_years() -> f64 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageQuote {
    pub loan_amount: f64,
    pub down_payment: f64,
    pub monthly_principal_and_interest: f64,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_hoa: f64,
    /// Principal, interest and escrow items together
    pub total_monthly_payment: f64,
    pub total_interest: f64,
    pub total_of_payments: f64,
    pub payoff_date: Option<NaiveDate>,
    pub schedule: AmortizationResult,
}

pub fn calculate(inputs: &MortgageInputs) -> CalcResult<MortgageQuote> {
    let home_price = ensure_finite("home_price", inputs.home_price)?;
    if home_price < 0.0 {
        return Err(CalcError::input("home_price", "must be >= 0"));
    }
    for (field, value) in [
        ("annual_property_tax", inputs.annual_property_tax),
        ("annual_insurance", inputs.annual_insurance),
        ("monthly_hoa", inputs.monthly_hoa),
    ] {
        if ensure_finite(field, value)? < 0.0 {
            return Err(CalcError::input(field, "must be >= 0"));
        }
    }

    let down_payment = inputs.down_payment.resolve(home_price)?;
    let mut terms = LoanTerms::from_years(
        home_price - down_payment,
        inputs.annual_rate_percent,
        rates::ensure_term_years("term_years", inputs.term_years)?,
        PaymentFrequency::Monthly,
    )?;
    terms.start_date = inputs.start_date;

    let schedule = AmortizationEngine::new().generate_for_terms(&terms)?;

    let monthly_property_tax = inputs.annual_property_tax / 12.0;
    let monthly_insurance = inputs.annual_insurance / 12.0;
    let monthly_pi = schedule.periodic_payment;

    Ok(MortgageQuote {
        loan_amount: terms.principal,
        down_payment,
        monthly_principal_and_interest: monthly_pi,
        monthly_property_tax,
        monthly_insurance,
        monthly_hoa: inputs.monthly_hoa,
        total_monthly_payment: monthly_pi
            + monthly_property_tax
            + monthly_insurance
            + inputs.monthly_hoa,
        total_interest: schedule.total_interest,
        total_of_payments: schedule.total_paid,
        payoff_date: schedule.rows.last().and_then(|r| r.date),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn inputs() -> MortgageInputs {
        MortgageInputs {
            home_price: 250_000.0,
            down_payment: DownPayment::Percent(20.0),
            annual_rate_percent: 6.0,
            term_years: 30.0,
            annual_property_tax: 3000.0,
            annual_insurance: 1200.0,
            monthly_hoa: 50.0,
            start_date: None,
        }
    }

    #[test]
    fn test_standard_mortgage() {
        let quote = calculate(&inputs()).unwrap();

        assert_eq!(quote.down_payment, 50_000.0);
        assert_eq!(quote.loan_amount, 200_000.0);
        assert_abs_diff_eq!(quote.monthly_principal_and_interest, 1199.10, epsilon = 0.01);
        assert_abs_diff_eq!(
            quote.total_monthly_payment,
            1199.10 + 250.0 + 100.0 + 50.0,
            epsilon = 0.01
        );
        assert_eq!(quote.schedule.rows.len(), 360);
        assert_eq!(quote.payoff_date, None);
    }

    #[test]
    fn test_payoff_date() {
        let quote = calculate(&MortgageInputs {
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            term_years: 15.0,
            ..inputs()
        })
        .unwrap();
        assert_eq!(quote.payoff_date, NaiveDate::from_ymd_opt(2040, 6, 1));
    }

    #[test]
    fn test_cash_purchase_needs_no_payment() {
        let quote = calculate(&MortgageInputs {
            down_payment: DownPayment::Amount(250_000.0),
            ..inputs()
        })
        .unwrap();
        assert_eq!(quote.loan_amount, 0.0);
        assert_eq!(quote.monthly_principal_and_interest, 0.0);
        assert_eq!(quote.total_interest, 0.0);
    }

    #[test]
    fn test_down_payment_above_price_rejected() {
        let result = calculate(&MortgageInputs {
            down_payment: DownPayment::Amount(300_000.0),
            ..inputs()
        });
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_term_past_limit_rejected() {
        let result = calculate(&MortgageInputs { term_years: 500.0, ..inputs() });
        assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"home_price": 400000, "annual_rate_percent": 6.5,
            "down_payment": {"amount": 80000}}"#;
        let parsed: MortgageInputs = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.term_years, 30.0);
        assert_eq!(parsed.down_payment, DownPayment::Amount(80_000.0));
        assert_eq!(parsed.annual_property_tax, 0.0);
    }
}
