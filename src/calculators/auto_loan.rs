//! Auto loan calculator: trade-in, sales tax and fees folded into the financed amount

use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, AmortizationResult, LoanTerms};
use crate::error::{ensure_finite, CalcError, CalcResult};
use crate::rates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoanInputs {
    pub vehicle_price: f64,
    #[serde(default)]
    pub trade_in_value: f64,
    #[serde(default)]
    pub down_payment: f64,
    /// Applied to the price net of trade-in
    #[serde(default)]
    pub sales_tax_percent: f64,
    #[serde(default)]
    pub fees: f64,
    pub annual_rate_percent: f64,
    #[serde(default = "default_term_months")]
    pub term_months: i64,
    /// Roll tax and fees into the loan instead of paying them up front
    #[serde(default = "default_finance_taxes_and_fees")]
    pub finance_taxes_and_fees: bool,
}

fn default_term_months() -> i64 {
    60
}

fn default_finance_taxes_and_fees() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLoanQuote {
    pub sales_tax: f64,
    pub amount_financed: f64,
    /// Cash due at signing: down payment plus any tax and fees not financed
    pub upfront_payment: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    /// Price, tax, fees and interest
    pub total_cost: f64,
    pub schedule: AmortizationResult,
}

pub fn calculate(inputs: &AutoLoanInputs) -> CalcResult<AutoLoanQuote> {
    for (field, value) in [
        ("vehicle_price", inputs.vehicle_price),
        ("trade_in_value", inputs.trade_in_value),
        ("down_payment", inputs.down_payment),
        ("sales_tax_percent", inputs.sales_tax_percent),
        ("fees", inputs.fees),
    ] {
        if ensure_finite(field, value)? < 0.0 {
            return Err(CalcError::input(field, "must be >= 0"));
        }
    }

    let taxable = (inputs.vehicle_price - inputs.trade_in_value).max(0.0);
    let sales_tax = taxable * inputs.sales_tax_percent / 100.0;
    let taxes_and_fees = sales_tax + inputs.fees;

    let mut financed = inputs.vehicle_price - inputs.trade_in_value - inputs.down_payment;
    let mut upfront_payment = inputs.down_payment;
    if inputs.finance_taxes_and_fees {
        financed += taxes_and_fees;
    } else {
        upfront_payment += taxes_and_fees;
    }
    // Trade-in and down payment covering everything leaves nothing to finance
    let amount_financed = financed.max(0.0);

    rates::ensure_term_years("term_months", inputs.term_months as f64 / 12.0)?;
    let terms = LoanTerms::new(amount_financed, inputs.annual_rate_percent, 12, inputs.term_months);
    let schedule = AmortizationEngine::new().generate_for_terms(&terms)?;

    Ok(AutoLoanQuote {
        sales_tax,
        amount_financed,
        upfront_payment,
        monthly_payment: schedule.periodic_payment,
        total_interest: schedule.total_interest,
        total_cost: inputs.vehicle_price + taxes_and_fees + schedule.total_interest,
        schedule,
    })
}
