//! Scenario runner for batches of calculator requests
//!
//! A scenario file is a JSON document listing calculation requests. Each request names its
//! calculator in a `"calculator"` field; the rest of the object is that calculator's inputs.
//! Requests are independent, so a batch runs in parallel.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, AmortizationResult, LoanTerms};
use crate::calculators::{
    auto_loan, interest, mortgage, payment, retirement, AutoLoanInputs, AutoLoanQuote,
    InterestComparison, MortgageInputs, MortgageQuote, PaymentInputs, PaymentQuote,
    Retirement401kInputs, RetirementProjection, RetirementSavingsInputs,
};
use crate::compound::CompoundInterestConfig;
use crate::error::CalcResult;
use crate::growth::{GrowthConfig, GrowthProjectionEngine, GrowthResult};
use crate::rates;
use crate::summary::ProjectionSummary;

/// One calculation, tagged by calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationRequest {
    Mortgage(MortgageInputs),
    AutoLoan(AutoLoanInputs),
    Payment(PaymentInputs),
    #[serde(rename = "retirement_401k")]
    Retirement401k(Retirement401kInputs),
    Retirement(RetirementSavingsInputs),
    CompoundInterest(CompoundInterestConfig),
    /// Raw loan terms straight into the amortization engine
    Amortization(LoanTerms),
    /// Raw growth configuration straight into the growth engine
    Growth(GrowthConfig),
}

impl CalculationRequest {
    pub fn calculator_name(&self) -> &'static str {
        match self {
            CalculationRequest::Mortgage(_) => "mortgage",
            CalculationRequest::AutoLoan(_) => "auto_loan",
            CalculationRequest::Payment(_) => "payment",
            CalculationRequest::Retirement401k(_) => "retirement_401k",
            CalculationRequest::Retirement(_) => "retirement",
            CalculationRequest::CompoundInterest(_) => "compound_interest",
            CalculationRequest::Amortization(_) => "amortization",
            CalculationRequest::Growth(_) => "growth",
        }
    }
}

/// Result of one calculation, tagged like the request that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationOutcome {
    Mortgage(MortgageQuote),
    AutoLoan(AutoLoanQuote),
    Payment(PaymentQuote),
    #[serde(rename = "retirement_401k")]
    Retirement401k(RetirementProjection),
    Retirement(RetirementProjection),
    CompoundInterest(InterestComparison),
    Amortization(AmortizationResult),
    Growth(GrowthResult),
}

impl CalculationOutcome {
    /// Ledger totals; None for the closed-form interest calculator, which has no ledger
    pub fn summary(&self) -> Option<ProjectionSummary> {
        match self {
            CalculationOutcome::Mortgage(q) => Some(q.schedule.summary()),
            CalculationOutcome::AutoLoan(q) => Some(q.schedule.summary()),
            CalculationOutcome::Payment(q) => Some(q.schedule.summary()),
            CalculationOutcome::Retirement401k(p) | CalculationOutcome::Retirement(p) => {
                Some(p.trajectory.summary())
            }
            CalculationOutcome::CompoundInterest(_) => None,
            CalculationOutcome::Amortization(r) => Some(r.summary()),
            CalculationOutcome::Growth(r) => Some(r.summary()),
        }
    }

    /// Amortization schedule behind a loan outcome
    pub fn amortization(&self) -> Option<&AmortizationResult> {
        match self {
            CalculationOutcome::Mortgage(q) => Some(&q.schedule),
            CalculationOutcome::AutoLoan(q) => Some(&q.schedule),
            CalculationOutcome::Payment(q) => Some(&q.schedule),
            CalculationOutcome::Amortization(r) => Some(r),
            _ => None,
        }
    }

    /// Growth trajectory behind a savings outcome
    pub fn growth(&self) -> Option<&GrowthResult> {
        match self {
            CalculationOutcome::Retirement401k(p) | CalculationOutcome::Retirement(p) => {
                Some(&p.trajectory)
            }
            CalculationOutcome::Growth(r) => Some(r),
            _ => None,
        }
    }
}

/// A named batch of requests loaded from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    pub requests: Vec<CalculationRequest>,
}

impl ScenarioFile {
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> CalcResult<Self> {
        let json = fs::read_to_string(path)?;
        let scenario = Self::from_json(&json)?;
        info!(
            "Loaded scenario {:?} with {} requests from {}",
            scenario.name.as_deref().unwrap_or("unnamed"),
            scenario.requests.len(),
            path.display()
        );
        Ok(scenario)
    }
}

/// Dispatches requests to the calculator adapters and engines
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    amortization: AmortizationEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a single calculation
    pub fn run(&self, request: &CalculationRequest) -> CalcResult<CalculationOutcome> {
        debug!("Running {} calculation", request.calculator_name());
        let outcome = match request {
            CalculationRequest::Mortgage(inputs) => {
                CalculationOutcome::Mortgage(mortgage::calculate(inputs)?)
            }
            CalculationRequest::AutoLoan(inputs) => {
                CalculationOutcome::AutoLoan(auto_loan::calculate(inputs)?)
            }
            CalculationRequest::Payment(inputs) => {
                CalculationOutcome::Payment(payment::calculate(inputs)?)
            }
            CalculationRequest::Retirement401k(inputs) => {
                CalculationOutcome::Retirement401k(retirement::calculate_401k(inputs)?)
            }
            CalculationRequest::Retirement(inputs) => {
                CalculationOutcome::Retirement(retirement::calculate_savings(inputs)?)
            }
            CalculationRequest::CompoundInterest(config) => {
                CalculationOutcome::CompoundInterest(interest::calculate(config)?)
            }
            CalculationRequest::Amortization(terms) => {
                rates::ensure_schedule_periods("term_periods", terms.term_periods)?;
                CalculationOutcome::Amortization(self.amortization.generate_for_terms(terms)?)
            }
            CalculationRequest::Growth(config) => {
                rates::ensure_schedule_periods("period_count", config.period_count)?;
                CalculationOutcome::Growth(GrowthProjectionEngine::new(config.clone()).project()?)
            }
        };
        Ok(outcome)
    }

    /// Run every request in parallel; results keep the request order
    pub fn run_batch(
        &self,
        requests: &[CalculationRequest],
    ) -> Vec<CalcResult<CalculationOutcome>> {
        let results: Vec<_> = requests.par_iter().map(|request| self.run(request)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!("{} of {} calculations failed", failed, results.len());
        }
        results
    }

    pub fn run_file(&self, scenario: &ScenarioFile) -> Vec<CalcResult<CalculationOutcome>> {
        self.run_batch(&scenario.requests)
    }
}

/// Serializable per-request result for JSON reports
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Ok(CalculationOutcome),
    Err { calculator: &'static str, error: String },
}

impl ReportEntry {
    pub fn new(request: &CalculationRequest, result: CalcResult<CalculationOutcome>) -> Self {
        match result {
            Ok(outcome) => ReportEntry::Ok(outcome),
            Err(e) => ReportEntry::Err {
                calculator: request.calculator_name(),
                error: e.to_string(),
            },
        }
    }
}

/// Pair each request with its result for reporting
pub fn report(
    requests: &[CalculationRequest],
    results: Vec<CalcResult<CalculationOutcome>>,
) -> Vec<ReportEntry> {
    requests
        .iter()
        .zip(results)
        .map(|(request, result)| ReportEntry::new(request, result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use approx::assert_abs_diff_eq;

    const SCENARIO: &str = r#"{
        "name": "household",
        "requests": [
            {"calculator": "mortgage", "home_price": 250000, "annual_rate_percent": 6.0,
             "annual_property_tax": 3000, "annual_insurance": 1200},
            {"calculator": "auto_loan", "vehicle_price": 30000, "annual_rate_percent": 5.0},
            {"calculator": "payment", "principal": 20000, "annual_rate_percent": 7.0,
             "target": {"term_years": 5}},
            {"calculator": "retirement_401k", "annual_salary": 60000, "contribution_percent": 6,
             "employer_match_percent": 50, "employer_match_cap_percent": 6,
             "annual_return_percent": 7, "years": 30},
            {"calculator": "retirement", "monthly_contribution": 500, "annual_return_percent": 6,
             "annual_inflation_percent": 2.5, "years": 25},
            {"calculator": "compound_interest", "principal": 1000, "annual_rate_percent": 5,
             "years": 1, "compounds_per_year": 12},
            {"calculator": "amortization", "principal": 12000, "annual_rate_percent": 0,
             "periods_per_year": 12, "term_periods": 12, "start_date": "2025-01-01"},
            {"calculator": "growth", "opening_balance": 0,
             "contribution": {"type": "flat", "amount": 100},
             "employer_match_percent": 50, "periodic_growth_rate": 0, "period_count": 10}
        ]
    }"#;

    #[test]
    fn test_parse_every_calculator() {
        let scenario = ScenarioFile::from_json(SCENARIO).unwrap();
        assert_eq!(scenario.name.as_deref(), Some("household"));

        let names: Vec<_> = scenario.requests.iter().map(|r| r.calculator_name()).collect();
        assert_eq!(
            names,
            [
                "mortgage",
                "auto_loan",
                "payment",
                "retirement_401k",
                "retirement",
                "compound_interest",
                "amortization",
                "growth"
            ]
        );
    }

    #[test]
    fn test_run_batch_keeps_order() {
        let scenario = ScenarioFile::from_json(SCENARIO).unwrap();
        let runner = ScenarioRunner::new();
        let results = runner.run_file(&scenario);

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_ok()));

        match results[0].as_ref().unwrap() {
            CalculationOutcome::Mortgage(q) => {
                assert_abs_diff_eq!(q.monthly_principal_and_interest, 1199.10, epsilon = 0.01)
            }
            other => panic!("unexpected outcome {:?}", other.summary()),
        }
        match results[7].as_ref().unwrap() {
            CalculationOutcome::Growth(r) => assert_eq!(r.final_balance, 1500.0),
            other => panic!("unexpected outcome {:?}", other.summary()),
        }

        let amortization = results[6].as_ref().unwrap().amortization().unwrap();
        assert_eq!(amortization.periodic_payment, 1000.0);
        assert!(results[5].as_ref().unwrap().summary().is_none());
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let scenario = ScenarioFile::from_json(SCENARIO).unwrap();
        let runner = ScenarioRunner::new();
        let parallel = runner.run_batch(&scenario.requests);
        let sequential: Vec<_> = scenario.requests.iter().map(|r| runner.run(r)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_failures_are_reported_per_request() {
        let requests = vec![
            CalculationRequest::Amortization(LoanTerms::new(1000.0, 5.0, 12, -12)),
            CalculationRequest::Amortization(LoanTerms::default()),
        ];
        let runner = ScenarioRunner::new();
        let results = runner.run_batch(&requests);
        assert!(matches!(results[0], Err(CalcError::InvalidTerm { .. })));
        assert!(results[1].is_ok());

        let entries = report(&requests, results);
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["calculator"], "amortization");
        assert!(json[0]["error"].as_str().unwrap().contains("term"));
        assert_eq!(json[1]["calculator"], "amortization");
        assert!(json[1]["rows"].is_array());
    }

    #[test]
    fn test_oversized_requests_fail_alone() {
        let scenario = ScenarioFile::from_json(
            r#"{"requests": [
                {"calculator": "amortization", "principal": 1000, "annual_rate_percent": 5,
                 "periods_per_year": 12, "term_periods": 3000000000},
                {"calculator": "compound_interest", "principal": 1000, "annual_rate_percent": 5,
                 "years": 3000000000, "compounds_per_year": 12},
                {"calculator": "growth", "opening_balance": 0,
                 "contribution": {"type": "flat", "amount": 100},
                 "periodic_growth_rate": 0, "period_count": 3000000000},
                {"calculator": "mortgage", "home_price": 250000, "annual_rate_percent": 6.0,
                 "term_years": 3000000000},
                {"calculator": "payment", "principal": 20000, "annual_rate_percent": 7.0,
                 "target": {"term_years": 5}}
            ]}"#,
        )
        .unwrap();
        let results = ScenarioRunner::new().run_file(&scenario);

        assert_eq!(results.len(), 5);
        for result in &results[..4] {
            assert!(matches!(result, Err(CalcError::InvalidInput { .. })));
        }
        assert!(results[4].is_ok());
    }

    #[test]
    fn test_unknown_calculator_rejected() {
        let err =
            ScenarioFile::from_json(r#"{"requests": [{"calculator": "lottery"}]}"#).unwrap_err();
        assert!(matches!(err, CalcError::Serialization(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ScenarioFile::from_path(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, CalcError::Io(_)));
    }
}
