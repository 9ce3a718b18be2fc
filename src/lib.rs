//! fincalc - Periodic financial projection engine for loan, savings and interest calculators
//!
//! This library provides:
//! - Level-payment derivation and period-by-period loan amortization
//! - Contribution-and-growth projections with employer match and inflation
//! - Closed-form compound and simple interest
//! - Thin calculator adapters (mortgage, auto loan, payment, 401(k), retirement, interest)
//! - Batch scenario runs and CSV/JSON export

pub mod error;
pub mod rates;
pub mod summary;
pub mod amortization;
pub mod growth;
pub mod compound;
pub mod calculators;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use rates::PaymentFrequency;
pub use summary::{LedgerKind, LedgerRow, ProjectionSummarizer, ProjectionSummary};
pub use amortization::{AmortizationEngine, AmortizationResult, AmortizationRow, LoanTerms};
pub use growth::{
    ContributionPlan, GrowthBasis, GrowthConfig, GrowthProjectionEngine, GrowthResult, GrowthRow,
};
pub use compound::{
    CompoundInterestConfig, CompoundInterestEngine, CompoundInterestResult, SimpleInterestResult,
};
pub use scenario::{CalculationOutcome, CalculationRequest, ScenarioFile, ScenarioRunner};
