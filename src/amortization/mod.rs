//! Fixed-term amortizing loans: terms, schedule generation and schedule output

mod terms;
mod schedule;
mod engine;

pub use terms::LoanTerms;
pub use schedule::{AmortizationRow, AmortizationResult, YearlyTotals};
pub use engine::{AmortizationEngine, ScheduleDating};
