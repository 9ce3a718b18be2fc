//! Calculator adapters
//!
//! Each calculator maps its form fields onto `LoanTerms`, `GrowthConfig` or
//! `CompoundInterestConfig` and delegates the period math to the shared engines.

pub mod auto_loan;
pub mod interest;
pub mod mortgage;
pub mod payment;
pub mod retirement;

pub use auto_loan::{AutoLoanInputs, AutoLoanQuote};
pub use interest::InterestComparison;
pub use mortgage::{DownPayment, MortgageInputs, MortgageQuote};
pub use payment::{PaymentInputs, PaymentQuote, PaymentTarget};
pub use retirement::{Retirement401kInputs, RetirementProjection, RetirementSavingsInputs};
