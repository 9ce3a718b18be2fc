//! Open-ended compounding growth with recurring contributions and employer match

mod config;
mod trajectory;
mod engine;

pub use config::{ContributionPlan, GrowthBasis, GrowthConfig};
pub use trajectory::{GrowthResult, GrowthRow, GrowthYear};
pub use engine::GrowthProjectionEngine;
