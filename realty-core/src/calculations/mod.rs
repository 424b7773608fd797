//! Investment calculations.
//!
//! [`investment`] holds the per-property formula sequence; [`comparison`]
//! applies it across a whole collection with per-property failure isolation.

pub mod common;
pub mod comparison;
pub mod investment;

pub use comparison::{ComparisonSummary, PropertyAnalysis, evaluate};
pub use investment::{CalculatorError, InvestmentCalculator, compute_metrics};
