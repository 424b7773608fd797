pub mod calculations;
pub mod models;
pub mod validation;

pub use calculations::{
    CalculatorError, ComparisonSummary, InvestmentCalculator, PropertyAnalysis, compute_metrics,
    evaluate,
};
pub use models::*;
pub use validation::{FieldError, FieldErrorKind, PropertyInput};
