use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single candidate investment property as entered by the user.
///
/// Values are assumed to have been validated by whichever input layer
/// produced them; the calculator does not re-check ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub address: String,
    /// Image URL or path, carried through to display and export untouched.
    pub image: Option<String>,
    pub square_footage: Decimal,

    // Financing
    pub purchase_price: Decimal,
    pub down_payment: Decimal,
    /// Annual nominal rate, e.g. `6.5` for 6.5%.
    pub interest_rate_percent: Decimal,
    pub loan_term_years: u32,

    // Carrying costs
    pub annual_property_tax: Decimal,
    pub annual_insurance: Decimal,
    pub monthly_maintenance: Decimal,

    // Rental assumptions
    /// Fraction in `[0, 1]`, already divided down from a percentage.
    pub vacancy_rate: Decimal,
    pub expected_monthly_rent: Decimal,
    /// Annual appreciation, e.g. `3.0` for 3%. May be negative.
    pub annual_appreciation_percent: Decimal,
    pub hold_period_years: Decimal,

    // Flip assumptions
    pub rehab_cost: Decimal,
    pub target_resale_price: Decimal,
}
