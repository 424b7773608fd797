//! Investment metrics for a single rental or flip candidate.
//!
//! This module turns a [`Property`] into its [`Metrics`] through a fixed
//! sequence of steps. Each step is exposed as its own function so it can be
//! checked in isolation.
//!
//! # Calculation Steps
//!
//! | Step | Quantity | Formula |
//! |------|----------|---------|
//! | 1  | Loan amount | purchase price − down payment |
//! | 2  | Monthly rate `r` | interest % ÷ 12 ÷ 100 |
//! | 3  | Payment count `n` | loan term years × 12 |
//! | 4  | Mortgage payment | `L·r(1+r)ⁿ / ((1+r)ⁿ − 1)`, or `L / n` when `r = 0` |
//! | 5  | Monthly tax and insurance | annual amount ÷ 12 |
//! | 6  | Monthly cost | mortgage + tax + insurance + maintenance |
//! | 7  | Net rent | rent × (1 − vacancy rate) |
//! | 8  | Cash flow | net rent − monthly cost |
//! | 9  | Annual profit | cash flow × 12 |
//! | 10 | Future value | price × (1 + appreciation % ÷ 100)^hold years |
//! | 11 | Appreciation gain | future value − price |
//! | 12 | Total invested | down payment + maintenance × 12 × hold years |
//! | 13 | ROI % | (annual profit × hold years + gain) ÷ total invested × 100 |
//! | 14 | Flip profit | resale − price − rehab |
//!
//! # Degenerate investments
//!
//! When total invested capital is zero the ROI ratio has no value. The
//! [`roi_percent`] step reports [`CalculatorError::DegenerateInvestment`];
//! [`InvestmentCalculator::calculate`] keeps the remaining metrics and
//! leaves [`Metrics::roi_percent`] as `None`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use realty_core::{InvestmentCalculator, Property};
//!
//! let property = Property {
//!     name: "Property A".to_string(),
//!     address: "123 Main St".to_string(),
//!     image: None,
//!     square_footage: dec!(1500),
//!     purchase_price: dec!(200000),
//!     down_payment: dec!(40000),
//!     interest_rate_percent: dec!(6.5),
//!     loan_term_years: 30,
//!     annual_property_tax: dec!(3600),
//!     annual_insurance: dec!(1200),
//!     monthly_maintenance: dec!(150),
//!     vacancy_rate: dec!(0.05),
//!     expected_monthly_rent: dec!(1800),
//!     annual_appreciation_percent: dec!(3.0),
//!     hold_period_years: dec!(5),
//!     rehab_cost: dec!(30000),
//!     target_resale_price: dec!(275000),
//! };
//!
//! let metrics = InvestmentCalculator::calculate(&property).unwrap().rounded();
//!
//! assert_eq!(metrics.monthly_cost, dec!(1561.31));
//! assert_eq!(metrics.net_rent, dec!(1710.00));
//! assert_eq!(metrics.cash_flow, dec!(148.69));
//! assert_eq!(metrics.annual_profit, dec!(1784.29));
//! assert_eq!(metrics.roi_percent, Some(dec!(83.22)));
//! assert_eq!(metrics.flip_profit, dec!(45000.00));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{MONTHS_PER_YEAR, PERCENT};
use crate::{Metrics, Property};

/// Errors that can occur while computing investment metrics.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CalculatorError {
    /// Total invested capital is zero, so ROI is undefined.
    #[error("total invested is zero; ROI is undefined")]
    DegenerateInvestment,

    /// A loan repaid over zero payments has no defined payment.
    #[error("loan term must be at least one year")]
    ZeroLoanTerm,

    /// A negative growth factor cannot be raised to a fractional hold period.
    #[error("appreciation factor {0} cannot be raised to a fractional hold period")]
    UndefinedAppreciation(Decimal),

    /// A decimal operation overflowed in the named step.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

fn checked_u64(value: Decimal) -> Result<u64, CalculatorError> {
    value
        .trunc()
        .to_u64()
        .ok_or(CalculatorError::Overflow("future value"))
}

fn checked(
    value: Option<Decimal>,
    step: &'static str,
) -> Result<Decimal, CalculatorError> {
    value.ok_or(CalculatorError::Overflow(step))
}

/// Stateless calculator mapping one [`Property`] to its [`Metrics`].
///
/// Results depend only on the given property, so a collection can be
/// evaluated in any order.
pub struct InvestmentCalculator;

impl InvestmentCalculator {
    /// Runs every calculation step for `property`.
    ///
    /// A zero total investment is not an error here: the metrics are
    /// returned with `roi_percent` set to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError`] if:
    /// - the loan term is zero
    /// - the appreciation factor is negative and the hold period fractional
    /// - any intermediate value overflows
    pub fn calculate(property: &Property) -> Result<Metrics, CalculatorError> {
        let loan = loan_amount(property.purchase_price, property.down_payment);
        if loan.is_sign_negative() && !loan.is_zero() {
            warn!(
                property = %property.name,
                %loan,
                "down payment exceeds purchase price; loan amount is negative"
            );
        }

        let rate = monthly_rate(property.interest_rate_percent);
        let payments = payment_count(property.loan_term_years);
        let mortgage = mortgage_payment(loan, rate, payments)?;

        let monthly_cost = monthly_cost(
            mortgage,
            property.annual_property_tax,
            property.annual_insurance,
            property.monthly_maintenance,
        )?;
        let net_rent = net_rent(property.expected_monthly_rent, property.vacancy_rate)?;
        let cash_flow = cash_flow(net_rent, monthly_cost)?;
        let annual_profit = annual_profit(cash_flow)?;

        let future_value = future_value(
            property.purchase_price,
            property.annual_appreciation_percent,
            property.hold_period_years,
        )?;
        let appreciation_gain = appreciation_gain(future_value, property.purchase_price)?;
        let total_invested = total_invested(
            property.down_payment,
            property.monthly_maintenance,
            property.hold_period_years,
        )?;

        let roi_percent = match roi_percent(
            annual_profit,
            property.hold_period_years,
            appreciation_gain,
            total_invested,
        ) {
            Ok(roi) => Some(roi),
            Err(CalculatorError::DegenerateInvestment) => {
                warn!(property = %property.name, "nothing invested; ROI is undefined");
                None
            }
            Err(other) => return Err(other),
        };

        let flip_profit = flip_profit(
            property.target_resale_price,
            property.purchase_price,
            property.rehab_cost,
        )?;

        debug!(
            property = %property.name,
            %mortgage,
            %monthly_cost,
            %cash_flow,
            roi = ?roi_percent,
            %flip_profit,
            "computed investment metrics"
        );

        Ok(Metrics {
            monthly_cost,
            net_rent,
            cash_flow,
            annual_profit,
            roi_percent,
            flip_profit,
        })
    }
}

/// Convenience wrapper around [`InvestmentCalculator::calculate`].
pub fn compute_metrics(property: &Property) -> Result<Metrics, CalculatorError> {
    InvestmentCalculator::calculate(property)
}

/// Step 1. May be negative when the down payment exceeds the price.
pub fn loan_amount(
    purchase_price: Decimal,
    down_payment: Decimal,
) -> Decimal {
    purchase_price - down_payment
}

/// Step 2. Monthly interest rate as a fraction.
pub fn monthly_rate(interest_rate_percent: Decimal) -> Decimal {
    interest_rate_percent / MONTHS_PER_YEAR / PERCENT
}

/// Step 3. Number of monthly payments.
pub fn payment_count(loan_term_years: u32) -> u64 {
    u64::from(loan_term_years) * 12
}

/// Step 4. Level monthly payment on an amortizing loan.
///
/// Falls back to straight-line repayment when the rate is zero.
pub fn mortgage_payment(
    loan_amount: Decimal,
    monthly_rate: Decimal,
    payments: u64,
) -> Result<Decimal, CalculatorError> {
    if payments == 0 {
        return Err(CalculatorError::ZeroLoanTerm);
    }

    if monthly_rate.is_zero() {
        return checked(
            loan_amount.checked_div(Decimal::from(payments)),
            "mortgage payment",
        );
    }

    let growth = checked(
        (Decimal::ONE + monthly_rate).checked_powu(payments),
        "mortgage payment",
    )?;
    let numerator = checked(
        monthly_rate
            .checked_mul(growth)
            .and_then(|v| loan_amount.checked_mul(v)),
        "mortgage payment",
    )?;

    checked(
        numerator.checked_div(growth - Decimal::ONE),
        "mortgage payment",
    )
}

/// Steps 5 and 6. Total monthly outgoings.
pub fn monthly_cost(
    mortgage: Decimal,
    annual_property_tax: Decimal,
    annual_insurance: Decimal,
    monthly_maintenance: Decimal,
) -> Result<Decimal, CalculatorError> {
    let tax_monthly = annual_property_tax / MONTHS_PER_YEAR;
    let insurance_monthly = annual_insurance / MONTHS_PER_YEAR;

    checked(
        mortgage
            .checked_add(tax_monthly)
            .and_then(|v| v.checked_add(insurance_monthly))
            .and_then(|v| v.checked_add(monthly_maintenance)),
        "monthly cost",
    )
}

/// Step 7. Rent after the vacancy allowance.
pub fn net_rent(
    expected_monthly_rent: Decimal,
    vacancy_rate: Decimal,
) -> Result<Decimal, CalculatorError> {
    checked(
        expected_monthly_rent.checked_mul(Decimal::ONE - vacancy_rate),
        "net rent",
    )
}

/// Step 8.
pub fn cash_flow(
    net_rent: Decimal,
    monthly_cost: Decimal,
) -> Result<Decimal, CalculatorError> {
    checked(net_rent.checked_sub(monthly_cost), "cash flow")
}

/// Step 9.
pub fn annual_profit(cash_flow: Decimal) -> Result<Decimal, CalculatorError> {
    checked(cash_flow.checked_mul(MONTHS_PER_YEAR), "annual profit")
}

/// Step 10. Compounded value at the end of the hold period.
///
/// Whole-year holds use exact integer powers; fractional holds go through
/// the decimal approximation of `x^y`.
pub fn future_value(
    purchase_price: Decimal,
    annual_appreciation_percent: Decimal,
    hold_period_years: Decimal,
) -> Result<Decimal, CalculatorError> {
    let growth = Decimal::ONE + annual_appreciation_percent / PERCENT;

    let factor = if hold_period_years.fract().is_zero() && !hold_period_years.is_sign_negative() {
        let years = checked_u64(hold_period_years)?;
        checked(growth.checked_powu(years), "future value")?
    } else if growth.is_sign_negative() && !growth.is_zero() {
        return Err(CalculatorError::UndefinedAppreciation(growth));
    } else {
        checked(growth.checked_powd(hold_period_years), "future value")?
    };

    checked(purchase_price.checked_mul(factor), "future value")
}

/// Step 11.
pub fn appreciation_gain(
    future_value: Decimal,
    purchase_price: Decimal,
) -> Result<Decimal, CalculatorError> {
    checked(future_value.checked_sub(purchase_price), "appreciation gain")
}

/// Step 12. Cash put in over the hold period.
pub fn total_invested(
    down_payment: Decimal,
    monthly_maintenance: Decimal,
    hold_period_years: Decimal,
) -> Result<Decimal, CalculatorError> {
    checked(
        monthly_maintenance
            .checked_mul(MONTHS_PER_YEAR)
            .and_then(|v| v.checked_mul(hold_period_years))
            .and_then(|v| down_payment.checked_add(v)),
        "total invested",
    )
}

/// Step 13. Return over the hold period as a percentage.
///
/// # Errors
///
/// [`CalculatorError::DegenerateInvestment`] when `total_invested` is zero.
pub fn roi_percent(
    annual_profit: Decimal,
    hold_period_years: Decimal,
    appreciation_gain: Decimal,
    total_invested: Decimal,
) -> Result<Decimal, CalculatorError> {
    if total_invested.is_zero() {
        return Err(CalculatorError::DegenerateInvestment);
    }

    let total_return = checked(
        annual_profit
            .checked_mul(hold_period_years)
            .and_then(|v| v.checked_add(appreciation_gain)),
        "ROI",
    )?;

    checked(
        total_return
            .checked_div(total_invested)
            .and_then(|v| v.checked_mul(PERCENT)),
        "ROI",
    )
}

/// Step 14. Independent of every financing and rental input.
pub fn flip_profit(
    target_resale_price: Decimal,
    purchase_price: Decimal,
    rehab_cost: Decimal,
) -> Result<Decimal, CalculatorError> {
    checked(
        target_resale_price
            .checked_sub(purchase_price)
            .and_then(|v| v.checked_sub(rehab_cost)),
        "flip profit",
    )
}
