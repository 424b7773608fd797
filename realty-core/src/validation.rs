//! Input rules applied before a [`Property`] is constructed.
//!
//! Both the interactive form and the CSV loader gather raw values into a
//! [`PropertyInput`] and call [`PropertyInput::into_property`], so every
//! entry path rejects the same things. All problems are reported at once.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Property;
use crate::calculations::common::PERCENT;

/// Highest vacancy percentage accepted at the input boundary.
pub const MAX_VACANCY_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Negative(Decimal),
    NotPositive(Decimal),
    NotWholeNumber(Decimal),
    OutOfRange {
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
}

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(
        field: &'static str,
        kind: FieldErrorKind,
    ) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::Negative(v) => {
                write!(f, "{} must not be negative, got {v}", self.field)
            }
            FieldErrorKind::NotPositive(v) => {
                write!(f, "{} must be greater than zero, got {v}", self.field)
            }
            FieldErrorKind::NotWholeNumber(v) => {
                write!(f, "{} must be a whole number, got {v}", self.field)
            }
            FieldErrorKind::OutOfRange { value, min, max } => write!(
                f,
                "{} must be between {min} and {max}, got {value}",
                self.field
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Raw values for one property, before range checks.
///
/// Vacancy is a percentage here and the loan term may still carry a
/// fractional part; both are normalised by [`PropertyInput::into_property`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub name: String,
    pub address: String,
    pub image: Option<String>,
    pub square_footage: Decimal,
    pub purchase_price: Decimal,
    pub down_payment: Decimal,
    pub interest_rate_percent: Decimal,
    pub loan_term_years: Decimal,
    pub annual_property_tax: Decimal,
    pub annual_insurance: Decimal,
    pub monthly_maintenance: Decimal,
    pub vacancy_percent: Decimal,
    pub expected_monthly_rent: Decimal,
    pub annual_appreciation_percent: Decimal,
    pub hold_period_years: Decimal,
    pub rehab_cost: Decimal,
    pub target_resale_price: Decimal,
}

impl PropertyInput {
    /// Checks every field and builds the [`Property`].
    ///
    /// A down payment above the purchase price is allowed and only logged.
    ///
    /// # Errors
    ///
    /// Every rejected field, in declaration order.
    pub fn into_property(self) -> Result<Property, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", FieldErrorKind::Required));
        }

        positive(&mut errors, "square_footage", self.square_footage);
        non_negative(&mut errors, "purchase_price", self.purchase_price);
        non_negative(&mut errors, "down_payment", self.down_payment);
        non_negative(
            &mut errors,
            "interest_rate_percent",
            self.interest_rate_percent,
        );
        let loan_term_years = whole_years(&mut errors, "loan_term_years", self.loan_term_years);
        non_negative(&mut errors, "annual_property_tax", self.annual_property_tax);
        non_negative(&mut errors, "annual_insurance", self.annual_insurance);
        non_negative(&mut errors, "monthly_maintenance", self.monthly_maintenance);
        in_range(
            &mut errors,
            "vacancy_percent",
            self.vacancy_percent,
            Decimal::ZERO,
            MAX_VACANCY_PERCENT,
        );
        non_negative(
            &mut errors,
            "expected_monthly_rent",
            self.expected_monthly_rent,
        );
        positive(&mut errors, "hold_period_years", self.hold_period_years);
        non_negative(&mut errors, "rehab_cost", self.rehab_cost);
        non_negative(&mut errors, "target_resale_price", self.target_resale_price);

        let Some(loan_term_years) = loan_term_years.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        if self.down_payment > self.purchase_price {
            warn!(
                property = %self.name,
                down_payment = %self.down_payment,
                purchase_price = %self.purchase_price,
                "down payment exceeds purchase price"
            );
        }

        Ok(Property {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            image: self
                .image
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            square_footage: self.square_footage,
            purchase_price: self.purchase_price,
            down_payment: self.down_payment,
            interest_rate_percent: self.interest_rate_percent,
            loan_term_years,
            annual_property_tax: self.annual_property_tax,
            annual_insurance: self.annual_insurance,
            monthly_maintenance: self.monthly_maintenance,
            vacancy_rate: self.vacancy_percent / PERCENT,
            expected_monthly_rent: self.expected_monthly_rent,
            annual_appreciation_percent: self.annual_appreciation_percent,
            hold_period_years: self.hold_period_years,
            rehab_cost: self.rehab_cost,
            target_resale_price: self.target_resale_price,
        })
    }
}

fn non_negative(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Decimal,
) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(FieldError::new(field, FieldErrorKind::Negative(value)));
    }
}

fn positive(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Decimal,
) {
    if value <= Decimal::ZERO {
        errors.push(FieldError::new(field, FieldErrorKind::NotPositive(value)));
    }
}

fn in_range(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) {
    if value < min || value > max {
        errors.push(FieldError::new(
            field,
            FieldErrorKind::OutOfRange { value, min, max },
        ));
    }
}

fn whole_years(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Decimal,
) -> Option<u32> {
    if !value.fract().is_zero() {
        errors.push(FieldError::new(field, FieldErrorKind::NotWholeNumber(value)));
        return None;
    }
    if value <= Decimal::ZERO {
        errors.push(FieldError::new(field, FieldErrorKind::NotPositive(value)));
        return None;
    }
    let years = value.to_u32();
    if years.is_none() {
        errors.push(FieldError::new(
            field,
            FieldErrorKind::OutOfRange {
                value,
                min: Decimal::ONE,
                max: Decimal::from(u32::MAX),
            },
        ));
    }
    years
}
