use std::fmt;

use realty_core::{Property, PropertyInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{ParseDecimalError, optional_text, parse_decimal};

/// Every problem found in a submitted form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", .messages.join("; "))]
pub struct FormError {
    pub messages: Vec<String>,
}

/// Property values as typed by a user, before parsing.
///
/// Also the `[defaults]` table of the configuration file; missing keys
/// fall back to [`PropertyForm::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyForm {
    pub name: String,
    pub address: String,
    pub image: String,
    pub square_footage: String,
    pub purchase_price: String,
    pub down_payment: String,
    pub interest_rate_percent: String,
    pub loan_term_years: String,
    pub annual_property_tax: String,
    pub annual_insurance: String,
    pub monthly_maintenance: String,
    pub vacancy_percent: String,
    pub expected_monthly_rent: String,
    pub annual_appreciation_percent: String,
    pub hold_period_years: String,
    pub rehab_cost: String,
    pub target_resale_price: String,
}

impl Default for PropertyForm {
    fn default() -> Self {
        Self {
            name: "Property A".to_string(),
            address: "123 Main St".to_string(),
            image: String::new(),
            square_footage: "1500".to_string(),
            purchase_price: "200000".to_string(),
            down_payment: "40000".to_string(),
            interest_rate_percent: "6.5".to_string(),
            loan_term_years: "30".to_string(),
            annual_property_tax: "3600".to_string(),
            annual_insurance: "1200".to_string(),
            monthly_maintenance: "150".to_string(),
            vacancy_percent: "5".to_string(),
            expected_monthly_rent: "1800".to_string(),
            annual_appreciation_percent: "3.0".to_string(),
            hold_period_years: "5".to_string(),
            rehab_cost: "30000".to_string(),
            target_resale_price: "275000".to_string(),
        }
    }
}

/// Field names in declaration order; messages are reported in this order.
const FIELD_ORDER: [&str; 17] = [
    "name",
    "address",
    "image",
    "square_footage",
    "purchase_price",
    "down_payment",
    "interest_rate_percent",
    "loan_term_years",
    "annual_property_tax",
    "annual_insurance",
    "monthly_maintenance",
    "vacancy_percent",
    "expected_monthly_rent",
    "annual_appreciation_percent",
    "hold_period_years",
    "rehab_cost",
    "target_resale_price",
];

fn field_position(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|f| *f == field)
        .unwrap_or(FIELD_ORDER.len())
}

/// Parses one numeric field, recording a message on failure.
fn parse_field(
    problems: &mut Vec<(&'static str, String)>,
    field: &'static str,
    value: &str,
) -> Decimal {
    match parse_decimal(value) {
        Ok(d) => d,
        Err(ParseDecimalError::Empty) => {
            problems.push((field, format!("{field} is required")));
            Decimal::ZERO
        }
        Err(e) => {
            problems.push((field, format!("{field}: {e}")));
            Decimal::ZERO
        }
    }
}

impl PropertyForm {
    /// Prompt labels paired with the field they edit, in entry order.
    pub fn entries_mut(&mut self) -> [(&'static str, &mut String); 17] {
        [
            ("Property name", &mut self.name),
            ("Address", &mut self.address),
            ("Image URL or path (optional)", &mut self.image),
            ("Square footage", &mut self.square_footage),
            ("Purchase price ($)", &mut self.purchase_price),
            ("Down payment ($)", &mut self.down_payment),
            ("Interest rate (%)", &mut self.interest_rate_percent),
            ("Loan term (years)", &mut self.loan_term_years),
            ("Annual property tax ($)", &mut self.annual_property_tax),
            ("Annual insurance ($)", &mut self.annual_insurance),
            ("Monthly maintenance ($)", &mut self.monthly_maintenance),
            ("Vacancy rate (%, 0-20)", &mut self.vacancy_percent),
            ("Expected monthly rent ($)", &mut self.expected_monthly_rent),
            ("Annual appreciation (%)", &mut self.annual_appreciation_percent),
            ("Hold period (years)", &mut self.hold_period_years),
            ("Rehab cost ($)", &mut self.rehab_cost),
            ("Target resale price ($)", &mut self.target_resale_price),
        ]
    }

    /// Parses and checks every field.
    ///
    /// Rules:
    /// - name is required, image is optional
    /// - every number must parse; `$`, `%` and thousands separators are allowed
    /// - range rules are shared with the CSV loader via [`PropertyInput`]
    ///
    /// A field that fails to parse reports only its parse error.
    pub fn validate(&self) -> Result<Property, FormError> {
        let mut problems = Vec::new();
        let mut num = |field: &'static str, value: &str| parse_field(&mut problems, field, value);

        let input = PropertyInput {
            name: self.name.clone(),
            address: self.address.clone(),
            image: optional_text(&self.image),
            square_footage: num("square_footage", &self.square_footage),
            purchase_price: num("purchase_price", &self.purchase_price),
            down_payment: num("down_payment", &self.down_payment),
            interest_rate_percent: num("interest_rate_percent", &self.interest_rate_percent),
            loan_term_years: num("loan_term_years", &self.loan_term_years),
            annual_property_tax: num("annual_property_tax", &self.annual_property_tax),
            annual_insurance: num("annual_insurance", &self.annual_insurance),
            monthly_maintenance: num("monthly_maintenance", &self.monthly_maintenance),
            vacancy_percent: num("vacancy_percent", &self.vacancy_percent),
            expected_monthly_rent: num("expected_monthly_rent", &self.expected_monthly_rent),
            annual_appreciation_percent: num(
                "annual_appreciation_percent",
                &self.annual_appreciation_percent,
            ),
            hold_period_years: num("hold_period_years", &self.hold_period_years),
            rehab_cost: num("rehab_cost", &self.rehab_cost),
            target_resale_price: num("target_resale_price", &self.target_resale_price),
        };

        let field_errors = match input.into_property() {
            Ok(property) if problems.is_empty() => return Ok(property),
            Ok(_) => Vec::new(),
            Err(errors) => errors,
        };

        let unparsed: Vec<&str> = problems.iter().map(|(field, _)| *field).collect();
        problems.extend(
            field_errors
                .iter()
                .filter(|e| !unparsed.contains(&e.field))
                .map(|e| (e.field, e.to_string())),
        );
        problems.sort_by_key(|(field, _)| field_position(field));

        Err(FormError {
            messages: problems.into_iter().map(|(_, message)| message).collect(),
        })
    }
}

impl fmt::Display for PropertyForm {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut form = self.clone();
        for (label, value) in form.entries_mut() {
            writeln!(f, "{label:<30} {value}")?;
        }
        Ok(())
    }
}
