//! Shared helpers for the investment calculations.
//!
//! Rounding lives here so that every presentation and export path applies
//! the same convention.

use rust_decimal::Decimal;

/// Months in a year, used to convert annual figures to monthly ones.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Divisor that turns a percentage into a fraction.
pub const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the usual
/// convention for displaying money.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use realty_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1011.3088)), dec!(1011.31));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a value as a currency amount with thousands separators and two
/// decimal places, e.g. `-1234.5` becomes `-$1,234.50`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(rounded.abs()))
}

/// Formats a percentage with two decimal places, e.g. `83.2169` becomes `83.22%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_half_up(value))
}

fn group_thousands(value: Decimal) -> String {
    let text = format!("{value:.2}");
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{grouped}.{fraction}")
}
