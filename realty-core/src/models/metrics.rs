use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CalculatorError;
use crate::calculations::common::round_half_up;

/// Investment metrics derived from a [`Property`](crate::Property).
///
/// Values are kept at full precision. Use [`Metrics::rounded`] at the
/// presentation or export boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mortgage payment plus monthly tax, insurance and maintenance.
    pub monthly_cost: Decimal,

    /// Expected rent after the vacancy allowance.
    pub net_rent: Decimal,

    /// Net rent minus monthly cost.
    pub cash_flow: Decimal,

    /// Cash flow over twelve months.
    pub annual_profit: Decimal,

    /// Return over the hold period as a percentage of capital invested.
    /// `None` when nothing was invested and the ratio is undefined.
    pub roi_percent: Option<Decimal>,

    /// Resale price minus purchase price and rehab cost.
    pub flip_profit: Decimal,
}

impl Metrics {
    /// Returns the ROI, or [`CalculatorError::DegenerateInvestment`] when it
    /// could not be defined.
    pub fn roi(&self) -> Result<Decimal, CalculatorError> {
        self.roi_percent
            .ok_or(CalculatorError::DegenerateInvestment)
    }

    /// Whether the ROI is undefined because total invested capital was zero.
    pub fn is_degenerate(&self) -> bool {
        self.roi_percent.is_none()
    }

    /// Copy of these metrics with every field rounded half-up to 2 places.
    pub fn rounded(&self) -> Self {
        Self {
            monthly_cost: round_half_up(self.monthly_cost),
            net_rent: round_half_up(self.net_rent),
            cash_flow: round_half_up(self.cash_flow),
            annual_profit: round_half_up(self.annual_profit),
            roi_percent: self.roi_percent.map(round_half_up),
            flip_profit: round_half_up(self.flip_profit),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> Metrics {
        Metrics {
            monthly_cost: dec!(1561.308837),
            net_rent: dec!(1710.00),
            cash_flow: dec!(148.691162),
            annual_profit: dec!(1784.293948),
            roi_percent: Some(dec!(83.216907)),
            flip_profit: dec!(45000),
        }
    }

    #[test]
    fn rounded_rounds_every_field_to_two_places() {
        let rounded = sample().rounded();

        assert_eq!(rounded.monthly_cost, dec!(1561.31));
        assert_eq!(rounded.net_rent, dec!(1710.00));
        assert_eq!(rounded.cash_flow, dec!(148.69));
        assert_eq!(rounded.annual_profit, dec!(1784.29));
        assert_eq!(rounded.roi_percent, Some(dec!(83.22)));
        assert_eq!(rounded.flip_profit, dec!(45000.00));
    }

    #[test]
    fn rounded_keeps_undefined_roi_undefined() {
        let metrics = Metrics {
            roi_percent: None,
            ..sample()
        };

        assert_eq!(metrics.rounded().roi_percent, None);
    }

    #[test]
    fn roi_returns_value_when_defined() {
        assert_eq!(sample().roi(), Ok(dec!(83.216907)));
    }

    #[test]
    fn roi_signals_degenerate_investment_when_undefined() {
        let metrics = Metrics {
            roi_percent: None,
            ..sample()
        };

        assert_eq!(metrics.roi(), Err(CalculatorError::DegenerateInvestment));
        assert!(metrics.is_degenerate());
    }
}
