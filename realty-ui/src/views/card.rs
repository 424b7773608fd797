use std::fmt;

use realty_core::calculations::common::{format_currency, format_percent};
use realty_core::{Metrics, PropertyAnalysis};

/// What a card shows beneath the property's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody {
    /// Metrics rounded to cents.
    Metrics(Metrics),
    /// Reason the metrics could not be computed.
    Failed(String),
}

/// Per-property summary shown above the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub name: String,
    pub address: String,
    pub image: Option<String>,
    pub body: CardBody,
}

impl SummaryCard {
    pub fn from_analysis(analysis: &PropertyAnalysis<'_>) -> Self {
        let property = analysis.property;
        let body = match &analysis.outcome {
            Ok(metrics) => CardBody::Metrics(metrics.rounded()),
            Err(e) => CardBody::Failed(e.to_string()),
        };

        Self {
            name: property.name.clone(),
            address: property.address.clone(),
            image: property.image.clone(),
            body,
        }
    }
}

impl fmt::Display for SummaryCard {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  {}", self.address)?;
        if let Some(image) = &self.image {
            writeln!(f, "  Image: {image}")?;
        }

        match &self.body {
            CardBody::Metrics(m) => {
                writeln!(f, "  Monthly Cost:  {}", format_currency(m.monthly_cost))?;
                writeln!(f, "  Net Rent:      {}", format_currency(m.net_rent))?;
                writeln!(f, "  Cash Flow:     {}", format_currency(m.cash_flow))?;
                writeln!(f, "  Annual Profit: {}", format_currency(m.annual_profit))?;
                match m.roi_percent {
                    Some(roi) => writeln!(f, "  ROI:           {}", format_percent(roi))?,
                    None => writeln!(f, "  ROI:           n/a (nothing invested)")?,
                }
                write!(f, "  Flip Profit:   {}", format_currency(m.flip_profit))
            }
            CardBody::Failed(reason) => write!(f, "  cannot compute: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use realty_core::{Property, PropertyCollection, evaluate};
    use rust_decimal_macros::dec;

    use super::*;

    fn test_property() -> Property {
        Property {
            name: "Property A".to_string(),
            address: "123 Main St".to_string(),
            image: None,
            square_footage: dec!(1500),
            purchase_price: dec!(200000),
            down_payment: dec!(40000),
            interest_rate_percent: dec!(6.5),
            loan_term_years: 30,
            annual_property_tax: dec!(3600),
            annual_insurance: dec!(1200),
            monthly_maintenance: dec!(150),
            vacancy_rate: dec!(0.05),
            expected_monthly_rent: dec!(1800),
            annual_appreciation_percent: dec!(3.0),
            hold_period_years: dec!(5),
            rehab_cost: dec!(30000),
            target_resale_price: dec!(275000),
        }
    }

    fn card_for(property: Property) -> String {
        let collection: PropertyCollection = std::iter::once(property).collect();
        let analyses = evaluate(&collection);
        SummaryCard::from_analysis(&analyses[0]).to_string()
    }

    #[test]
    fn card_shows_rounded_currency_metrics() {
        let text = card_for(test_property());

        assert_eq!(
            text,
            "Property A\n\
             \x20 123 Main St\n\
             \x20 Monthly Cost:  $1,561.31\n\
             \x20 Net Rent:      $1,710.00\n\
             \x20 Cash Flow:     $148.69\n\
             \x20 Annual Profit: $1,784.29\n\
             \x20 ROI:           83.22%\n\
             \x20 Flip Profit:   $45,000.00"
        );
    }

    #[test]
    fn card_includes_image_reference_when_present() {
        let text = card_for(Property {
            image: Some("photos/a.jpg".to_string()),
            ..test_property()
        });

        assert!(text.contains("\n  Image: photos/a.jpg\n"));
    }

    #[test]
    fn card_marks_degenerate_roi() {
        let text = card_for(Property {
            down_payment: dec!(0),
            monthly_maintenance: dec!(0),
            ..test_property()
        });

        assert!(text.contains("ROI:           n/a (nothing invested)"));
        assert!(text.contains("Flip Profit:   $45,000.00"));
    }

    #[test]
    fn card_reports_failed_property() {
        let text = card_for(Property {
            loan_term_years: 0,
            ..test_property()
        });

        assert!(text.ends_with("  cannot compute: loan term must be at least one year"));
        assert!(!text.contains("Monthly Cost"));
    }

    #[test]
    fn card_formats_negative_cash_flow() {
        let text = card_for(Property {
            expected_monthly_rent: dec!(1000),
            ..test_property()
        });

        assert!(text.contains("Cash Flow:     -$611.31"));
    }
}
