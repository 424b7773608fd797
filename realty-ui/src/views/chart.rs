//! ROI bar chart: property names on the category axis, ROI on the value axis.

use std::fmt::Write;

use realty_core::PropertyAnalysis;
use realty_core::calculations::common::{format_percent, round_half_up};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const BAR: char = '█';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiBar {
    pub name: String,
    pub roi_percent: Decimal,
}

/// A property left off the chart and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedEntry {
    pub name: String,
    pub reason: &'static str,
}

/// Chart data, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiChart {
    pub title: String,
    pub bars: Vec<RoiBar>,
    pub excluded: Vec<ExcludedEntry>,
}

impl RoiChart {
    /// One bar per property with a defined ROI, in collection order.
    pub fn from_analyses(
        title: &str,
        analyses: &[PropertyAnalysis<'_>],
    ) -> Self {
        let mut bars = Vec::new();
        let mut excluded = Vec::new();

        for analysis in analyses {
            let name = analysis.property.name.clone();
            match (&analysis.outcome, analysis.roi_percent()) {
                (_, Some(roi)) => bars.push(RoiBar {
                    name,
                    roi_percent: round_half_up(roi),
                }),
                (Ok(_), None) => excluded.push(ExcludedEntry {
                    name,
                    reason: "ROI undefined",
                }),
                (Err(_), None) => excluded.push(ExcludedEntry {
                    name,
                    reason: "cannot compute",
                }),
            }
        }

        Self {
            title: title.to_string(),
            bars,
            excluded,
        }
    }
}

/// Draws an [`RoiChart`] to text.
pub trait ChartRenderer {
    fn render(
        &self,
        chart: &RoiChart,
    ) -> String;
}

/// Horizontal bars scaled to a fixed number of columns.
///
/// Negative ROI extends left of the `|` axis, positive ROI to the right.
/// The widest bar on either side together never exceeds `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBarChart {
    pub width: usize,
}

impl TextBarChart {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    fn cells(
        &self,
        value: Decimal,
        span: Decimal,
    ) -> usize {
        if span.is_zero() || value.is_zero() {
            return 0;
        }
        // value <= span, so the share is at most one
        let scaled = value
            .checked_div(span)
            .and_then(|share| share.checked_mul(Decimal::from(self.width)))
            .and_then(|cells| cells.round().to_usize())
            .unwrap_or(self.width);
        scaled.clamp(1, self.width.max(1)).min(self.width)
    }
}

impl ChartRenderer for TextBarChart {
    fn render(
        &self,
        chart: &RoiChart,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", chart.title);

        if chart.bars.is_empty() {
            let _ = writeln!(out, "  (no ROI values to chart)");
        } else {
            let max_pos = chart
                .bars
                .iter()
                .map(|b| b.roi_percent)
                .filter(|v| v.is_sign_positive())
                .max()
                .unwrap_or_default();
            let max_neg = chart
                .bars
                .iter()
                .map(|b| b.roi_percent)
                .filter(|v| v.is_sign_negative())
                .map(|v| v.abs())
                .max()
                .unwrap_or_default();
            // shrink both sides when their sum is beyond Decimal::MAX
            let shrink = max_pos.checked_add(max_neg).is_none();
            let fit = |v: Decimal| if shrink { v / Decimal::TEN } else { v };
            let span = fit(max_pos) + fit(max_neg);
            let left = self.cells(fit(max_neg), span);
            let name_width = chart
                .bars
                .iter()
                .map(|b| b.name.chars().count())
                .max()
                .unwrap_or(0);

            for bar in &chart.bars {
                let n = self.cells(fit(bar.roi_percent.abs()), span);
                let (neg, pos) = if bar.roi_percent.is_sign_negative() {
                    (BAR.to_string().repeat(n), String::new())
                } else {
                    (String::new(), BAR.to_string().repeat(n))
                };
                let _ = writeln!(
                    out,
                    "  {:<name_width$} {neg:>left$}|{pos} {}",
                    bar.name,
                    format_percent(bar.roi_percent),
                );
            }
        }

        if !chart.excluded.is_empty() {
            let listed: Vec<String> = chart
                .excluded
                .iter()
                .map(|e| format!("{} ({})", e.name, e.reason))
                .collect();
            let _ = writeln!(out, "  Excluded: {}", listed.join(", "));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use realty_core::{Property, PropertyCollection, evaluate};
    use rust_decimal_macros::dec;

    use super::*;

    fn bar(
        name: &str,
        roi_percent: Decimal,
    ) -> RoiBar {
        RoiBar {
            name: name.to_string(),
            roi_percent,
        }
    }

    fn chart(bars: Vec<RoiBar>) -> RoiChart {
        RoiChart {
            title: "ROI".to_string(),
            bars,
            excluded: Vec::new(),
        }
    }

    fn test_property(name: &str) -> Property {
        Property {
            name: name.to_string(),
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

    // =========================================================================
    // RoiChart tests
    // =========================================================================

    #[test]
    fn from_analyses_excludes_undefined_and_failed() {
        let collection: PropertyCollection = vec![
            test_property("A"),
            Property {
                down_payment: dec!(0),
                monthly_maintenance: dec!(0),
                ..test_property("Zero")
            },
            Property {
                loan_term_years: 0,
                ..test_property("Broken")
            },
        ]
        .into_iter()
        .collect();
        let analyses = evaluate(&collection);

        let chart = RoiChart::from_analyses("ROI", &analyses);

        assert_eq!(chart.bars, vec![bar("A", dec!(83.22))]);
        assert_eq!(
            chart.excluded,
            vec![
                ExcludedEntry {
                    name: "Zero".to_string(),
                    reason: "ROI undefined"
                },
                ExcludedEntry {
                    name: "Broken".to_string(),
                    reason: "cannot compute"
                },
            ]
        );
    }

    // =========================================================================
    // TextBarChart tests
    // =========================================================================

    #[test]
    fn bars_scale_to_width() {
        let chart = chart(vec![bar("A", dec!(50)), bar("Bee", dec!(100))]);

        let text = TextBarChart::new(10).render(&chart);

        assert_eq!(
            text,
            "ROI\n\
             \x20 A   |█████ 50.00%\n\
             \x20 Bee |██████████ 100.00%\n"
        );
    }

    #[test]
    fn negative_bars_extend_left_of_axis() {
        let chart = chart(vec![bar("A", dec!(-50)), bar("B", dec!(100))]);

        let text = TextBarChart::new(15).render(&chart);

        assert_eq!(
            text,
            "ROI\n\
             \x20 A █████| -50.00%\n\
             \x20 B      |██████████ 100.00%\n"
        );
    }

    #[test]
    fn tiny_nonzero_roi_still_gets_a_cell() {
        let chart = chart(vec![bar("A", dec!(0.5)), bar("B", dec!(1000))]);

        let text = TextBarChart::new(10).render(&chart);

        assert!(text.contains("  A |█ 0.50%\n"));
    }

    #[test]
    fn huge_roi_fills_the_width() {
        let chart = chart(vec![
            bar("Huge", dec!(1207591859042217607725009939.6)),
            bar("Small", dec!(10)),
        ]);

        let text = TextBarChart::new(100).render(&chart);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1].matches(BAR).count(), 100);
        assert_eq!(lines[2].matches(BAR).count(), 1);
    }

    #[test]
    fn opposite_huge_bars_share_the_width() {
        let chart = chart(vec![bar("Up", Decimal::MAX), bar("Down", Decimal::MIN)]);

        let text = TextBarChart::new(10).render(&chart);

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("  Up        |"));
        assert_eq!(lines[1].matches(BAR).count(), 5);
        assert!(lines[2].starts_with("  Down █████|"));
        assert_eq!(lines[2].matches(BAR).count(), 5);
    }

    #[test]
    fn oversized_property_renders_without_aborting() {
        let collection: PropertyCollection = vec![
            Property {
                purchase_price: dec!(50000000000000000000),
                down_payment: dec!(0.0000001),
                monthly_maintenance: dec!(0),
                annual_appreciation_percent: dec!(10),
                ..test_property("Giant")
            },
            test_property("A"),
        ]
        .into_iter()
        .collect();
        let analyses = evaluate(&collection);

        let text = TextBarChart::new(100).render(&RoiChart::from_analyses("ROI", &analyses));

        assert!(text.starts_with("ROI
  Giant |"));
        assert!(text.contains("  A     |█ 83.22%
"));
    }

    #[test]
    fn zero_roi_draws_no_bar() {
        let chart = chart(vec![bar("A", dec!(0))]);

        let text = TextBarChart::new(10).render(&chart);

        assert_eq!(text, "ROI\n  A | 0.00%\n");
    }

    #[test]
    fn empty_chart_lists_exclusions() {
        let chart = RoiChart {
            title: "ROI".to_string(),
            bars: Vec::new(),
            excluded: vec![ExcludedEntry {
                name: "Zero".to_string(),
                reason: "ROI undefined",
            }],
        };

        let text = TextBarChart::new(10).render(&chart);

        assert_eq!(
            text,
            "ROI\n  (no ROI values to chart)\n  Excluded: Zero (ROI undefined)\n"
        );
    }
}
