//! Side-by-side evaluation of every property in a collection.
//!
//! Each property is calculated on its own. A failure for one entry is kept
//! next to that entry and never stops the rest of the comparison.

use rust_decimal::Decimal;
use tracing::error;

use super::investment::{CalculatorError, InvestmentCalculator};
use crate::{Metrics, Property, PropertyCollection};

/// Calculation outcome for one property, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAnalysis<'a> {
    /// Position of the property in its collection.
    pub index: usize,
    pub property: &'a Property,
    pub outcome: Result<Metrics, CalculatorError>,
}

impl PropertyAnalysis<'_> {
    pub fn is_computed(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.outcome.as_ref().ok()
    }

    /// ROI when the property computed and the ROI is defined.
    pub fn roi_percent(&self) -> Option<Decimal> {
        self.metrics().and_then(|m| m.roi_percent)
    }
}

/// Maps every property through the calculator, preserving order.
pub fn evaluate(collection: &PropertyCollection) -> Vec<PropertyAnalysis<'_>> {
    collection
        .iter()
        .enumerate()
        .map(|(index, property)| {
            let outcome = InvestmentCalculator::calculate(property);
            if let Err(ref e) = outcome {
                error!(property = %property.name, index, error = %e, "cannot compute metrics");
            }
            PropertyAnalysis {
                index,
                property,
                outcome,
            }
        })
        .collect()
}

/// Aggregate view over a set of analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    pub total: usize,
    pub computed: usize,
    pub failed: usize,
    /// Computed properties whose ROI is undefined.
    pub degenerate: usize,
    /// Name and ROI of the highest-ROI property; earliest wins ties.
    pub best_roi: Option<(String, Decimal)>,
    /// Name and flip profit of the highest flip profit; earliest wins ties.
    pub best_flip: Option<(String, Decimal)>,
}

impl ComparisonSummary {
    pub fn from_analyses(analyses: &[PropertyAnalysis<'_>]) -> Self {
        let mut summary = Self {
            total: analyses.len(),
            ..Self::default()
        };

        for analysis in analyses {
            let Some(metrics) = analysis.metrics() else {
                summary.failed += 1;
                continue;
            };
            summary.computed += 1;

            match metrics.roi_percent {
                Some(roi) => {
                    if summary.best_roi.as_ref().is_none_or(|(_, best)| roi > *best) {
                        summary.best_roi = Some((analysis.property.name.clone(), roi));
                    }
                }
                None => summary.degenerate += 1,
            }

            let flip = metrics.flip_profit;
            if summary.best_flip.as_ref().is_none_or(|(_, best)| flip > *best) {
                summary.best_flip = Some((analysis.property.name.clone(), flip));
            }
        }

        summary
    }
}
