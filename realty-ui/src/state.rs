//! Session state for the realty front-end.
//!
//! A [`Session`] owns the property list for one run. Input paths append
//! through [`SessionEvent::AddProperty`]; [`SessionEvent::Render`]
//! recomputes every property and returns an owned [`ComparisonView`].

use std::fmt::Write;

use realty_core::calculations::common::{format_currency, format_percent};
use realty_core::{ComparisonSummary, Property, PropertyCollection, evaluate};
use realty_data::{ExportRow, export_rows};
use rust_decimal::Decimal;
use tracing::info;

use crate::models::{FormError, PropertyForm};
use crate::views::{ChartRenderer, RoiChart, SummaryCard, render_table};

/// Shown in place of the comparison when nothing has been added.
pub const EMPTY_MESSAGE: &str = "No properties added yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AddProperty(Property),
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Position of the appended property.
    Added(usize),
    Rendered(ComparisonView),
}

/// Which optional sections [`ComparisonView::render`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub chart: bool,
    pub table: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chart: true,
            table: false,
        }
    }
}

/// Everything shown for one render, detached from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub cards: Vec<SummaryCard>,
    pub chart: RoiChart,
    pub rows: Vec<ExportRow>,
    pub summary: ComparisonSummary,
}

impl ComparisonView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn render(
        &self,
        renderer: &dyn ChartRenderer,
        options: RenderOptions,
    ) -> String {
        if self.is_empty() {
            return format!("{EMPTY_MESSAGE}\n");
        }

        let mut out = String::from("Investment Summary\n\n");
        for card in &self.cards {
            let _ = writeln!(out, "{card}\n");
        }

        if options.chart {
            out.push_str(&renderer.render(&self.chart));
            out.push('\n');
        }

        if options.table {
            let _ = writeln!(out, "{}\n", render_table(&self.rows));
        }

        let summary = &self.summary;
        let _ = write!(
            out,
            "{} properties: {} computed, {} failed, {} with undefined ROI",
            summary.total, summary.computed, summary.failed, summary.degenerate
        );
        if let Some((name, roi)) = &summary.best_roi {
            let _ = write!(out, "\nBest ROI: {name} ({})", format_percent(*roi));
        }
        if let Some((name, flip)) = &summary.best_flip {
            let _ = write!(out, "\nBest flip: {name} ({})", format_currency(*flip));
        }
        out.push('\n');
        out
    }
}

/// One run's append-only property list.
#[derive(Debug, Clone)]
pub struct Session {
    collection: PropertyCollection,
    chart_title: String,
}

impl Session {
    pub fn new(chart_title: impl Into<String>) -> Self {
        Self {
            collection: PropertyCollection::new(),
            chart_title: chart_title.into(),
        }
    }

    pub fn collection(&self) -> &PropertyCollection {
        &self.collection
    }

    pub fn handle(
        &mut self,
        event: SessionEvent,
    ) -> SessionOutcome {
        match event {
            SessionEvent::AddProperty(property) => SessionOutcome::Added(self.add(property)),
            SessionEvent::Render => SessionOutcome::Rendered(self.render()),
        }
    }

    /// Validates the form and appends the result. The collection is left
    /// unchanged when validation fails.
    pub fn add_from_form(
        &mut self,
        form: &PropertyForm,
    ) -> Result<usize, FormError> {
        let property = form.validate()?;
        Ok(self.add(property))
    }

    fn add(
        &mut self,
        property: Property,
    ) -> usize {
        let name = property.name.clone();
        let index = self.collection.push(property);
        info!(property = %name, index, "added property");
        index
    }

    /// Recomputes every property and builds the view.
    pub fn render(&self) -> ComparisonView {
        let analyses = evaluate(&self.collection);
        let summary = ComparisonSummary::from_analyses(&analyses);

        if analyses.is_empty() {
            info!("{EMPTY_MESSAGE}");
        } else {
            info!(
                total = summary.total,
                failed = summary.failed,
                roi_undefined = summary.degenerate,
                best_roi = leader(&summary.best_roi),
                best_flip = leader(&summary.best_flip),
                "rendered comparison"
            );
        }

        ComparisonView {
            cards: analyses.iter().map(SummaryCard::from_analysis).collect(),
            chart: RoiChart::from_analyses(&self.chart_title, &analyses),
            rows: export_rows(&analyses),
            summary,
        }
    }
}

fn leader(best: &Option<(String, Decimal)>) -> &str {
    best.as_ref().map_or("none", |(name, _)| name.as_str())
}
