//! Tabular export of a property comparison.
//!
//! One [`ExportRow`] per property, in collection order, with metrics rounded
//! to cents. Writers are looked up by name in an [`ExportRegistry`]:
//!
//! | format | writer               | output |
//! |--------|----------------------|--------|
//! | `csv`  | [`CsvExportWriter`]  | header row + one line per property, opens in any spreadsheet |
//! | `json` | [`JsonExportWriter`] | pretty-printed array of row objects |
//!
//! A property whose metrics could not be computed keeps its identifying
//! columns and leaves every metric cell empty; an undefined ROI leaves only
//! the ROI cell empty. The trailing `Status` column says which case applies.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use realty_core::PropertyAnalysis;
use realty_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::info;

/// Column titles, in output order.
pub const EXPORT_COLUMNS: [&str; 10] = [
    "Name",
    "Address",
    "Image",
    "Monthly Cost",
    "Net Rent",
    "Cash Flow",
    "Annual Profit",
    "ROI (%)",
    "Flip Profit",
    "Status",
];

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown export format '{requested}'; available: {available:?}")]
    UnknownFormat {
        requested: String,
        available: Vec<&'static str>,
    },
}

/// How a row's metrics turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Ok,
    RoiUndefined,
    CannotCompute(String),
}

impl fmt::Display for ExportStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ExportStatus::Ok => write!(f, "ok"),
            ExportStatus::RoiUndefined => write!(f, "roi undefined"),
            ExportStatus::CannotCompute(reason) => write!(f, "cannot compute: {reason}"),
        }
    }
}

impl Serialize for ExportStatus {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One exported line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Monthly Cost")]
    pub monthly_cost: Option<Decimal>,
    #[serde(rename = "Net Rent")]
    pub net_rent: Option<Decimal>,
    #[serde(rename = "Cash Flow")]
    pub cash_flow: Option<Decimal>,
    #[serde(rename = "Annual Profit")]
    pub annual_profit: Option<Decimal>,
    #[serde(rename = "ROI (%)")]
    pub roi_percent: Option<Decimal>,
    #[serde(rename = "Flip Profit")]
    pub flip_profit: Option<Decimal>,
    #[serde(rename = "Status")]
    pub status: ExportStatus,
}

/// Rounds half-up and pins the scale so `45000` is written as `45000.00`.
fn cents(value: Decimal) -> Decimal {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded
}

impl ExportRow {
    pub fn from_analysis(analysis: &PropertyAnalysis<'_>) -> Self {
        let property = analysis.property;
        let mut row = ExportRow {
            name: property.name.clone(),
            address: property.address.clone(),
            image: property.image.clone().unwrap_or_default(),
            monthly_cost: None,
            net_rent: None,
            cash_flow: None,
            annual_profit: None,
            roi_percent: None,
            flip_profit: None,
            status: ExportStatus::Ok,
        };

        match &analysis.outcome {
            Ok(metrics) => {
                row.monthly_cost = Some(cents(metrics.monthly_cost));
                row.net_rent = Some(cents(metrics.net_rent));
                row.cash_flow = Some(cents(metrics.cash_flow));
                row.annual_profit = Some(cents(metrics.annual_profit));
                row.roi_percent = metrics.roi_percent.map(cents);
                row.flip_profit = Some(cents(metrics.flip_profit));
                if metrics.is_degenerate() {
                    row.status = ExportStatus::RoiUndefined;
                }
            }
            Err(e) => row.status = ExportStatus::CannotCompute(e.to_string()),
        }

        row
    }
}

/// Builds export rows for a comparison, preserving order.
pub fn export_rows(analyses: &[PropertyAnalysis<'_>]) -> Vec<ExportRow> {
    analyses.iter().map(ExportRow::from_analysis).collect()
}

/// A tabular output format.
pub trait ExportWriter: Send + Sync {
    /// Unique, lowercase identifier for this format.
    fn format_name(&self) -> &'static str;

    /// File extension without the dot.
    fn file_extension(&self) -> &'static str;

    fn write(
        &self,
        rows: &[ExportRow],
        out: &mut dyn Write,
    ) -> Result<(), ExportError>;
}

/// Comma-separated output with a header row, even when there are no rows.
pub struct CsvExportWriter;

impl ExportWriter for CsvExportWriter {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn write(
        &self,
        rows: &[ExportRow],
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(EXPORT_COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Pretty-printed JSON array.
pub struct JsonExportWriter;

impl ExportWriter for JsonExportWriter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn write(
        &self,
        rows: &[ExportRow],
        out: &mut dyn Write,
    ) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut *out, rows)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Registry of [`ExportWriter`]s keyed by format name.
pub struct ExportRegistry {
    writers: HashMap<&'static str, Box<dyn ExportWriter>>,
}

impl ExportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            writers: HashMap::new(),
        }
    }

    /// Registry with the CSV and JSON writers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CsvExportWriter));
        registry.register(Box::new(JsonExportWriter));
        registry
    }

    /// Register a writer, replacing any with the same format name.
    pub fn register(
        &mut self,
        writer: Box<dyn ExportWriter>,
    ) {
        self.writers.insert(writer.format_name(), writer);
    }

    /// Names of every registered format, sorted alphabetically.
    pub fn available_formats(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.writers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Look up a writer by (case-insensitive) format name.
    ///
    /// # Errors
    /// * [`ExportError::UnknownFormat`] when nothing is registered under `format`.
    pub fn get(
        &self,
        format: &str,
    ) -> Result<&dyn ExportWriter, ExportError> {
        self.writers
            .get(format.to_ascii_lowercase().as_str())
            .map(|w| &**w)
            .ok_or_else(|| ExportError::UnknownFormat {
                requested: format.to_string(),
                available: self.available_formats(),
            })
    }
}

impl Default for ExportRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Write `rows` to a new file at `path`, replacing any existing file.
pub fn export_to_path(
    writer: &dyn ExportWriter,
    rows: &[ExportRow],
    path: &Path,
) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    writer.write(rows, &mut out)?;
    out.flush()?;

    info!(
        path = %path.display(),
        format = writer.format_name(),
        rows = rows.len(),
        "wrote export"
    );
    Ok(())
}
