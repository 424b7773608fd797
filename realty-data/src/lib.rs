//! Batch input and tabular export for the property comparison.

pub mod export;
pub mod loader;

pub use export::{
    CsvExportWriter, EXPORT_COLUMNS, ExportError, ExportRegistry, ExportRow, ExportStatus,
    ExportWriter, JsonExportWriter, export_rows, export_to_path,
};
pub use loader::{PropertyLoader, PropertyLoaderError, PropertyRecord};
