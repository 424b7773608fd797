use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use realty_core::{ComparisonSummary, evaluate};
use realty_data::{ExportRegistry, PropertyLoader, export_rows, export_to_path};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compute investment metrics for properties in a CSV file and export them.
///
/// The input CSV needs a header row with these columns:
/// - name, address, image (optional)
/// - square_footage, purchase_price, down_payment
/// - interest_rate_percent, loan_term_years
/// - annual_property_tax, annual_insurance, monthly_maintenance
/// - vacancy_percent (0 to 20), expected_monthly_rent
/// - annual_appreciation_percent, hold_period_years
/// - rehab_cost, target_resale_price
#[derive(Parser, Debug)]
#[command(name = "realty-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing property data
    #[arg(short, long)]
    file: PathBuf,

    /// Output path; defaults to multi_property_analysis.<ext> in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format (csv or json)
    #[arg(long, default_value = "csv")]
    format: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let registry = ExportRegistry::with_defaults();
    let writer = registry.get(&args.format)?;

    let collection = PropertyLoader::load_from_file(&args.file)
        .with_context(|| format!("Failed to load properties from: {}", args.file.display()))?;

    let analyses = evaluate(&collection);
    let summary = ComparisonSummary::from_analyses(&analyses);
    let rows = export_rows(&analyses);

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "multi_property_analysis.{}",
            writer.file_extension()
        ))
    });

    export_to_path(writer, &rows, &output)
        .with_context(|| format!("Failed to write export: {}", output.display()))?;

    info!(
        failed = summary.failed,
        roi_undefined = summary.degenerate,
        "comparison complete"
    );
    println!(
        "Exported {} properties to {}",
        summary.total,
        output.display()
    );

    Ok(())
}
