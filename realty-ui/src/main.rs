use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use realty_data::{ExportRegistry, PropertyLoader, export_to_path};
use tracing::{debug, info, warn};

use realty_ui::views::TextBarChart;
use realty_ui::{AppConfig, RenderOptions, Session, SessionEvent, SessionOutcome, logging, prompt};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compare real-estate investments side by side.
///
/// Loads properties from CSV files and/or prompts for them, then prints a
/// summary card per property, an ROI bar chart and optionally a table, and
/// can write the comparison to a CSV or JSON file.
#[derive(Debug, Parser)]
#[command(name = "realty", version)]
struct Cli {
    /// CSV file of properties to load; may be given more than once.
    #[arg(long = "input", value_name = "CSV")]
    inputs: Vec<PathBuf>,

    /// Prompt for additional properties on stdin.
    #[arg(long)]
    interactive: bool,

    /// Write the comparison to PATH, or to the configured file name when
    /// no path is given.
    #[arg(long, value_name = "PATH")]
    export: Option<Option<PathBuf>>,

    /// Export format (csv or json). Defaults to the configured format.
    #[arg(long)]
    format: Option<String>,

    /// TOML configuration file.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Skip the ROI chart.
    #[arg(long)]
    no_chart: bool,

    /// Also print the comparison table.
    #[arg(long)]
    table: bool,
}

// ─── configuration ───────────────────────────────────────────────────────────

/// Load the config file when one was given and apply its logging settings.
///
/// * `RUST_LOG` wins over `log_level`.
/// * `log_file` is opened in append mode.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::default(),
    };

    if !logging::env_filter_is_set() {
        logging::set_log_level(&config.log_level)?;
    }
    if let Some(log_file) = &config.log_file {
        logging::enable_file_logging(log_file)?;
        debug!("logging to {}", log_file.display());
    }

    Ok(config)
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    // a bad --format fails before any prompting
    let registry = ExportRegistry::with_defaults();
    let format = cli.format.as_deref().unwrap_or(&config.export.format);
    let writer = registry.get(format)?;

    let mut session = Session::new(config.chart.title.clone());

    for path in &cli.inputs {
        let collection = PropertyLoader::load_from_file(path)
            .with_context(|| format!("Failed to load properties from: {}", path.display()))?;
        for property in collection {
            session.handle(SessionEvent::AddProperty(property));
        }
    }

    if cli.interactive {
        let added = prompt::run_interactive(
            io::stdin().lock(),
            io::stdout(),
            &mut session,
            &config.defaults,
        )
        .context("Failed to read properties from stdin")?;
        info!(added, "interactive entry finished");
    }

    let SessionOutcome::Rendered(view) = session.handle(SessionEvent::Render) else {
        anyhow::bail!("render produced no view");
    };

    let options = RenderOptions {
        chart: !cli.no_chart,
        table: cli.table,
    };
    print!(
        "{}",
        view.render(&TextBarChart::new(config.chart.width), options)
    );

    if let Some(path) = cli.export {
        let path = path.unwrap_or_else(|| config.export.default_path(writer.file_extension()));
        if view.is_empty() {
            warn!("exporting an empty comparison");
        }
        export_to_path(writer, &view.rows, &path)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        println!("Exported {} properties to {}", view.rows.len(), path.display());
    }

    Ok(())
}
