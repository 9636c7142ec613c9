//! `orderlens run | drilldown | validate`: config-driven reconciliation.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

use orderlens_io::{ingest_metadata, ingest_orders, ingest_pbi, IngestError};
use orderlens_recon::config::IngestConfig;
use orderlens_recon::model::{AsinMetadata, DrilldownRow};
use orderlens_recon::{
    build_report, drilldown, FilterChoices, MetadataFilter, OrderFilter, ReconConfig,
};

use crate::exit_codes::{
    ingest_exit_code, EXIT_DISCREPANCY, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_USAGE,
};
use crate::CliError;

const DEFAULT_CONFIG_FILE: &str = "orderlens.toml";

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Compare orders against PBI and report per-ASIN discrepancies
    #[command(after_help = "\
Examples:
  orderlens run week42.toml
  orderlens run week42.toml --json
  orderlens run week42.toml --status Shipped --output report.json
  orderlens run week42.toml --fail-on-discrepancy")]
    Run {
        /// Path to the config file (default: <config dir>/orderlens/orderlens.toml)
        config: Option<PathBuf>,

        /// Only aggregate orders with this status in the breakdowns
        #[arg(long)]
        status: Option<String>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file (overrides `output.json` in the config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit with code 6 when any ASIN exceeds the discrepancy tolerance
        #[arg(long)]
        fail_on_discrepancy: bool,
    },

    /// List PBI records joined to ASIN metadata, narrowed by catalog attributes
    #[command(after_help = "\
Examples:
  orderlens drilldown week42.toml --brand Fissler
  orderlens drilldown week42.toml --client Acme --category Kitchen --json")]
    Drilldown {
        /// Path to the config file (default: <config dir>/orderlens/orderlens.toml)
        config: Option<PathBuf>,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        client: Option<String>,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        product_type: Option<String>,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a config without loading any source file
    #[command(after_help = "\
Examples:
  orderlens validate week42.toml")]
    Validate {
        /// Path to the config file (default: <config dir>/orderlens/orderlens.toml)
        config: Option<PathBuf>,
    },
}

pub async fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, status, json, output, fail_on_discrepancy } => {
            cmd_run(config, OrderFilter { order_status: status }, json, output, fail_on_discrepancy)
                .await
        }
        ReconCommands::Drilldown {
            config,
            brand,
            category,
            client,
            subcategory,
            product_type,
            json,
        } => {
            let filter = MetadataFilter { brand, category, client, subcategory, product_type };
            cmd_drilldown(config, filter, json).await
        }
        ReconCommands::Validate { config } => cmd_validate(config).await,
    }
}

fn ingest_err(err: IngestError) -> CliError {
    let code = ingest_exit_code(&err);
    let hint = match &err {
        IngestError::Parse { .. } => {
            Some("check [ingest] delimiter, or set encoding_fallback = true for non-UTF-8 exports")
        }
        IngestError::Io { .. } => Some("paths in [files] resolve relative to the config file"),
        _ => None,
    };
    let cli_err = CliError::new(code, err.to_string());
    match hint {
        Some(hint) => cli_err.with_hint(hint),
        None => cli_err,
    }
}

// ============================================================================
// Config
// ============================================================================

fn resolve_config_path(config: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = config {
        return Ok(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("orderlens").join(DEFAULT_CONFIG_FILE))
        .ok_or_else(|| {
            CliError::args("no config file given and no user config directory found")
                .with_hint("pass the config path: orderlens run <config.toml>")
        })
}

/// A validated config plus the directory its file paths resolve against.
struct LoadedConfig {
    config: ReconConfig,
    base_dir: PathBuf,
}

impl LoadedConfig {
    fn path(&self, file: &str) -> PathBuf {
        self.base_dir.join(file)
    }
}

async fn load_config(config: Option<PathBuf>) -> Result<LoadedConfig, CliError> {
    let config_path = resolve_config_path(config)?;
    let config_str = tokio::fs::read_to_string(&config_path).await.map_err(|e| {
        CliError::new(EXIT_USAGE, format!("cannot read config {}: {e}", config_path.display()))
    })?;

    let config = ReconConfig::from_toml(&config_str)
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    tracing::debug!(config = %config_path.display(), name = %config.name, "config loaded");

    Ok(LoadedConfig { config, base_dir })
}

// ============================================================================
// run
// ============================================================================

async fn cmd_run(
    config: Option<PathBuf>,
    filter: OrderFilter,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_discrepancy: bool,
) -> Result<(), CliError> {
    let loaded = load_config(config).await?;
    let config = &loaded.config;
    let ingest = &config.ingest;

    let orders_path = loaded.path(&config.files.orders);
    let pbi_path = loaded.path(&config.files.pbi);
    let metadata_path = config.files.metadata.as_deref().map(|f| loaded.path(f));

    let (orders, pbi, metadata) = tokio::join!(
        ingest_orders(&orders_path, ingest),
        ingest_pbi(&pbi_path, ingest),
        load_optional_metadata(metadata_path.as_deref(), ingest),
    );
    let orders = orders.map_err(ingest_err)?;
    let pbi = pbi.map_err(ingest_err)?;
    let metadata = metadata.map_err(ingest_err)?;

    let report = build_report(
        &config.name,
        &config.tolerance,
        &orders,
        &pbi,
        metadata.as_deref(),
        &filter,
    );

    let output_file = output_file.or_else(|| config.output.json.as_deref().map(|f| loaded.path(f)));
    if json_output || output_file.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            tokio::fs::write(path, &json_str).await.map_err(|e| {
                CliError::new(EXIT_ERROR, format!("cannot write {}: {e}", path.display()))
            })?;
            eprintln!("wrote {}", path.display());
        }

        if json_output {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "recon '{}': {} ASIN(s), orders {:.2} EUR / {} units, PBI {:.2} EUR / {} units",
        report.meta.config_name, s.asins, s.order_total, s.order_units, s.pbi_sales, s.pbi_units,
    );
    eprintln!(
        "{} without PBI match, {} beyond {}% tolerance",
        s.unmatched, s.flagged, config.tolerance.discrepancy_pct,
    );
    if let Some(missing) = &report.missing_from_metadata {
        if !missing.is_empty() {
            eprintln!("{} ASIN(s) missing from metadata", missing.len());
        }
    }

    if !json_output {
        for c in report.comparisons.iter().filter(|c| config.tolerance.exceeded_by(c)) {
            println!(
                "{:<12} sales {:>10.2} vs {:>10.2} ({:+.1}%)  units {:>6} vs {:>6} ({:+.1}%){}",
                c.asin,
                c.total,
                c.pbi_sales,
                c.sales_discrepancy,
                c.units,
                c.pbi_units,
                c.units_discrepancy,
                if c.pbi_matched { "" } else { "  [no PBI]" },
            );
        }
    }

    if fail_on_discrepancy && s.flagged > 0 {
        return Err(CliError::new(
            EXIT_DISCREPANCY,
            format!("{} ASIN(s) exceed the discrepancy tolerance", s.flagged),
        ));
    }

    Ok(())
}

async fn load_optional_metadata(
    path: Option<&Path>,
    ingest: &IngestConfig,
) -> Result<Option<Vec<AsinMetadata>>, IngestError> {
    match path {
        Some(path) => ingest_metadata(path, ingest).await.map(Some),
        None => Ok(None),
    }
}

// ============================================================================
// drilldown
// ============================================================================

#[derive(Serialize)]
struct DrilldownOutput {
    choices: FilterChoices,
    rows: Vec<DrilldownRow>,
}

async fn cmd_drilldown(
    config: Option<PathBuf>,
    filter: MetadataFilter,
    json_output: bool,
) -> Result<(), CliError> {
    let loaded = load_config(config).await?;
    let config = &loaded.config;

    let Some(metadata_file) = config.files.metadata.as_deref() else {
        return Err(CliError::args("drilldown needs ASIN metadata")
            .with_hint("add `metadata = \"...\"` under [files] in the config"));
    };

    let pbi_path = loaded.path(&config.files.pbi);
    let metadata_path = loaded.path(metadata_file);
    let (pbi, metadata) = tokio::join!(
        ingest_pbi(&pbi_path, &config.ingest),
        ingest_metadata(&metadata_path, &config.ingest),
    );
    let pbi = pbi.map_err(ingest_err)?;
    let metadata = metadata.map_err(ingest_err)?;

    let output = DrilldownOutput {
        choices: FilterChoices::for_metadata(&metadata),
        rows: drilldown(&pbi, &metadata, &filter),
    };

    if json_output {
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for row in &output.rows {
            println!(
                "{:<12} {:<16} {:<16} {:<16} {:>10.2} {:>6}",
                row.pbi.asin,
                row.metadata.brand,
                row.metadata.category,
                row.metadata.client,
                row.pbi.sales,
                row.pbi.units,
            );
        }
    }

    let sales: f64 = output.rows.iter().map(|r| r.pbi.sales).sum();
    eprintln!("drilldown: {} of {} PBI record(s), {:.2} EUR", output.rows.len(), pbi.len(), sales);

    Ok(())
}

// ============================================================================
// validate
// ============================================================================

async fn cmd_validate(config: Option<PathBuf>) -> Result<(), CliError> {
    let loaded = load_config(config).await?;
    let config = &loaded.config;

    eprintln!(
        "valid: recon '{}' (orders: {}, pbi: {}, metadata: {}, tolerance {}%)",
        config.name,
        config.files.orders,
        config.files.pbi,
        config.files.metadata.as_deref().unwrap_or("none"),
        config.tolerance.discrepancy_pct,
    );
    Ok(())
}
