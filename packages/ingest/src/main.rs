#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the climate grid ingestion tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use climate_grid_database::{db, queries};
use climate_grid_hazard_models::{Scenario, TimePeriod};
use climate_grid_ingest::{ImportOptions, import_impact_grid, import_model_grid};
use climate_grid_source::open_meteo::OpenMeteoClient;

#[derive(Parser)]
#[command(name = "climate_grid_ingest", about = "Climate grid ingestion tool")]
struct Cli {
    /// Path to the grid database file.
    #[arg(long, default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and derive the model-family grid from the climate archive
    ImportModel {
        /// Import only the first N seed locations (for testing)
        #[arg(long)]
        limit_points: Option<usize>,
        /// Comma-separated scenario ids (e.g. "ssp126,ssp585")
        #[arg(long)]
        scenarios: Option<String>,
        /// Comma-separated period ids (e.g. "2030,2050")
        #[arg(long)]
        periods: Option<String>,
    },
    /// Regenerate the impact-family grid from the deterministic model
    ImportImpact {
        /// Import only the first N seed locations (for testing)
        #[arg(long)]
        limit_points: Option<usize>,
    },
    /// Show grid store statistics
    Stats,
}

fn parse_list<T: std::str::FromStr>(raw: &str, what: &str) -> Result<Vec<T>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(|_| format!("Unknown {what}: {s}")))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let db = db::open_db(&cli.db).await?;

    match cli.command {
        Commands::ImportModel {
            limit_points,
            scenarios,
            periods,
        } => {
            let options = ImportOptions {
                limit_points,
                limit_scenarios: scenarios
                    .as_deref()
                    .map(|s| parse_list::<Scenario>(s, "scenario"))
                    .transpose()?,
                limit_periods: periods
                    .as_deref()
                    .map(|s| parse_list::<TimePeriod>(s, "time period"))
                    .transpose()?,
                cancel: None,
            };

            let provider = OpenMeteoClient::new()?;
            let summary = import_model_grid(db.as_ref(), &provider, &options, None).await;
            log::info!(
                "Done: {} imported, {} errors",
                summary.imported,
                summary.errors
            );
        }
        Commands::ImportImpact { limit_points } => {
            let options = ImportOptions {
                limit_points,
                ..ImportOptions::default()
            };
            let summary = import_impact_grid(db.as_ref(), &options, None).await;
            log::info!(
                "Done: {} imported, {} errors",
                summary.imported,
                summary.errors
            );
        }
        Commands::Stats => {
            let stats = queries::stats(db.as_ref()).await?;
            println!("cmip6 rows:   {}", stats.cmip6_count);
            println!("isimip rows:  {}", stats.isimip_count);
            println!("grid cells:   {}", stats.locations);
            println!(
                "scenarios:    {}",
                stats
                    .scenarios
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!(
                "time periods: {}",
                stats
                    .time_periods
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    Ok(())
}
