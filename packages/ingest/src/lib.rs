#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate grid ingestion pipeline.
//!
//! Fetches raw daily series from the upstream archive, derives every
//! indicator in the model-family catalog, and writes grid rows via the
//! store's delete-then-insert primitive. The impact-family grid is
//! produced by the deterministic synthetic model instead of a fetch.
//!
//! Fetches are sequential with explicit pacing delays. That is the rate
//! limit contract with the upstream archive, not an accident. Do not
//! parallelize them without an equivalent limiter.

pub mod derive;
pub mod locations;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use climate_grid_database::queries;
use climate_grid_database_models::GridDataPoint;
use climate_grid_hazard_models::{Indicator, Scenario, SourceFamily, TimePeriod};
use climate_grid_source::progress::{ProgressCallback, null_progress};
use climate_grid_source::{ClimateProvider, DailyVariable, open_meteo};
use switchy_database::Database;

pub use locations::{GLOBAL_GRID_POINTS, GridLocation};

/// Delay between successive (scenario, period) fetches for one location.
const INTER_PERIOD_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

/// Delay between successive locations.
const INTER_LOCATION_DELAY: std::time::Duration = std::time::Duration::from_millis(500);

/// Model name recorded for impact-family rows.
const IMPACT_MODEL_LABEL: &str = "ISIMIP3b-median";

/// Provenance label recorded for impact-family rows.
const IMPACT_DATA_SOURCE: &str = "ISIMIP3b (modeled)";

/// Every daily variable the model-family derivation reads.
const ALL_DAILY_VARS: &[DailyVariable] = &[
    DailyVariable::TemperatureMean,
    DailyVariable::TemperatureMax,
    DailyVariable::TemperatureMin,
    DailyVariable::PrecipitationSum,
];

/// Limits and controls for an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Import only the first N seed locations.
    pub limit_points: Option<usize>,
    /// Restrict to these scenarios (default: the full scenario set).
    pub limit_scenarios: Option<Vec<Scenario>>,
    /// Restrict to these time periods (default: the projected horizons).
    pub limit_periods: Option<Vec<TimePeriod>>,
    /// Cooperative cancellation flag, checked between units of work. When
    /// set, the run stops early and returns the summary so far.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ImportOptions {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Outcome counts of an import run. An import never aborts wholesale;
/// failures are logged, counted here, and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows written to the grid store.
    pub imported: u64,
    /// Units of work (fetches or writes) that failed.
    pub errors: u64,
}

/// A location an import run targets.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportLocation {
    /// Name used in progress output.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl From<&GridLocation> for ImportLocation {
    fn from(loc: &GridLocation) -> Self {
        Self {
            name: loc.name.to_string(),
            latitude: loc.latitude,
            longitude: loc.longitude,
        }
    }
}

fn seed_locations(limit: Option<usize>) -> Vec<ImportLocation> {
    let points = limit.map_or(GLOBAL_GRID_POINTS, |n| {
        &GLOBAL_GRID_POINTS[..n.min(GLOBAL_GRID_POINTS.len())]
    });
    points.iter().map(ImportLocation::from).collect()
}

/// Imports the model-family grid for the global seed locations.
///
/// For each location: fetch the 30-year baseline mean once, then for each
/// (scenario, period) fetch the daily series and derive every
/// model-family indicator. Each grid cell's indicator set is replaced
/// atomically by the store. Returns `{imported, errors}`.
pub async fn import_model_grid(
    db: &dyn Database,
    provider: &dyn ClimateProvider,
    options: &ImportOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> ImportSummary {
    let locations = seed_locations(options.limit_points);
    let scenarios = options
        .limit_scenarios
        .clone()
        .unwrap_or_else(|| Scenario::all().to_vec());
    let periods = options
        .limit_periods
        .clone()
        .unwrap_or_else(TimePeriod::projected);

    import_model_grid_for_locations(db, provider, &locations, &scenarios, &periods, options, progress)
        .await
}

/// Imports the model-family grid for an explicit location set. This is
/// the scoped entry point the fallback orchestrator uses at request time.
#[allow(clippy::too_many_lines)]
pub async fn import_model_grid_for_locations(
    db: &dyn Database,
    provider: &dyn ClimateProvider,
    locations: &[ImportLocation],
    scenarios: &[Scenario],
    periods: &[TimePeriod],
    options: &ImportOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> ImportSummary {
    let start = Instant::now();
    let progress = progress.unwrap_or_else(null_progress);
    let mut summary = ImportSummary::default();

    progress.set_total(locations.len() as u64);
    progress.message(format!(
        "Starting model grid import for {} location(s)...",
        locations.len()
    ));

    'locations: for location in locations {
        if options.cancelled() {
            log::info!("Model grid import cancelled");
            break;
        }

        progress.message(format!(
            "Processing {} ({}, {})...",
            location.name, location.latitude, location.longitude
        ));

        let baseline = match provider
            .fetch_baseline_temperature(location.latitude, location.longitude)
            .await
        {
            Ok(Some(b)) => Some(b),
            Ok(None) => {
                progress.message(format!(
                    "  Warning: no baseline series for {}",
                    location.name
                ));
                None
            }
            Err(e) => {
                log::warn!("Baseline fetch failed for {}: {e}", location.name);
                None
            }
        };

        for &scenario in scenarios {
            for &period in periods {
                if options.cancelled() {
                    log::info!("Model grid import cancelled");
                    break 'locations;
                }

                let (start_date, end_date) = open_meteo::date_range(period);

                let series = match provider
                    .fetch_daily(
                        location.latitude,
                        location.longitude,
                        start_date,
                        end_date,
                        ALL_DAILY_VARS,
                    )
                    .await
                {
                    Ok(series) => series,
                    Err(e) => {
                        log::error!(
                            "Fetch failed for {} {scenario}/{period}: {e}",
                            location.name
                        );
                        summary.errors += 1;
                        continue;
                    }
                };

                if series.is_empty() {
                    log::warn!(
                        "Empty daily series for {} {scenario}/{period}, skipping",
                        location.name
                    );
                    summary.errors += 1;
                    continue;
                }

                let mut batch = Vec::new();
                for indicator in Indicator::for_source(SourceFamily::Cmip6) {
                    let daily = series.values(derive::source_variable(indicator));
                    if daily.is_empty() {
                        continue;
                    }

                    let value = derive::derive_indicator(indicator, &daily, baseline, period);

                    batch.push(GridDataPoint {
                        source: SourceFamily::Cmip6,
                        indicator_id: indicator,
                        scenario,
                        time_period: period,
                        latitude: location.latitude,
                        longitude: location.longitude,
                        value: derive::round3(value),
                        unit: indicator.unit().to_string(),
                        model: Some(open_meteo::CLIMATE_MODEL_LABEL.to_string()),
                        percentile: Some(50),
                        data_source: Some(open_meteo::DATA_SOURCE_LABEL.to_string()),
                        updated_at: Utc::now(),
                    });
                }

                if !batch.is_empty() {
                    match queries::upsert_batch(db, &batch).await {
                        Ok(n) => summary.imported += n,
                        Err(e) => {
                            log::error!(
                                "Insert failed for {} {scenario}/{period}: {e}",
                                location.name
                            );
                            summary.errors += 1;
                        }
                    }
                }

                tokio::time::sleep(INTER_PERIOD_DELAY).await;
            }
        }

        progress.inc(1);
        tokio::time::sleep(INTER_LOCATION_DELAY).await;
    }

    let msg = format!(
        "Model grid import complete: {} records imported, {} errors in {:.1}s",
        summary.imported,
        summary.errors,
        start.elapsed().as_secs_f64()
    );
    log::info!("{msg}");
    progress.finish(msg);

    summary
}

/// Regenerates the impact-family grid from the deterministic model and
/// replaces the whole `isimip` source wholesale.
pub async fn import_impact_grid(
    db: &dyn Database,
    options: &ImportOptions,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> ImportSummary {
    let progress = progress.unwrap_or_else(null_progress);
    let locations = seed_locations(options.limit_points);
    let scenarios = options
        .limit_scenarios
        .clone()
        .unwrap_or_else(|| Scenario::all().to_vec());
    let periods = options
        .limit_periods
        .clone()
        .unwrap_or_else(TimePeriod::projected);

    progress.message(format!(
        "Starting impact grid import for {} location(s)...",
        locations.len()
    ));

    let rows = impact_rows(&locations, &scenarios, &periods);

    let mut summary = ImportSummary::default();

    if let Err(e) = queries::delete_source(db, SourceFamily::Isimip).await {
        log::error!("Failed to clear impact grid before re-import: {e}");
        summary.errors += 1;
        return summary;
    }

    match queries::upsert_batch(db, &rows).await {
        Ok(n) => summary.imported = n,
        Err(e) => {
            log::error!("Impact grid insert failed: {e}");
            summary.errors += 1;
        }
    }

    let msg = format!(
        "Impact grid import complete: {} records imported, {} errors",
        summary.imported, summary.errors
    );
    log::info!("{msg}");
    progress.finish(msg);

    summary
}

/// Generates and stores impact-family rows for an explicit location set
/// without clearing the rest of the source. Used by the fallback
/// orchestrator's scoped live tier.
pub async fn import_impact_grid_for_locations(
    db: &dyn Database,
    locations: &[ImportLocation],
    scenarios: &[Scenario],
    periods: &[TimePeriod],
) -> ImportSummary {
    let rows = impact_rows(locations, scenarios, periods);

    let mut summary = ImportSummary::default();
    match queries::upsert_batch(db, &rows).await {
        Ok(n) => summary.imported = n,
        Err(e) => {
            log::error!("Scoped impact grid insert failed: {e}");
            summary.errors += 1;
        }
    }

    summary
}

/// Builds the full cross product of impact-family rows for the given
/// scope. Values come from the deterministic synthetic model.
fn impact_rows(
    locations: &[ImportLocation],
    scenarios: &[Scenario],
    periods: &[TimePeriod],
) -> Vec<GridDataPoint> {
    let indicators = Indicator::for_source(SourceFamily::Isimip);
    let mut rows =
        Vec::with_capacity(locations.len() * scenarios.len() * periods.len() * indicators.len());

    for location in locations {
        for &scenario in scenarios {
            for &period in periods {
                for &indicator in &indicators {
                    let value = climate_grid_synthetic::generate(
                        indicator,
                        location.latitude,
                        location.longitude,
                        scenario,
                        period,
                    );

                    rows.push(GridDataPoint {
                        source: SourceFamily::Isimip,
                        indicator_id: indicator,
                        scenario,
                        time_period: period,
                        latitude: location.latitude,
                        longitude: location.longitude,
                        value,
                        unit: indicator.unit().to_string(),
                        model: Some(IMPACT_MODEL_LABEL.to_string()),
                        percentile: Some(50),
                        data_source: Some(IMPACT_DATA_SOURCE.to_string()),
                        updated_at: Utc::now(),
                    });
                }
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use climate_grid_database::db::open_in_memory;
    use climate_grid_source::{DailySeries, SourceError};

    /// Provider returning a fixed baseline and projected series.
    struct FakeProvider {
        baseline: Vec<Option<f64>>,
        projected: Vec<Option<f64>>,
    }

    #[async_trait]
    impl ClimateProvider for FakeProvider {
        async fn fetch_daily(
            &self,
            _latitude: f64,
            _longitude: f64,
            start_date: &str,
            _end_date: &str,
            _variables: &[DailyVariable],
        ) -> Result<DailySeries, SourceError> {
            let values = if start_date == open_meteo::BASELINE_START_DATE {
                self.baseline.clone()
            } else {
                self.projected.clone()
            };
            Ok(DailySeries {
                time: vec![String::new(); values.len()],
                temperature_2m_mean: Some(values.clone()),
                temperature_2m_max: Some(values.clone()),
                temperature_2m_min: Some(values.clone()),
                precipitation_sum: Some(values),
            })
        }
    }

    /// Provider that always fails, for exercising the error path.
    struct DownProvider;

    #[async_trait]
    impl ClimateProvider for DownProvider {
        async fn fetch_daily(
            &self,
            _latitude: f64,
            _longitude: f64,
            _start_date: &str,
            _end_date: &str,
            _variables: &[DailyVariable],
        ) -> Result<DailySeries, SourceError> {
            Err(SourceError::MalformedResponse {
                message: "upstream down".to_string(),
            })
        }
    }

    fn london() -> ImportLocation {
        ImportLocation {
            name: "London".to_string(),
            latitude: 51.5,
            longitude: -0.1,
        }
    }

    #[tokio::test]
    async fn model_import_stores_temperature_anomaly() {
        let db = open_in_memory().await.unwrap();
        let provider = FakeProvider {
            baseline: vec![Some(10.0), Some(12.0), Some(11.0), Some(13.0)], // mean 11.5
            projected: vec![Some(14.0), Some(16.0), Some(15.0)],            // mean 15.0
        };

        let summary = import_model_grid_for_locations(
            db.as_ref(),
            &provider,
            &[london()],
            &[Scenario::Ssp245],
            &[TimePeriod::P2050],
            &ImportOptions::default(),
            None,
        )
        .await;

        assert_eq!(summary.errors, 0);
        assert!(summary.imported >= 10);

        let rows = queries::query_box(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            (51.0, 52.0),
            (-1.0, 1.0),
        )
        .await
        .unwrap();

        let tas = rows
            .iter()
            .find(|r| r.indicator_id == Indicator::Tas)
            .expect("tas row missing");
        assert!((tas.value - 3.5).abs() < 1e-9, "anomaly was {}", tas.value);
        assert_eq!(tas.model.as_deref(), Some("MRI-AGCM3-2-S"));
        assert_eq!(tas.percentile, Some(50));
    }

    #[tokio::test]
    async fn fetch_failures_are_counted_not_fatal() {
        let db = open_in_memory().await.unwrap();

        let summary = import_model_grid_for_locations(
            db.as_ref(),
            &DownProvider,
            &[london()],
            &[Scenario::Ssp126, Scenario::Ssp585],
            &[TimePeriod::P2050],
            &ImportOptions::default(),
            None,
        )
        .await;

        // Two (scenario, period) fetches failed; the run still completed.
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.errors, 2);
    }

    #[tokio::test]
    async fn cancellation_stops_the_run_early() {
        let db = open_in_memory().await.unwrap();
        let cancel = Arc::new(AtomicBool::new(true));
        let options = ImportOptions {
            cancel: Some(cancel),
            ..ImportOptions::default()
        };

        let provider = FakeProvider {
            baseline: vec![Some(10.0)],
            projected: vec![Some(15.0)],
        };

        let summary = import_model_grid_for_locations(
            db.as_ref(),
            &provider,
            &[london()],
            &[Scenario::Ssp245],
            &[TimePeriod::P2050],
            &options,
            None,
        )
        .await;

        assert_eq!(summary, ImportSummary::default());
    }

    #[tokio::test]
    async fn impact_import_writes_deterministic_rows() {
        let db = open_in_memory().await.unwrap();

        let first = import_impact_grid_for_locations(
            db.as_ref(),
            &[london()],
            &[Scenario::Ssp370],
            &[TimePeriod::P2050],
        )
        .await;
        assert_eq!(first.imported, 8);

        let rows = queries::query_box(
            db.as_ref(),
            SourceFamily::Isimip,
            Scenario::Ssp370,
            TimePeriod::P2050,
            (51.0, 52.0),
            (-1.0, 1.0),
        )
        .await
        .unwrap();
        let flood_a = rows
            .iter()
            .find(|r| r.indicator_id == Indicator::FloodDepth)
            .unwrap()
            .value;

        // Re-import replaces the cell with identical values.
        let second = import_impact_grid_for_locations(
            db.as_ref(),
            &[london()],
            &[Scenario::Ssp370],
            &[TimePeriod::P2050],
        )
        .await;
        assert_eq!(second.imported, 8);

        let rows = queries::query_box(
            db.as_ref(),
            SourceFamily::Isimip,
            Scenario::Ssp370,
            TimePeriod::P2050,
            (51.0, 52.0),
            (-1.0, 1.0),
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 8);
        let flood_b = rows
            .iter()
            .find(|r| r.indicator_id == Indicator::FloodDepth)
            .unwrap()
            .value;
        assert!((flood_a - flood_b).abs() < f64::EPSILON);
    }
}
