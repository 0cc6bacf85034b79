//! Grid store query functions.
//!
//! All writes go through [`upsert_batch`]: delete the rows at each
//! affected grid-cell key, then insert the replacement set. There is no
//! row-level UPDATE anywhere, which is what guarantees a re-import never
//! leaves a cell with a mix of stale and fresh indicators.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use climate_grid_database_models::{BoundingBox, GridCellKey, GridDataPoint, GridStats};
use climate_grid_hazard_models::{Indicator, Scenario, SourceFamily, TimePeriod};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Rows per multi-row INSERT statement. Bounds statement size and the
/// number of bound parameters (12 per row).
const INSERT_CHUNK_SIZE: usize = 500;

/// Columns selected by every row query, in [`parse_row`] order.
const ROW_COLUMNS: &str = "source, indicator_id, scenario, time_period, latitude, longitude, \
     value, unit, model, percentile, data_source, updated_at";

/// Replaces grid data in batch.
///
/// Points are grouped by their (source, scenario, `time_period`,
/// latitude, longitude) cell key. Existing rows at each key are deleted,
/// then the new rows are inserted in chunks of [`INSERT_CHUNK_SIZE`].
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError`] if any delete or insert statement fails. A failed
/// chunk aborts the remainder of this call; completed chunks stay
/// written.
pub async fn upsert_batch(db: &dyn Database, points: &[GridDataPoint]) -> Result<u64, DbError> {
    if points.is_empty() {
        return Ok(0);
    }

    // Collect the distinct cell keys. Coordinates are formatted into the
    // dedup tag; identical f64 values format identically, and only exact
    // key matches are ever re-imported together.
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut cells: Vec<GridCellKey> = Vec::new();
    for point in points {
        let tag = format!(
            "{}|{}|{}|{}|{}",
            point.source, point.scenario, point.time_period, point.latitude, point.longitude
        );
        if seen.insert(tag) {
            cells.push(point.cell_key());
        }
    }

    for cell in &cells {
        db.exec_raw_params(
            "DELETE FROM climate_grid_data
             WHERE source = ? AND scenario = ? AND time_period = ?
               AND latitude = ? AND longitude = ?",
            &[
                DatabaseValue::String(cell.source.to_string()),
                DatabaseValue::String(cell.scenario.to_string()),
                DatabaseValue::String(cell.time_period.to_string()),
                DatabaseValue::Real64(cell.latitude),
                DatabaseValue::Real64(cell.longitude),
            ],
        )
        .await?;
    }

    let mut inserted = 0u64;

    for chunk in points.chunks(INSERT_CHUNK_SIZE) {
        let mut sql = format!("INSERT INTO climate_grid_data ({ROW_COLUMNS}) VALUES ");
        let mut params: Vec<DatabaseValue> = Vec::with_capacity(chunk.len() * 12);

        for (i, point) in chunk.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str("(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
            params.push(DatabaseValue::String(point.source.to_string()));
            params.push(DatabaseValue::String(point.indicator_id.to_string()));
            params.push(DatabaseValue::String(point.scenario.to_string()));
            params.push(DatabaseValue::String(point.time_period.to_string()));
            params.push(DatabaseValue::Real64(point.latitude));
            params.push(DatabaseValue::Real64(point.longitude));
            params.push(DatabaseValue::Real64(point.value));
            params.push(DatabaseValue::String(point.unit.clone()));
            params.push(opt_str(point.model.as_deref()));
            params.push(
                point
                    .percentile
                    .map_or(DatabaseValue::Null, |p| DatabaseValue::Int64(i64::from(p))),
            );
            params.push(opt_str(point.data_source.as_deref()));
            params.push(DatabaseValue::String(point.updated_at.to_rfc3339()));
        }

        inserted += db.exec_raw_params(&sql, &params).await?;
    }

    Ok(inserted)
}

/// Returns all rows for (source, scenario, period) whose coordinates fall
/// in the inclusive box, in insertion order.
///
/// Insertion order is load-bearing: the spatial query engine breaks
/// distance ties by taking the first row it encounters.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn query_box(
    db: &dyn Database,
    source: SourceFamily,
    scenario: Scenario,
    time_period: TimePeriod,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> Result<Vec<GridDataPoint>, DbError> {
    let sql = format!(
        "SELECT {ROW_COLUMNS} FROM climate_grid_data
         WHERE source = ? AND scenario = ? AND time_period = ?
           AND latitude BETWEEN ? AND ?
           AND longitude BETWEEN ? AND ?
         ORDER BY id"
    );

    let rows = db
        .query_raw_params(
            &sql,
            &[
                DatabaseValue::String(source.to_string()),
                DatabaseValue::String(scenario.to_string()),
                DatabaseValue::String(time_period.to_string()),
                DatabaseValue::Real64(lat_range.0),
                DatabaseValue::Real64(lat_range.1),
                DatabaseValue::Real64(lon_range.0),
                DatabaseValue::Real64(lon_range.1),
            ],
        )
        .await?;

    Ok(rows.iter().filter_map(parse_row).collect())
}

/// Returns all rows for a single indicator inside a bounding box, for
/// map overlay rendering.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn query_by_indicator(
    db: &dyn Database,
    source: SourceFamily,
    indicator: Indicator,
    scenario: Scenario,
    time_period: TimePeriod,
    bounds: &BoundingBox,
) -> Result<Vec<GridDataPoint>, DbError> {
    let sql = format!(
        "SELECT {ROW_COLUMNS} FROM climate_grid_data
         WHERE source = ? AND indicator_id = ? AND scenario = ? AND time_period = ?
           AND latitude BETWEEN ? AND ?
           AND longitude BETWEEN ? AND ?
         ORDER BY id"
    );

    let rows = db
        .query_raw_params(
            &sql,
            &[
                DatabaseValue::String(source.to_string()),
                DatabaseValue::String(indicator.to_string()),
                DatabaseValue::String(scenario.to_string()),
                DatabaseValue::String(time_period.to_string()),
                DatabaseValue::Real64(bounds.south),
                DatabaseValue::Real64(bounds.north),
                DatabaseValue::Real64(bounds.west),
                DatabaseValue::Real64(bounds.east),
            ],
        )
        .await?;

    Ok(rows.iter().filter_map(parse_row).collect())
}

/// Deletes every row belonging to a source family. Used before a
/// wholesale impact-grid re-import.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub async fn delete_source(db: &dyn Database, source: SourceFamily) -> Result<u64, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM climate_grid_data WHERE source = ?",
            &[DatabaseValue::String(source.to_string())],
        )
        .await?;

    Ok(deleted)
}

/// Returns aggregate counts over the grid store.
///
/// # Errors
///
/// Returns [`DbError`] if any of the count queries fail.
pub async fn stats(db: &dyn Database) -> Result<GridStats, DbError> {
    let cmip6_count = count_source(db, SourceFamily::Cmip6).await?;
    let isimip_count = count_source(db, SourceFamily::Isimip).await?;

    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as cnt FROM
             (SELECT DISTINCT latitude, longitude FROM climate_grid_data)",
            &[],
        )
        .await?;
    let locations: i64 = rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0));

    let rows = db
        .query_raw_params("SELECT DISTINCT scenario FROM climate_grid_data", &[])
        .await?;
    let mut scenarios: Vec<Scenario> = rows
        .iter()
        .filter_map(|r| {
            let s: String = r.to_value("scenario").unwrap_or_default();
            s.parse().ok()
        })
        .collect();
    scenarios.sort_unstable();

    let rows = db
        .query_raw_params("SELECT DISTINCT time_period FROM climate_grid_data", &[])
        .await?;
    let mut time_periods: Vec<TimePeriod> = rows
        .iter()
        .filter_map(|r| {
            let s: String = r.to_value("time_period").unwrap_or_default();
            s.parse().ok()
        })
        .collect();
    time_periods.sort_unstable();

    Ok(GridStats {
        cmip6_count,
        isimip_count,
        locations,
        scenarios,
        time_periods,
    })
}

async fn count_source(db: &dyn Database, source: SourceFamily) -> Result<i64, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT COUNT(*) as cnt FROM climate_grid_data WHERE source = ?",
            &[DatabaseValue::String(source.to_string())],
        )
        .await?;

    Ok(rows.first().map_or(0, |r| r.to_value("cnt").unwrap_or(0)))
}

/// Converts an `Option<&str>` to a [`DatabaseValue`], using `Null` for
/// `None`.
fn opt_str(value: Option<&str>) -> DatabaseValue {
    value.map_or(DatabaseValue::Null, |s| {
        DatabaseValue::String(s.to_string())
    })
}

/// Parses a stored row into a [`GridDataPoint`].
///
/// Rows with unparseable enum columns are skipped with a warning rather
/// than failing the whole query. A schema drift should degrade reads,
/// not break them.
fn parse_row(row: &switchy_database::Row) -> Option<GridDataPoint> {
    let source_str: String = row.to_value("source").unwrap_or_default();
    let indicator_str: String = row.to_value("indicator_id").unwrap_or_default();
    let scenario_str: String = row.to_value("scenario").unwrap_or_default();
    let period_str: String = row.to_value("time_period").unwrap_or_default();

    let (Ok(source), Ok(indicator_id), Ok(scenario), Ok(time_period)) = (
        source_str.parse::<SourceFamily>(),
        indicator_str.parse::<Indicator>(),
        scenario_str.parse::<Scenario>(),
        period_str.parse::<TimePeriod>(),
    ) else {
        log::warn!(
            "Skipping grid row with unrecognized key: \
             source={source_str} indicator={indicator_str} \
             scenario={scenario_str} period={period_str}"
        );
        return None;
    };

    let percentile: Option<i64> = row.to_value("percentile").unwrap_or(None);
    let updated_at_str: String = row.to_value("updated_at").unwrap_or_default();
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |d| d.with_timezone(&Utc));

    Some(GridDataPoint {
        source,
        indicator_id,
        scenario,
        time_period,
        latitude: row.to_value("latitude").unwrap_or(0.0),
        longitude: row.to_value("longitude").unwrap_or(0.0),
        value: row.to_value("value").unwrap_or(0.0),
        unit: row.to_value("unit").unwrap_or_default(),
        model: row.to_value("model").unwrap_or(None),
        percentile: percentile.and_then(|p| u8::try_from(p).ok()),
        data_source: row.to_value("data_source").unwrap_or(None),
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn point(
        source: SourceFamily,
        indicator_id: Indicator,
        lat: f64,
        lon: f64,
        value: f64,
    ) -> GridDataPoint {
        GridDataPoint {
            source,
            indicator_id,
            scenario: Scenario::Ssp245,
            time_period: TimePeriod::P2050,
            latitude: lat,
            longitude: lon,
            value,
            unit: indicator_id.unit().to_string(),
            model: Some("MRI-AGCM3-2-S".to_string()),
            percentile: Some(50),
            data_source: Some("test".to_string()),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_then_query_box_round_trips() {
        let db = open_in_memory().await.unwrap();

        let points = vec![
            point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.1),
            point(SourceFamily::Cmip6, Indicator::Hd35, 51.5, -0.1, 14.0),
        ];
        let inserted = upsert_batch(db.as_ref(), &points).await.unwrap();
        assert_eq!(inserted, 2);

        let rows = query_box(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            (50.0, 53.0),
            (-2.0, 2.0),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].indicator_id, Indicator::Tas);
        assert!((rows[0].value - 2.1).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn reimport_leaves_no_stale_indicators_at_key() {
        let db = open_in_memory().await.unwrap();

        let original = vec![
            point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.1),
            point(SourceFamily::Cmip6, Indicator::Hd35, 51.5, -0.1, 14.0),
            point(SourceFamily::Cmip6, Indicator::Cdd, 51.5, -0.1, 22.0),
        ];
        upsert_batch(db.as_ref(), &original).await.unwrap();

        // Re-import the same cell with a different (smaller) indicator set.
        let replacement = vec![point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.4)];
        upsert_batch(db.as_ref(), &replacement).await.unwrap();

        let rows = query_box(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            (51.0, 52.0),
            (-1.0, 1.0),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1, "stale indicators survived re-import");
        assert_eq!(rows[0].indicator_id, Indicator::Tas);
        assert!((rows[0].value - 2.4).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn reimport_does_not_touch_other_cells() {
        let db = open_in_memory().await.unwrap();

        upsert_batch(
            db.as_ref(),
            &[
                point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.1),
                point(SourceFamily::Cmip6, Indicator::Tas, 48.9, 2.3, 2.6),
            ],
        )
        .await
        .unwrap();

        upsert_batch(
            db.as_ref(),
            &[point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 3.0)],
        )
        .await
        .unwrap();

        let rows = query_box(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            (45.0, 55.0),
            (-5.0, 5.0),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 2);
        let paris = rows
            .iter()
            .find(|r| (r.latitude - 48.9).abs() < f64::EPSILON)
            .unwrap();
        assert!((paris.value - 2.6).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn query_by_indicator_respects_bounds() {
        let db = open_in_memory().await.unwrap();

        upsert_batch(
            db.as_ref(),
            &[
                point(SourceFamily::Isimip, Indicator::FloodDepth, 51.5, -0.1, 1.2),
                point(SourceFamily::Isimip, Indicator::FloodDepth, 35.7, 139.7, 2.5),
                point(SourceFamily::Isimip, Indicator::WaterStress, 51.5, -0.1, 40.0),
            ],
        )
        .await
        .unwrap();

        let rows = query_by_indicator(
            db.as_ref(),
            SourceFamily::Isimip,
            Indicator::FloodDepth,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &BoundingBox::new(60.0, 40.0, 10.0, -10.0),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert!((rows[0].value - 1.2).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn delete_source_clears_only_that_family() {
        let db = open_in_memory().await.unwrap();

        upsert_batch(
            db.as_ref(),
            &[
                point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.1),
                point(SourceFamily::Isimip, Indicator::FloodDepth, 51.5, -0.1, 1.2),
            ],
        )
        .await
        .unwrap();

        let deleted = delete_source(db.as_ref(), SourceFamily::Isimip)
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let s = stats(db.as_ref()).await.unwrap();
        assert_eq!(s.cmip6_count, 1);
        assert_eq!(s.isimip_count, 0);
    }

    #[tokio::test]
    async fn stats_counts_distinct_dimensions() {
        let db = open_in_memory().await.unwrap();

        let mut p1 = point(SourceFamily::Cmip6, Indicator::Tas, 51.5, -0.1, 2.1);
        p1.scenario = Scenario::Ssp126;
        let p2 = point(SourceFamily::Cmip6, Indicator::Tas, 48.9, 2.3, 2.6);
        upsert_batch(db.as_ref(), &[p1, p2]).await.unwrap();

        let s = stats(db.as_ref()).await.unwrap();
        assert_eq!(s.cmip6_count, 2);
        assert_eq!(s.locations, 2);
        assert_eq!(s.scenarios, vec![Scenario::Ssp126, Scenario::Ssp245]);
        assert_eq!(s.time_periods, vec![TimePeriod::P2050]);
    }
}
