//! Nearest-grid-point resolution over the sparse import grid.
//!
//! Grid points are irregularly placed (seeded at major cities), so a
//! query location rarely sits on one exactly. Resolution is two-phase:
//! a cheap index-friendly bounding-box prefilter in SQL, then planar
//! Euclidean distance over the candidates in memory. Geodesic distance
//! is deliberately not used; at the grid's density the planar
//! approximation picks the same cell.

use climate_grid_database::{DbError, queries};
use climate_grid_database_models::{BoundingBox, GridDataPoint};
use climate_grid_hazard_models::{Indicator, LocationQuery, Scenario, SourceFamily, TimePeriod};
use switchy_database::Database;

/// The winning grid point of a nearest-neighbor lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// Grid cell latitude.
    pub latitude: f64,
    /// Grid cell longitude.
    pub longitude: f64,
    /// Planar distance from the query location, in degrees.
    pub distance: f64,
}

/// All indicator rows recorded at the nearest grid cell.
#[derive(Debug, Clone, Default)]
pub struct GridCellData {
    /// Rows at the winning coordinate pair, optionally filtered to the
    /// requested indicators. Empty when nothing is in radius.
    pub rows: Vec<GridDataPoint>,
    /// The winning grid point, or `None` when nothing is in radius.
    pub nearest: Option<NearestPoint>,
}

/// Planar Euclidean distance in degree space.
fn planar_distance(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    ((lat_a - lat_b).powi(2) + (lon_a - lon_b).powi(2)).sqrt()
}

/// Resolves a query location to its nearest stored grid cell and returns
/// all indicator rows recorded there.
///
/// Candidates are prefiltered to the axis-aligned box
/// `[lat−R, lat+R] × [lon−R, lon+R]`; the minimum-distance candidate
/// wins. Ties are broken by storage order: the comparison is strictly
/// `<`, so the first-encountered candidate (lowest insertion id) keeps
/// the win. An empty box is a normal outcome, not an error: callers get
/// empty rows and a `None` nearest point.
///
/// # Errors
///
/// Returns [`DbError`] only if the underlying box query fails.
pub async fn nearest_grid_data(
    db: &dyn Database,
    source: SourceFamily,
    scenario: Scenario,
    time_period: TimePeriod,
    location: &LocationQuery,
    indicator_filter: Option<&[Indicator]>,
) -> Result<GridCellData, DbError> {
    let bbox = BoundingBox::around(location.latitude, location.longitude, location.radius());

    let candidates = queries::query_box(
        db,
        source,
        scenario,
        time_period,
        (bbox.south, bbox.north),
        (bbox.west, bbox.east),
    )
    .await?;

    if candidates.is_empty() {
        return Ok(GridCellData::default());
    }

    let mut nearest: Option<NearestPoint> = None;
    for row in &candidates {
        let distance =
            planar_distance(row.latitude, row.longitude, location.latitude, location.longitude);
        if nearest.is_none_or(|n| distance < n.distance) {
            nearest = Some(NearestPoint {
                latitude: row.latitude,
                longitude: row.longitude,
                distance,
            });
        }
    }

    let Some(winner) = nearest else {
        return Ok(GridCellData::default());
    };

    #[allow(clippy::float_cmp)] // exact stored coordinates, not arithmetic
    let rows = candidates
        .into_iter()
        .filter(|r| r.latitude == winner.latitude && r.longitude == winner.longitude)
        .filter(|r| indicator_filter.is_none_or(|wanted| wanted.contains(&r.indicator_id)))
        .collect();

    Ok(GridCellData {
        rows,
        nearest: Some(winner),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use climate_grid_database::db::open_in_memory;

    fn point(indicator: Indicator, lat: f64, lon: f64, value: f64) -> GridDataPoint {
        GridDataPoint {
            source: SourceFamily::Cmip6,
            indicator_id: indicator,
            scenario: Scenario::Ssp245,
            time_period: TimePeriod::P2050,
            latitude: lat,
            longitude: lon,
            value,
            unit: indicator.unit().to_string(),
            model: None,
            percentile: Some(50),
            data_source: None,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn picks_nearest_point_with_all_its_rows() {
        let db = open_in_memory().await.unwrap();
        queries::upsert_batch(
            db.as_ref(),
            &[
                point(Indicator::Tas, 51.5, -0.1, 2.1),
                point(Indicator::Hd35, 51.5, -0.1, 14.0),
                point(Indicator::Tas, 48.9, 2.3, 2.6),
                point(Indicator::Hd35, 48.9, 2.3, 20.0),
            ],
        )
        .await
        .unwrap();

        let query = LocationQuery::new("office", 51.0, 0.0);
        let cell = nearest_grid_data(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &query,
            None,
        )
        .await
        .unwrap();

        let nearest = cell.nearest.unwrap();
        assert!((nearest.latitude - 51.5).abs() < f64::EPSILON);
        assert!((nearest.longitude - -0.1).abs() < f64::EPSILON);
        assert_eq!(cell.rows.len(), 2, "expected every indicator at the cell");
        assert!(cell.rows.iter().all(|r| (r.latitude - 51.5).abs() < f64::EPSILON));
    }

    #[tokio::test]
    async fn indicator_filter_narrows_the_cell_rows() {
        let db = open_in_memory().await.unwrap();
        queries::upsert_batch(
            db.as_ref(),
            &[
                point(Indicator::Tas, 51.5, -0.1, 2.1),
                point(Indicator::Hd35, 51.5, -0.1, 14.0),
            ],
        )
        .await
        .unwrap();

        let query = LocationQuery::new("office", 51.0, 0.0);
        let cell = nearest_grid_data(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &query,
            Some(&[Indicator::Tas]),
        )
        .await
        .unwrap();

        assert_eq!(cell.rows.len(), 1);
        assert_eq!(cell.rows[0].indicator_id, Indicator::Tas);
    }

    #[tokio::test]
    async fn nothing_in_radius_is_empty_not_an_error() {
        let db = open_in_memory().await.unwrap();
        queries::upsert_batch(db.as_ref(), &[point(Indicator::Tas, 51.5, -0.1, 2.1)])
            .await
            .unwrap();

        // Sydney is nowhere near the only stored point.
        let query = LocationQuery::new("sydney", -33.9, 151.2);
        let cell = nearest_grid_data(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &query,
            None,
        )
        .await
        .unwrap();

        assert!(cell.rows.is_empty());
        assert!(cell.nearest.is_none());
    }

    #[tokio::test]
    async fn equidistant_tie_goes_to_storage_order() {
        let db = open_in_memory().await.unwrap();
        // Two points symmetric about the query latitude.
        queries::upsert_batch(
            db.as_ref(),
            &[
                point(Indicator::Tas, 52.0, 0.0, 1.0),
                point(Indicator::Tas, 50.0, 0.0, 2.0),
            ],
        )
        .await
        .unwrap();

        let query = LocationQuery::new("between", 51.0, 0.0);
        let cell = nearest_grid_data(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &query,
            None,
        )
        .await
        .unwrap();

        // First-inserted wins the tie.
        let nearest = cell.nearest.unwrap();
        assert!((nearest.latitude - 52.0).abs() < f64::EPSILON);
        assert_eq!(cell.rows.len(), 1);
        assert!((cell.rows[0].value - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn radius_bounds_the_prefilter() {
        let db = open_in_memory().await.unwrap();
        queries::upsert_batch(db.as_ref(), &[point(Indicator::Tas, 51.5, -0.1, 2.1)])
            .await
            .unwrap();

        // The stored point is ~2.06° away; a 1° radius misses it.
        let query = LocationQuery {
            search_radius: Some(1.0),
            ..LocationQuery::new("close", 50.0, 1.0)
        };
        let cell = nearest_grid_data(
            db.as_ref(),
            SourceFamily::Cmip6,
            Scenario::Ssp245,
            TimePeriod::P2050,
            &query,
            None,
        )
        .await
        .unwrap();
        assert!(cell.nearest.is_none());
    }
}
