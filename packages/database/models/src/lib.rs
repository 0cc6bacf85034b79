#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Row and query types for the climate grid store.
//!
//! These are the persistence-facing shapes, separate from the API DTOs so
//! the stored schema and the wire contract can evolve independently.

use chrono::{DateTime, Utc};
use climate_grid_hazard_models::{Indicator, Scenario, SourceFamily, TimePeriod};
use serde::{Deserialize, Serialize};

/// One stored indicator value at a grid cell.
///
/// The tuple (source, indicator, scenario, `time_period`, latitude,
/// longitude) is unique. Rows are never mutated field-by-field: a
/// re-import deletes all rows at a grid-cell key and inserts the fresh
/// set as a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDataPoint {
    /// Which upstream family produced this row.
    pub source: SourceFamily,
    /// The indicator this value belongs to.
    pub indicator_id: Indicator,
    /// Emissions scenario.
    pub scenario: Scenario,
    /// Time horizon.
    pub time_period: TimePeriod,
    /// Grid cell latitude in decimal degrees.
    pub latitude: f64,
    /// Grid cell longitude in decimal degrees.
    pub longitude: f64,
    /// The indicator value in the indicator's unit.
    pub value: f64,
    /// Unit label as stored (denormalized from the catalog).
    pub unit: String,
    /// Upstream model name (e.g. `MRI-AGCM3-2-S`).
    pub model: Option<String>,
    /// Provenance confidence percentile (0-100).
    pub percentile: Option<u8>,
    /// Human-readable provenance label.
    pub data_source: Option<String>,
    /// When this row was written.
    pub updated_at: DateTime<Utc>,
}

impl GridDataPoint {
    /// Returns the grid-cell key this row belongs to. All rows sharing a
    /// key are replaced together on re-import.
    #[must_use]
    pub fn cell_key(&self) -> GridCellKey {
        GridCellKey {
            source: self.source,
            scenario: self.scenario,
            time_period: self.time_period,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// The delete-then-insert replacement key: every indicator row at one
/// grid cell for one (source, scenario, period) shares this key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCellKey {
    /// Which upstream family produced the rows.
    pub source: SourceFamily,
    /// Emissions scenario.
    pub scenario: Scenario,
    /// Time horizon.
    pub time_period: TimePeriod,
    /// Grid cell latitude.
    pub latitude: f64,
    /// Grid cell longitude.
    pub longitude: f64,
}

/// An inclusive geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Northern latitude bound.
    pub north: f64,
    /// Southern latitude bound.
    pub south: f64,
    /// Eastern longitude bound.
    pub east: f64,
    /// Western longitude bound.
    pub west: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its four edges.
    #[must_use]
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Returns the box centered on a point with the given radius in
    /// degrees.
    #[must_use]
    pub const fn around(latitude: f64, longitude: f64, radius_deg: f64) -> Self {
        Self {
            north: latitude + radius_deg,
            south: latitude - radius_deg,
            east: longitude + radius_deg,
            west: longitude - radius_deg,
        }
    }
}

/// Aggregate counts over the grid store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStats {
    /// Rows stored for the model family.
    pub cmip6_count: i64,
    /// Rows stored for the impact family.
    pub isimip_count: i64,
    /// Distinct (latitude, longitude) grid cells.
    pub locations: i64,
    /// Distinct scenarios present.
    pub scenarios: Vec<Scenario>,
    /// Distinct time periods present.
    pub time_periods: Vec<TimePeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_around_is_symmetric() {
        let bbox = BoundingBox::around(51.5, -0.1, 3.0);
        assert!((bbox.north - 54.5).abs() < 1e-9);
        assert!((bbox.south - 48.5).abs() < 1e-9);
        assert!((bbox.east - 2.9).abs() < 1e-9);
        assert!((bbox.west - -3.1).abs() < 1e-9);
    }

    #[test]
    fn cell_key_ignores_indicator() {
        let base = GridDataPoint {
            source: SourceFamily::Cmip6,
            indicator_id: Indicator::Tas,
            scenario: Scenario::Ssp245,
            time_period: TimePeriod::P2050,
            latitude: 51.5,
            longitude: -0.1,
            value: 1.0,
            unit: "\u{b0}C".to_string(),
            model: None,
            percentile: Some(50),
            data_source: None,
            updated_at: Utc::now(),
        };
        let other = GridDataPoint {
            indicator_id: Indicator::Hd35,
            value: 12.0,
            ..base.clone()
        };
        assert_eq!(base.cell_key(), other.cell_key());
    }
}
