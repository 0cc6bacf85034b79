#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! API request and response types for the climate grid server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the catalog and persistence types to allow independent evolution
//! of the wire contract.

use chrono::{DateTime, Utc};
use climate_grid_database_models::BoundingBox;
use climate_grid_hazard_models::{
    Indicator, IndicatorCategory, LocationQuery, ProvenanceTier, RiskDataPoint, RiskLevel,
    Scenario, SourceFamily, TimePeriod,
};
use serde::{Deserialize, Serialize};

/// A location in API requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    /// Caller-assigned identifier echoed back in risk data.
    pub id: String,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Optional nearest-neighbor search radius in degrees.
    pub search_radius: Option<f64>,
}

impl From<ApiLocation> for LocationQuery {
    fn from(loc: ApiLocation) -> Self {
        Self {
            id: loc.id,
            name: loc.name,
            latitude: loc.latitude,
            longitude: loc.longitude,
            search_radius: loc.search_radius,
        }
    }
}

impl From<&LocationQuery> for ApiLocation {
    fn from(loc: &LocationQuery) -> Self {
        Self {
            id: loc.id.clone(),
            name: loc.name.clone(),
            latitude: loc.latitude,
            longitude: loc.longitude,
            search_radius: loc.search_radius,
        }
    }
}

/// An indicator catalog entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIndicator {
    /// Stable wire id (e.g. `hd35`).
    pub id: Indicator,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Reporting unit.
    pub unit: String,
    /// Hazard category.
    pub category: IndicatorCategory,
    /// Producing source family.
    pub source: SourceFamily,
}

impl From<Indicator> for ApiIndicator {
    fn from(indicator: Indicator) -> Self {
        Self {
            id: indicator,
            name: indicator.display_name().to_string(),
            description: indicator.description().to_string(),
            unit: indicator.unit().to_string(),
            category: indicator.category(),
            source: indicator.source_family(),
        }
    }
}

/// A scenario catalog entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScenario {
    /// Stable wire id (e.g. `ssp245`).
    pub id: Scenario,
    /// Conventional name (e.g. `SSP2-4.5`).
    pub name: String,
    /// One-line description.
    pub description: String,
}

impl From<Scenario> for ApiScenario {
    fn from(scenario: Scenario) -> Self {
        Self {
            id: scenario,
            name: scenario.display_name().to_string(),
            description: scenario.description().to_string(),
        }
    }
}

/// A time-period catalog entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTimePeriod {
    /// Stable wire id (e.g. `2050`).
    pub id: TimePeriod,
    /// Span label (e.g. `2040-2059`).
    pub name: String,
    /// Midpoint year.
    pub midpoint: u16,
    /// Whether this is a historic observation window.
    pub is_historic: bool,
}

impl From<TimePeriod> for ApiTimePeriod {
    fn from(period: TimePeriod) -> Self {
        Self {
            id: period,
            name: period.display_name().to_string(),
            midpoint: period.midpoint(),
            is_historic: period.is_historic(),
        }
    }
}

/// Request body of the physical-risk query endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskQueryRequest {
    /// Source family to resolve against.
    pub source: SourceFamily,
    /// Locations to resolve.
    pub locations: Vec<ApiLocation>,
    /// Requested indicators. Empty means the source's full catalog.
    #[serde(default)]
    pub indicator_ids: Vec<Indicator>,
    /// Emissions scenario.
    pub scenario: Scenario,
    /// Time horizon.
    pub time_period: TimePeriod,
}

/// Metadata attached to every risk query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Human-readable provenance label.
    pub source: String,
    /// The fallback tier that produced the data.
    pub provenance: ProvenanceTier,
    /// Emissions scenario resolved.
    pub scenario: Scenario,
    /// Time horizon resolved.
    pub time_period: TimePeriod,
    /// When the response was produced.
    pub last_updated: DateTime<Utc>,
}

/// Response body of the physical-risk query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskQueryResponse {
    /// The locations that were resolved, echoed back.
    pub locations: Vec<ApiLocation>,
    /// Catalog entries for the indicators in `risk_data`.
    pub indicators: Vec<ApiIndicator>,
    /// One entry per resolved (location, indicator) pair.
    pub risk_data: Vec<RiskDataPoint>,
    /// Provenance and scope metadata.
    pub metadata: ResponseMetadata,
}

/// Request body of the overlay endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayRequest {
    /// The indicator to render.
    pub indicator_id: Indicator,
    /// Emissions scenario.
    pub scenario: Scenario,
    /// Time horizon.
    pub time_period: TimePeriod,
    /// Source family to read.
    pub source: SourceFamily,
    /// Geographic bounds of the viewport.
    pub bounds: BoundingBox,
    /// Requested grid resolution in degrees. Accepted for wire
    /// compatibility; stored grid points are returned as-is.
    pub resolution: Option<f64>,
}

/// One cell of the overlay response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayCell {
    /// Cell latitude.
    pub lat: f64,
    /// Cell longitude.
    pub lon: f64,
    /// Indicator value at the cell.
    pub value: f64,
    /// Classified risk level.
    pub risk_level: RiskLevel,
}

/// Request body of the administrative import endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Which source family to import.
    pub source: SourceFamily,
    /// Import only the first N seed locations.
    pub limit_points: Option<usize>,
    /// Restrict to these scenarios.
    pub limit_scenarios: Option<Vec<Scenario>>,
    /// Restrict to these time periods.
    pub limit_periods: Option<Vec<TimePeriod>>,
}

/// Response body of the administrative import endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    /// Rows written to the grid store.
    pub imported: u64,
    /// Units of work that failed.
    pub errors: u64,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
