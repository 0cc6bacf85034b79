#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Climate hazard indicator catalog and shared enumeration types.
//!
//! This crate defines the canonical set of climate-hazard indicators used
//! across the entire climate-grid system, along with the emissions
//! scenarios, time horizons, and ordinal risk levels every read path
//! reports against. All metadata is static and loaded once; there is no
//! runtime registry.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Ordinal risk level assigned to an indicator value, from 1 (low) to
/// 5 (extreme).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// Level 1: within normal operating conditions.
    Low = 1,
    /// Level 2: elevated, worth monitoring.
    Medium = 2,
    /// Level 3: material physical risk.
    High = 3,
    /// Level 4: severe physical risk.
    VeryHigh = 4,
    /// Level 5: most severe band.
    Extreme = 5,
}

impl RiskLevel {
    /// Returns the numeric value of this risk level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// Upstream data family that produces an indicator.
///
/// The model family derives values from fetched daily climate-model
/// series; the impact family is populated by the deterministic impact
/// grid import.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceFamily {
    /// CMIP6 climate-model projections (daily series, derived indicators).
    Cmip6,
    /// ISIMIP impact-model projections (modeled impact indicators).
    Isimip,
}

impl SourceFamily {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Cmip6, Self::Isimip]
    }
}

/// Whether larger or more negative values represent worse outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger values are worse (e.g. hot days, water stress).
    HigherIsWorse,
    /// More negative values are worse (e.g. crop yield change).
    LowerIsWorse,
}

/// Hazard category groupings for indicators.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IndicatorCategory {
    /// Mean/max/min temperature change.
    Temperature,
    /// Precipitation totals and means.
    Precipitation,
    /// Extreme heat events.
    Extreme,
    /// Dry spells and drought indices.
    Drought,
    /// Inundation and extreme precipitation.
    Flood,
    /// Sea level and coastal exposure.
    Coastal,
    /// Water availability and stress.
    Water,
    /// Crop and yield impacts.
    Agriculture,
    /// Fire weather danger.
    Wildfire,
    /// Tropical cyclone exposure.
    Storm,
    /// Heat-related health impacts.
    Health,
}

/// The canonical climate-hazard indicators.
///
/// Wire ids are snake_case (`tas`, `hd35`, `crop_yield_change`, ...) and
/// stable: they are persisted in the grid store and exposed through the
/// API unchanged.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Indicator {
    // ── Model family (derived from daily series) ────────
    /// Mean near-surface air temperature (warming anomaly).
    Tas,
    /// Maximum near-surface air temperature (warming anomaly).
    Tasmax,
    /// Minimum near-surface air temperature (warming anomaly).
    Tasmin,
    /// Mean daily precipitation.
    Pr,
    /// Days per year above 35°C.
    Hd35,
    /// Days per year above 40°C.
    Hd40,
    /// Longest run of consecutive days with precipitation < 1mm.
    Cdd,
    /// Annual precipitation total above the 95th percentile.
    R95p,
    /// Sea level rise proxy.
    Slr,
    /// Heat wave events per year.
    Hwf,

    // ── Impact family (modeled) ─────────────────────────
    /// Projected flood inundation depth.
    FloodDepth,
    /// Standardized drought severity index (negative is drier).
    DroughtSeverity,
    /// Ratio of water withdrawal to available resources.
    WaterStress,
    /// Projected change in crop yields (negative is loss).
    CropYieldChange,
    /// Fire weather index.
    WildfireRisk,
    /// Tropical cyclone wind exposure.
    TropicalCyclone,
    /// Projected change in river discharge.
    RiverDischarge,
    /// Projected increase in heat-related mortality.
    HeatMortality,
}

impl Indicator {
    /// Returns the human-readable display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Tas => "Mean Temperature",
            Self::Tasmax => "Maximum Temperature",
            Self::Tasmin => "Minimum Temperature",
            Self::Pr => "Precipitation",
            Self::Hd35 => "Hot Days (>35\u{b0}C)",
            Self::Hd40 => "Extreme Heat Days (>40\u{b0}C)",
            Self::Cdd => "Consecutive Dry Days",
            Self::R95p => "Extreme Precipitation",
            Self::Slr => "Sea Level Rise",
            Self::Hwf => "Heat Wave Frequency",
            Self::FloodDepth => "Flood Depth",
            Self::DroughtSeverity => "Drought Severity Index",
            Self::WaterStress => "Water Stress",
            Self::CropYieldChange => "Crop Yield Change",
            Self::WildfireRisk => "Wildfire Risk",
            Self::TropicalCyclone => "Tropical Cyclone Exposure",
            Self::RiverDischarge => "River Discharge Change",
            Self::HeatMortality => "Heat-Related Mortality Risk",
        }
    }

    /// Returns a one-line description of what the indicator measures.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Tas => "Average near-surface air temperature",
            Self::Tasmax => "Maximum near-surface air temperature",
            Self::Tasmin => "Minimum near-surface air temperature",
            Self::Pr => "Total precipitation (rain and snow)",
            Self::Hd35 => "Number of days per year with temperature above 35\u{b0}C",
            Self::Hd40 => "Number of days per year with temperature above 40\u{b0}C",
            Self::Cdd => "Maximum number of consecutive days with precipitation < 1mm",
            Self::R95p => "Annual total precipitation when daily precipitation > 95th percentile",
            Self::Slr => "Projected sea level rise relative to the historical baseline",
            Self::Hwf => "Number of heat wave events per year",
            Self::FloodDepth => "Projected flood inundation depth for given return period",
            Self::DroughtSeverity => {
                "Standardized Precipitation-Evapotranspiration Index (SPEI)"
            }
            Self::WaterStress => "Ratio of water withdrawal to available water resources",
            Self::CropYieldChange => "Projected change in crop yields relative to baseline",
            Self::WildfireRisk => "Fire Weather Index indicating wildfire danger",
            Self::TropicalCyclone => "Exposure to tropical cyclone wind speeds",
            Self::RiverDischarge => "Projected change in river discharge",
            Self::HeatMortality => "Projected increase in heat-related mortality",
        }
    }

    /// Returns the unit the indicator is reported in.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Tas | Self::Tasmax | Self::Tasmin => "\u{b0}C",
            Self::Pr => "mm/day",
            Self::Hd35 | Self::Hd40 => "days/year",
            Self::Cdd => "days",
            Self::R95p => "mm",
            Self::Slr | Self::FloodDepth => "m",
            Self::Hwf => "events/year",
            Self::DroughtSeverity | Self::WildfireRisk => "index",
            Self::WaterStress | Self::CropYieldChange | Self::RiverDischarge => "%",
            Self::TropicalCyclone => "m/s",
            Self::HeatMortality => "deaths/100k",
        }
    }

    /// Returns the hazard category for this indicator.
    #[must_use]
    pub const fn category(self) -> IndicatorCategory {
        match self {
            Self::Tas | Self::Tasmax | Self::Tasmin => IndicatorCategory::Temperature,
            Self::Pr => IndicatorCategory::Precipitation,
            Self::Hd35 | Self::Hd40 | Self::Hwf => IndicatorCategory::Extreme,
            Self::Cdd | Self::DroughtSeverity => IndicatorCategory::Drought,
            Self::R95p | Self::FloodDepth => IndicatorCategory::Flood,
            Self::Slr => IndicatorCategory::Coastal,
            Self::WaterStress | Self::RiverDischarge => IndicatorCategory::Water,
            Self::CropYieldChange => IndicatorCategory::Agriculture,
            Self::WildfireRisk => IndicatorCategory::Wildfire,
            Self::TropicalCyclone => IndicatorCategory::Storm,
            Self::HeatMortality => IndicatorCategory::Health,
        }
    }

    /// Returns which upstream family produces this indicator.
    #[must_use]
    pub const fn source_family(self) -> SourceFamily {
        match self {
            Self::Tas
            | Self::Tasmax
            | Self::Tasmin
            | Self::Pr
            | Self::Hd35
            | Self::Hd40
            | Self::Cdd
            | Self::R95p
            | Self::Slr
            | Self::Hwf => SourceFamily::Cmip6,

            Self::FloodDepth
            | Self::DroughtSeverity
            | Self::WaterStress
            | Self::CropYieldChange
            | Self::WildfireRisk
            | Self::TropicalCyclone
            | Self::RiverDischarge
            | Self::HeatMortality => SourceFamily::Isimip,
        }
    }

    /// Returns whether higher or lower values are worse for this
    /// indicator.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::CropYieldChange | Self::DroughtSeverity => Polarity::LowerIsWorse,
            _ => Polarity::HigherIsWorse,
        }
    }

    /// Returns the deterministic seed for this indicator: the sum of the
    /// wire id's byte values. Feeds the synthetic generator's hash so each
    /// indicator varies independently at the same coordinates.
    #[must_use]
    pub fn seed(self) -> f64 {
        self.as_ref().bytes().map(f64::from).sum()
    }

    /// Returns all indicators produced by the given source family.
    #[must_use]
    pub fn for_source(family: SourceFamily) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|i| i.source_family() == family)
            .collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Tas,
            Self::Tasmax,
            Self::Tasmin,
            Self::Pr,
            Self::Hd35,
            Self::Hd40,
            Self::Cdd,
            Self::R95p,
            Self::Slr,
            Self::Hwf,
            Self::FloodDepth,
            Self::DroughtSeverity,
            Self::WaterStress,
            Self::CropYieldChange,
            Self::WildfireRisk,
            Self::TropicalCyclone,
            Self::RiverDischarge,
            Self::HeatMortality,
        ]
    }
}

/// Emissions/policy pathway identifiers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Scenario {
    /// SSP1-2.6: Sustainability, low emissions.
    Ssp126,
    /// SSP2-4.5: Middle of the Road.
    Ssp245,
    /// SSP3-7.0: Regional Rivalry.
    Ssp370,
    /// SSP5-8.5: Fossil-fueled Development, high emissions.
    Ssp585,
}

impl Scenario {
    /// Returns the conventional display name (e.g. `SSP1-2.6`).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ssp126 => "SSP1-2.6",
            Self::Ssp245 => "SSP2-4.5",
            Self::Ssp370 => "SSP3-7.0",
            Self::Ssp585 => "SSP5-8.5",
        }
    }

    /// Returns a short description of the pathway.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ssp126 => "Sustainability - Low emissions",
            Self::Ssp245 => "Middle of the Road",
            Self::Ssp370 => "Regional Rivalry",
            Self::Ssp585 => "Fossil-fueled Development - High emissions",
        }
    }

    /// Severity multiplier ascending with emissions intensity.
    ///
    /// Used only by the synthetic generator. Real imports derive their
    /// scenario differences from actual data.
    #[must_use]
    pub const fn severity_multiplier(self) -> f64 {
        match self {
            Self::Ssp126 => 0.6,
            Self::Ssp245 => 0.8,
            Self::Ssp370 => 1.2,
            Self::Ssp585 => 1.5,
        }
    }

    /// Returns the scenarios published for a source family. The impact
    /// family runs a reduced scenario set without SSP2-4.5.
    #[must_use]
    pub fn for_source(family: SourceFamily) -> Vec<Self> {
        match family {
            SourceFamily::Cmip6 => Self::all().to_vec(),
            SourceFamily::Isimip => vec![Self::Ssp126, Self::Ssp370, Self::Ssp585],
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Ssp126, Self::Ssp245, Self::Ssp370, Self::Ssp585]
    }
}

/// Multi-decade time horizons, identified by their midpoint decade.
///
/// The first four are historic observation windows; the rest are
/// projections.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimePeriod {
    /// 1970-1989 observation window.
    #[serde(rename = "1980")]
    #[strum(serialize = "1980")]
    P1980,
    /// 1980-1999 observation window.
    #[serde(rename = "1990")]
    #[strum(serialize = "1990")]
    P1990,
    /// 1990-2009 observation window.
    #[serde(rename = "2000")]
    #[strum(serialize = "2000")]
    P2000,
    /// 2000-2019 observation window.
    #[serde(rename = "2010")]
    #[strum(serialize = "2010")]
    P2010,
    /// 2020-2039 projection.
    #[serde(rename = "2030")]
    #[strum(serialize = "2030")]
    P2030,
    /// 2040-2059 projection.
    #[serde(rename = "2050")]
    #[strum(serialize = "2050")]
    P2050,
    /// 2060-2079 projection.
    #[serde(rename = "2070")]
    #[strum(serialize = "2070")]
    P2070,
    /// 2080-2099 projection.
    #[serde(rename = "2090")]
    #[strum(serialize = "2090")]
    P2090,
}

impl TimePeriod {
    /// Returns the span label shown to users (e.g. `2040-2059`).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::P1980 => "1970-1989",
            Self::P1990 => "1980-1999",
            Self::P2000 => "1990-2009",
            Self::P2010 => "2000-2019",
            Self::P2030 => "2020-2039",
            Self::P2050 => "2040-2059",
            Self::P2070 => "2060-2079",
            Self::P2090 => "2080-2099",
        }
    }

    /// Returns the midpoint year of the horizon.
    #[must_use]
    pub const fn midpoint(self) -> u16 {
        match self {
            Self::P1980 => 1980,
            Self::P1990 => 1990,
            Self::P2000 => 2000,
            Self::P2010 => 2010,
            Self::P2030 => 2030,
            Self::P2050 => 2050,
            Self::P2070 => 2070,
            Self::P2090 => 2090,
        }
    }

    /// Whether this horizon is a historic observation window rather than
    /// a projection.
    #[must_use]
    pub const fn is_historic(self) -> bool {
        matches!(self, Self::P1980 | Self::P1990 | Self::P2000 | Self::P2010)
    }

    /// Horizon multiplier ascending with distance into the future.
    ///
    /// Used only by the synthetic generator.
    #[must_use]
    pub const fn horizon_multiplier(self) -> f64 {
        match self {
            Self::P1980 => 0.3,
            Self::P1990 => 0.4,
            Self::P2000 => 0.5,
            Self::P2010 => 0.6,
            Self::P2030 => 0.8,
            Self::P2050 => 1.0,
            Self::P2070 => 1.3,
            Self::P2090 => 1.6,
        }
    }

    /// Returns only the projected (non-historic) horizons, the set the
    /// model-family import covers.
    #[must_use]
    pub fn projected() -> Vec<Self> {
        Self::all().iter().copied().filter(|p| !p.is_historic()).collect()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::P1980,
            Self::P1990,
            Self::P2000,
            Self::P2010,
            Self::P2030,
            Self::P2050,
            Self::P2070,
            Self::P2090,
        ]
    }
}

/// Which fallback tier produced a returned value: the persistent store,
/// a fresh synchronous import, or the deterministic synthetic model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProvenanceTier {
    /// Served from rows already in the grid store; no network call made.
    Stored,
    /// Served after a synchronous scoped import.
    Live,
    /// Served from the deterministic synthetic model.
    Synthetic,
}

/// A location to resolve climate data for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    /// Caller-assigned identifier echoed back in results.
    pub id: String,
    /// Optional human-readable name.
    pub name: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Search radius in degrees for the nearest-grid-point lookup.
    /// Defaults to [`DEFAULT_SEARCH_RADIUS_DEG`] when absent.
    pub search_radius: Option<f64>,
}

/// Default nearest-neighbor search radius in degrees.
pub const DEFAULT_SEARCH_RADIUS_DEG: f64 = 3.0;

impl LocationQuery {
    /// Creates a query with the default search radius.
    #[must_use]
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            latitude,
            longitude,
            search_radius: None,
        }
    }

    /// Returns the effective search radius in degrees.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.search_radius.unwrap_or(DEFAULT_SEARCH_RADIUS_DEG)
    }
}

/// A resolved indicator value for one location. Produced by every read
/// path; never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDataPoint {
    /// The requesting location's id.
    pub location_id: String,
    /// The indicator this value belongs to.
    pub indicator_id: Indicator,
    /// Emissions scenario.
    pub scenario: Scenario,
    /// Time horizon.
    pub time_period: TimePeriod,
    /// The indicator value in the indicator's unit.
    pub value: f64,
    /// Classified ordinal risk level.
    pub risk_level: RiskLevel,
    /// Provenance confidence percentile (0-100).
    pub percentile: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_families_partition_indicators() {
        let cmip = Indicator::for_source(SourceFamily::Cmip6);
        let isimip = Indicator::for_source(SourceFamily::Isimip);
        assert_eq!(cmip.len() + isimip.len(), Indicator::all().len());
        assert_eq!(cmip.len(), 10);
        assert_eq!(isimip.len(), 8);
        for i in &cmip {
            assert!(!isimip.contains(i), "{i:?} in both families");
        }
    }

    #[test]
    fn wire_ids_round_trip() {
        for indicator in Indicator::all() {
            let id = indicator.to_string();
            let parsed: Indicator = id.parse().unwrap();
            assert_eq!(parsed, *indicator);
        }
        assert_eq!(Indicator::CropYieldChange.as_ref(), "crop_yield_change");
        assert_eq!(Indicator::Hd35.as_ref(), "hd35");
    }

    #[test]
    fn every_indicator_has_a_unit() {
        for indicator in Indicator::all() {
            assert!(!indicator.unit().is_empty(), "{indicator:?} missing unit");
        }
    }

    #[test]
    fn negative_is_bad_indicators() {
        assert_eq!(Indicator::CropYieldChange.polarity(), Polarity::LowerIsWorse);
        assert_eq!(Indicator::DroughtSeverity.polarity(), Polarity::LowerIsWorse);
        assert_eq!(Indicator::WaterStress.polarity(), Polarity::HigherIsWorse);
    }

    #[test]
    fn scenario_multipliers_ascend_with_emissions() {
        let mults: Vec<f64> = Scenario::all()
            .iter()
            .map(|s| s.severity_multiplier())
            .collect();
        for pair in mults.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn horizon_multipliers_ascend_into_the_future() {
        let mults: Vec<f64> = TimePeriod::all()
            .iter()
            .map(|p| p.horizon_multiplier())
            .collect();
        for pair in mults.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn period_ids_parse_as_decades() {
        for period in TimePeriod::all() {
            let id = period.to_string();
            let parsed: TimePeriod = id.parse().unwrap();
            assert_eq!(parsed, *period);
            assert_eq!(id, period.midpoint().to_string());
        }
    }

    #[test]
    fn historic_split_matches_midpoints() {
        for period in TimePeriod::all() {
            assert_eq!(period.is_historic(), period.midpoint() < 2020);
        }
        assert_eq!(TimePeriod::projected().len(), 4);
    }

    #[test]
    fn indicator_seed_is_byte_sum() {
        // "pr" = 112 + 114
        let expected = f64::from(u32::from(b'p') + u32::from(b'r'));
        assert!((Indicator::Pr.seed() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn default_radius_applies() {
        let q = LocationQuery::new("loc-1", 51.5, -0.1);
        assert!((q.radius() - DEFAULT_SEARCH_RADIUS_DEG).abs() < f64::EPSILON);
        let q2 = LocationQuery {
            search_radius: Some(1.5),
            ..q
        };
        assert!((q2.radius() - 1.5).abs() < f64::EPSILON);
    }
}
