#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Deterministic synthetic climate indicator model.
//!
//! Produces plausible indicator values when no stored or live data
//! exists. Everything here is a pure function of its arguments, with no
//! clock and no RNG state, so repeated queries for the same location are
//! stable and the output can safely be cached through to the grid store.
//!
//! Synthetic values are modeled projections, not measurements; callers
//! must tag their provenance accordingly.

pub mod hash;

use climate_grid_hazard_models::{Indicator, IndicatorCategory, Scenario, TimePeriod};

pub use hash::seeded_fraction;

/// Coarse climate-zone classification of a coordinate pair.
///
/// These are deliberately crude latitude/longitude heuristics: enough to
/// give hot deserts high water stress and the monsoon belt deep floods,
/// not a climatology.
#[derive(Debug, Clone, Copy)]
pub struct ClimateZone {
    /// |lat| < 23.5°.
    pub tropical: bool,
    /// 23.5° ≤ |lat| < 35°.
    pub subtropical: bool,
    /// 35° ≤ |lat| < 55°.
    pub temperate: bool,
    /// |lat| ≥ 55°.
    pub polar: bool,
    /// 20° < |lat| < 35°, the subtropical high-pressure dry belt.
    pub dry_belt: bool,
    /// South/East Asia monsoon box (5°–35°N, 60°–150°E).
    pub monsoonal: bool,
    /// Northern hemisphere.
    pub northern: bool,
    /// Rough continental-interior longitude band.
    pub continental: bool,
    /// 5° < |lat| < 30°, the latitudes where tropical cyclones track.
    pub cyclone_belt: bool,
    /// Longitude bands of the active cyclone basins (Atlantic/Gulf,
    /// West Pacific, North Indian).
    pub active_basin: bool,
}

impl ClimateZone {
    /// Classifies a coordinate pair.
    #[must_use]
    pub fn from_coords(latitude: f64, longitude: f64) -> Self {
        let abs_lat = latitude.abs();
        let abs_lon = longitude.abs();

        Self {
            tropical: abs_lat < 23.5,
            subtropical: (23.5..35.0).contains(&abs_lat),
            temperate: (35.0..55.0).contains(&abs_lat),
            polar: abs_lat >= 55.0,
            dry_belt: abs_lat > 20.0 && abs_lat < 35.0,
            monsoonal: latitude > 5.0
                && latitude < 35.0
                && longitude > 60.0
                && longitude < 150.0,
            northern: latitude >= 0.0,
            continental: abs_lon > 30.0 && abs_lon < 150.0,
            cyclone_belt: abs_lat > 5.0 && abs_lat < 30.0,
            active_basin: (longitude > -100.0 && longitude < -30.0)
                || longitude > 100.0
                || longitude < -150.0
                || (longitude > 50.0 && longitude < 100.0 && latitude > 0.0),
        }
    }
}

/// Generates a deterministic synthetic value for an indicator at a
/// location under a scenario and time horizon.
///
/// The value is a zone-dependent base magnitude, perturbed by the
/// coordinate hash, scaled by the scenario severity and time-horizon
/// multipliers, and rounded to two decimals.
#[must_use]
pub fn generate(
    indicator: Indicator,
    latitude: f64,
    longitude: f64,
    scenario: Scenario,
    time_period: TimePeriod,
) -> f64 {
    let zone = ClimateZone::from_coords(latitude, longitude);
    let variation = seeded_fraction(latitude, longitude, indicator.seed());

    let base = base_value(indicator, latitude, longitude, zone, variation);

    let scaled = base * scenario.severity_multiplier() * time_period.horizon_multiplier();
    (scaled * 100.0).round() / 100.0
}

/// Deterministic provenance percentile (0-100) for a synthetic value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentile(indicator: Indicator, latitude: f64, longitude: f64) -> u8 {
    let p = (seeded_fraction(latitude, longitude, indicator.seed() + 123.0) * 100.0).round();
    p.clamp(0.0, 100.0) as u8
}

/// Zone-dependent base magnitude (and sign) for one indicator.
///
/// Impact-family indicators get individual heuristics; model-family
/// indicators share category-level ones. The signs matter: drought
/// severity and crop yield are negative-is-bad scales.
fn base_value(
    indicator: Indicator,
    latitude: f64,
    longitude: f64,
    zone: ClimateZone,
    v: f64,
) -> f64 {
    match indicator {
        Indicator::FloodDepth => {
            if zone.monsoonal {
                1.5 + v * 2.0
            } else if zone.tropical {
                0.8 + v * 1.2
            } else {
                0.3 + v * 0.6
            }
        }

        Indicator::DroughtSeverity => {
            if zone.dry_belt {
                -1.8 - v * 1.0
            } else if zone.tropical {
                -0.5 - v * 0.5
            } else {
                -1.0 - v * 0.8
            }
        }

        Indicator::WaterStress => {
            if zone.dry_belt {
                60.0 + v * 35.0
            } else if zone.tropical && !zone.monsoonal {
                30.0 + v * 30.0
            } else {
                15.0 + v * 25.0
            }
        }

        Indicator::CropYieldChange => {
            if zone.tropical {
                -25.0 - v * 25.0
            } else if zone.subtropical {
                -15.0 - v * 20.0
            } else if zone.temperate && zone.northern {
                // Some gains are possible at high northern latitudes.
                -5.0 + v * 15.0
            } else {
                -10.0 - v * 15.0
            }
        }

        Indicator::WildfireRisk => {
            if zone.subtropical && !zone.monsoonal {
                50.0 + v * 40.0
            } else if latitude > 50.0 && latitude < 70.0 {
                // Boreal forest belt.
                40.0 + v * 30.0
            } else {
                20.0 + v * 25.0
            }
        }

        Indicator::TropicalCyclone => {
            if zone.cyclone_belt && zone.active_basin {
                45.0 + v * 50.0
            } else if zone.cyclone_belt {
                15.0 + v * 25.0
            } else {
                5.0 + v * 10.0
            }
        }

        Indicator::RiverDischarge => {
            if zone.monsoonal {
                20.0 + v * 30.0
            } else if zone.dry_belt {
                -30.0 - v * 20.0
            } else {
                -10.0 + v * 25.0
            }
        }

        Indicator::HeatMortality => {
            if zone.tropical {
                25.0 + v * 40.0
            } else if zone.subtropical {
                15.0 + v * 30.0
            } else {
                5.0 + v * 15.0
            }
        }

        _ => base_value_by_category(indicator.category(), latitude, longitude, zone, v),
    }
}

/// Category-level base magnitudes for the model family.
fn base_value_by_category(
    category: IndicatorCategory,
    latitude: f64,
    longitude: f64,
    zone: ClimateZone,
    v: f64,
) -> f64 {
    match category {
        IndicatorCategory::Temperature => {
            // Arctic amplification; continental interiors warm faster.
            if zone.polar {
                3.5 + v * 2.5
            } else if zone.temperate {
                2.0 + if zone.continental { 1.5 } else { 0.5 } + v * 1.5
            } else if zone.subtropical {
                1.5 + v * 1.2
            } else {
                1.2 + v * 0.8
            }
        }

        IndicatorCategory::Extreme => {
            if zone.tropical {
                60.0 + v * 80.0
            } else if zone.subtropical {
                30.0 + v * 50.0
            } else if zone.temperate {
                5.0 + v * 25.0
            } else {
                v * 5.0
            }
        }

        IndicatorCategory::Drought => {
            if zone.dry_belt && zone.continental {
                80.0 + v * 60.0
            } else if zone.dry_belt {
                50.0 + v * 40.0
            } else if zone.tropical {
                20.0 + v * 30.0
            } else {
                30.0 + v * 40.0
            }
        }

        IndicatorCategory::Flood => {
            // No coastline data here; a hash bucket stands in for
            // coastal exposure.
            let coastal = seeded_fraction(latitude, longitude, 999.0) > 0.7;
            if zone.monsoonal {
                100.0 + v * 150.0
            } else if zone.tropical {
                60.0 + v * 80.0
            } else if coastal {
                40.0 + v * 60.0
            } else {
                15.0 + v * 35.0
            }
        }

        IndicatorCategory::Coastal => {
            // Ocean-basin circulation effect varies with longitude.
            let basin_factor = (longitude * 0.05).sin() * 0.15;
            0.3 + basin_factor + v * 0.4
        }

        _ => 20.0 + v * 50.0,
    }
}
