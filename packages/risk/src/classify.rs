//! Ordinal risk classification of indicator values.

use climate_grid_hazard_models::{Indicator, Polarity, RiskLevel};

/// Fallback threshold vector for indicators without a tuned one.
///
/// Every cataloged indicator currently carries an explicit vector, so
/// this only applies to ad-hoc [`classify_against`] callers (e.g.
/// overlay experiments) that have no tuned bands yet.
pub const DEFAULT_THRESHOLDS: [f64; 4] = [25.0, 50.0, 75.0, 90.0];

/// Per-indicator classification thresholds.
///
/// Most vectors ascend with severity; the negative-is-bad indicators
/// carry descending negative thresholds that [`classify_against`]
/// walks with inverted comparisons. Values are tuned per indicator
/// unit (°C of warming, days/year, mm, percent, ...).
#[must_use]
pub const fn threshold_vector(indicator: Indicator) -> [f64; 4] {
    match indicator {
        Indicator::Tas | Indicator::Tasmin => [1.0, 2.0, 3.0, 4.0],
        Indicator::Tasmax => [2.0, 4.0, 6.0, 8.0],
        Indicator::Hd35 => [10.0, 30.0, 60.0, 100.0],
        Indicator::Hd40 => [5.0, 15.0, 30.0, 60.0],
        Indicator::Hwf => [2.0, 5.0, 10.0, 20.0],
        Indicator::Pr => [-0.5, -1.0, -2.0, -3.0],
        Indicator::Cdd => [30.0, 60.0, 90.0, 120.0],
        Indicator::DroughtSeverity => [-1.0, -1.5, -2.0, -2.5],
        Indicator::R95p => [50.0, 100.0, 200.0, 400.0],
        Indicator::FloodDepth => [0.5, 1.0, 2.0, 4.0],
        Indicator::Slr => [0.2, 0.4, 0.6, 1.0],
        Indicator::WaterStress | Indicator::WildfireRisk => [20.0, 40.0, 60.0, 80.0],
        Indicator::CropYieldChange => [-10.0, -20.0, -30.0, -50.0],
        Indicator::TropicalCyclone => [33.0, 50.0, 70.0, 100.0],
        Indicator::RiverDischarge => [-20.0, -40.0, 50.0, 100.0],
        Indicator::HeatMortality => [5.0, 20.0, 50.0, 100.0],
    }
}

/// Classifies a raw indicator value into an ordinal risk level.
#[must_use]
pub fn classify(indicator: Indicator, value: f64) -> RiskLevel {
    classify_against(&threshold_vector(indicator), indicator.polarity(), value)
}

/// Classifies `value` against an explicit threshold vector.
///
/// Higher-is-worse uses strict `<` bands: a value equal to the first
/// threshold is already `medium`. Lower-is-worse returns `low` for any
/// non-negative value, then escalates as the value passes each
/// (negative) threshold.
#[must_use]
pub fn classify_against(levels: &[f64; 4], polarity: Polarity, value: f64) -> RiskLevel {
    match polarity {
        Polarity::LowerIsWorse => {
            if value >= 0.0 || value > levels[0] {
                RiskLevel::Low
            } else if value > levels[1] {
                RiskLevel::Medium
            } else if value > levels[2] {
                RiskLevel::High
            } else if value > levels[3] {
                RiskLevel::VeryHigh
            } else {
                RiskLevel::Extreme
            }
        }
        Polarity::HigherIsWorse => {
            if value < levels[0] {
                RiskLevel::Low
            } else if value < levels[1] {
                RiskLevel::Medium
            } else if value < levels[2] {
                RiskLevel::High
            } else if value < levels[3] {
                RiskLevel::VeryHigh
            } else {
                RiskLevel::Extreme
            }
        }
    }
}
