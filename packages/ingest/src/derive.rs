//! Indicator derivation over raw daily series.
//!
//! Pure functions: every derived value is bit-reproducible for a fixed
//! input series. Edge-case semantics here (non-overlapping heat-wave
//! windows, index-based percentile cutoff) are part of the stored-data
//! contract and must not be "improved" casually.

use climate_grid_hazard_models::{Indicator, TimePeriod};
use climate_grid_source::DailyVariable;

/// Daily mean temperature above which a day counts toward a heat wave.
pub const HEAT_WAVE_THRESHOLD_C: f64 = 32.0;

/// Consecutive qualifying days that make one heat-wave event.
pub const HEAT_WAVE_RUN_DAYS: u32 = 3;

/// Daily precipitation below which a day counts as dry.
pub const DRY_DAY_THRESHOLD_MM: f64 = 1.0;

/// Scale factor of the coastal proxy. A crude linear scaling of mean
/// temperature. An approximation, not a physical sea-level model.
pub const COASTAL_PROXY_SCALE: f64 = 0.02;

const DAYS_PER_YEAR: f64 = 365.0;

/// Arithmetic mean of a series; `0.0` for an empty series.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Days exceeding `threshold`, normalized to a days-per-year rate so
/// series of any length are comparable.
#[must_use]
pub fn days_per_year_above(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let years = values.len() as f64 / DAYS_PER_YEAR;
    #[allow(clippy::cast_precision_loss)]
    let count = values.iter().filter(|&&t| t > threshold).count() as f64;
    count / years
}

/// Heat-wave events per year.
///
/// A consecutive-day counter increments while the daily mean exceeds
/// [`HEAT_WAVE_THRESHOLD_C`] and resets each time it reaches
/// [`HEAT_WAVE_RUN_DAYS`], counting one event per reset. Windows do not
/// overlap: a single unbroken 9-day hot streak is exactly 3 events.
#[must_use]
pub fn heat_wave_events_per_year(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut events = 0u32;
    let mut consecutive = 0u32;
    for &temp in values {
        if temp > HEAT_WAVE_THRESHOLD_C {
            consecutive += 1;
            if consecutive >= HEAT_WAVE_RUN_DAYS {
                events += 1;
                consecutive = 0;
            }
        } else {
            consecutive = 0;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let years = values.len() as f64 / DAYS_PER_YEAR;
    f64::from(events) / years
}

/// Longest run of consecutive days with precipitation below
/// [`DRY_DAY_THRESHOLD_MM`], in days.
#[must_use]
pub fn longest_dry_spell(values: &[f64]) -> f64 {
    let mut longest = 0u32;
    let mut current = 0u32;
    for &precip in values {
        if precip < DRY_DAY_THRESHOLD_MM {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    f64::from(longest)
}

/// Total precipitation on days strictly above the series' 95th
/// percentile.
///
/// The cutoff is the sorted value at index `floor(0.95 · n)` with no
/// interpolation. It can undercount at small sample sizes, and that is
/// the stored-data contract.
#[must_use]
pub fn extreme_precipitation_total(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let cutoff_index = (sorted.len() as f64 * 0.95).floor() as usize;
    let cutoff = sorted.get(cutoff_index).copied().unwrap_or(0.0);

    values.iter().filter(|&&p| p > cutoff).sum()
}

/// Returns which daily variable an indicator is derived from.
#[must_use]
pub const fn source_variable(indicator: Indicator) -> DailyVariable {
    match indicator {
        Indicator::Tasmax | Indicator::Hd35 | Indicator::Hd40 => DailyVariable::TemperatureMax,
        Indicator::Tasmin => DailyVariable::TemperatureMin,
        Indicator::Pr | Indicator::Cdd | Indicator::R95p => DailyVariable::PrecipitationSum,
        _ => DailyVariable::TemperatureMean,
    }
}

/// Derives one indicator value from a daily series.
///
/// Temperature means become warming anomalies against `baseline` for
/// projected periods; historic periods keep the absolute mean. All other
/// indicators ignore the baseline.
#[must_use]
pub fn derive_indicator(
    indicator: Indicator,
    daily: &[f64],
    baseline: Option<f64>,
    time_period: TimePeriod,
) -> f64 {
    if daily.is_empty() {
        return 0.0;
    }

    match indicator {
        Indicator::Tas | Indicator::Tasmax | Indicator::Tasmin => {
            let avg = mean(daily);
            if time_period.is_historic() {
                avg
            } else {
                baseline.map_or(avg, |b| avg - b)
            }
        }
        Indicator::Hd35 => days_per_year_above(daily, 35.0),
        Indicator::Hd40 => days_per_year_above(daily, 40.0),
        Indicator::Hwf => heat_wave_events_per_year(daily),
        Indicator::Cdd => longest_dry_spell(daily),
        Indicator::R95p => extreme_precipitation_total(daily),
        Indicator::Slr => mean(daily) * COASTAL_PROXY_SCALE,
        _ => mean(daily),
    }
}

/// Rounds a derived value to three decimals for storage.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
