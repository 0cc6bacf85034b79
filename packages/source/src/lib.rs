#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Upstream climate archive client.
//!
//! Defines the [`ClimateProvider`] seam the ingestion pipeline and
//! fallback orchestrator fetch through, plus the Open-Meteo climate
//! archive implementation. Injecting the trait keeps every consumer
//! testable with a fake provider.

pub mod open_meteo;
pub mod progress;
pub mod retry;

use async_trait::async_trait;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors that can occur while fetching upstream climate data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed: the upstream is unreachable or refused the
    /// request after retries.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response arrived but its daily block is missing or unusable.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Description of what was wrong with the payload.
        message: String,
    },
}

/// Daily variables the climate archive can report.
///
/// Wire names match the upstream `daily=` query parameter values.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DailyVariable {
    /// Daily mean near-surface temperature.
    #[strum(serialize = "temperature_2m_mean")]
    TemperatureMean,
    /// Daily maximum near-surface temperature.
    #[strum(serialize = "temperature_2m_max")]
    TemperatureMax,
    /// Daily minimum near-surface temperature.
    #[strum(serialize = "temperature_2m_min")]
    TemperatureMin,
    /// Daily precipitation sum.
    #[strum(serialize = "precipitation_sum")]
    PrecipitationSum,
}

/// A fetched block of daily series, one entry per requested variable.
///
/// Field names mirror the upstream JSON; individual days may be `null`
/// and are dropped by [`DailySeries::values`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailySeries {
    /// ISO dates, one per day in the fetched range.
    #[serde(default)]
    pub time: Vec<String>,
    /// Daily mean temperature, if requested.
    pub temperature_2m_mean: Option<Vec<Option<f64>>>,
    /// Daily maximum temperature, if requested.
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    /// Daily minimum temperature, if requested.
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    /// Daily precipitation sum, if requested.
    pub precipitation_sum: Option<Vec<Option<f64>>>,
}

impl DailySeries {
    /// Returns the valid (non-null, finite) values for a variable, in
    /// day order. Empty when the variable wasn't fetched.
    #[must_use]
    pub fn values(&self, variable: DailyVariable) -> Vec<f64> {
        let series = match variable {
            DailyVariable::TemperatureMean => &self.temperature_2m_mean,
            DailyVariable::TemperatureMax => &self.temperature_2m_max,
            DailyVariable::TemperatureMin => &self.temperature_2m_min,
            DailyVariable::PrecipitationSum => &self.precipitation_sum,
        };

        series
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.filter(|x| x.is_finite()))
            .collect()
    }

    /// Whether the block carries no usable data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            DailyVariable::TemperatureMean,
            DailyVariable::TemperatureMax,
            DailyVariable::TemperatureMin,
            DailyVariable::PrecipitationSum,
        ]
        .iter()
        .all(|v| self.values(*v).is_empty())
    }
}

/// Seam for fetching raw daily climate series.
///
/// The ingestion pipeline and fallback orchestrator only ever talk to
/// this trait; tests substitute fakes.
#[async_trait]
pub trait ClimateProvider: Send + Sync {
    /// Fetches daily series for the given coordinates, date range, and
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] when the upstream is unreachable and
    /// [`SourceError::MalformedResponse`] when the payload has no daily
    /// block.
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
        variables: &[DailyVariable],
    ) -> Result<DailySeries, SourceError>;

    /// Fetches the 30-year historical baseline mean temperature for a
    /// location. Used once per location, only by temperature-family
    /// derivation.
    ///
    /// Returns `Ok(None)` when the archive has no usable series there.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying fetch fails.
    async fn fetch_baseline_temperature(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<f64>, SourceError> {
        let series = self
            .fetch_daily(
                latitude,
                longitude,
                open_meteo::BASELINE_START_DATE,
                open_meteo::BASELINE_END_DATE,
                &[DailyVariable::TemperatureMean],
            )
            .await?;

        let temps = series.values(DailyVariable::TemperatureMean);
        if temps.is_empty() {
            return Ok(None);
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = temps.iter().sum::<f64>() / temps.len() as f64;

        Ok(Some(mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_variable_wire_names() {
        assert_eq!(
            DailyVariable::TemperatureMean.as_ref(),
            "temperature_2m_mean"
        );
        assert_eq!(DailyVariable::PrecipitationSum.as_ref(), "precipitation_sum");
        let parsed: DailyVariable = "temperature_2m_max".parse().unwrap();
        assert_eq!(parsed, DailyVariable::TemperatureMax);
    }

    #[test]
    fn values_drop_nulls_and_non_finite() {
        let series = DailySeries {
            time: vec!["2045-01-01".into(), "2045-01-02".into(), "2045-01-03".into()],
            temperature_2m_mean: Some(vec![Some(10.0), None, Some(f64::NAN)]),
            ..DailySeries::default()
        };
        assert_eq!(series.values(DailyVariable::TemperatureMean), vec![10.0]);
        assert!(series.values(DailyVariable::PrecipitationSum).is_empty());
        assert!(!series.is_empty());
    }

    #[test]
    fn empty_block_is_empty() {
        assert!(DailySeries::default().is_empty());
    }
}
