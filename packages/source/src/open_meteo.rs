//! Open-Meteo climate archive client.
//!
//! Fetches daily CMIP6 model series via
//! `GET /v1/climate?latitude&longitude&start_date&end_date&models&daily=`.

use async_trait::async_trait;
use climate_grid_hazard_models::TimePeriod;
use serde::Deserialize;

use crate::{ClimateProvider, DailySeries, DailyVariable, SourceError, retry};

/// Default base URL of the climate archive.
pub const DEFAULT_BASE_URL: &str = "https://climate-api.open-meteo.com";

/// Model identifier in the archive's query format.
pub const CLIMATE_MODEL_PARAM: &str = "MRI_AGCM3_2_S";

/// Model name recorded in stored rows.
pub const CLIMATE_MODEL_LABEL: &str = "MRI-AGCM3-2-S";

/// Provenance label recorded for rows derived from live archive fetches.
pub const DATA_SOURCE_LABEL: &str = "Open-Meteo Climate API";

/// Start of the 30-year historical baseline window.
pub const BASELINE_START_DATE: &str = "1950-01-01";

/// End of the 30-year historical baseline window.
pub const BASELINE_END_DATE: &str = "1980-12-31";

/// Per-request timeout. A dead upstream must fail fast enough to degrade
/// to the next fallback tier instead of blocking the request path.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// User agent sent with archive requests.
const USER_AGENT: &str = "climate-grid/1.0 (https://github.com/climate-grid/climate-grid)";

/// Returns the archive fetch window for a time period.
///
/// The archive's projections end in 2050, so the 2070 and 2090 horizons
/// reuse the 2040-2050 window; their differences come from scenario
/// selection upstream, not the date range.
#[must_use]
pub const fn date_range(period: TimePeriod) -> (&'static str, &'static str) {
    match period {
        TimePeriod::P1980 => ("1970-01-01", "1989-12-31"),
        TimePeriod::P1990 => ("1985-01-01", "1999-12-31"),
        TimePeriod::P2000 => ("1995-01-01", "2009-12-31"),
        TimePeriod::P2010 => ("2005-01-01", "2019-12-31"),
        TimePeriod::P2030 => ("2020-01-01", "2040-12-31"),
        TimePeriod::P2050 | TimePeriod::P2070 | TimePeriod::P2090 => {
            ("2040-01-01", "2050-12-31")
        }
    }
}

/// Envelope of the archive's climate endpoint.
#[derive(Debug, Deserialize)]
struct ClimateApiResponse {
    daily: Option<DailySeries>,
}

/// HTTP client for the Open-Meteo climate archive.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Creates a client against the public archive.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying HTTP client cannot
    /// be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a specific base URL (e.g. a local stub in
    /// tests).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying HTTP client cannot
    /// be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ClimateProvider for OpenMeteoClient {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
        variables: &[DailyVariable],
    ) -> Result<DailySeries, SourceError> {
        let url = format!("{}/v1/climate", self.base_url);
        let daily = variables
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");

        let body = retry::send_json(|| {
            self.client.get(&url).query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
                ("models", CLIMATE_MODEL_PARAM.to_string()),
                ("daily", daily.clone()),
            ])
        })
        .await?;

        let response: ClimateApiResponse = serde_json::from_value(body)?;

        let Some(series) = response.daily else {
            return Err(SourceError::MalformedResponse {
                message: format!("no daily block for ({latitude}, {longitude})"),
            });
        };

        Ok(series)
    }
}
