//! HTTP handler functions for the climate grid API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use climate_grid_database::queries;
use climate_grid_hazard_models::{Indicator, LocationQuery, Scenario, SourceFamily, TimePeriod};
use climate_grid_ingest::{ImportOptions, import_impact_grid, import_model_grid};
use climate_grid_risk::classify;
use climate_grid_server_models::{
    ApiHealth, ApiIndicator, ApiScenario, ApiTimePeriod, ImportRequest, ImportResponse,
    OverlayCell, OverlayRequest, ResponseMetadata, RiskQueryRequest, RiskQueryResponse,
};
use climate_grid_source::progress::LogProgress;
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;

/// Query parameter selecting a source family on catalog endpoints.
#[derive(Debug, Deserialize)]
pub struct SourceParam {
    /// Source family filter; omitted means both families.
    pub source: Option<SourceFamily>,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/indicators`
///
/// Lists the indicator catalog, optionally filtered by source family.
pub async fn indicators(params: web::Query<SourceParam>) -> HttpResponse {
    let list: Vec<ApiIndicator> = match params.source {
        Some(family) => Indicator::for_source(family),
        None => Indicator::all().to_vec(),
    }
    .into_iter()
    .map(ApiIndicator::from)
    .collect();

    HttpResponse::Ok().json(list)
}

/// `GET /api/scenarios`
pub async fn scenarios(params: web::Query<SourceParam>) -> HttpResponse {
    let list: Vec<ApiScenario> = match params.source {
        Some(family) => Scenario::for_source(family),
        None => Scenario::all().to_vec(),
    }
    .into_iter()
    .map(ApiScenario::from)
    .collect();

    HttpResponse::Ok().json(list)
}

/// `GET /api/time-periods`
pub async fn time_periods() -> HttpResponse {
    let list: Vec<ApiTimePeriod> = TimePeriod::all()
        .iter()
        .copied()
        .map(ApiTimePeriod::from)
        .collect();

    HttpResponse::Ok().json(list)
}

/// `POST /api/physical-risk/query`
///
/// Resolves risk data for the requested locations through the
/// stored → live → synthetic cascade. This endpoint always produces a
/// response body; missing data is not an error.
pub async fn physical_risk_query(
    state: web::Data<AppState>,
    body: web::Json<RiskQueryRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    let locations: Vec<LocationQuery> =
        request.locations.into_iter().map(Into::into).collect();

    // An empty indicator list means the source's whole catalog.
    let indicators = if request.indicator_ids.is_empty() {
        Indicator::for_source(request.source)
    } else {
        request.indicator_ids
    };

    let resolution = state
        .resolver
        .resolve(
            request.source,
            &locations,
            &indicators,
            request.scenario,
            request.time_period,
        )
        .await;

    let response = RiskQueryResponse {
        locations: locations.iter().map(Into::into).collect(),
        indicators: indicators.into_iter().map(ApiIndicator::from).collect(),
        risk_data: resolution.risk_data,
        metadata: ResponseMetadata {
            source: resolution.data_source,
            provenance: resolution.tier,
            scenario: request.scenario,
            time_period: request.time_period,
            last_updated: Utc::now(),
        },
    };

    HttpResponse::Ok().json(response)
}

/// `POST /api/physical-risk/overlay`
///
/// Returns stored grid cells for one indicator inside the viewport
/// bounds, classified for rendering.
pub async fn physical_risk_overlay(
    state: web::Data<AppState>,
    body: web::Json<OverlayRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    match queries::query_by_indicator(
        state.db.as_ref(),
        request.source,
        request.indicator_id,
        request.scenario,
        request.time_period,
        &request.bounds,
    )
    .await
    {
        Ok(rows) => {
            let cells: Vec<OverlayCell> = rows
                .into_iter()
                .map(|row| OverlayCell {
                    lat: row.latitude,
                    lon: row.longitude,
                    value: row.value,
                    risk_level: classify(row.indicator_id, row.value),
                })
                .collect();
            HttpResponse::Ok().json(cells)
        }
        Err(e) => {
            log::error!("Overlay query failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query overlay data"
            }))
        }
    }
}

/// `POST /api/climate-data/import`
///
/// Runs an import synchronously for the requested source family.
/// Progress lines stream to the log; the response carries the final
/// `{imported, errors}` counts. Import failures are counted, never
/// thrown; the endpoint only errors on malformed requests.
pub async fn climate_data_import(
    state: web::Data<AppState>,
    body: web::Json<ImportRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    let options = ImportOptions {
        limit_points: request.limit_points,
        limit_scenarios: request.limit_scenarios,
        limit_periods: request.limit_periods,
        cancel: None,
    };

    let summary = match request.source {
        SourceFamily::Cmip6 => {
            import_model_grid(
                state.db.as_ref(),
                state.provider.as_ref(),
                &options,
                Some(Arc::new(LogProgress)),
            )
            .await
        }
        SourceFamily::Isimip => {
            import_impact_grid(state.db.as_ref(), &options, Some(Arc::new(LogProgress))).await
        }
    };

    // Stats are stale the moment an import lands.
    state.stats_cache.invalidate();

    HttpResponse::Ok().json(ImportResponse {
        imported: summary.imported,
        errors: summary.errors,
    })
}

/// `GET /api/climate-data/stats`
///
/// Grid store statistics, cached for a short TTL.
pub async fn climate_data_stats(state: web::Data<AppState>) -> HttpResponse {
    if let Some(stats) = state.stats_cache.get() {
        return HttpResponse::Ok().json(stats);
    }

    match queries::stats(state.db.as_ref()).await {
        Ok(stats) => {
            state.stats_cache.put(stats.clone());
            HttpResponse::Ok().json(stats)
        }
        Err(e) => {
            log::error!("Stats query failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query grid statistics"
            }))
        }
    }
}
