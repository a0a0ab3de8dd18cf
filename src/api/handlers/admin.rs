use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use log::info;
use std::sync::Arc;

use super::{ApiError, AppState, authorize};
use crate::api::models::{CreateLeagueRequest, CreateLeagueResponse, IngestAllResponse, IngestFailure};
use crate::database::{League, LeagueStore};
use crate::services::ingestion::{IngestReport, IngestionService, RefreshReport};
use crate::sheets::TabularSource;

pub async fn create_league<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Json(request): Json<CreateLeagueRequest>,
) -> Result<(StatusCode, Json<CreateLeagueResponse>), ApiError> {
    authorize(&headers, &state.config)?;

    let league = League::from(request);
    if league.code.is_empty() {
        return Err(ApiError::bad_request("League code must not be empty"));
    }

    let created = state.store.create_league(&league)?;
    info!("League {} {}", league.code, if created { "created" } else { "already exists" });

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(CreateLeagueResponse {
            code: league.code,
            created,
        }),
    ))
}

pub async fn ingest_league<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Result<Json<IngestReport>, ApiError> {
    authorize(&headers, &state.config)?;
    let service = ingestion(&state)?;

    Ok(Json(service.ingest_league(&code).await?))
}

pub async fn ingest_all<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
) -> Result<Json<IngestAllResponse>, ApiError> {
    authorize(&headers, &state.config)?;
    let service = ingestion(&state)?;

    let summary = service.ingest_all().await?;
    Ok(Json(IngestAllResponse {
        reports: summary.reports,
        failures: summary
            .failures
            .into_iter()
            .map(|failure| IngestFailure {
                kind: failure.kind(),
                message: failure.source.to_string(),
                league: failure.league,
            })
            .collect(),
    }))
}

pub async fn refresh_win_rates<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
) -> Result<Json<RefreshReport>, ApiError> {
    authorize(&headers, &state.config)?;
    let service = ingestion(&state)?;

    Ok(Json(service.refresh_win_rates().await?))
}

pub async fn refresh_top8s<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
) -> Result<Json<RefreshReport>, ApiError> {
    authorize(&headers, &state.config)?;
    let service = ingestion(&state)?;

    Ok(Json(service.refresh_top8s().await?))
}

fn ingestion<T>(
    state: &AppState<T>,
) -> Result<&IngestionService<crate::database::SqliteStore, T>, ApiError> {
    state
        .ingestion
        .as_ref()
        .ok_or_else(ApiError::ingestion_unavailable)
}
