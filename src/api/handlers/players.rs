use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ApiError, AppState, lookup_player, player_summary};
use crate::api::models::{PlayerPageResponse, PlayerResponse};
use crate::database::LeagueStore;
use crate::pagination::{PageParams, PaginationLinks};
use crate::sheets::TabularSource;

const PLAYERS_PATH: &str = "/api/players";

pub async fn get_players<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<PlayerPageResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let (page, size) = (params.page(), params.size());
    if params.offset().is_none() {
        return Err(ApiError::bad_request(format!("Page {} is out of range", page)));
    }
    let (players, total) = state.store.list_players_page(page, size)?;
    log::debug!("Players page {} of size {}: {} of {}", page, size, players.len(), total);

    let data = players
        .into_iter()
        .map(|player| player_summary(&state.store, player))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(PlayerPageResponse {
        links: PaginationLinks::build(PLAYERS_PATH, page, size, total),
        data,
    }))
}

pub async fn get_player<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    Path(name): Path<String>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = lookup_player(&state, &name)?;

    Ok(Json(PlayerResponse {
        links: BTreeMap::new(),
        data: player_summary(&state.store, player)?,
    }))
}
