use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    achievements::get_achievements,
    admin::{create_league, ingest_all, ingest_league, refresh_top8s, refresh_win_rates},
    players::{get_player, get_players},
};
use crate::sheets::TabularSource;

pub fn create_router<T: TabularSource + 'static>(state: Arc<AppState<T>>) -> Router {
    Router::new()
        .route("/api/players", get(get_players::<T>))
        .route("/api/players/:name", get(get_player::<T>))
        .route("/api/achievements/:name", get(get_achievements::<T>))
        .route("/api/admin/leagues", post(create_league::<T>))
        .route("/api/admin/leagues/:code/ingest", post(ingest_league::<T>))
        .route("/api/admin/ingest", post(ingest_all::<T>))
        .route("/api/admin/refresh/win-rates", post(refresh_win_rates::<T>))
        .route("/api/admin/refresh/top8s", post(refresh_top8s::<T>))
        .with_state(state)
}
