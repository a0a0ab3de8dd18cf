use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, AppState, lookup_player};
use crate::api::models::{AchievementList, AchievementsResponse};
use crate::domain::achievements_for;
use crate::sheets::TabularSource;

pub async fn get_achievements<T: TabularSource + 'static>(
    State(state): State<Arc<AppState<T>>>,
    Path(name): Path<String>,
) -> Result<Json<AchievementsResponse>, ApiError> {
    let player = lookup_player(&state, &name)?;

    Ok(Json(AchievementsResponse {
        data: AchievementList {
            achievements: achievements_for(player.entries.len()),
        },
    }))
}
