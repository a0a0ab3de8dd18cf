use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::models::{PlayerStats, PlayerSummary};
use crate::config::settings::AppConfig;
use crate::database::{LeagueStore, PlayerWithLeagues, SqliteStore};
use crate::domain::{AliasRegistry, PartialName};
use crate::errors::{IngestError, ReconcileError};
use crate::services::identity::IdentityResolver;
use crate::services::ingestion::IngestionService;
use crate::sheets::SheetsClient;

pub mod achievements;
pub mod admin;
pub mod players;

const TOP_8_RANK: i64 = 8;

pub struct AppState<T = SheetsClient> {
    pub store: SqliteStore,
    pub config: AppConfig,
    pub registry: AliasRegistry,
    /// Absent when the sheets API key or stats sheet id is not configured.
    pub ingestion: Option<IngestionService<SqliteStore, T>>,
}

/// Error body `{"error": {"kind", "message"}}` with a status per error kind.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", "Missing or wrong admin token")
    }

    pub fn ingestion_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Unavailable",
            "Ingestion needs SHEETS_API_KEY and STATS_SHEET_ID",
        )
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "InvalidFormat", message)
    }
}

fn status_for(error: &ReconcileError) -> StatusCode {
    match error {
        ReconcileError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        ReconcileError::NoMatch(_) => StatusCode::NOT_FOUND,
        ReconcileError::NotUniqueMatch(_) => StatusCode::CONFLICT,
        ReconcileError::Store(_) | ReconcileError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ReconcileError> for ApiError {
    fn from(error: ReconcileError) -> Self {
        Self::new(status_for(&error), error.kind(), error.to_string())
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        Self::new(status_for(&error.source), error.kind(), error.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Request failed: {:#}", error);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Store", format!("{:#}", error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": { "kind": self.kind, "message": self.message } });
        (self.status, Json(body)).into_response()
    }
}

/// Admin routes need `Authorization: Bearer <ADMIN_PASSWORD>`.
pub fn authorize(headers: &HeaderMap, config: &AppConfig) -> Result<(), ApiError> {
    let expected = config
        .admin_password
        .as_deref()
        .ok_or_else(ApiError::unauthorized)?;

    let provided = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if provided != Some(expected) {
        return Err(ApiError::unauthorized());
    }
    Ok(())
}

/// Find a player by `"name - id"` (or bare name) along with its league entries.
pub fn lookup_player<T>(state: &AppState<T>, raw_name: &str) -> Result<PlayerWithLeagues, ApiError> {
    let name = PartialName::parse(raw_name)?;
    let player = IdentityResolver::new(&state.store, &state.registry)
        .find_player(&name)?
        .ok_or_else(|| ReconcileError::no_match(format!("Player not found: {}", raw_name)))?;
    let entries = state.store.list_entries_for_player(player.id)?;

    Ok(PlayerWithLeagues { player, entries })
}

pub fn player_summary(
    store: &impl LeagueStore,
    player: PlayerWithLeagues,
) -> anyhow::Result<PlayerSummary> {
    let record = store.match_record(player.player.id)?;
    let top8s = player
        .entries
        .iter()
        .filter(|entry| entry.rank <= TOP_8_RANK)
        .count();

    Ok(PlayerSummary {
        id: player.player.id,
        name: player.player.display_name,
        leagues: player
            .entries
            .iter()
            .map(|entry| entry.league_code.clone())
            .collect(),
        stats: PlayerStats {
            league_count: player.entries.len(),
            win_rate: record.win_rate(),
            top8s,
            recorded_win_rate: player.player.win_rate,
            recorded_top8s: player.player.top8_count,
        },
    })
}
