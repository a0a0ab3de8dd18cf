use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::database::League;
use crate::domain::Achievement;
use crate::pagination::PaginationLinks;
use crate::services::ingestion::IngestReport;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub league_count: usize,
    /// Share of stored matches won, from 0 to 1.
    pub win_rate: Option<f64>,
    /// Leagues finished in the top 8.
    pub top8s: usize,
    pub recorded_win_rate: Option<f64>,
    pub recorded_top8s: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: i64,
    pub name: String,
    pub leagues: Vec<String>,
    pub stats: PlayerStats,
}

#[derive(Debug, Serialize)]
pub struct PlayerPageResponse {
    pub links: PaginationLinks,
    pub data: Vec<PlayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub links: BTreeMap<String, String>,
    pub data: PlayerSummary,
}

#[derive(Debug, Serialize)]
pub struct AchievementList {
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Serialize)]
pub struct AchievementsResponse {
    pub data: AchievementList,
}

fn default_entropy_sheet() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeagueRequest {
    pub code: String,
    pub name: Option<String>,
    pub year: Option<i64>,
    pub doc_id: Option<String>,
    pub death_at_loss: Option<i64>,
    #[serde(default = "default_entropy_sheet")]
    pub entropy_sheet: bool,
    pub omw_includes_entropy: Option<bool>,
    pub standings_range: Option<String>,
    pub matches_range: Option<String>,
}

impl From<CreateLeagueRequest> for League {
    fn from(request: CreateLeagueRequest) -> Self {
        League {
            code: request.code.trim().to_string(),
            name: request.name,
            year: request.year,
            doc_id: request.doc_id,
            death_at_loss: request.death_at_loss,
            entropy_sheet: request.entropy_sheet,
            omw_includes_entropy: request.omw_includes_entropy,
            standings_range: request.standings_range,
            matches_range: request.matches_range,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateLeagueResponse {
    pub code: String,
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct IngestFailure {
    pub league: String,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct IngestAllResponse {
    pub reports: Vec<IngestReport>,
    pub failures: Vec<IngestFailure>,
}
