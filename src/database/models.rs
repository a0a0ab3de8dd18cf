use chrono::NaiveDateTime;

pub type PlayerId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub name: String,
    pub secondary_id: String,
    pub win_rate: Option<f64>,
    pub top8_count: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub id: i64,
    pub player_id: PlayerId,
    pub name: String,
    pub secondary_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct League {
    pub code: String,
    pub name: Option<String>,
    pub year: Option<i64>,
    pub doc_id: Option<String>,
    pub death_at_loss: Option<i64>,
    pub entropy_sheet: bool,
    pub omw_includes_entropy: Option<bool>,
    pub standings_range: Option<String>,
    pub matches_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueEntry {
    pub id: i64,
    pub player_id: PlayerId,
    pub league_code: String,
    pub rank: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: i64,
    pub league_code: String,
    pub played_at: NaiveDateTime,
    pub winner_id: Option<PlayerId>,
    pub loser_id: PlayerId,
    pub score: String,
}

/// A match row ready to insert; `winner_id` is `None` for a forfeit to the bye opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub played_at: NaiveDateTime,
    pub winner_id: Option<PlayerId>,
    pub loser_id: PlayerId,
    pub score: String,
}

// DTOs for joined queries
#[derive(Debug, Clone)]
pub struct PlayerWithLeagues {
    pub player: Player,
    pub entries: Vec<LeagueEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchRecord {
    pub wins: i64,
    pub losses: i64,
}

impl MatchRecord {
    pub fn win_rate(&self) -> Option<f64> {
        let played = self.wins + self.losses;
        (played > 0).then(|| self.wins as f64 / played as f64)
    }
}
