use anyhow::{Context, Result};

use super::connection::{DbPool, create_memory_pool, create_pool, get_connection};
use super::models::{League, LeagueEntry, Match, MatchRecord, NewMatch, Player, PlayerId, PlayerWithLeagues};
use super::{aliases, entries, leagues, matches, players, setup};

/// Fields for a player that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub display_name: String,
    pub name: String,
    pub secondary_id: String,
    pub aliases: Vec<(String, String)>,
}

/// Persistence used by identity resolution and ingestion.
pub trait LeagueStore: Send + Sync {
    fn find_player(&self, id: PlayerId) -> Result<Option<Player>>;
    fn create_player(&self, player: &NewPlayer) -> Result<Player>;
    fn player_ids_by_secondary_id(&self, secondary_id: &str) -> Result<Vec<PlayerId>>;
    fn player_ids_by_alias(&self, name: &str, secondary_id: Option<&str>) -> Result<Vec<PlayerId>>;
    fn player_ids_by_name_in_league(&self, name: &str, league_code: &str) -> Result<Vec<PlayerId>>;

    fn create_league(&self, league: &League) -> Result<bool>;
    fn find_league(&self, code: &str) -> Result<Option<League>>;
    fn list_leagues(&self) -> Result<Vec<League>>;

    fn find_entry(&self, player_id: PlayerId, league_code: &str) -> Result<Option<LeagueEntry>>;
    fn create_entry(&self, player_id: PlayerId, league_code: &str, rank: i64) -> Result<LeagueEntry>;
    fn update_entry_rank(&self, entry_id: i64, rank: i64) -> Result<()>;

    fn replace_matches(&self, league_code: &str, matches: &[NewMatch]) -> Result<usize>;
    fn list_matches(&self, league_code: &str) -> Result<Vec<Match>>;
    fn match_record(&self, player_id: PlayerId) -> Result<MatchRecord>;

    fn update_win_rate(&self, player_id: PlayerId, win_rate: f64) -> Result<()>;
    fn update_top8_count(&self, player_id: PlayerId, top8_count: i64) -> Result<()>;

    /// Page `page` (1-based) of players with their entries, and the total player count.
    fn list_players_page(&self, page: i64, size: i64) -> Result<(Vec<PlayerWithLeagues>, i64)>;
    fn list_entries_for_player(&self, player_id: PlayerId) -> Result<Vec<LeagueEntry>>;
}

/// SQLite-backed store over a connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the schema.
    pub fn open(database_path: &str) -> Result<Self> {
        Self::with_pool(create_pool(database_path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_pool(create_memory_pool()?)
    }

    pub fn with_pool(pool: DbPool) -> Result<Self> {
        let mut conn = get_connection(&pool)?;
        setup::initialize_database(&mut conn)?;
        drop(conn);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl LeagueStore for SqliteStore {
    fn find_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let mut conn = get_connection(&self.pool)?;
        players::find_by_id(&mut conn, id)
    }

    fn create_player(&self, player: &NewPlayer) -> Result<Player> {
        let mut conn = get_connection(&self.pool)?;
        players::create_with_aliases(
            &mut conn,
            &player.display_name,
            &player.name,
            &player.secondary_id,
            &player.aliases,
        )
    }

    fn player_ids_by_secondary_id(&self, secondary_id: &str) -> Result<Vec<PlayerId>> {
        let mut conn = get_connection(&self.pool)?;
        aliases::owners_by_secondary_id(&mut conn, secondary_id)
    }

    fn player_ids_by_alias(&self, name: &str, secondary_id: Option<&str>) -> Result<Vec<PlayerId>> {
        let mut conn = get_connection(&self.pool)?;
        aliases::owners_by_name_and_id(&mut conn, name, secondary_id)
    }

    fn player_ids_by_name_in_league(&self, name: &str, league_code: &str) -> Result<Vec<PlayerId>> {
        let mut conn = get_connection(&self.pool)?;
        aliases::owners_by_name_in_league(&mut conn, name, league_code)
    }

    fn create_league(&self, league: &League) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        leagues::create_league(&mut conn, league)
    }

    fn find_league(&self, code: &str) -> Result<Option<League>> {
        let mut conn = get_connection(&self.pool)?;
        leagues::find_by_code(&mut conn, code)
    }

    fn list_leagues(&self) -> Result<Vec<League>> {
        let mut conn = get_connection(&self.pool)?;
        leagues::list_all(&mut conn)
    }

    fn find_entry(&self, player_id: PlayerId, league_code: &str) -> Result<Option<LeagueEntry>> {
        let mut conn = get_connection(&self.pool)?;
        entries::find_entry(&mut conn, player_id, league_code)
    }

    fn create_entry(&self, player_id: PlayerId, league_code: &str, rank: i64) -> Result<LeagueEntry> {
        let mut conn = get_connection(&self.pool)?;
        entries::insert_entry(&mut conn, player_id, league_code, rank)
    }

    fn update_entry_rank(&self, entry_id: i64, rank: i64) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        entries::update_rank(&mut conn, entry_id, rank)
    }

    fn replace_matches(&self, league_code: &str, new_matches: &[NewMatch]) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        matches::replace_matches(&mut conn, league_code, new_matches)
    }

    fn list_matches(&self, league_code: &str) -> Result<Vec<Match>> {
        let mut conn = get_connection(&self.pool)?;
        matches::list_by_league(&mut conn, league_code)
    }

    fn match_record(&self, player_id: PlayerId) -> Result<MatchRecord> {
        let mut conn = get_connection(&self.pool)?;
        matches::calculate_match_record(&mut conn, player_id)
    }

    fn update_win_rate(&self, player_id: PlayerId, win_rate: f64) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        players::update_win_rate(&mut conn, player_id, win_rate)
    }

    fn update_top8_count(&self, player_id: PlayerId, top8_count: i64) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        players::update_top8_count(&mut conn, player_id, top8_count)
    }

    fn list_players_page(&self, page: i64, size: i64) -> Result<(Vec<PlayerWithLeagues>, i64)> {
        let offset = page
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(size))
            .with_context(|| format!("Page {} of size {} is out of range", page, size))?;
        let mut conn = get_connection(&self.pool)?;
        let (page_players, total) = players::list_page(&mut conn, size, offset)?;

        let mut with_leagues = Vec::with_capacity(page_players.len());
        for player in page_players {
            let player_entries = entries::list_for_player(&mut conn, player.id)?;
            with_leagues.push(PlayerWithLeagues {
                player,
                entries: player_entries,
            });
        }
        Ok((with_leagues, total))
    }

    fn list_entries_for_player(&self, player_id: PlayerId) -> Result<Vec<LeagueEntry>> {
        let mut conn = get_connection(&self.pool)?;
        entries::list_for_player(&mut conn, player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn league(code: &str) -> League {
        League {
            code: code.to_string(),
            entropy_sheet: true,
            ..League::default()
        }
    }

    fn new_player(name: &str, id: &str) -> NewPlayer {
        NewPlayer {
            display_name: format!("{} - {}", name, id),
            name: name.to_string(),
            secondary_id: id.to_string(),
            aliases: vec![(name.to_string(), id.to_string())],
        }
    }

    fn played_at(day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn league_creation_tolerates_existing_code() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.create_league(&league("KLR")).unwrap());
        assert!(!store.create_league(&league("KLR")).unwrap());
        assert_eq!(store.list_leagues().unwrap().len(), 1);
        assert!(store.find_league("KLR").unwrap().unwrap().entropy_sheet);
        assert!(store.find_league("MKM").unwrap().is_none());
    }

    #[test]
    fn player_is_created_with_aliases() {
        let store = SqliteStore::in_memory().unwrap();

        let player = store.create_player(&new_player("Jace", "Jace#1")).unwrap();

        assert_eq!(player.display_name, "Jace - Jace#1");
        assert_eq!(store.player_ids_by_secondary_id("jace#1").unwrap(), vec![player.id]);
        assert_eq!(
            store.player_ids_by_alias("Jace", Some("Jace#1")).unwrap(),
            vec![player.id]
        );
        assert!(store.player_ids_by_alias("Jace", None).unwrap().is_empty());
    }

    #[test]
    fn duplicate_display_name_is_rejected_without_aliases() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_player(&new_player("Jace", "Jace#1")).unwrap();

        let mut duplicate = new_player("Jace", "Jace#1");
        duplicate.aliases = vec![("Jace B".to_string(), "Jace#1".to_string())];
        assert!(store.create_player(&duplicate).is_err());

        assert!(store.player_ids_by_alias("Jace B", Some("Jace#1")).unwrap().is_empty());
    }

    #[test]
    fn entries_are_unique_per_league() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_league(&league("KLR")).unwrap();
        let player = store.create_player(&new_player("Jace", "Jace#1")).unwrap();

        let entry = store.create_entry(player.id, "KLR", 3).unwrap();
        assert!(store.create_entry(player.id, "KLR", 4).is_err());

        store.update_entry_rank(entry.id, 1).unwrap();
        assert_eq!(store.find_entry(player.id, "KLR").unwrap().unwrap().rank, 1);
        assert_eq!(
            store.player_ids_by_name_in_league("Jace", "KLR").unwrap(),
            vec![player.id]
        );
        assert!(store.player_ids_by_name_in_league("Jace", "MKM").unwrap().is_empty());
    }

    #[test]
    fn replacing_matches_swaps_the_league_set() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_league(&league("KLR")).unwrap();
        let jace = store.create_player(&new_player("Jace", "Jace#1")).unwrap();
        let lili = store.create_player(&new_player("Lili", "Lili#2")).unwrap();

        let first = vec![
            NewMatch { played_at: played_at(1), winner_id: Some(jace.id), loser_id: lili.id, score: "2-1".into() },
            NewMatch { played_at: played_at(2), winner_id: None, loser_id: jace.id, score: "0-2".into() },
        ];
        store.replace_matches("KLR", &first).unwrap();
        store.replace_matches("KLR", &first).unwrap();
        assert_eq!(store.list_matches("KLR").unwrap().len(), 2);

        let record = store.match_record(jace.id).unwrap();
        assert_eq!(record, MatchRecord { wins: 1, losses: 1 });
        assert_eq!(record.win_rate(), Some(0.5));
        assert_eq!(store.match_record(9999).unwrap().win_rate(), None);
    }

    #[test]
    fn stats_updates_are_persisted() {
        let store = SqliteStore::in_memory().unwrap();
        let player = store.create_player(&new_player("Jace", "Jace#1")).unwrap();

        store.update_win_rate(player.id, 61.5).unwrap();
        store.update_top8_count(player.id, 4).unwrap();

        let player = store.find_player(player.id).unwrap().unwrap();
        assert_eq!(player.win_rate, Some(61.5));
        assert_eq!(player.top8_count, Some(4));
    }

    #[test]
    fn players_page_includes_entries() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_league(&league("KLR")).unwrap();
        let jace = store.create_player(&new_player("Jace", "Jace#1")).unwrap();
        store.create_player(&new_player("Lili", "Lili#2")).unwrap();
        store.create_entry(jace.id, "KLR", 1).unwrap();

        let (page, total) = store.list_players_page(1, 1).unwrap();

        assert_eq!(total, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].player.name, "Jace");
        assert_eq!(page[0].entries[0].league_code, "KLR");
    }

    #[test]
    fn oversized_page_is_an_error() {
        let store = SqliteStore::in_memory().unwrap();

        assert!(store.list_players_page(i64::MAX, 12).is_err());
        assert!(store.list_players_page(i64::MIN, 12).is_err());
    }
}
