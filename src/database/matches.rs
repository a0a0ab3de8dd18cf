use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::{Match, MatchRecord, NewMatch, PlayerId};

/// Swap the league's match set for `matches` in one transaction.
pub fn replace_matches(conn: &mut DbConn, league_code: &str, matches: &[NewMatch]) -> Result<usize> {
    let tx = conn
        .transaction()
        .context("Failed to start match transaction")?;

    let removed = tx
        .execute("DELETE FROM matches WHERE league_code = ?1", params![league_code])
        .context("Failed to clear league matches")?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO matches (league_code, played_at, winner_id, loser_id, score) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for m in matches {
            stmt.execute(params![league_code, m.played_at, m.winner_id, m.loser_id, m.score])
                .with_context(|| format!("Failed to insert match in {}", league_code))?;
        }
    }

    tx.commit().context("Failed to commit league matches")?;
    log::debug!(
        "Replaced {} matches with {} for {}",
        removed,
        matches.len(),
        league_code
    );
    Ok(matches.len())
}

pub fn list_by_league(conn: &mut DbConn, league_code: &str) -> Result<Vec<Match>> {
    let sql = "SELECT id, league_code, played_at, winner_id, loser_id, score FROM matches WHERE league_code = ?1 ORDER BY played_at, id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![league_code], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Won and lost match counts for a player across every league.
pub fn calculate_match_record(conn: &mut DbConn, player_id: PlayerId) -> Result<MatchRecord> {
    let sql = "SELECT
                   SUM(CASE WHEN winner_id = ?1 THEN 1 ELSE 0 END),
                   SUM(CASE WHEN loser_id = ?1 THEN 1 ELSE 0 END)
               FROM matches
               WHERE winner_id = ?1 OR loser_id = ?1";

    let (wins, losses): (Option<i64>, Option<i64>) = conn
        .query_row(sql, params![player_id], |row| Ok((row.get(0)?, row.get(1)?)))
        .context("Failed to calculate match record")?;

    Ok(MatchRecord {
        wins: wins.unwrap_or(0),
        losses: losses.unwrap_or(0),
    })
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        league_code: row.get(1)?,
        played_at: row.get(2)?,
        winner_id: row.get(3)?,
        loser_id: row.get(4)?,
        score: row.get(5)?,
    })
}
