use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::{LeagueEntry, PlayerId};

pub fn find_entry(
    conn: &mut DbConn,
    player_id: PlayerId,
    league_code: &str,
) -> Result<Option<LeagueEntry>> {
    let sql = "SELECT id, player_id, league_code, rank FROM league_entries WHERE player_id = ?1 AND league_code = ?2";

    conn.query_row(sql, params![player_id, league_code], parse_entry_row)
        .optional()
        .context("Failed to query league entry")
}

pub fn insert_entry(
    conn: &mut DbConn,
    player_id: PlayerId,
    league_code: &str,
    rank: i64,
) -> Result<LeagueEntry> {
    let sql = "INSERT INTO league_entries (player_id, league_code, rank) VALUES (?1, ?2, ?3) RETURNING id, player_id, league_code, rank";

    conn.query_row(sql, params![player_id, league_code, rank], parse_entry_row)
        .with_context(|| format!("Failed to insert entry for player {} in {}", player_id, league_code))
}

pub fn update_rank(conn: &mut DbConn, entry_id: i64, rank: i64) -> Result<()> {
    conn.execute(
        "UPDATE league_entries SET rank = ?1 WHERE id = ?2",
        params![rank, entry_id],
    )
    .context("Failed to update entry rank")?;
    Ok(())
}

pub fn list_for_player(conn: &mut DbConn, player_id: PlayerId) -> Result<Vec<LeagueEntry>> {
    let sql = "SELECT e.id, e.player_id, e.league_code, e.rank
               FROM league_entries e
               JOIN leagues l ON l.code = e.league_code
               WHERE e.player_id = ?1
               ORDER BY l.year, l.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<LeagueEntry> {
    Ok(LeagueEntry {
        id: row.get(0)?,
        player_id: row.get(1)?,
        league_code: row.get(2)?,
        rank: row.get(3)?,
    })
}
