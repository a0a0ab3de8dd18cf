use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::connection::DbConn;
use super::models::{Alias, PlayerId};

pub fn insert_alias(
    conn: &Connection,
    player_id: PlayerId,
    name: &str,
    secondary_id: Option<&str>,
) -> Result<Alias> {
    let sql = "INSERT INTO aliases (player_id, name, secondary_id) VALUES (?1, ?2, ?3) RETURNING id, player_id, name, secondary_id";

    conn.query_row(sql, params![player_id, name, secondary_id], parse_alias_row)
        .with_context(|| format!("Failed to insert alias {} for player {}", name, player_id))
}

/// Owner ids of every alias row carrying this secondary id, compared case-insensitively.
/// One id per matching row, so duplicates are kept.
pub fn owners_by_secondary_id(conn: &mut DbConn, secondary_id: &str) -> Result<Vec<PlayerId>> {
    let sql = "SELECT player_id FROM aliases WHERE secondary_id = ?1 COLLATE NOCASE ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![secondary_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query aliases by secondary id")?;

    Ok(rows)
}

/// Owner ids of alias rows matching name and secondary id exactly; `None` matches a NULL id.
pub fn owners_by_name_and_id(
    conn: &mut DbConn,
    name: &str,
    secondary_id: Option<&str>,
) -> Result<Vec<PlayerId>> {
    let sql = "SELECT player_id FROM aliases WHERE name = ?1 AND secondary_id IS ?2 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![name, secondary_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query aliases by name")?;

    Ok(rows)
}

/// Distinct players holding an alias with this name and an entry in the league.
pub fn owners_by_name_in_league(
    conn: &mut DbConn,
    name: &str,
    league_code: &str,
) -> Result<Vec<PlayerId>> {
    let sql = "SELECT DISTINCT a.player_id
               FROM aliases a
               JOIN league_entries e ON e.player_id = a.player_id
               WHERE a.name = ?1 AND e.league_code = ?2
               ORDER BY a.player_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![name, league_code], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to query aliases by league")?;

    Ok(rows)
}

fn parse_alias_row(row: &rusqlite::Row) -> rusqlite::Result<Alias> {
    Ok(Alias {
        id: row.get(0)?,
        player_id: row.get(1)?,
        name: row.get(2)?,
        secondary_id: row.get(3)?,
    })
}
