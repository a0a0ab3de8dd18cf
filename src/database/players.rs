use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::aliases;
use super::connection::DbConn;
use super::models::{Player, PlayerId};

const PLAYER_COLUMNS: &str = "id, display_name, name, secondary_id, win_rate, top8_count, created_at";

/// Insert a player together with its alias rows; either all rows land or none do.
pub fn create_with_aliases(
    conn: &mut DbConn,
    display_name: &str,
    name: &str,
    secondary_id: &str,
    alias_pairs: &[(String, String)],
) -> Result<Player> {
    let tx = conn
        .transaction()
        .context("Failed to start player transaction")?;

    let sql = format!(
        "INSERT INTO players (display_name, name, secondary_id) VALUES (?1, ?2, ?3) RETURNING {PLAYER_COLUMNS}"
    );
    let player = tx
        .query_row(&sql, params![display_name, name, secondary_id], parse_player_row)
        .with_context(|| format!("Failed to insert player {}", display_name))?;

    for (alias_name, alias_id) in alias_pairs {
        aliases::insert_alias(&tx, player.id, alias_name, Some(alias_id))?;
    }

    tx.commit().context("Failed to commit new player")?;
    Ok(player)
}

pub fn find_by_id(conn: &mut DbConn, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn update_win_rate(conn: &mut DbConn, id: PlayerId, win_rate: f64) -> Result<()> {
    conn.execute(
        "UPDATE players SET win_rate = ?1 WHERE id = ?2",
        params![win_rate, id],
    )
    .context("Failed to update win rate")?;
    Ok(())
}

pub fn update_top8_count(conn: &mut DbConn, id: PlayerId, top8_count: i64) -> Result<()> {
    conn.execute(
        "UPDATE players SET top8_count = ?1 WHERE id = ?2",
        params![top8_count, id],
    )
    .context("Failed to update top 8 count")?;
    Ok(())
}

/// One page of players ordered by display name, plus the total count.
pub fn list_page(conn: &mut DbConn, limit: i64, offset: i64) -> Result<(Vec<Player>, i64)> {
    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
        .context("Failed to count players")?;

    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players ORDER BY display_name COLLATE NOCASE LIMIT ?1 OFFSET ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit, offset], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((rows, total))
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        display_name: row.get(1)?,
        name: row.get(2)?,
        secondary_id: row.get(3)?,
        win_rate: row.get(4)?,
        top8_count: row.get(5)?,
        created_at: row.get(6)?,
    })
}
