use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::League;

const LEAGUE_COLUMNS: &str = "code, name, year, doc_id, death_at_loss, entropy_sheet, omw_includes_entropy, standings_range, matches_range";

/// Insert the league unless its code already exists. Returns whether a row was written.
pub fn create_league(conn: &mut DbConn, league: &League) -> Result<bool> {
    let sql = format!(
        "INSERT INTO leagues ({LEAGUE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) ON CONFLICT(code) DO NOTHING"
    );

    let inserted = conn
        .execute(
            &sql,
            params![
                league.code,
                league.name,
                league.year,
                league.doc_id,
                league.death_at_loss,
                league.entropy_sheet,
                league.omw_includes_entropy,
                league.standings_range,
                league.matches_range
            ],
        )
        .with_context(|| format!("Failed to insert league {}", league.code))?;

    Ok(inserted > 0)
}

pub fn find_by_code(conn: &mut DbConn, code: &str) -> Result<Option<League>> {
    let sql = format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE code = ?1");

    conn.query_row(&sql, params![code], parse_league_row)
        .optional()
        .context("Failed to query league by code")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<League>> {
    let sql = format!("SELECT {LEAGUE_COLUMNS} FROM leagues ORDER BY year, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_league_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_league_row(row: &rusqlite::Row) -> rusqlite::Result<League> {
    Ok(League {
        code: row.get(0)?,
        name: row.get(1)?,
        year: row.get(2)?,
        doc_id: row.get(3)?,
        death_at_loss: row.get(4)?,
        entropy_sheet: row.get(5)?,
        omw_includes_entropy: row.get(6)?,
        standings_range: row.get(7)?,
        matches_range: row.get(8)?,
    })
}
