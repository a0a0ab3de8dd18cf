use std::collections::HashMap;

use log::{debug, info};

use crate::database::League;
use crate::domain::{
    BYE_OPPONENT, FullName, MatchHalf, MatchPairReconciler, NamedStat, PartialName, SheetMatch,
    Standing, dates::parse_timestamp,
};
use crate::errors::{ReconcileError, Result};
use crate::sheets::client::{SheetLocator, TabularSource};
use crate::sheets::table::{NOT_AVAILABLE, SheetRow, SheetTable};

const RECORD_RANGE: &str = "Cumulative Record!E2:I";
const TOP_8_RANGE: &str = "Wins, Top8s, Top16s!D2:F";
const LEAGUE_RANGE: &str = "Players By League";
const MATCH_RANGE: &str = "Matches KLR-Present!A2:M";

const DEFAULT_STANDINGS_RANGE: &str = "Standings!A5:10000";
const DEFAULT_MATCH_RANGE: &str = "Matches!A:Z";

const PLAYER_NAME_HEADER: &str = "PLAYER NAME";
const ARENA_ID_HEADER: &str = "ARENA ID";
const RANK_HEADER: &str = "RANK";
const OMW_HEADER: &str = "OMW%";
const WINNER_HEADER: &str = "Winner Name";
const LOSER_HEADER: &str = "Loser Name";
const TIMESTAMP_HEADER: &str = "Timestamp";
const RESULT_HEADER: &str = "Result";

/// Picks the reader layout for each league.
pub struct SheetReaders<'a, S> {
    source: &'a S,
    stats_sheet_id: String,
}

impl<'a, S: TabularSource> SheetReaders<'a, S> {
    pub fn new(source: &'a S, stats_sheet_id: &str) -> Self {
        Self {
            source,
            stats_sheet_id: stats_sheet_id.to_string(),
        }
    }

    /// Leagues without their own spreadsheet are read from the shared stats sheet.
    pub fn for_league(&self, league: &League) -> LeagueReader<'a, S> {
        match &league.doc_id {
            Some(doc_id) if !doc_id.trim().is_empty() => LeagueReader::Sheet(LeagueSheetReader {
                source: self.source,
                sheet_id: doc_id.clone(),
                standings_range: league
                    .standings_range
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STANDINGS_RANGE.to_string()),
                matches_range: league
                    .matches_range
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MATCH_RANGE.to_string()),
                league_code: league.code.clone(),
            }),
            _ => LeagueReader::Stats(StatsSheetLeagueReader {
                league_code: league.code.clone(),
                stats: self.stats(),
            }),
        }
    }

    pub fn stats(&self) -> StatsSheetReader<'a, S> {
        StatsSheetReader {
            source: self.source,
            sheet_id: self.stats_sheet_id.clone(),
        }
    }
}

pub enum LeagueReader<'a, S> {
    Sheet(LeagueSheetReader<'a, S>),
    Stats(StatsSheetLeagueReader<'a, S>),
}

impl<S: TabularSource> LeagueReader<'_, S> {
    pub async fn standings(&self) -> Result<Vec<Standing>> {
        match self {
            LeagueReader::Sheet(reader) => reader.standings().await,
            LeagueReader::Stats(reader) => reader.standings().await,
        }
    }

    pub async fn matches(&self) -> Result<Vec<SheetMatch>> {
        match self {
            LeagueReader::Sheet(reader) => reader.matches().await,
            LeagueReader::Stats(reader) => reader.stats.matches_for_league(&reader.league_code).await,
        }
    }
}

/// A league with its own spreadsheet: header-indexed standings and already-merged matches.
pub struct LeagueSheetReader<'a, S> {
    source: &'a S,
    sheet_id: String,
    standings_range: String,
    matches_range: String,
    league_code: String,
}

impl<S: TabularSource> LeagueSheetReader<'_, S> {
    pub async fn standings(&self) -> Result<Vec<Standing>> {
        info!("Getting standings for {} from {}", self.league_code, self.standings_range);
        let table = fetch_table(self.source, &SheetLocator::new(&self.sheet_id, &self.standings_range)).await?;

        // The standings list ends at the ENTROPY row; decoration follows it.
        table
            .rows()
            .until_marker(PLAYER_NAME_HEADER, BYE_OPPONENT)
            .map(|row| standing_from_row(&row))
            .collect()
    }

    pub async fn matches(&self) -> Result<Vec<SheetMatch>> {
        let table = fetch_table(self.source, &SheetLocator::new(&self.sheet_id, &self.matches_range)).await?;

        let mut matches = Vec::new();
        for row in table.rows() {
            // Some sheets have hidden rows at the start.
            if row.required_column(WINNER_HEADER)?.is_empty()
                && row.required_column(LOSER_HEADER)?.is_empty()
            {
                continue;
            }
            matches.push(match_from_row(&row, &self.league_code)?);
        }
        debug!("Read {} matches for {}", matches.len(), self.league_code);
        Ok(matches)
    }
}

/// A league listed on the shared stats sheet.
pub struct StatsSheetLeagueReader<'a, S> {
    league_code: String,
    stats: StatsSheetReader<'a, S>,
}

impl<S: TabularSource> StatsSheetLeagueReader<'_, S> {
    /// Roster order is the ranking.
    pub async fn standings(&self) -> Result<Vec<Standing>> {
        let mut by_league = self.stats.players_by_league().await?;
        let players = by_league.remove(&self.league_code).unwrap_or_default();

        Ok(players
            .into_iter()
            .zip(1..)
            .map(|(player, rank)| Standing {
                player,
                rank,
                opponent_match_win_rate: None,
            })
            .collect())
    }
}

/// Reads the cross-league stats spreadsheet.
pub struct StatsSheetReader<'a, S> {
    source: &'a S,
    sheet_id: String,
}

impl<S: TabularSource> StatsSheetReader<'_, S> {
    /// League code to roster, one league per column: row 1 is the code, rows 2.. the players.
    pub async fn players_by_league(&self) -> Result<HashMap<String, Vec<FullName>>> {
        let columns = self
            .source
            .get_columns(&self.locator(LEAGUE_RANGE))
            .await
            .map_err(ReconcileError::Source)?;

        let mut players_by_league = HashMap::new();
        for column in columns {
            if column.len() < 2 {
                return Err(ReconcileError::invalid_format(format!(
                    "League column has {} rows, expected a header and a code",
                    column.len()
                )));
            }

            let players = column[2..]
                .iter()
                .filter(|cell| !is_blank(cell))
                .map(|cell| FullName::parse(cell))
                .collect::<Result<Vec<_>>>()?;
            players_by_league.insert(column[1].trim().to_string(), players);
        }
        Ok(players_by_league)
    }

    /// Pair the match log's half-records for one league.
    pub async fn matches_for_league(&self, league_code: &str) -> Result<Vec<SheetMatch>> {
        let rows = self
            .source
            .get_rows(&self.locator(MATCH_RANGE))
            .await
            .map_err(ReconcileError::Source)?;

        let mut halves = Vec::new();
        for row in &rows {
            if row.iter().all(|cell| is_blank(cell)) {
                continue;
            }
            // Column B holds the league code; other leagues' rows are not parsed.
            if row.get(1).map(|format| format.trim()) != Some(league_code) {
                continue;
            }
            halves.push(MatchHalf::from_row(row)?);
        }

        MatchPairReconciler::reconcile_all(halves)
    }

    pub async fn win_rates(&self) -> Result<Vec<NamedStat<f64>>> {
        let rows = self
            .source
            .get_rows(&self.locator(RECORD_RANGE))
            .await
            .map_err(ReconcileError::Source)?;

        named_stats(&rows, 3, |raw| {
            raw.trim()
                .trim_end_matches('%')
                .parse::<f64>()
                .map_err(|_| ReconcileError::invalid_format(format!("Bad win rate {}", raw)))
        })
    }

    pub async fn top8s(&self) -> Result<Vec<NamedStat<i64>>> {
        let rows = self
            .source
            .get_rows(&self.locator(TOP_8_RANGE))
            .await
            .map_err(ReconcileError::Source)?;

        named_stats(&rows, 1, |raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ReconcileError::invalid_format(format!("Bad top 8 count {}", raw)))
        })
    }

    fn locator(&self, range: &str) -> SheetLocator {
        SheetLocator::new(&self.sheet_id, range)
    }
}

async fn fetch_table<S: TabularSource>(source: &S, locator: &SheetLocator) -> Result<SheetTable> {
    let data = source.get_rows(locator).await.map_err(ReconcileError::Source)?;
    let table = SheetTable::new(data)?;
    debug!("Loaded {} as {}", locator, table);
    Ok(table)
}

fn named_stats<T>(
    rows: &[Vec<String>],
    value_index: usize,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<Vec<NamedStat<T>>> {
    rows.iter()
        .filter(|row| row.first().is_some_and(|name| !is_blank(name)))
        .map(|row| {
            let raw = row.get(value_index).ok_or_else(|| {
                ReconcileError::invalid_format(format!(
                    "Row for {} had too few columns. Needed: {} Had: {}",
                    row[0],
                    value_index + 1,
                    row.len()
                ))
            })?;
            Ok(NamedStat {
                name: PartialName::parse(&row[0])?,
                value: parse(raw.as_str())?,
            })
        })
        .collect()
}

fn standing_from_row(row: &SheetRow<'_>) -> Result<Standing> {
    let player = FullName::new(
        row.required_column(PLAYER_NAME_HEADER)?,
        row.required_column(ARENA_ID_HEADER)?,
    )?;

    let raw_rank = row.required_column(RANK_HEADER)?;
    let rank = raw_rank.trim().parse::<i64>().map_err(|_| {
        ReconcileError::invalid_format(format!("Bad rank {:?} for {}", raw_rank, player))
    })?;

    let opponent_match_win_rate = match row.optional_column(OMW_HEADER)? {
        Some(raw) if !is_blank(raw) => {
            let value = raw.split('%').next().unwrap_or_default().trim();
            Some(value.parse::<f64>().map_err(|_| {
                ReconcileError::invalid_format(format!("Bad OMW% {:?} for {}", raw, player))
            })?)
        }
        _ => None,
    };

    Ok(Standing {
        player,
        rank,
        opponent_match_win_rate,
    })
}

fn match_from_row(row: &SheetRow<'_>, league_code: &str) -> Result<SheetMatch> {
    Ok(SheetMatch {
        league_code: league_code.to_string(),
        winner: PartialName::parse(row.required_column(WINNER_HEADER)?)?,
        loser: PartialName::parse(row.required_column(LOSER_HEADER)?)?,
        timestamp: parse_timestamp(row.required_column(TIMESTAMP_HEADER)?)?,
        score: row.required_column(RESULT_HEADER)?.to_string(),
    })
}

fn is_blank(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed == NOT_AVAILABLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NameReference;
    use crate::testing::StaticSource;

    fn league(code: &str, doc_id: Option<&str>) -> League {
        League {
            code: code.to_string(),
            doc_id: doc_id.map(str::to_string),
            ..League::default()
        }
    }

    #[tokio::test]
    async fn sheet_standings_stop_at_entropy() {
        let source = StaticSource::new().with_rows(
            "doc",
            DEFAULT_STANDINGS_RANGE,
            &[
                &["Rank", "Player Name", "Arena ID", "OMW%", "RANK"],
                &["1", "Jace", "Jace#1", "61.5%", "x"],
                &["", "", "", "", ""],
                &["2", "Lili", "Lili#2", "", ""],
                &["", "ENTROPY", "", "", ""],
                &["3", "Notes", "n/a", "", ""],
            ],
        );
        let readers = SheetReaders::new(&source, "stats");

        let standings = readers
            .for_league(&league("KLR", Some("doc")))
            .standings()
            .await
            .unwrap();

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].player.formatted(), "Jace - Jace#1");
        assert_eq!(standings[0].rank, 1);
        assert_eq!(standings[0].opponent_match_win_rate, Some(61.5));
        assert_eq!(standings[1].opponent_match_win_rate, None);
    }

    #[tokio::test]
    async fn sheet_matches_skip_hidden_rows() {
        let source = StaticSource::new().with_rows(
            "doc",
            DEFAULT_MATCH_RANGE,
            &[
                &["Timestamp", "Winner Name", "Loser Name", "Result"],
                &["2024-03-01", "", "", "2-0"],
                &["2024-03-02", "Jace - Jace#1", "Lili", "2-1"],
            ],
        );
        let readers = SheetReaders::new(&source, "stats");

        let matches = readers
            .for_league(&league("KLR", Some("doc")))
            .matches()
            .await
            .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].league_code, "KLR");
        assert_eq!(matches[0].winner.secondary_id(), Some("Jace#1"));
        assert_eq!(matches[0].loser.secondary_id(), None);
        assert_eq!(matches[0].score, "2-1");
    }

    #[tokio::test]
    async fn stats_sheet_roster_order_is_rank() {
        let source = StaticSource::new().with_columns(
            "stats",
            LEAGUE_RANGE,
            &[
                &["League", "KLR", "Jace - Jace#1", "Lili - Lili#2"],
                &["League", "MKM", "Lili - Lili#2"],
            ],
        );
        let readers = SheetReaders::new(&source, "stats");

        let standings = readers
            .for_league(&league("KLR", None))
            .standings()
            .await
            .unwrap();

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[1].player.formatted(), "Lili - Lili#2");
        assert_eq!(standings[1].rank, 2);
    }

    #[tokio::test]
    async fn stats_sheet_matches_are_filtered_and_paired() {
        let row = |code: &str, format: &str, player: &str, result: &str| -> Vec<String> {
            let mut cells = vec![String::new(); 13];
            cells[0] = code.into();
            cells[1] = format.into();
            cells[3] = "2024-03-01 10:00:00".into();
            cells[4] = player.into();
            cells[5] = result.into();
            cells[10] = "2-1".into();
            cells
        };
        let source = StaticSource::new().with_owned_rows(
            "stats",
            MATCH_RANGE,
            vec![
                row("a", "KLR", "Jace - Jace#1", "Win"),
                row("b", "MKM", "Lili - Lili#2", "Win"),
                row("a", "KLR", "Lili - Lili#2", "Loss"),
            ],
        );
        let readers = SheetReaders::new(&source, "stats");

        let matches = readers.stats().matches_for_league("KLR").await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].winner.name(), "Jace");
        assert_eq!(matches[0].loser.name(), "Lili");
    }

    #[tokio::test]
    async fn win_rates_strip_percent() {
        let source = StaticSource::new().with_rows(
            "stats",
            RECORD_RANGE,
            &[
                &["Jace - Jace#1", "10", "5", "66.7%"],
                &["", "", "", ""],
                &["Lili", "1", "1", "50"],
            ],
        );
        let readers = SheetReaders::new(&source, "stats");

        let rates = readers.stats().win_rates().await.unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].value, 66.7);
        assert_eq!(rates[1].name.name(), "Lili");
        assert_eq!(rates[1].value, 50.0);
    }

    #[tokio::test]
    async fn missing_range_is_a_source_error() {
        let source = StaticSource::new();
        let readers = SheetReaders::new(&source, "stats");

        let result = readers.stats().top8s().await;

        assert!(matches!(result, Err(ReconcileError::Source(_))));
    }
}
