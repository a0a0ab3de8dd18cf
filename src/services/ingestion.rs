use anyhow::Result as AnyResult;
use log::{info, warn};
use serde::Serialize;

use crate::config::{AppConfig, load_alias_registry};
use crate::database::{LeagueStore, NewMatch, PlayerId, SqliteStore};
use crate::domain::{AliasRegistry, BYE_OPPONENT, NameReference, PartialName, SheetMatch, Standing};
use crate::errors::{IngestError, ReconcileError, Result};
use crate::services::identity::IdentityResolver;
use crate::sheets::{SheetReaders, SheetsClient, TabularSource};

/// What one league's ingestion wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub league: String,
    pub players_created: usize,
    pub entries_created: usize,
    pub entries_updated: usize,
    pub entries_unchanged: usize,
    pub matches_written: usize,
    pub matches_skipped: usize,
}

/// Outcome of ingesting every stored league.
#[derive(Debug, Default)]
pub struct IngestSummary {
    pub reports: Vec<IngestReport>,
    pub failures: Vec<IngestError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub checked: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Reads leagues from the tabular source and writes players, entries and matches.
pub struct IngestionService<S, T> {
    store: S,
    source: T,
    registry: AliasRegistry,
    stats_sheet_id: String,
}

impl IngestionService<SqliteStore, SheetsClient> {
    pub fn from_config(store: SqliteStore, config: &AppConfig) -> AnyResult<Self> {
        let source = SheetsClient::new(config.require_api_key()?, &config.sheets)?;
        let registry = load_alias_registry(config.alias_registry_path.as_deref())?;
        Ok(Self::new(store, source, registry, config.require_stats_sheet_id()?))
    }
}

impl<S: LeagueStore, T: TabularSource> IngestionService<S, T> {
    pub fn new(store: S, source: T, registry: AliasRegistry, stats_sheet_id: &str) -> Self {
        Self {
            store,
            source,
            registry,
            stats_sheet_id: stats_sheet_id.to_string(),
        }
    }

    /// Ingest one league: standings first, then its matches.
    pub async fn ingest_league(&self, code: &str) -> std::result::Result<IngestReport, IngestError> {
        info!("=== Ingesting league {} ===", code);
        let report = self
            .run_league(code)
            .await
            .map_err(|e| IngestError::new(code, e))?;

        info!(
            "  → {}: {} players created, {} entries created, {} updated, {} unchanged, {} matches ({} skipped)",
            code,
            report.players_created,
            report.entries_created,
            report.entries_updated,
            report.entries_unchanged,
            report.matches_written,
            report.matches_skipped
        );
        Ok(report)
    }

    /// Ingest every stored league in turn. A failed league does not stop the rest.
    pub async fn ingest_all(&self) -> Result<IngestSummary> {
        let leagues = self.store.list_leagues()?;
        info!("=== Starting ingestion of {} leagues ===", leagues.len());

        let mut summary = IngestSummary::default();
        for league in leagues {
            match self.ingest_league(&league.code).await {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    warn!("{}", e);
                    summary.failures.push(e);
                }
            }
        }

        info!(
            "=== Ingestion complete: {} succeeded, {} failed ===",
            summary.reports.len(),
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Copy win rates from the stats sheet, writing only values that changed.
    pub async fn refresh_win_rates(&self) -> Result<RefreshReport> {
        info!("Refreshing win rates");
        let rates = self.readers().stats().win_rates().await?;
        let resolver = self.resolver();

        let mut report = RefreshReport::default();
        for stat in rates {
            let player = resolver
                .find_player(&stat.name)?
                .ok_or_else(|| missing_player(&stat.name))?;
            report.checked += 1;
            if player.win_rate != Some(stat.value) {
                self.store.update_win_rate(player.id, stat.value)?;
                report.updated += 1;
            }
        }

        info!("  → Updated {} of {} win rates", report.updated, report.checked);
        Ok(report)
    }

    /// Copy top 8 counts from the stats sheet, writing only values that changed.
    pub async fn refresh_top8s(&self) -> Result<RefreshReport> {
        info!("Refreshing top 8 counts");
        let counts = self.readers().stats().top8s().await?;
        let resolver = self.resolver();

        let mut report = RefreshReport::default();
        for stat in counts {
            let player = resolver
                .find_player(&stat.name)?
                .ok_or_else(|| missing_player(&stat.name))?;
            report.checked += 1;
            if player.top8_count != Some(stat.value) {
                self.store.update_top8_count(player.id, stat.value)?;
                report.updated += 1;
            }
        }

        info!("  → Updated {} of {} top 8 counts", report.updated, report.checked);
        Ok(report)
    }

    /// Create the entry, or fix its rank. No write when the rank already matches.
    pub fn upsert_entry(&self, player_id: PlayerId, league_code: &str, rank: i64) -> Result<UpsertOutcome> {
        match self.store.find_entry(player_id, league_code)? {
            None => {
                self.store.create_entry(player_id, league_code, rank)?;
                Ok(UpsertOutcome::Created)
            }
            Some(entry) if entry.rank != rank => {
                self.store.update_entry_rank(entry.id, rank)?;
                Ok(UpsertOutcome::Updated)
            }
            Some(_) => Ok(UpsertOutcome::Unchanged),
        }
    }

    async fn run_league(&self, code: &str) -> Result<IngestReport> {
        let league = self
            .store
            .find_league(code)?
            .ok_or_else(|| ReconcileError::no_match(format!("No league with code {}", code)))?;
        let readers = self.readers();
        let reader = readers.for_league(&league);
        let mut report = IngestReport {
            league: code.to_string(),
            ..IngestReport::default()
        };

        info!("Step 1: Reading standings...");
        let standings = reader.standings().await?;
        for standing in &standings {
            self.ingest_standing(code, standing, &mut report)?;
        }

        info!("Step 2: Reading matches...");
        let sheet_matches = reader.matches().await?;
        let mut new_matches = Vec::with_capacity(sheet_matches.len());
        for sheet_match in &sheet_matches {
            match self.resolve_match(code, sheet_match)? {
                Some(new_match) => new_matches.push(new_match),
                None => report.matches_skipped += 1,
            }
        }

        report.matches_written = self.store.replace_matches(code, &new_matches)?;
        Ok(report)
    }

    fn ingest_standing(&self, code: &str, standing: &Standing, report: &mut IngestReport) -> Result<()> {
        let (player, created) = self.resolver().get_or_create(&standing.player)?;
        if created {
            report.players_created += 1;
        }

        match self.upsert_entry(player.id, code, standing.rank)? {
            UpsertOutcome::Created => report.entries_created += 1,
            UpsertOutcome::Updated => report.entries_updated += 1,
            UpsertOutcome::Unchanged => report.entries_unchanged += 1,
        }
        Ok(())
    }

    /// `None` for a loss recorded against the bye opponent.
    fn resolve_match(&self, code: &str, sheet_match: &SheetMatch) -> Result<Option<NewMatch>> {
        if is_bye(&sheet_match.loser) {
            return Ok(None);
        }

        let resolver = self.resolver();
        let loser_id = resolver.resolve_player_id(&sheet_match.loser, Some(code))?;
        let winner_id = if is_bye(&sheet_match.winner) {
            None
        } else {
            Some(resolver.resolve_player_id(&sheet_match.winner, Some(code))?)
        };

        Ok(Some(NewMatch {
            played_at: sheet_match.timestamp,
            winner_id,
            loser_id,
            score: sheet_match.score.clone(),
        }))
    }

    fn readers(&self) -> SheetReaders<'_, T> {
        SheetReaders::new(&self.source, &self.stats_sheet_id)
    }

    fn resolver(&self) -> IdentityResolver<'_, S> {
        IdentityResolver::new(&self.store, &self.registry)
    }
}

fn is_bye(name: &PartialName) -> bool {
    name.name().eq_ignore_ascii_case(BYE_OPPONENT)
}

fn missing_player(name: &PartialName) -> ReconcileError {
    ReconcileError::no_match(format!("No player for {}", name.formatted()))
}
