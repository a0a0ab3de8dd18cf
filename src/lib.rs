pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod pagination;
pub mod rate_limiter;
pub mod services;
pub mod sheets;
pub mod testing;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::Colorize;

use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::database::{League, LeagueStore, SqliteStore};
use crate::services::ingestion::{IngestReport, IngestionService, RefreshReport};
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::from_env();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_ingest(league: Option<&str>) -> Result<()> {
    let config = AppConfig::from_env();
    let store = SqliteStore::open(&config.database_path)?;
    let service = IngestionService::from_config(store, &config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match league {
            Some(code) => {
                let report = service.ingest_league(code).await?;
                print_report(&report);
            }
            None => {
                let summary = service.ingest_all().await?;
                for report in &summary.reports {
                    print_report(report);
                }
                for failure in &summary.failures {
                    println!("{} {}", "✗".red(), failure);
                }
                if !summary.failures.is_empty() {
                    anyhow::bail!("{} leagues failed", summary.failures.len());
                }
            }
        }
        Ok(())
    })
}

pub fn handle_refresh() -> Result<()> {
    let config = AppConfig::from_env();
    let store = SqliteStore::open(&config.database_path)?;
    let service = IngestionService::from_config(store, &config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        print_refresh("win rates", &service.refresh_win_rates().await?);
        print_refresh("top 8 counts", &service.refresh_top8s().await?);
        Ok(())
    })
}

pub fn handle_add_league(league: League) -> Result<()> {
    let config = AppConfig::from_env();
    let store = SqliteStore::open(&config.database_path)?;

    if store.create_league(&league)? {
        println!("{} Added league {}", "✓".green(), league.code.bold());
    } else {
        println!("{} League {} already exists", "•".yellow(), league.code.bold());
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();
    generate(shell, &mut command, bin_name, &mut std::io::stdout());
    Ok(())
}

fn print_report(report: &IngestReport) {
    println!(
        "{} {}: {} new players, entries {} new / {} updated / {} unchanged, {} matches ({} skipped)",
        "✓".green(),
        report.league.bold(),
        report.players_created,
        report.entries_created,
        report.entries_updated,
        report.entries_unchanged,
        report.matches_written,
        report.matches_skipped
    );
}

fn print_refresh(label: &str, report: &RefreshReport) {
    println!(
        "{} {}: {} of {} updated",
        "✓".green(),
        label,
        report.updated,
        report.checked
    );
}
