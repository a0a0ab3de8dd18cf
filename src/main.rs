use anyhow::Result;

use league_ledger::cli::Command;
use league_ledger::database::League;
use league_ledger::{
    handle_add_league, handle_completions, handle_ingest, handle_refresh, handle_serve, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(command)
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(port),
        Command::Ingest { league } => handle_ingest(league.as_deref()),
        Command::Refresh => handle_refresh(),
        Command::AddLeague {
            code,
            name,
            year,
            doc_id,
            standings_range,
            matches_range,
            no_entropy_sheet,
        } => handle_add_league(League {
            code,
            name,
            year,
            doc_id,
            standings_range,
            matches_range,
            entropy_sheet: !no_entropy_sheet,
            ..League::default()
        }),
        Command::Completions { shell } => handle_completions(shell),
    }
}
