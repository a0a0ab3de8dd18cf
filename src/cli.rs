use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "League spreadsheet ledger")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Read league sheets into the database
    Ingest {
        /// Only this league (all stored leagues when omitted)
        #[arg(short, long)]
        league: Option<String>,
    },
    /// Copy win rates and top 8 counts from the stats sheet
    Refresh,
    /// Register a league so it is picked up by ingestion
    AddLeague {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        year: Option<i64>,
        /// Spreadsheet id of the league's own sheet; the stats sheet is used without one
        #[arg(long)]
        doc_id: Option<String>,
        #[arg(long)]
        standings_range: Option<String>,
        #[arg(long)]
        matches_range: Option<String>,
        #[arg(long)]
        no_entropy_sheet: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
