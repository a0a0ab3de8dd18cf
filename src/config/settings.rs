use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "league_ledger.db";

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: String,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 100, // 10 req/sec
            user_agent: "LeagueLedger/1.0",
            timeout_secs: 30,
            api_base_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub sheets_api_key: Option<String>,
    pub stats_sheet_id: Option<String>,
    pub admin_password: Option<String>,
    pub alias_registry_path: Option<PathBuf>,
    pub sheets: SheetsSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            sheets_api_key: None,
            stats_sheet_id: None,
            admin_password: None,
            alias_registry_path: None,
            sheets: SheetsSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            sheets_api_key: read_optional("SHEETS_API_KEY"),
            stats_sheet_id: read_optional("STATS_SHEET_ID"),
            admin_password: read_optional("ADMIN_PASSWORD"),
            alias_registry_path: read_optional("ALIAS_REGISTRY_PATH").map(PathBuf::from),
            sheets: SheetsSettings::default(),
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.sheets_api_key
            .as_deref()
            .context("Missing SHEETS_API_KEY")
    }

    pub fn require_stats_sheet_id(&self) -> Result<&str> {
        self.stats_sheet_id
            .as_deref()
            .context("Missing STATS_SHEET_ID")
    }

    pub fn require_admin_password(&self) -> Result<&str> {
        self.admin_password
            .as_deref()
            .context("Missing ADMIN_PASSWORD")
    }
}

fn read_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
