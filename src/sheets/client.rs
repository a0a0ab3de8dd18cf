use std::future::Future;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use urlencoding::encode;

use crate::config::SheetsSettings;
use crate::http::RateLimitedClient;

/// A spreadsheet and an A1 range within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetLocator {
    pub spreadsheet_id: String,
    pub range: String,
}

impl SheetLocator {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }
}

impl std::fmt::Display for SheetLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}", self.spreadsheet_id, self.range)
    }
}

/// Provider of whole tables of string cells.
pub trait TabularSource: Send + Sync {
    /// The table row by row.
    fn get_rows(&self, locator: &SheetLocator) -> impl Future<Output = Result<Vec<Vec<String>>>> + Send;

    /// The table column by column, for rosters laid out one group per column.
    fn get_columns(
        &self,
        locator: &SheetLocator,
    ) -> impl Future<Output = Result<Vec<Vec<String>>>> + Send;
}

#[derive(Debug, Clone, Copy)]
enum MajorDimension {
    Rows,
    Columns,
}

impl MajorDimension {
    fn as_str(&self) -> &'static str {
        match self {
            MajorDimension::Rows => "ROWS",
            MajorDimension::Columns => "COLUMNS",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeResponse {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    values: Option<Vec<Vec<String>>>,
}

/// Google Sheets values API client
pub struct SheetsClient {
    client: RateLimitedClient,
    api_key: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(api_key: &str, settings: &SheetsSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_values(
        &self,
        locator: &SheetLocator,
        dimension: MajorDimension,
    ) -> Result<Vec<Vec<String>>> {
        let url = self.build_values_url(locator, dimension);
        info!("Fetching {} ({})", locator, dimension.as_str());

        let response = self.client.get(&url).await?;

        if !response.status().is_success() {
            anyhow::bail!("Sheets API returned status {} for {}", response.status(), locator);
        }

        let body: ValueRangeResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse values response for {}", locator))?;

        let values = body
            .values
            .with_context(|| format!("No values returned for {}", locator))?;

        debug!(
            "Got {} {} from {}",
            values.len(),
            dimension.as_str().to_lowercase(),
            body.range.as_deref().unwrap_or(&locator.range)
        );
        Ok(values)
    }

    fn build_values_url(&self, locator: &SheetLocator, dimension: MajorDimension) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}?key={}&majorDimension={}",
            self.base_url,
            encode(&locator.spreadsheet_id),
            encode(&locator.range),
            encode(&self.api_key),
            dimension.as_str()
        )
    }
}

impl TabularSource for SheetsClient {
    async fn get_rows(&self, locator: &SheetLocator) -> Result<Vec<Vec<String>>> {
        self.fetch_values(locator, MajorDimension::Rows).await
    }

    async fn get_columns(&self, locator: &SheetLocator) -> Result<Vec<Vec<String>>> {
        self.fetch_values(locator, MajorDimension::Columns).await
    }
}
