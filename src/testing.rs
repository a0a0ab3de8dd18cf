use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::sheets::{SheetLocator, TabularSource};

/// Tabular source serving fixed tables, for driving readers and ingestion in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: HashMap<SheetLocator, Vec<Vec<String>>>,
    columns: HashMap<SheetLocator, Vec<Vec<String>>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, spreadsheet_id: &str, range: &str, rows: &[&[&str]]) -> Self {
        self.with_owned_rows(spreadsheet_id, range, to_owned_table(rows))
    }

    pub fn with_owned_rows(mut self, spreadsheet_id: &str, range: &str, rows: Vec<Vec<String>>) -> Self {
        self.rows.insert(SheetLocator::new(spreadsheet_id, range), rows);
        self
    }

    pub fn with_columns(mut self, spreadsheet_id: &str, range: &str, columns: &[&[&str]]) -> Self {
        self.columns
            .insert(SheetLocator::new(spreadsheet_id, range), to_owned_table(columns));
        self
    }
}

impl TabularSource for StaticSource {
    async fn get_rows(&self, locator: &SheetLocator) -> Result<Vec<Vec<String>>> {
        self.rows
            .get(locator)
            .cloned()
            .with_context(|| format!("No rows registered for {}", locator))
    }

    async fn get_columns(&self, locator: &SheetLocator) -> Result<Vec<Vec<String>>> {
        self.columns
            .get(locator)
            .cloned()
            .with_context(|| format!("No columns registered for {}", locator))
    }
}

fn to_owned_table(table: &[&[&str]]) -> Vec<Vec<String>> {
    table
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}
