use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use log::debug;

use crate::domain::dates::parse_timestamp;
use crate::domain::names::PartialName;
use crate::errors::{ReconcileError, Result};

pub const RESULT_WIN: &str = "Win";
pub const RESULT_LOSS: &str = "Loss";

const CODE_INDEX: usize = 0;
const FORMAT_INDEX: usize = 1;
const TIME_INDEX: usize = 3;
const PLAYER_INDEX: usize = 4;
const RESULT_INDEX: usize = 5;
const SCORE_INDEX: usize = 10;
const EXPECTED_LENGTH: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Other(String),
}

impl MatchResult {
    pub fn parse(raw: &str) -> Self {
        match raw {
            RESULT_WIN => Self::Win,
            RESULT_LOSS => Self::Loss,
            other => Self::Other(other.to_string()),
        }
    }

    /// The result text as it appeared in the sheet.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Win => RESULT_WIN,
            Self::Loss => RESULT_LOSS,
            Self::Other(raw) => raw,
        }
    }
}

/// One participant's report of a match, as logged on the stats sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchHalf {
    pub code: String,
    pub format: String,
    pub timestamp: NaiveDateTime,
    pub player: PartialName,
    pub result: MatchResult,
    pub score: String,
}

impl MatchHalf {
    /// Build a half from a fixed-position match log row.
    pub fn from_row(row: &[String]) -> Result<Self> {
        if row.len() < EXPECTED_LENGTH {
            return Err(ReconcileError::invalid_format(format!(
                "Missing match data. Expected length of {}, got length of {}",
                EXPECTED_LENGTH,
                row.len()
            )));
        }

        Ok(Self {
            code: row[CODE_INDEX].clone(),
            format: row[FORMAT_INDEX].clone(),
            timestamp: parse_timestamp(&row[TIME_INDEX])?,
            player: PartialName::parse(&row[PLAYER_INDEX])?,
            result: MatchResult::parse(&row[RESULT_INDEX]),
            score: row[SCORE_INDEX].clone(),
        })
    }
}

/// A match with both sides known, ready for identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetMatch {
    pub league_code: String,
    pub winner: PartialName,
    pub loser: PartialName,
    pub timestamp: NaiveDateTime,
    pub score: String,
}

/// Pairs win and loss halves that share a match code.
#[derive(Debug, Default)]
pub struct MatchPairReconciler {
    pending: HashMap<String, MatchHalf>,
    completed: HashSet<String>,
}

impl MatchPairReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next half. Returns the merged match once both halves have been seen.
    pub fn push(&mut self, half: MatchHalf) -> Result<Option<SheetMatch>> {
        if self.completed.contains(&half.code) {
            return Err(ReconcileError::invalid_format(format!(
                "Extra entry for duplicate code {}",
                half.code
            )));
        }

        let Some(pending) = self.pending.remove(&half.code) else {
            self.pending.insert(half.code.clone(), half);
            return Ok(None);
        };

        let code = half.code.clone();
        let merged = merge(pending, half)?;
        self.completed.insert(code);
        Ok(Some(merged))
    }

    /// Fail if any half never found its partner.
    pub fn finish(self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut codes: Vec<&str> = self.pending.keys().map(String::as_str).collect();
        codes.sort_unstable();
        Err(ReconcileError::invalid_format(format!(
            "{} extra half matches: {}",
            codes.len(),
            codes.join(", ")
        )))
    }

    pub fn reconcile_all(halves: impl IntoIterator<Item = MatchHalf>) -> Result<Vec<SheetMatch>> {
        let mut reconciler = Self::new();
        let mut matches = Vec::new();

        for half in halves {
            if let Some(merged) = reconciler.push(half)? {
                matches.push(merged);
            }
        }

        reconciler.finish()?;
        debug!("Reconciled {} matches", matches.len());
        Ok(matches)
    }
}

fn merge(first: MatchHalf, second: MatchHalf) -> Result<SheetMatch> {
    let (win, loss) = match (&first.result, &second.result) {
        (MatchResult::Win, MatchResult::Loss) => (first, second),
        (MatchResult::Loss, MatchResult::Win) => (second, first),
        _ => {
            return Err(ReconcileError::invalid_format(format!(
                "Match {} did not have 1 win and 1 loss, got {:?} and {:?}",
                first.code,
                first.result.as_str(),
                second.result.as_str()
            )));
        }
    };

    Ok(SheetMatch {
        league_code: win.format,
        winner: win.player,
        loser: loss.player,
        timestamp: win.timestamp,
        score: win.score,
    })
}
