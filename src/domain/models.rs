use crate::domain::names::{FullName, PartialName};

/// A player's finishing position in one league, as read from a standings table.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub player: FullName,
    pub rank: i64,
    pub opponent_match_win_rate: Option<f64>,
}

/// A stat keyed by a sheet name, e.g. a row of the cumulative record range.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedStat<T> {
    pub name: PartialName,
    pub value: T,
}

/// Sentinel opponent standing in for byes and forfeits; also ends a standings table.
pub const BYE_OPPONENT: &str = "ENTROPY";
