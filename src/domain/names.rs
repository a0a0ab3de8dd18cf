use std::fmt;
use std::str::FromStr;

use crate::errors::{ReconcileError, Result};

/// Separator between a display name and its secondary id, e.g. `"Jace - Jace#12345"`.
pub const NAME_SEPARATOR: &str = " - ";

/// A player name with an optional secondary id.
pub trait NameReference {
    fn name(&self) -> &str;
    fn secondary_id(&self) -> Option<&str>;

    fn formatted(&self) -> String {
        match self.secondary_id() {
            Some(id) => format!("{}{}{}", self.name(), NAME_SEPARATOR, id),
            None => self.name().to_string(),
        }
    }
}

/// Name whose secondary id may be missing. Parsing never fails on an absent id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialName {
    name: String,
    secondary_id: Option<String>,
}

/// Name whose secondary id is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullName {
    name: String,
    secondary_id: String,
}

impl PartialName {
    pub fn new(name: &str, secondary_id: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            secondary_id: secondary_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }

    pub fn parse(formatted: &str) -> Result<Self> {
        let parts = split_name(formatted);
        match parts.as_slice() {
            [name] => Ok(Self::new(name, None)),
            [name, id] => Ok(Self::new(name, Some(id))),
            _ => Err(ReconcileError::invalid_format(formatted)),
        }
    }

    /// Upgrade to a full name, failing when there is no secondary id.
    pub fn into_full(self) -> Result<FullName> {
        match self.secondary_id {
            Some(id) => Ok(FullName {
                name: self.name,
                secondary_id: id,
            }),
            None => Err(ReconcileError::invalid_format(format!(
                "Expected full format, got {}",
                self.name
            ))),
        }
    }
}

impl FullName {
    pub fn new(name: &str, secondary_id: &str) -> Result<Self> {
        let secondary_id = secondary_id.trim();
        if secondary_id.is_empty() {
            return Err(ReconcileError::invalid_format(format!(
                "Missing secondary id for {}",
                name.trim()
            )));
        }

        Ok(Self {
            name: name.trim().to_string(),
            secondary_id: secondary_id.to_string(),
        })
    }

    pub fn parse(formatted: &str) -> Result<Self> {
        let parts = split_name(formatted);
        match parts.as_slice() {
            [name, id] => Self::new(name, id).map_err(|_| expected_full(formatted)),
            _ => Err(expected_full(formatted)),
        }
    }

    pub fn id(&self) -> &str {
        &self.secondary_id
    }
}

fn split_name(formatted: &str) -> Vec<&str> {
    formatted.split(NAME_SEPARATOR).collect()
}

fn expected_full(formatted: &str) -> ReconcileError {
    ReconcileError::invalid_format(format!("Expected full format, got {}", formatted))
}

impl NameReference for PartialName {
    fn name(&self) -> &str {
        &self.name
    }

    fn secondary_id(&self) -> Option<&str> {
        self.secondary_id.as_deref()
    }
}

impl NameReference for FullName {
    fn name(&self) -> &str {
        &self.name
    }

    fn secondary_id(&self) -> Option<&str> {
        Some(&self.secondary_id)
    }
}

impl From<FullName> for PartialName {
    fn from(full: FullName) -> Self {
        Self {
            name: full.name,
            secondary_id: Some(full.secondary_id),
        }
    }
}

impl FromStr for PartialName {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for FullName {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PartialName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_round_trips_after_trimming() {
        let parsed = FullName::parse("  Jace  -  Jace#12345 ").unwrap();
        assert_eq!(parsed.name(), "Jace");
        assert_eq!(parsed.id(), "Jace#12345");
        assert_eq!(parsed.formatted(), "Jace - Jace#12345");
        assert_eq!(
            FullName::parse(&parsed.formatted()).unwrap().formatted(),
            parsed.formatted()
        );
    }

    #[test]
    fn full_name_rejects_wrong_part_counts() {
        assert!(matches!(
            FullName::parse("A - B - C"),
            Err(ReconcileError::InvalidFormat(_))
        ));
        assert!(matches!(
            FullName::parse("A"),
            Err(ReconcileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn full_name_rejects_empty_id() {
        assert!(matches!(
            FullName::parse("A - "),
            Err(ReconcileError::InvalidFormat(_))
        ));
    }

    #[test]
    fn partial_name_accepts_missing_id() {
        let parsed = PartialName::parse(" Bob ").unwrap();
        assert_eq!(parsed.name(), "Bob");
        assert_eq!(parsed.secondary_id(), None);
        assert_eq!(parsed.formatted(), "Bob");
    }

    #[test]
    fn partial_name_with_id() {
        let parsed: PartialName = "Bob - Bob#1".parse().unwrap();
        assert_eq!(parsed.secondary_id(), Some("Bob#1"));
        assert_eq!(parsed.to_string(), "Bob - Bob#1");
    }

    #[test]
    fn partial_name_rejects_three_parts() {
        assert!(PartialName::parse("A - B - C").is_err());
    }

    #[test]
    fn separator_needs_surrounding_spaces() {
        let parsed = PartialName::parse("Jean-Luc").unwrap();
        assert_eq!(parsed.name(), "Jean-Luc");
        assert_eq!(parsed.secondary_id(), None);
    }

    #[test]
    fn partial_upgrades_to_full_only_with_id() {
        assert!(PartialName::parse("Bob").unwrap().into_full().is_err());
        let full = PartialName::parse("Bob - 7").unwrap().into_full().unwrap();
        assert_eq!(full.formatted(), "Bob - 7");
    }
}
