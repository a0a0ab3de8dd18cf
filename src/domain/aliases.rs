use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::names::NameReference;
use crate::errors::{ReconcileError, Result};

/// Every known spelling and secondary id for one competitor.
///
/// An empty `secondary_ids` set means any id is accepted for the listed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasGroup {
    pub preferred_name: String,
    pub names: BTreeSet<String>,
    #[serde(default)]
    pub secondary_ids: BTreeSet<String>,
}

impl AliasGroup {
    /// Group holding only the given reference, used for competitors missing from the registry.
    pub fn singleton(reference: &impl NameReference) -> Self {
        Self {
            preferred_name: reference.name().to_string(),
            names: BTreeSet::from([reference.name().to_string()]),
            secondary_ids: reference
                .secondary_id()
                .map(|id| BTreeSet::from([id.to_string()]))
                .unwrap_or_default(),
        }
    }

    fn accepts_secondary_id(&self, secondary_id: &str) -> bool {
        self.secondary_ids.is_empty() || self.secondary_ids.contains(secondary_id)
    }

    fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Lazily pair every name with every secondary id. A group without ids pairs each
    /// name with `default_secondary_id` instead.
    pub fn expand<'a>(
        &'a self,
        default_secondary_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let ids: Vec<&'a str> = if self.secondary_ids.is_empty() {
            vec![default_secondary_id]
        } else {
            self.secondary_ids.iter().map(String::as_str).collect()
        };

        self.names.iter().flat_map(move |name| {
            ids.clone()
                .into_iter()
                .map(move |id| (name.as_str(), id))
        })
    }
}

/// Static registry of alias groups consulted when a player is seen for the first time.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    groups: Vec<AliasGroup>,
}

impl AliasRegistry {
    pub fn new(groups: Vec<AliasGroup>) -> Self {
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Find the single group matching `reference`, or synthesize a singleton one.
    pub fn resolve(&self, reference: &impl NameReference) -> Result<AliasGroup> {
        let candidates: Vec<&AliasGroup> = self
            .groups
            .iter()
            .filter(|group| match reference.secondary_id() {
                Some(id) => group.accepts_secondary_id(id),
                None => true,
            })
            .filter(|group| group.contains_name(reference.name()))
            .collect();

        match candidates.as_slice() {
            [] => {
                debug!("No alias group for {}, creating one", reference.formatted());
                Ok(AliasGroup::singleton(reference))
            }
            [group] => Ok((*group).clone()),
            many => Err(ReconcileError::not_unique(format!(
                "{} alias groups match {}: {}",
                many.len(),
                reference.formatted(),
                many.iter()
                    .map(|g| g.preferred_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}
