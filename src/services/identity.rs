use log::{debug, info};

use crate::database::{LeagueStore, NewPlayer, Player, PlayerId};
use crate::domain::{AliasRegistry, FullName, NameReference};
use crate::errors::{ReconcileError, Result};

/// Maps name references to canonical players in the store.
pub struct IdentityResolver<'a, S> {
    store: &'a S,
    registry: &'a AliasRegistry,
}

impl<'a, S: LeagueStore> IdentityResolver<'a, S> {
    pub fn new(store: &'a S, registry: &'a AliasRegistry) -> Self {
        Self { store, registry }
    }

    /// Look a player up by secondary id first, then by exact alias.
    ///
    /// `Ok(None)` means nothing matched; several distinct players is `NotUniqueMatch`.
    pub fn find_player(&self, reference: &impl NameReference) -> Result<Option<Player>> {
        if let Some(secondary_id) = reference.secondary_id() {
            let mut ids = self.store.player_ids_by_secondary_id(secondary_id)?;
            ids.sort_unstable();
            ids.dedup();

            match ids.as_slice() {
                [] => {}
                [id] => return self.load(*id).map(Some),
                many => {
                    return Err(ReconcileError::not_unique(format!(
                        "Secondary id {} belongs to players {}",
                        secondary_id,
                        join_ids(many)
                    )));
                }
            }
        }

        let ids = self
            .store
            .player_ids_by_alias(reference.name(), reference.secondary_id())?;

        match ids.as_slice() {
            [] => Ok(None),
            [id] => self.load(*id).map(Some),
            many => Err(ReconcileError::not_unique(format!(
                "{} aliases match {}",
                many.len(),
                reference.formatted()
            ))),
        }
    }

    /// Find the player, or create it with aliases from its registry group.
    /// The flag is true when a player was created.
    pub fn get_or_create(&self, reference: &FullName) -> Result<(Player, bool)> {
        if let Some(player) = self.find_player(reference)? {
            return Ok((player, false));
        }

        let group = self.registry.resolve(reference)?;
        let display_name = FullName::new(&group.preferred_name, reference.id())?.formatted();
        let new_player = NewPlayer {
            display_name,
            name: reference.name().to_string(),
            secondary_id: reference.id().to_string(),
            aliases: group
                .expand(reference.id())
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect(),
        };

        let player = self.store.create_player(&new_player)?;
        info!(
            "Created player {} with {} aliases",
            player.display_name,
            new_player.aliases.len()
        );
        Ok((player, true))
    }

    /// Player id for a reference that must exist.
    ///
    /// A name without a secondary id needs a league to narrow the search; that path
    /// matches alias names of league entrants only.
    pub fn resolve_player_id(
        &self,
        reference: &impl NameReference,
        league_hint: Option<&str>,
    ) -> Result<PlayerId> {
        match (reference.secondary_id(), league_hint) {
            (Some(_), _) => self
                .find_player(reference)?
                .map(|player| player.id)
                .ok_or_else(|| {
                    ReconcileError::no_match(format!("No such player {}", reference.formatted()))
                }),
            (None, Some(league_code)) => {
                let ids = self
                    .store
                    .player_ids_by_name_in_league(reference.name(), league_code)?;
                debug!(
                    "{} players named {} in {}",
                    ids.len(),
                    reference.name(),
                    league_code
                );
                match ids.as_slice() {
                    [id] => Ok(*id),
                    [] => Err(ReconcileError::no_match(format!(
                        "No player named {} in {}",
                        reference.name(),
                        league_code
                    ))),
                    many => Err(ReconcileError::not_unique(format!(
                        "{} is ambiguous in {}: players {}",
                        reference.name(),
                        league_code,
                        join_ids(many)
                    ))),
                }
            }
            (None, None) => Err(ReconcileError::invalid_format(format!(
                "Need a secondary id or a league to resolve {}",
                reference.name()
            ))),
        }
    }

    fn load(&self, id: PlayerId) -> Result<Player> {
        self.store
            .find_player(id)?
            .ok_or_else(|| ReconcileError::no_match(format!("Player {} vanished", id)))
    }
}

fn join_ids(ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
