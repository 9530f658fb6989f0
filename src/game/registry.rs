use super::movement;
use super::types::{Direction, PlayerId, PlayerState, PlayerView, Position, WorldMap};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("player {0} is already registered")]
    DuplicateId(PlayerId),
    #[error("player {0} is not registered")]
    NotFound(PlayerId),
}

/// Connected players keyed by id.
///
/// Every operation holds at most one shard lock for the duration of a single
/// entry access, so readers on other shards never wait on a writer and no lock
/// outlives the call.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: DashMap<PlayerId, PlayerState>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, state: PlayerState) -> Result<(), RegistryError> {
        match self.players.entry(state.id) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateId(*entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(state);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<PlayerState> {
        self.players.get(&id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn update_position(&self, id: PlayerId, position: Position) -> Result<(), RegistryError> {
        let mut entry = self.players.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        entry.position = position;
        Ok(())
    }

    /// Reads the current position, validates the step and writes the result
    /// while holding the entry's write lock.
    pub fn apply_move(
        &self,
        id: PlayerId,
        direction: Direction,
        world: &WorldMap,
    ) -> Result<Position, RegistryError> {
        let mut entry = self.players.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        let next = movement::step(entry.position, direction, world);
        entry.position = next;
        Ok(next)
    }

    /// Removes the player. Returns `None` when the id was already gone.
    pub fn remove(&self, id: PlayerId) -> Option<PlayerState> {
        self.players.remove(&id).map(|(_, state)| state)
    }

    pub fn snapshot_all(&self) -> Vec<PlayerView> {
        self.players.iter().map(|entry| entry.value().view()).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
