//! Shared lookup of live NPCs by entity id.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{NpcError, NpcResult};
use crate::npc::Npc;

/// Concurrent registry of live NPCs.
///
/// Entity ids are the primary key; profile uuids are searchable but not
/// required to be unique.
#[derive(Default)]
pub struct NpcRegistry {
    by_id: DashMap<i32, Arc<Npc>>,
}

impl NpcRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `npc` under its entity id.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::DuplicateEntityId`] when the id is taken; the
    /// existing NPC stays registered.
    pub fn insert(&self, npc: Arc<Npc>) -> NpcResult<()> {
        let entity_id = npc.entity_id();
        match self.by_id.entry(entity_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(NpcError::DuplicateEntityId { entity_id })
            }
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(npc);
                Ok(())
            }
        }
    }

    /// Removes and returns the NPC registered under `entity_id`.
    pub fn remove(&self, entity_id: i32) -> Option<Arc<Npc>> {
        self.by_id.remove(&entity_id).map(|(_, npc)| npc)
    }

    /// Looks up an NPC by entity id.
    #[must_use]
    pub fn get(&self, entity_id: i32) -> Option<Arc<Npc>> {
        self.by_id.get(&entity_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Finds the first NPC whose profile uuid matches.
    #[must_use]
    pub fn by_unique_id(&self, unique_id: Uuid) -> Option<Arc<Npc>> {
        self.by_id
            .iter()
            .find(|entry| entry.value().profile().unique_id() == unique_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every registered NPC.
    #[must_use]
    pub fn npcs(&self) -> Vec<Arc<Npc>> {
        self.by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Number of registered NPCs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
