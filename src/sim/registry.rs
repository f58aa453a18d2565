//! Entity registry
//!
//! The registry is the sole owner of every entity. Spawning and despawning only
//! queue work; [`Registry::refresh`] applies the queues once per step and
//! rebuilds the live list, so the list a step iterates never changes under it.
//! Something spawned mid-step is first updated and drawn after the next refresh.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::entity::{Entity, EntityKind};

/// Stable handle to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities the registry can filter by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Produces draw commands
    Drawable,
    /// Advances every step
    Simulatable,
    /// Takes part in collision checks
    Collidable,
}

#[derive(Debug, Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    pending_add: Vec<(EntityId, Entity)>,
    pending_remove: BTreeSet<EntityId>,
    /// Ids live as of the last refresh, ascending (= registration order)
    live: Vec<EntityId>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entity for the next refresh
    pub fn register(&mut self, entity: impl Into<Entity>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.pending_add.push((id, entity.into()));
        id
    }

    /// Queue an entity for removal. Undoes a registration still pending.
    pub fn unregister(&mut self, id: EntityId) {
        if let Some(index) = self.pending_add.iter().position(|(pending, _)| *pending == id) {
            self.pending_add.remove(index);
            return;
        }
        self.pending_remove.insert(id);
    }

    /// Apply queued removals, then additions, and rebuild the live list
    pub fn refresh(&mut self) {
        for id in std::mem::take(&mut self.pending_remove) {
            self.entities.remove(&id);
        }
        self.entities.extend(self.pending_add.drain(..));
        self.live = self.entities.keys().copied().collect();
    }

    /// Live ids as of the last refresh
    pub fn live(&self) -> &[EntityId] {
        &self.live
    }

    /// Live ids whose entity has `role`
    pub fn with_role(&self, role: Role) -> Vec<EntityId> {
        self.iter_live()
            .filter(|(_, entity)| entity.has_role(role))
            .map(|(id, _)| id)
            .collect()
    }

    /// Live entities, skipping any taken out for update
    pub fn iter_live(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.live
            .iter()
            .filter_map(|id| self.entities.get(id).map(|entity| (*id, entity)))
    }

    /// Live ids of one kind
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter_live()
            .filter(|(_, entity)| entity.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.iter_live().filter(|(_, entity)| entity.kind() == kind).count()
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.binary_search(&id).is_ok()
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_remove.contains(&id)
    }

    /// Look up an entity, including one registered since the last refresh
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).or_else(|| {
            self.pending_add
                .iter()
                .find(|(pending, _)| *pending == id)
                .map(|(_, entity)| entity)
        })
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.entities.contains_key(&id) {
            return self.entities.get_mut(&id);
        }
        self.pending_add
            .iter_mut()
            .find(|(pending, _)| *pending == id)
            .map(|(_, entity)| entity)
    }

    /// Borrow an entity out of storage for the length of its update
    pub fn take(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Put back an entity obtained from [`Registry::take`]
    pub fn restore(&mut self, id: EntityId, entity: Entity) {
        self.entities.insert(id, entity);
    }

    /// Entities in storage (live or awaiting removal)
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
