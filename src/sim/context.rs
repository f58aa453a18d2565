//! Per-step simulation context
//!
//! Everything an entity may touch during its update, borrowed from the world for
//! the length of one call: the registry (to spawn, despawn and query siblings),
//! the seeded RNG, input, audio, score, bounds and the step counter.

use std::panic::{self, AssertUnwindSafe};

use rand_pcg::Pcg32;

use super::entity::Entity;
use super::particle::{ParticleEmitter, ParticleSpec};
use super::pickup::PowerKind;
use super::registry::{EntityId, Registry};
use super::ship::Ship;
use super::state::Bounds;
use crate::audio::{AudioManager, SoundEffect};
use crate::platform::InputSource;
use crate::score::{ScoreSink, Scoreboard};
use crate::settings::Settings;

pub struct SimContext<'a> {
    pub registry: &'a mut Registry,
    pub rng: &'a mut Pcg32,
    pub input: &'a mut dyn InputSource,
    pub audio: &'a mut AudioManager,
    pub score: &'a mut Scoreboard,
    pub settings: &'a Settings,
    pub bounds: Bounds,
    pub ship_id: EntityId,
    /// Asteroids live at the start of this step
    pub asteroid_count: usize,
    /// Step counter
    pub tick: u64,
}

impl SimContext<'_> {
    /// The player's ship, unless it is the entity currently updating
    pub fn ship(&self) -> Option<&Ship> {
        self.registry.get(self.ship_id).and_then(Entity::as_ship)
    }

    pub fn ship_alive(&self) -> bool {
        self.ship().is_some_and(Ship::is_alive)
    }

    /// Whether the ship currently holds `kind`
    pub fn power_active(&self, kind: PowerKind) -> bool {
        self.ship().is_some_and(|ship| ship.power_active(kind))
    }

    /// Run `f` on an entity taken out of the registry, then put it back.
    /// The entity goes back even when `f` panics; the panic then carries on.
    pub fn with_entity<T>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut Entity, &mut SimContext<'_>) -> T,
    ) -> Option<T> {
        let mut entity = self.registry.take(id)?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| f(&mut entity, &mut *self)));
        let kind = entity.kind();
        self.registry.restore(id, entity);
        match result {
            Ok(value) => Some(value),
            Err(payload) => {
                log::error!("{:?} {} panicked in step {}", kind, id, self.tick);
                panic::resume_unwind(payload)
            }
        }
    }

    pub fn with_ship<T>(&mut self, f: impl FnOnce(&mut Ship, &mut SimContext<'_>) -> T) -> Option<T> {
        let ship_id = self.ship_id;
        self.with_entity(ship_id, |entity, ctx| entity.as_ship_mut().map(|ship| f(ship, ctx)))
            .flatten()
    }

    /// Credit points through the ship's score rules
    pub fn award(&mut self, points: u64) {
        if let Some(points) = self.ship().and_then(|ship| ship.scaled_award(points)) {
            self.score.add_score(points);
        }
    }

    /// Register a particle emitter sized by the quality settings.
    /// Returns `None` when the scaled count is zero.
    pub fn emit(
        &mut self,
        spec: ParticleSpec,
        count: usize,
        z_index: i32,
        recurring: bool,
    ) -> Option<EntityId> {
        let count = self.settings.particle_count(count);
        if count == 0 {
            return None;
        }
        let emitter = ParticleEmitter::new(spec, count, z_index, recurring, &mut *self.rng);
        Some(self.registry.register(emitter))
    }

    /// Stop an emitter from respawning particles; it drains and unregisters
    pub fn wind_down(&mut self, emitter: Option<EntityId>) {
        let emitter = emitter
            .and_then(|id| self.registry.get_mut(id))
            .and_then(Entity::as_particles_mut);
        if let Some(emitter) = emitter {
            emitter.set_recurring(false);
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.audio.play(effect);
    }
}
