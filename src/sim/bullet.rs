//! Bullets
//!
//! A bullet flies in a straight line. Each step its path from the previous to
//! the next position is swept against every active asteroid; the first hit
//! scores, damages the rock and ends the bullet.

use glam::DVec2;

use super::collision::swept_hit;
use super::context::SimContext;
use super::entity::EntityKind;
use super::registry::EntityId;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::{Color, DrawCommand, DrawItem};

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    position: DVec2,
    previous: DVec2,
    velocity: DVec2,
    size: f64,
    weight: f32,
    double_damage: bool,
}

impl Bullet {
    pub fn new(position: DVec2, velocity: DVec2, double_damage: bool) -> Self {
        let factor = if double_damage { 2.0 } else { 1.0 };
        Self {
            position,
            previous: position,
            velocity,
            size: BULLET_SIZE * factor,
            weight: factor as f32,
            double_damage,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn damage(&self) -> i32 {
        if self.double_damage { 2 } else { 1 }
    }

    pub fn z_index(&self) -> i32 {
        BULLET_Z_INDEX
    }

    /// Points for hitting an asteroid of `size` moving at `speed`
    pub fn hit_score(&self, size: u32, speed: f64) -> u64 {
        let score = (50.0 - size as f64) / 4.0 + self.size / 15.0 + speed / 0.75;
        score.floor().max(0.0) as u64
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        self.previous = self.position;
        self.position += self.velocity;
        if !ctx.bounds.contains(self.position) {
            ctx.registry.unregister(id);
            return;
        }

        let next = self.position + self.velocity;
        let target = ctx
            .registry
            .ids_of(EntityKind::Asteroid)
            .into_iter()
            .find_map(|asteroid_id| {
                let asteroid = ctx.registry.get(asteroid_id)?.as_asteroid()?;
                let hit = asteroid.is_active()
                    && swept_hit(
                        self.previous,
                        next,
                        self.position,
                        &asteroid.vertices(),
                        asteroid.position(),
                        asteroid.size() as f64 * ASTEROID_PROXIMITY_FACTOR,
                    );
                hit.then(|| (asteroid_id, asteroid.size(), asteroid.velocity().length()))
            });

        let Some((asteroid_id, size, speed)) = target else {
            return;
        };
        ctx.registry.unregister(id);
        ctx.award(self.hit_score(size, speed));
        if let Some(asteroid) = ctx.registry.get_mut(asteroid_id).and_then(|e| e.as_asteroid_mut()) {
            asteroid.damage(self.damage());
        }
        ctx.play(SoundEffect::Damage);
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        out.push(DrawItem {
            z: BULLET_Z_INDEX,
            command: DrawCommand::ring(
                self.position,
                self.size / 2.0,
                Color::BLACK,
                Color::WHITE,
                self.weight,
            ),
        });
    }
}
