//! Tagged entity variants
//!
//! Every registered object is one [`Entity`]. Callers filter by [`EntityKind`] or
//! [`Role`] instead of probing concrete types.

use super::asteroid::Asteroid;
use super::bullet::Bullet;
use super::context::SimContext;
use super::particle::ParticleEmitter;
use super::pickup::PowerUp;
use super::registry::{EntityId, Role};
use super::ship::Ship;
use crate::render::DrawItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ship,
    Asteroid,
    Bullet,
    PowerUp,
    Particles,
}

#[derive(Debug, Clone)]
pub enum Entity {
    Ship(Ship),
    Asteroid(Asteroid),
    Bullet(Bullet),
    PowerUp(PowerUp),
    Particles(ParticleEmitter),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Ship(_) => EntityKind::Ship,
            Entity::Asteroid(_) => EntityKind::Asteroid,
            Entity::Bullet(_) => EntityKind::Bullet,
            Entity::PowerUp(_) => EntityKind::PowerUp,
            Entity::Particles(_) => EntityKind::Particles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Drawable | Role::Simulatable => true,
            Role::Collidable => matches!(
                self,
                Entity::Ship(_) | Entity::Asteroid(_) | Entity::PowerUp(_)
            ),
        }
    }

    /// Draw order, ascending
    pub fn z_index(&self) -> i32 {
        match self {
            Entity::Ship(ship) => ship.z_index(),
            Entity::Asteroid(asteroid) => asteroid.z_index(),
            Entity::Bullet(bullet) => bullet.z_index(),
            Entity::PowerUp(power_up) => power_up.z_index(),
            Entity::Particles(emitter) => emitter.z_index(),
        }
    }

    /// Advance one fixed step
    pub fn update(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        match self {
            Entity::Ship(ship) => ship.update(ctx),
            Entity::Asteroid(asteroid) => asteroid.update(id, ctx),
            Entity::Bullet(bullet) => bullet.update(id, ctx),
            Entity::PowerUp(power_up) => power_up.update(),
            Entity::Particles(emitter) => emitter.update(id, ctx),
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        match self {
            Entity::Ship(ship) => ship.draw(out),
            Entity::Asteroid(asteroid) => asteroid.draw(out),
            Entity::Bullet(bullet) => bullet.draw(out),
            Entity::PowerUp(power_up) => power_up.draw(out),
            Entity::Particles(emitter) => emitter.draw(out),
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match self {
            Entity::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match self {
            Entity::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match self {
            Entity::Asteroid(asteroid) => Some(asteroid),
            _ => None,
        }
    }

    pub fn as_asteroid_mut(&mut self) -> Option<&mut Asteroid> {
        match self {
            Entity::Asteroid(asteroid) => Some(asteroid),
            _ => None,
        }
    }

    pub fn as_bullet(&self) -> Option<&Bullet> {
        match self {
            Entity::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    pub fn as_power_up(&self) -> Option<&PowerUp> {
        match self {
            Entity::PowerUp(power_up) => Some(power_up),
            _ => None,
        }
    }

    pub fn as_particles(&self) -> Option<&ParticleEmitter> {
        match self {
            Entity::Particles(emitter) => Some(emitter),
            _ => None,
        }
    }

    pub fn as_particles_mut(&mut self) -> Option<&mut ParticleEmitter> {
        match self {
            Entity::Particles(emitter) => Some(emitter),
            _ => None,
        }
    }
}

impl From<Ship> for Entity {
    fn from(ship: Ship) -> Self {
        Entity::Ship(ship)
    }
}

impl From<Asteroid> for Entity {
    fn from(asteroid: Asteroid) -> Self {
        Entity::Asteroid(asteroid)
    }
}

impl From<Bullet> for Entity {
    fn from(bullet: Bullet) -> Self {
        Entity::Bullet(bullet)
    }
}

impl From<PowerUp> for Entity {
    fn from(power_up: PowerUp) -> Self {
        Entity::PowerUp(power_up)
    }
}

impl From<ParticleEmitter> for Entity {
    fn from(emitter: ParticleEmitter) -> Self {
        Entity::Particles(emitter)
    }
}
