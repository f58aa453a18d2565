//! Asteroids
//!
//! Active rocks drift and spin, destroy the ship on contact and split when their
//! health runs out. A destroyed rock stays registered while its debris cloud
//! plays out, then unregisters. Rocks that drift well outside the arena are
//! recycled as fresh rocks coming in from a corner, unless the field is full.

use glam::DVec2;
use rand::Rng;

use super::collision::polygons_collide;
use super::context::SimContext;
use super::particle::{ParticleSpec, sample};
use super::pickup::PowerKind;
use super::registry::EntityId;
use super::shape::{Shape, generate_asteroid_shape};
use super::state::Bounds;
use super::vector::Planar;
use crate::consts::*;
use crate::render::{DrawCommand, DrawItem};

const DEBRIS_PARTICLES: usize = 50;
const DEBRIS_Z_INDEX: i32 = 100;
/// Steps a fresh rock may spend outside the arena before it can be recycled
const RESET_IMMUNITY_TICKS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteroidState {
    Active,
    /// Debris playing out; unregisters when the timer reaches zero
    Destroyed { timer: u32 },
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    size: u32,
    shape: Shape,
    position: DVec2,
    velocity: DVec2,
    /// Degrees per step, sign is direction
    spin: f64,
    health: i32,
    state: AsteroidState,
    /// Recycle immunity left; cleared once the rock is inside the arena
    immunity: u32,
    debris: Option<EntityId>,
}

impl Asteroid {
    /// New rock with a freshly generated outline
    pub fn new<R: Rng>(size: u32, position: DVec2, velocity: DVec2, spin: f64, rng: &mut R) -> Self {
        let shape = generate_asteroid_shape(size, rng);
        Self::with_shape(shape, size, position, velocity, spin)
    }

    /// New rock with a given outline
    pub fn with_shape(shape: Shape, size: u32, position: DVec2, velocity: DVec2, spin: f64) -> Self {
        Self {
            size,
            shape,
            position,
            velocity,
            spin,
            health: Self::initial_health(size),
            state: AsteroidState::Active,
            immunity: RESET_IMMUNITY_TICKS,
            debris: None,
        }
    }

    /// Random rock entering from outside one of the arena's corners, aimed at a
    /// random point inside. Crowded fields get smaller, slower rocks.
    pub fn incoming<R: Rng>(bounds: Bounds, asteroid_count: usize, rng: &mut R) -> Self {
        let crowd = asteroid_count as f64;
        let largest = (47.0 - crowd / 1.2).max(8.0) as u32;
        let size = rng.random_range(7..largest);
        let margin = size as f64 * 10.0;

        let x_offset: f64 = rng.random_range(-100.0..100.0);
        let y_offset: f64 = rng.random_range(-100.0..100.0);
        let x = if x_offset < 0.0 {
            x_offset - margin
        } else {
            bounds.width + x_offset + margin
        };
        let y = if y_offset < 0.0 {
            y_offset - margin
        } else {
            bounds.height + y_offset + margin
        };
        let position = DVec2::new(x, y);

        let spin = (0.95 + rng.random_range(0.0..0.75)) * random_sign(rng);
        let target = DVec2::new(
            sample(rng, 0.0, bounds.width),
            sample(rng, 0.0, bounds.height),
        );
        let speed = rng.random_range(0.0..35.0 / size as f64) + 0.6 - 0.35 * (crowd / 40.0);
        let velocity = (target - position).normalize_or_zero() * speed;

        Self::new(size, position, velocity, spin, rng)
    }

    fn initial_health(size: u32) -> i32 {
        ((size as f64 / 3.5) as i32).max(1)
    }

    /// Ticks the debris cloud lingers
    fn destroy_ticks(size: u32) -> u32 {
        ((size as f64 * 1.5) as u32).max(1)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn state(&self) -> AsteroidState {
        self.state
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_active(&self) -> bool {
        self.state == AsteroidState::Active
    }

    pub fn is_destroyed(&self) -> bool {
        !self.is_active()
    }

    pub fn is_immune(&self) -> bool {
        self.immunity > 0
    }

    /// World-space outline
    pub fn vertices(&self) -> Vec<DVec2> {
        self.shape.world_vertices(self.position)
    }

    pub fn z_index(&self) -> i32 {
        90 - self.size as i32
    }

    pub fn damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn update(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        if self.is_active() {
            self.drift(ctx);
            self.check_ship(ctx);
            if self.is_active() {
                self.process(id, ctx);
            }
        }
        self.after_death(id, ctx);
    }

    fn drift(&mut self, ctx: &SimContext<'_>) {
        if ctx.power_active(PowerKind::Freezer) {
            return;
        }
        self.position += self.velocity;
        self.shape.rotate(self.spin);
    }

    fn check_ship(&mut self, ctx: &mut SimContext<'_>) {
        let vertices = self.vertices();
        let (hit, invincible) = match ctx.ship() {
            Some(ship) if ship.is_alive() => (
                polygons_collide(&vertices, &ship.vertices()),
                ship.power_active(PowerKind::Invincible),
            ),
            _ => return,
        };
        if !hit {
            return;
        }
        if invincible {
            self.kill(ctx);
        } else {
            ctx.with_ship(|ship, ctx| ship.destroy(ctx));
        }
    }

    fn process(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        if self.health <= 0 {
            self.destroy(ctx);
            return;
        }
        if self.immunity > 0 {
            if ctx.bounds.contains(self.position) {
                self.immunity = 0;
            } else {
                self.immunity -= 1;
            }
            return;
        }
        let margin = self.size as f64 * 10.0 + 10.0;
        if ctx.bounds.is_outside(self.position, margin) {
            self.recycle(id, ctx);
        }
    }

    fn recycle(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        if ctx.asteroid_count > ctx.settings.max_asteroids {
            log::debug!("Asteroid {} left the field, population full", id);
            ctx.registry.unregister(id);
            return;
        }
        *self = Self::incoming(ctx.bounds, ctx.asteroid_count, &mut *ctx.rng);
        log::debug!("Asteroid {} recycled as size {}", id, self.size);
    }

    /// Mark destroyed and start the debris cloud. No split.
    pub fn kill(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_active() {
            return;
        }
        self.state = AsteroidState::Destroyed {
            timer: Self::destroy_ticks(self.size),
        };
        self.debris = ctx.emit(
            ParticleSpec::asteroid_debris(self.position, self.size),
            DEBRIS_PARTICLES,
            DEBRIS_Z_INDEX,
            true,
        );
    }

    /// Mark destroyed, then split into smaller rocks if big enough
    pub fn destroy(&mut self, ctx: &mut SimContext<'_>) {
        if !self.is_active() {
            return;
        }
        self.kill(ctx);
        if self.size <= ASTEROID_SPLIT_THRESHOLD {
            return;
        }
        let count = split_count(self.size, &mut *ctx.rng);
        for _ in 0..count {
            let child = self.spawn_child(count, &mut *ctx.rng);
            ctx.registry.register(child);
        }
        log::debug!("Asteroid of size {} split into {}", self.size, count);
    }

    fn spawn_child<R: Rng>(&self, count: u32, rng: &mut R) -> Asteroid {
        let span = self.size as f64;
        let position = self.position
            + DVec2::new(rng.random_range(0.0..span), rng.random_range(0.0..span));
        let size = (self.size / count).max(ASTEROID_MIN_SIZE);
        let spin = (1.0 + rng.random_range(0.0..0.5)) * random_sign(rng);
        let degrees = (45.0 * random_sign(rng) + rng.random_range(-150.0..150.0)) as i32;
        let velocity = self.velocity.rotate_deg(degrees);
        Asteroid::new(size, position, velocity, spin, rng)
    }

    fn after_death(&mut self, id: EntityId, ctx: &mut SimContext<'_>) {
        let AsteroidState::Destroyed { timer } = &mut self.state else {
            return;
        };
        *timer = timer.saturating_sub(1);
        if *timer == 0 {
            ctx.wind_down(self.debris.take());
            ctx.registry.unregister(id);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        if !self.is_active() {
            return;
        }
        let mut style = self.shape.style;
        let full = (self.size / 3).max(1) as f64;
        let worn = (self.size as f64 / 3.0 - self.health as f64) / full;
        style.fill = style.fill.brighten((48.0 * worn).clamp(0.0, 255.0) as u8);
        out.push(DrawItem {
            z: self.z_index(),
            command: DrawCommand::polygon(self.vertices(), &style),
        });
    }
}

/// Number of children a rock of `size` breaks into: 2, or up to `size / 5 - 1`
pub fn split_count<R: Rng>(size: u32, rng: &mut R) -> u32 {
    let bound = size / 5;
    if bound <= 2 { 2 } else { rng.random_range(2..bound) }
}

fn random_sign<R: Rng>(rng: &mut R) -> f64 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}
