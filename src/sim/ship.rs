//! The player's ship
//!
//! Alive: turns, thrusts and brakes from held keys, fires on a one-shot press,
//! collects power-ups it passes near and periodically calls a new one in.
//! Leaving the arena destroys it unless it is invincible, in which case it
//! bounces. Destroyed: the explosion plays out for a fixed number of steps,
//! after which the world may accept a restart.

use glam::DVec2;
use rand::Rng;

use super::bullet::Bullet;
use super::collision::within_reach;
use super::context::SimContext;
use super::entity::EntityKind;
use super::particle::ParticleSpec;
use super::pickup::{PowerKind, PowerUp};
use super::registry::EntityId;
use super::shape::Shape;
use crate::audio::{AudioManager, SoundEffect};
use crate::consts::*;
use crate::platform::Key;
use crate::render::{Color, DrawCommand, DrawItem};
use crate::score::ScoreSink;

const EXPLOSION_PARTICLES: usize = 50;
const SMOKE_PARTICLES: usize = 50;
const EFFECT_Z_INDEX: i32 = 100;
const TRAIL_Z_INDEX: i32 = 30;
/// Exhaust sparks appear this far behind the ship's centre
const TRAIL_OFFSET: f64 = 12.0;
/// Steps the spool-up clip plays before the engine loop takes over
const GAS_ON_TICKS: u32 = 30;
/// Scale multiplier right after picking up Shrink
const SHRINK_FACTOR: f64 = 0.5;
const SHIELD_RADIUS: f64 = 25.0;
/// The shield starts blinking when this few steps are left
const SHIELD_BLINK_TICKS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipState {
    Alive,
    /// Exploding; restart is accepted once the timer reaches zero
    Destroyed { timer: u32 },
}

/// Timed power the ship currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePower {
    pub kind: PowerKind,
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    Idle,
    SpoolingUp { ticks: u32 },
    Running,
}

#[derive(Debug, Clone)]
pub struct Ship {
    shape: Shape,
    position: DVec2,
    velocity: DVec2,
    state: ShipState,
    fire_cooldown: u32,
    power: Option<ActivePower>,
    /// Steps until the next power-up is called in
    power_up_timer: u32,
    engine: Engine,
    explosion: Option<EntityId>,
}

impl Ship {
    pub fn new(position: DVec2) -> Self {
        Self {
            shape: Shape::ship(),
            position,
            velocity: DVec2::ZERO,
            state: ShipState::Alive,
            fire_cooldown: 0,
            power: None,
            power_up_timer: POWER_UP_CALL_BASE * 2,
            engine: Engine::Idle,
            explosion: None,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn state(&self) -> ShipState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ShipState::Alive
    }

    pub fn is_destroyed(&self) -> bool {
        !self.is_alive()
    }

    /// Destroyed and the explosion has finished
    pub fn can_restart(&self) -> bool {
        self.state == ShipState::Destroyed { timer: 0 }
    }

    pub fn fire_cooldown(&self) -> u32 {
        self.fire_cooldown
    }

    pub fn power_up_timer(&self) -> u32 {
        self.power_up_timer
    }

    pub fn z_index(&self) -> i32 {
        SHIP_Z_INDEX
    }

    /// World-space outline; the first vertex is the nose
    pub fn vertices(&self) -> Vec<DVec2> {
        self.shape.world_vertices(self.position)
    }

    /// Unit vector the nose points along
    pub fn direction(&self) -> DVec2 {
        self.shape.x_basis().perp()
    }

    pub fn active_power(&self) -> Option<ActivePower> {
        self.power
    }

    pub fn power_active(&self, kind: PowerKind) -> bool {
        self.power.is_some_and(|power| power.kind == kind && power.remaining > 0)
    }

    /// Give the ship a timed power, replacing any current one
    pub fn grant_power(&mut self, kind: PowerKind) {
        self.end_power();
        let duration = kind.duration();
        if duration == 0 {
            return;
        }
        self.power = Some(ActivePower { kind, remaining: duration });
        if kind == PowerKind::Shrink {
            self.shape.set_scale(SHIP_SCALE * SHRINK_FACTOR);
        }
    }

    fn end_power(&mut self) {
        self.power = None;
        self.shape.set_scale(SHIP_SCALE);
    }

    /// Points actually credited for an award of `points`, if any
    pub fn scaled_award(&self, points: u64) -> Option<u64> {
        if !self.is_alive() {
            return None;
        }
        if self.power_active(PowerKind::DoubleScore) {
            Some(points * 2)
        } else {
            Some(points)
        }
    }

    pub fn update(&mut self, ctx: &mut SimContext<'_>) {
        match self.state {
            ShipState::Alive => {
                self.control(ctx);
                self.movement(ctx);
                if self.is_alive() {
                    self.collect_power_ups(ctx);
                    self.power_timers(ctx);
                }
            }
            ShipState::Destroyed { .. } => self.after_death(ctx),
        }
    }

    fn control(&mut self, ctx: &mut SimContext<'_>) {
        if ctx.input.is_pressed(Key::Right) {
            self.shape.rotate(SHIP_TURN_DEGREES);
        }
        if ctx.input.is_pressed(Key::Left) {
            self.shape.rotate(-SHIP_TURN_DEGREES);
        }
        if ctx.input.is_pressed(Key::Brake) {
            self.velocity *= SHIP_BRAKE;
        }

        if ctx.input.is_pressed(Key::Thrust) {
            self.velocity = self.velocity * SHIP_THRUST_DRAG + self.direction() * SHIP_THRUST;
            let center = self.position - self.direction() * TRAIL_OFFSET;
            let spark = ParticleSpec::thrust_trail(center, &mut *ctx.rng);
            ctx.emit(spark, 1, TRAIL_Z_INDEX, false);
            self.engine_on(ctx.audio);
        } else {
            self.engine_off(ctx.audio);
        }

        if self.velocity.length() <= SHIP_MIN_SPEED {
            self.velocity = DVec2::ZERO;
        }

        if self.fire_cooldown == 0 && ctx.input.consume_press(Key::Fire) {
            self.fire(ctx);
        }
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }

    fn fire(&mut self, ctx: &mut SimContext<'_>) {
        let Some(&nose) = self.vertices().first() else {
            return;
        };
        let heading = nose - self.position;
        let muzzle = nose + heading.normalize_or_zero() * BULLET_LAUNCH_OFFSET;
        let bullet = Bullet::new(muzzle, heading, self.power_active(PowerKind::DoubleDamage));
        ctx.registry.register(bullet);
        ctx.play(SoundEffect::Shoot);
        self.fire_cooldown = if self.power_active(PowerKind::FireRate) {
            SHIP_FIRE_COOLDOWN / FIRE_RATE_DIVISOR
        } else {
            SHIP_FIRE_COOLDOWN
        };
    }

    fn movement(&mut self, ctx: &mut SimContext<'_>) {
        self.position += self.velocity;
        let out_x = self.position.x < 0.0 || self.position.x > ctx.bounds.width;
        let out_y = self.position.y < 0.0 || self.position.y > ctx.bounds.height;
        if !(out_x || out_y) {
            return;
        }
        if self.power_active(PowerKind::Invincible) {
            if out_x {
                self.velocity.x = -self.velocity.x;
            } else {
                self.velocity.y = -self.velocity.y;
            }
        } else {
            self.destroy(ctx);
        }
    }

    fn collect_power_ups(&mut self, ctx: &mut SimContext<'_>) {
        let vertices = self.vertices();
        let registry = &*ctx.registry;
        let reached: Vec<(EntityId, PowerUp)> = registry
            .iter_live()
            .filter(|(id, _)| !registry.is_pending_removal(*id))
            .filter_map(|(id, entity)| entity.as_power_up().map(|power_up| (id, power_up)))
            .filter(|(_, power_up)| within_reach(&vertices, power_up.position(), PICKUP_RADIUS))
            .map(|(id, power_up)| (id, power_up.clone()))
            .collect();

        for (id, power_up) in reached {
            power_up.kill(id, ctx);
            self.apply_power(power_up.kind(), ctx);
        }
    }

    fn apply_power(&mut self, kind: PowerKind, ctx: &mut SimContext<'_>) {
        log::debug!("Power-up {:?} collected", kind);
        match kind {
            PowerKind::AddScore => {
                let points = ctx.rng.random_range(1..=10_u64) * 50;
                if let Some(points) = self.scaled_award(points) {
                    ctx.score.add_score(points);
                }
            }
            PowerKind::BigBoom => {
                self.end_power();
                for id in ctx.registry.ids_of(EntityKind::Asteroid) {
                    ctx.with_entity(id, |entity, ctx| {
                        if let Some(asteroid) = entity.as_asteroid_mut() {
                            asteroid.kill(ctx);
                        }
                    });
                }
            }
            _ => self.grant_power(kind),
        }
    }

    fn power_timers(&mut self, ctx: &mut SimContext<'_>) {
        if self.power_up_timer > 0 {
            self.power_up_timer -= 1;
        } else {
            self.power_up_timer = next_power_up_call(&mut *ctx.rng);
            let power_up = PowerUp::random(ctx.bounds, &mut *ctx.rng);
            log::debug!("Power-up {:?} called in at {}", power_up.kind(), power_up.position());
            ctx.registry.register(power_up);
        }

        let Some(power) = self.power.as_mut() else {
            return;
        };
        power.remaining = power.remaining.saturating_sub(1);
        let (kind, remaining) = (power.kind, power.remaining);
        if remaining == 0 {
            self.end_power();
        } else if kind == PowerKind::Shrink {
            let progress = remaining as f64 / kind.duration() as f64;
            self.shape.set_scale(SHIP_SCALE * (1.0 - (1.0 - SHRINK_FACTOR) * progress));
        }
    }

    fn after_death(&mut self, ctx: &mut SimContext<'_>) {
        let ShipState::Destroyed { timer } = &mut self.state else {
            return;
        };
        if *timer == 0 {
            return;
        }
        *timer -= 1;
        if *timer == 0 {
            ctx.wind_down(self.explosion.take());
        }
    }

    /// Blow up. No-op if already destroyed.
    pub fn destroy(&mut self, ctx: &mut SimContext<'_>) {
        if self.is_destroyed() {
            return;
        }
        self.silence_engine(ctx.audio);
        self.state = ShipState::Destroyed {
            timer: SHIP_DESTROY_TICKS,
        };
        self.explosion = ctx.emit(
            ParticleSpec::ship_explosion(self.position),
            EXPLOSION_PARTICLES,
            EFFECT_Z_INDEX,
            true,
        );
        ctx.play(SoundEffect::GameOver);
        ctx.play(SoundEffect::Boom);
        log::info!("Ship destroyed at ({:.0}, {:.0})", self.position.x, self.position.y);
    }

    /// Bring the ship back at `position` with a clean slate
    pub fn resurrect(&mut self, position: DVec2, ctx: &mut SimContext<'_>) {
        ctx.wind_down(self.explosion.take());
        self.state = ShipState::Alive;
        self.position = position;
        self.velocity = DVec2::ZERO;
        self.fire_cooldown = SHIP_FIRE_COOLDOWN;
        self.end_power();
        self.power_up_timer = next_power_up_call(&mut *ctx.rng);
        self.shape.set_rotation(DEFAULT_ROTATION);
        self.silence_engine(ctx.audio);
        ctx.emit(
            ParticleSpec::spawn_smoke(position),
            SMOKE_PARTICLES,
            EFFECT_Z_INDEX,
            false,
        );
        ctx.play(SoundEffect::StartGame);
    }

    fn engine_on(&mut self, audio: &mut AudioManager) {
        self.engine = match self.engine {
            Engine::Idle => {
                audio.play(SoundEffect::GasOn);
                Engine::SpoolingUp { ticks: GAS_ON_TICKS }
            }
            Engine::SpoolingUp { ticks: 0 } => {
                audio.stop(SoundEffect::GasOn);
                audio.loop_sound(SoundEffect::Fly);
                Engine::Running
            }
            Engine::SpoolingUp { ticks } => Engine::SpoolingUp { ticks: ticks - 1 },
            Engine::Running => Engine::Running,
        };
    }

    fn engine_off(&mut self, audio: &mut AudioManager) {
        match self.engine {
            Engine::Idle => {}
            Engine::SpoolingUp { .. } => audio.stop(SoundEffect::GasOn),
            Engine::Running => {
                audio.stop(SoundEffect::Fly);
                audio.play(SoundEffect::GasOff);
            }
        }
        self.engine = Engine::Idle;
    }

    fn silence_engine(&mut self, audio: &mut AudioManager) {
        if self.engine != Engine::Idle {
            audio.stop(SoundEffect::GasOn);
            audio.stop(SoundEffect::Fly);
            audio.stop(SoundEffect::GasOff);
        }
        self.engine = Engine::Idle;
    }

    pub fn draw(&self, out: &mut Vec<DrawItem>) {
        if !self.is_alive() {
            return;
        }
        let mut style = self.shape.style;
        if self.power_active(PowerKind::FireRate) {
            style.outline = Color::YELLOW;
        }
        if self.power_active(PowerKind::DoubleScore) {
            style.outline = Color::GREEN;
        }
        out.push(DrawItem {
            z: SHIP_Z_INDEX,
            command: DrawCommand::polygon(self.vertices(), &style),
        });

        if let Some(power) = self.power.filter(|power| power.kind == PowerKind::Invincible) {
            if power.remaining > SHIELD_BLINK_TICKS || power.remaining % 5 == 0 {
                out.push(DrawItem {
                    z: SHIP_Z_INDEX,
                    command: DrawCommand::ring(
                        self.position,
                        SHIELD_RADIUS,
                        Color(0x4400_FFFF),
                        Color::WHITE,
                        1.0,
                    ),
                });
            }
        }
    }
}

/// Steps until the next power-up call
fn next_power_up_call<R: Rng>(rng: &mut R) -> u32 {
    POWER_UP_CALL_BASE + rng.random_range(0..POWER_UP_CALL_SPREAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ship_faces_up() {
        let ship = Ship::new(DVec2::new(640.0, 360.0));
        let dir = ship.direction();
        assert!(dir.x.abs() < 1e-9);
        assert!((dir.y + 1.0).abs() < 1e-9);
        assert_eq!(ship.power_up_timer(), POWER_UP_CALL_BASE * 2);
    }

    #[test]
    fn test_nose_is_first_vertex() {
        let ship = Ship::new(DVec2::new(100.0, 100.0));
        let nose = ship.vertices()[0];
        let expected = ship.position() + ship.direction() * 2.5 * SHIP_SCALE;
        assert!((nose - expected).length() < 1e-9);
    }

    #[test]
    fn test_grant_power_replaces_previous() {
        let mut ship = Ship::new(DVec2::ZERO);
        ship.grant_power(PowerKind::FireRate);
        assert!(ship.power_active(PowerKind::FireRate));
        ship.grant_power(PowerKind::Invincible);
        assert!(!ship.power_active(PowerKind::FireRate));
        assert!(ship.power_active(PowerKind::Invincible));
    }

    #[test]
    fn test_shrink_halves_scale() {
        let mut ship = Ship::new(DVec2::ZERO);
        ship.grant_power(PowerKind::Shrink);
        assert_eq!(ship.shape().scale_factor(), SHIP_SCALE * SHRINK_FACTOR);
        ship.grant_power(PowerKind::Freezer);
        assert_eq!(ship.shape().scale_factor(), SHIP_SCALE);
    }

    #[test]
    fn test_double_score_award() {
        let mut ship = Ship::new(DVec2::ZERO);
        assert_eq!(ship.scaled_award(10), Some(10));
        ship.grant_power(PowerKind::DoubleScore);
        assert_eq!(ship.scaled_award(10), Some(20));
    }

    #[test]
    fn test_shield_blinks_near_expiry() {
        let mut ship = Ship::new(DVec2::ZERO);
        ship.grant_power(PowerKind::Invincible);
        let count = |ship: &Ship| {
            let mut out = Vec::new();
            ship.draw(&mut out);
            out.len()
        };
        assert_eq!(count(&ship), 2);
        ship.power = Some(ActivePower { kind: PowerKind::Invincible, remaining: 99 });
        assert_eq!(count(&ship), 1);
        ship.power = Some(ActivePower { kind: PowerKind::Invincible, remaining: 95 });
        assert_eq!(count(&ship), 2);
    }
}
