//! Astro Space - simulation kernel for a vector-style asteroid shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, entities, registry)
//! - `render`: Draw commands and the snapshot handed to the presentation sink
//! - `platform`: Input source and fixed-timestep clock
//! - `runtime`: Updater/renderer threads
//! - `audio`, `score`, `settings`: Narrow collaborator interfaces

pub mod audio;
pub mod platform;
pub mod render;
pub mod runtime;
pub mod score;
pub mod settings;
pub mod sim;

pub use score::{ScoreSink, Scoreboard};
pub use settings::{QualityPreset, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (steps per second)
    pub const UPDATE_RATE: u32 = 60;
    /// Maximum catch-up steps per scheduler pass to prevent spiral of death
    pub const MAX_CATCH_UP_STEPS: u32 = 8;

    /// Arena dimensions the tuning below was balanced against
    pub const ARENA_WIDTH: f64 = 1280.0;
    pub const ARENA_HEIGHT: f64 = 720.0;

    /// Shapes are authored pointing along this rotation (degrees)
    pub const DEFAULT_ROTATION: f64 = 180.0;
    pub const DEFAULT_LINE_WEIGHT: f32 = 2.0;

    /// Ship handling (per tick)
    pub const SHIP_SCALE: f64 = 8.0;
    pub const SHIP_TURN_DEGREES: f64 = 3.0;
    pub const SHIP_THRUST: f64 = 0.15;
    pub const SHIP_THRUST_DRAG: f64 = 0.975;
    pub const SHIP_BRAKE: f64 = 0.965;
    /// Below this speed the ship comes to a full stop
    pub const SHIP_MIN_SPEED: f64 = 0.135;
    pub const SHIP_FIRE_COOLDOWN: u32 = 25;
    /// Fire cooldown divisor under the fire-rate power-up
    pub const FIRE_RATE_DIVISOR: u32 = 5;
    pub const SHIP_DESTROY_TICKS: u32 = 35;
    pub const SHIP_Z_INDEX: i32 = 100;

    /// Power-up spawn timer: base + random spread (ticks)
    pub const POWER_UP_CALL_BASE: u32 = 1500;
    pub const POWER_UP_CALL_SPREAD: u32 = 3500;
    /// Distance from any ship edge at which a power-up is collected
    pub const PICKUP_RADIUS: f64 = 21.0;
    pub const POWER_UP_RADIUS: f64 = 20.0;

    /// Bullet defaults
    pub const BULLET_SIZE: f64 = 7.0;
    /// Bullets spawn this far in front of the ship's nose
    pub const BULLET_LAUNCH_OFFSET: f64 = 5.0;
    pub const BULLET_Z_INDEX: i32 = 10;

    /// Asteroid polygon radius per unit of size
    pub const ASTEROID_RADIUS_SCALE: f64 = 5.0;
    /// Smallest size a split can produce
    pub const ASTEROID_MIN_SIZE: u32 = 3;
    /// Asteroids at or below this size vanish without splitting
    pub const ASTEROID_SPLIT_THRESHOLD: u32 = 8;
    /// Bullet-to-centre distance (in units of size) that still counts as a hit
    pub const ASTEROID_PROXIMITY_FACTOR: f64 = 3.0;
    pub const MAX_ASTEROIDS: usize = 40;
    pub const INITIAL_ASTEROIDS: usize = 3;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, whole degrees) to cartesian using the trig lookup table
#[inline]
pub fn polar_to_cartesian(r: f64, degrees: i32) -> DVec2 {
    DVec2::new(sim::vector::cos_deg(degrees), sim::vector::sin_deg(degrees)) * r
}
