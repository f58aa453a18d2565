//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering backend, audio device or window dependencies

pub mod asteroid;
pub mod bullet;
pub mod collision;
pub mod context;
pub mod entity;
pub mod line;
pub mod particle;
pub mod pickup;
pub mod registry;
pub mod shape;
pub mod ship;
pub mod state;
pub mod tick;
pub mod vector;

pub use asteroid::Asteroid;
pub use bullet::Bullet;
pub use collision::{edge_intersection, polygons_collide, polygons_intersect, segment_hits_polygon};
pub use context::SimContext;
pub use entity::{Entity, EntityKind};
pub use line::Line;
pub use particle::{ParticleEmitter, ParticleSpec};
pub use pickup::{PowerKind, PowerUp};
pub use registry::{EntityId, Registry, Role};
pub use shape::{Shape, ShapeStyle, generate_asteroid_shape};
pub use ship::{Ship, ShipState};
pub use state::{Bounds, World};
pub use tick::tick;
pub use vector::Planar;
