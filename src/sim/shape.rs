//! Polygon shapes in local space
//!
//! A shape is authored once in an unrotated, unscaled local frame. Rotation and
//! uniform scale are applied on demand when world-space vertices are requested:
//! `world = rotate(local · scale, rotation) + position`.
//!
//! Winding is the insertion order of the local vertices; consumers close the
//! polygon by connecting the last vertex back to the first.

use std::f64::consts::PI;

use glam::DVec2;
use rand::Rng;

use super::line::Line;
use super::vector::Planar;
use crate::consts::*;
use crate::normalize_degrees;
use crate::polar_to_cartesian;
use crate::render::Color;

/// Fill/outline styling carried with a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub outline: Color,
    pub weight: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            outline: Color::WHITE,
            weight: DEFAULT_LINE_WEIGHT,
        }
    }
}

/// A closed polygon with rotation (degrees) and uniform scale
#[derive(Debug, Clone)]
pub struct Shape {
    points: Vec<DVec2>,
    rotation: f64,
    scale: f64,
    pub style: ShapeStyle,
}

impl Shape {
    pub fn new(points: Vec<DVec2>, rotation: f64, scale: f64, style: ShapeStyle) -> Self {
        debug_assert!(scale > 0.0, "shape scale must be positive");
        Self {
            points,
            rotation: normalize_degrees(rotation),
            scale,
            style,
        }
    }

    /// The player's arrowhead outline. The first vertex is the nose.
    pub fn ship() -> Self {
        Self::new(
            vec![
                DVec2::new(0.0, 2.5),
                DVec2::new(1.5, -1.5),
                DVec2::new(-1.5, -1.5),
            ],
            DEFAULT_ROTATION,
            SHIP_SCALE,
            ShapeStyle::default(),
        )
    }

    /// Local-space vertices as authored
    pub fn local_points(&self) -> &[DVec2] {
        &self.points
    }

    /// Rotation in degrees, within [0, 360)
    #[inline]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotation floored to the whole degree used for trig lookup
    #[inline]
    pub fn rotation_degrees(&self) -> i32 {
        self.rotation.floor() as i32
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    /// Accumulate rotation
    pub fn rotate(&mut self, delta_degrees: f64) {
        self.rotation = normalize_degrees(self.rotation + delta_degrees);
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Multiply the current scale
    pub fn scale(&mut self, factor: f64) {
        debug_assert!(factor > 0.0, "scale factor must be positive");
        self.scale *= factor;
    }

    pub fn set_scale(&mut self, value: f64) {
        debug_assert!(value > 0.0, "shape scale must be positive");
        self.scale = value;
    }

    /// World x axis of the rotated frame
    pub fn x_basis(&self) -> DVec2 {
        DVec2::X.rotate_deg(self.rotation_degrees())
    }

    /// Vertices placed in the world at `position`
    pub fn world_vertices(&self, position: DVec2) -> Vec<DVec2> {
        let basis = self.x_basis();
        self.points
            .iter()
            .map(|&point| (point * self.scale).from_basis(basis) + position)
            .collect()
    }

    /// Closed edge loop as implicit lines (last vertex connects back to the first)
    pub fn world_edges(&self, position: DVec2) -> Vec<Line> {
        let vertices = self.world_vertices(position);
        let n = vertices.len();
        (0..n)
            .map(|i| Line::through(vertices[i], vertices[(i + 1) % n]))
            .collect()
    }
}

/// Build an irregular rock outline whose vertex count grows with `size`.
///
/// `6 × extra` vertices sit around a circle of radius `R = size × ASTEROID_RADIUS_SCALE`,
/// each at a radius drawn from `[0.75R, R)` and an angle jittered around its evenly
/// spaced base angle.
pub fn generate_asteroid_shape<R: Rng>(size: u32, rng: &mut R) -> Shape {
    let size = size.max(1);
    let extra = size / 15 + 1;
    let radius = size as f64 * ASTEROID_RADIUS_SCALE;
    let inner = radius * 0.75;
    let jitter = PI / (7 * extra) as f64;
    let step = (PI / 3.0) / extra as f64;

    let points = (0..6 * extra)
        .map(|i| {
            let r = rng.random_range(inner..radius);
            let radians = step * i as f64 + rng.random_range(-jitter..jitter);
            polar_to_cartesian(r, radians.to_degrees() as i32)
        })
        .collect();

    Shape::new(points, DEFAULT_ROTATION, 1.0, ShapeStyle::default())
}
