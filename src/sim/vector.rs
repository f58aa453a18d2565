//! Planar vector algebra
//!
//! Positions and directions are `glam::DVec2` values. Add, subtract, scale, dot,
//! perp-dot, length and normalize come from glam; this module adds whole-degree
//! rotation through a precomputed sine/cosine table and the change of basis used
//! to place local shape coordinates into a rotated world frame.
//!
//! Rotation is only exact at whole-degree granularity. Fractional angles are
//! floored before lookup.

use std::sync::LazyLock;

use glam::DVec2;

struct TrigTable {
    sin: [f64; 360],
    cos: [f64; 360],
}

static TRIG: LazyLock<TrigTable> = LazyLock::new(|| {
    let mut sin = [0.0; 360];
    let mut cos = [0.0; 360];
    for degree in 0..360 {
        let radians = (degree as f64).to_radians();
        sin[degree] = radians.sin();
        cos[degree] = radians.cos();
    }
    TrigTable { sin, cos }
});

#[inline]
fn table_index(degrees: i32) -> usize {
    degrees.rem_euclid(360) as usize
}

/// Sine of a whole-degree angle (any integer, wrapped into [0, 360))
#[inline]
pub fn sin_deg(degrees: i32) -> f64 {
    TRIG.sin[table_index(degrees)]
}

/// Cosine of a whole-degree angle (any integer, wrapped into [0, 360))
#[inline]
pub fn cos_deg(degrees: i32) -> f64 {
    TRIG.cos[table_index(degrees)]
}

/// Extra planar operations on top of glam's vector API
pub trait Planar: Copy {
    /// Rotate counter-clockwise (in y-up terms) by a whole number of degrees
    fn rotate_deg(self, degrees: i32) -> Self;

    /// Express `self` (local coordinates) in the frame whose x axis is the unit
    /// vector `x_basis`: `x_basis * x + perp(x_basis) * y`
    fn from_basis(self, x_basis: Self) -> Self;
}

impl Planar for DVec2 {
    #[inline]
    fn rotate_deg(self, degrees: i32) -> Self {
        let (sin, cos) = (sin_deg(degrees), cos_deg(degrees));
        DVec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn from_basis(self, x_basis: Self) -> Self {
        x_basis * self.x + x_basis.perp() * self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_table_wraps_negative_and_large_angles() {
        assert!((sin_deg(-90) - sin_deg(270)).abs() < EPS);
        assert!((cos_deg(720) - 1.0).abs() < EPS);
        assert!((sin_deg(30) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = DVec2::new(1.0, 0.0).rotate_deg(90);
        assert!(approx(v, DVec2::new(0.0, 1.0)));
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let v = DVec2::new(3.5, -2.0);
        assert!(approx(v.rotate_deg(360), v));
        assert!(approx(v.rotate_deg(0), v));
    }

    #[test]
    fn test_from_basis_identity() {
        let v = DVec2::new(2.0, 5.0);
        assert!(approx(v.from_basis(DVec2::X), v));
    }

    #[test]
    fn test_from_basis_rotated_frame() {
        // Basis pointing along -x flips both axes
        let v = DVec2::new(0.0, 2.5).from_basis(DVec2::new(-1.0, 0.0));
        assert!(approx(v, DVec2::new(0.0, -2.5)));
    }

    #[test]
    fn test_perp_dot_and_dot() {
        let a = DVec2::new(1.0, 0.0);
        let b = DVec2::new(0.0, 2.0);
        assert_eq!(a.perp_dot(b), 2.0);
        assert_eq!(b.perp_dot(a), -2.0);
        assert_eq!(a.dot(b), 0.0);
    }
}
