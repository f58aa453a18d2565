//! Implicit (general-form) straight lines
//!
//! A line through two points is stored as coefficients (a, b, c) with
//! `a·x + b·y + c = 0`, plus the two source points so segment queries are possible.

use glam::DVec2;

/// Coefficients this close to zero (or to an integer) are snapped
const SNAP_EPSILON: f64 = 1e-11;
/// Relative tolerance for ratio comparisons
const RATIO_EPSILON: f64 = 1e-9;

#[inline]
fn snap(value: f64) -> f64 {
    if value.abs() <= SNAP_EPSILON {
        0.0
    } else if (value.ceil() - value).abs() <= SNAP_EPSILON {
        value.ceil()
    } else {
        value
    }
}

#[inline]
fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= RATIO_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// A straight line in general form, remembering the segment it was built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub start: DVec2,
    pub end: DVec2,
}

impl Line {
    /// Line through two points. The points must differ; coinciding points give a
    /// degenerate line with `a == b == 0`.
    pub fn through(start: DVec2, end: DVec2) -> Self {
        Self {
            a: snap(start.y - end.y),
            b: snap(end.x - start.x),
            c: snap(start.x * end.y - end.x * start.y),
            start,
            end,
        }
    }

    /// True when both direction coefficients vanish (source points coincide)
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.a == 0.0 && self.b == 0.0
    }

    /// Evaluate `a·x + b·y + c` (zero on the line)
    #[inline]
    pub fn evaluate(&self, point: DVec2) -> f64 {
        self.a * point.x + self.b * point.y + self.c
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.a == 0.0
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.b == 0.0
    }

    pub fn is_parallel(&self, other: &Line) -> bool {
        if self.is_horizontal() {
            return other.is_horizontal();
        }
        if self.is_vertical() {
            return other.is_vertical();
        }
        if other.is_horizontal() || other.is_vertical() {
            return false;
        }
        nearly_equal(self.a / other.a, self.b / other.b)
    }

    /// Parallel and sharing every point
    pub fn is_same_line(&self, other: &Line) -> bool {
        self.is_parallel(other)
            && nearly_equal(self.a * other.c, other.a * self.c)
            && nearly_equal(self.b * other.c, other.b * self.c)
    }

    /// Intersection point of the two infinite lines, `None` when parallel
    pub fn intersection(&self, other: &Line) -> Option<DVec2> {
        if self.is_parallel(other) {
            return None;
        }
        let y = (other.a * self.c - self.a * other.c) / (self.a * other.b - other.a * self.b);
        let x = if self.is_horizontal() {
            (other.b * y + other.c) / -other.a
        } else {
            (self.b * y + self.c) / -self.a
        };
        Some(DVec2::new(x, y))
    }

    /// Unit vector along the line
    pub fn guide_vector(&self) -> DVec2 {
        DVec2::new(-self.b, self.a).normalize()
    }

    /// Unit normal of the line
    pub fn normal_vector(&self) -> DVec2 {
        DVec2::new(-self.a, -self.b).normalize()
    }

    /// Orthogonal projection of `point` onto the infinite line
    pub fn projection(&self, point: DVec2) -> DVec2 {
        let ab = self.end - self.start;
        let t = (point - self.start).dot(ab) / ab.length_squared();
        self.start + ab * t
    }

    /// Unsigned perpendicular distance from `point` to the infinite line
    pub fn distance_to_line(&self, point: DVec2) -> f64 {
        let ab = self.end - self.start;
        let ah = point - self.start;
        ab.perp_dot(ah).abs() / ab.length()
    }

    /// Distance from `point` to the source segment.
    ///
    /// When the projection falls outside the segment's bounding box the nearer
    /// endpoint distance is returned instead of the perpendicular one. A point
    /// on the segment itself is at distance 0.
    pub fn distance_to_segment(&self, point: DVec2) -> f64 {
        let projection = self.projection(point);
        let min = self.start.min(self.end);
        let max = self.start.max(self.end);
        let outside = projection.x < min.x
            || projection.x > max.x
            || projection.y < min.y
            || projection.y > max.y;
        if outside {
            (point - self.start).length().min((point - self.end).length())
        } else {
            self.distance_to_line(point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_coefficients_from_points() {
        let line = Line::through(DVec2::new(1.0, 2.0), DVec2::new(4.0, 6.0));
        assert_eq!(line.a, -4.0);
        assert_eq!(line.b, 3.0);
        assert_eq!(line.c, 1.0 * 6.0 - 4.0 * 2.0);
        assert!(line.evaluate(line.start).abs() < EPS);
        assert!(line.evaluate(line.end).abs() < EPS);
    }

    #[test]
    fn test_snapping() {
        let line = Line::through(DVec2::new(0.0, 1.0), DVec2::new(1.0, 1.0 + 1e-13));
        assert!(line.is_horizontal());
    }

    #[test]
    fn test_orientation() {
        let horizontal = Line::through(DVec2::new(0.0, 3.0), DVec2::new(5.0, 3.0));
        let vertical = Line::through(DVec2::new(2.0, 0.0), DVec2::new(2.0, 5.0));
        assert!(horizontal.is_horizontal() && !horizontal.is_vertical());
        assert!(vertical.is_vertical() && !vertical.is_horizontal());
        assert!(!horizontal.is_parallel(&vertical));
    }

    #[test]
    fn test_parallel_but_not_same() {
        let l1 = Line::through(DVec2::new(0.0, 0.0), DVec2::new(2.0, 1.0));
        let l2 = Line::through(DVec2::new(0.0, 3.0), DVec2::new(2.0, 4.0));
        assert!(l1.is_parallel(&l1));
        assert!(l1.is_parallel(&l2));
        assert!(l1.is_same_line(&l1));
        assert!(!l1.is_same_line(&l2));
        assert!(l1.intersection(&l2).is_none());
    }

    #[test]
    fn test_same_line_from_other_points() {
        let l1 = Line::through(DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0));
        let l2 = Line::through(DVec2::new(3.0, 3.0), DVec2::new(7.0, 7.0));
        assert!(l1.is_same_line(&l2));
    }

    #[test]
    fn test_intersection() {
        let l1 = Line::through(DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0));
        let l2 = Line::through(DVec2::new(0.0, 4.0), DVec2::new(4.0, 0.0));
        let p = l1.intersection(&l2).unwrap();
        assert!((p - DVec2::new(2.0, 2.0)).length() < EPS);
    }

    #[test]
    fn test_intersection_with_horizontal() {
        let horizontal = Line::through(DVec2::new(-5.0, 1.0), DVec2::new(5.0, 1.0));
        let diagonal = Line::through(DVec2::new(0.0, 0.0), DVec2::new(2.0, 2.0));
        let p = horizontal.intersection(&diagonal).unwrap();
        assert!((p - DVec2::new(1.0, 1.0)).length() < EPS);
        let q = diagonal.intersection(&horizontal).unwrap();
        assert!((q - p).length() < EPS);
    }

    #[test]
    fn test_distance_to_line() {
        let line = Line::through(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0));
        assert!((line.distance_to_line(DVec2::new(50.0, 3.0)) - 3.0).abs() < EPS);
        assert!((line.distance_to_line(DVec2::new(5.0, -4.0)) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_distance_to_segment_uses_endpoints_outside() {
        let line = Line::through(DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0));
        // Projection lands inside the segment
        assert!((line.distance_to_segment(DVec2::new(5.0, 3.0)) - 3.0).abs() < EPS);
        // Projection lands past the end: distance to (10, 0)
        assert!((line.distance_to_segment(DVec2::new(13.0, 4.0)) - 5.0).abs() < EPS);
        // Point on the segment
        assert!(line.distance_to_segment(DVec2::new(4.0, 0.0)).abs() < EPS);
        // On the line but past the start
        assert!((line.distance_to_segment(DVec2::new(-3.0, 0.0)) - 3.0).abs() < EPS);
    }

    #[test]
    fn test_projection_and_unit_vectors() {
        let line = Line::through(DVec2::new(0.0, 0.0), DVec2::new(0.0, 10.0));
        assert!((line.projection(DVec2::new(3.0, 4.0)) - DVec2::new(0.0, 4.0)).length() < EPS);
        assert!((line.guide_vector().length() - 1.0).abs() < EPS);
        assert!(line.guide_vector().dot(line.normal_vector()).abs() < EPS);
    }
}
