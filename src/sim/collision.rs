//! Collision detection for polygons and swept points
//!
//! Every moving-body-vs-polygon check goes through the same brute-force edge-pair
//! test: for each edge of A and each edge of B, skip parallel pairs, intersect the
//! two infinite lines, and accept the point only if it lies inside both edges'
//! axis-aligned bounding boxes.

use glam::DVec2;

use super::line::Line;

/// Slack applied to bounding-box comparisons so axis-aligned edges survive
/// rounding in the intersection solve
const BOX_EPSILON: f64 = 1e-9;

#[inline]
fn within_box(point: DVec2, e0: DVec2, e1: DVec2) -> bool {
    let min = e0.min(e1) - DVec2::splat(BOX_EPSILON);
    let max = e0.max(e1) + DVec2::splat(BOX_EPSILON);
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Consecutive vertex pairs of a closed polygon, including last → first
pub fn closed_edges(vertices: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
}

/// Intersection of edges `a0→a1` and `b0→b1`, if their lines cross inside both
/// edges' bounding boxes. Parallel and degenerate edges never intersect.
pub fn edge_intersection(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> Option<DVec2> {
    let line_a = Line::through(a0, a1);
    let line_b = Line::through(b0, b1);
    if line_a.is_degenerate() || line_b.is_degenerate() {
        return None;
    }
    let cross = line_a.intersection(&line_b)?;
    (within_box(cross, a0, a1) && within_box(cross, b0, b1)).then_some(cross)
}

/// First edge-pair intersection between two closed polygons
pub fn polygons_intersect(a: &[DVec2], b: &[DVec2]) -> Option<DVec2> {
    closed_edges(a).find_map(|(a0, a1)| {
        closed_edges(b).find_map(|(b0, b1)| edge_intersection(a0, a1, b0, b1))
    })
}

/// Even-odd ray cast
pub fn point_in_polygon(point: DVec2, polygon: &[DVec2]) -> bool {
    let mut inside = false;
    for (p0, p1) in closed_edges(polygon) {
        if (p0.y > point.y) != (p1.y > point.y) {
            let x = p0.x + (point.y - p0.y) * (p1.x - p0.x) / (p1.y - p0.y);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Edge crossing, or one polygon sitting wholly inside the other
pub fn polygons_collide(a: &[DVec2], b: &[DVec2]) -> bool {
    if polygons_intersect(a, b).is_some() {
        return true;
    }
    let a_in_b = a.first().is_some_and(|&p| point_in_polygon(p, b));
    let b_in_a = b.first().is_some_and(|&p| point_in_polygon(p, a));
    a_in_b || b_in_a
}

/// First intersection of the segment `start→end` with a closed polygon's edges
pub fn segment_hits_polygon(start: DVec2, end: DVec2, polygon: &[DVec2]) -> Option<DVec2> {
    closed_edges(polygon).find_map(|(p0, p1)| edge_intersection(p0, p1, start, end))
}

/// Swept bullet test.
///
/// The path `previous→next` is tested against the target's edges. A miss still
/// counts as a hit when `position` is within `reach` of the target's centre, which
/// catches small or fast polygons slipping between edge tests.
pub fn swept_hit(
    previous: DVec2,
    next: DVec2,
    position: DVec2,
    polygon: &[DVec2],
    center: DVec2,
    reach: f64,
) -> bool {
    segment_hits_polygon(previous, next, polygon).is_some() || position.distance(center) <= reach
}

/// True if any edge of the polygon passes within `radius` of `point`
pub fn within_reach(polygon: &[DVec2], point: DVec2, radius: f64) -> bool {
    closed_edges(polygon)
        .filter(|(p0, p1)| p0 != p1)
        .any(|(p0, p1)| Line::through(p0, p1).distance_to_segment(point) <= radius)
}
