//! Property tests for the planar geometry the collision system is built on

use astro_space::sim::collision::point_in_polygon;
use astro_space::sim::{Line, Planar, Shape, ShapeStyle, edge_intersection, generate_asteroid_shape, polygons_collide};
use astro_space::consts::ASTEROID_RADIUS_SCALE;
use glam::DVec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn point() -> impl Strategy<Value = DVec2> {
    (-500.0..500.0_f64, -500.0..500.0_f64).prop_map(|(x, y)| DVec2::new(x, y))
}

fn ship_at(position: DVec2, rotation: i32) -> Vec<DVec2> {
    let mut shape = Shape::ship();
    shape.set_rotation(rotation as f64);
    shape.world_vertices(position)
}

proptest! {
    #[test]
    fn line_passes_through_its_points(p in point(), q in point()) {
        prop_assume!(p.distance(q) > 1e-3);
        let line = Line::through(p, q);
        prop_assert!(line.distance_to_line(p) < 1e-6);
        prop_assert!(line.distance_to_line(q) < 1e-6);
        let scale = 1.0 + line.a.abs() + line.b.abs() + line.c.abs();
        prop_assert!(line.evaluate(p).abs() / scale < 1e-9);
        prop_assert!(line.evaluate(q).abs() / scale < 1e-9);
    }

    #[test]
    fn line_is_parallel_to_itself(p in point(), q in point()) {
        prop_assume!(p.distance(q) > 1e-3);
        let line = Line::through(p, q);
        prop_assert!(line.is_parallel(&line));
        prop_assert!(line.intersection(&line).is_none());
    }

    #[test]
    fn crossing_lies_on_both_lines(p in point(), q in point(), r in point(), s in point()) {
        prop_assume!(p.distance(q) > 1.0 && r.distance(s) > 1.0);
        let u = (q - p).normalize();
        let v = (s - r).normalize();
        prop_assume!(u.perp_dot(v).abs() > 0.1);

        let first = Line::through(p, q);
        let second = Line::through(r, s);
        let cross = first.intersection(&second);
        prop_assert!(cross.is_some());
        let cross = cross.unwrap();
        prop_assert!(first.distance_to_line(cross) < 1e-6);
        prop_assert!(second.distance_to_line(cross) < 1e-6);
    }

    #[test]
    fn edge_intersection_is_symmetric(p in point(), q in point(), r in point(), s in point()) {
        let forward = edge_intersection(p, q, r, s);
        let backward = edge_intersection(r, s, p, q);
        prop_assert_eq!(forward.is_some(), backward.is_some());
    }

    #[test]
    fn full_turn_is_identity(v in point(), degrees in -720..720_i32) {
        let turned = v.rotate_deg(degrees + 360);
        prop_assert!(turned.distance(v.rotate_deg(degrees)) < 1e-9);
        prop_assert!(v.rotate_deg(360).distance(v) < 1e-9);
        // Rotation keeps length
        prop_assert!((v.rotate_deg(degrees).length() - v.length()).abs() < 1e-9);
    }

    #[test]
    fn shape_full_turn_matches_start(position in point(), start in 0..360_i32) {
        let mut shape = Shape::ship();
        shape.set_rotation(start as f64);
        let before = shape.world_vertices(position);
        shape.rotate(360.0);
        let after = shape.world_vertices(position);
        for (a, b) in before.iter().zip(&after) {
            prop_assert!(a.distance(*b) < 1e-9);
        }
    }

    #[test]
    fn scaling_scales_distances(position in point(), rotation in 0..360_i32, k in 0.1..10.0_f64) {
        let mut shape = Shape::new(
            vec![DVec2::new(0.0, 2.5), DVec2::new(1.5, -1.5), DVec2::new(-1.5, -1.5)],
            rotation as f64,
            2.0,
            ShapeStyle::default(),
        );
        let before = shape.world_vertices(position);
        shape.scale(k);
        let after = shape.world_vertices(position);
        for (a, b) in before.iter().zip(&after) {
            let expected = a.distance(position) * k;
            prop_assert!((b.distance(position) - expected).abs() < 1e-6 * (1.0 + expected));
        }
    }

    #[test]
    fn asteroid_outline_stays_in_ring(seed in any::<u64>(), size in 1..60_u32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let shape = generate_asteroid_shape(size, &mut rng);
        let radius = size as f64 * ASTEROID_RADIUS_SCALE;
        for point in shape.world_vertices(DVec2::ZERO) {
            let r = point.length();
            prop_assert!(r >= radius * 0.75 - 1e-9);
            prop_assert!(r <= radius + 1e-9);
        }
    }

    #[test]
    fn collision_is_symmetric(a in point(), b in point(), ra in 0..360_i32, rb in 0..360_i32) {
        let first = ship_at(a, ra);
        let second = ship_at(b, rb);
        prop_assert_eq!(polygons_collide(&first, &second), polygons_collide(&second, &first));
    }

    #[test]
    fn far_apart_ships_never_collide(a in point(), offset in 60.0..400.0_f64, degrees in 0..360_i32) {
        // Ship outline fits inside a radius of 2.5 * 8 = 20
        let b = a + DVec2::new(offset, 0.0).rotate_deg(degrees);
        prop_assert!(!polygons_collide(&ship_at(a, 0), &ship_at(b, degrees)));
    }

    #[test]
    fn overlapping_ships_collide(a in point(), rotation in 0..360_i32) {
        prop_assert!(polygons_collide(&ship_at(a, 0), &ship_at(a, rotation)));
    }

    #[test]
    fn centroid_is_inside_ship(a in point(), rotation in 0..360_i32) {
        let outline = ship_at(a, rotation);
        let centroid = outline.iter().copied().sum::<DVec2>() / outline.len() as f64;
        prop_assert!(point_in_polygon(centroid, &outline));
    }
}
