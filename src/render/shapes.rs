//! Draw commands for 2D primitives

use glam::DVec2;
use serde::Serialize;

use super::Color;
use crate::sim::ShapeStyle;

/// A single primitive handed to the presentation sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Closed polygon (last vertex connects back to the first)
    Polygon {
        vertices: Vec<DVec2>,
        fill: Color,
        outline: Color,
        weight: f32,
    },
    /// Filled circle with an optional outline
    Circle {
        center: DVec2,
        radius: f64,
        fill: Color,
        outline: Option<Color>,
        weight: f32,
    },
    /// Axis-aligned rectangle
    Rect {
        origin: DVec2,
        size: DVec2,
        fill: Color,
    },
    /// Centred text label
    Text {
        position: DVec2,
        text: String,
        size: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// Polygon styled like the shape it came from
    pub fn polygon(vertices: Vec<DVec2>, style: &ShapeStyle) -> Self {
        DrawCommand::Polygon {
            vertices,
            fill: style.fill,
            outline: style.outline,
            weight: style.weight,
        }
    }

    pub fn disc(center: DVec2, radius: f64, fill: Color) -> Self {
        DrawCommand::Circle {
            center,
            radius,
            fill,
            outline: None,
            weight: 0.0,
        }
    }

    pub fn ring(center: DVec2, radius: f64, fill: Color, outline: Color, weight: f32) -> Self {
        DrawCommand::Circle {
            center,
            radius,
            fill,
            outline: Some(outline),
            weight,
        }
    }
}

/// A draw command tagged with its z-order (ascending = drawn first)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawItem {
    pub z: i32,
    pub command: DrawCommand,
}

/// Stable sort by z so equal-z commands keep submission order
pub fn sort_by_z(items: &mut [DrawItem]) {
    items.sort_by_key(|item| item.z);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_stable() {
        let mut items = vec![
            DrawItem { z: 5, command: DrawCommand::disc(DVec2::ZERO, 1.0, Color::WHITE) },
            DrawItem { z: 0, command: DrawCommand::disc(DVec2::ZERO, 2.0, Color::WHITE) },
            DrawItem { z: 5, command: DrawCommand::disc(DVec2::ZERO, 3.0, Color::WHITE) },
        ];
        sort_by_z(&mut items);
        let radii: Vec<f64> = items
            .iter()
            .map(|item| match item.command {
                DrawCommand::Circle { radius, .. } => radius,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(radii, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_polygon_takes_style() {
        let style = ShapeStyle::default();
        let cmd = DrawCommand::polygon(vec![DVec2::ZERO, DVec2::X, DVec2::Y], &style);
        match cmd {
            DrawCommand::Polygon { outline, weight, .. } => {
                assert_eq!(outline, Color::WHITE);
                assert_eq!(weight, style.weight);
            }
            _ => panic!("expected polygon"),
        }
    }
}
