//! Shape generation for the wheel
//!
//! Wheel space is centered on the hub with y up. Wheel bearings (degrees
//! clockwise from 12 o'clock) are converted with `bearing_to_radians`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::game::segment_degree;
use crate::{bearing_to_radians, polar_to_cartesian};

/// Wheel radius in wheel-space units
pub const WHEEL_RADIUS: f32 = 120.0;
/// Outer rim thickness
pub const RIM_THICKNESS: f32 = 6.0;
/// Hub radius
pub const HUB_RADIUS: f32 = 14.0;
/// Pointer triangle size
pub const POINTER_WIDTH: f32 = 22.0;
pub const POINTER_HEIGHT: f32 = 26.0;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        let p1 = center + polar_to_cartesian(radius, theta1);
        let p2 = center + polar_to_cartesian(radius, theta2);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = center + polar_to_cartesian(inner_radius, theta1);
        let outer1 = center + polar_to_cartesian(outer_radius, theta1);
        let inner2 = center + polar_to_cartesian(inner_radius, theta2);
        let outer2 = center + polar_to_cartesian(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Generate vertices for a pie wedge between two bearings (degrees)
pub fn wedge(
    radius: f32,
    start_bearing: f32,
    end_bearing: f32,
    color: [f32; 4],
    segments_per_degree: f32,
) -> Vec<Vertex> {
    let span = end_bearing - start_bearing;
    let num_segments = ((span.abs() * segments_per_degree) as u32).max(2);
    let mut vertices = Vec::with_capacity((num_segments * 3) as usize);

    for i in 0..num_segments {
        let b1 = start_bearing + span * (i as f32 / num_segments as f32);
        let b2 = start_bearing + span * ((i + 1) as f32 / num_segments as f32);
        let p1 = polar_to_cartesian(radius, bearing_to_radians(b1));
        let p2 = polar_to_cartesian(radius, bearing_to_radians(b2));

        vertices.push(Vertex::new(0.0, 0.0, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Thin radial line from the hub to `radius` at a bearing
pub fn spoke(radius: f32, bearing: f32, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = polar_to_cartesian(1.0, bearing_to_radians(bearing));
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    let tip = dir * radius;

    let a = perp;
    let b = -perp;
    let c = tip + perp;
    let d = tip - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Fixed pointer at 12 o'clock, tip pointing down into the wheel
pub fn pointer(color: [f32; 4]) -> Vec<Vertex> {
    let tip_y = WHEEL_RADIUS - POINTER_HEIGHT * 0.6;
    let base_y = tip_y + POINTER_HEIGHT;
    let half = POINTER_WIDTH / 2.0;
    vec![
        Vertex::new(0.0, tip_y, color),
        Vertex::new(half, base_y, color),
        Vertex::new(-half, base_y, color),
    ]
}

/// Full wheel: alternating wedges turned clockwise by `rotation` degrees,
/// separators, rim, hub and the fixed pointer
pub fn wheel(segment_count: usize, rotation: f64, highlight: Option<usize>) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if segment_count == 0 {
        vertices.extend(circle(Vec2::ZERO, WHEEL_RADIUS, colors::SEGMENT_ODD, 64));
    } else {
        let seg = segment_degree(segment_count) as f32;
        let turn = crate::normalize_degrees(rotation) as f32;

        for i in 0..segment_count {
            let start = i as f32 * seg + turn;
            let color = if highlight == Some(i) {
                colors::SEGMENT_SELECTED
            } else if i % 2 == 0 {
                colors::SEGMENT_EVEN
            } else {
                colors::SEGMENT_ODD
            };
            vertices.extend(wedge(WHEEL_RADIUS, start, start + seg, color, 0.5));
        }

        if segment_count > 1 {
            for i in 0..segment_count {
                let bearing = i as f32 * seg + turn;
                vertices.extend(spoke(WHEEL_RADIUS, bearing, 1.5, colors::SEPARATOR));
            }
        }
    }

    vertices.extend(ring(
        Vec2::ZERO,
        WHEEL_RADIUS,
        WHEEL_RADIUS + RIM_THICKNESS,
        colors::RIM,
        96,
    ));
    vertices.extend(circle(Vec2::ZERO, HUB_RADIUS, colors::HUB, 32));
    vertices.extend(circle(Vec2::ZERO, HUB_RADIUS * 0.45, colors::HUB_CAP, 24));
    vertices.extend(pointer(colors::POINTER));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_triangle_count() {
        let v = wedge(100.0, 0.0, 20.0, colors::SEGMENT_EVEN, 0.5);
        assert_eq!(v.len() % 3, 0);
        assert_eq!(v.len(), 10 * 3);
    }

    #[test]
    fn test_wedge_first_edge_at_twelve() {
        let v = wedge(100.0, 0.0, 20.0, colors::SEGMENT_EVEN, 0.5);
        // First outer vertex sits straight up
        assert!(v[1].position[0].abs() < 1e-4);
        assert!((v[1].position[1] - 100.0).abs() < 1e-4);
        // Clockwise: next outer vertex moves to +x
        assert!(v[2].position[0] > 0.0);
    }

    #[test]
    fn test_highlight_colors_segment() {
        let v = wheel(18, 0.0, Some(3));
        assert!(v.iter().any(|v| v.color == colors::SEGMENT_SELECTED));
        let v = wheel(18, 0.0, None);
        assert!(!v.iter().any(|v| v.color == colors::SEGMENT_SELECTED));
    }

    #[test]
    fn test_wheel_is_triangle_list() {
        for count in [0, 1, 7, 18, 24] {
            assert_eq!(wheel(count, 1234.5, None).len() % 3, 0);
        }
    }

    #[test]
    fn test_pointer_above_rim() {
        let p = pointer(colors::POINTER);
        assert!(p[0].position[1] < WHEEL_RADIUS);
        assert!(p[1].position[1] > WHEEL_RADIUS);
    }
}
