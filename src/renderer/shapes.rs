//! Die tessellation: draw instructions to triangle lists
//!
//! Each die is a flat billboard: a dark rim polygon with an inset colored
//! face on top. The silhouette approximates the die seen face-on; the z
//! rotation spins it in the plane and x/y rotations only modulate shading.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::scene::DieInstruction;

/// Fraction of the radius given to the rim
const EDGE_INSET: f32 = 0.12;

/// Face-on outline of a die
struct Silhouette {
    sides: u32,
    /// Angle of the first corner, so flats and points land where expected
    base_angle: f32,
    /// Vertical elongation, 1.0 for regular polygons
    y_stretch: f32,
}

fn silhouette(sides: u32) -> Silhouette {
    let (sides, base_angle, y_stretch) = match sides {
        // Triangle, point up
        4 => (3, -PI / 2.0, 1.0),
        6 => (4, PI / 4.0, 1.0),
        // Diamond, point up
        8 => (4, -PI / 2.0, 1.0),
        // Tall kite
        10 => (4, -PI / 2.0, 1.3),
        12 => (5, -PI / 2.0, 1.0),
        20 => (6, 0.0, 1.0),
        // Unknown kinds draw as a plain cube face
        _ => (4, PI / 4.0, 1.0),
    };
    Silhouette {
        sides,
        base_angle,
        y_stretch,
    }
}

fn face_color(sides: u32) -> [f32; 4] {
    match sides {
        4 => colors::D4,
        8 => colors::D8,
        10 => colors::D10,
        12 => colors::D12,
        20 => colors::D20,
        _ => colors::D6,
    }
}

/// Darken the face as it tumbles away from the viewer. Brightness stays in
/// 0.55..=1.0 so a mid-spin die never goes black.
fn shade(color: [f32; 4], rotation: Option<glam::Vec3>) -> [f32; 4] {
    let Some(rot) = rotation else {
        return color;
    };
    let facing = 0.25 * (rot.x.cos() + 1.0) + 0.25 * (rot.y.cos() + 1.0);
    let brightness = 0.55 + 0.45 * facing;
    [
        color[0] * brightness,
        color[1] * brightness,
        color[2] * brightness,
        color[3],
    ]
}

/// Triangle fan for one convex silhouette
fn convex_polygon(
    center: Vec2,
    radius: f32,
    outline: &Silhouette,
    spin: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(spin);
    let corner = |i: u32| -> Vertex {
        let theta = outline.base_angle + (i % outline.sides) as f32 / outline.sides as f32 * 2.0 * PI;
        let local = Vec2::new(theta.cos(), theta.sin() * outline.y_stretch) * radius;
        let p = center + rot.rotate(local);
        Vertex::new(p.x, p.y, color)
    };

    let mut vertices = Vec::with_capacity((outline.sides * 3) as usize);
    for i in 0..outline.sides {
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(corner(i));
        vertices.push(corner(i + 1));
    }
    vertices
}

/// Generate vertices for one die
pub fn die(instruction: &DieInstruction) -> Vec<Vertex> {
    let radius = instruction.scale / 2.0;
    if !instruction.visible || radius <= 0.0 {
        return Vec::new();
    }

    let outline = silhouette(instruction.faces.sides());
    let spin = instruction.rotation.map(|r| r.z).unwrap_or(0.0);
    let face = shade(face_color(instruction.faces.sides()), instruction.rotation);

    let mut vertices = convex_polygon(instruction.position, radius, &outline, spin, colors::EDGE);
    vertices.extend(convex_polygon(
        instruction.position,
        radius * (1.0 - EDGE_INSET),
        &outline,
        spin,
        face,
    ));
    vertices
}

/// Generate vertices for a whole frame of dice
pub fn frame(instructions: &[DieInstruction]) -> Vec<Vertex> {
    instructions.iter().flat_map(die).collect()
}
