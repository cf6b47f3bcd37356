//! Reference primitives: unit-sized meshes that every box, rectangle, sphere
//! and line is drawn from, sized per draw by a reference transform.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::scene::Vertex;

pub const SPHERE_SECTORS: u32 = 32;
pub const SPHERE_STACKS: u32 = 16;

/// Axis-aligned cube of side 1 centered at the origin, 36 vertices, CCW
/// winding seen from outside.
pub fn unit_cube() -> Vec<Vertex> {
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut out = Vec::with_capacity(36);
    for (n, u, v) in faces {
        push_quad(&mut out, n * 0.5, n, u, v);
    }
    out
}

/// Unit square in the xy-plane centered at the origin, both sides emitted
/// (12 vertices) so it stays visible under back-face culling.
pub fn unit_rectangle() -> Vec<Vertex> {
    let mut out = Vec::with_capacity(12);
    push_quad(&mut out, Vec3::ZERO, Vec3::Z, Vec3::X, Vec3::Y);
    push_quad(&mut out, Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, Vec3::X);
    out
}

/// Indexed UV sphere of radius 1 centered at the origin.
pub fn unit_sphere() -> (Vec<Vertex>, Vec<u32>) {
    let (sectors, stacks) = (SPHERE_SECTORS, SPHERE_STACKS);
    let row = sectors + 1;

    let mut vertices = Vec::with_capacity(((stacks + 1) * row) as usize);
    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let (ring, y) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = TAU * j as f32 / sectors as f32;
            let (s, c) = theta.sin_cos();
            let p = [ring * c, y, -ring * s];
            vertices.push(Vertex::new(p, p));
        }
    }

    // Pole rows collapse to a point; their degenerate triangles are skipped.
    let mut indices = Vec::with_capacity((sectors * (stacks - 1) * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * row + j;
            let b = a + row;
            if i != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    (vertices, indices)
}

/// Segment from the origin to `(1, 0, 0)`.
pub fn unit_line() -> [Vertex; 2] {
    [
        Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
    ]
}

/// Two triangles spanning `center ± u/2 ± v/2`, facing `n` (`u × v == n`).
fn push_quad(out: &mut Vec<Vertex>, center: Vec3, n: Vec3, u: Vec3, v: Vec3) {
    let corner = |su: f32, sv: f32| {
        Vertex::new((center + u * (0.5 * su) + v * (0.5 * sv)).to_array(), n.to_array())
    };

    let (a, b, c, d) = (corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0));
    out.extend_from_slice(&[a, b, c, a, c, d]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces_outward(tri: [Vertex; 3]) -> bool {
        let [a, b, c] = tri.map(|v| Vec3::from(v.position));
        let n = Vec3::from(tri[0].normal);
        (b - a).cross(c - a).dot(n) > 0.0
    }

    // ── cube ───────────────────────────────────────────────────────────────

    #[test]
    fn cube_has_36_vertices_on_the_unit_box() {
        let cube = unit_cube();
        assert_eq!(cube.len(), 36);
        for v in &cube {
            let p = Vec3::from(v.position);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn cube_winding_is_ccw_from_outside() {
        for tri in unit_cube().chunks_exact(3) {
            assert!(faces_outward([tri[0], tri[1], tri[2]]));
        }
    }

    // ── rectangle ──────────────────────────────────────────────────────────

    #[test]
    fn rectangle_is_double_sided_and_flat() {
        let rect = unit_rectangle();
        assert_eq!(rect.len(), 12);
        assert!(rect.iter().all(|v| v.position[2] == 0.0));
        assert!(rect[..6].iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(rect[6..].iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
        for tri in rect.chunks_exact(3) {
            assert!(faces_outward([tri[0], tri[1], tri[2]]));
        }
    }

    // ── sphere ─────────────────────────────────────────────────────────────

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let (vertices, _) = unit_sphere();
        for v in &vertices {
            assert!((Vec3::from(v.position).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_indices_are_in_range_and_outward() {
        let (vertices, indices) = unit_sphere();
        assert_eq!(indices.len() % 3, 0);
        assert_eq!(indices.len(), (SPHERE_SECTORS * (SPHERE_STACKS - 1) * 6) as usize);
        for tri in indices.chunks_exact(3) {
            let t = [0, 1, 2].map(|k| vertices[tri[k] as usize]);
            let [a, b, c] = t.map(|v| Vec3::from(v.position));
            let centroid = (a + b + c) / 3.0;
            assert!((b - a).cross(c - a).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn line_spans_unit_x() {
        let [a, b] = unit_line();
        assert_eq!(a.position, [0.0, 0.0, 0.0]);
        assert_eq!(b.position, [1.0, 0.0, 0.0]);
    }
}
