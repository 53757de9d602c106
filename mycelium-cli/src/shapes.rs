//! Built-in target surfaces for quick runs without a mesh file.

use clap::ValueEnum;
use glam::Vec3;
use mycelium_core::Triangle;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// Subdivided square [-1, 1]^2 at z = 0, facing +z.
    Plane,
    /// Unit cube centered at the origin.
    Cube,
    /// UV sphere of radius 1.
    Sphere,
}

impl Shape {
    pub fn triangles(self) -> Vec<Triangle> {
        match self {
            Shape::Plane => plane(16),
            Shape::Cube => cube(),
            Shape::Sphere => uv_sphere(32, 16),
        }
    }
}

/// Pushes the counter-clockwise quad `a b c d` as two triangles.
fn push_quad(tris: &mut Vec<Triangle>, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
    tris.push(Triangle::new(a, b, c));
    tris.push(Triangle::new(a, c, d));
}

pub fn plane(n: usize) -> Vec<Triangle> {
    let at = |i: usize, j: usize| {
        Vec3::new(
            i as f32 / n as f32 * 2.0 - 1.0,
            j as f32 / n as f32 * 2.0 - 1.0,
            0.0,
        )
    };
    let mut tris = Vec::with_capacity(2 * n * n);
    for i in 0..n {
        for j in 0..n {
            push_quad(&mut tris, at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1));
        }
    }
    tris
}

pub fn cube() -> Vec<Triangle> {
    // (normal, u, v) with u x v == normal.
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (-Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (-Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (-Vec3::Z, Vec3::Y, Vec3::X),
    ];
    let mut tris = Vec::with_capacity(12);
    for (n, u, v) in faces {
        let (c, u, v) = (n * 0.5, u * 0.5, v * 0.5);
        push_quad(&mut tris, c - u - v, c + u - v, c + u + v, c - u + v);
    }
    tris
}

/// Sphere with `segments` longitudinal and `rings` latitudinal divisions.
///
/// Pole caps are fans, so no zero-area triangles are produced.
pub fn uv_sphere(segments: usize, rings: usize) -> Vec<Triangle> {
    let at = |ring: usize, seg: usize| {
        let theta = PI * ring as f32 / rings as f32;
        let phi = TAU * seg as f32 / segments as f32;
        Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
    };

    let mut tris = Vec::with_capacity(segments * (2 * rings - 2));
    for ring in 0..rings {
        for seg in 0..segments {
            let a = at(ring, seg);
            let b = at(ring + 1, seg);
            let c = at(ring + 1, seg + 1);
            let d = at(ring, seg + 1);
            if ring != rings - 1 {
                tris.push(Triangle::new(a, b, c));
            }
            if ring != 0 {
                tris.push(Triangle::new(a, c, d));
            }
        }
    }
    tris
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(tris: &[Triangle]) {
        for t in tris {
            assert!(!t.is_degenerate(), "{t:?}");
            assert!(t.normal.dot(t.centroid()) > 0.0, "{t:?}");
        }
    }

    #[test]
    fn plane_faces_up() {
        let tris = plane(4);
        assert_eq!(tris.len(), 32);
        for t in &tris {
            assert!((t.normal - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn cube_is_closed_and_outward() {
        let tris = cube();
        assert_eq!(tris.len(), 12);
        assert_outward(&tris);
        let area: f32 = tris.iter().map(Triangle::area).sum();
        assert!((area - 6.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_is_outward_without_pole_slivers() {
        let tris = uv_sphere(12, 6);
        assert_eq!(tris.len(), 12 * (2 * 6 - 2));
        assert_outward(&tris);
    }

    #[test]
    fn every_shape_produces_triangles() {
        for shape in [Shape::Plane, Shape::Cube, Shape::Sphere] {
            assert!(!shape.triangles().is_empty());
        }
    }
}
