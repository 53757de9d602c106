//! Target surface triangles.
//!
//! The growth core only ever sees a triangle soup: three corner positions
//! and an outward normal per triangle. [`triangles_from_indexed`] turns an
//! indexed mesh (shared vertex list plus faces) into that form.

use crate::error::MeshError;
use glam::Vec3;

/// Twice the area below which a triangle is treated as degenerate.
const DEGENERATE_AREA: f32 = 1e-12;

/// One triangle of the target surface.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    /// Unit outward normal, or zero for a degenerate triangle.
    pub normal: Vec3,
}

impl Triangle {
    /// Builds a triangle whose normal follows counter-clockwise winding.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self { a, b, c, normal }
    }

    /// Builds a triangle with a precomputed normal.
    ///
    /// The normal is normalized on entry; a zero normal falls back to the
    /// winding normal.
    pub fn with_normal(a: Vec3, b: Vec3, c: Vec3, normal: Vec3) -> Self {
        match normal.try_normalize() {
            Some(normal) => Self { a, b, c, normal },
            None => Self::new(a, b, c),
        }
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.b - self.a).cross(self.c - self.a).length()
    }

    pub fn is_degenerate(&self) -> bool {
        let doubled_area = (self.b - self.a).cross(self.c - self.a).length();
        doubled_area <= DEGENERATE_AREA || self.normal == Vec3::ZERO
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn min(&self) -> Vec3 {
        self.a.min(self.b).min(self.c)
    }

    pub fn max(&self) -> Vec3 {
        self.a.max(self.b).max(self.c)
    }

    /// Returns the point of the triangle (interior or boundary) closest to `p`.
    ///
    /// Classifies `p` against the vertex, edge and face Voronoi regions of
    /// the triangle and projects accordingly.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return a + ab * (d1 / (d1 - d3));
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return a + ac * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        a + ab * (vb * denom) + ac * (vc * denom)
    }
}

/// Builds triangles from a shared vertex list and index triples.
///
/// ### Parameters
/// - `vertices` - Vertex positions.
/// - `faces` - Counter-clockwise index triples into `vertices`.
///
/// ### Returns
/// One [`Triangle`] per face, in face order, or
/// [`MeshError::IndexOutOfRange`] for the first face with a bad index.
pub fn triangles_from_indexed(
    vertices: &[Vec3],
    faces: &[[usize; 3]],
) -> Result<Vec<Triangle>, MeshError> {
    faces
        .iter()
        .enumerate()
        .map(|(face, idx)| {
            let corner = |i: usize| {
                vertices
                    .get(idx[i])
                    .copied()
                    .ok_or(MeshError::IndexOutOfRange {
                        face,
                        index: idx[i],
                        vertex_count: vertices.len(),
                    })
            };
            Ok(Triangle::new(corner(0)?, corner(1)?, corner(2)?))
        })
        .collect()
}
