use crate::mesh::Triangle;
use glam::Vec3;
use rand::Rng;

/// Distance along the triangle normal between a seed's base and its tip.
pub const SEED_OFFSET: f32 = 0.01;

/// A two-node starting segment placed on the target surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedSegment {
    pub base: Vec3,
    pub tip: Vec3,
    pub normal: Vec3,
}

/// Scatters `count` seed segments over `triangles`.
///
/// Triangles are picked uniformly regardless of area, and the point inside
/// each is a blend of its corners with three independent uniform weights
/// normalized to sum to one. Neither choice is area-uniform.
///
/// Returns an empty list when `triangles` is empty.
pub fn seed(triangles: &[Triangle], count: usize, rng: &mut impl Rng) -> Vec<SeedSegment> {
    if triangles.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let tri = &triangles[rng.random_range(0..triangles.len())];
            let base = sample_in(tri, rng);
            SeedSegment {
                base,
                tip: base + tri.normal * SEED_OFFSET,
                normal: tri.normal,
            }
        })
        .collect()
}

fn sample_in(tri: &Triangle, rng: &mut impl Rng) -> Vec3 {
    let w: [f32; 3] = [rng.random(), rng.random(), rng.random()];
    let total = w[0] + w[1] + w[2];
    if total <= 0.0 {
        return tri.centroid();
    }
    (tri.a * w[0] + tri.b * w[1] + tri.c * w[2]) / total
}
