//! Nearest-surface queries over the target mesh.
//!
//! [`SurfaceIndex`] is a binary bounding-volume hierarchy over triangle
//! boxes. It is built once per run and only read afterwards.
//!
//! # Build
//!
//! Triangles are split recursively at the median centroid along the
//! longest axis of the centroid bounds, until a node holds at most
//! [`LEAF_SIZE`] triangles. Nodes are stored in a flat `Vec` with the
//! root at index 0.
//!
//! # Query
//!
//! Traversal keeps the best squared distance found so far, skips every
//! box that lies farther than it, and visits the nearer child first. A
//! triangle only replaces the current best when it is strictly closer,
//! so ties go to the first triangle reached in traversal order.

use crate::error::MeshError;
use crate::mesh::Triangle;
use crate::types::TriangleId;
use glam::Vec3;
use log::warn;

/// Maximum number of triangles stored in one leaf.
pub const LEAF_SIZE: usize = 4;

/// Result of a nearest-point query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    /// Closest point on the surface.
    pub position: Vec3,
    /// Normal of the triangle that owns `position`.
    pub normal: Vec3,
    /// Euclidean distance from the query point to `position`.
    pub distance: f32,
    pub triangle: TriangleId,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn include_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn include_triangle(&mut self, t: &Triangle) {
        self.min = self.min.min(t.min());
        self.max = self.max.max(t.max());
    }

    pub fn longest_axis(&self) -> usize {
        let d = self.max - self.min;
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Squared distance from `p` to the box, zero when `p` is inside.
    pub fn squared_distance(&self, p: Vec3) -> f32 {
        (self.min - p).max(p - self.max).max(Vec3::ZERO).length_squared()
    }
}

#[derive(Clone, Debug)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        start: usize,
        count: usize,
    },
    Inner {
        bounds: Aabb,
        left: usize,
        right: usize,
    },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Inner { bounds, .. } => bounds,
        }
    }
}

/// Read-only acceleration structure over the target triangles.
#[derive(Clone, Debug)]
pub struct SurfaceIndex {
    triangles: Vec<Triangle>,
    /// Triangle ids, permuted so every leaf owns a contiguous range.
    order: Vec<TriangleId>,
    nodes: Vec<BvhNode>,
}

impl SurfaceIndex {
    /// Builds the hierarchy over `triangles`.
    ///
    /// Zero-area triangles carry no usable normal and are dropped with a
    /// warning. Triangle ids in [`SurfaceSample::triangle`] index the kept
    /// triangles, in input order.
    ///
    /// ### Returns
    /// - [`MeshError::Empty`] if `triangles` is empty.
    /// - [`MeshError::AllDegenerate`] if no triangle survives.
    pub fn build(triangles: Vec<Triangle>) -> Result<Self, MeshError> {
        if triangles.is_empty() {
            return Err(MeshError::Empty);
        }

        let total = triangles.len();
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .filter(|t| !t.is_degenerate())
            .collect();
        if triangles.is_empty() {
            return Err(MeshError::AllDegenerate);
        }
        if triangles.len() < total {
            warn!(
                "dropped {} degenerate triangle(s) out of {}",
                total - triangles.len(),
                total
            );
        }

        let centroids: Vec<Vec3> = triangles.iter().map(Triangle::centroid).collect();
        let mut index = Self {
            order: (0..triangles.len()).collect(),
            nodes: Vec::with_capacity(2 * triangles.len() / LEAF_SIZE + 1),
            triangles,
        };
        let len = index.order.len();
        index.build_node(&centroids, 0, len);
        Ok(index)
    }

    /// Builds the node covering `order[start..end]` and returns its index.
    fn build_node(&mut self, centroids: &[Vec3], start: usize, end: usize) -> usize {
        let mut bounds = Aabb::empty();
        for &id in &self.order[start..end] {
            bounds.include_triangle(&self.triangles[id]);
        }

        let node = self.nodes.len();
        let count = end - start;
        if count <= LEAF_SIZE {
            self.nodes.push(BvhNode::Leaf {
                bounds,
                start,
                count,
            });
            return node;
        }

        let mut centroid_bounds = Aabb::empty();
        for &id in &self.order[start..end] {
            centroid_bounds.include_point(centroids[id]);
        }
        let axis = centroid_bounds.longest_axis();

        let mid = start + count / 2;
        self.order[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            centroids[a][axis].total_cmp(&centroids[b][axis])
        });

        // Reserve the slot so the parent precedes its children.
        self.nodes.push(BvhNode::Leaf {
            bounds,
            start,
            count,
        });
        let left = self.build_node(centroids, start, mid);
        let right = self.build_node(centroids, mid, end);
        self.nodes[node] = BvhNode::Inner {
            bounds,
            left,
            right,
        };
        node
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounds of the whole target surface.
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map(|n| *n.bounds()).unwrap_or_else(Aabb::empty)
    }

    /// Returns the closest surface point to `point`.
    ///
    /// `None` only for an empty index, which [`SurfaceIndex::build`] never
    /// produces.
    pub fn nearest(&self, point: Vec3) -> Option<SurfaceSample> {
        self.nearest_within(point, f32::INFINITY)
    }

    /// Returns the closest surface point to `point` if it lies within
    /// `max_distance`, `None` otherwise.
    pub fn nearest_within(&self, point: Vec3, max_distance: f32) -> Option<SurfaceSample> {
        let limit = max_distance * max_distance;
        let mut best: Option<(TriangleId, Vec3)> = None;
        let mut best_d2 = limit;

        let mut stack = Vec::with_capacity(32);
        if !self.nodes.is_empty() {
            stack.push(0);
        }

        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if node.bounds().squared_distance(point) > best_d2 {
                continue;
            }
            match *node {
                BvhNode::Leaf { start, count, .. } => {
                    for &id in &self.order[start..start + count] {
                        let closest = self.triangles[id].closest_point(point);
                        let d2 = closest.distance_squared(point);
                        if d2 < best_d2 || (best.is_none() && d2 <= best_d2) {
                            best_d2 = d2;
                            best = Some((id, closest));
                        }
                    }
                }
                BvhNode::Inner { left, right, .. } => {
                    let dl = self.nodes[left].bounds().squared_distance(point);
                    let dr = self.nodes[right].bounds().squared_distance(point);
                    // Popped in reverse, so the nearer child goes last.
                    if dl <= dr {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }

        best.map(|(id, position)| self.sample(id, position, best_d2))
    }

    /// Linear scan over every triangle. Reference for the hierarchy.
    pub fn nearest_brute_force(&self, point: Vec3) -> Option<SurfaceSample> {
        let mut best: Option<(TriangleId, Vec3, f32)> = None;
        for (id, tri) in self.triangles.iter().enumerate() {
            let closest = tri.closest_point(point);
            let d2 = closest.distance_squared(point);
            if best.is_none_or(|(_, _, b)| d2 < b) {
                best = Some((id, closest, d2));
            }
        }
        best.map(|(id, position, d2)| self.sample(id, position, d2))
    }

    fn sample(&self, id: TriangleId, position: Vec3, d2: f32) -> SurfaceSample {
        SurfaceSample {
            position,
            normal: self.triangles[id].normal,
            distance: d2.sqrt(),
            triangle: id,
        }
    }
}
