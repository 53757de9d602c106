/// Identifier for a node in a [`crate::graph::GrowthGraph`].
///
/// This is an index into the graph's node list, and is only meaningful
/// within the lifetime of a given `GrowthGraph` instance.
pub type NodeId = usize;

/// Index of a triangle inside a [`crate::spatial_index::SurfaceIndex`].
pub type TriangleId = usize;
