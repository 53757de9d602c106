//! Error taxonomy for the growth core.
//!
//! Only [`GrowthError`] ever reaches the caller of a run. The other types
//! describe local failures that the engine recovers from by skipping a
//! single branch attempt.

use crate::types::NodeId;
use thiserror::Error;

/// The target mesh cannot be indexed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("target mesh has no triangles")]
    Empty,

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("every triangle of the target mesh has zero area")]
    AllDegenerate,
}

/// Fatal precondition violations, raised before any growth happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GrowthError {
    #[error("invalid target mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    #[error("invalid growth parameter `{name}`: {reason}")]
    InvalidParameters { name: &'static str, reason: String },
}

/// A vector was too short to be normalized into a direction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("direction vector has near-zero length")]
pub struct DegenerateVector;

/// Structural misuse of a [`crate::graph::GrowthGraph`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} is not in the graph")]
    UnknownNode(NodeId),

    #[error("node {0} already has a parent")]
    AlreadyParented(NodeId),

    #[error("node {0} cannot be its own parent")]
    SelfLoop(NodeId),

    #[error("edge {parent} -> {child} would point from newer to older growth")]
    Backwards { parent: NodeId, child: NodeId },

    #[error("tip {0} has no parent")]
    OrphanTip(NodeId),

    #[error("segment ending at node {0} has zero length")]
    Degenerate(NodeId),
}
