//! Core mycelium surface-growth library.
//!
//! Grows a forest of filament segments that follows the surface of a
//! triangulated target mesh.
//!
//! Main components:
//! - [`mesh`]: target triangles and closest-point-on-triangle.
//! - [`spatial_index`]: BVH answering nearest-surface queries.
//! - [`direction`]: blending of prior direction, surface normal and noise.
//! - [`seeder`]: initial segments scattered over the target.
//! - [`graph`]: the append-only growth forest.
//! - [`phases`]: seeding and per-iteration growth.
//! - [`engine`]: the run state machine and the [`grow`] entry point.
//! - [`config`]: run parameters and their validation.
//! - [`error`]: error types.
//! - [`types`]: shared id aliases.
//!
//! ```
//! use glam::Vec3;
//! use mycelium_core::{GrowthParams, Triangle, grow};
//! use rand::SeedableRng;
//!
//! let target = vec![Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y)];
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let graph = grow(target, &GrowthParams::default(), &mut rng).unwrap();
//! assert!(graph.len() >= 2);
//! ```

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod graph;
pub mod mesh;
pub mod phases;
pub mod seeder;
pub mod spatial_index;
pub mod types;

pub use config::GrowthParams;
pub use engine::{GrowthEngine, Stage, grow};
pub use error::{GrowthError, MeshError};
pub use graph::{GrowthGraph, GrowthNode};
pub use mesh::Triangle;
pub use phases::StepReport;
pub use spatial_index::{SurfaceIndex, SurfaceSample};
pub use types::NodeId;
