//! The growth engine: seeding followed by a fixed number of iterations.

use crate::config::GrowthParams;
use crate::error::GrowthError;
use crate::graph::GrowthGraph;
use crate::mesh::Triangle;
use crate::phases::{self, StepReport};
use crate::spatial_index::SurfaceIndex;
use log::info;
use rand::Rng;

/// Where an engine is in its single pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has been seeded yet.
    Idle,
    /// Seeded, with `completed` iterations done so far.
    Iterating { completed: usize },
    /// All iterations have run; the graph is final.
    Done,
}

/// Drives one growth run over a target surface.
///
/// The engine owns the growing graph and borrows the read-only index.
/// [`GrowthEngine::step`] advances exactly one iteration, so callers can
/// stop between iterations; [`GrowthEngine::run`] goes to completion.
#[derive(Debug)]
pub struct GrowthEngine<'a> {
    index: &'a SurfaceIndex,
    params: GrowthParams,
    graph: GrowthGraph,
    stage: Stage,
}

impl<'a> GrowthEngine<'a> {
    /// Creates an idle engine, validating `params` first.
    pub fn new(index: &'a SurfaceIndex, params: GrowthParams) -> Result<Self, GrowthError> {
        params.validate()?;
        Ok(Self::with_valid_params(index, params))
    }

    fn with_valid_params(index: &'a SurfaceIndex, params: GrowthParams) -> Self {
        Self {
            index,
            params,
            graph: GrowthGraph::new(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn graph(&self) -> &GrowthGraph {
        &self.graph
    }

    pub fn into_graph(self) -> GrowthGraph {
        self.graph
    }

    /// Seeds the graph if the engine is still idle.
    ///
    /// Returns `true` if seeding happened on this call.
    pub fn seed(&mut self, rng: &mut impl Rng) -> bool {
        if self.stage != Stage::Idle {
            return false;
        }
        let seeds = phases::seeding_phase(&mut self.graph, self.index, &self.params, rng);
        info!(
            "seeded {} segment(s) over {} triangle(s)",
            seeds.len(),
            self.index.len()
        );
        self.stage = Stage::Iterating { completed: 0 };
        true
    }

    /// Runs the next iteration, seeding first if needed.
    ///
    /// Returns `None` once every iteration has run.
    pub fn step(&mut self, rng: &mut impl Rng) -> Option<StepReport> {
        self.seed(rng);
        let Stage::Iterating { completed } = self.stage else {
            return None;
        };

        let iteration = completed + 1;
        let report =
            phases::growth_phase(&mut self.graph, self.index, &self.params, iteration, rng);

        self.stage = if iteration >= self.params.iterations {
            Stage::Done
        } else {
            Stage::Iterating {
                completed: iteration,
            }
        };
        Some(report)
    }

    /// Runs every remaining iteration and returns the graph.
    pub fn run(self, rng: &mut impl Rng) -> GrowthGraph {
        self.run_while(rng, |_| true)
    }

    /// Runs iterations until they are exhausted or `keep_going` returns
    /// `false` for the latest report, then returns the graph.
    ///
    /// The check happens between iterations, never inside one.
    pub fn run_while(
        mut self,
        rng: &mut impl Rng,
        mut keep_going: impl FnMut(&StepReport) -> bool,
    ) -> GrowthGraph {
        while let Some(report) = self.step(rng) {
            if !keep_going(&report) {
                info!("stopped after iteration {}", report.iteration);
                break;
            }
        }
        info!(
            "growth finished: {} nodes, {} segments, total length {:.3}",
            self.graph.len(),
            self.graph.edge_count(),
            self.graph.total_length()
        );
        self.graph
    }
}

/// Validates `params`, indexes `triangles` and grows to completion.
///
/// ### Returns
/// - The finished graph.
/// - [`GrowthError::InvalidParameters`] or [`GrowthError::InvalidMesh`]
///   before any growth happens.
pub fn grow(
    triangles: Vec<Triangle>,
    params: &GrowthParams,
    rng: &mut impl Rng,
) -> Result<GrowthGraph, GrowthError> {
    // Parameters first, so a bad run fails before the index is built.
    params.validate()?;
    let index = SurfaceIndex::build(triangles)?;
    Ok(GrowthEngine::with_valid_params(&index, *params).run(rng))
}
