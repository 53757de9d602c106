//! The two phases of a growth run.
//!
//! A run looks like:
//! 1. [`seeding_phase`]: scatter seed segments over the target surface.
//! 2. [`growth_phase`], once per iteration: every tip that exists when
//!    the iteration starts tries to sprout up to `branches` new segments
//!    bent toward the target surface.
//!
//! Local failures (a degenerate direction, a turn sharper than
//! `max_angle`, a candidate too far from the surface) skip one branch
//! attempt and are tallied in [`SkipCounts`]; they never abort the run.

use crate::config::GrowthParams;
use crate::direction::{organic_direction, unit};
use crate::error::DegenerateVector;
use crate::graph::GrowthGraph;
use crate::seeder;
use crate::spatial_index::{SurfaceIndex, SurfaceSample};
use crate::types::NodeId;
use glam::Vec3;
use log::{debug, trace};
use rand::Rng;

/// Extra pull toward the surface normal at full curve factor.
pub const CURVE_BLEND: f32 = 0.3;
/// Fraction of segment length lost at full curve factor.
pub const LENGTH_FALLOFF: f32 = 0.5;
/// Range of the offset that keeps new nodes just above the surface.
pub const SURFACE_OFFSET_MIN: f32 = 0.001;
pub const SURFACE_OFFSET_MAX: f32 = 0.01;

/// Branch attempts that did not produce a segment, by cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// The branching draw failed.
    pub not_branched: usize,
    /// No surface sample at the tip.
    pub no_surface: usize,
    /// A direction could not be normalized.
    pub degenerate: usize,
    /// The new direction turned more than `max_angle`.
    pub too_sharp: usize,
    /// The candidate lay farther than `max_distance` from the surface.
    pub out_of_range: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.not_branched + self.no_surface + self.degenerate + self.too_sharp + self.out_of_range
    }
}

/// Summary of one [`growth_phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Tips in the snapshot taken at the start of the iteration.
    pub tips: usize,
    /// Segments added.
    pub grown: usize,
    pub skipped: SkipCounts,
}

enum BranchSkip {
    Degenerate,
    TooSharp,
    OutOfRange,
}

impl From<DegenerateVector> for BranchSkip {
    fn from(_: DegenerateVector) -> Self {
        BranchSkip::Degenerate
    }
}

/// Places `params.start_points` seed segments on the target surface.
///
/// ### Parameters
/// - `graph` - Graph to append the seeds to.
/// - `index` - Target surface; seeds are drawn from its triangles.
/// - `params` - Run parameters, providing `start_points`.
/// - `rng` - Random source.
///
/// ### Returns
/// The `(base, tip)` node ids of each seed, in creation order.
pub fn seeding_phase(
    graph: &mut GrowthGraph,
    index: &SurfaceIndex,
    params: &GrowthParams,
    rng: &mut impl Rng,
) -> Vec<(NodeId, NodeId)> {
    seeder::seed(index.triangles(), params.start_points, rng)
        .iter()
        .map(|s| graph.add_seed(s))
        .collect()
}

/// Runs one growth iteration over every current tip.
///
/// The tip set is snapshotted before anything is added, so nodes created
/// here are only extended by the next iteration. For each tip:
///
/// 1. Query the nearest surface point; skip the tip if there is none.
/// 2. Take the direction of the tip's incoming segment as the base.
/// 3. Run `params.branches` independent trials. A trial succeeds with
///    probability `branching_prob` and then:
///    - blends the base with the surface normal and noise
///      ([`organic_direction`]), then pulls it further toward the normal
///      by `curve * CURVE_BLEND`, where `curve = iteration / iterations`;
///    - rejects the branch if it turns more than `max_angle`;
///    - steps `uniform(min_length, max_length) * (1 - curve * LENGTH_FALLOFF)`
///      along that direction;
///    - snaps the candidate to the nearest surface point within
///      `max_distance` (dropping it if there is none) and lifts it along
///      the surface normal by a small random offset.
///
/// ### Parameters
/// - `graph` - The graph to grow; new nodes are appended.
/// - `index` - Target surface.
/// - `params` - Validated run parameters.
/// - `iteration` - 1-based iteration number, at most `params.iterations`.
/// - `rng` - Random source.
///
/// ### Returns
/// A [`StepReport`] with the tip count, the number of segments added and
/// the skipped branch attempts.
///
/// ### Panics
/// Panics if `params.branching_prob` lies outside `[0, 1]` or
/// `min_length > max_length`. [`GrowthParams::validate`] rules both out;
/// [`crate::GrowthEngine`] always validates before calling this.
pub fn growth_phase(
    graph: &mut GrowthGraph,
    index: &SurfaceIndex,
    params: &GrowthParams,
    iteration: usize,
    rng: &mut impl Rng,
) -> StepReport {
    let tips = graph.tips();
    let curve = iteration as f32 / params.iterations as f32;

    let mut report = StepReport {
        iteration,
        tips: tips.len(),
        grown: 0,
        skipped: SkipCounts::default(),
    };

    for tip in tips {
        let pos = graph.position(tip);

        let Some(sample) = index.nearest(pos) else {
            trace!("tip {tip}: no surface sample");
            report.skipped.no_surface += params.branches;
            continue;
        };

        // Tips always have a parent, so only a zero-length segment can fail.
        let base = match graph.parent_direction(tip) {
            Ok(dir) => dir,
            Err(err) => {
                trace!("tip {tip}: {err}");
                report.skipped.degenerate += params.branches;
                continue;
            }
        };

        for _ in 0..params.branches {
            if !rng.random_bool(f64::from(params.branching_prob)) {
                report.skipped.not_branched += 1;
                continue;
            }

            match branch(pos, base, &sample, curve, index, params, rng) {
                Ok(new_pos) => {
                    graph.add_child(tip, new_pos);
                    report.grown += 1;
                }
                Err(BranchSkip::Degenerate) => {
                    trace!("tip {tip}: degenerate growth direction");
                    report.skipped.degenerate += 1;
                }
                Err(BranchSkip::TooSharp) => {
                    trace!("tip {tip}: branch exceeds max angle");
                    report.skipped.too_sharp += 1;
                }
                Err(BranchSkip::OutOfRange) => {
                    trace!("tip {tip}: candidate beyond max distance");
                    report.skipped.out_of_range += 1;
                }
            }
        }
    }

    debug!(
        "iteration {}/{}: {} tips, {} grown, {} skipped",
        iteration,
        params.iterations,
        report.tips,
        report.grown,
        report.skipped.total()
    );
    report
}

/// One successful branching trial: direction, length, surface snap.
fn branch(
    tip: Vec3,
    base: Vec3,
    sample: &SurfaceSample,
    curve: f32,
    index: &SurfaceIndex,
    params: &GrowthParams,
    rng: &mut impl Rng,
) -> Result<Vec3, BranchSkip> {
    let dir = organic_direction(base, sample.normal, params.attraction_strength, rng)?;
    let dir = unit(dir.lerp(sample.normal, curve * CURVE_BLEND))?;
    if dir.angle_between(base) > params.max_angle {
        return Err(BranchSkip::TooSharp);
    }

    let length =
        rng.random_range(params.min_length..=params.max_length) * (1.0 - curve * LENGTH_FALLOFF);
    let candidate = tip + dir * length;

    let landing = index
        .nearest_within(candidate, params.max_distance)
        .ok_or(BranchSkip::OutOfRange)?;
    let lift = rng.random_range(SURFACE_OFFSET_MIN..SURFACE_OFFSET_MAX);
    Ok(landing.position + landing.normal * lift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Triangle;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Two triangles covering the square [-5, 5]^2 at z = 0, normal +z.
    fn plane() -> SurfaceIndex {
        let a = Vec3::new(-5.0, -5.0, 0.0);
        let b = Vec3::new(5.0, -5.0, 0.0);
        let c = Vec3::new(5.0, 5.0, 0.0);
        let d = Vec3::new(-5.0, 5.0, 0.0);
        SurfaceIndex::build(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)]).unwrap()
    }

    fn eager() -> GrowthParams {
        GrowthParams {
            iterations: 3,
            start_points: 2,
            branches: 2,
            branching_prob: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn seeding_adds_one_segment_per_start_point() {
        let index = plane();
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(1);
        let params = GrowthParams {
            start_points: 4,
            ..eager()
        };

        let seeds = seeding_phase(&mut graph, &index, &params, &mut rng);

        assert_eq!(seeds.len(), 4);
        assert_eq!(graph.len(), 8);
        assert_eq!(graph.edge_count(), 4);
        for (base, tip) in seeds {
            assert_eq!(graph.node(tip).unwrap().parent, Some(base));
            assert!(graph.position(base).z.abs() < 1e-6);
        }
    }

    #[test]
    fn growth_extends_only_the_snapshot_tips() {
        let index = plane();
        let params = eager();
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(2);
        seeding_phase(&mut graph, &index, &params, &mut rng);

        let report = growth_phase(&mut graph, &index, &params, 1, &mut rng);

        assert_eq!(report.tips, 2);
        assert_eq!(report.grown + report.skipped.total(), 2 * params.branches);
        assert_eq!(graph.len(), 4 + report.grown);
        // New nodes hang directly off the seed tips, never off each other.
        for (parent, child) in graph.edges().skip(2) {
            assert!(parent == 1 || parent == 3, "{parent} -> {child}");
        }
    }

    #[test]
    fn new_nodes_sit_just_above_the_surface() {
        let index = plane();
        let params = eager();
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(3);
        seeding_phase(&mut graph, &index, &params, &mut rng);

        for k in 1..=params.iterations {
            growth_phase(&mut graph, &index, &params, k, &mut rng);
        }

        for node in graph.nodes().iter().skip(4) {
            assert!(
                node.pos.z >= SURFACE_OFFSET_MIN - 1e-6 && node.pos.z <= SURFACE_OFFSET_MAX + 1e-6,
                "{:?}",
                node.pos
            );
        }
    }

    #[test]
    fn zero_probability_never_branches() {
        let index = plane();
        let params = GrowthParams {
            branching_prob: 0.0,
            ..eager()
        };
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(4);
        seeding_phase(&mut graph, &index, &params, &mut rng);

        let report = growth_phase(&mut graph, &index, &params, 1, &mut rng);

        assert_eq!(report.grown, 0);
        assert_eq!(report.skipped.not_branched, 2 * params.branches);
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn tiny_max_distance_drops_far_candidates() {
        let index = plane();
        // The seed tip points straight up; with no pull toward the surface
        // and no room to turn, every candidate ends up well above it.
        let params = GrowthParams {
            iterations: 100,
            start_points: 1,
            branches: 3,
            attraction_strength: 0.0,
            min_length: 1.0,
            max_length: 1.0,
            max_distance: 0.05,
            ..Default::default()
        };
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(5);
        seeding_phase(&mut graph, &index, &params, &mut rng);

        let report = growth_phase(&mut graph, &index, &params, 1, &mut rng);

        assert_eq!(report.grown, 0);
        assert_eq!(report.skipped.out_of_range, 3);
    }

    #[test]
    fn zero_max_angle_rejects_every_turn() {
        let index = plane();
        let params = GrowthParams {
            max_angle: 0.0,
            ..eager()
        };
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(6);
        seeding_phase(&mut graph, &index, &params, &mut rng);

        let report = growth_phase(&mut graph, &index, &params, 1, &mut rng);

        assert_eq!(report.grown, 0);
        assert_eq!(
            report.skipped.too_sharp + report.skipped.degenerate,
            2 * params.branches
        );
    }

    #[test]
    fn zero_length_tip_skips_its_branches_without_stopping_others() {
        let index = plane();
        let params = eager();
        let mut graph = GrowthGraph::new();
        let mut rng = StdRng::seed_from_u64(7);
        let (_, healthy) = seeding_phase(
            &mut graph,
            &index,
            &GrowthParams {
                start_points: 1,
                ..params
            },
            &mut rng,
        )[0];
        let p = Vec3::new(1.0, 1.0, 0.005);
        let stuck_base = graph.add_node(p);
        let stuck = graph.add_child(stuck_base, p);

        let report = growth_phase(&mut graph, &index, &params, 1, &mut rng);

        assert_eq!(report.tips, 2);
        assert_eq!(report.skipped.degenerate, params.branches);
        assert_eq!(report.grown, params.branches);
        assert!(graph.node(stuck).unwrap().children.is_empty());
        assert_eq!(graph.node(healthy).unwrap().children.len(), params.branches);
    }
}
