//! End-to-end properties of a growth run.

use glam::Vec3;
use mycelium_core::phases::SURFACE_OFFSET_MAX;
use mycelium_core::{GrowthEngine, GrowthGraph, GrowthParams, SurfaceIndex, Triangle, grow};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Closed octahedron with outward normals.
fn octahedron() -> Vec<Triangle> {
    let (px, nx) = (Vec3::X, -Vec3::X);
    let (py, ny) = (Vec3::Y, -Vec3::Y);
    let (pz, nz) = (Vec3::Z, -Vec3::Z);
    vec![
        Triangle::new(px, py, pz),
        Triangle::new(py, nx, pz),
        Triangle::new(nx, ny, pz),
        Triangle::new(ny, px, pz),
        Triangle::new(py, px, nz),
        Triangle::new(nx, py, nz),
        Triangle::new(ny, nx, nz),
        Triangle::new(px, ny, nz),
    ]
}

/// Large flat square at z = 0, so every query lands.
fn wide_plane() -> Vec<Triangle> {
    let a = Vec3::new(-100.0, -100.0, 0.0);
    let b = Vec3::new(100.0, -100.0, 0.0);
    let c = Vec3::new(100.0, 100.0, 0.0);
    let d = Vec3::new(-100.0, 100.0, 0.0);
    vec![Triangle::new(a, b, c), Triangle::new(a, c, d)]
}

fn assert_forest(graph: &GrowthGraph, roots: usize) {
    assert_eq!(graph.roots().count(), roots);
    assert_eq!(graph.edge_count(), graph.len() - roots);
    for (parent, child) in graph.edges() {
        assert!(parent < child, "edge {parent} -> {child} runs backwards");
    }
}

#[test]
fn octahedron_normals_point_outward() {
    for t in octahedron() {
        assert!(t.normal.dot(t.centroid()) > 0.0);
    }
}

#[test]
fn seeding_creates_one_edge_trees() {
    let index = SurfaceIndex::build(octahedron()).unwrap();
    let params = GrowthParams {
        start_points: 5,
        ..Default::default()
    };
    let mut engine = GrowthEngine::new(&index, params).unwrap();
    let mut rng = StdRng::seed_from_u64(10);

    engine.seed(&mut rng);
    let graph = engine.graph();

    assert_eq!(graph.len(), 10);
    assert_eq!(graph.edge_count(), 5);
    for base in graph.roots() {
        let children = &graph.node(base).unwrap().children;
        assert_eq!(children.len(), 1);
        assert!(graph.node(children[0]).unwrap().children.is_empty());
    }
}

#[test]
fn each_step_extends_exactly_the_preexisting_tips() {
    let index = SurfaceIndex::build(octahedron()).unwrap();
    let params = GrowthParams {
        iterations: 6,
        start_points: 3,
        branches: 2,
        branching_prob: 0.7,
        ..Default::default()
    };
    let mut engine = GrowthEngine::new(&index, params).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    engine.seed(&mut rng);

    loop {
        let tips_before = engine.graph().tips();
        let len_before = engine.graph().len();
        let Some(report) = engine.step(&mut rng) else {
            break;
        };

        assert_eq!(report.tips, tips_before.len());
        assert_eq!(engine.graph().len(), len_before + report.grown);
        for id in len_before..engine.graph().len() {
            let parent = engine.graph().node(id).unwrap().parent.unwrap();
            assert!(tips_before.contains(&parent));
        }
    }
}

#[test]
fn zero_branching_probability_adds_nothing_after_seeding() {
    let params = GrowthParams {
        iterations: 20,
        start_points: 4,
        branching_prob: 0.0,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(12);
    let graph = grow(octahedron(), &params, &mut rng).unwrap();

    assert_eq!(graph.len(), 8);
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn full_branching_is_bounded_by_branch_count() {
    let index = SurfaceIndex::build(wide_plane()).unwrap();
    let params = GrowthParams {
        iterations: 2,
        start_points: 1,
        branches: 2,
        branching_prob: 1.0,
        max_distance: 1000.0,
        ..Default::default()
    };
    let mut engine = GrowthEngine::new(&index, params).unwrap();
    let mut rng = StdRng::seed_from_u64(13);

    engine.seed(&mut rng);
    assert_eq!(engine.graph().len(), 2);

    engine.step(&mut rng);
    assert_eq!(engine.graph().len(), 4);

    engine.step(&mut rng);
    assert_eq!(engine.graph().len(), 8);

    // The seed tip branched once, in iteration 1.
    assert_eq!(engine.graph().node(1).unwrap().children, vec![2, 3]);
    assert_eq!(engine.graph().tips(), vec![4, 5, 6, 7]);
}

#[test]
fn default_params_grow_every_branch_on_an_open_plane() {
    let index = SurfaceIndex::build(wide_plane()).unwrap();
    let params = GrowthParams::default();
    let mut engine = GrowthEngine::new(&index, params).unwrap();
    let mut rng = StdRng::seed_from_u64(17);

    while let Some(report) = engine.step(&mut rng) {
        assert_eq!(report.skipped.too_sharp, 0, "{report:?}");
        assert_eq!(report.skipped.out_of_range, 0, "{report:?}");
        assert_eq!(report.skipped.not_branched, 0, "{report:?}");
        assert_eq!(report.grown, report.tips * params.branches, "{report:?}");
    }
}

#[test]
fn growth_stays_next_to_the_target() {
    let index = SurfaceIndex::build(octahedron()).unwrap();
    let params = GrowthParams {
        iterations: 8,
        start_points: 3,
        ..Default::default()
    };
    let mut rng = StdRng::seed_from_u64(14);
    let graph = GrowthEngine::new(&index, params).unwrap().run(&mut rng);

    assert_forest(&graph, 3);
    for node in graph.nodes() {
        let sample = index.nearest(node.pos).unwrap();
        assert!(
            sample.distance <= SURFACE_OFFSET_MAX + 1e-4,
            "{:?} is {} away from the surface",
            node.pos,
            sample.distance
        );
    }
}

#[test]
fn identical_streams_give_identical_graphs() {
    let params = GrowthParams {
        iterations: 6,
        start_points: 2,
        ..Default::default()
    };

    let a = grow(octahedron(), &params, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = grow(octahedron(), &params, &mut StdRng::seed_from_u64(99)).unwrap();
    let c = grow(octahedron(), &params, &mut StdRng::seed_from_u64(100)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn strands_cover_every_segment_once() {
    let params = GrowthParams {
        iterations: 5,
        start_points: 2,
        ..Default::default()
    };
    let graph = grow(octahedron(), &params, &mut StdRng::seed_from_u64(15)).unwrap();

    let strands = graph.strands();
    let segments: usize = strands.iter().map(|s| s.len() - 1).sum();
    assert_eq!(segments, graph.edge_count());
    for strand in &strands {
        for pair in strand.windows(2) {
            assert_eq!(graph.node(pair[1]).unwrap().parent, Some(pair[0]));
        }
    }
}
