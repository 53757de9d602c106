//! Command-line entry point for mycelium surface growth.
//!
//! Loads or builds a target surface, assembles a [`GrowthParams`] from an
//! optional JSON file plus flag overrides, runs the growth engine and
//! writes the resulting graph as JSON.

mod io;
mod logging;
mod shapes;

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use log::info;
use mycelium_core::{GrowthParams, grow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shapes::Shape;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Grow a mycelium-like filament network over a target mesh", long_about = None)]
struct Cli {
    /// Target mesh as JSON: {"vertices": [[x,y,z],...], "faces": [[i,j,k],...]}.
    #[arg(long, conflicts_with = "shape")]
    mesh: Option<PathBuf>,

    /// Built-in target surface, used when no mesh file is given [default: sphere].
    #[arg(long, value_enum)]
    shape: Option<Shape>,

    /// JSON file with growth parameters; missing fields keep their defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(flatten)]
    overrides: ParamOverrides,

    /// Random seed. A fresh one is drawn and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Graph)]
    format: OutputFormat,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,

    /// Raise log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Nodes with positions and parent links, plus the edge list.
    Graph,
    /// Unbranched polylines, ready for curve conversion.
    Strands,
}

/// Per-field overrides applied on top of defaults or the parameter file.
#[derive(Args, Debug, Default)]
struct ParamOverrides {
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    start_points: Option<usize>,
    #[arg(long)]
    branches: Option<usize>,
    #[arg(long)]
    branching_prob: Option<f32>,
    /// Cap on the turn between a tip and its branches, in radians.
    /// Uncapped by default; 1.30 gives straighter filaments.
    #[arg(long)]
    max_angle: Option<f32>,
    #[arg(long)]
    min_length: Option<f32>,
    #[arg(long)]
    max_length: Option<f32>,
    #[arg(long)]
    max_distance: Option<f32>,
    #[arg(long)]
    attraction_strength: Option<f32>,
}

impl ParamOverrides {
    fn apply(&self, params: &mut GrowthParams) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut params.iterations, self.iterations);
        set(&mut params.start_points, self.start_points);
        set(&mut params.branches, self.branches);
        set(&mut params.branching_prob, self.branching_prob);
        set(&mut params.max_angle, self.max_angle);
        set(&mut params.min_length, self.min_length);
        set(&mut params.max_length, self.max_length);
        set(&mut params.max_distance, self.max_distance);
        set(&mut params.attraction_strength, self.attraction_strength);
    }
}

/// Parses arguments, runs one growth and writes the result.
///
/// ### Returns
/// - `Ok(())` once the output has been written.
/// - `Err` naming the violated precondition (bad mesh, bad parameters)
///   or the I/O step that failed.
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&["mycelium_core", "mycelium"], cli.verbose);

    let triangles = match &cli.mesh {
        Some(path) => io::load_mesh(path)?,
        None => cli.shape.unwrap_or(Shape::Sphere).triangles(),
    };

    let mut params = match &cli.params {
        Some(path) => io::load_params(path)?,
        None => GrowthParams::default(),
    };
    cli.overrides.apply(&mut params);

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        "growing over {} triangle(s) with seed {seed}: {params:?}",
        triangles.len()
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let graph = grow(triangles, &params, &mut rng).context("growth run rejected")?;

    let output = cli.output.as_deref();
    match cli.format {
        OutputFormat::Graph => io::write_json(&io::graph_document(&graph), output, cli.pretty),
        OutputFormat::Strands => {
            io::write_json(&io::strands_document(&graph), output, cli.pretty)
        }
    }
}
