// CLI entry point for building and inspecting waymark navigation graphs.
//
// A thin driver over `GraphRuntime`: it loads a scene and config, runs the
// build, and writes the graph file, or loads an existing graph file and
// reports on it. All graph logic lives in `waymark_nav`.
//
// Usage:
//   waymark build --scene <SCENE> [OPTIONS]
//     --config <PATH>        WaymarkConfig JSON (default: built-in defaults)
//     --seed <X,Y,Z>         Grid origin, sampled from above (default: 0,100,0)
//     --grid-size <N>        Overrides config grid.grid_size
//     --spacing <F>          Overrides config grid.spacing
//     --out <PATH>           Graph file (default: config graph_file)
//   waymark inspect [GRAPH] [--json]
//   waymark config           Print the default config as JSON
//
// Logging is controlled by `WAYMARK_LOG` (see `logging.rs`).

mod logging;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use waymark_nav::config::WaymarkConfig;
use waymark_nav::nav::SurfaceGraph;
use waymark_nav::runtime::GraphRuntime;
use waymark_nav::scene::SurfaceScene;
use waymark_nav::types::Vec3;

#[derive(Parser, Debug)]
#[command(name = "waymark")]
#[command(about = "Build and inspect surface-draped navigation graphs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample a scene into a graph and save it
    Build {
        /// Scene JSON (patches and blocks)
        #[arg(long)]
        scene: PathBuf,

        /// Config JSON; missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Grid origin as X,Y,Z
        #[arg(long, value_parser = parse_vec3, default_value = "0,100,0")]
        seed: Vec3,

        #[arg(long)]
        grid_size: Option<u32>,

        #[arg(long)]
        spacing: Option<f32>,

        /// Output graph file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Load a graph file and print statistics
    Inspect {
        /// Graph file (default: Graph)
        graph: Option<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default config as JSON
    Config,
}

fn main() {
    logging::init("info");
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            scene,
            config,
            seed,
            grid_size,
            spacing,
            out,
        } => {
            let mut config = match config {
                Some(path) => WaymarkConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => WaymarkConfig::default(),
            };
            if let Some(grid_size) = grid_size {
                config.grid.grid_size = grid_size;
            }
            if let Some(spacing) = spacing {
                config.grid.spacing = spacing;
            }
            config.validate().context("invalid build parameters")?;

            let scene = load_scene(&scene)?;
            let out = out.unwrap_or_else(|| config.graph_path().to_path_buf());
            debug!(?config, %seed, out = %out.display(), "build parameters resolved");
            build(&scene, seed, &config, &out)
        }
        Commands::Inspect { graph, json } => {
            let path = graph.unwrap_or_else(|| WaymarkConfig::default().graph_path().to_path_buf());
            inspect(&path, json)
        }
        Commands::Config => {
            println!("{}", WaymarkConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_scene(path: &Path) -> Result<SurfaceScene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    SurfaceScene::from_json(&json).with_context(|| format!("parsing scene {}", path.display()))
}

fn build(scene: &SurfaceScene, seed: Vec3, config: &WaymarkConfig, out: &Path) -> Result<()> {
    let mut runtime = GraphRuntime::new();
    let report = runtime
        .build_with_config(scene, seed, config)
        .context("invalid build parameters")?;
    runtime
        .save(out)
        .with_context(|| format!("saving graph {}", out.display()))?;

    println!(
        "{} slots, {} nodes ({} active, {} obstructed, {} too steep, {} near wall), {} missing",
        report.slots,
        report.present(),
        report.active,
        report.obstructed,
        report.too_steep,
        report.near_wall,
        report.missing,
    );
    println!("{} edges written to {}", runtime.edge_segments().len(), out.display());
    Ok(())
}

fn inspect(path: &Path, json: bool) -> Result<()> {
    let mut runtime = GraphRuntime::new();
    runtime
        .load(path)
        .with_context(|| format!("loading graph {}", path.display()))?;
    let Some(graph) = runtime.graph() else {
        bail!("no graph loaded from {}", path.display());
    };
    let stats = GraphStats::of(graph);

    if json {
        let value = serde_json::json!({
            "slots": stats.slots,
            "nodes": stats.nodes,
            "active": stats.active,
            "edges": stats.edges,
            "max_degree": stats.max_degree,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", path.display());
        println!("  slots:      {}", stats.slots);
        println!("  nodes:      {} ({} active)", stats.nodes, stats.active);
        println!("  edges:      {}", stats.edges);
        println!("  max degree: {}", stats.max_degree);
    }
    Ok(())
}

/// Summary numbers printed by `inspect`.
#[derive(Debug, PartialEq, Eq)]
struct GraphStats {
    slots: usize,
    nodes: usize,
    active: usize,
    edges: usize,
    max_degree: usize,
}

impl GraphStats {
    fn of(graph: &SurfaceGraph) -> Self {
        Self {
            slots: graph.slot_count(),
            nodes: graph.node_count(),
            active: graph.active_count(),
            edges: graph.edge_count(),
            max_degree: graph.nodes().map(|n| n.neighbors.len()).max().unwrap_or(0),
        }
    }
}

/// Parse `X,Y,Z` into a `Vec3`.
fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z, got '{s}'"));
    };
    let coord = |v: &str| {
        v.parse::<f32>()
            .map_err(|e| format!("bad coordinate '{v}': {e}"))
    };
    Ok(Vec3::new(coord(x)?, coord(y)?, coord(z)?))
}
