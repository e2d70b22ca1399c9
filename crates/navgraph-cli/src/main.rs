//! CLI utility for navgraph

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use navgraph::{
    ConnectivityMode, LogCrateSink, NavMesh, NavMeshBuilder, NavMeshConfig, NavMeshQuery,
    PathResult, QueryFilter, SharedSink,
};
use navgraph_common::TriangleSoup;

/// Builds centroid-proximity navigation graphs and finds paths over them
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a navigation mesh from an input mesh
    Build {
        /// Input mesh file (OBJ format)
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Output navigation mesh file (JSON)
        #[clap(long, value_parser)]
        output: PathBuf,

        /// Polygons whose centers are closer than this on the XZ plane are connected
        #[clap(long, default_value = "2.0")]
        threshold: f32,

        /// Candidate pair search: auto, brute-force or grid
        #[clap(long, default_value = "auto")]
        connectivity: ConnectivityMode,

        /// Polygon count from which auto mode uses the grid
        #[clap(long, default_value = "256")]
        grid_min_polys: usize,
    },

    /// Find a path on a navigation mesh
    FindPath {
        /// Input navigation mesh file (JSON)
        #[clap(long, value_parser)]
        mesh: PathBuf,

        /// Start position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        start: Vec3,

        /// End position (x,y,z)
        #[clap(long, value_parser = parse_vector)]
        end: Vec3,

        /// Output path file
        #[clap(long, value_parser)]
        output: Option<PathBuf>,
    },
}

/// Parse a comma-separated vector
fn parse_vector(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();

    if parts.len() != 3 {
        return Err(format!(
            "Vector must have 3 components, got {}",
            parts.len()
        ));
    }

    let mut coords = [0.0f32; 3];
    for (coord, part) in coords.iter_mut().zip(&parts) {
        *coord = part.trim().parse::<f32>().map_err(|e| e.to_string())?;
    }

    Ok(Vec3::from_array(coords))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let sink: SharedSink = Arc::new(LogCrateSink);

    match args.command {
        Commands::Build {
            input,
            output,
            threshold,
            connectivity,
            grid_min_polys,
        } => {
            let config = NavMeshConfig {
                connection_threshold: threshold,
                connectivity,
                grid_min_polys,
                ..Default::default()
            };
            build_mesh(&input, &output, config, sink)
        }
        Commands::FindPath {
            mesh,
            start,
            end,
            output,
        } => find_path(&mesh, start, end, output.as_deref(), sink),
    }
}

/// Build a navigation mesh from an input mesh
fn build_mesh(input: &Path, output: &Path, config: NavMeshConfig, sink: SharedSink) -> Result<()> {
    log::info!("Loading mesh from {}...", input.display());

    let soup = TriangleSoup::from_obj(input)
        .with_context(|| format!("Failed to load mesh: {}", input.display()))?;

    log::info!(
        "Mesh loaded: {} vertices, {} triangles",
        soup.vert_count(),
        soup.tri_count()
    );

    let (nav_mesh, stats) = NavMeshBuilder::new(config)
        .with_sink(sink)
        .build_connected(&soup.vertices, &soup.indices)
        .context("Failed to build navigation mesh")?;

    log::info!(
        "Navigation mesh built: {} polygons, {} connections ({:?})",
        stats.polygon_count,
        stats.connection_count,
        stats.strategy
    );

    nav_mesh
        .save_to_json(output)
        .with_context(|| format!("Failed to save navigation mesh: {}", output.display()))?;

    log::info!("Saved navigation mesh to {}", output.display());

    Ok(())
}

/// Find a path on a navigation mesh
fn find_path(
    mesh_path: &Path,
    start: Vec3,
    end: Vec3,
    output: Option<&Path>,
    sink: SharedSink,
) -> Result<()> {
    log::info!("Loading navigation mesh from {}...", mesh_path.display());

    let nav_mesh = NavMesh::load_from_json(mesh_path)
        .with_context(|| format!("Failed to load navigation mesh: {}", mesh_path.display()))?;

    let query = NavMeshQuery::new(&nav_mesh)?.with_sink(sink);
    let filter = QueryFilter::default();
    let extents = Vec3::new(2.0, 4.0, 2.0);

    let start_ref = query
        .find_nearest_poly(start, extents, &filter)
        .ok_or_else(|| anyhow!("Navigation mesh has no polygons"))?;
    let end_ref = query
        .find_nearest_poly(end, extents, &filter)
        .ok_or_else(|| anyhow!("Navigation mesh has no polygons"))?;

    log::info!("Start polygon {}, end polygon {}", start_ref, end_ref);

    let result = query
        .find_path(start_ref, end_ref, start, end, &filter)?
        .ok_or_else(|| anyhow!("No path from {} to {}", start, end))?;

    match output {
        Some(output_path) => {
            let mut file = File::create(output_path).with_context(|| {
                format!("Failed to create output file: {}", output_path.display())
            })?;
            write_path(&mut file, start, end, &result)?;
            log::info!("Saved path to {}", output_path.display());
        }
        None => write_path(&mut std::io::stdout().lock(), start, end, &result)?,
    }

    Ok(())
}

fn write_path(out: &mut impl Write, start: Vec3, end: Vec3, result: &PathResult) -> Result<()> {
    writeln!(out, "# Path from {} to {}", start, end)?;
    writeln!(
        out,
        "# {} waypoints, {} polygons, length {:.3}, status {}",
        result.path.len(),
        result.polys.len(),
        result.length(),
        result.status
    )?;

    for waypoint in &result.path {
        writeln!(out, "{},{},{}", waypoint.x, waypoint.y, waypoint.z)?;
    }

    Ok(())
}
