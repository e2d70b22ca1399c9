//! Centroid-proximity adjacency between polygons
//!
//! Two distinct polygons are neighbours when the XZ distance between their
//! centers is strictly below the connection threshold. This approximates
//! adjacency; polygons are not required to share an edge.
//!
//! Adjacency is written for both polygons of a pair at once, so connection
//! lists are symmetric, and every list is kept in ascending id order. The
//! brute-force and grid strategies therefore produce identical meshes.

use navgraph_common::{planar_dist, Result};

use crate::config::{
    validate_threshold, ConnectivityMode, NavMeshConfig, DEFAULT_CONNECTION_THRESHOLD,
};
use crate::context::{null_sink, LogLevel, SharedSink};
use crate::nav_mesh::{NavMesh, PolyRef, Polygon};
use crate::proximity_grid::ProximityGrid;

/// Grid cells are slightly larger than the threshold so that rounding in the
/// cell lookup can never put a connected pair two cells apart.
const GRID_CELL_PADDING: f32 = 1.001;

/// Strategy actually used by a connectivity pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStrategy {
    /// Every pair was compared
    BruteForce,
    /// Only pairs in neighbouring grid cells were compared
    Grid,
}

/// Summary of a connectivity pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityStats {
    /// Polygons in the mesh
    pub polygon_count: usize,
    /// Directed connections written (twice the number of adjacent pairs)
    pub connection_count: usize,
    /// Strategy used
    pub strategy: ConnectivityStrategy,
}

/// Writes proximity adjacency into a mesh that is still in its build phase
pub struct ConnectivityBuilder {
    threshold: f32,
    mode: ConnectivityMode,
    grid_min_polys: usize,
    sink: SharedSink,
}

impl Default for ConnectivityBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_THRESHOLD)
    }
}

impl ConnectivityBuilder {
    /// Creates a builder with the given threshold and automatic strategy choice
    pub fn new(threshold: f32) -> Self {
        let defaults = NavMeshConfig::default();
        Self {
            threshold,
            mode: defaults.connectivity,
            grid_min_polys: defaults.grid_min_polys,
            sink: null_sink(),
        }
    }

    /// Creates a builder from the threshold and strategy settings of a config
    pub fn from_config(config: &NavMeshConfig) -> Self {
        Self {
            threshold: config.connection_threshold,
            mode: config.connectivity,
            grid_min_polys: config.grid_min_polys,
            sink: null_sink(),
        }
    }

    /// Forces a strategy
    pub fn with_mode(mut self, mode: ConnectivityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the log sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Connection threshold in world units
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Replaces all connection lists of `mesh` with proximity adjacency.
    ///
    /// Fails with [`navgraph_common::Error::MeshFrozen`] once the mesh has
    /// been frozen.
    pub fn connect(&self, mesh: &mut NavMesh) -> Result<ConnectivityStats> {
        validate_threshold(self.threshold)?;
        let polygons = mesh.polygons_mut()?;

        let strategy = match self.mode {
            ConnectivityMode::BruteForce => ConnectivityStrategy::BruteForce,
            ConnectivityMode::Grid => ConnectivityStrategy::Grid,
            ConnectivityMode::Auto if polygons.len() >= self.grid_min_polys => {
                ConnectivityStrategy::Grid
            }
            ConnectivityMode::Auto => ConnectivityStrategy::BruteForce,
        };

        self.sink.log(
            LogLevel::Info,
            &format!(
                "Building connectivity for {} polygons (threshold {}, {:?})",
                polygons.len(),
                self.threshold,
                strategy
            ),
        );

        for poly in polygons.iter_mut() {
            poly.connections.clear();
        }

        let pairs = match strategy {
            ConnectivityStrategy::BruteForce => self.brute_force_pairs(polygons),
            ConnectivityStrategy::Grid => self.grid_pairs(polygons),
        };

        // Pairs arrive sorted by (lower, higher); pushing both directions in
        // that order leaves every list ascending.
        for &(a, b) in &pairs {
            polygons[a.index()].connections.push(b);
            polygons[b.index()].connections.push(a);
        }

        let stats = ConnectivityStats {
            polygon_count: polygons.len(),
            connection_count: pairs.len() * 2,
            strategy,
        };

        self.sink.log(
            LogLevel::Info,
            &format!("Total connections: {}", stats.connection_count),
        );

        Ok(stats)
    }

    fn is_close(&self, a: &Polygon, b: &Polygon) -> bool {
        planar_dist(a.center, b.center) < self.threshold
    }

    /// O(n²) scan over every unordered pair
    fn brute_force_pairs(&self, polygons: &[Polygon]) -> Vec<(PolyRef, PolyRef)> {
        let mut pairs = Vec::new();
        for (i, a) in polygons.iter().enumerate() {
            for b in &polygons[i + 1..] {
                if self.is_close(a, b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }

    fn grid_pairs(&self, polygons: &[Polygon]) -> Vec<(PolyRef, PolyRef)> {
        let grid = ProximityGrid::from_centers(
            self.threshold * GRID_CELL_PADDING,
            polygons.iter().map(|p| (p.id, p.center)),
        );

        let mut pairs = Vec::new();
        for a in polygons {
            let mut near: Vec<PolyRef> = grid
                .query_neighbourhood(a.center)
                .filter(|&other| other > a.id && self.is_close(a, &polygons[other.index()]))
                .collect();
            near.sort_unstable();
            pairs.extend(near.into_iter().map(|b| (a.id, b)));
        }
        pairs
    }
}
