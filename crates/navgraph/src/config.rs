//! Configuration for navigation graph construction

use navgraph_common::{Error, Result};

/// Default planar distance below which two polygon centers are connected
pub const DEFAULT_CONNECTION_THRESHOLD: f32 = 2.0;

/// How the connectivity pass finds candidate polygon pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityMode {
    /// Compare every pair of polygons
    BruteForce,
    /// Bucket centers into a grid and compare neighbouring buckets only
    Grid,
    /// Brute force for small meshes, grid once `grid_min_polys` is reached
    #[default]
    Auto,
}

impl std::str::FromStr for ConnectivityMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "brute-force" | "bruteforce" | "brute" => Ok(Self::BruteForce),
            "grid" => Ok(Self::Grid),
            "auto" => Ok(Self::Auto),
            other => Err(Error::InvalidConfig(format!(
                "unknown connectivity mode '{other}'"
            ))),
        }
    }
}

/// Configuration parameters for building a navigation graph
#[derive(Debug, Clone, PartialEq)]
pub struct NavMeshConfig {
    /// Polygons whose centers are closer than this on the XZ plane are connected
    pub connection_threshold: f32,
    /// Candidate pair search strategy
    pub connectivity: ConnectivityMode,
    /// Polygon count from which [`ConnectivityMode::Auto`] uses the grid
    pub grid_min_polys: usize,
    /// Number of polygon creations reported individually while building
    pub creation_log_limit: usize,
}

impl Default for NavMeshConfig {
    fn default() -> Self {
        Self {
            connection_threshold: DEFAULT_CONNECTION_THRESHOLD,
            connectivity: ConnectivityMode::Auto,
            grid_min_polys: 256,
            creation_log_limit: 3,
        }
    }
}

impl NavMeshConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.connection_threshold)
    }
}

/// Rejects thresholds that cannot define a proximity relation
pub(crate) fn validate_threshold(threshold: f32) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "connection threshold must be positive and finite, got {threshold}"
        )));
    }
    Ok(())
}
