//! Triangle geometry to polygon arena conversion

use glam::Vec3;
use navgraph_common::{Error, Result, TriangleSoup};

use crate::config::NavMeshConfig;
use crate::connectivity::{ConnectivityBuilder, ConnectivityStats};
use crate::context::{null_sink, LogLevel, SharedSink};
use crate::nav_mesh::{NavMesh, PolyRef, Polygon};

/// Builds navigation meshes from flat vertex and index buffers
pub struct NavMeshBuilder {
    config: NavMeshConfig,
    sink: SharedSink,
}

impl std::fmt::Debug for NavMeshBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavMeshBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for NavMeshBuilder {
    fn default() -> Self {
        Self::new(NavMeshConfig::default())
    }
}

impl NavMeshBuilder {
    /// Creates a builder that logs nowhere
    pub fn new(config: NavMeshConfig) -> Self {
        Self {
            config,
            sink: null_sink(),
        }
    }

    /// Replaces the log sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Gets a reference to the configuration
    pub fn config(&self) -> &NavMeshConfig {
        &self.config
    }

    /// Converts every index triple into an unconnected polygon.
    ///
    /// Shared vertices are not deduplicated: each polygon owns copies of its
    /// three corners. The returned mesh is still in its build phase.
    pub fn build(&self, vertices: &[f32], indices: &[i32]) -> Result<NavMesh> {
        self.sink.log(
            LogLevel::Info,
            &format!(
                "Building navmesh from {} vertices, {} indices",
                vertices.len() / 3,
                indices.len()
            ),
        );

        validate_geometry(vertices, indices)?;

        let polygons = indices
            .chunks_exact(3)
            .enumerate()
            .map(|(tri, corners)| {
                let poly = Polygon::new(
                    PolyRef::new(tri as u32),
                    [
                        vertex_at(vertices, corners[0]),
                        vertex_at(vertices, corners[1]),
                        vertex_at(vertices, corners[2]),
                    ],
                );
                if tri < self.config.creation_log_limit {
                    self.sink.log(
                        LogLevel::Debug,
                        &format!("Created polygon {} with center {}", poly.id, poly.center),
                    );
                }
                poly
            })
            .collect::<Vec<_>>();

        self.sink.log(
            LogLevel::Info,
            &format!("Created {} polygons", polygons.len()),
        );

        Ok(NavMesh::from_polygons(polygons))
    }

    /// Builds from a [`TriangleSoup`]
    pub fn build_from_soup(&self, soup: &TriangleSoup) -> Result<NavMesh> {
        self.build(&soup.vertices, &soup.indices)
    }

    /// Builds, connects with the configured threshold and freezes the mesh
    pub fn build_connected(
        &self,
        vertices: &[f32],
        indices: &[i32],
    ) -> Result<(NavMesh, ConnectivityStats)> {
        self.config.validate()?;

        let mut mesh = self.build(vertices, indices)?;
        let stats = ConnectivityBuilder::from_config(&self.config)
            .with_sink(self.sink.clone())
            .connect(&mut mesh)?;
        mesh.freeze();

        Ok((mesh, stats))
    }
}

/// Rejects geometry that would make the builder read out of bounds
fn validate_geometry(vertices: &[f32], indices: &[i32]) -> Result<()> {
    if vertices.len() % 3 != 0 {
        return Err(Error::InvalidMesh(format!(
            "vertex buffer length {} is not a multiple of 3",
            vertices.len()
        )));
    }

    if indices.len() % 3 != 0 {
        return Err(Error::InvalidMesh(format!(
            "index buffer length {} is not a multiple of 3",
            indices.len()
        )));
    }

    let vert_count = vertices.len() / 3;
    if let Some((pos, &index)) = indices
        .iter()
        .enumerate()
        .find(|&(_, &i)| i < 0 || i as usize >= vert_count)
    {
        return Err(Error::InvalidMesh(format!(
            "index {index} at position {pos} is out of range for {vert_count} vertices"
        )));
    }

    Ok(())
}

#[inline]
fn vertex_at(vertices: &[f32], index: i32) -> Vec3 {
    let base = index as usize * 3;
    Vec3::from_slice(&vertices[base..base + 3])
}
