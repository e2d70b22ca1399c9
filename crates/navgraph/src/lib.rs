//! Navigation graphs built from raw triangle geometry
//!
//! Each input triangle becomes a polygon; polygons whose centers are close
//! on the XZ plane are linked, and A* over those links answers path queries.
//!
//! ```
//! use glam::Vec3;
//! use navgraph::{NavMeshBuilder, NavMeshConfig, NavMeshQuery, QueryFilter};
//!
//! let vertices = [
//!     0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 3.0, //
//!     1.0, 0.0, 0.0, 4.0, 0.0, 0.0, 1.0, 0.0, 3.0,
//! ];
//! let indices = [0, 1, 2, 3, 4, 5];
//!
//! let (mesh, _stats) = NavMeshBuilder::new(NavMeshConfig::default())
//!     .build_connected(&vertices, &indices)
//!     .unwrap();
//! let query = NavMeshQuery::new(&mesh).unwrap();
//! let filter = QueryFilter::default();
//!
//! let start = Vec3::new(0.5, 0.0, 1.0);
//! let end = Vec3::new(2.5, 0.0, 1.0);
//! let start_ref = query.find_nearest_poly(start, Vec3::ONE, &filter).unwrap();
//! let end_ref = query.find_nearest_poly(end, Vec3::ONE, &filter).unwrap();
//!
//! let result = query
//!     .find_path(start_ref, end_ref, start, end, &filter)
//!     .unwrap()
//!     .expect("both triangles are connected");
//! assert_eq!(result.path.len(), 4);
//! ```

mod config;
mod connectivity;
mod context;
mod mesh_builder;
mod nav_mesh;
mod nav_mesh_query;
mod path_finder;
mod proximity_grid;
mod status;

#[cfg(test)]
mod test_mesh_helpers;

pub use config::{ConnectivityMode, NavMeshConfig, DEFAULT_CONNECTION_THRESHOLD};
pub use connectivity::{ConnectivityBuilder, ConnectivityStats, ConnectivityStrategy};
pub use context::{
    null_sink, LogCrateSink, LogEntry, LogLevel, LogSink, NullSink, RecordingSink, SharedSink,
};
pub use mesh_builder::NavMeshBuilder;
pub use nav_mesh::{NavMesh, PolyRef, Polygon};
pub use nav_mesh_query::{NavMeshQuery, PathResult, QueryFilter};
pub use path_finder::{PathFinder, UNIT_EDGE_COST};
pub use proximity_grid::ProximityGrid;
pub use status::PathStatus;

pub use navgraph_common::{Error, Result, TriangleSoup};
