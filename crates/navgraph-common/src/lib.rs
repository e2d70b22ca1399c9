//! Common utilities and data structures shared by the navgraph crates

mod geometry;
mod mesh;

pub use geometry::*;
pub use mesh::*;

/// Represents a 3D position
pub type Vec3 = glam::Vec3;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid input mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("polygon reference {0} is not part of the navigation mesh")]
    InvalidPolyRef(u32),

    #[error("navigation mesh is frozen; connectivity can no longer be changed")]
    MeshFrozen,

    #[error("navigation mesh is still being built; freeze it before querying")]
    MeshNotFrozen,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for navgraph operations
pub type Result<T> = std::result::Result<T, Error>;
