//! Geometry fixtures shared by the unit and scenario tests

use glam::Vec3;
use navgraph_common::TriangleSoup;

use crate::{NavMesh, NavMeshBuilder};

/// A right triangle whose centroid is exactly `(x, y, z)` for small
/// integral or half-integral coordinates
pub fn push_triangle_at(soup: &mut TriangleSoup, x: f32, y: f32, z: f32) {
    let a = soup.push_vertex(Vec3::new(x - 1.0, y, z - 1.0));
    let b = soup.push_vertex(Vec3::new(x + 2.0, y, z - 1.0));
    let c = soup.push_vertex(Vec3::new(x - 1.0, y, z + 2.0));
    soup.push_triangle(a, b, c);
}

/// One triangle per `(x, z)` center, on the ground plane
pub fn soup_from_centers(centers: &[(f32, f32)]) -> TriangleSoup {
    let mut soup = TriangleSoup::new();
    for &(x, z) in centers {
        push_triangle_at(&mut soup, x, 0.0, z);
    }
    soup
}

/// `count` triangles along +X with centers `spacing` apart, starting at (1, 0, 1)
pub fn strip_soup(count: usize, spacing: f32) -> TriangleSoup {
    let mut soup = TriangleSoup::new();
    for k in 0..count {
        let offset = k as f32 * spacing;
        let a = soup.push_vertex(Vec3::new(offset, 0.0, 0.0));
        let b = soup.push_vertex(Vec3::new(offset + 3.0, 0.0, 0.0));
        let c = soup.push_vertex(Vec3::new(offset, 0.0, 3.0));
        soup.push_triangle(a, b, c);
    }
    soup
}

/// Two strips of three triangles whose nearest centers are 5 units apart
pub fn two_clusters_soup() -> TriangleSoup {
    soup_from_centers(&[
        (1.0, 1.0),
        (2.0, 1.0),
        (3.0, 1.0),
        (8.0, 1.0),
        (9.0, 1.0),
        (10.0, 1.0),
    ])
}

/// Small triangles at pseudo-random positions in a 20x20 area
pub fn scattered_soup(count: usize, seed: u32) -> TriangleSoup {
    let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
    let mut next = move || {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        (state >> 8) as f32 / (1u32 << 24) as f32
    };

    let mut soup = TriangleSoup::new();
    for _ in 0..count {
        let center = Vec3::new(next() * 20.0, next() * 2.0, next() * 20.0);
        let a = soup.push_vertex(center + Vec3::new(-0.2, 0.0, -0.2));
        let b = soup.push_vertex(center + Vec3::new(0.4, 0.0, -0.2));
        let c = soup.push_vertex(center + Vec3::new(-0.2, 0.0, 0.4));
        soup.push_triangle(a, b, c);
    }
    soup
}

/// Builds, connects with the default threshold and freezes
pub fn connected_mesh(soup: &TriangleSoup) -> NavMesh {
    let (mesh, _) = NavMeshBuilder::default()
        .build_connected(&soup.vertices, &soup.indices)
        .expect("fixture geometry is well formed");
    mesh
}
