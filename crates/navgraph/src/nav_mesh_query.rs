//! Navigation mesh query implementation
//!
//! This module contains the NavMeshQuery structure, which finds the polygon
//! nearest to a point and turns polygon corridors into waypoint paths.

use glam::Vec3;
use navgraph_common::{planar_dist_sqr, polyline_length, Error, Result};

use crate::context::{null_sink, LogLevel, SharedSink};
use crate::nav_mesh::{NavMesh, PolyRef};
use crate::path_finder::PathFinder;
use crate::status::PathStatus;

/// Polygon inclusion and exclusion flags.
///
/// Accepted by every query for interface compatibility; no query consults
/// the flags yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    /// Flags a polygon must have one of to be included
    pub include_flags: u16,
    /// Flags that exclude a polygon
    pub exclude_flags: u16,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            include_flags: 0xffff,
            exclude_flags: 0,
        }
    }
}

impl QueryFilter {
    /// Creates a filter that includes everything
    pub fn new() -> Self {
        Self::default()
    }
}

/// Waypoints produced by [`NavMeshQuery::find_path`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PathResult {
    /// Start point, every corridor polygon center in order, end point
    pub path: Vec<Vec3>,
    /// Query status
    pub status: PathStatus,
    /// Polygon corridor the waypoints were taken from
    pub polys: Vec<PolyRef>,
}

impl PathResult {
    /// Length of the waypoint polyline
    pub fn length(&self) -> f32 {
        polyline_length(&self.path)
    }
}

/// Read-only queries over one frozen navigation mesh
pub struct NavMeshQuery<'a> {
    nav_mesh: &'a NavMesh,
    sink: SharedSink,
}

impl<'a> NavMeshQuery<'a> {
    /// Binds a query to `nav_mesh`, which must be frozen
    pub fn new(nav_mesh: &'a NavMesh) -> Result<Self> {
        if !nav_mesh.is_frozen() {
            return Err(Error::MeshNotFrozen);
        }
        Ok(Self {
            nav_mesh,
            sink: null_sink(),
        })
    }

    /// Replaces the log sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Gets a reference to the navigation mesh
    pub fn nav_mesh(&self) -> &NavMesh {
        self.nav_mesh
    }

    /// Center of a polygon
    pub fn get_poly_center(&self, poly_ref: PolyRef) -> Result<Vec3> {
        Ok(self.nav_mesh.get_polygon(poly_ref)?.center)
    }

    /// Finds the polygon whose center is nearest to `point` on the XZ plane.
    ///
    /// Distances are measured to polygon centers, not to polygon surfaces.
    /// On equal distances the lowest id wins. Returns `None` only for an
    /// empty mesh. `half_extents` and `filter` are accepted but not used.
    pub fn find_nearest_poly(
        &self,
        point: Vec3,
        half_extents: Vec3,
        filter: &QueryFilter,
    ) -> Option<PolyRef> {
        self.find_nearest_poly_with_distance(point, half_extents, filter)
            .map(|(poly_ref, _)| poly_ref)
    }

    /// Like [`NavMeshQuery::find_nearest_poly`], also returning the planar
    /// distance to the chosen center
    pub fn find_nearest_poly_with_distance(
        &self,
        point: Vec3,
        _half_extents: Vec3,
        _filter: &QueryFilter,
    ) -> Option<(PolyRef, f32)> {
        let mut nearest: Option<(PolyRef, f32)> = None;

        for poly in self.nav_mesh.polygons() {
            let d = planar_dist_sqr(point, poly.center);
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((poly.id, d));
            }
        }

        nearest.map(|(poly_ref, d)| (poly_ref, d.sqrt()))
    }

    /// Finds a path from `start_ref` to `end_ref`.
    ///
    /// Returns `Ok(None)` when the polygons are not connected. Otherwise the
    /// waypoints are `start_pos`, the center of every corridor polygon
    /// (both end polygons included) and `end_pos`.
    pub fn find_path(
        &self,
        start_ref: PolyRef,
        end_ref: PolyRef,
        start_pos: Vec3,
        end_pos: Vec3,
        _filter: &QueryFilter,
    ) -> Result<Option<PathResult>> {
        self.sink.log(
            LogLevel::Info,
            &format!("Finding path from {} to {}", start_ref, end_ref),
        );

        let corridor = PathFinder::new(self.nav_mesh)
            .with_sink(self.sink.clone())
            .find_path(start_ref, end_ref)?;

        let Some(polys) = corridor else {
            self.sink.log(
                LogLevel::Warning,
                &format!("No path found from {} to {}", start_ref, end_ref),
            );
            return Ok(None);
        };

        let mut path = Vec::with_capacity(polys.len() + 2);
        path.push(start_pos);
        for &poly_ref in &polys {
            path.push(self.get_poly_center(poly_ref)?);
        }
        path.push(end_pos);

        self.sink.log(
            LogLevel::Info,
            &format!(
                "Path found: {} polygons, {} waypoints",
                polys.len(),
                path.len()
            ),
        );

        Ok(Some(PathResult {
            path,
            status: PathStatus::Success,
            polys,
        }))
    }

    /// Snaps both points to their nearest polygons and finds a path between
    /// them. Returns `None` for an empty mesh or disconnected polygons.
    pub fn find_path_between_points(
        &self,
        start_pos: Vec3,
        end_pos: Vec3,
        filter: &QueryFilter,
    ) -> Result<Option<PathResult>> {
        let extents = Vec3::ZERO;
        let (Some(start_ref), Some(end_ref)) = (
            self.find_nearest_poly(start_pos, extents, filter),
            self.find_nearest_poly(end_pos, extents, filter),
        ) else {
            return Ok(None);
        };
        self.find_path(start_ref, end_ref, start_pos, end_pos, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RecordingSink;
    use crate::test_mesh_helpers::{connected_mesh, strip_soup, two_clusters_soup};
    use crate::NavMeshBuilder;

    #[test]
    fn test_requires_frozen_mesh() -> Result<()> {
        let soup = strip_soup(2, 1.0);
        let mut mesh = NavMeshBuilder::default().build_from_soup(&soup)?;
        assert!(matches!(NavMeshQuery::new(&mesh), Err(Error::MeshNotFrozen)));

        mesh.freeze();
        let query = NavMeshQuery::new(&mesh)?;
        assert!(std::ptr::eq(query.nav_mesh(), &mesh));
        assert_eq!(query.nav_mesh().len(), 2);
        Ok(())
    }

    #[test]
    fn test_default_filter() {
        let filter = QueryFilter::new();
        assert_eq!(filter.include_flags, 0xffff);
        assert_eq!(filter.exclude_flags, 0);
    }

    #[test]
    fn test_nearest_poly() -> Result<()> {
        let mesh = connected_mesh(&strip_soup(4, 1.0));
        let query = NavMeshQuery::new(&mesh)?;
        let filter = QueryFilter::default();

        // Centers sit at x = 1, 2, 3, 4 with z = 1.
        let nearest = query.find_nearest_poly(Vec3::new(3.2, 10.0, 1.4), Vec3::ONE, &filter);
        assert_eq!(nearest, Some(PolyRef::new(2)));

        // Exactly between two centers: lower id wins.
        let nearest = query.find_nearest_poly(Vec3::new(2.5, 0.0, 1.0), Vec3::ONE, &filter);
        assert_eq!(nearest, Some(PolyRef::new(1)));
        Ok(())
    }

    #[test]
    fn test_nearest_poly_at_center_is_exact() -> Result<()> {
        let mesh = connected_mesh(&strip_soup(4, 1.0));
        let query = NavMeshQuery::new(&mesh)?;
        let filter = QueryFilter::default();

        for poly in mesh.polygons() {
            for _ in 0..2 {
                let (found, distance) = query
                    .find_nearest_poly_with_distance(poly.center, Vec3::ZERO, &filter)
                    .unwrap();
                assert_eq!(found, poly.id);
                assert_eq!(distance, 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_path_waypoints() -> Result<()> {
        let mesh = connected_mesh(&strip_soup(3, 1.0));
        let query = NavMeshQuery::new(&mesh)?;
        let start = Vec3::new(0.5, 0.0, 1.0);
        let end = Vec3::new(3.5, 0.0, 1.0);

        let result = query
            .find_path(PolyRef::new(0), PolyRef::new(2), start, end, &QueryFilter::default())?
            .unwrap();

        assert_eq!(result.status, PathStatus::Success);
        assert_eq!(
            result.path,
            vec![
                start,
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(2.0, 0.0, 1.0),
                Vec3::new(3.0, 0.0, 1.0),
                end,
            ]
        );
        assert_eq!(result.polys.len(), 3);
        assert!((result.length() - 3.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_no_path_logs_warning() -> Result<()> {
        let mesh = connected_mesh(&two_clusters_soup());
        let sink = RecordingSink::shared();
        let query = NavMeshQuery::new(&mesh)?.with_sink(sink.clone());

        let result = query.find_path(
            PolyRef::new(0),
            PolyRef::new(4),
            Vec3::ZERO,
            Vec3::ZERO,
            &QueryFilter::default(),
        )?;
        assert!(result.is_none());

        let warnings = sink.entries_at(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "No path found from #0 to #4");
        Ok(())
    }

    #[test]
    fn test_invalid_ref_is_an_error() -> Result<()> {
        let mesh = connected_mesh(&strip_soup(2, 1.0));
        let query = NavMeshQuery::new(&mesh)?;
        let result = query.find_path(
            PolyRef::new(0),
            PolyRef::new(2),
            Vec3::ZERO,
            Vec3::ZERO,
            &QueryFilter::default(),
        );
        assert!(matches!(result, Err(Error::InvalidPolyRef(2))));
        Ok(())
    }

    #[test]
    fn test_path_between_points() -> Result<()> {
        let mesh = connected_mesh(&strip_soup(4, 1.0));
        let query = NavMeshQuery::new(&mesh)?;
        let start = Vec3::new(0.9, 0.0, 1.0);
        let end = Vec3::new(4.2, 0.0, 1.0);

        let result = query
            .find_path_between_points(start, end, &QueryFilter::default())?
            .unwrap();
        assert_eq!(result.polys.first(), Some(&PolyRef::new(0)));
        assert_eq!(result.polys.last(), Some(&PolyRef::new(3)));
        assert_eq!(result.path.first(), Some(&start));
        assert_eq!(result.path.last(), Some(&end));
        Ok(())
    }
}
