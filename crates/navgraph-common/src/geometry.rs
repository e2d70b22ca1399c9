//! Planar geometry helpers
//!
//! All proximity decisions in the navigation graph are made on the XZ plane;
//! the Y (up) component is carried through untouched.

use glam::{Vec2, Vec3};

/// Projects a point onto the XZ plane
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Squared distance between two points on the XZ plane
#[inline]
pub fn planar_dist_sqr(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance_squared(planar(b))
}

/// Distance between two points on the XZ plane
#[inline]
pub fn planar_dist(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Arithmetic mean of three points
#[inline]
pub fn triangle_centroid(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (a + b + c) / 3.0
}

/// Calculates the axis-aligned bounds of a set of points.
///
/// Returns `None` for an empty iterator.
pub fn calc_bounds<I>(points: I) -> Option<(Vec3, Vec3)>
where
    I: IntoIterator<Item = Vec3>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(bmin, bmax), p| (bmin.min(p), bmax.max(p))))
}

/// Length of the polyline through the given points
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
