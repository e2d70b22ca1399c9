//! Raw triangle geometry and a minimal Wavefront OBJ reader

use crate::{Error, Result};
use glam::Vec3;

use std::path::Path;

/// Flat vertex and index buffers describing a triangle soup.
///
/// `vertices` holds 3 floats per point and `indices` holds 3 vertex indices
/// per triangle, which is the layout the mesh builder consumes directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    /// Flat `[x, y, z]` coordinates
    pub vertices: Vec<f32>,
    /// Vertex indices, 3 per triangle
    pub indices: Vec<i32>,
}

impl TriangleSoup {
    /// Creates an empty soup
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points in the vertex buffer
    pub fn vert_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of complete triangles in the index buffer
    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends a point and returns its index
    pub fn push_vertex(&mut self, v: Vec3) -> i32 {
        let idx = self.vert_count() as i32;
        self.vertices.extend_from_slice(&[v.x, v.y, v.z]);
        idx
    }

    /// Appends a triangle
    pub fn push_triangle(&mut self, a: i32, b: i32, c: i32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Loads geometry from an OBJ file on disk
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_obj_str(&content)
    }

    /// Parses OBJ content from a string.
    ///
    /// Only `v` and `f` records are read. Faces with more than three corners
    /// are fan-triangulated, and negative (relative) face indices are resolved
    /// against the vertices seen so far.
    ///
    /// # Example
    ///
    /// ```
    /// use navgraph_common::TriangleSoup;
    ///
    /// let obj = r#"
    /// v 0.0 0.0 0.0
    /// v 1.0 0.0 0.0
    /// v 0.0 0.0 1.0
    /// f 1 2 3
    /// "#;
    ///
    /// let soup = TriangleSoup::from_obj_str(obj).unwrap();
    /// assert_eq!(soup.vert_count(), 3);
    /// assert_eq!(soup.tri_count(), 1);
    /// ```
    pub fn from_obj_str(content: &str) -> Result<Self> {
        let mut soup = Self::new();

        for (line_no, line) in content.lines().enumerate() {
            soup.parse_obj_line(line, line_no + 1)?;
        }

        Ok(soup)
    }

    fn parse_obj_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coord = |axis: &str| -> Result<f32> {
                    let token = tokens.next().ok_or_else(|| {
                        Error::InvalidMesh(format!("line {line_no}: vertex is missing {axis}"))
                    })?;
                    token.parse::<f32>().map_err(|_| {
                        Error::InvalidMesh(format!(
                            "line {line_no}: vertex {axis} '{token}' is not a number"
                        ))
                    })
                };
                let v = Vec3::new(coord("x")?, coord("y")?, coord("z")?);
                self.push_vertex(v);
            }
            Some("f") => {
                let corners = tokens
                    .map(|token| self.resolve_face_index(token, line_no))
                    .collect::<Result<Vec<_>>>()?;

                if corners.len() < 3 {
                    return Err(Error::InvalidMesh(format!(
                        "line {line_no}: face has fewer than 3 vertices"
                    )));
                }

                for i in 1..corners.len() - 1 {
                    self.push_triangle(corners[0], corners[i], corners[i + 1]);
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Turns a `v`, `v/vt` or `v/vt/vn` token into a zero-based vertex index
    fn resolve_face_index(&self, token: &str, line_no: usize) -> Result<i32> {
        let raw = token
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::InvalidMesh(format!("line {line_no}: empty face index")))?;

        let index = raw.parse::<i32>().map_err(|_| {
            Error::InvalidMesh(format!(
                "line {line_no}: face index '{raw}' is not a number"
            ))
        })?;

        match index {
            0 => Err(Error::InvalidMesh(format!(
                "line {line_no}: OBJ face indices are 1-based"
            ))),
            i if i > 0 => Ok(i - 1),
            i => Ok(self.vert_count() as i32 + i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangle() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 0.0 1.0
f 1 2 3
"#;
        let soup = TriangleSoup::from_obj_str(obj).unwrap();
        assert_eq!(soup.vert_count(), 3);
        assert_eq!(soup.tri_count(), 1);
        assert_eq!(soup.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 0.0 1.0
v 0.0 0.0 1.0
f 1 2 3 4
"#;
        let soup = TriangleSoup::from_obj_str(obj).unwrap();
        assert_eq!(soup.tri_count(), 2);
        assert_eq!(soup.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_slash_formats_and_comments() {
        let obj = r#"
# exported
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 0.0 1.0
vt 0.0 0.0
vn 0.0 1.0 0.0
f 1/1/1 2//1 3/1
"#;
        let soup = TriangleSoup::from_obj_str(obj).unwrap();
        assert_eq!(soup.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_relative_indices() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 0.0 1.0
f -3 -2 -1
"#;
        let soup = TriangleSoup::from_obj_str(obj).unwrap();
        assert_eq!(soup.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_malformed_records() {
        assert!(TriangleSoup::from_obj_str("v 0.0 0.0").is_err());
        assert!(TriangleSoup::from_obj_str("v 0.0 zero 0.0").is_err());
        assert!(TriangleSoup::from_obj_str("v 0 0 0\nv 1 0 0\nf 1 2").is_err());
        assert!(TriangleSoup::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 0 1\nf 0 1 2").is_err());
    }

    #[test]
    fn test_push_helpers() {
        let mut soup = TriangleSoup::new();
        let a = soup.push_vertex(Vec3::ZERO);
        let b = soup.push_vertex(Vec3::X);
        let c = soup.push_vertex(Vec3::Z);
        soup.push_triangle(a, b, c);
        assert_eq!(soup.vertices.len(), 9);
        assert_eq!(soup.indices, vec![0, 1, 2]);
    }
}
