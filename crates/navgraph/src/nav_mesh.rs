//! Navigation mesh arena
//!
//! Polygons live in a single contiguous `Vec`; adjacency is stored as
//! [`PolyRef`] indices into that arena, so the graph has no reference cycles
//! and serializes as plain data.

use glam::Vec3;
use navgraph_common::{calc_bounds, triangle_centroid, Error, Result};

/// Reference to a polygon: its index in the owning [`NavMesh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PolyRef(u32);

impl PolyRef {
    /// Creates a reference from a raw id
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Arena index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for PolyRef {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PolyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A triangular walkable cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Polygon {
    /// Creation-order id, equal to the polygon's arena index
    pub id: PolyRef,
    /// Corner positions in input order
    pub vertices: [Vec3; 3],
    /// Mean of the three corners
    pub center: Vec3,
    /// Neighbouring polygons in ascending id order
    pub connections: Vec<PolyRef>,
}

impl Polygon {
    /// Creates an unconnected polygon and computes its center
    pub fn new(id: PolyRef, vertices: [Vec3; 3]) -> Self {
        Self {
            id,
            center: triangle_centroid(vertices[0], vertices[1], vertices[2]),
            vertices,
            connections: Vec::new(),
        }
    }

    /// Whether `other` is one of this polygon's neighbours
    pub fn is_connected_to(&self, other: PolyRef) -> bool {
        self.connections.binary_search(&other).is_ok()
    }
}

/// Polygon arena with its proximity adjacency.
///
/// A mesh starts in its build phase, where the connectivity builder may
/// rewrite connection lists. [`NavMesh::freeze`] ends that phase; queries can
/// only be bound to a frozen mesh.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NavMesh {
    polygons: Vec<Polygon>,
    #[cfg_attr(feature = "serialization", serde(skip))]
    frozen: bool,
}

impl NavMesh {
    pub(crate) fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            frozen: false,
        }
    }

    /// All polygons in id order
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Looks up a polygon
    pub fn polygon(&self, poly_ref: PolyRef) -> Option<&Polygon> {
        self.polygons.get(poly_ref.index())
    }

    /// Looks up a polygon, failing on references from another mesh
    pub fn get_polygon(&self, poly_ref: PolyRef) -> Result<&Polygon> {
        self.polygon(poly_ref)
            .ok_or(Error::InvalidPolyRef(poly_ref.id()))
    }

    /// Checks if a polygon reference belongs to this mesh
    pub fn is_valid_poly_ref(&self, poly_ref: PolyRef) -> bool {
        poly_ref.index() < self.polygons.len()
    }

    /// Polygon count
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the mesh has no polygons
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Total number of directed connections (each adjacent pair counts twice)
    pub fn connection_count(&self) -> usize {
        self.polygons.iter().map(|p| p.connections.len()).sum()
    }

    /// Axis-aligned bounds of all polygon corners
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        calc_bounds(self.polygons.iter().flat_map(|p| p.vertices))
    }

    /// Ends the build phase; connection lists become read-only
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the build phase has ended
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Mutable access for the connectivity pass
    pub(crate) fn polygons_mut(&mut self) -> Result<&mut [Polygon]> {
        if self.frozen {
            return Err(Error::MeshFrozen);
        }
        Ok(&mut self.polygons)
    }

    /// Checks the arena invariants: ids match indices, connections are in
    /// range, sorted, free of self-links and symmetric.
    pub fn validate(&self) -> Result<()> {
        for (index, poly) in self.polygons.iter().enumerate() {
            if poly.id.index() != index {
                return Err(Error::InvalidMesh(format!(
                    "polygon at index {index} carries id {}",
                    poly.id
                )));
            }

            if poly.connections.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::InvalidMesh(format!(
                    "connections of polygon {} are not strictly ascending",
                    poly.id
                )));
            }

            for &neighbour in &poly.connections {
                if neighbour == poly.id {
                    return Err(Error::InvalidMesh(format!(
                        "polygon {} is connected to itself",
                        poly.id
                    )));
                }
                let other = self
                    .polygon(neighbour)
                    .ok_or(Error::InvalidPolyRef(neighbour.id()))?;
                if !other.is_connected_to(poly.id) {
                    return Err(Error::InvalidMesh(format!(
                        "connection {} -> {} has no reverse link",
                        poly.id, neighbour
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serialization")]
impl NavMesh {
    /// Serializes the polygons and their adjacency as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parses a mesh written by [`NavMesh::to_json`].
    ///
    /// The loaded mesh is validated and returned frozen.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut mesh: NavMesh =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        mesh.validate()
            .map_err(|e| Error::Serialization(format!("loaded mesh is inconsistent: {e}")))?;
        mesh.freeze();
        Ok(mesh)
    }

    /// Saves the navigation mesh to a JSON file
    pub fn save_to_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Loads a navigation mesh from a JSON file
    pub fn load_from_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(offset: f32) -> [Vec3; 3] {
        [
            Vec3::new(offset, 0.0, 0.0),
            Vec3::new(offset + 3.0, 0.0, 0.0),
            Vec3::new(offset, 0.0, 3.0),
        ]
    }

    fn linked_pair() -> NavMesh {
        let mut a = Polygon::new(PolyRef::new(0), tri(0.0));
        let mut b = Polygon::new(PolyRef::new(1), tri(1.0));
        a.connections.push(b.id);
        b.connections.push(a.id);
        NavMesh::from_polygons(vec![a, b])
    }

    #[test]
    fn test_polygon_center() {
        let poly = Polygon::new(PolyRef::new(0), tri(0.0));
        assert_eq!(poly.center, Vec3::new(1.0, 0.0, 1.0));
        assert!(poly.connections.is_empty());
    }

    #[test]
    fn test_lookup() {
        let mesh = linked_pair();
        assert_eq!(mesh.len(), 2);
        assert!(mesh.is_valid_poly_ref(PolyRef::new(1)));
        assert!(!mesh.is_valid_poly_ref(PolyRef::new(2)));
        assert!(mesh.polygon(PolyRef::new(2)).is_none());
        assert!(matches!(
            mesh.get_polygon(PolyRef::new(7)),
            Err(Error::InvalidPolyRef(7))
        ));
        assert_eq!(mesh.connection_count(), 2);
    }

    #[test]
    fn test_poly_ref_conversions() {
        let poly_ref = PolyRef::from(7u32);
        assert_eq!(poly_ref, PolyRef::new(7));
        assert_eq!(poly_ref.id(), 7);
        assert_eq!(poly_ref.index(), 7);
        assert_eq!(poly_ref.to_string(), "#7");
    }

    #[test]
    fn test_bounds() {
        assert!(NavMesh::default().bounds().is_none());
        let (bmin, bmax) = linked_pair().bounds().unwrap();
        assert_eq!(bmin, Vec3::ZERO);
        assert_eq!(bmax, Vec3::new(4.0, 0.0, 3.0));
    }

    #[test]
    fn test_freeze_blocks_mutation() {
        let mut mesh = linked_pair();
        assert!(mesh.polygons_mut().is_ok());
        mesh.freeze();
        assert!(mesh.is_frozen());
        assert!(matches!(mesh.polygons_mut(), Err(Error::MeshFrozen)));
    }

    #[test]
    fn test_validate_detects_one_way_link() {
        let mut mesh = linked_pair();
        assert!(mesh.validate().is_ok());

        mesh.polygons_mut().unwrap()[1].connections.clear();
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_validate_detects_self_link() {
        let mut mesh = linked_pair();
        mesh.polygons_mut().unwrap()[0].connections = vec![PolyRef::new(0), PolyRef::new(1)];
        assert!(mesh.validate().is_err());
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_json_round_trip_freezes() -> Result<()> {
        let mesh = linked_pair();
        let loaded = NavMesh::from_json(&mesh.to_json()?)?;
        assert!(loaded.is_frozen());
        assert_eq!(loaded.polygons(), mesh.polygons());
        Ok(())
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_json_rejects_dangling_connection() {
        let json = r#"{"polygons":[{"id":0,"vertices":[[0,0,0],[1,0,0],[0,0,1]],"center":[0.3,0,0.3],"connections":[5]}]}"#;
        assert!(matches!(
            NavMesh::from_json(json),
            Err(Error::Serialization(_))
        ));
    }
}
