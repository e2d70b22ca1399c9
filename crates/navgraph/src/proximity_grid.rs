//! Uniform XZ bucket grid over polygon centers
//!
//! Used by the connectivity pass on larger meshes: with the cell size equal
//! to the connection threshold, any two centers closer than the threshold lie
//! in the same or in adjacent cells, so only the 3x3 block around a cell has
//! to be compared instead of every polygon.

use std::collections::HashMap;

use glam::Vec3;

use crate::nav_mesh::PolyRef;

/// Grid cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GridCoord {
    x: i32,
    z: i32,
}

impl GridCoord {
    /// Converts world position to grid coordinates
    fn from_world_pos(pos: Vec3, inv_cell_size: f32) -> Self {
        Self {
            x: (pos.x * inv_cell_size).floor() as i32,
            z: (pos.z * inv_cell_size).floor() as i32,
        }
    }

    /// The 9 cells around and including this one
    fn neighbourhood(self) -> impl Iterator<Item = GridCoord> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dz| GridCoord {
                x: self.x.saturating_add(dx),
                z: self.z.saturating_add(dz),
            })
        })
    }
}

/// Spatial hash of polygon centers
#[derive(Debug)]
pub struct ProximityGrid {
    cells: HashMap<GridCoord, Vec<PolyRef>>,
    inv_cell_size: f32,
    item_count: usize,
}

impl ProximityGrid {
    /// Creates an empty grid. `cell_size` must be positive.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cells: HashMap::new(),
            inv_cell_size: 1.0 / cell_size,
            item_count: 0,
        }
    }

    /// Builds a grid holding every `(ref, center)` pair
    pub fn from_centers<I>(cell_size: f32, centers: I) -> Self
    where
        I: IntoIterator<Item = (PolyRef, Vec3)>,
    {
        let mut grid = Self::new(cell_size);
        for (poly_ref, center) in centers {
            grid.insert(poly_ref, center);
        }
        grid
    }

    /// Adds a polygon center
    pub fn insert(&mut self, poly_ref: PolyRef, center: Vec3) {
        let coord = GridCoord::from_world_pos(center, self.inv_cell_size);
        self.cells.entry(coord).or_default().push(poly_ref);
        self.item_count += 1;
    }

    /// Polygons stored in the cell containing `pos` and its 8 neighbours.
    ///
    /// The result is a superset of everything within one cell size of `pos`
    /// on the XZ plane, in no particular order.
    pub fn query_neighbourhood(&self, pos: Vec3) -> impl Iterator<Item = PolyRef> + '_ {
        GridCoord::from_world_pos(pos, self.inv_cell_size)
            .neighbourhood()
            .filter_map(|coord| self.cells.get(&coord))
            .flat_map(|refs| refs.iter().copied())
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of stored centers
    pub fn len(&self) -> usize {
        self.item_count
    }

    /// Whether the grid holds nothing
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}
