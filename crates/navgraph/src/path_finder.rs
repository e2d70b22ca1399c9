//! A* search over the polygon adjacency graph
//!
//! Every traversed connection costs exactly [`UNIT_EDGE_COST`], while the
//! heuristic is the XZ distance between polygon centers. With uneven polygon
//! spacing the heuristic can overestimate, so the returned path is not
//! guaranteed to be the one with the fewest hops.
//!
//! The open list is a binary heap ordered by `f`, ties going to the polygon
//! that entered the open list first. That is the same choice a linear scan
//! for the first minimal element would make, so results are deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use navgraph_common::{planar_dist, Result};

use crate::context::{null_sink, LogLevel, SharedSink};
use crate::nav_mesh::{NavMesh, PolyRef};

/// Cost charged for moving between two connected polygons
pub const UNIT_EDGE_COST: f32 = 1.0;

/// State of a node in the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Node hasn't been reached yet
    New,
    /// Node is in the open list
    Open,
    /// Node has been expanded
    Closed,
}

/// Per-polygon search record
#[derive(Debug, Clone, Copy)]
struct Node {
    parent: Option<PolyRef>,
    g: f32,
    f: f32,
    /// Position in the sequence of polygons added to the open list
    opened: u32,
    state: NodeState,
}

impl Node {
    const UNVISITED: Node = Node {
        parent: None,
        g: f32::INFINITY,
        f: f32::INFINITY,
        opened: u32::MAX,
        state: NodeState::New,
    };
}

/// Open list entry; ordered so that `BinaryHeap` pops the lowest `f`
/// and, among equal `f`, the earliest opened polygon.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f32,
    opened: u32,
    poly: PolyRef,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.opened.cmp(&self.opened))
    }
}

/// A* search bound to one mesh; holds no state between calls
pub struct PathFinder<'a> {
    mesh: &'a NavMesh,
    sink: SharedSink,
}

impl<'a> PathFinder<'a> {
    /// Creates a path finder over `mesh`
    pub fn new(mesh: &'a NavMesh) -> Self {
        Self {
            mesh,
            sink: null_sink(),
        }
    }

    /// Replaces the log sink
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Heuristic estimate between two polygons
    fn heuristic(&self, from: PolyRef, to: PolyRef) -> f32 {
        let polys = self.mesh.polygons();
        planar_dist(polys[from.index()].center, polys[to.index()].center)
    }

    /// Finds a polygon corridor from `start` to `goal`.
    ///
    /// Returns `Ok(None)` when `goal` cannot be reached. The corridor starts
    /// with `start` and ends with `goal`; it is `[start]` when both are equal.
    pub fn find_path(&self, start: PolyRef, goal: PolyRef) -> Result<Option<Vec<PolyRef>>> {
        self.mesh.get_polygon(start)?;
        self.mesh.get_polygon(goal)?;

        let polys = self.mesh.polygons();
        let mut nodes = vec![Node::UNVISITED; polys.len()];
        let mut open = BinaryHeap::new();
        let mut open_count = 0u32;
        let mut expanded = 0usize;

        let start_f = self.heuristic(start, goal);
        nodes[start.index()] = Node {
            parent: None,
            g: 0.0,
            f: start_f,
            opened: open_count,
            state: NodeState::Open,
        };
        open.push(OpenEntry {
            f: start_f,
            opened: open_count,
            poly: start,
        });

        while let Some(entry) = open.pop() {
            let current = entry.poly;
            let node = &mut nodes[current.index()];

            // Superseded entry: the polygon was closed or re-queued with a lower f.
            if node.state == NodeState::Closed || entry.f > node.f {
                continue;
            }
            node.state = NodeState::Closed;
            let current_g = node.g;
            expanded += 1;

            if current == goal {
                self.sink.log(
                    LogLevel::Debug,
                    &format!("A* reached {} after expanding {} polygons", goal, expanded),
                );
                return Ok(Some(reconstruct(&nodes, goal)));
            }

            for &neighbour in &polys[current.index()].connections {
                let next = nodes[neighbour.index()];
                if next.state == NodeState::Closed {
                    continue;
                }

                let tentative_g = current_g + UNIT_EDGE_COST;
                let opened = match next.state {
                    NodeState::New => {
                        open_count += 1;
                        open_count
                    }
                    _ if tentative_g >= next.g => continue,
                    _ => next.opened,
                };

                let f = tentative_g + self.heuristic(neighbour, goal);
                nodes[neighbour.index()] = Node {
                    parent: Some(current),
                    g: tentative_g,
                    f,
                    opened,
                    state: NodeState::Open,
                };
                open.push(OpenEntry {
                    f,
                    opened,
                    poly: neighbour,
                });
            }
        }

        self.sink.log(
            LogLevel::Debug,
            &format!(
                "A* exhausted the open list after expanding {} polygons",
                expanded
            ),
        );
        Ok(None)
    }
}

fn reconstruct(nodes: &[Node], goal: PolyRef) -> Vec<PolyRef> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = nodes[current.index()].parent {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
