// Navigation graph for surface-draped grids.
//
// The graph is a sparse arena: `SurfaceGraph.slots[i]` holds the node whose
// `index` is `i`, or `None` when the grid sample at that position found no
// surface. Slot position and node index are the same number, so lookups are
// O(1) and iteration order is deterministic (ascending index). No `HashMap`.
//
// Adjacency is stored on the nodes themselves: each `NavNode` carries an
// ordered list of `Neighbor { index, weight }`. There is no separate edge
// table. `edges()` derives unordered `Edge`s from the neighbor lists when a
// renderer (or a test) wants one entry per connection.
//
// A neighbor entry must always point at a present slot. `add_edge()`
// refuses pairs with an absent endpoint, and the loader in `store.rs`
// rejects files that break the rule, so every `SurfaceGraph` reachable
// through the public API is free of dangling references.
//
// See also: `builder.rs` which fills the slots, `adjacency.rs` which
// connects them, `store.rs` for persistence, `runtime.rs` which owns the
// active graph.

use crate::types::{NodeIndex, Vec3};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::collections::TryReserveError;

/// One entry of a node's neighbor list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: NodeIndex,
    /// Traversal cost of the connection.
    pub weight: f32,
}

/// A node in the navigation graph: a projected grid sample.
#[derive(Clone, Debug, PartialEq)]
pub struct NavNode {
    pub index: NodeIndex,
    /// `false` if the sample failed the tag, slope, or wall rule.
    pub active: bool,
    /// Projected surface point.
    pub position: Vec3,
    /// Grid builds connect at most 8 neighbors, so lists stay inline.
    pub neighbors: SmallVec<[Neighbor; 8]>,
}

impl NavNode {
    pub fn new(index: NodeIndex, position: Vec3, active: bool) -> Self {
        Self {
            index,
            active,
            position,
            neighbors: SmallVec::new(),
        }
    }

    /// Whether this node lists `other` as a neighbor.
    pub fn is_connected_to(&self, other: NodeIndex) -> bool {
        self.neighbors.iter().any(|n| n.index == other)
    }
}

/// An unordered connection between two nodes, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub weight: f32,
}

/// The navigation graph container: a sparse array of node slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceGraph {
    slots: Vec<Option<NavNode>>,
}

impl SurfaceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with `len` absent slots.
    pub fn with_slots(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Like `with_slots()`, but reports an allocation failure instead of
    /// aborting.
    pub fn try_with_slots(len: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(len)?;
        slots.resize(len, None);
        Ok(Self { slots })
    }

    /// Put a node into the slot named by its index, growing the slot array
    /// if needed. Returns the node previously in that slot.
    pub fn insert(&mut self, node: NavNode) -> Option<NavNode> {
        let slot = node.index.slot();
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot].replace(node)
    }

    /// Total number of slots, present or absent.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Raw slot view, absent slots included.
    pub fn slots(&self) -> &[Option<NavNode>] {
        &self.slots
    }

    pub fn node(&self, index: NodeIndex) -> Option<&NavNode> {
        self.slots.get(index.slot()).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut NavNode> {
        self.slots.get_mut(index.slot()).and_then(Option::as_mut)
    }

    pub fn contains(&self, index: NodeIndex) -> bool {
        self.node(index).is_some()
    }

    /// Present nodes in ascending index order.
    pub fn nodes(&self) -> impl Iterator<Item = &NavNode> {
        self.slots.iter().flatten()
    }

    /// Number of present nodes.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn active_count(&self) -> usize {
        self.nodes().filter(|n| n.active).count()
    }

    /// True when no slot holds a node.
    pub fn is_empty(&self) -> bool {
        self.nodes().next().is_none()
    }

    /// Connect two present nodes symmetrically. Returns `false` (and
    /// changes nothing) if either slot is absent or `a == b`.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: f32) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        if let Some(node) = self.node_mut(a) {
            node.neighbors.push(Neighbor { index: b, weight });
        }
        if let Some(node) = self.node_mut(b) {
            node.neighbors.push(Neighbor { index: a, weight });
        }
        true
    }

    /// One `Edge` per connected pair, in ascending `(a, b)` order. A pair
    /// listed by only one endpoint still yields an edge; the weight comes
    /// from the lower-indexed endpoint's entry when both list it.
    pub fn edges(&self) -> Vec<Edge> {
        let mut seen = BTreeSet::new();
        let mut edges = Vec::new();
        for node in self.nodes() {
            for n in &node.neighbors {
                let (a, b) = if node.index < n.index {
                    (node.index, n.index)
                } else {
                    (n.index, node.index)
                };
                if seen.insert((a, b)) {
                    edges.push(Edge {
                        a,
                        b,
                        weight: n.weight,
                    });
                }
            }
        }
        edges.sort_by_key(|e| (e.a, e.b));
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Every `(node, neighbor)` pair whose neighbor slot is absent. Empty
    /// for any well-formed graph.
    pub fn dangling_references(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.nodes()
            .flat_map(|node| {
                node.neighbors
                    .iter()
                    .filter(|n| !self.contains(n.index))
                    .map(move |n| (node.index, n.index))
            })
            .collect()
    }

    /// Find the nearest active node to a world position (Euclidean).
    /// Returns `None` if no node is active.
    pub fn find_nearest_active_node(&self, pos: Vec3) -> Option<NodeIndex> {
        self.nodes()
            .filter(|n| n.active)
            .min_by(|a, b| a.position.distance(pos).total_cmp(&b.position.distance(pos)))
            .map(|n| n.index)
    }
}
