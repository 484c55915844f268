// Holder for the active navigation graph.
//
// `GraphRuntime` is an explicit handle owned by the host. It keeps at most
// one `SurfaceGraph`, replaced wholesale by `build()`, `load()`, or
// `set_nodes()`, and dropped by `delete()`. Pathfinding consumers read the
// graph through the accessors at the bottom of this file; nothing outside
// the runtime mutates it except through `move_node()`.
//
// ## Phases
//
//   Empty ──build──► Built ──save──► Saved
//     ▲                ▲  ◄─move──┘
//     │                └──move── Loaded ◄──load── (any)
//     └──delete── (any)
//
// Building is synchronous and never observable from outside. A successful
// `load()` ends in `Loaded`; a failed one leaves both the graph and the
// phase exactly as they were.
//
// ## Render segments
//
// The runtime caches one `EdgeSegment` per connection with both endpoint
// positions, which is what an editor overlay draws. Replacing the graph
// rebuilds the cache. `move_node()` only marks the node dirty; `resync()`
// then refreshes the segments touching dirty nodes and clears the set. A
// second `resync()` with nothing dirty does nothing, and so does a
// `resync()` with no graph.
//
// See also: `builder.rs` and `adjacency.rs` for what `build()` runs,
// `store.rs` for the file format behind `save()`/`load()`.

use crate::adjacency;
use crate::builder::{self, BuildReport};
use crate::config::{MAX_GRID_SIZE, ValidationParams, WaymarkConfig};
use crate::error::{ConfigError, StoreError};
use crate::nav::{NavNode, SurfaceGraph};
use crate::store;
use crate::surface::SurfaceQuery;
use crate::types::{NodeIndex, Vec3};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// Lifecycle phase of the held graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphPhase {
    /// No graph.
    #[default]
    Empty,
    /// Built (or installed, or edited) in memory, not yet written.
    Built,
    /// Written to disk and unchanged since.
    Saved,
    /// Read from disk and unchanged since.
    Loaded,
}

/// A connection as drawn by an overlay: both endpoints and their positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
    pub a: NodeIndex,
    pub b: NodeIndex,
    pub from: Vec3,
    pub to: Vec3,
}

/// Owns the active graph and its render cache.
#[derive(Debug, Default)]
pub struct GraphRuntime {
    graph: Option<SurfaceGraph>,
    phase: GraphPhase,
    segments: Vec<EdgeSegment>,
    dirty: BTreeSet<NodeIndex>,
}

impl GraphRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Sample, validate, and connect a fresh grid, then install it. A
    /// `grid_size` above `MAX_GRID_SIZE` is refused and the current graph
    /// is kept.
    pub fn build<S: SurfaceQuery + ?Sized>(
        &mut self,
        surface: &S,
        seed: Vec3,
        grid_size: u32,
        spacing: f32,
        params: &ValidationParams,
    ) -> Result<BuildReport, ConfigError> {
        if grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(grid_size));
        }
        let (mut graph, report) =
            builder::build_surface_graph(surface, seed, grid_size, spacing, params);
        let edges = adjacency::connect(&mut graph, grid_size);
        info!(
            nodes = graph.node_count(),
            active = graph.active_count(),
            edges,
            "graph built"
        );
        self.install(graph, GraphPhase::Built);
        Ok(report)
    }

    /// `build()` with the grid and thresholds taken from a config.
    pub fn build_with_config<S: SurfaceQuery + ?Sized>(
        &mut self,
        surface: &S,
        seed: Vec3,
        config: &WaymarkConfig,
    ) -> Result<BuildReport, ConfigError> {
        self.build(
            surface,
            seed,
            config.grid.grid_size,
            config.grid.spacing,
            &config.validation,
        )
    }

    /// Replace the held graph. Returns the previous one.
    pub fn set_nodes(&mut self, graph: SurfaceGraph) -> Option<SurfaceGraph> {
        self.install(graph, GraphPhase::Built)
    }

    /// Drop the held graph. Safe to call repeatedly.
    pub fn delete(&mut self) {
        self.graph = None;
        self.phase = GraphPhase::Empty;
        self.segments.clear();
        self.dirty.clear();
    }

    /// Write the held graph to `path`. With no graph, writes an empty file
    /// record list and stays `Empty`.
    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        match &self.graph {
            Some(graph) => {
                store::save(graph, path)?;
                self.phase = GraphPhase::Saved;
            }
            None => store::save(&SurfaceGraph::new(), path)?,
        }
        Ok(())
    }

    /// Replace the held graph with the one stored at `path`. On any error
    /// the current graph is kept.
    pub fn load(&mut self, path: &Path) -> Result<(), StoreError> {
        match store::load(path) {
            Ok(graph) => {
                self.install(graph, GraphPhase::Loaded);
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "graph load failed, keeping current graph");
                Err(e)
            }
        }
    }

    /// Move a present node. Edge weights are left alone; the node's render
    /// segments catch up on the next `resync()`. Returns `false` (and moves
    /// nothing) if the node is absent or `position` is not finite.
    pub fn move_node(&mut self, index: NodeIndex, position: Vec3) -> bool {
        if !position.is_finite() {
            return false;
        }
        let Some(node) = self.graph.as_mut().and_then(|g| g.node_mut(index)) else {
            return false;
        };
        node.position = position;
        self.dirty.insert(index);
        if matches!(self.phase, GraphPhase::Saved | GraphPhase::Loaded) {
            self.phase = GraphPhase::Built;
        }
        true
    }

    /// Refresh render segments for nodes moved since the last call. Returns
    /// the number of segments updated.
    pub fn resync(&mut self) -> usize {
        if self.dirty.is_empty() {
            return 0;
        }
        let dirty = std::mem::take(&mut self.dirty);
        let Some(graph) = &self.graph else {
            return 0;
        };

        let mut refreshed = 0;
        for segment in &mut self.segments {
            if !dirty.contains(&segment.a) && !dirty.contains(&segment.b) {
                continue;
            }
            if let (Some(a), Some(b)) = (graph.node(segment.a), graph.node(segment.b)) {
                segment.from = a.position;
                segment.to = b.position;
                refreshed += 1;
            }
        }
        refreshed
    }

    fn install(&mut self, graph: SurfaceGraph, phase: GraphPhase) -> Option<SurfaceGraph> {
        self.segments = segments_for(&graph);
        self.dirty.clear();
        self.phase = phase;
        self.graph.replace(graph)
    }

    // -----------------------------------------------------------------------
    // Consumer queries
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> GraphPhase {
        self.phase
    }

    pub fn graph(&self) -> Option<&SurfaceGraph> {
        self.graph.as_ref()
    }

    pub fn has_graph(&self) -> bool {
        self.graph.is_some()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&NavNode> {
        self.graph.as_ref().and_then(|g| g.node(index))
    }

    /// Present nodes in ascending index order. Empty with no graph.
    pub fn nodes(&self) -> impl Iterator<Item = &NavNode> {
        self.graph.iter().flat_map(|g| g.nodes())
    }

    pub fn nearest_active_node(&self, pos: Vec3) -> Option<NodeIndex> {
        self.graph
            .as_ref()
            .and_then(|g| g.find_nearest_active_node(pos))
    }

    /// Cached segments, one per connection, ascending by `(a, b)`.
    pub fn edge_segments(&self) -> &[EdgeSegment] {
        &self.segments
    }

    /// Nodes moved since the last `resync()`.
    pub fn dirty_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.dirty.iter().copied()
    }
}

fn segments_for(graph: &SurfaceGraph) -> Vec<EdgeSegment> {
    graph
        .edges()
        .into_iter()
        .filter_map(|edge| {
            let from = graph.node(edge.a)?.position;
            let to = graph.node(edge.b)?.position;
            Some(EdgeSegment {
                a: edge.a,
                b: edge.b,
                from,
                to,
            })
        })
        .collect()
}
