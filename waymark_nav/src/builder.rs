// Grid sampling and surface projection.
//
// `build_surface_graph()` walks a `grid_size × grid_size` lattice anchored at
// the seed position. Cell `(i, j)` samples at `seed + (i * spacing, 0,
// j * spacing)`, casts straight down through the `SurfaceQuery`, and on a
// hit creates node `i * grid_size + j` at the struck point. The node's
// `active` flag comes from `validator::evaluate()`.
//
// A miss leaves the slot empty. That is the normal way a grid hangs over
// the edge of the terrain, not an error, and everything downstream
// (adjacency, persistence, the runtime) treats absent slots as routine.
//
// Building has no side effects beyond the returned graph: the caller
// decides whether to connect it, install it in a `GraphRuntime`, or drop
// it. Neighbor lists are left empty; `adjacency.rs` fills them.
//
// Callers passing untrusted sizes should validate them first
// (`WaymarkConfig::validate()` caps `grid_size` so indices fit in `u32`).

use crate::config::ValidationParams;
use crate::nav::{NavNode, SurfaceGraph};
use crate::surface::SurfaceQuery;
use crate::types::{NodeIndex, Vec3};
use crate::validator::{self, Verdict};
use tracing::{debug, info};

/// Per-verdict tallies for one build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// `grid_size²`.
    pub slots: usize,
    /// Samples whose downward cast found no surface.
    pub missing: usize,
    pub active: usize,
    pub obstructed: usize,
    pub too_steep: usize,
    pub near_wall: usize,
}

impl BuildReport {
    /// Number of present nodes, active or not.
    pub fn present(&self) -> usize {
        self.slots - self.missing
    }

    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Active => self.active += 1,
            Verdict::Obstructed => self.obstructed += 1,
            Verdict::TooSteep { .. } => self.too_steep += 1,
            Verdict::NearWall { .. } => self.near_wall += 1,
        }
    }
}

/// World-space sample position for grid cell `(i, j)`.
pub fn sample_position(seed: Vec3, i: u32, j: u32, spacing: f32) -> Vec3 {
    seed + Vec3::new(i as f32 * spacing, 0.0, j as f32 * spacing)
}

/// Sample, project, and validate a grid. Returns the sparse node array
/// (length `grid_size²`) with empty neighbor lists, plus the verdict tallies.
///
/// `grid_size` must not exceed `MAX_GRID_SIZE`, or node indices overflow
/// `u32`. `GraphRuntime::build()` enforces this.
pub fn build_surface_graph<S: SurfaceQuery + ?Sized>(
    surface: &S,
    seed: Vec3,
    grid_size: u32,
    spacing: f32,
    params: &ValidationParams,
) -> (SurfaceGraph, BuildReport) {
    let slots = grid_size as usize * grid_size as usize;
    let mut graph = SurfaceGraph::with_slots(slots);
    let mut report = BuildReport {
        slots,
        ..BuildReport::default()
    };

    for i in 0..grid_size {
        for j in 0..grid_size {
            let index = NodeIndex::from_cell(i, j, grid_size);
            let sample = sample_position(seed, i, j, spacing);
            let Some(hit) = surface.project_down(sample) else {
                report.missing += 1;
                continue;
            };

            let verdict = validator::evaluate(&hit, surface, params);
            if !verdict.is_active() {
                debug!(node = %index, position = %hit.point, ?verdict, "node rejected");
            }
            report.record(verdict);
            graph.insert(NavNode::new(index, hit.point, verdict.is_active()));
        }
    }

    info!(
        grid_size,
        present = report.present(),
        active = report.active,
        missing = report.missing,
        "surface graph sampled"
    );
    (graph, report)
}
