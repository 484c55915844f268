// waymark_nav — surface-draped navigation graphs.
//
// This crate builds a navigation graph by sampling a regular grid above a
// scene, dropping each sample straight down onto the first surface it hits,
// and connecting neighboring samples. Each node records whether it is
// walkable (surface tag, slope, and nearby walls). The graph can be saved
// to and reloaded from a JSON file, and is held at runtime by an explicit
// `GraphRuntime` handle that pathfinding consumers read from.
//
// Module overview:
// - `types.rs`:     Vec3, NodeIndex, SurfaceTag.
// - `config.rs`:    WaymarkConfig: grid extent, walkability thresholds, graph file name.
// - `error.rs`:     StoreError, DeserializationError, ConfigError.
// - `surface.rs`:   SurfaceQuery trait, the raycast seam between this crate and the host's physics.
// - `scene.rs`:     SurfaceScene, an analytic SurfaceQuery of patches and blocks.
// - `validator.rs`: Tag, slope, and wall-proximity rules producing a Verdict.
// - `builder.rs`:   Grid sampling and downward projection into a sparse node array.
// - `adjacency.rs`: Axis and diagonal edge synthesis with Euclidean weights.
// - `nav.rs`:       SurfaceGraph arena, NavNode, neighbor lists.
// - `store.rs`:     Record format and two-phase loading.
// - `runtime.rs`:   GraphRuntime: build/delete/save/load/resync and consumer queries.
//
// Everything is single-threaded and deterministic: the same scene, seed, and
// parameters always produce the same graph. No `HashMap`; ordered
// collections only.

pub mod adjacency;
pub mod builder;
pub mod config;
pub mod error;
pub mod nav;
pub mod runtime;
pub mod scene;
pub mod store;
pub mod surface;
pub mod types;
pub mod validator;
