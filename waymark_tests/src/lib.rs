// Scene fixtures for the waymark integration tests.
//
// Every fixture is built from `SurfaceScene` primitives, so the tests drive
// the same raycast, validation, adjacency, and persistence code the CLI
// uses. Grids in the scenarios are seeded at `SEED` (10 units above the
// ground plane) with unit spacing unless a test says otherwise.
//
// See also: `tests/full_pipeline.rs` for the end-to-end scenarios and
// `tests/properties.rs` for the randomized structural checks.

use waymark_nav::config::ValidationParams;
use waymark_nav::runtime::GraphRuntime;
use waymark_nav::scene::{Primitive, SurfaceScene};
use waymark_nav::types::{SurfaceTag, Vec3};

/// Grid origin used by the scenarios.
pub const SEED: Vec3 = Vec3::new(0.0, 10.0, 0.0);

/// Default thresholds: 30° slope, 5-unit wall bound.
pub fn default_params() -> ValidationParams {
    ValidationParams::default()
}

/// Unbounded-enough flat ground at y = 0.
pub fn flat_scene() -> SurfaceScene {
    SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 1000.0))
}

/// Flat ground covering a unit-spaced 3×3 grid except cell (1, 1).
pub fn scene_with_center_hole() -> SurfaceScene {
    SurfaceScene::new()
        // Row 0 and row 2 strips.
        .with(Primitive::patch(Vec3::new(0.0, 0.0, 1.0), Vec3::UP, 0.5, 1.5))
        .with(Primitive::patch(Vec3::new(2.0, 0.0, 1.0), Vec3::UP, 0.5, 1.5))
        // Row 1, columns 0 and 2.
        .with(Primitive::patch(Vec3::new(1.0, 0.0, 0.0), Vec3::UP, 0.4, 0.4))
        .with(Primitive::patch(Vec3::new(1.0, 0.0, 2.0), Vec3::UP, 0.4, 0.4))
}

/// Flat ground with an obstructed wall whose near face is the plane
/// `x = wall_x`, tall and deep enough to catch every probe.
pub fn walled_scene(wall_x: f32) -> SurfaceScene {
    flat_scene().with(
        Primitive::block(
            Vec3::new(wall_x, -50.0, -50.0),
            Vec3::new(wall_x + 1.0, 50.0, 50.0),
        )
        .with_tag(SurfaceTag::Obstructed),
    )
}

/// A ramp rising along +X, tilted `degrees` from level, over flat ground
/// everywhere else.
pub fn ramp_scene(degrees: f32) -> SurfaceScene {
    let radians = degrees.to_radians();
    let normal = Vec3::new(-radians.sin(), radians.cos(), 0.0);
    SurfaceScene::new().with(Primitive::patch(
        Vec3::new(0.0, 0.0, 0.0),
        normal,
        100.0,
        100.0,
    ))
}

/// Build a unit-spaced grid over `scene` into a fresh runtime.
///
/// Panics if `grid_size` exceeds `MAX_GRID_SIZE`.
pub fn build_runtime(scene: &SurfaceScene, grid_size: u32) -> GraphRuntime {
    let mut runtime = GraphRuntime::new();
    if let Err(e) = runtime.build(scene, SEED, grid_size, 1.0, &default_params()) {
        panic!("fixture build failed: {e}");
    }
    runtime
}
