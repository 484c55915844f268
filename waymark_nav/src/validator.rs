// Node walkability rules.
//
// Every projected sample is judged by three independent rules, checked in
// this order:
//
// 1. **Tag**: a sample that landed on `Obstructed` geometry is unwalkable.
// 2. **Slope**: the angle between the struck object's local up and the
//    surface normal, folded into 0..=90 so an upside-down normal measures
//    the same as its flipped twin, must not exceed `max_slope`. Equal is
//    walkable.
// 3. **Wall proximity**: four horizontal probes (+Z, -Z, +X, -X), each
//    `max_bound` long, start `max_bound` below the surface point. If any
//    probe's nearest hit is `Obstructed` the sample is unwalkable. A hit at
//    exactly `max_bound` counts.
//
// The verdict records the first failing rule for logging and build
// reports; the graph itself only stores `active = verdict.is_active()`.
// Nothing here is soft or partial: a failed rule disables the node for the
// whole build.
//
// See also: `builder.rs` which calls `evaluate()` once per present slot,
// `surface.rs` for the probe rays.

use crate::config::ValidationParams;
use crate::surface::{SurfaceHit, SurfaceQuery};
use crate::types::{SurfaceTag, Vec3};

/// Horizontal probe directions, in the order they are cast.
pub const PROBE_DIRECTIONS: [Vec3; 4] = [Vec3::FORWARD, Vec3::BACK, Vec3::RIGHT, Vec3::LEFT];

/// Outcome of validating one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Active,
    /// Landed on `Obstructed` geometry.
    Obstructed,
    /// Folded slope, in degrees, exceeded the limit.
    TooSteep { slope: f32 },
    /// A probe struck `Obstructed` geometry this far from the probe origin.
    NearWall { distance: f32 },
}

impl Verdict {
    pub fn is_active(self) -> bool {
        matches!(self, Verdict::Active)
    }
}

/// Slope of a surface in degrees, measured from the object's local up and
/// folded into `0..=90`.
pub fn slope_degrees(up: Vec3, normal: Vec3) -> f32 {
    let slope = up.angle_degrees(normal);
    if slope > 90.0 { 180.0 - slope } else { slope }
}

/// Evaluate all rules against a projected sample.
pub fn evaluate<S: SurfaceQuery + ?Sized>(
    hit: &SurfaceHit,
    surface: &S,
    params: &ValidationParams,
) -> Verdict {
    if hit.tag == SurfaceTag::Obstructed {
        return Verdict::Obstructed;
    }

    let slope = slope_degrees(hit.up, hit.normal);
    if slope > params.max_slope {
        return Verdict::TooSteep { slope };
    }

    if let Some(distance) = nearest_wall(hit.point, surface, params.max_bound) {
        return Verdict::NearWall { distance };
    }

    Verdict::Active
}

/// Cast the four wall probes below `point`. Returns the distance of the
/// first probe whose nearest hit is obstructed.
fn nearest_wall<S: SurfaceQuery + ?Sized>(point: Vec3, surface: &S, max_bound: f32) -> Option<f32> {
    let origin = point + Vec3::new(0.0, -max_bound, 0.0);
    PROBE_DIRECTIONS.iter().find_map(|&dir| {
        surface
            .cast_ray(origin, dir, max_bound)
            .filter(|h| h.tag == SurfaceTag::Obstructed)
            .map(|h| h.distance)
    })
}
