// Analytic surface scene: a headless stand-in for the host's collision world.
//
// A `SurfaceScene` is a flat list of `Primitive`s, each a shape plus the
// surface tag and local up direction a collider would carry:
//
// - `Shape::Patch`: a bounded plane. Its footprint is the rectangle
//   `center ± (half_x, half_z)` in X/Z; the plane through `center` with the
//   given `normal` may be tilted (ramps, hillsides) or face downward
//   (overhang undersides).
// - `Shape::Block`: an axis-aligned box, typically a wall, rock, or fence.
//
// `cast_ray()` tests every primitive and keeps the nearest hit, so probes
// see the first thing they run into, not the first thing in the list. Ties
// go to the earlier primitive. Rays that start inside a block do not hit
// that block (a probe origin buried in a wall sees out of it, matching
// typical physics-engine raycasts).
//
// Scenes are serde types, so the CLI can load them from JSON:
//
//   { "primitives": [
//       { "shape": { "Patch": { "center": {...}, "normal": {...},
//                               "half_x": 50.0, "half_z": 50.0 } } },
//       { "shape": { "Block": { "min": {...}, "max": {...} } },
//         "tag": "Obstructed" } ] }
//
// See also: `surface.rs` for the `SurfaceQuery` trait this implements.

use crate::surface::{SurfaceHit, SurfaceQuery};
use crate::types::{SurfaceTag, Vec3};
use serde::{Deserialize, Serialize};

/// Parallel-ray threshold for plane intersection.
const PARALLEL_EPSILON: f32 = 1.0e-6;

/// Geometry of a single primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Bounded plane with a rectangular X/Z footprint.
    Patch {
        center: Vec3,
        normal: Vec3,
        half_x: f32,
        half_z: f32,
    },
    /// Axis-aligned box.
    Block { min: Vec3, max: Vec3 },
}

/// A shape plus the collider metadata reported on hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    #[serde(default)]
    pub tag: SurfaceTag,
    #[serde(default = "default_up")]
    pub up: Vec3,
}

fn default_up() -> Vec3 {
    Vec3::UP
}

impl Primitive {
    /// A level ground patch centered at `center`, `half_extent` in X and Z.
    pub fn ground(center: Vec3, half_extent: f32) -> Self {
        Self::patch(center, Vec3::UP, half_extent, half_extent)
    }

    /// A (possibly tilted) ground patch.
    pub fn patch(center: Vec3, normal: Vec3, half_x: f32, half_z: f32) -> Self {
        Self {
            shape: Shape::Patch {
                center,
                normal,
                half_x,
                half_z,
            },
            tag: SurfaceTag::Ground,
            up: Vec3::UP,
        }
    }

    /// An axis-aligned box between two corners (in any order).
    pub fn block(a: Vec3, b: Vec3) -> Self {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        Self {
            shape: Shape::Block { min, max },
            tag: SurfaceTag::Ground,
            up: Vec3::UP,
        }
    }

    pub fn with_tag(mut self, tag: SurfaceTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Intersect a unit-direction ray with this primitive. Returns the
    /// distance and the surface normal at the hit.
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
        match &self.shape {
            Shape::Patch {
                center,
                normal,
                half_x,
                half_z,
            } => intersect_patch(origin, dir, *center, *normal, *half_x, *half_z),
            Shape::Block { min, max } => intersect_block(origin, dir, *min, *max),
        }
    }
}

fn intersect_patch(
    origin: Vec3,
    dir: Vec3,
    center: Vec3,
    normal: Vec3,
    half_x: f32,
    half_z: f32,
) -> Option<(f32, Vec3)> {
    let normal = normal.normalized()?;
    let denom = normal.dot(dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = normal.dot(center - origin) / denom;
    if t < 0.0 {
        return None;
    }
    let p = origin + dir * t;
    let inside = (p.x - center.x).abs() <= half_x && (p.z - center.z).abs() <= half_z;
    inside.then_some((t, normal))
}

/// Slab-method ray/box test. Tracks which axis the ray entered through so
/// the hit can report that face's normal.
fn intersect_block(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let o = [origin.x, origin.y, origin.z];
    let d = [dir.x, dir.y, dir.z];
    let lo = [min.x, min.y, min.z];
    let hi = [max.x, max.y, max.z];

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut entry_axis = None;

    for axis in 0..3 {
        if d[axis] == 0.0 {
            // Parallel to this slab: must already lie between its planes.
            if o[axis] < lo[axis] || o[axis] > hi[axis] {
                return None;
            }
            continue;
        }
        let t1 = (lo[axis] - o[axis]) / d[axis];
        let t2 = (hi[axis] - o[axis]) / d[axis];
        let (t_enter, t_exit) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        if t_enter > t_near {
            t_near = t_enter;
            entry_axis = Some(axis);
        }
        t_far = t_far.min(t_exit);
        if t_near > t_far {
            return None;
        }
    }

    // Origin inside the box (or box entirely behind the ray).
    if t_near < 0.0 {
        return None;
    }
    let axis = entry_axis?;
    let mut n = [0.0f32; 3];
    n[axis] = -d[axis].signum();
    Some((t_near, Vec3::new(n[0], n[1], n[2])))
}

/// A collection of primitives that rays can be cast against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceScene {
    pub primitives: Vec<Primitive>,
}

impl SurfaceScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive; chainable.
    pub fn with(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SurfaceQuery for SurfaceScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let dir = direction.normalized()?;
        let mut best: Option<SurfaceHit> = None;
        for primitive in &self.primitives {
            let Some((t, normal)) = primitive.intersect(origin, dir) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            if best.is_some_and(|b| b.distance <= t) {
                continue;
            }
            best = Some(SurfaceHit {
                point: origin + dir * t,
                normal,
                up: primitive.up,
                tag: primitive.tag,
                distance: t,
            });
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_ray_hits_flat_patch() {
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 10.0));
        let hit = scene.project_down(Vec3::new(2.0, 7.0, -3.0)).unwrap();
        assert_eq!(hit.point, Vec3::new(2.0, 0.0, -3.0));
        assert_eq!(hit.normal, Vec3::UP);
        assert_eq!(hit.tag, SurfaceTag::Ground);
        assert_eq!(hit.distance, 7.0);
    }

    #[test]
    fn ray_outside_patch_footprint_misses() {
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 1.0));
        assert!(scene.project_down(Vec3::new(1.5, 5.0, 0.0)).is_none());
        // Footprint edge is inclusive.
        assert!(scene.project_down(Vec3::new(1.0, 5.0, 0.0)).is_some());
    }

    #[test]
    fn patch_below_ray_origin_only() {
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::new(0.0, 10.0, 0.0), 5.0));
        // Patch is above the origin; a downward ray cannot see it.
        assert!(scene.project_down(Vec3::ZERO).is_none());
    }

    #[test]
    fn horizontal_ray_parallel_to_ground_misses() {
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 10.0));
        assert!(scene.cast_ray(Vec3::new(0.0, -1.0, 0.0), Vec3::RIGHT, 5.0).is_none());
    }

    #[test]
    fn nearest_primitive_wins() {
        let scene = SurfaceScene::new()
            .with(Primitive::ground(Vec3::ZERO, 10.0))
            .with(Primitive::ground(Vec3::new(0.0, 3.0, 0.0), 10.0).with_tag(SurfaceTag::Obstructed));
        let hit = scene.project_down(Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert_eq!(hit.point.y, 3.0);
        assert_eq!(hit.tag, SurfaceTag::Obstructed);
    }

    #[test]
    fn block_face_hit_reports_face_normal() {
        let scene = SurfaceScene::new().with(Primitive::block(
            Vec3::new(4.0, -10.0, -1.0),
            Vec3::new(6.0, 10.0, 1.0),
        ));
        let hit = scene.cast_ray(Vec3::ZERO, Vec3::RIGHT, 10.0).unwrap();
        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.normal, Vec3::LEFT);
        assert_eq!(hit.point, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn block_hit_at_exact_max_distance_counts() {
        let scene = SurfaceScene::new().with(Primitive::block(
            Vec3::new(5.0, -10.0, -1.0),
            Vec3::new(6.0, 10.0, 1.0),
        ));
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::RIGHT, 5.0).is_some());
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::RIGHT, 4.99).is_none());
    }

    #[test]
    fn block_behind_ray_misses() {
        let scene = SurfaceScene::new().with(Primitive::block(
            Vec3::new(-6.0, -1.0, -1.0),
            Vec3::new(-4.0, 1.0, 1.0),
        ));
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::RIGHT, 100.0).is_none());
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::LEFT, 100.0).is_some());
    }

    #[test]
    fn ray_starting_inside_block_does_not_hit_it() {
        let scene = SurfaceScene::new().with(Primitive::block(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ));
        assert!(scene.cast_ray(Vec3::ZERO, Vec3::FORWARD, 10.0).is_none());
    }

    #[test]
    fn block_top_is_projected_onto() {
        let scene = SurfaceScene::new()
            .with(Primitive::block(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0)));
        let hit = scene.project_down(Vec3::new(0.0, 10.0, 0.0)).unwrap();
        assert_eq!(hit.point.y, 2.0);
        assert_eq!(hit.normal, Vec3::UP);
    }

    #[test]
    fn primitive_up_is_reported() {
        let tilted_up = Vec3::new(0.0, 0.0, 1.0);
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 5.0).with_up(tilted_up));
        let hit = scene.project_down(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(hit.up, tilted_up);
    }

    #[test]
    fn zero_direction_misses() {
        let scene = SurfaceScene::new().with(Primitive::ground(Vec3::ZERO, 5.0));
        assert!(scene.cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 10.0).is_none());
    }

    #[test]
    fn scene_loads_from_json() {
        let json = r#"{
            "primitives": [
                { "shape": { "Patch": {
                    "center": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "normal": { "x": 0.0, "y": 1.0, "z": 0.0 },
                    "half_x": 20.0, "half_z": 20.0 } } },
                { "shape": { "Block": {
                    "min": { "x": 3.0, "y": -10.0, "z": -1.0 },
                    "max": { "x": 4.0, "y": 10.0, "z": 1.0 } } },
                  "tag": "Obstructed" }
            ]
        }"#;
        let scene = SurfaceScene::from_json(json).unwrap();
        assert_eq!(scene.primitives.len(), 2);
        assert_eq!(scene.primitives[0].tag, SurfaceTag::Ground);
        assert_eq!(scene.primitives[0].up, Vec3::UP);
        assert_eq!(scene.primitives[1].tag, SurfaceTag::Obstructed);
    }
}
