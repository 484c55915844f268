// Surface queries: the seam between graph construction and the host's
// physics world.
//
// The builder never looks at geometry directly. It asks a `SurfaceQuery`
// to cast rays: one downward ray per grid sample (surface projection), and
// four short horizontal probes per node (wall proximity). Hosts implement
// the trait over their own collision world; `scene.rs` provides a small
// analytic implementation used by the CLI, tests and benchmarks.
//
// See also: `validator.rs` for the probe rays, `builder.rs` for the
// projection ray.

use crate::types::{SurfaceTag, Vec3};

/// Result of a ray striking a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// World-space point where the ray struck.
    pub point: Vec3,
    /// Surface normal at `point`.
    pub normal: Vec3,
    /// Local up direction of the struck object. Slope is measured from
    /// this, not from world up, so tilted props measure against their own
    /// orientation.
    pub up: Vec3,
    pub tag: SurfaceTag,
    /// Distance along the ray from its origin to `point`.
    pub distance: f32,
}

/// Anything rays can be cast against.
pub trait SurfaceQuery {
    /// Cast a ray from `origin` along `direction` (need not be normalized)
    /// and return the nearest hit within `max_distance`, inclusive.
    ///
    /// Returns `None` when nothing is struck.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit>;

    /// Project a horizontal sample onto the surface directly below it.
    fn project_down(&self, origin: Vec3) -> Option<SurfaceHit> {
        self.cast_ray(origin, Vec3::DOWN, f32::INFINITY)
    }
}

impl<T: SurfaceQuery + ?Sized> SurfaceQuery for &T {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        (**self).cast_ray(origin, direction, max_distance)
    }
}

/// A surface with nothing in it. Every query misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySurface;

impl SurfaceQuery for EmptySurface {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<SurfaceHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Infinite floor at y = 0, hit only by downward rays.
    struct Floor;

    impl SurfaceQuery for Floor {
        fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
            if direction.y >= 0.0 || origin.y < 0.0 {
                return None;
            }
            let distance = origin.y;
            (distance <= max_distance).then(|| SurfaceHit {
                point: Vec3::new(origin.x, 0.0, origin.z),
                normal: Vec3::UP,
                up: Vec3::UP,
                tag: SurfaceTag::Ground,
                distance,
            })
        }
    }

    #[test]
    fn project_down_casts_unbounded() {
        let hit = Floor.project_down(Vec3::new(3.0, 1.0e6, 4.0)).unwrap();
        assert_eq!(hit.point, Vec3::new(3.0, 0.0, 4.0));
        assert_eq!(hit.distance, 1.0e6);
    }

    #[test]
    fn reference_forwards_queries() {
        fn hits(surface: impl SurfaceQuery) -> bool {
            surface.project_down(Vec3::new(0.0, 2.0, 0.0)).is_some()
        }
        let floor = Floor;
        assert!(hits(&floor));
        let as_dyn: &dyn SurfaceQuery = &floor;
        assert!(hits(as_dyn));
    }

    #[test]
    fn empty_surface_never_hits() {
        assert!(EmptySurface.project_down(Vec3::ZERO).is_none());
        assert!(EmptySurface.cast_ray(Vec3::ZERO, Vec3::RIGHT, 100.0).is_none());
    }
}
