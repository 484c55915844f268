// Core types shared across the navigation crate.
//
// Defines the world-space vector (`Vec3`), the compact node identifier
// (`NodeIndex`), and the surface classification (`SurfaceTag`). All types
// derive `Serialize` and `Deserialize` so they can appear directly in the
// persisted graph file and in scene/config JSON.
//
// The coordinate system follows the host engine's conventions:
// - X: east  (positive) / west  (negative)
// - Y: up    (positive) / down  (negative)
// - Z: north (positive) / south (negative)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A point or direction in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction. Returns `None` for the zero
    /// vector (or anything too short to normalize reliably).
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len > f32::EPSILON {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// Unsigned angle between two directions, in degrees (0..=180).
    ///
    /// Returns 0 when either vector is degenerate, so a malformed normal
    /// never disqualifies a node on its own.
    pub fn angle_degrees(self, other: Self) -> f32 {
        let (Some(a), Some(b)) = (self.normalized(), other.normalized()) else {
            return 0.0;
        };
        a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Nav graph IDs (linear grid positions, not sequential counters)
// ---------------------------------------------------------------------------

/// Identifier of a graph node: its linear grid position `row * grid_size + col`.
///
/// Also the node's slot in `SurfaceGraph`. Never reassigned after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Index for grid cell `(row, col)` on a `grid_size`-wide grid.
    pub const fn from_cell(row: u32, col: u32, grid_size: u32) -> Self {
        Self(row * grid_size + col)
    }

    /// Slot position in the sparse node array.
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v_{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Surface classification
// ---------------------------------------------------------------------------

/// Classification of the surface a ray struck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceTag {
    /// Ordinary terrain. Nodes may stand on it.
    #[default]
    Ground,
    /// No-walk geometry. Disqualifies nodes built on it or next to it.
    Obstructed,
}
