// Data-driven graph configuration.
//
// All tunable parameters live in `WaymarkConfig`, loaded from JSON by the
// host (or built from `Default`). The builder never uses magic numbers: grid
// extent and spacing come from `GridParams`, walkability thresholds from
// `ValidationParams`. Defaults match the values the editor panel
// opened with (15×15 grid, 10-unit spacing, 30° slope, 5-unit wall bound).
//
// Every field has a serde default, so a partial JSON document such as
// `{"validation": {"max_slope": 45.0}}` is a valid config. Range checks
// happen in `validate()`, not during parsing, so hosts can report every
// problem with a field name attached.
//
// See also: `validator.rs` which reads `ValidationParams`, `builder.rs`
// which reads `GridParams`, `runtime.rs` which reads `graph_file`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Permitted range for `ValidationParams::max_slope`, in degrees.
pub const MAX_SLOPE_RANGE: (f32, f32) = (0.0, 90.0);

/// Permitted range for `ValidationParams::max_bound`, in world units.
pub const MAX_BOUND_RANGE: (f32, f32) = (0.0, 10.0);

/// Largest accepted `GridParams::grid_size`. Keeps every linear index
/// `row * grid_size + col` inside `u32`.
pub const MAX_GRID_SIZE: u32 = 65_535;

/// Default file name for saved graphs, relative to the working directory.
pub const DEFAULT_GRAPH_FILE: &str = "Graph";

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Extent and resolution of the sampling grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Samples per side. The graph has `grid_size²` slots.
    pub grid_size: u32,
    /// Horizontal distance between adjacent samples, in world units.
    pub spacing: f32,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            grid_size: 15,
            spacing: 10.0,
        }
    }
}

/// Walkability thresholds applied to every projected sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    /// Steepest walkable surface, in degrees from the surface's local up.
    /// A slope exactly equal to this is still walkable.
    pub max_slope: f32,
    /// Wall-probe depth and reach, in world units. Probes start this far
    /// below the surface point and extend this far horizontally.
    pub max_bound: f32,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            max_slope: 30.0,
            max_bound: 5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration. Loaded from JSON, never mutated during a build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaymarkConfig {
    pub grid: GridParams,
    pub validation: ValidationParams,
    /// Where `Save`/`Load` read and write when the caller gives no path.
    pub graph_file: String,
}

impl Default for WaymarkConfig {
    fn default() -> Self {
        Self {
            grid: GridParams::default(),
            validation: ValidationParams::default(),
            graph_file: DEFAULT_GRAPH_FILE.to_string(),
        }
    }
}

impl WaymarkConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WaymarkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check every numeric field against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_slope", self.validation.max_slope, MAX_SLOPE_RANGE)?;
        check_range("max_bound", self.validation.max_bound, MAX_BOUND_RANGE)?;
        if self.grid.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge(self.grid.grid_size));
        }
        if self.grid.spacing <= 0.0 || !self.grid.spacing.is_finite() {
            return Err(ConfigError::NonPositiveSpacing(self.grid.spacing));
        }
        Ok(())
    }

    /// The configured graph file, or the default name when left blank.
    pub fn graph_path(&self) -> &Path {
        if self.graph_file.is_empty() {
            Path::new(DEFAULT_GRAPH_FILE)
        } else {
            Path::new(&self.graph_file)
        }
    }
}

fn check_range(field: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), ConfigError> {
    // NaN fails `contains`, so it is rejected too.
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_editor_defaults() {
        let config = WaymarkConfig::default();
        assert_eq!(config.grid.grid_size, 15);
        assert_eq!(config.grid.spacing, 10.0);
        assert_eq!(config.validation.max_slope, 30.0);
        assert_eq!(config.validation.max_bound, 5.0);
        assert_eq!(config.graph_path(), Path::new("Graph"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_graph_file_uses_default_name() {
        let config = WaymarkConfig::from_json(r#"{"graph_file": ""}"#).unwrap();
        assert_eq!(config.graph_path(), Path::new(DEFAULT_GRAPH_FILE));
    }

    #[test]
    fn default_config_serializes() {
        let config = WaymarkConfig::default();
        let json = config.to_json_pretty().unwrap();
        let restored = WaymarkConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = WaymarkConfig::from_json(r#"{"validation": {"max_slope": 45.0}}"#).unwrap();
        assert_eq!(config.validation.max_slope, 45.0);
        assert_eq!(config.validation.max_bound, 5.0);
        assert_eq!(config.grid, GridParams::default());
    }

    #[test]
    fn config_loads_from_json_string() {
        let json = r#"{
            "grid": { "grid_size": 4, "spacing": 2.5 },
            "validation": { "max_slope": 12.0, "max_bound": 1.5 },
            "graph_file": "levels/forest.graph"
        }"#;
        let config = WaymarkConfig::from_json(json).unwrap();
        assert_eq!(config.grid.grid_size, 4);
        assert_eq!(config.grid.spacing, 2.5);
        assert_eq!(config.validation.max_bound, 1.5);
        assert_eq!(config.graph_path(), Path::new("levels/forest.graph"));
    }

    #[test]
    fn slope_above_ninety_is_rejected() {
        let mut config = WaymarkConfig::default();
        config.validation.max_slope = 91.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "max_slope", .. }));
    }

    #[test]
    fn range_endpoints_are_accepted() {
        let mut config = WaymarkConfig::default();
        config.validation.max_slope = 90.0;
        config.validation.max_bound = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nan_bound_is_rejected() {
        let mut config = WaymarkConfig::default();
        config.validation.max_bound = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "max_bound", .. })
        ));
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let mut config = WaymarkConfig::default();
        config.grid.spacing = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveSpacing(_))
        ));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let mut config = WaymarkConfig::default();
        config.grid.grid_size = MAX_GRID_SIZE + 1;
        assert!(matches!(config.validate(), Err(ConfigError::GridTooLarge(_))));
    }

    #[test]
    fn from_json_rejects_invalid_json() {
        assert!(matches!(
            WaymarkConfig::from_json("not valid json {{{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
