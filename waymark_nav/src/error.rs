// Error types for configuration loading and graph persistence.
//
// Build never fails: a surface miss is an absent slot, not an error. The
// only fallible operations are loading/validating a `WaymarkConfig` and
// saving/loading a graph file. Loading distinguishes I/O failures (missing
// file, permissions) from structurally bad content, which is always fatal.
//
// See also: `store.rs` for the two-phase loader that raises
// `DeserializationError`, `config.rs` for `WaymarkConfig::validate()`.

use crate::types::NodeIndex;
use thiserror::Error;

/// Errors raised while saving or loading a graph file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file operations (missing file, permissions, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory graph could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The stored content is malformed or structurally inconsistent.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] DeserializationError),

    /// A position or weight is NaN or infinite and cannot be written.
    #[error("node {node} has a non-finite position or edge weight")]
    NonFinite { node: NodeIndex },
}

/// Structural problems found while reconstructing a graph from records.
#[derive(Debug, Error)]
pub enum DeserializationError {
    /// The content does not match the record shape.
    #[error("malformed graph records: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A `connected` entry references an index absent from the file.
    #[error("node {node} references missing neighbor {neighbor}")]
    DanglingNeighbor { node: NodeIndex, neighbor: NodeIndex },

    /// Two records claim the same index.
    #[error("duplicate node index {0}")]
    DuplicateIndex(NodeIndex),

    /// A stored index lies beyond any grid this crate builds, or the slot
    /// array it implies cannot be allocated.
    #[error("node index {0} is out of range")]
    IndexOutOfRange(NodeIndex),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric field lies outside its permitted range.
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("grid_size {0} is too large")]
    GridTooLarge(u32),

    /// Grid spacing must be strictly positive.
    #[error("spacing must be positive, got {0}")]
    NonPositiveSpacing(f32),
}

impl StoreError {
    /// Returns true if the failure came from the file's content rather than
    /// from the filesystem.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization(_))
    }
}
