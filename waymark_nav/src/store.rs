// Graph persistence: record format and two-phase loading.
//
// On disk a graph is a JSON array of node records, one per *present* node
// in ascending index order. Absent slots are simply not written, so the file
// has no notion of gaps:
//
//   [ { "index": 0, "status": true,
//       "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
//       "connected": [ { "index": 1, "value": 1.0 }, ... ] },
//     ... ]
//
// `status` is the node's `active` flag and `connected` its neighbor list,
// each entry naming another record's `index` and the edge weight (`value`).
// There is no version field and no header.
//
// Loading is two-phase because a `connected` entry may name a record that
// appears later in the file:
//
// 1. Create every node with an empty neighbor list, placing it in the slot
//    named by its stored index. The slot array is the index → node mapping.
//    A second record with the same index is rejected.
// 2. Walk the records again and resolve each `connected` index through the
//    slots, appending `(index, weight)` to the owning node in file order.
//    An index with no slot is a dangling reference and aborts the load.
//
// Nothing is returned until both phases succeed, so a failed load never
// leaves a half-built graph behind. The caller (`runtime.rs`) only swaps the
// result in on success. Stored indices are capped at `MAX_GRID_SIZE²` and
// the slot array is reserved fallibly, so an absurd index fails the load
// instead of the process.
//
// JSON has no spelling for NaN or infinity, so saving refuses a graph with
// a non-finite position or weight rather than writing `null`s that could
// never be read back. `save()` encodes fully before touching the file, so a
// refused save leaves the previous file intact.

use crate::config::MAX_GRID_SIZE;
use crate::error::{DeserializationError, StoreError};
use crate::nav::{NavNode, Neighbor, SurfaceGraph};
use crate::types::{NodeIndex, Vec3};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;

/// Largest index a loaded record may carry: the last slot of the largest
/// grid `WaymarkConfig::validate()` accepts.
pub const MAX_STORED_INDEX: u64 = MAX_GRID_SIZE as u64 * MAX_GRID_SIZE as u64 - 1;

/// One neighbor entry of a persisted node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectedRecord {
    pub index: NodeIndex,
    pub value: f32,
}

/// One persisted node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub index: NodeIndex,
    pub status: bool,
    pub position: Vec3,
    pub connected: Vec<ConnectedRecord>,
}

/// Flatten a graph into records, skipping absent slots.
pub fn to_records(graph: &SurfaceGraph) -> Vec<NodeRecord> {
    graph
        .nodes()
        .map(|node| NodeRecord {
            index: node.index,
            status: node.active,
            position: node.position,
            connected: node
                .neighbors
                .iter()
                .map(|n| ConnectedRecord {
                    index: n.index,
                    value: n.weight,
                })
                .collect(),
        })
        .collect()
}

/// Rebuild a graph from records, resolving neighbor references in a second
/// pass.
pub fn from_records(records: &[NodeRecord]) -> Result<SurfaceGraph, DeserializationError> {
    let Some(highest) = records.iter().map(|r| r.index).max() else {
        return Ok(SurfaceGraph::new());
    };
    if u64::from(highest.0) > MAX_STORED_INDEX {
        return Err(DeserializationError::IndexOutOfRange(highest));
    }
    let mut graph = SurfaceGraph::try_with_slots(highest.slot() + 1)
        .map_err(|_| DeserializationError::IndexOutOfRange(highest))?;

    // Phase 1: allocate every node before touching any reference.
    for record in records {
        let node = NavNode::new(record.index, record.position, record.status);
        if graph.insert(node).is_some() {
            return Err(DeserializationError::DuplicateIndex(record.index));
        }
    }

    // Phase 2: resolve neighbor indices against the allocated slots.
    for record in records {
        for entry in &record.connected {
            if !graph.contains(entry.index) {
                return Err(DeserializationError::DanglingNeighbor {
                    node: record.index,
                    neighbor: entry.index,
                });
            }
            if let Some(node) = graph.node_mut(record.index) {
                node.neighbors.push(Neighbor {
                    index: entry.index,
                    weight: entry.value,
                });
            }
        }
    }

    Ok(graph)
}

/// Fail on the first node whose position or any neighbor weight is NaN or
/// infinite.
pub fn check_finite(graph: &SurfaceGraph) -> Result<(), StoreError> {
    match graph
        .nodes()
        .find(|n| !n.position.is_finite() || n.neighbors.iter().any(|m| !m.weight.is_finite()))
    {
        Some(node) => Err(StoreError::NonFinite { node: node.index }),
        None => Ok(()),
    }
}

/// Serialize a graph to a JSON string.
pub fn to_json(graph: &SurfaceGraph) -> Result<String, StoreError> {
    check_finite(graph)?;
    serde_json::to_string(&to_records(graph)).map_err(StoreError::Serialize)
}

/// Deserialize a graph from a JSON string.
pub fn from_json(json: &str) -> Result<SurfaceGraph, StoreError> {
    let records: Vec<NodeRecord> =
        serde_json::from_str(json).map_err(DeserializationError::Malformed)?;
    Ok(from_records(&records)?)
}

/// Write a graph's records to any writer.
pub fn write_to<W: Write>(graph: &SurfaceGraph, writer: W) -> Result<(), StoreError> {
    check_finite(graph)?;
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, &to_records(graph)).map_err(StoreError::Serialize)?;
    writer.flush()?;
    Ok(())
}

/// Read a graph from any reader.
pub fn read_from<R: Read>(reader: R) -> Result<SurfaceGraph, StoreError> {
    let records: Vec<NodeRecord> = serde_json::from_reader(BufReader::new(reader))
        .map_err(|e| {
            if e.is_io() {
                StoreError::Io(e.into())
            } else {
                StoreError::Deserialization(DeserializationError::Malformed(e))
            }
        })?;
    Ok(from_records(&records)?)
}

/// Save a graph to `path`, replacing any existing file. The file is only
/// opened once encoding has succeeded.
pub fn save(graph: &SurfaceGraph, path: &Path) -> Result<(), StoreError> {
    let mut bytes = Vec::new();
    write_to(graph, &mut bytes)?;
    fs::write(path, bytes)?;
    info!(path = %path.display(), nodes = graph.node_count(), "graph saved");
    Ok(())
}

/// Load a graph from `path`.
pub fn load(path: &Path) -> Result<SurfaceGraph, StoreError> {
    let file = File::open(path)?;
    let graph = read_from(file)?;
    info!(path = %path.display(), nodes = graph.node_count(), "graph loaded");
    Ok(graph)
}
