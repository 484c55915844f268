// Edge synthesis over the sampling grid.
//
// `connect()` visits every cell `(i, j)` and links it to the cells right,
// down, and diagonally down-right of it, plus the cross diagonal between
// `(i, j + 1)` and `(i + 1, j)`. Over any 2×2 block with all four corners
// present this yields all six pairs, i.e. a complete graph on the block.
// Interior nodes end up with 8 neighbors, edges with 5, corners with 3.
//
// Pairs are linked only when both slots are present. The `active` flag is
// ignored here: inactive nodes keep their connections so a consumer can
// decide how to treat them (e.g. as impassable, or as high-cost).
//
// Weight is the Euclidean distance between the two projected positions, so
// a diagonal on flat ground costs √2 × spacing and an axis step on a slope
// costs more than the horizontal spacing.
//
// Each pair is linked at most once: re-running `connect()` on an already
// connected graph adds nothing.

use crate::nav::SurfaceGraph;
use crate::types::NodeIndex;
use tracing::debug;

/// Connect grid-adjacent and diagonal nodes. Returns the number of edges
/// added.
pub fn connect(graph: &mut SurfaceGraph, grid_size: u32) -> usize {
    let mut added = 0;
    for i in 0..grid_size {
        for j in 0..grid_size {
            let here = NodeIndex::from_cell(i, j, grid_size);
            let has_row_below = i + 1 < grid_size;
            let has_col_right = j + 1 < grid_size;

            if has_row_below {
                added += link(graph, here, NodeIndex::from_cell(i + 1, j, grid_size)) as usize;
            }
            if has_col_right {
                added += link(graph, here, NodeIndex::from_cell(i, j + 1, grid_size)) as usize;
            }
            if has_row_below && has_col_right {
                added +=
                    link(graph, here, NodeIndex::from_cell(i + 1, j + 1, grid_size)) as usize;
                added += link(
                    graph,
                    NodeIndex::from_cell(i, j + 1, grid_size),
                    NodeIndex::from_cell(i + 1, j, grid_size),
                ) as usize;
            }
        }
    }
    debug!(grid_size, edges = added, "grid connected");
    added
}

/// Link two nodes weighted by distance. `false` if either is absent or
/// they are already linked.
fn link(graph: &mut SurfaceGraph, a: NodeIndex, b: NodeIndex) -> bool {
    let (Some(na), Some(nb)) = (graph.node(a), graph.node(b)) else {
        return false;
    };
    if na.is_connected_to(b) {
        return false;
    }
    let weight = na.position.distance(nb.position);
    graph.add_edge(a, b, weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavNode;
    use crate::types::Vec3;
    use std::f32::consts::SQRT_2;

    #[test]
    fn two_by_two_is_complete() {
        let mut graph = flat_grid(2, &[]);
        assert_eq!(connect(&mut graph, 2), 6);
        assert_eq!(graph.edge_count(), 6);
        for node in graph.nodes() {
            assert_eq!(node.neighbors.len(), 3, "node {}", node.index);
        }
    }

    #[test]
    fn flat_weights_are_axis_one_and_diagonal_root_two() {
        let mut graph = flat_grid(2, &[]);
        connect(&mut graph, 2);
        for edge in graph.edges() {
            let diagonal = matches!((edge.a.0, edge.b.0), (0, 3) | (1, 2));
            let expected = if diagonal { SQRT_2 } else { 1.0 };
            assert!(
                (edge.weight - expected).abs() < 1e-6,
                "{}-{}: {}",
                edge.a,
                edge.b,
                edge.weight
            );
        }
    }

    #[test]
    fn interior_node_has_eight_neighbors() {
        let mut graph = flat_grid(3, &[]);
        connect(&mut graph, 3);
        assert_eq!(graph.node(NodeIndex(4)).unwrap().neighbors.len(), 8);
        assert_eq!(graph.node(NodeIndex(0)).unwrap().neighbors.len(), 3);
        assert_eq!(graph.node(NodeIndex(1)).unwrap().neighbors.len(), 5);
        // 12 axis + 8 diagonal.
        assert_eq!(graph.edge_count(), 20);
    }

    #[test]
    fn absent_center_is_never_referenced() {
        let mut graph = flat_grid(3, &[4]);
        connect(&mut graph, 3);
        assert!(graph.dangling_references().is_empty());
        assert!(
            graph
                .edges()
                .iter()
                .all(|e| e.a != NodeIndex(4) && e.b != NodeIndex(4))
        );
        // Ring of 8: 8 axis edges + the 4 corner cross-diagonals that skip
        // the center are still present (0-4 gone, but 1-3, 1-5, 3-7, 5-7).
        assert_eq!(graph.edge_count(), 12);
    }

    #[test]
    fn inactive_nodes_are_still_connected() {
        let mut graph = flat_grid(2, &[]);
        graph.node_mut(NodeIndex(0)).unwrap().active = false;
        connect(&mut graph, 2);
        assert_eq!(graph.node(NodeIndex(0)).unwrap().neighbors.len(), 3);
    }

    #[test]
    fn weight_follows_projected_height() {
        let mut graph = flat_grid(2, &[]);
        graph.node_mut(NodeIndex(2)).unwrap().position.y = 1.0;
        connect(&mut graph, 2);
        let edge = graph
            .edges()
            .into_iter()
            .find(|e| (e.a, e.b) == (NodeIndex(0), NodeIndex(2)))
            .unwrap();
        assert!((edge.weight - SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn connect_twice_adds_nothing() {
        let mut graph = flat_grid(3, &[]);
        connect(&mut graph, 3);
        let before = graph.clone();
        assert_eq!(connect(&mut graph, 3), 0);
        assert_eq!(graph, before);
    }

    #[test]
    fn zero_grid_is_noop() {
        let mut graph = SurfaceGraph::new();
        assert_eq!(connect(&mut graph, 0), 0);
    }

    /// Unit-spaced flat grid with the listed slots left absent.
    fn flat_grid(n: u32, absent: &[u32]) -> SurfaceGraph {
        let mut graph = SurfaceGraph::with_slots((n * n) as usize);
        for i in 0..n {
            for j in 0..n {
                let index = NodeIndex::from_cell(i, j, n);
                if absent.contains(&index.0) {
                    continue;
                }
                graph.insert(NavNode::new(index, Vec3::new(i as f32, 0.0, j as f32), true));
            }
        }
        graph
    }
}
