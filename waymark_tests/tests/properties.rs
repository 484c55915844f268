// Randomized structural checks over generated scenes.
//
// Scenes are a handful of level patches at random heights plus a few
// obstructed blocks, sampled by grids of random size and spacing. Whatever
// the layout, a built graph must keep row-major indices, stay free of
// dangling or one-sided neighbor entries, and survive a store round trip.

use proptest::prelude::*;
use waymark_nav::adjacency;
use waymark_nav::builder::build_surface_graph;
use waymark_nav::config::ValidationParams;
use waymark_nav::nav::SurfaceGraph;
use waymark_nav::scene::{Primitive, SurfaceScene};
use waymark_nav::store;
use waymark_nav::types::{NodeIndex, SurfaceTag, Vec3};

const SEED: Vec3 = Vec3::new(0.0, 50.0, 0.0);

fn ground_patch() -> impl Strategy<Value = Primitive> {
    (0.0f32..12.0, 0.0f32..12.0, 0.5f32..6.0, -3.0f32..3.0)
        .prop_map(|(x, z, half, y)| Primitive::ground(Vec3::new(x, y, z), half))
}

fn wall_block() -> impl Strategy<Value = Primitive> {
    (0.0f32..12.0, 0.0f32..12.0, 0.2f32..2.0, 0.2f32..6.0).prop_map(|(x, z, w, d)| {
        Primitive::block(Vec3::new(x, -10.0, z), Vec3::new(x + w, 10.0, z + d))
            .with_tag(SurfaceTag::Obstructed)
    })
}

fn scene() -> impl Strategy<Value = SurfaceScene> {
    (
        prop::collection::vec(ground_patch(), 1..6),
        prop::collection::vec(wall_block(), 0..3),
    )
        .prop_map(|(patches, walls)| SurfaceScene {
            primitives: patches.into_iter().chain(walls).collect(),
        })
}

fn build(scene: &SurfaceScene, grid_size: u32, spacing: f32) -> SurfaceGraph {
    let (mut graph, _) =
        build_surface_graph(scene, SEED, grid_size, spacing, &ValidationParams::default());
    adjacency::connect(&mut graph, grid_size);
    graph
}

proptest! {
    #[test]
    fn indices_are_row_major(scene in scene(), grid_size in 0u32..10, spacing in 0.5f32..2.0) {
        let graph = build(&scene, grid_size, spacing);
        prop_assert_eq!(graph.slot_count(), (grid_size * grid_size) as usize);
        for node in graph.nodes() {
            let (row, col) = (node.index.0 / grid_size, node.index.0 % grid_size);
            prop_assert_eq!(node.index, NodeIndex::from_cell(row, col, grid_size));
        }
    }

    #[test]
    fn neighbors_are_present_and_symmetric(
        scene in scene(),
        grid_size in 0u32..10,
        spacing in 0.5f32..2.0,
    ) {
        let graph = build(&scene, grid_size, spacing);
        prop_assert!(graph.dangling_references().is_empty());
        for node in graph.nodes() {
            prop_assert!(node.neighbors.len() <= 8);
            for n in &node.neighbors {
                let other = graph.node(n.index).unwrap();
                let back: Vec<_> = other
                    .neighbors
                    .iter()
                    .filter(|m| m.index == node.index)
                    .collect();
                prop_assert_eq!(back.len(), 1);
                prop_assert_eq!(back[0].weight, n.weight);
            }
        }
    }

    #[test]
    fn store_round_trip_preserves_records(
        scene in scene(),
        grid_size in 0u32..8,
        spacing in 0.5f32..2.0,
    ) {
        let graph = build(&scene, grid_size, spacing);
        let restored = store::from_json(&store::to_json(&graph).unwrap()).unwrap();
        prop_assert_eq!(store::to_records(&restored), store::to_records(&graph));
        prop_assert_eq!(restored.active_count(), graph.active_count());
    }
}
