//! # Chunk Boundary Integration Test
//!
//! Proves the floor-semantic coordinate transforms partition the world
//! exactly, with no double coverage around the origin.

use std::sync::Arc;

use tileland_world::{
    floor_div, floor_mod, ChunkCoord, FlatGenerator, TerrainGenerator, TerrainId, World,
    CHUNK_WIDTH,
};

#[test]
fn test_origin_and_negative_neighbors_are_separate_chunks() {
    let mut world = World::default();

    // Both accesses must succeed and live in different chunks.
    world.tile_mut(-1, -1, -1);
    world.tile_mut(0, 0, 0);

    assert_eq!(world.loaded_chunk_count(), 2);
    assert!(world.chunk(ChunkCoord::new(-1, -1, -1)).is_some());
    assert!(world.chunk(ChunkCoord::new(0, 0, 0)).is_some());

    assert_eq!(floor_div(-1, CHUNK_WIDTH as i32), -1);
    assert_eq!(floor_div(0, CHUNK_WIDTH as i32), 0);
}

#[test]
fn test_exact_cover_across_wide_range() {
    // chunk_of(w) * DIM + local_of(w) == w and 0 <= local_of(w) < DIM
    // for every signed coordinate.
    let dim = CHUNK_WIDTH as i32;
    for w in -10_000..10_000 {
        let chunk = floor_div(w, dim);
        let local = floor_mod(w, dim);
        assert!((0..dim).contains(&local), "local out of range at {w}");
        assert_eq!(chunk * dim + local, w, "cover broken at {w}");
    }
}

#[test]
fn test_same_tile_reached_from_any_entry_order() {
    // Whatever order world coordinates inside one chunk are touched in, they
    // resolve to the same storage.
    let generator: Arc<dyn TerrainGenerator> =
        Arc::new(FlatGenerator::new(4, TerrainId::FLOOR, TerrainId::VOID));

    let mut forward = World::new(Arc::clone(&generator));
    forward.tile_mut(0, 0, 0).light_level = 3;
    forward.tile_mut(15, 15, 15).light_level = 5;

    let mut reverse = World::new(generator);
    reverse.tile_mut(15, 15, 15).light_level = 5;
    reverse.tile_mut(0, 0, 0).light_level = 3;

    assert_eq!(forward.loaded_chunk_count(), 1);
    assert_eq!(reverse.loaded_chunk_count(), 1);

    let a = forward.chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    let b = reverse.chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_chunk_straddling_writes_land_in_neighbors() {
    let mut world = World::default();
    world.tile_mut(15, 0, 0).light_level = 1;
    world.tile_mut(16, 0, 0).light_level = 2;

    assert_eq!(world.loaded_chunk_count(), 2);
    assert_eq!(world.tile(15, 0, 0).unwrap().light_level, 1);
    assert_eq!(world.tile(16, 0, 0).unwrap().light_level, 2);

    let left = world.chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    let right = world.chunk(ChunkCoord::new(1, 0, 0)).unwrap();
    assert_eq!(left.tile(15, 0, 0).unwrap().light_level, 1);
    assert_eq!(right.tile(0, 0, 0).unwrap().light_level, 2);
}
