//! # Chunk Pipeline Integration Tests
//!
//! Pool liveness, duplicate-request adoption, rendering determinism and
//! idempotent shutdown across the viewer's moving parts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tileland_viewer::{
    ChunkGeneratorPool, RenderBackend, RenderConfig, RenderLoop, ViewState,
};
use tileland_world::{ChunkCoord, FlatGenerator, TerrainId, Tile, World};

#[test]
fn test_pool_liveness_four_requests_two_workers() {
    let world = World::new(Arc::new(FlatGenerator::default()));
    let mut pool = ChunkGeneratorPool::new(world.generator(), Some(2));

    let wanted = [
        ChunkCoord::new(0, 0, 0),
        ChunkCoord::new(1, 0, 0),
        ChunkCoord::new(0, 1, 0),
        ChunkCoord::new(1, 1, 0),
    ];
    for coord in wanted {
        pool.request_chunk(coord);
    }

    let deadline = Instant::now() + Duration::from_secs(1);
    let mut received = Vec::new();
    while received.len() < wanted.len() && Instant::now() < deadline {
        received.extend(pool.drain_finished());
        std::thread::sleep(Duration::from_millis(1));
    }

    for coord in wanted {
        assert!(
            received.iter().any(|c| c.coord() == coord),
            "no chunk delivered for {coord:?}"
        );
    }
    pool.stop();
}

#[test]
fn test_duplicate_requests_adopt_exactly_one_chunk() {
    let mut world = World::new(Arc::new(FlatGenerator::default()));
    let mut pool = ChunkGeneratorPool::new(world.generator(), Some(2));

    let coord = ChunkCoord::new(0, 0, 0);
    pool.request_chunk(coord);
    pool.request_chunk(coord);

    let deadline = Instant::now() + Duration::from_secs(1);
    let mut results = Vec::new();
    while results.len() < 2 && Instant::now() < deadline {
        results.extend(pool.drain_finished());
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(results.len(), 2, "both duplicate requests must complete");

    // Adoption: first write wins, the redundant result is dropped.
    for chunk in results {
        if world.chunk(chunk.coord()).is_none() {
            world.add_chunk(chunk);
        }
    }
    assert_eq!(world.loaded_chunk_count(), 1);
    pool.stop();
}

#[test]
fn test_render_known_region_exact_bytes() {
    let state = ViewState {
        width: 4,
        height: 2,
        ..ViewState::default()
    };
    let mut tiles = Vec::new();
    for terrain in [TerrainId::GRASS, TerrainId::WATER] {
        for _ in 0..4 {
            let mut tile = Tile::new(terrain);
            tile.set_explored(true);
            tiles.push(tile);
        }
    }

    let lines =
        tileland_viewer::render::compose_frame(&state, &tiles, None, RenderBackend::Standard);
    assert_eq!(
        lines,
        vec![
            "\x1b[1;1H\x1b[48;2;0;100;0m\x1b[38;2;0;180;0m░░░░░░░░\x1b[0m".to_string(),
            "\x1b[2;1H\x1b[48;2;0;50;150m\x1b[38;2;0;100;255m≈≈≈≈≈≈≈≈\x1b[0m".to_string(),
        ]
    );

    // Darkening to light level 0 scales every channel to 10% but keeps the
    // exact same glyph runs.
    let mut dark = tiles.clone();
    for tile in &mut dark {
        tile.light_level = 0;
    }
    let dark_lines =
        tileland_viewer::render::compose_frame(&state, &dark, None, RenderBackend::Standard);
    assert_eq!(
        dark_lines,
        vec![
            "\x1b[1;1H\x1b[48;2;0;10;0m\x1b[38;2;0;18;0m░░░░░░░░\x1b[0m".to_string(),
            "\x1b[2;1H\x1b[48;2;0;5;15m\x1b[38;2;0;10;25m≈≈≈≈≈≈≈≈\x1b[0m".to_string(),
        ]
    );
}

#[test]
fn test_fmt_backend_matches_standard_backend() {
    let state = ViewState {
        width: 6,
        height: 3,
        ..ViewState::default()
    };
    let mut tiles = Vec::new();
    for (i, terrain) in [
        TerrainId::GRASS,
        TerrainId::WATER,
        TerrainId::WALL,
        TerrainId::FLOOR,
        TerrainId::VOID,
        TerrainId::UNKNOWN,
    ]
    .iter()
    .cycle()
    .take(18)
    .enumerate()
    {
        let mut tile = Tile::new(*terrain);
        tile.set_explored(true);
        tile.light_level = (i * 37 % 256) as u8;
        tiles.push(tile);
    }

    let std_lines =
        tileland_viewer::render::compose_frame(&state, &tiles, None, RenderBackend::Standard);
    let fmt_lines =
        tileland_viewer::render::compose_frame(&state, &tiles, None, RenderBackend::Fmt);
    assert_eq!(std_lines, fmt_lines);
}

#[test]
fn test_render_loop_stop_is_idempotent() {
    let world = Arc::new(Mutex::new(World::default()));
    let mut renderer = RenderLoop::new(
        world,
        RenderConfig {
            enable_stats: false,
            enable_diff: true,
            fps_cap: 60.0,
            ..RenderConfig::default()
        },
    );
    renderer.start();
    std::thread::sleep(Duration::from_millis(30));
    renderer.stop();
    renderer.stop();
}

#[test]
fn test_pool_stop_is_idempotent_with_backlog() {
    let world = World::new(Arc::new(FlatGenerator::default()));
    let mut pool = ChunkGeneratorPool::new(world.generator(), Some(1));
    for i in 0..128 {
        pool.request_chunk(ChunkCoord::new(i, 0, 0));
    }
    pool.stop();
    pool.stop();
}
