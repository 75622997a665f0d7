//! # World
//!
//! The loaded subset of chunks plus the generator used to lazily produce
//! missing ones. Coordinates that are not loaded behave as implicit void for
//! read-only queries.
//!
//! ## Ownership & Threading
//!
//! The world itself is not synchronized; a single owner (the controller)
//! serializes mutation, and readers snapshot under the owner's lock.
//! [`World::create_chunk_isolated`] is the exception: it builds a detached
//! chunk without touching the loaded-chunk map, so worker threads can call it
//! through a shared reference while readers are active.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::chunk::Chunk;
use crate::coords::{world_to_local, ChunkCoord};
use crate::generator::{FlatGenerator, TerrainGenerator};
use crate::metadata::WorldMetadata;
use crate::terrain::TerrainId;
use crate::tile::Tile;

/// World access errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Local chunk coordinates outside the 16x16x16 range.
    #[error("local chunk coordinates ({lx}, {ly}, {lz}) out of range")]
    OutOfBounds {
        /// Local X.
        lx: i32,
        /// Local Y.
        ly: i32,
        /// Local Z.
        lz: i32,
    },
    /// Read-only tile access into a chunk that is not loaded.
    #[error("chunk ({}, {}, {}) is not loaded", coord.cx, coord.cy, coord.cz)]
    NotLoaded {
        /// The missing chunk.
        coord: ChunkCoord,
    },
}

/// The loaded-chunk map plus its terrain generator.
pub struct World {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: Arc<dyn TerrainGenerator>,
    metadata: Option<WorldMetadata>,
}

impl World {
    /// Creates an empty world with the given generator.
    #[must_use]
    pub fn new(generator: Arc<dyn TerrainGenerator>) -> Self {
        Self {
            chunks: HashMap::new(),
            generator,
            metadata: None,
        }
    }

    /// Returns the loaded chunk at a coordinate, never generating.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Returns the chunk at a coordinate, generating and inserting it first
    /// if missing.
    ///
    /// Not synchronized; the caller serializes access.
    pub fn get_or_load_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        let generator = Arc::clone(&self.generator);
        self.chunks.entry(coord).or_insert_with(|| {
            let mut chunk = Chunk::new(coord);
            generator.generate(&mut chunk);
            chunk
        })
    }

    /// Builds and generates a fresh chunk without touching the loaded-chunk
    /// map.
    ///
    /// Safe to call concurrently with other non-mutating world methods; the
    /// returned chunk is expected to be adopted later via
    /// [`World::add_chunk`].
    #[must_use]
    pub fn create_chunk_isolated(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        self.generator.generate(&mut chunk);
        chunk
    }

    /// Adopts a chunk under its own coordinate key.
    ///
    /// First write wins: if a chunk already exists at the coordinate the
    /// argument is dropped and `false` is returned. Concurrent workers may
    /// redundantly generate, so callers check [`World::chunk`] before
    /// adopting.
    pub fn add_chunk(&mut self, chunk: Chunk) -> bool {
        use std::collections::hash_map::Entry;
        match self.chunks.entry(chunk.coord()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(chunk);
                true
            }
        }
    }

    /// Read-only tile access at world coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotLoaded`] if the containing chunk is absent.
    pub fn tile(&self, wx: i32, wy: i32, wz: i32) -> Result<&Tile, WorldError> {
        let coord = ChunkCoord::from_world(wx, wy, wz);
        let chunk = self.chunk(coord).ok_or(WorldError::NotLoaded { coord })?;
        let (lx, ly, lz) = world_to_local(wx, wy, wz);
        chunk.tile(lx as i32, ly as i32, lz as i32)
    }

    /// Mutable tile access at world coordinates, loading the containing
    /// chunk on demand.
    pub fn tile_mut(&mut self, wx: i32, wy: i32, wz: i32) -> &mut Tile {
        let coord = ChunkCoord::from_world(wx, wy, wz);
        let chunk = self.get_or_load_chunk(coord);
        let (lx, ly, lz) = world_to_local(wx, wy, wz);
        // Local coordinates from world_to_local are always in range.
        &mut chunk.tiles_mut()[Chunk::index(lx, ly, lz)]
    }

    /// Sets only the terrain tag of a tile.
    ///
    /// Passability and movement cost keep their previous per-instance values;
    /// use [`World::set_tile_terrain_and_refresh`] to re-derive them.
    pub fn set_tile_terrain(&mut self, wx: i32, wy: i32, wz: i32, terrain: TerrainId) {
        self.tile_mut(wx, wy, wz).terrain = terrain;
    }

    /// Sets the terrain tag and re-derives passability and movement cost
    /// from the catalog defaults.
    pub fn set_tile_terrain_and_refresh(&mut self, wx: i32, wy: i32, wz: i32, terrain: TerrainId) {
        let tile = self.tile_mut(wx, wy, wz);
        tile.terrain = terrain;
        tile.refresh_from_terrain();
    }

    /// Iterates over all loaded chunks in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> + '_ {
        self.chunks.iter().map(|(coord, chunk)| (*coord, chunk))
    }

    /// Number of loaded chunks.
    #[inline]
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunks are loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Replaces the terrain generator.
    ///
    /// Existing chunks are unaffected; used after a load to align the
    /// generator with the saved metadata.
    pub fn set_generator(&mut self, generator: Arc<dyn TerrainGenerator>) {
        self.generator = generator;
    }

    /// Shared handle to the current generator (for worker pools).
    #[must_use]
    pub fn generator(&self) -> Arc<dyn TerrainGenerator> {
        Arc::clone(&self.generator)
    }

    /// World generation metadata, if any.
    #[must_use]
    pub fn metadata(&self) -> Option<&WorldMetadata> {
        self.metadata.as_ref()
    }

    /// Attaches world generation metadata.
    pub fn set_metadata(&mut self, metadata: WorldMetadata) {
        self.metadata = Some(metadata);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Arc::new(FlatGenerator::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_WIDTH;

    #[test]
    fn test_const_lookup_never_generates() {
        let world = World::default();
        assert!(world.chunk(ChunkCoord::new(0, 0, 0)).is_none());
        assert_eq!(
            world.tile(0, 0, 0),
            Err(WorldError::NotLoaded {
                coord: ChunkCoord::new(0, 0, 0)
            })
        );
    }

    #[test]
    fn test_mutable_access_loads_chunk() {
        let mut world = World::default();
        let tile = world.tile_mut(0, 0, -1);
        assert_eq!(tile.terrain, TerrainId::GRASS);
        assert_eq!(world.loaded_chunk_count(), 1);
        assert!(world.chunk(ChunkCoord::new(0, 0, -1)).is_some());
    }

    #[test]
    fn test_same_chunk_same_tile_reference() {
        let mut world = World::default();
        // Two world coordinates in the same chunk resolve to the same storage
        // regardless of access order.
        world.tile_mut(1, 1, 1).light_level = 7;
        world.tile_mut(2, 2, 2).light_level = 9;
        assert_eq!(world.tile(1, 1, 1).unwrap().light_level, 7);
        assert_eq!(world.loaded_chunk_count(), 1);
    }

    #[test]
    fn test_negative_and_origin_are_different_chunks() {
        let mut world = World::default();
        world.tile_mut(-1, -1, -1);
        world.tile_mut(0, 0, 0);
        assert_eq!(world.loaded_chunk_count(), 2);
        assert!(world.chunk(ChunkCoord::new(-1, -1, -1)).is_some());
        assert!(world.chunk(ChunkCoord::new(0, 0, 0)).is_some());
    }

    #[test]
    fn test_isolated_chunk_not_inserted() {
        let world = World::default();
        let chunk = world.create_chunk_isolated(ChunkCoord::new(2, 3, -1));
        assert_eq!(chunk.tile(0, 0, 0).unwrap().terrain, TerrainId::GRASS);
        assert!(world.is_empty());
    }

    #[test]
    fn test_add_chunk_first_write_wins() {
        let mut world = World::default();
        let mut first = world.create_chunk_isolated(ChunkCoord::new(0, 0, 0));
        first.tile_mut(0, 0, 0).unwrap().light_level = 1;
        let second = world.create_chunk_isolated(ChunkCoord::new(0, 0, 0));

        assert!(world.add_chunk(first));
        assert!(!world.add_chunk(second));
        assert_eq!(world.tile(0, 0, 0).unwrap().light_level, 1);
        assert_eq!(world.loaded_chunk_count(), 1);
    }

    #[test]
    fn test_set_tile_terrain_keeps_derived_fields() {
        let mut world = World::default();
        world.set_tile_terrain(0, 0, -1, TerrainId::WALL);
        let tile = world.tile(0, 0, -1).unwrap();
        assert_eq!(tile.terrain, TerrainId::WALL);
        // Grass passability survives the terrain swap.
        assert!(tile.can_enter_same_level());
        assert_eq!(tile.movement_cost, 1);

        world.set_tile_terrain_and_refresh(0, 0, -1, TerrainId::WALL);
        let tile = world.tile(0, 0, -1).unwrap();
        assert!(!tile.can_enter_same_level());
        assert_eq!(tile.movement_cost, 99);
    }

    #[test]
    fn test_iterate_yields_all_loaded() {
        let mut world = World::default();
        world.tile_mut(0, 0, 0);
        world.tile_mut(CHUNK_WIDTH as i32, 0, 0);
        let coords: Vec<ChunkCoord> = world.iter().map(|(c, _)| c).collect();
        assert_eq!(coords.len(), 2);
        assert!(coords.contains(&ChunkCoord::new(0, 0, 0)));
        assert!(coords.contains(&ChunkCoord::new(1, 0, 0)));
    }
}
