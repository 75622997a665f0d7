//! # Chunk
//!
//! The unit of world allocation and persistence: a fixed 16x16x16 block of
//! tiles addressed by local coordinates. Tiles live in one linear array
//! (`lx` fastest, then `ly`, then `lz`) so the whole chunk can be viewed as
//! raw bytes for serialization.

use crate::coords::ChunkCoord;
use crate::tile::Tile;
use crate::world::WorldError;

/// Chunk width in tiles (X axis of the horizontal plane).
pub const CHUNK_WIDTH: usize = 16;
/// Chunk height in tiles (Y axis of the horizontal plane).
pub const CHUNK_HEIGHT: usize = 16;
/// Chunk depth in tiles (Z axis, vertical layers).
pub const CHUNK_DEPTH: usize = 16;
/// Tiles per horizontal layer.
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_HEIGHT;
/// Total tiles per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_DEPTH;

/// A chunk of world data.
///
/// The coordinate is immutable after construction. A chunk is exclusively
/// owned: either by the [`World`](crate::World) map, or - while being
/// generated - by a worker that will hand it over for adoption.
#[derive(Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    tiles: Box<[Tile]>,
}

impl Chunk {
    /// Creates a new chunk filled with default (void) tiles.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            tiles: vec![Tile::default(); CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Returns the chunk's grid coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Gets a tile at local coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] unless
    /// `0 <= lx < 16 && 0 <= ly < 16 && 0 <= lz < 16`.
    #[inline]
    pub fn tile(&self, lx: i32, ly: i32, lz: i32) -> Result<&Tile, WorldError> {
        let idx = Self::checked_index(lx, ly, lz)?;
        Ok(&self.tiles[idx])
    }

    /// Gets a mutable tile at local coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for invalid local coordinates.
    #[inline]
    pub fn tile_mut(&mut self, lx: i32, ly: i32, lz: i32) -> Result<&mut Tile, WorldError> {
        let idx = Self::checked_index(lx, ly, lz)?;
        Ok(&mut self.tiles[idx])
    }

    /// Read-only view of the linear tile array.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable view of the linear tile array (generator fill path).
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Raw byte view of the tile array for serialization.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tiles)
    }

    /// Mutable raw byte view of the tile array for deserialization.
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.tiles)
    }

    /// Size of one chunk's tile data in bytes.
    #[inline]
    #[must_use]
    pub const fn data_size() -> usize {
        CHUNK_VOLUME * std::mem::size_of::<Tile>()
    }

    /// Whether local coordinates address a tile inside this chunk.
    #[inline]
    #[must_use]
    pub const fn local_coords_valid(lx: i32, ly: i32, lz: i32) -> bool {
        lx >= 0
            && (lx as usize) < CHUNK_WIDTH
            && ly >= 0
            && (ly as usize) < CHUNK_HEIGHT
            && lz >= 0
            && (lz as usize) < CHUNK_DEPTH
    }

    /// Linear index of valid local coordinates: `lx + ly*W + lz*W*H`.
    #[inline]
    #[must_use]
    pub const fn index(lx: usize, ly: usize, lz: usize) -> usize {
        lx + ly * CHUNK_WIDTH + lz * CHUNK_AREA
    }

    #[inline]
    fn checked_index(lx: i32, ly: i32, lz: i32) -> Result<usize, WorldError> {
        if Self::local_coords_valid(lx, ly, lz) {
            Ok(Self::index(lx as usize, ly as usize, lz as usize))
        } else {
            Err(WorldError::OutOfBounds { lx, ly, lz })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainId;

    #[test]
    fn test_new_chunk_is_void() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        assert_eq!(chunk.tile(0, 0, 0).unwrap().terrain, TerrainId::VOID);
        assert_eq!(chunk.tile(15, 15, 15).unwrap().terrain, TerrainId::VOID);
    }

    #[test]
    fn test_out_of_bounds_access_fails() {
        let mut chunk = Chunk::new(ChunkCoord::new(1, 2, 3));
        assert!(chunk.tile(-1, 0, 0).is_err());
        assert!(chunk.tile(0, 16, 0).is_err());
        assert!(chunk.tile_mut(0, 0, 16).is_err());
        assert!(chunk.tile(16, 16, 16).is_err());
    }

    #[test]
    fn test_index_layout() {
        // X varies fastest, then Y, then Z.
        assert_eq!(Chunk::index(1, 0, 0), 1);
        assert_eq!(Chunk::index(0, 1, 0), CHUNK_WIDTH);
        assert_eq!(Chunk::index(0, 0, 1), CHUNK_AREA);
        assert_eq!(Chunk::index(15, 15, 15), CHUNK_VOLUME - 1);
    }

    #[test]
    fn test_byte_view_round_trip() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        chunk.tile_mut(3, 4, 5).unwrap().terrain = TerrainId::WALL;
        let bytes = chunk.as_bytes().to_vec();
        assert_eq!(bytes.len(), Chunk::data_size());

        let mut restored = Chunk::new(ChunkCoord::new(0, 0, 0));
        restored.bytes_mut().copy_from_slice(&bytes);
        assert_eq!(restored.tile(3, 4, 5).unwrap().terrain, TerrainId::WALL);
    }
}
