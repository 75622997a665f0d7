//! # Tileland World Model
//!
//! Chunked, infinitely extensible 3D voxel world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a generator fills a chunk as a pure function of the
//!    chunk coordinates and its own configuration
//! 2. **Chunked**: the world is a sparse map of fixed-size 16x16x16 chunks
//! 3. **Lazily loaded**: chunks materialize on first mutable access or via
//!    explicit detached generation for worker threads
//!
//! ## Core Components
//!
//! - [`coords`]: floor-semantic world/chunk/local coordinate transforms
//! - [`terrain`]: terrain identifiers and the static display catalog
//! - [`tile`]: the POD voxel record with light-scaled colors
//! - [`chunk`]: a fixed 3D block of tiles with bounds-checked access
//! - [`generator`]: flat and layered-noise terrain generators
//! - [`world`]: the loaded-chunk map plus the owned generator
//!
//! ## Example
//!
//! ```rust,ignore
//! use tileland_world::{FlatGenerator, TerrainId, World};
//!
//! let mut world = World::new(Arc::new(FlatGenerator::default()));
//! assert_eq!(world.tile_mut(0, 0, -1).terrain, TerrainId::GRASS);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod coords;
pub mod generator;
pub mod metadata;
pub mod terrain;
pub mod tile;
pub mod world;

pub use chunk::{Chunk, CHUNK_AREA, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH};
pub use coords::{floor_div, floor_mod, ChunkCoord};
pub use generator::{generator_from_metadata, FlatGenerator, NoiseGenerator, TerrainGenerator};
pub use metadata::WorldMetadata;
pub use terrain::{terrain_info, RgbColor, TerrainId, TerrainInfo};
pub use tile::{Tile, MAX_LIGHT_LEVEL};
pub use world::{World, WorldError};
