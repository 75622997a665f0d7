//! # Terrain Generators
//!
//! A generator fills a chunk deterministically from the chunk coordinates and
//! its own immutable configuration. Generators are shared behind `Arc` and
//! invoked concurrently on disjoint chunks, so `generate` takes `&self` and
//! may touch nothing but the chunk argument.
//!
//! Two variants:
//!
//! - [`FlatGenerator`]: one terrain below a ground level, another above
//! - [`NoiseGenerator`]: layered terrain from a configurable 3D noise graph

use std::sync::Arc;

use noise::{Fbm, MultiFractal, NoiseFn, OpenSimplex, Perlin, RidgedMulti, Seedable, Value};

use crate::chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::metadata::WorldMetadata;
use crate::terrain::TerrainId;
use crate::tile::Tile;

/// Deterministic chunk-filling contract.
///
/// Implementations must be safe to call from many threads at once on
/// different chunks; the only mutation allowed is the chunk argument.
pub trait TerrainGenerator: Send + Sync {
    /// Fills every tile of the chunk based on its coordinates.
    fn generate(&self, chunk: &mut Chunk);
}

/// Builds the generator described by world metadata.
///
/// An empty or `"flat"` noise type selects the flat generator at ground
/// level 0; anything else selects the noise generator with the metadata
/// parameters.
#[must_use]
pub fn generator_from_metadata(meta: &WorldMetadata) -> Arc<dyn TerrainGenerator> {
    let noise = meta.noise_type.trim().to_ascii_lowercase();
    if noise.is_empty() || noise == "flat" {
        Arc::new(FlatGenerator::default())
    } else {
        Arc::new(NoiseGenerator::from_metadata(meta))
    }
}

/// A simple flat terrain generator: one terrain strictly below the ground
/// level, another at and above it.
pub struct FlatGenerator {
    ground_level: i32,
    ground: TerrainId,
    air: TerrainId,
}

impl FlatGenerator {
    /// Creates a flat generator.
    ///
    /// World Z coordinates below `ground_level` get `ground` terrain, the
    /// rest get `air`.
    #[must_use]
    pub const fn new(ground_level: i32, ground: TerrainId, air: TerrainId) -> Self {
        Self {
            ground_level,
            ground,
            air,
        }
    }
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self::new(0, TerrainId::GRASS, TerrainId::VOID)
    }
}

impl TerrainGenerator for FlatGenerator {
    fn generate(&self, chunk: &mut Chunk) {
        let (_, _, base_wz) = chunk.coord().world_origin();
        let tiles = chunk.tiles_mut();
        for lz in 0..CHUNK_DEPTH {
            let wz = base_wz + lz as i32;
            let terrain = if wz < self.ground_level {
                self.ground
            } else {
                self.air
            };
            let mut template = Tile::new(terrain);
            template.set_explored(true);
            for ly in 0..CHUNK_HEIGHT {
                for lx in 0..CHUNK_WIDTH {
                    tiles[Chunk::index(lx, ly, lz)] = template;
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BaseNoise {
    Perlin,
    OpenSimplex,
    Value,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FractalKind {
    None,
    Fbm,
    Ridged,
}

/// Layered terrain generator driven by a configurable noise graph.
///
/// The base noise and fractal modifier are selected by name, matching the
/// strings stored in world metadata. Unusable configuration falls back to
/// plain Perlin with a warning instead of failing.
pub struct NoiseGenerator {
    frequency: f64,
    source: Box<dyn NoiseFn<f64, 3> + Send + Sync>,
}

impl NoiseGenerator {
    /// Creates a noise generator from explicit parameters.
    #[must_use]
    pub fn new(
        seed: i64,
        frequency: f32,
        noise_type: &str,
        fractal_type: &str,
        octaves: i32,
        lacunarity: f32,
        gain: f32,
    ) -> Self {
        let seed32 = seed as u32;
        let octaves = octaves.max(1) as usize;

        let base = parse_base(noise_type);
        let fractal = parse_fractal(fractal_type);
        let source = match (base, fractal) {
            (Some(base), Some(fractal)) => build_source(
                base,
                fractal,
                seed32,
                octaves,
                f64::from(lacunarity),
                f64::from(gain),
            ),
            _ => {
                tracing::warn!(
                    noise_type,
                    fractal_type,
                    "unsupported noise configuration, falling back to Perlin"
                );
                Box::new(Perlin::new(seed32))
            }
        };

        Self {
            frequency: f64::from(frequency),
            source,
        }
    }

    /// Creates a noise generator from world metadata.
    #[must_use]
    pub fn from_metadata(meta: &WorldMetadata) -> Self {
        Self::new(
            meta.seed,
            meta.frequency,
            &meta.noise_type,
            &meta.fractal_type,
            meta.octaves,
            meta.lacunarity,
            meta.gain,
        )
    }
}

impl TerrainGenerator for NoiseGenerator {
    fn generate(&self, chunk: &mut Chunk) {
        let (base_wx, base_wy, base_wz) = chunk.coord().world_origin();
        let tiles = chunk.tiles_mut();
        for lz in 0..CHUNK_DEPTH {
            let wz = base_wz + lz as i32;
            for ly in 0..CHUNK_HEIGHT {
                let wy = base_wy + ly as i32;
                for lx in 0..CHUNK_WIDTH {
                    let wx = base_wx + lx as i32;
                    let value = self.source.get([
                        f64::from(wx) * self.frequency,
                        f64::from(wy) * self.frequency,
                        f64::from(wz) * self.frequency,
                    ]);
                    let mut tile = Tile::new(map_noise_to_terrain(value, wz));
                    tile.set_explored(true);
                    tiles[Chunk::index(lx, ly, lz)] = tile;
                }
            }
        }
    }
}

/// Maps a noise sample and world Z coordinate to a terrain type.
///
/// The thresholds are part of the deterministic generation contract: a saved
/// world regenerated with the same metadata must reproduce the same terrain.
fn map_noise_to_terrain(noise: f64, wz: i32) -> TerrainId {
    if wz < -5 {
        TerrainId::WALL
    } else if wz < 0 {
        // Underground caves
        if noise < -0.5 {
            TerrainId::WATER
        } else if noise > 0.4 {
            TerrainId::WALL
        } else {
            TerrainId::FLOOR
        }
    } else if wz == 0 {
        // Surface level
        if noise < -0.3 {
            TerrainId::WATER
        } else if noise < 0.3 {
            TerrainId::GRASS
        } else {
            TerrainId::WALL
        }
    } else if wz < 5 {
        // Low altitude above the surface
        if noise > 0.6 {
            TerrainId::WALL
        } else {
            TerrainId::VOID
        }
    } else {
        TerrainId::VOID
    }
}

fn parse_base(name: &str) -> Option<BaseNoise> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "perlin" => Some(BaseNoise::Perlin),
        "opensimplex2" | "opensimplex" | "open simplex2" | "open_simplex2" => {
            Some(BaseNoise::OpenSimplex)
        }
        "value" => Some(BaseNoise::Value),
        _ => None,
    }
}

fn parse_fractal(name: &str) -> Option<FractalKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Some(FractalKind::None),
        "fbm" => Some(FractalKind::Fbm),
        "ridged" => Some(FractalKind::Ridged),
        _ => None,
    }
}

fn build_source(
    base: BaseNoise,
    fractal: FractalKind,
    seed: u32,
    octaves: usize,
    lacunarity: f64,
    gain: f64,
) -> Box<dyn NoiseFn<f64, 3> + Send + Sync> {
    match base {
        BaseNoise::Perlin => wrap_fractal::<Perlin>(fractal, seed, octaves, lacunarity, gain),
        BaseNoise::OpenSimplex => {
            wrap_fractal::<OpenSimplex>(fractal, seed, octaves, lacunarity, gain)
        }
        BaseNoise::Value => wrap_fractal::<Value>(fractal, seed, octaves, lacunarity, gain),
    }
}

fn wrap_fractal<S>(
    fractal: FractalKind,
    seed: u32,
    octaves: usize,
    lacunarity: f64,
    gain: f64,
) -> Box<dyn NoiseFn<f64, 3> + Send + Sync>
where
    S: Default + Seedable + NoiseFn<f64, 3> + Send + Sync + 'static,
{
    match fractal {
        FractalKind::None => Box::new(S::default().set_seed(seed)),
        FractalKind::Fbm => Box::new(
            Fbm::<S>::new(seed)
                .set_octaves(octaves)
                .set_lacunarity(lacunarity)
                .set_persistence(gain),
        ),
        FractalKind::Ridged => Box::new(
            RidgedMulti::<S>::new(seed)
                .set_octaves(octaves)
                .set_lacunarity(lacunarity)
                .set_persistence(gain),
        ),
    }
}
