//! # Tile
//!
//! The single-voxel record. Tiles are 8-byte POD values so a chunk's tile
//! array can be copied to and from disk as raw bytes.

use bytemuck::{Pod, Zeroable};

use crate::terrain::{terrain_info, RgbColor, TerrainId};

/// Maximum (natural daylight) light level.
pub const MAX_LIGHT_LEVEL: u8 = 255;

/// Brightness floor at light level 0: 10% of the base color, not black, so
/// explored-but-dark terrain stays readable.
const MIN_BRIGHTNESS: f32 = 0.1;

const FLAG_ENTER_SAME_LEVEL: u8 = 1 << 0;
const FLAG_STAND_ON_TOP: u8 = 1 << 1;
const FLAG_EXPLORED: u8 = 1 << 2;

/// A single voxel.
///
/// Passability and movement cost are initialized from the terrain catalog
/// defaults but are per-instance state afterwards: assigning a new value to
/// [`Tile::terrain`] does NOT re-derive them. Callers that want the catalog
/// defaults back must refresh explicitly (see
/// [`World::set_tile_terrain_and_refresh`](crate::World::set_tile_terrain_and_refresh)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Tile {
    /// Terrain type tag.
    pub terrain: TerrainId,
    /// Packed passability / exploration flags.
    flags: u8,
    /// Light level, 0 (dark) to [`MAX_LIGHT_LEVEL`] (full).
    pub light_level: u8,
    /// Reserved; keeps the record free of implicit padding.
    _reserved: u8,
    /// Movement cost for entering this tile.
    pub movement_cost: i32,
}

impl Tile {
    /// Creates a tile of the given terrain with catalog defaults:
    /// full light, unexplored, passability and cost from the catalog.
    #[must_use]
    pub fn new(terrain: TerrainId) -> Self {
        let info = terrain_info(terrain);
        let mut flags = 0;
        if info.allow_enter_same_level {
            flags |= FLAG_ENTER_SAME_LEVEL;
        }
        if info.allow_stand_on_top {
            flags |= FLAG_STAND_ON_TOP;
        }
        Self {
            terrain,
            flags,
            light_level: MAX_LIGHT_LEVEL,
            _reserved: 0,
            movement_cost: info.default_movement_cost,
        }
    }

    /// Whether an entity can enter this tile at its own level.
    #[inline]
    #[must_use]
    pub const fn can_enter_same_level(&self) -> bool {
        self.flags & FLAG_ENTER_SAME_LEVEL != 0
    }

    /// Sets the same-level passability flag.
    #[inline]
    pub fn set_can_enter_same_level(&mut self, value: bool) {
        self.set_flag(FLAG_ENTER_SAME_LEVEL, value);
    }

    /// Whether an entity can stand on top of this tile.
    #[inline]
    #[must_use]
    pub const fn can_stand_on_top(&self) -> bool {
        self.flags & FLAG_STAND_ON_TOP != 0
    }

    /// Sets the stand-on-top flag.
    #[inline]
    pub fn set_can_stand_on_top(&mut self, value: bool) {
        self.set_flag(FLAG_STAND_ON_TOP, value);
    }

    /// Whether the tile has been explored (fog of war).
    #[inline]
    #[must_use]
    pub const fn is_explored(&self) -> bool {
        self.flags & FLAG_EXPLORED != 0
    }

    /// Sets the explored flag.
    #[inline]
    pub fn set_explored(&mut self, value: bool) {
        self.set_flag(FLAG_EXPLORED, value);
    }

    /// Re-derives passability and movement cost from the terrain catalog.
    ///
    /// The explored flag and light level are untouched.
    pub fn refresh_from_terrain(&mut self) {
        let info = terrain_info(self.terrain);
        self.set_can_enter_same_level(info.allow_enter_same_level);
        self.set_can_stand_on_top(info.allow_stand_on_top);
        self.movement_cost = info.default_movement_cost;
    }

    /// Display glyph from the terrain catalog.
    #[inline]
    #[must_use]
    pub fn display_glyph(&self) -> &'static str {
        terrain_info(self.terrain).glyph
    }

    /// Foreground color scaled by the current light level.
    #[inline]
    #[must_use]
    pub fn effective_foreground(&self) -> RgbColor {
        scale_by_light(terrain_info(self.terrain).foreground, self.light_level)
    }

    /// Background color scaled by the current light level.
    #[inline]
    #[must_use]
    pub fn effective_background(&self) -> RgbColor {
        scale_by_light(terrain_info(self.terrain).background, self.light_level)
    }

    #[inline]
    fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TerrainId::VOID)
    }
}

/// Scales a base color toward the brightness floor by the light level.
///
/// `out = base * (0.1 + 0.9 * level / 255)` per channel, clamped to 0..255.
/// At `level == MAX_LIGHT_LEVEL` the base color is returned unchanged.
#[must_use]
fn scale_by_light(base: RgbColor, level: u8) -> RgbColor {
    if level >= MAX_LIGHT_LEVEL {
        return base;
    }
    let scale =
        MIN_BRIGHTNESS + (1.0 - MIN_BRIGHTNESS) * f32::from(level) / f32::from(MAX_LIGHT_LEVEL);
    let apply = |c: u8| (f32::from(c) * scale).clamp(0.0, 255.0) as u8;
    RgbColor::new(apply(base.r), apply(base.g), apply(base.b))
}
