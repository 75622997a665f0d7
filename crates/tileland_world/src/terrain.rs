//! # Terrain Catalog
//!
//! Terrain identifiers plus a process-wide constant table of display and
//! passability properties. Lookups never fail: unrecognized identifiers
//! resolve to the [`TerrainId::UNKNOWN`] entry, which always exists.

use bytemuck::{Pod, Zeroable};

/// A 24-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RgbColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl RgbColor {
    /// Creates a color from raw channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Terrain type identifier.
///
/// Stored as a raw byte so tiles stay POD; values outside the known set map
/// to the `UNKNOWN` catalog entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct TerrainId(pub u8);

impl TerrainId {
    /// Unknown or unrecognized terrain.
    pub const UNKNOWN: Self = Self(0);
    /// Empty space in a multi-layer map.
    pub const VOID: Self = Self(1);
    /// Grassland.
    pub const GRASS: Self = Self(2);
    /// Water body.
    pub const WATER: Self = Self(3);
    /// Solid wall.
    pub const WALL: Self = Self(4);
    /// Indoor / cave floor.
    pub const FLOOR: Self = Self(5);
}

/// Static display and passability properties of one terrain type.
#[derive(Clone, Copy, Debug)]
pub struct TerrainInfo {
    /// UTF-8 glyph used for terminal display (one logical cell).
    pub glyph: &'static str,
    /// Base foreground color before light scaling.
    pub foreground: RgbColor,
    /// Base background color before light scaling.
    pub background: RgbColor,
    /// Whether an entity can enter this terrain at its own level.
    pub allow_enter_same_level: bool,
    /// Whether an entity can stand on top of this terrain.
    pub allow_stand_on_top: bool,
    /// Whether the terrain is rendered at all.
    pub is_visible: bool,
    /// Default movement cost applied to freshly created tiles.
    pub default_movement_cost: i32,
}

const CATALOG: [TerrainInfo; 6] = [
    // UNKNOWN: magenta on black, impassable, visible so mistakes show up
    TerrainInfo {
        glyph: "?",
        foreground: RgbColor::new(255, 0, 255),
        background: RgbColor::new(0, 0, 0),
        allow_enter_same_level: false,
        allow_stand_on_top: false,
        is_visible: true,
        default_movement_cost: 99,
    },
    // VOID: pure black, enterable, invisible
    TerrainInfo {
        glyph: " ",
        foreground: RgbColor::new(0, 0, 0),
        background: RgbColor::new(0, 0, 0),
        allow_enter_same_level: true,
        allow_stand_on_top: false,
        is_visible: false,
        default_movement_cost: 99,
    },
    // GRASS
    TerrainInfo {
        glyph: "\u{2591}", // ░
        foreground: RgbColor::new(0, 180, 0),
        background: RgbColor::new(0, 100, 0),
        allow_enter_same_level: true,
        allow_stand_on_top: false,
        is_visible: true,
        default_movement_cost: 1,
    },
    // WATER
    TerrainInfo {
        glyph: "\u{2248}", // ≈
        foreground: RgbColor::new(0, 100, 255),
        background: RgbColor::new(0, 50, 150),
        allow_enter_same_level: false,
        allow_stand_on_top: false,
        is_visible: true,
        default_movement_cost: 5,
    },
    // WALL
    TerrainInfo {
        glyph: "\u{2588}", // █
        foreground: RgbColor::new(150, 150, 150),
        background: RgbColor::new(100, 100, 100),
        allow_enter_same_level: false,
        allow_stand_on_top: true,
        is_visible: true,
        default_movement_cost: 99,
    },
    // FLOOR
    TerrainInfo {
        glyph: "\u{00B7}", // ·
        foreground: RgbColor::new(200, 200, 200),
        background: RgbColor::new(50, 50, 50),
        allow_enter_same_level: true,
        allow_stand_on_top: false,
        is_visible: true,
        default_movement_cost: 1,
    },
];

/// Looks up the catalog entry for a terrain identifier.
///
/// Identifiers outside the known range resolve to the `UNKNOWN` entry.
#[inline]
#[must_use]
pub fn terrain_info(id: TerrainId) -> &'static TerrainInfo {
    CATALOG
        .get(id.0 as usize)
        .unwrap_or(&CATALOG[TerrainId::UNKNOWN.0 as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_entries() {
        assert_eq!(terrain_info(TerrainId::GRASS).glyph, "░");
        assert_eq!(terrain_info(TerrainId::WATER).foreground, RgbColor::new(0, 100, 255));
        assert!(!terrain_info(TerrainId::VOID).is_visible);
        assert!(terrain_info(TerrainId::WALL).allow_stand_on_top);
    }

    #[test]
    fn test_unrecognized_maps_to_unknown() {
        let info = terrain_info(TerrainId(200));
        assert_eq!(info.glyph, "?");
        assert_eq!(info.default_movement_cost, 99);
    }
}
