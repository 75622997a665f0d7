//! # Coordinate Algebra
//!
//! World coordinates are signed and unbounded; chunk coordinates address the
//! 16x16x16 grid; local coordinates address tiles inside one chunk.
//!
//! All transforms are floor-semantic: division rounds toward negative
//! infinity and the remainder carries the sign of the divisor, so world
//! coordinate `-1` lands in chunk `-1` at local offset `15`, never in chunk
//! `0`.

use crate::chunk::{CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Integer division rounding toward negative infinity.
///
/// For all `a` and `b != 0`: `floor_div(a, b) * b + floor_mod(a, b) == a`.
#[inline]
#[must_use]
pub const fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}

/// Integer modulo with the sign of the divisor.
///
/// For `b > 0` the result is always in `[0, b)`.
#[inline]
#[must_use]
pub const fn floor_mod(a: i32, b: i32) -> i32 {
    a.rem_euclid(b)
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not tiles).
    pub cx: i32,
    /// Y coordinate (in chunks, not tiles).
    pub cy: i32,
    /// Z coordinate (vertical layer, in chunks).
    pub cz: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Converts world tile coordinates to the containing chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_world(wx: i32, wy: i32, wz: i32) -> Self {
        Self {
            cx: floor_div(wx, CHUNK_WIDTH as i32),
            cy: floor_div(wy, CHUNK_HEIGHT as i32),
            cz: floor_div(wz, CHUNK_DEPTH as i32),
        }
    }

    /// Returns the world coordinates of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn world_origin(self) -> (i32, i32, i32) {
        (
            self.cx * CHUNK_WIDTH as i32,
            self.cy * CHUNK_HEIGHT as i32,
            self.cz * CHUNK_DEPTH as i32,
        )
    }
}

/// Converts world tile coordinates to local offsets inside their chunk.
///
/// Each component is in `[0, dim)` regardless of sign of the input.
#[inline]
#[must_use]
pub const fn world_to_local(wx: i32, wy: i32, wz: i32) -> (usize, usize, usize) {
    (
        floor_mod(wx, CHUNK_WIDTH as i32) as usize,
        floor_mod(wy, CHUNK_HEIGHT as i32) as usize,
        floor_mod(wz, CHUNK_DEPTH as i32) as usize,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_div_negative() {
        assert_eq!(floor_div(0, 16), 0);
        assert_eq!(floor_div(15, 16), 0);
        assert_eq!(floor_div(16, 16), 1);
        assert_eq!(floor_div(-1, 16), -1);
        assert_eq!(floor_div(-16, 16), -1);
        assert_eq!(floor_div(-17, 16), -2);
    }

    #[test]
    fn test_floor_mod_in_range() {
        assert_eq!(floor_mod(-1, 16), 15);
        assert_eq!(floor_mod(-16, 16), 0);
        assert_eq!(floor_mod(31, 16), 15);
    }

    #[test]
    fn test_exact_cover() {
        // chunk * DIM + local reconstructs the world coordinate for any sign.
        for w in -100..100 {
            let c = floor_div(w, 16);
            let l = floor_mod(w, 16);
            assert!(l >= 0 && l < 16);
            assert_eq!(c * 16 + l, w, "cover broken at {w}");
        }
    }

    #[test]
    fn test_from_world_matches_axis_transform() {
        let coord = ChunkCoord::from_world(-1, 17, 0);
        assert_eq!(coord, ChunkCoord::new(-1, 1, 0));
        let (lx, ly, lz) = world_to_local(-1, 17, 0);
        assert_eq!((lx, ly, lz), (15, 1, 0));
    }
}
