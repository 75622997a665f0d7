//! # Render Loop
//!
//! A dedicated thread that snapshots the visible tile rectangle under the
//! world lock, composes the map layer with UI overlay surfaces, and emits
//! ANSI 24-bit color frames to stdout at a capped frame rate.
//!
//! ## Frame Algorithm
//!
//! 1. Snapshot the view state
//! 2. Copy the visible tiles (the only work under the world lock)
//! 3. Build the stats bar and merge any external overlay on top
//! 4. Compose one string per row: cursor positioning, color SGRs only on
//!    change, two terminal cells per tile
//! 5. Hash the frame; in diff mode skip identical frames and emit only
//!    changed rows
//! 6. Sleep off the remainder of the frame budget
//!
//! Two composition backends exist - a manual string builder and one going
//! through the `std::fmt` machinery - and must produce identical bytes.

use std::io::Write as IoWrite;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tileland_tui::TuiSurface;
use tileland_world::{terrain_info, RgbColor, Tile, TerrainId, World};

/// The rectangle of world coordinates under the camera, plus the numbers
/// shown in the stats bar.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewState {
    /// World X of the view's left edge.
    pub view_x: i32,
    /// World Y of the view's top edge.
    pub view_y: i32,
    /// Current vertical layer.
    pub current_z: i32,
    /// View width in tiles.
    pub width: i32,
    /// View height in tiles.
    pub height: i32,
    /// Modified-chunk count shown in the stats bar.
    pub modified_chunk_count: usize,
    /// Measured controller ticks per second.
    pub tps: f64,
}

/// Which frame composition backend is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderBackend {
    /// Manual string building.
    Standard,
    /// Composition through `std::fmt::Write`; byte-identical output.
    Fmt,
}

/// Runtime-adjustable render options.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Background alpha of the stats bar.
    pub stats_alpha: f64,
    /// Whether the stats bar is drawn.
    pub enable_stats: bool,
    /// Whether unchanged frames/rows are suppressed.
    pub enable_diff: bool,
    /// Frame rate cap.
    pub fps_cap: f64,
    /// Active composition backend.
    pub backend: RenderBackend,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stats_alpha: 0.10,
            enable_stats: true,
            enable_diff: false,
            fps_cap: 360.0,
            backend: RenderBackend::Standard,
        }
    }
}

struct RenderShared {
    world: Arc<Mutex<World>>,
    view_state: Mutex<ViewState>,
    ui_layer: Mutex<Option<(Arc<TuiSurface>, f64)>>,
    config: Mutex<RenderConfig>,
    running: AtomicBool,
}

/// Handle to the render thread.
pub struct RenderLoop {
    shared: Arc<RenderShared>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Creates a stopped render loop over a shared world.
    #[must_use]
    pub fn new(world: Arc<Mutex<World>>, config: RenderConfig) -> Self {
        Self {
            shared: Arc::new(RenderShared {
                world,
                view_state: Mutex::new(ViewState::default()),
                ui_layer: Mutex::new(None),
                config: Mutex::new(config),
                running: AtomicBool::new(false),
            }),
            handle: None,
        }
    }

    /// Starts the render thread. No-op when already running.
    pub fn start(&mut self) {
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return;
        }
        let shared = Arc::clone(&self.shared);
        self.handle = Some(
            std::thread::Builder::new()
                .name("tui-render".to_string())
                .spawn(move || render_thread(&shared))
                .expect("spawning render thread"),
        );
    }

    /// Stops and joins the render thread. Idempotent.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("render thread panicked during shutdown");
            }
        }
    }

    /// Publishes a new view state for the next frame.
    pub fn update_view_state(&self, state: ViewState) {
        *self.shared.view_state.lock() = state;
    }

    /// Installs an external UI overlay surface (e.g. the mouse crosshair).
    pub fn set_ui_layer(&self, surface: Arc<TuiSurface>, alpha_bg: f64) {
        *self.shared.ui_layer.lock() = Some((surface, alpha_bg.clamp(0.0, 1.0)));
    }

    /// Removes the external UI overlay.
    pub fn clear_ui_layer(&self) {
        *self.shared.ui_layer.lock() = None;
    }

    /// Applies runtime render settings.
    pub fn apply_runtime_settings(
        &self,
        stats_alpha: f64,
        enable_stats: bool,
        enable_diff: bool,
        fps_cap: f64,
    ) {
        let mut config = self.shared.config.lock();
        config.stats_alpha = stats_alpha.clamp(0.0, 1.0);
        config.enable_stats = enable_stats;
        config.enable_diff = enable_diff;
        config.fps_cap = fps_cap.max(1.0);
    }

    /// Switches the composition backend.
    pub fn set_backend(&self, backend: RenderBackend) {
        self.shared.config.lock().backend = backend;
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn render_thread(shared: &RenderShared) {
    let mut emitter = FrameEmitter::default();
    let mut fps = 0.0f64;
    let mut frame_count = 0u32;
    let mut fps_window = Instant::now();

    while shared.running.load(Ordering::Acquire) {
        let frame_start = Instant::now();

        let state = *shared.view_state.lock();
        let config = shared.config.lock().clone();
        let tiles = {
            let world = shared.world.lock();
            snapshot_tiles(&world, &state)
        };
        let external = shared.ui_layer.lock().clone();

        let stats = config
            .enable_stats
            .then(|| build_stats_overlay(&state, fps));

        let mut overlay_owned: Option<(TuiSurface, f64)> = None;
        if let Some(stats) = stats {
            if let Some((ext, ext_alpha)) = &external {
                overlay_owned = Some((
                    merge_overlays(&stats, ext),
                    config.stats_alpha.max(*ext_alpha),
                ));
            } else {
                overlay_owned = Some((stats, config.stats_alpha));
            }
        }
        let overlay: Option<(&TuiSurface, f64)> = match (&overlay_owned, &external) {
            (Some((surface, alpha)), _) => Some((surface, *alpha)),
            // External only: floor the alpha at the stats base so the layer
            // never blends to nothing.
            (None, Some((ext, ext_alpha))) => {
                Some((ext.as_ref(), config.stats_alpha.max(*ext_alpha)))
            }
            (None, None) => None,
        };

        let lines = compose_frame(&state, &tiles, overlay, config.backend);
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = emitter.emit(&lines, config.enable_diff, &mut stdout) {
            tracing::error!(error = %err, "frame emit failed");
        }
        drop(stdout);

        frame_count += 1;
        let window = fps_window.elapsed();
        if window >= Duration::from_secs(1) {
            fps = f64::from(frame_count) / window.as_secs_f64();
            frame_count = 0;
            fps_window = Instant::now();
        }

        let target = Duration::from_secs_f64(1.0 / config.fps_cap.max(1.0));
        let elapsed = frame_start.elapsed();
        if elapsed < target {
            std::thread::sleep((target - elapsed).max(Duration::from_millis(1)));
        } else if elapsed > target + Duration::from_millis(1) {
            tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, "frame over budget");
        }
    }
}

/// Diff-aware frame output: skips identical frames by hash and re-emits only
/// the rows that changed since the previous frame.
#[derive(Default)]
pub struct FrameEmitter {
    prev_hash: u64,
    prev_lines: Vec<String>,
}

impl FrameEmitter {
    /// Writes a composed frame to the sink.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn emit<W: IoWrite>(
        &mut self,
        lines: &[String],
        diff: bool,
        sink: &mut W,
    ) -> std::io::Result<()> {
        if !diff {
            let mut output = String::with_capacity(lines.iter().map(String::len).sum::<usize>() + 8);
            output.push_str("\x1b[?25l");
            for line in lines {
                output.push_str(line);
            }
            sink.write_all(output.as_bytes())?;
            return sink.flush();
        }

        let hash = frame_hash(lines);
        if hash == self.prev_hash && self.prev_lines.len() == lines.len() {
            return Ok(());
        }

        let size_changed = self.prev_lines.len() != lines.len();
        let mut output = String::with_capacity(lines.len() * 32);
        output.push_str("\x1b[?25l");
        for (i, line) in lines.iter().enumerate() {
            if size_changed || self.prev_lines.get(i) != Some(line) {
                output.push_str(line);
            }
        }
        sink.write_all(output.as_bytes())?;
        sink.flush()?;

        self.prev_lines = lines.to_vec();
        self.prev_hash = hash;
        Ok(())
    }
}

/// Copies the visible tile rectangle out of the world.
///
/// Unloaded or out-of-range coordinates read as void tiles; this is the only
/// work done under the world lock.
#[must_use]
pub fn snapshot_tiles(world: &World, state: &ViewState) -> Vec<Tile> {
    let width = state.width.max(0) as usize;
    let height = state.height.max(0) as usize;
    let mut tiles = vec![Tile::new(TerrainId::VOID); width * height];
    for y in 0..height {
        let wy = state.view_y + y as i32;
        for x in 0..width {
            let wx = state.view_x + x as i32;
            if let Ok(tile) = world.tile(wx, wy, state.current_z) {
                tiles[y * width + x] = *tile;
            }
        }
    }
    tiles
}

/// Builds the one-row stats bar surface (width = two columns per tile).
#[must_use]
pub fn build_stats_overlay(state: &ViewState, fps: f64) -> TuiSurface {
    let mut surface = TuiSurface::new(state.width * 2, state.height);
    let bg = RgbColor::new(10, 60, 160);
    let fg = RgbColor::new(230, 240, 255);
    let text = format!(
        "Pos: ({}, {}, {}) | FPS: {fps:.1} | TPS: {:.1} | Modified: {}",
        state.view_x, state.view_y, state.current_z, state.tps, state.modified_chunk_count
    );
    let bar_width = (tileland_tui::visual_width(&text) as i32 + 4).min(surface.width());
    surface.fill_rect(0, 0, bar_width, 1, fg, bg, " ");
    surface.draw_text(1, 0, &text, fg, bg);
    surface
}

/// Merges an external overlay on top of a base surface: text wins over
/// background, painted backgrounds carry over.
#[must_use]
pub fn merge_overlays(base: &TuiSurface, top: &TuiSurface) -> TuiSurface {
    let mut merged = base.clone();
    let w = merged.width().min(top.width());
    let h = merged.height().min(top.height());
    for y in 0..h {
        for x in 0..w {
            let Some(cell) = top.cell(x, y) else { continue };
            let has_glyph = !cell.glyph.is_empty() && cell.glyph != " ";
            if !cell.has_bg && !has_glyph {
                continue;
            }
            if let Some(dst) = merged.cell_mut(x, y) {
                if has_glyph {
                    dst.glyph.clone_from(&cell.glyph);
                    dst.fg = cell.fg;
                }
                if cell.has_bg || has_glyph {
                    dst.bg = cell.bg;
                    dst.has_bg = true;
                }
            }
        }
    }
    merged
}

/// 64-bit FNV-1a over the frame rows plus the (empty) status line slot.
///
/// Cache invalidation only, not an integrity contract.
#[must_use]
pub fn frame_hash(lines: &[String]) -> u64 {
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    let mut hash = 0xCBF2_9CE4_8422_2325u64;
    let mix = |hash: &mut u64, s: &str| {
        for byte in s.bytes() {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }
        // Separator so row boundaries do not concatenate away.
        *hash ^= 0xFF;
        *hash = hash.wrapping_mul(PRIME);
    };
    for line in lines {
        mix(&mut hash, line);
    }
    mix(&mut hash, "");
    hash
}

/// Composes one frame: one ANSI string per view row.
///
/// Each tile occupies two terminal cells; overlay cells address those
/// sub-columns individually. Color SGRs are emitted only when the (fg, bg)
/// pair changes within a row, and every row ends with a reset.
#[must_use]
pub fn compose_frame(
    state: &ViewState,
    tiles: &[Tile],
    overlay: Option<(&TuiSurface, f64)>,
    backend: RenderBackend,
) -> Vec<String> {
    let width = state.width.max(0);
    let height = state.height.max(0);
    let (overlay, alpha) = match overlay {
        Some((surface, alpha)) if alpha > 0.0001 => (Some(surface), alpha),
        _ => (None, 0.0),
    };
    let alpha_fixed = (alpha.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;

    let mut lines = Vec::with_capacity(height as usize);
    for y in 0..height {
        lines.push(compose_row(
            y,
            width,
            tiles,
            overlay,
            alpha_fixed,
            backend,
        ));
    }
    lines
}

fn compose_row(
    y: i32,
    width: i32,
    tiles: &[Tile],
    overlay: Option<&TuiSurface>,
    alpha_fixed: u8,
    backend: RenderBackend,
) -> String {
    let mut line = String::with_capacity(width as usize * 40 + 16);
    append_cursor(&mut line, backend, y + 1);

    let mut last_fg = RgbColor::new(0, 0, 0);
    let mut last_bg = RgbColor::new(0, 0, 0);
    let mut color_set = false;
    let mut emit = |line: &mut String, fg: RgbColor, bg: RgbColor, glyph: &str| {
        if !color_set || fg != last_fg || bg != last_bg {
            append_color(line, backend, fg, bg);
            color_set = true;
            last_fg = fg;
            last_bg = bg;
        }
        line.push_str(glyph);
    };

    for x in 0..width {
        let tile = &tiles[(y * width + x) as usize];
        let info = terrain_info(tile.terrain);
        let map_fg = tile.effective_foreground();
        let map_bg = tile.effective_background();
        let map_glyph = if info.glyph.is_empty() { " " } else { info.glyph };

        if !info.is_visible {
            emit(&mut line, map_fg, map_bg, "  ");
            continue;
        }

        let Some(surface) = overlay else {
            emit(&mut line, map_fg, map_bg, map_glyph);
            emit(&mut line, map_fg, map_bg, map_glyph);
            continue;
        };

        // Does the overlay touch either sub-column of this tile?
        let touched = (0..2).any(|slot| {
            surface.cell(x * 2 + slot, y).is_some_and(|cell| {
                cell.has_bg
                    || is_non_black(cell.bg)
                    || (!cell.glyph.is_empty() && cell.glyph != " ")
            })
        });
        if !touched {
            emit(&mut line, map_fg, map_bg, map_glyph);
            emit(&mut line, map_fg, map_bg, map_glyph);
            continue;
        }

        for slot in 0..2 {
            let mut final_fg = map_fg;
            let mut final_bg = map_bg;
            let mut final_glyph: &str = map_glyph;

            if let Some(cell) = surface.cell(x * 2 + slot, y) {
                // A non-space glyph replaces the map glyph; a painted
                // background with a space glyph blanks the glyph instead.
                if !cell.glyph.is_empty() && cell.glyph != " " {
                    final_glyph = &cell.glyph;
                    final_fg = cell.fg;
                } else if cell.has_bg {
                    final_glyph = " ";
                    final_fg = cell.fg;
                }
                if (cell.has_bg || is_non_black(cell.bg)) && alpha_fixed > 0 {
                    final_bg = RgbColor::new(
                        blend_component(cell.bg.r, map_bg.r, alpha_fixed),
                        blend_component(cell.bg.g, map_bg.g, alpha_fixed),
                        blend_component(cell.bg.b, map_bg.b, alpha_fixed),
                    );
                }
            }
            emit(&mut line, final_fg, final_bg, final_glyph);
        }
    }

    line.push_str("\x1b[0m");
    line
}

#[inline]
fn is_non_black(c: RgbColor) -> bool {
    c.r != 0 || c.g != 0 || c.b != 0
}

/// Integer alpha blend of one channel; `alpha` is 0-255 fixed point.
#[inline]
#[must_use]
pub fn blend_component(top: u8, bottom: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(top) * a + u32::from(bottom) * (255 - a) + 127) / 255) as u8
}

fn append_cursor(line: &mut String, backend: RenderBackend, row: i32) {
    match backend {
        RenderBackend::Standard => {
            line.push_str("\x1b[");
            line.push_str(&row.to_string());
            line.push_str(";1H");
        }
        RenderBackend::Fmt => {
            use std::fmt::Write as FmtWrite;
            let _ = write!(line, "\x1b[{row};1H");
        }
    }
}

fn append_color(line: &mut String, backend: RenderBackend, fg: RgbColor, bg: RgbColor) {
    match backend {
        RenderBackend::Standard => {
            line.push_str("\x1b[48;2;");
            line.push_str(&bg.r.to_string());
            line.push(';');
            line.push_str(&bg.g.to_string());
            line.push(';');
            line.push_str(&bg.b.to_string());
            line.push_str("m\x1b[38;2;");
            line.push_str(&fg.r.to_string());
            line.push(';');
            line.push_str(&fg.g.to_string());
            line.push(';');
            line.push_str(&fg.b.to_string());
            line.push('m');
        }
        RenderBackend::Fmt => {
            use std::fmt::Write as FmtWrite;
            let _ = write!(
                line,
                "\x1b[48;2;{};{};{}m\x1b[38;2;{};{};{}m",
                bg.r, bg.g, bg.b, fg.r, fg.g, fg.b
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(width: i32, height: i32) -> ViewState {
        ViewState {
            width,
            height,
            ..ViewState::default()
        }
    }

    fn row_of(terrain: TerrainId, count: usize) -> Vec<Tile> {
        let mut tile = Tile::new(terrain);
        tile.set_explored(true);
        vec![tile; count]
    }

    #[test]
    fn test_single_terrain_row_bytes() {
        let state = view(4, 1);
        let tiles = row_of(TerrainId::GRASS, 4);
        let lines = compose_frame(&state, &tiles, None, RenderBackend::Standard);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "\x1b[1;1H\x1b[48;2;0;100;0m\x1b[38;2;0;180;0m░░░░░░░░\x1b[0m"
        );
    }

    #[test]
    fn test_invisible_terrain_emits_spaces() {
        let state = view(2, 1);
        let tiles = row_of(TerrainId::VOID, 2);
        let lines = compose_frame(&state, &tiles, None, RenderBackend::Standard);
        assert_eq!(
            lines[0],
            "\x1b[1;1H\x1b[48;2;0;0;0m\x1b[38;2;0;0;0m    \x1b[0m"
        );
    }

    #[test]
    fn test_backends_produce_identical_bytes() {
        let state = view(4, 2);
        let mut tiles = row_of(TerrainId::GRASS, 4);
        tiles.extend(row_of(TerrainId::WATER, 4));
        tiles[1].light_level = 40;

        let mut overlay = TuiSurface::new(8, 2);
        overlay.draw_text(0, 0, "hi", RgbColor::new(230, 240, 255), RgbColor::new(10, 60, 160));

        let std_lines = compose_frame(&state, &tiles, Some((&overlay, 0.5)), RenderBackend::Standard);
        let fmt_lines = compose_frame(&state, &tiles, Some((&overlay, 0.5)), RenderBackend::Fmt);
        assert_eq!(std_lines, fmt_lines);
    }

    #[test]
    fn test_light_scaling_keeps_glyphs() {
        let state = view(4, 1);
        let mut tiles = row_of(TerrainId::GRASS, 4);
        for tile in &mut tiles {
            tile.light_level = 0;
        }
        let lines = compose_frame(&state, &tiles, None, RenderBackend::Standard);
        // 10% of (0,180,0) fg and (0,100,0) bg, same glyph run.
        assert_eq!(
            lines[0],
            "\x1b[1;1H\x1b[48;2;0;10;0m\x1b[38;2;0;18;0m░░░░░░░░\x1b[0m"
        );
    }

    #[test]
    fn test_overlay_glyph_replaces_map_glyph() {
        let state = view(2, 1);
        let tiles = row_of(TerrainId::GRASS, 2);
        let mut overlay = TuiSurface::new(4, 1);
        overlay.draw_text(0, 0, "X", RgbColor::new(1, 2, 3), RgbColor::new(9, 9, 9));
        let lines = compose_frame(&state, &tiles, Some((&overlay, 1.0)), RenderBackend::Standard);
        // Slot 0 shows the overlay glyph with overlay fg and fully blended bg.
        assert!(lines[0].contains("\x1b[48;2;9;9;9m\x1b[38;2;1;2;3mX"));
        // The untouched second tile still shows the map glyph.
        assert!(lines[0].contains("░░"));
    }

    #[test]
    fn test_overlay_background_blend() {
        assert_eq!(blend_component(100, 0, 255), 100);
        assert_eq!(blend_component(100, 0, 0), 0);
        assert_eq!(blend_component(255, 0, 128), 128);
    }

    #[test]
    fn test_frame_hash_distinguishes_rows() {
        let a = vec!["one".to_string(), "two".to_string()];
        let b = vec!["onet".to_string(), "wo".to_string()];
        assert_ne!(frame_hash(&a), frame_hash(&b));
        assert_eq!(frame_hash(&a), frame_hash(&a.clone()));
    }

    #[test]
    fn test_emitter_skips_identical_frames() {
        let lines = vec!["\x1b[1;1Habc\x1b[0m".to_string()];
        let mut emitter = FrameEmitter::default();
        let mut first: Vec<u8> = Vec::new();
        emitter.emit(&lines, true, &mut first).unwrap();
        assert!(!first.is_empty());
        let mut second: Vec<u8> = Vec::new();
        emitter.emit(&lines, true, &mut second).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn test_emitter_reemits_changed_rows_only() {
        let first = vec!["row0".to_string(), "row1".to_string()];
        let mut emitter = FrameEmitter::default();
        let mut sink: Vec<u8> = Vec::new();
        emitter.emit(&first, true, &mut sink).unwrap();

        let second = vec!["row0".to_string(), "ROW1".to_string()];
        let mut out = Vec::new();
        emitter.emit(&second, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ROW1"));
        assert!(!text.contains("row0"));
    }

    #[test]
    fn test_stats_overlay_contents() {
        let state = ViewState {
            view_x: 3,
            view_y: -4,
            current_z: 0,
            width: 40,
            height: 10,
            modified_chunk_count: 2,
            tps: 60.0,
        };
        let surface = build_stats_overlay(&state, 120.0);
        let row: String = (0..surface.width())
            .filter_map(|x| surface.cell(x, 0).map(|c| c.glyph.clone()))
            .collect();
        assert!(row.contains("Pos: (3, -4, 0)"));
        assert!(row.contains("FPS: 120.0"));
        assert!(row.contains("TPS: 60.0"));
        assert!(row.contains("Modified: 2"));
    }

    #[test]
    fn test_merge_text_wins_over_background() {
        let mut base = TuiSurface::new(4, 1);
        base.fill_rect(0, 0, 4, 1, RgbColor::new(1, 1, 1), RgbColor::new(2, 2, 2), " ");
        let mut top = TuiSurface::new(4, 1);
        top.draw_text(1, 0, "z", RgbColor::new(7, 7, 7), RgbColor::new(8, 8, 8));

        let merged = merge_overlays(&base, &top);
        assert_eq!(merged.cell(1, 0).unwrap().glyph, "z");
        assert_eq!(merged.cell(1, 0).unwrap().fg, RgbColor::new(7, 7, 7));
        assert_eq!(merged.cell(1, 0).unwrap().bg, RgbColor::new(8, 8, 8));
        // Untouched cells keep the base fill.
        assert_eq!(merged.cell(0, 0).unwrap().bg, RgbColor::new(2, 2, 2));
    }

    #[test]
    fn test_snapshot_substitutes_void_for_unloaded() {
        let world = World::default();
        let state = view(2, 2);
        let tiles = snapshot_tiles(&world, &state);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.terrain == TerrainId::VOID));
    }
}
