//! # Viewer Controller
//!
//! Orchestrates the pool, the render loop and the input source. The
//! controller thread is the only mutator of the world map and the pending
//! set; workers generate detached chunks that are adopted here under the
//! world lock.
//!
//! ## Shutdown Order
//!
//! Render thread first (stops reading the world), then input, then the pool
//! (joins workers, abandoning queued requests), and only then is the world
//! dropped.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tileland_tui::TuiSurface;
use tileland_world::{
    floor_div, generator_from_metadata, ChunkCoord, RgbColor, World, CHUNK_DEPTH, CHUNK_HEIGHT,
    CHUNK_WIDTH,
};

use crate::input::{InputEvent, InputSource, KeyCode};
use crate::pool::ChunkGeneratorPool;
use crate::render::{RenderBackend, RenderConfig, RenderLoop, ViewState};
use crate::settings::Settings;

/// Chunk radius requested around the visible rectangle.
const PRELOAD_RADIUS: i32 = 1;

/// The top-level viewer: world ownership, view state, chunk pipeline.
pub struct ViewerController {
    world: Arc<Mutex<World>>,
    pool: ChunkGeneratorPool,
    renderer: RenderLoop,
    input: Box<dyn InputSource>,
    settings: Settings,

    pending: HashSet<ChunkCoord>,
    modified: HashSet<ChunkCoord>,

    view_x: i32,
    view_y: i32,
    current_z: i32,
    view_width: i32,
    view_height: i32,
    running: bool,

    mouse_x: i32,
    mouse_y: i32,

    current_tps: f64,
    tick_count: u32,
    tps_window: Instant,
}

impl ViewerController {
    /// Builds the controller around a world.
    ///
    /// The world's generator is re-aligned with its saved metadata (if any)
    /// before the pool clones it, so freshly generated chunks match the
    /// loaded terrain.
    #[must_use]
    pub fn new(mut world: World, settings: Settings, input: Box<dyn InputSource>) -> Self {
        if let Some(meta) = world.metadata().cloned() {
            world.set_generator(generator_from_metadata(&meta));
        }
        let generator = world.generator();
        let world = Arc::new(Mutex::new(world));

        let pool = ChunkGeneratorPool::new(generator, None);
        let renderer = RenderLoop::new(
            Arc::clone(&world),
            RenderConfig {
                stats_alpha: settings.stats_overlay_alpha,
                enable_stats: settings.enable_stats_overlay,
                enable_diff: settings.enable_diff_rendering,
                fps_cap: settings.target_fps,
                backend: if settings.use_fmt_renderer {
                    RenderBackend::Fmt
                } else {
                    RenderBackend::Standard
                },
            },
        );

        Self {
            world,
            pool,
            renderer,
            input,
            view_width: settings.view_width,
            view_height: settings.view_height,
            settings,
            pending: HashSet::new(),
            modified: HashSet::new(),
            view_x: 0,
            view_y: 0,
            current_z: 0,
            running: true,
            mouse_x: -1,
            mouse_y: -1,
            current_tps: 0.0,
            tick_count: 0,
            tps_window: Instant::now(),
        }
    }

    /// Shared handle to the world (e.g. for saving on exit).
    #[must_use]
    pub fn world(&self) -> Arc<Mutex<World>> {
        Arc::clone(&self.world)
    }

    /// Marks a chunk as modified; the count feeds the stats bar.
    pub fn mark_chunk_modified(&mut self, coord: ChunkCoord) {
        self.modified.insert(coord);
    }

    /// The set of modified chunk coordinates.
    #[must_use]
    pub fn modified_chunks(&self) -> &HashSet<ChunkCoord> {
        &self.modified
    }

    /// Current view origin and layer.
    #[must_use]
    pub const fn view_position(&self) -> (i32, i32, i32) {
        (self.view_x, self.view_y, self.current_z)
    }

    /// Number of chunk requests awaiting completion.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clears the terminal, hides the cursor and synchronously loads the
    /// chunks under the initial view.
    ///
    /// # Errors
    ///
    /// Propagates terminal write failures.
    pub fn initialize(&mut self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(b"\x1b[2J\x1b[H\x1b[?25l")?;
        stdout.flush()?;

        let (min_cx, max_cx, min_cy, max_cy, cz) = self.view_chunk_bounds();
        let mut world = self.world.lock();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                for dz in -1..=1 {
                    world.get_or_load_chunk(ChunkCoord::new(cx, cy, cz + dz));
                }
            }
        }
        Ok(())
    }

    /// Runs the main loop at the configured tick rate until quit.
    ///
    /// # Errors
    ///
    /// Propagates terminal write failures from initialization and shutdown.
    pub fn run(&mut self) -> std::io::Result<()> {
        self.initialize()?;
        self.renderer.start();

        let tick_duration = Duration::from_secs_f64(1.0 / self.settings.target_tps.max(1.0));
        while self.running {
            let tick_start = Instant::now();
            self.step();

            let elapsed = tick_start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            }
            self.account_tick();
        }

        self.shutdown()
    }

    /// Executes one controller tick: input, adoption, view-state publish,
    /// preload. No sleeping, no terminal writes.
    pub fn step(&mut self) {
        self.handle_input();
        self.adopt_finished_chunks();
        self.renderer.update_view_state(ViewState {
            view_x: self.view_x,
            view_y: self.view_y,
            current_z: self.current_z,
            width: self.view_width,
            height: self.view_height,
            modified_chunk_count: self.modified.len(),
            tps: self.current_tps,
        });
        self.preload_chunks();
    }

    fn account_tick(&mut self) {
        self.tick_count += 1;
        let window = self.tps_window.elapsed();
        if window >= Duration::from_secs(1) {
            self.current_tps = f64::from(self.tick_count) / window.as_secs_f64();
            self.tick_count = 0;
            self.tps_window = Instant::now();
        }
    }

    fn shutdown(&mut self) -> std::io::Result<()> {
        self.renderer.stop();
        self.input.stop();
        self.pool.stop();

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(b"\x1b[2J\x1b[H\x1b[?25h")?;
        stdout.flush()
    }

    fn handle_input(&mut self) {
        for event in self.input.poll_events() {
            match event {
                InputEvent::Key { code, .. } => match code {
                    KeyCode::Char('w' | 'W') | KeyCode::ArrowUp => self.view_y -= 1,
                    KeyCode::Char('s' | 'S') | KeyCode::ArrowDown => self.view_y += 1,
                    KeyCode::Char('a' | 'A') => self.view_x -= 1,
                    KeyCode::Char('d' | 'D') => self.view_x += 1,
                    KeyCode::ArrowLeft => self.current_z -= 1,
                    KeyCode::ArrowRight => self.current_z += 1,
                    KeyCode::Char('q' | 'Q') | KeyCode::Escape => self.running = false,
                    _ => {}
                },
                InputEvent::Mouse { x, y, .. } => {
                    if self.settings.enable_mouse_cross {
                        self.mouse_x = x;
                        self.mouse_y = y;
                        self.rebuild_mouse_overlay();
                    }
                }
            }
        }
    }

    fn rebuild_mouse_overlay(&mut self) {
        let overlay_w = self.view_width * 2;
        let overlay_h = self.view_height;

        // Outside the view: back to the default overlay (the stats bar).
        if self.mouse_x < 0
            || self.mouse_y < 0
            || self.mouse_x >= overlay_w
            || self.mouse_y >= overlay_h
        {
            self.renderer.clear_ui_layer();
            return;
        }

        let white = RgbColor::new(255, 255, 255);
        let tile_x = self.mouse_x / 2;
        let tile_y = self.mouse_y;

        let mut surface = TuiSurface::new(overlay_w, overlay_h);
        surface.fill_rect(0, tile_y, overlay_w, 1, white, white, " ");
        surface.fill_rect(tile_x * 2, 0, 2, overlay_h, white, white, " ");

        self.renderer
            .set_ui_layer(Arc::new(surface), self.settings.mouse_cross_alpha);
    }

    fn adopt_finished_chunks(&mut self) {
        let chunks = self.pool.drain_finished();
        if chunks.is_empty() {
            return;
        }
        let mut world = self.world.lock();
        for chunk in chunks {
            let coord = chunk.coord();
            self.pending.remove(&coord);
            // First write wins; a duplicate result is dropped here.
            if world.chunk(coord).is_none() {
                world.add_chunk(chunk);
            }
        }
    }

    fn preload_chunks(&mut self) {
        let (min_cx, max_cx, min_cy, max_cy, cz) = self.view_chunk_bounds();
        for cx in (min_cx - PRELOAD_RADIUS)..=(max_cx + PRELOAD_RADIUS) {
            for cy in (min_cy - PRELOAD_RADIUS)..=(max_cy + PRELOAD_RADIUS) {
                for dz in -1..=1 {
                    let coord = ChunkCoord::new(cx, cy, cz + dz);
                    if self.pending.contains(&coord) {
                        continue;
                    }
                    let loaded = self.world.lock().chunk(coord).is_some();
                    if loaded {
                        continue;
                    }
                    self.pending.insert(coord);
                    self.pool.request_chunk(coord);
                }
            }
        }
    }

    fn view_chunk_bounds(&self) -> (i32, i32, i32, i32, i32) {
        (
            floor_div(self.view_x, CHUNK_WIDTH as i32),
            floor_div(self.view_x + self.view_width, CHUNK_WIDTH as i32),
            floor_div(self.view_y, CHUNK_HEIGHT as i32),
            floor_div(self.view_y + self.view_height, CHUNK_HEIGHT as i32),
            floor_div(self.current_z, CHUNK_DEPTH as i32),
        )
    }
}
