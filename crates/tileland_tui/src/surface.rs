//! # TUI Surface
//!
//! A width x height grid of colored glyph cells, drawn into off-screen and
//! composited over the map layer by the renderer. Wide glyphs occupy two
//! cells: the first carries the glyph, the second is flagged as a
//! continuation and never emits anything of its own.

use tileland_world::RgbColor;

use crate::width::{char_width, visual_width};

/// One terminal cell: glyph plus colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuiCell {
    /// UTF-8 glyph; empty for continuation cells.
    pub glyph: String,
    /// Foreground color.
    pub fg: RgbColor,
    /// Background color.
    pub bg: RgbColor,
    /// Whether the background was explicitly painted (vs the default fill).
    pub has_bg: bool,
    /// Second column of a double-width glyph.
    pub is_continuation: bool,
}

impl Default for TuiCell {
    fn default() -> Self {
        Self {
            glyph: " ".to_string(),
            fg: RgbColor::new(255, 255, 255),
            bg: RgbColor::new(0, 0, 0),
            has_bg: false,
            is_continuation: false,
        }
    }
}

/// Frame border glyphs (plain ASCII for broad terminal compatibility).
#[derive(Clone, Copy, Debug)]
pub struct BoxStyle {
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Horizontal edge.
    pub horizontal: char,
    /// Vertical edge.
    pub vertical: char,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }
}

/// An off-screen cell grid.
#[derive(Clone)]
pub struct TuiSurface {
    width: i32,
    height: i32,
    cells: Vec<TuiCell>,
}

impl TuiSurface {
    /// Creates a surface of default cells; dimensions are clamped to >= 1.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![TuiCell::default(); (width * height) as usize],
        }
    }

    /// Surface width in terminal columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Surface height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Resizes the surface, resetting every cell to the default.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.cells.clear();
        self.cells
            .resize((self.width * self.height) as usize, TuiCell::default());
    }

    /// Row-major cell storage.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[TuiCell] {
        &self.cells
    }

    /// Cell at a position, if in bounds.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&TuiCell> {
        self.in_bounds(x, y)
            .then(|| &self.cells[(y * self.width + x) as usize])
    }

    /// Mutable cell at a position, if in bounds. Used when compositing
    /// overlay layers.
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut TuiCell> {
        if self.in_bounds(x, y) {
            let idx = (y * self.width + x) as usize;
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Fills the whole surface with one glyph and color pair.
    pub fn clear(&mut self, fg: RgbColor, bg: RgbColor, glyph: &str) {
        self.fill_rect(0, 0, self.width, self.height, fg, bg, glyph);
    }

    /// Fills a rectangle; the glyph's first character is used per cell.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, fg: RgbColor, bg: RgbColor, glyph: &str) {
        let glyph: String = glyph.chars().next().unwrap_or(' ').to_string();
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width);
        let y1 = (y + h).min(self.height);
        for yy in y0..y1 {
            for xx in x0..x1 {
                let cell = &mut self.cells[(yy * self.width + xx) as usize];
                cell.glyph.clone_from(&glyph);
                cell.fg = fg;
                cell.bg = bg;
                cell.has_bg = true;
                cell.is_continuation = false;
            }
        }
    }

    /// Draws text honoring visual width; double-width glyphs mark their
    /// second column as a continuation cell.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, fg: RgbColor, bg: RgbColor) {
        if y < 0 || y >= self.height {
            return;
        }
        let mut cursor_x = x;
        for c in text.chars() {
            let w = char_width(c) as i32;
            if cursor_x >= self.width {
                break;
            }
            if w == 2 && cursor_x + 1 >= self.width {
                break;
            }
            if cursor_x >= 0 {
                if let Some(cell) = self.cell_mut(cursor_x, y) {
                    cell.glyph = c.to_string();
                    cell.fg = fg;
                    cell.bg = bg;
                    cell.has_bg = true;
                    cell.is_continuation = false;
                }
                if w == 2 {
                    if let Some(cont) = self.cell_mut(cursor_x + 1, y) {
                        cont.glyph.clear();
                        cont.fg = fg;
                        cont.bg = bg;
                        cont.has_bg = true;
                        cont.is_continuation = true;
                    }
                }
            }
            cursor_x += w;
        }
    }

    /// Draws text centered inside `[x, x + area_width)`.
    pub fn draw_centered_text(
        &mut self,
        x: i32,
        y: i32,
        area_width: i32,
        text: &str,
        fg: RgbColor,
        bg: RgbColor,
    ) {
        let text_width = visual_width(text) as i32;
        let start_x = x + ((area_width.max(0) - text_width) / 2).max(0);
        self.draw_text(start_x, y, text, fg, bg);
    }

    /// Draws a rectangular frame with the given border style.
    pub fn draw_frame(&mut self, x: i32, y: i32, w: i32, h: i32, style: &BoxStyle, fg: RgbColor, bg: RgbColor) {
        if w < 2 || h < 2 {
            return;
        }
        self.fill_rect(x, y, w, h, fg, bg, " ");

        let mut set = |px: i32, py: i32, glyph: char| {
            if let Some(cell) = self.cell_mut(px, py) {
                cell.glyph = glyph.to_string();
                cell.fg = fg;
                cell.bg = bg;
                cell.has_bg = true;
                cell.is_continuation = false;
            }
        };

        for xx in 1..w - 1 {
            set(x + xx, y, style.horizontal);
            set(x + xx, y + h - 1, style.horizontal);
        }
        for yy in 1..h - 1 {
            set(x, y + yy, style.vertical);
            set(x + w - 1, y + yy, style.vertical);
        }
        set(x, y, style.top_left);
        set(x + w - 1, y, style.top_right);
        set(x, y + h - 1, style.bottom_left);
        set(x + w - 1, y + h - 1, style.bottom_right);
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}
