//! # TUI Painter
//!
//! Turns a surface into a single ANSI string: absolute cursor positioning
//! per row, 24-bit color SGRs emitted only when the (fg, bg) pair changes
//! since the previous emitted cell, one reset at the end.

use std::io::Write;

use tileland_world::RgbColor;

use crate::surface::TuiSurface;

/// Surface to ANSI string converter.
#[derive(Default)]
pub struct TuiPainter;

impl TuiPainter {
    /// Creates a painter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the ANSI byte stream for a surface.
    ///
    /// `origin_x`/`origin_y` are 1-based terminal coordinates of the
    /// surface's top-left corner.
    #[must_use]
    pub fn build_ansi(
        &self,
        surface: &TuiSurface,
        hide_cursor: bool,
        origin_x: i32,
        origin_y: i32,
    ) -> String {
        let cells = surface.cells();
        let mut output = String::with_capacity(cells.len() * 24 + 64);

        if hide_cursor {
            output.push_str("\x1b[?25l");
        }
        output.push_str("\x1b[0m");

        let mut current_fg = RgbColor::new(0, 0, 0);
        let mut current_bg = RgbColor::new(0, 0, 0);
        let mut has_color = false;

        for y in 0..surface.height() {
            output.push_str("\x1b[");
            output.push_str(&(origin_y + y).to_string());
            output.push(';');
            output.push_str(&origin_x.to_string());
            output.push('H');

            for x in 0..surface.width() {
                let cell = &cells[(y * surface.width() + x) as usize];
                if cell.is_continuation {
                    continue;
                }
                if !has_color || cell.fg != current_fg || cell.bg != current_bg {
                    push_color_pair(&mut output, cell.fg, cell.bg);
                    current_fg = cell.fg;
                    current_bg = cell.bg;
                    has_color = true;
                }
                output.push_str(if cell.glyph.is_empty() {
                    " "
                } else {
                    cell.glyph.as_str()
                });
            }
        }

        output.push_str("\x1b[0m");
        output
    }

    /// Builds and writes the surface to a sink, flushing afterwards.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn present<W: Write>(
        &self,
        surface: &TuiSurface,
        hide_cursor: bool,
        origin_x: i32,
        origin_y: i32,
        sink: &mut W,
    ) -> std::io::Result<()> {
        let data = self.build_ansi(surface, hide_cursor, origin_x, origin_y);
        sink.write_all(data.as_bytes())?;
        sink.flush()
    }

    /// Writes a color and cursor reset.
    ///
    /// # Errors
    ///
    /// Propagates the underlying write failure.
    pub fn reset<W: Write>(&self, sink: &mut W) -> std::io::Result<()> {
        sink.write_all(b"\x1b[0m\x1b[?25h")?;
        sink.flush()
    }
}

fn push_color_pair(output: &mut String, fg: RgbColor, bg: RgbColor) {
    output.push_str("\x1b[48;2;");
    output.push_str(&bg.r.to_string());
    output.push(';');
    output.push_str(&bg.g.to_string());
    output.push(';');
    output.push_str(&bg.b.to_string());
    output.push_str("m\x1b[38;2;");
    output.push_str(&fg.r.to_string());
    output.push(';');
    output.push_str(&fg.g.to_string());
    output.push(';');
    output.push_str(&fg.b.to_string());
    output.push('m');
}
