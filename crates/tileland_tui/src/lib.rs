//! # Tileland TUI
//!
//! Off-screen cell surfaces, UTF-8 visual width handling and the painter
//! that turns a surface into one ANSI escape string.
//!
//! Surfaces are plain CPU buffers; composition (overlays, alpha blending)
//! happens cell by cell before anything reaches the terminal, so the painter
//! can diff-suppress color changes and emit a minimal byte stream.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod painter;
pub mod surface;
pub mod width;

pub use painter::TuiPainter;
pub use surface::{BoxStyle, TuiCell, TuiSurface};
pub use width::{char_width, strip_ansi, trim_to_width, visual_width};
