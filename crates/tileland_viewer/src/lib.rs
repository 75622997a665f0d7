//! # Tileland Viewer
//!
//! The asynchronous chunk pipeline and the terminal render loop.
//!
//! ## Thread Model
//!
//! - The **controller** thread owns the world and is the only mutator of the
//!   loaded-chunk map and the pending set
//! - The **render** thread holds the world lock only while copying the
//!   visible tile rectangle, then composes and emits frames lock-free
//! - **Pool workers** never see the world at all: they hold the generator
//!   and fill detached chunks that the controller adopts
//!
//! ```text
//! input ──> controller ──requests──> pool workers
//!              │  ^                      │
//!              │  └──────finished────────┘
//!              v
//!        world (mutex) ──snapshot──> render thread ──ANSI──> stdout
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod input;
pub mod pool;
pub mod render;
pub mod settings;

pub use controller::ViewerController;
pub use input::{InputEvent, InputSource, KeyCode, NullInput, ScriptedInput};
pub use pool::ChunkGeneratorPool;
pub use render::{RenderBackend, RenderConfig, RenderLoop, ViewState};
pub use settings::{NoiseSettings, Settings};
