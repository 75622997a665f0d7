//! # Input Abstraction
//!
//! The viewer core consumes an abstract event stream; how the events are
//! produced (raw terminal reads, a test script, a platform layer) is the
//! source's business.

use std::collections::VecDeque;

/// Key identifier for keyboard events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    /// Unrecognized key.
    Unknown,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// A printable character.
    Char(char),
}

/// One input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Keyboard event.
    Key {
        /// Which key.
        code: KeyCode,
        /// Control modifier held.
        ctrl: bool,
        /// Alt modifier held.
        alt: bool,
        /// Shift modifier held.
        shift: bool,
    },
    /// Mouse event in 0-based terminal cell coordinates.
    Mouse {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Button index: 0 left, 1 middle, 2 right.
        button: u8,
        /// Button pressed (vs released).
        pressed: bool,
        /// Wheel delta: +1 up, -1 down, 0 none.
        wheel: i32,
        /// Pure motion event.
        moved: bool,
    },
}

impl InputEvent {
    /// Convenience constructor for an unmodified key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key {
            code,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    /// Convenience constructor for a mouse move.
    #[must_use]
    pub const fn mouse_move(x: i32, y: i32) -> Self {
        Self::Mouse {
            x,
            y,
            button: 0,
            pressed: false,
            wheel: 0,
            moved: true,
        }
    }
}

/// A source of input events polled once per controller tick.
pub trait InputSource: Send {
    /// Drains and returns all events accumulated since the last poll.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Stops any background machinery. Default: nothing to stop.
    fn stop(&mut self) {}
}

/// An input source that never produces events.
#[derive(Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// A scripted input source: each poll yields the next prepared batch.
///
/// Used by tests and headless runs to drive the controller
/// deterministically; once the script is exhausted every poll returns the
/// quit key so the main loop terminates.
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
    quit_when_done: bool,
}

impl ScriptedInput {
    /// Creates a scripted source from per-tick event batches.
    #[must_use]
    pub fn new(frames: Vec<Vec<InputEvent>>, quit_when_done: bool) -> Self {
        Self {
            frames: frames.into(),
            quit_when_done,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        match self.frames.pop_front() {
            Some(batch) => batch,
            None if self.quit_when_done => vec![InputEvent::key(KeyCode::Escape)],
            None => Vec::new(),
        }
    }
}
