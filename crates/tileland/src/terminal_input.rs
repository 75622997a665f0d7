//! Stdin-backed input source.
//!
//! A background thread reads raw bytes from stdin and parses them into the
//! viewer's abstract events: printable characters, Escape, Enter, Tab and
//! CSI arrow sequences. Terminal mode handling (raw/noncanonical switching)
//! is left to the invoking environment.

use std::io::Read;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use tileland_viewer::{InputEvent, InputSource, KeyCode};

pub struct TerminalInput {
    events: Receiver<InputEvent>,
    reader: Option<JoinHandle<()>>,
}

impl TerminalInput {
    /// Spawns the stdin reader thread.
    pub fn start() -> Self {
        let (tx, rx) = channel();
        let reader = std::thread::Builder::new()
            .name("stdin-input".to_string())
            .spawn(move || reader_loop(&tx))
            .expect("spawning stdin reader");
        Self {
            events: rx,
            reader: Some(reader),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    fn stop(&mut self) {
        // The reader thread blocks on stdin; dropping the handle instead of
        // joining avoids hanging shutdown on a quiet terminal.
        self.reader.take();
    }
}

fn reader_loop(tx: &Sender<InputEvent>) {
    let mut stdin = std::io::stdin().lock();
    let mut buf = [0u8; 64];
    let mut pending: Vec<u8> = Vec::new();

    loop {
        let n = match stdin.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        pending.extend_from_slice(&buf[..n]);

        while let Some((event, consumed)) = parse_event(&pending) {
            pending.drain(..consumed);
            if let Some(event) = event {
                if tx.send(event).is_err() {
                    return;
                }
            }
        }
    }
}

/// Parses one event from the front of the buffer.
///
/// Returns `None` when more bytes are needed, otherwise the event (or `None`
/// for ignorable bytes) and the number of bytes consumed.
fn parse_event(bytes: &[u8]) -> Option<(Option<InputEvent>, usize)> {
    let first = *bytes.first()?;
    if first == 0x1b {
        match bytes.get(1) {
            Some(b'[') => {
                let code = *bytes.get(2)?;
                let key = match code {
                    b'A' => Some(KeyCode::ArrowUp),
                    b'B' => Some(KeyCode::ArrowDown),
                    b'C' => Some(KeyCode::ArrowRight),
                    b'D' => Some(KeyCode::ArrowLeft),
                    _ => None,
                };
                return Some((key.map(InputEvent::key), 3));
            }
            // A lone ESC, or ESC followed by a non-CSI byte: Escape. Arrow
            // sequences arrive in one read, so this rarely misfires.
            Some(_) | None => return Some((Some(InputEvent::key(KeyCode::Escape)), 1)),
        }
    }

    let event = match first {
        b'\r' | b'\n' => Some(InputEvent::key(KeyCode::Enter)),
        b'\t' => Some(InputEvent::key(KeyCode::Tab)),
        b if b.is_ascii_graphic() || b == b' ' => {
            Some(InputEvent::key(KeyCode::Char(char::from(b))))
        }
        _ => None,
    };
    Some((event, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_characters_and_arrows() {
        assert_eq!(
            parse_event(b"w"),
            Some((Some(InputEvent::key(KeyCode::Char('w'))), 1))
        );
        assert_eq!(
            parse_event(b"\x1b[A"),
            Some((Some(InputEvent::key(KeyCode::ArrowUp)), 3))
        );
        assert_eq!(
            parse_event(b"\x1b[D"),
            Some((Some(InputEvent::key(KeyCode::ArrowLeft)), 3))
        );
    }

    #[test]
    fn test_partial_csi_waits_for_more_bytes() {
        assert_eq!(parse_event(b"\x1b["), None);
    }

    #[test]
    fn test_unknown_csi_consumed_silently() {
        assert_eq!(parse_event(b"\x1b[Z"), Some((None, 3)));
    }
}
