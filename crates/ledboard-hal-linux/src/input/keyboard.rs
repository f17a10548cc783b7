use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ledboard_core::input::{InputEvent, InputProvider, KeyId};

#[derive(Debug, Clone, Copy)]
pub struct KeyboardConfig {
    poll_timeout_ms: u32,
    release_events: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 50,
            release_events: true,
        }
    }
}

impl KeyboardConfig {
    /// How long one `poll_event` call may block waiting for a key.
    pub const fn with_poll_timeout_ms(mut self, poll_timeout_ms: u32) -> Self {
        self.poll_timeout_ms = poll_timeout_ms;
        self
    }

    /// Whether the terminal reports key releases. Without them every press
    /// is followed by a synthetic release at the same instant.
    pub const fn with_release_events(mut self, release_events: bool) -> Self {
        self.release_events = release_events;
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyboardInputError {
    Io(io::ErrorKind),
}

impl From<io::Error> for KeyboardInputError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Terminal keyboard mapped onto the board's keys.
///
/// Space/Enter press, Left/`a` and Right/`d` rotate, `q`/Esc/Ctrl-C quit.
#[derive(Debug)]
pub struct KeyboardInput {
    config: KeyboardConfig,
    clock: fn() -> u64,
    pending_event: Option<InputEvent>,
}

impl KeyboardInput {
    pub fn new(config: KeyboardConfig, clock: fn() -> u64) -> Self {
        Self {
            config,
            clock,
            pending_event: None,
        }
    }

    fn translate(&mut self, key: KeyEvent, at_ms: u64) -> Option<InputEvent> {
        let key_id = map_key(&key)?;
        match key.kind {
            KeyEventKind::Repeat => None,
            KeyEventKind::Release => Some(InputEvent::up(key_id, at_ms)),
            KeyEventKind::Press => {
                if !self.config.release_events {
                    self.pending_event = Some(InputEvent::up(key_id, at_ms));
                }
                Some(InputEvent::down(key_id, at_ms))
            }
        }
    }
}

pub fn map_key(key: &KeyEvent) -> Option<KeyId> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(KeyId::Quit);
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(KeyId::Activate),
        KeyCode::Left | KeyCode::Char('a') => Some(KeyId::RotateLeft),
        KeyCode::Right | KeyCode::Char('d') => Some(KeyId::RotateRight),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyId::Quit),
        _ => None,
    }
}

impl InputProvider for KeyboardInput {
    type Error = KeyboardInputError;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        if let Some(event) = self.pending_event.take() {
            return Ok(Some(event));
        }

        let timeout = Duration::from_millis(self.config.poll_timeout_ms as u64);
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                let at_ms = (self.clock)();
                Ok(self.translate(key, at_ms))
            }
            _ => Ok(None),
        }
    }
}
