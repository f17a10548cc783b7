//! Input abstraction layer.

mod scripted;

pub use scripted::ScriptedInput;

/// Physical keys the board reacts to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum KeyId {
    /// Press/tap/hold key.
    Activate,
    RotateLeft,
    RotateRight,
    /// Consumed by the entry point, never decoded into a gesture.
    Quit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Edge {
    Down,
    Up,
}

/// One raw key edge stamped with the monotonic time it was observed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputEvent {
    pub key: KeyId,
    pub edge: Edge,
    pub at_ms: u64,
}

impl InputEvent {
    pub const fn new(key: KeyId, edge: Edge, at_ms: u64) -> Self {
        Self { key, edge, at_ms }
    }

    pub const fn down(key: KeyId, at_ms: u64) -> Self {
        Self::new(key, Edge::Down, at_ms)
    }

    pub const fn up(key: KeyId, at_ms: u64) -> Self {
        Self::new(key, Edge::Up, at_ms)
    }
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}
