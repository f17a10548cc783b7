//! Drawing surface and panel sink abstraction.

/// Full-panel drawing surface handed to apps each frame.
pub type Canvas = hub75_fb::FrameBuffer;

/// Panel that accepts finished frames.
pub trait Panel {
    type Error: core::fmt::Debug;

    /// Pushes `frame` to the physical (or emulated) panel.
    fn sync(&mut self, frame: &Canvas) -> Result<(), Self::Error>;

    /// Turns every pixel off.
    fn blank(&mut self) -> Result<(), Self::Error> {
        self.sync(&Canvas::new())
    }
}
