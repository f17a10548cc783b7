//! Host (Linux terminal) bindings for the board: keyboard input, panel
//! emulation, settings file and the headless command surface.

pub mod control;
pub mod input;
pub mod platform;
pub mod storage;
