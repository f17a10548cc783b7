#![cfg_attr(not(test), no_std)]

//! Board logic: gesture decoding, app scheduling and frame production.
//!
//! Nothing here touches a clock, a terminal or a file. Time arrives as
//! `now_ms` arguments and hardware sits behind the [`display::Panel`],
//! [`input::InputProvider`] and [`settings::SettingsStore`] traits.

extern crate alloc;

pub mod app;
pub mod control;
pub mod display;
pub mod frame;
pub mod gesture;
pub mod input;
pub mod registry;
pub mod scheduler;
pub mod settings;
