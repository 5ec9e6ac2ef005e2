//! Platform layer
//!
//! Keyboard snapshotting works everywhere; the canvas backend, timestamps and
//! visibility helpers exist only in the browser build.

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::KeyTracker;
