//! Input adapters: keyboard, pointer gestures, device compass.
//!
//! Adapters own no viewer state. Each call takes an explicit
//! `&mut Engine`; the only state kept here is adapter-local
//! (tracking flags, presentation toggles).

pub mod compass;
pub mod gesture;
pub mod keyboard;

pub use compass::*;
pub use gesture::*;
pub use keyboard::*;
