//! Platform abstraction layer
//!
//! Narrow seams between the kernel and the host:
//! - Keyboard state with edge-triggered one-shot presses
//! - Fixed-timestep clock

pub mod input;
pub mod time;

pub use input::{InputSource, Key, Keyboard, SharedKeyboard};
pub use time::FixedTimestep;
