//! Platform abstraction layer
//!
//! Turns host input (key events, touch drags) into the directional intents
//! the simulation consumes each tick.

pub mod input;

pub use input::{InputSource, InputState, Key, VirtualJoystick, analog_to_directions};
