//! Horde Survivor - A top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Simulation context, entities, collisions, spawner, upgrades, game loop
//! - `platform`: Input adapters (keyboard, virtual joystick)
//! - `renderer`: Renderer collaborator trait and frame composition
//! - `tuning`: Data-driven game balance
//! - `error`: Error types for config loading and upgrade selection

pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{SelectError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Viewport size (the camera keeps the player centered in it)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Largest frame delta the simulation accepts (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Player body
    pub const PLAYER_RADIUS: f32 = 15.0;
    /// Fraction of the remaining angle the aim turns per tick
    pub const AIM_LERP: f32 = 0.1;
    /// Per-tick step of the animated health/exp bars
    pub const DISPLAY_ANIMATION_STEP: f32 = 3.0;
    /// Differences below this are treated as already caught up
    pub const DISPLAY_EPSILON: f32 = 0.01;

    /// Bullets spawn this far along the facing angle
    pub const MUZZLE_OFFSET: f32 = 40.0;
    pub const BULLET_RADIUS: f32 = 10.0;
    /// Bullets live until they leave the viewport by this margin
    pub const BULLET_CULL_MARGIN: f32 = 500.0;

    pub const MONSTER_RADIUS: f32 = 10.0;
    /// Monsters never drift further than this from the player
    pub const MONSTER_LEASH: f32 = 1000.0;
    /// Perpendicular spawn distance from the player
    pub const SPAWN_OFFSET: f32 = 800.0;

    pub const EXP_PACK_RADIUS: f32 = 10.0;

    /// Virtual joystick dead zone (screen units)
    pub const JOYSTICK_DEAD_ZONE: f32 = 10.0;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
