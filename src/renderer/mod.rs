//! Renderer collaborator
//!
//! The core never touches a canvas: it describes each frame through the
//! `Renderer` primitives, in screen space.

pub mod draw_list;
pub mod shapes;

pub use draw_list::{DrawCommand, DrawList};
pub use shapes::draw_frame;

use glam::Vec2;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Colors used by the frame composition
pub mod palette {
    use super::Color;

    pub const PLAYER: Color = [0.0, 0.0, 1.0, 1.0];
    pub const GUN: Color = [0.5, 0.5, 0.5, 1.0];
    pub const BULLET: Color = [1.0, 1.0, 0.0, 1.0];
    pub const MONSTER: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HEALTH: Color = [1.0, 0.0, 0.0, 1.0];
    pub const HEALTH_BAR_BG: Color = [0.4, 0.4, 0.4, 1.0];
    pub const EXP_BAR_BG: Color = [0.27, 0.27, 0.27, 1.0];
    pub const EXP: Color = [0.0, 1.0, 0.0, 1.0];
    pub const EXP_PACK: Color = [0.0, 0.5, 0.0, 1.0];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
}

/// Screen-space drawing primitives supplied by the host
pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, color: Color);
}
