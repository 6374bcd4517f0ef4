//! Keyboard and virtual-joystick input

use glam::Vec2;

use crate::consts::JOYSTICK_DEAD_ZONE;
use crate::sim::TickInput;

/// Anything that can report the current directional intents
pub trait InputSource {
    fn sample(&self) -> TickInput;
}

/// Fixed input, handy for scripted drivers
impl InputSource for TickInput {
    fn sample(&self) -> TickInput {
        *self
    }
}

/// Directional keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            _ => None,
        }
    }
}

/// Current pressed-direction flags, fed by key events or the joystick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    directions: TickInput,
}

impl InputState {
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Up => self.directions.up = pressed,
            Key::Down => self.directions.down = pressed,
            Key::Left => self.directions.left = pressed,
            Key::Right => self.directions.right = pressed,
        }
    }

    /// Handle a key event by name; returns false for keys the game ignores
    pub fn handle_key(&mut self, name: &str, pressed: bool) -> bool {
        match Key::from_key_name(name) {
            Some(key) => {
                self.set_key(key, pressed);
                true
            }
            None => false,
        }
    }

    pub fn set_directions(&mut self, directions: TickInput) {
        self.directions = directions;
    }

    pub fn release_all(&mut self) {
        self.directions = TickInput::default();
    }
}

impl InputSource for InputState {
    fn sample(&self) -> TickInput {
        self.directions
    }
}

/// Convert an analog offset (screen space, y down) into directions.
///
/// The offset is clamped to `radius` first; each axis beyond `dead_zone`
/// presses that direction.
pub fn analog_to_directions(offset: Vec2, radius: f32, dead_zone: f32) -> TickInput {
    let offset = offset.clamp_length_max(radius.max(0.0));
    TickInput {
        up: offset.y < -dead_zone,
        down: offset.y > dead_zone,
        left: offset.x < -dead_zone,
        right: offset.x > dead_zone,
    }
}

/// On-screen joystick centered on its outer ring
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualJoystick {
    center: Vec2,
    radius: f32,
    dead_zone: f32,
    knob: Vec2,
    active: bool,
}

impl VirtualJoystick {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            dead_zone: JOYSTICK_DEAD_ZONE,
            knob: Vec2::ZERO,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Knob offset from the center, already clamped to the ring
    pub fn knob_offset(&self) -> Vec2 {
        self.knob
    }

    pub fn touch_start(&mut self, pos: Vec2, input: &mut InputState) {
        self.active = true;
        self.touch_move(pos, input);
    }

    pub fn touch_move(&mut self, pos: Vec2, input: &mut InputState) {
        if !self.active {
            return;
        }
        self.knob = (pos - self.center).clamp_length_max(self.radius);
        input.set_directions(analog_to_directions(self.knob, self.radius, self.dead_zone));
    }

    /// Recenter the knob and release every direction
    pub fn touch_end(&mut self, input: &mut InputState) {
        self.active = false;
        self.knob = Vec2::ZERO;
        input.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_events() {
        let mut input = InputState::default();
        assert!(input.handle_key("ArrowUp", true));
        assert!(input.handle_key("ArrowLeft", true));
        assert!(!input.handle_key("Space", true));
        let d = input.sample();
        assert!(d.up && d.left && !d.down && !d.right);

        input.handle_key("ArrowUp", false);
        assert!(!input.sample().up);
    }

    #[test]
    fn test_dead_zone() {
        let d = analog_to_directions(Vec2::new(9.0, -9.0), 60.0, 10.0);
        assert_eq!(d, TickInput::default());

        let d = analog_to_directions(Vec2::new(30.0, -11.0), 60.0, 10.0);
        assert!(d.right && d.up && !d.left && !d.down);
    }

    #[test]
    fn test_magnitude_clamped_before_threshold() {
        // (1000, 12) shrinks to ~(60, 0.72): the small axis falls inside the dead zone
        let d = analog_to_directions(Vec2::new(1000.0, 12.0), 60.0, 10.0);
        assert!(d.right);
        assert!(!d.down);
    }

    #[test]
    fn test_joystick_drag_and_release() {
        let mut input = InputState::default();
        let mut stick = VirtualJoystick::new(Vec2::new(100.0, 500.0), 60.0);

        stick.touch_move(Vec2::new(0.0, 500.0), &mut input);
        assert_eq!(input.sample(), TickInput::default(), "inactive stick ignored");

        stick.touch_start(Vec2::new(100.0, 400.0), &mut input);
        assert!(input.sample().up);
        assert!((stick.knob_offset().length() - 60.0).abs() < 1e-4);

        stick.touch_move(Vec2::new(150.0, 500.0), &mut input);
        let d = input.sample();
        assert!(d.right && !d.up);

        stick.touch_end(&mut input);
        assert!(!stick.is_active());
        assert_eq!(input.sample(), TickInput::default());
        assert_eq!(stick.knob_offset(), Vec2::ZERO);
    }
}
