//! Level-driven monster spawning
//!
//! The cadence is an elapsed-time accumulator advanced inside the tick, so
//! spawns interleave with the simulation without a separate timer.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// Shortest period the cadence will run at, whatever the tuning says
pub const SPAWN_PERIOD_FLOOR_MS: f32 = 1.0;

/// Spawn period for a player level: `max(base / level, min)`.
/// Level 0 is treated as level 1; zero, negative or NaN periods clamp to
/// `SPAWN_PERIOD_FLOOR_MS`.
pub fn spawn_interval_ms(level: u32, base_ms: f32, min_ms: f32) -> f32 {
    (base_ms / level.max(1) as f32)
        .max(min_ms)
        .max(SPAWN_PERIOD_FLOOR_MS)
}

/// Recurring spawn cadence tied to the player's level
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    armed_level: u32,
    period_ms: f32,
    accumulator_ms: f32,
    base_ms: f32,
    min_ms: f32,
}

impl Spawner {
    pub fn new(level: u32, tuning: &Tuning) -> Self {
        let base_ms = tuning.base_spawn_interval_ms;
        let min_ms = tuning.min_spawn_interval_ms;
        Self {
            armed_level: level,
            period_ms: spawn_interval_ms(level, base_ms, min_ms),
            accumulator_ms: 0.0,
            base_ms,
            min_ms,
        }
    }

    pub fn period_ms(&self) -> f32 {
        self.period_ms
    }

    pub fn armed_level(&self) -> u32 {
        self.armed_level
    }

    /// Tear down and re-arm the cadence if the level changed.
    ///
    /// Progress toward the next spawn is discarded, so the new period counts
    /// from now. Returns whether a re-arm happened.
    pub fn sync_level(&mut self, level: u32) -> bool {
        if level == self.armed_level {
            return false;
        }
        self.armed_level = level;
        self.period_ms = spawn_interval_ms(level, self.base_ms, self.min_ms);
        self.accumulator_ms = 0.0;
        log::debug!("Spawner re-armed for level {level}: every {}ms", self.period_ms);
        true
    }

    /// Advance by `dt_ms` and return how many spawns are due
    pub fn advance(&mut self, dt_ms: f32) -> usize {
        if !(dt_ms > 0.0) {
            return 0;
        }
        self.accumulator_ms += dt_ms;
        let mut due = 0;
        while self.accumulator_ms >= self.period_ms {
            self.accumulator_ms -= self.period_ms;
            due += 1;
        }
        due
    }
}

/// Side of the player a monster enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnSide {
    pub const ALL: [SpawnSide; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Position on this side: `offset` away perpendicular, `jitter` in [-offset, offset] along it
    pub fn position(self, around: Vec2, offset: f32, jitter: f32) -> Vec2 {
        match self {
            Self::Top => Vec2::new(around.x + jitter, around.y - offset),
            Self::Right => Vec2::new(around.x + offset, around.y + jitter),
            Self::Bottom => Vec2::new(around.x + jitter, around.y + offset),
            Self::Left => Vec2::new(around.x - offset, around.y + jitter),
        }
    }
}

/// Random spawn point just outside view, relative to `around`
pub fn spawn_position<R: Rng + ?Sized>(rng: &mut R, around: Vec2, offset: f32) -> Vec2 {
    let side = SpawnSide::ALL[rng.random_range(0..SpawnSide::ALL.len())];
    let jitter = rng.random::<f32>() * offset * 2.0 - offset;
    side.position(around, offset, jitter)
}
