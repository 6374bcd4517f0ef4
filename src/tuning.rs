//! Data-driven game balance
//!
//! Every knob has a default matching the shipped game; a JSON file may
//! override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Balance values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Movement per tick (not dt-scaled)
    pub player_speed: f32,
    pub player_health: f32,
    pub player_attack: f32,
    /// Damage-reduction fraction
    pub player_defense: f32,
    /// Exp needed for the first level-up (doubles every level)
    pub exp_to_first_level: f32,
    /// Health after level-up = base + level * per_level
    pub level_health_base: f32,
    pub level_health_per_level: f32,
    /// Movement speed gained on every level-up
    pub level_speed_bonus: f32,

    // === Weapon ===
    pub shoot_interval_ms: f32,
    pub bullet_speed: f32,

    // === Monsters ===
    pub monster_base_speed: f32,
    /// Speed gained per minute of session time
    pub monster_speed_per_minute: f32,
    /// Optional ceiling on monster speed (none by default)
    pub monster_max_speed: Option<f32>,
    pub monster_health: f32,
    pub monster_exp_reward: f32,

    // === Spawning ===
    pub base_spawn_interval_ms: f32,
    pub min_spawn_interval_ms: f32,
    /// Monsters placed around the player when a session starts
    pub initial_monsters: u32,

    // === Experience ===
    /// Chance that a monster killed by a bullet drops an exp pack
    pub exp_drop_chance: f64,
    pub exp_pack_value: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 1.0,
            player_health: 10.0,
            player_attack: 1.0,
            player_defense: 0.0,
            exp_to_first_level: 100.0,
            level_health_base: 10.0,
            level_health_per_level: 2.0,
            level_speed_bonus: 0.2,

            shoot_interval_ms: 300.0,
            bullet_speed: 5.0,

            monster_base_speed: 0.5,
            monster_speed_per_minute: 0.5,
            monster_max_speed: None,
            monster_health: 3.0,
            monster_exp_reward: 20.0,

            base_spawn_interval_ms: 1000.0,
            min_spawn_interval_ms: 200.0,
            initial_monsters: 10,

            exp_drop_chance: 0.5,
            exp_pack_value: 10.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::debug!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("player_speed", self.player_speed)?;
        positive("exp_to_first_level", self.exp_to_first_level)?;
        positive("shoot_interval_ms", self.shoot_interval_ms)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("monster_health", self.monster_health)?;
        positive("base_spawn_interval_ms", self.base_spawn_interval_ms)?;
        positive("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        if let Some(cap) = self.monster_max_speed {
            positive("monster_max_speed", cap)?;
        }
        if !(0.0..=1.0).contains(&self.exp_drop_chance) {
            return Err(TuningError::Invalid {
                field: "exp_drop_chance",
                reason: "must be within 0..=1",
            });
        }
        Ok(())
    }

    /// Monster speed after `session_ms` on the session clock
    pub fn monster_speed_at(&self, session_ms: f64) -> f32 {
        let minutes = (session_ms / 60_000.0) as f32;
        let speed = self.monster_base_speed + minutes * self.monster_speed_per_minute;
        match self.monster_max_speed {
            Some(cap) => speed.min(cap),
            None => speed,
        }
    }
}
