//! Level-up upgrade draft: three distinct picks from a fixed catalog

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::state::Player;

/// Upgrades offered per level-up
pub const DRAFT_SIZE: usize = 3;

pub const HEAL_AMOUNT: f32 = 5.0;
pub const MOVE_SPEED_BONUS: f32 = 0.5;
pub const ATTACK_BONUS: f32 = 1.0;
pub const DEFENSE_BONUS: f32 = 0.2;
/// Attack speed: shoot interval reduction and its floor (ms)
pub const SHOOT_INTERVAL_STEP_MS: f32 = 50.0;
pub const MIN_SHOOT_INTERVAL_MS: f32 = 50.0;

/// The upgrade catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Heal,
    MoveSpeed,
    Attack,
    Defense,
    AttackSpeed,
}

pub const UPGRADE_CATALOG: [UpgradeKind; 5] = [
    UpgradeKind::Heal,
    UpgradeKind::MoveSpeed,
    UpgradeKind::Attack,
    UpgradeKind::Defense,
    UpgradeKind::AttackSpeed,
];

impl UpgradeKind {
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::Heal => "Heal +5",
            UpgradeKind::MoveSpeed => "Move Speed +0.5",
            UpgradeKind::Attack => "Attack +1",
            UpgradeKind::Defense => "Defense +0.2",
            UpgradeKind::AttackSpeed => "Attack Speed",
        }
    }

    /// Mutate the player's stats
    pub fn apply(self, player: &mut Player) {
        match self {
            UpgradeKind::Heal => player.health += HEAL_AMOUNT,
            UpgradeKind::MoveSpeed => player.speed += MOVE_SPEED_BONUS,
            UpgradeKind::Attack => player.attack += ATTACK_BONUS,
            UpgradeKind::Defense => player.defense = (player.defense + DEFENSE_BONUS).min(1.0),
            UpgradeKind::AttackSpeed => {
                player.shoot_interval_ms =
                    (player.shoot_interval_ms - SHOOT_INTERVAL_STEP_MS).max(MIN_SHOOT_INTERVAL_MS)
            }
        }
    }
}

/// One level-up's worth of choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeDraft {
    choices: [UpgradeKind; DRAFT_SIZE],
}

impl UpgradeDraft {
    /// Draw `DRAFT_SIZE` distinct upgrades, every subset equally likely
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let picked = index::sample(rng, UPGRADE_CATALOG.len(), DRAFT_SIZE);
        let mut choices = [UpgradeKind::Heal; DRAFT_SIZE];
        for (slot, i) in choices.iter_mut().zip(picked.iter()) {
            *slot = UPGRADE_CATALOG[i];
        }
        Self { choices }
    }

    pub fn choices(&self) -> &[UpgradeKind] {
        &self.choices
    }

    pub fn pick(&self, index: usize) -> Option<UpgradeKind> {
        self.choices.get(index).copied()
    }
}
