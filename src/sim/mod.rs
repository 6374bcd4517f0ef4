//! Simulation module
//!
//! All gameplay logic lives here:
//! - Explicit context (`GameState`) passed to every system
//! - Seeded RNG only
//! - Frame-driven: one tick per scheduled frame, no threads or timers
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod collision;
pub mod runner;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use collision::{circles_overlap, contact_damage, resolve_overlap};
pub use runner::{GameLoop, UpgradeUi};
pub use spawner::{Spawner, spawn_interval_ms};
pub use state::{
    Bullet, Camera, ExpPack, GameEvent, GamePhase, GameState, Monster, Player, SessionSummary,
};
pub use tick::{TickInput, tick};
pub use upgrade::{UPGRADE_CATALOG, UpgradeDraft, UpgradeKind};
