//! Game state and core simulation types
//!
//! `GameState` is the simulation context: it owns every entity collection,
//! the seeded RNG and the spawn cadence, and is handed to each system by
//! mutable reference for the duration of one tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{nearest_monster, separate_monster};
use super::spawner::{Spawner, spawn_position};
use super::tick::{TickInput, clamp_frame_ms};
use super::upgrade::{UpgradeDraft, UpgradeKind};
use crate::consts::*;
use crate::error::SelectError;
use crate::tuning::Tuning;
use crate::{angle_to, direction, normalize_angle};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing
    Playing,
    /// Level-up: paused until an upgrade is chosen
    ChoosingUpgrade,
    /// Run ended
    GameOver,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MonsterSpawned { id: u32 },
    MonsterKilled { id: u32 },
    ExpPackDropped { id: u32 },
    ExpCollected { amount: f32 },
    PlayerHit { damage: f32, health: f32 },
    LevelUp { level: u32 },
    UpgradeApplied { upgrade: UpgradeKind },
    GameOver { level: u32 },
}

/// Undrained events kept before the oldest are discarded
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Move `current` toward `target` by at most `step`, never past it
#[inline]
pub fn step_toward(current: f32, target: f32, step: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= DISPLAY_EPSILON {
        return current;
    }
    if step >= diff.abs() {
        target
    } else {
        current + step * diff.signum()
    }
}

/// What a player update asks the orchestrator to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// Health bar finished draining
    pub game_over: bool,
    /// Exp bar filled; the level has already been raised
    pub leveled_up: bool,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle (radians); bullets fly along it
    pub angle: f32,
    pub speed: f32,
    /// Uncapped: healing may exceed the starting value
    pub health: f32,
    pub attack: f32,
    /// Damage-reduction fraction
    pub defense: f32,
    pub level: u32,
    pub exp: f32,
    pub exp_to_next: f32,
    /// Animated values trailing `health` / `exp`
    pub display_health: f32,
    pub display_exp: f32,
    pub shoot_interval_ms: f32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            angle: 0.0,
            speed: tuning.player_speed,
            health: tuning.player_health,
            attack: tuning.player_attack,
            defense: tuning.player_defense,
            level: 1,
            exp: 0.0,
            exp_to_next: tuning.exp_to_first_level,
            display_health: tuning.player_health,
            display_exp: 0.0,
            shoot_interval_ms: tuning.shoot_interval_ms,
        }
    }

    /// Add experience. Levelling waits for the exp bar animation to catch up.
    pub fn gain_exp(&mut self, amount: f32) {
        self.exp += amount;
    }

    /// Apply one tick of directional movement (constant per tick)
    pub fn apply_input(&mut self, input: &TickInput) {
        if input.up {
            self.pos.y -= self.speed;
        }
        if input.down {
            self.pos.y += self.speed;
        }
        if input.left {
            self.pos.x -= self.speed;
        }
        if input.right {
            self.pos.x += self.speed;
        }
    }

    /// Turn a fixed fraction of the way toward `target`, along the short arc
    pub fn aim_toward(&mut self, target: Vec2) {
        let target_angle = angle_to(self.pos, target);
        let delta = normalize_angle(target_angle - self.angle);
        self.angle += delta * AIM_LERP;
    }

    /// Muzzle position for the next bullet
    pub fn muzzle(&self) -> Vec2 {
        self.pos + direction(self.angle) * MUZZLE_OFFSET
    }

    /// Advance the animated bars by one step each
    pub fn animate_display(&mut self) {
        self.display_health = step_toward(self.display_health, self.health, DISPLAY_ANIMATION_STEP);
        self.display_exp = step_toward(self.display_exp, self.exp, DISPLAY_ANIMATION_STEP);
    }

    /// Raise the level and reset the stats tied to it
    pub fn level_up(&mut self, tuning: &Tuning) {
        self.level += 1;
        self.exp = 0.0;
        self.display_exp = 0.0;
        self.exp_to_next *= 2.0;
        self.health = tuning.level_health_base + self.level as f32 * tuning.level_health_per_level;
        self.speed += tuning.level_speed_bonus;
    }

    /// Per-tick player update: move, aim at the nearest monster, animate bars,
    /// then report game over / level-up once the animations get there.
    pub fn update(&mut self, input: &TickInput, monsters: &[Monster], tuning: &Tuning) -> PlayerUpdate {
        self.apply_input(input);

        if let Some(target) = nearest_monster(self.pos, monsters) {
            self.aim_toward(target.pos);
        }

        self.animate_display();

        let mut result = PlayerUpdate::default();
        if self.display_health <= 0.0 {
            result.game_over = true;
        }
        if self.display_exp >= self.exp_to_next {
            self.level_up(tuning);
            result.leveled_up = true;
        }
        result
    }
}

/// A monster chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Not consulted since kills drop exp packs instead
    pub exp_reward: f32,
}

impl Monster {
    pub fn new(id: u32, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            pos,
            radius: MONSTER_RADIUS,
            speed: tuning.monster_base_speed,
            health: tuning.monster_health,
            max_health: tuning.monster_health,
            exp_reward: tuning.monster_exp_reward,
        }
    }

    /// Step straight toward `target` at the current speed
    pub fn seek(&mut self, target: Vec2) {
        let delta = target - self.pos;
        if delta == Vec2::ZERO {
            return;
        }
        self.pos += direction(delta.y.atan2(delta.x)) * self.speed;
    }

    /// Pull the monster back onto a circle of `max_dist` if it drifted past it
    pub fn leash(&mut self, target: Vec2, max_dist: f32) {
        let offset = self.pos - target;
        let dist = offset.length();
        if dist > max_dist {
            self.pos = target + offset / dist * max_dist;
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Remaining health in 0..=1 for the health bar
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Full monster update for `monsters[index]`: speed from session time,
    /// seek the target, separate from every other live monster, then leash.
    pub fn update_at(monsters: &mut [Monster], alive: &[bool], index: usize, target: Vec2, speed: f32) {
        let monster = &mut monsters[index];
        monster.speed = speed;
        monster.seek(target);
        separate_monster(monsters, alive, index);
        monsters[index].leash(target, MONSTER_LEASH);
    }
}

/// A bullet flying along a fixed angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            angle,
            speed,
            radius: BULLET_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.pos += direction(self.angle) * self.speed;
    }

    /// Still within the viewport grown by `margin` on every side
    pub fn in_bounds(&self, camera: &Camera, margin: f32) -> bool {
        let screen = camera.world_to_screen(self.pos);
        screen.x > -margin
            && screen.x < camera.viewport.x + margin
            && screen.y > -margin
            && screen.y < camera.viewport.y + margin
    }
}

/// An experience pack dropped by a dead monster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpPack {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

impl ExpPack {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: EXP_PACK_RADIUS,
        }
    }
}

/// Screen-space offset keeping the player centered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        }
    }
}

impl Camera {
    pub fn follow(&mut self, target: Vec2) {
        self.offset = target - self.viewport / 2.0;
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}

/// Serializable snapshot of a run for hosts and logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub session_secs: f64,
    pub phase: GamePhase,
    pub level: u32,
    pub health: f32,
    pub kills: u32,
    pub exp_collected: f32,
    pub monsters_alive: usize,
    pub bullets_alive: usize,
    pub exp_packs_on_ground: usize,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Time spent in play (ms), excludes paused frames
    pub elapsed_ms: f64,
    /// Session clock (ms): every frame since the run started, including the
    /// upgrade choice and paused frames. Drives monster speed.
    pub session_ms: f64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub monsters: Vec<Monster>,
    pub exp_packs: Vec<ExpPack>,
    pub camera: Camera,
    pub spawner: Spawner,
    /// Time since the last shot (ms)
    pub shot_timer_ms: f32,
    /// Open upgrade selection while `ChoosingUpgrade`
    pub pending_draft: Option<UpgradeDraft>,
    /// Events since the host last drained them
    pub events: VecDeque<GameEvent>,
    pub kills: u32,
    pub exp_collected: f32,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new session with the given seed and balance
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut camera = Camera::default();
        let start = camera.viewport / 2.0;
        camera.follow(start);

        let player = Player::new(start, &tuning);
        let spawner = Spawner::new(player.level, &tuning);
        let shot_timer_ms = player.shoot_interval_ms;
        let initial = tuning.initial_monsters;

        let mut state = Self {
            seed,
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            elapsed_ms: 0.0,
            session_ms: 0.0,
            player,
            bullets: Vec::new(),
            monsters: Vec::new(),
            exp_packs: Vec::new(),
            camera,
            spawner,
            shot_timer_ms,
            pending_draft: None,
            events: VecDeque::new(),
            kills: 0,
            exp_collected: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        state.spawn_monsters(i64::from(initial));
        state
    }

    /// Count a frame that did not tick toward the session clock
    pub fn advance_session_clock(&mut self, dt_ms: f32) {
        if self.phase != GamePhase::GameOver {
            self.session_ms += f64::from(clamp_frame_ms(dt_ms));
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one monster just outside view of the player's current position
    pub fn spawn_monster(&mut self) -> u32 {
        let pos = spawn_position(&mut self.rng, self.player.pos, SPAWN_OFFSET);
        let id = self.next_entity_id();
        self.monsters.push(Monster::new(id, pos, &self.tuning));
        self.record(GameEvent::MonsterSpawned { id });
        id
    }

    /// Spawn a batch of monsters; negative counts spawn nothing
    pub fn spawn_monsters(&mut self, count: i64) {
        let count = count.max(0);
        for _ in 0..count {
            self.spawn_monster();
        }
        if count > 0 {
            log::debug!("Spawned {count} monsters ({} alive)", self.monsters.len());
        }
    }

    /// Fire a bullet from the muzzle along the current facing angle
    pub fn fire_bullet(&mut self) -> u32 {
        let id = self.next_entity_id();
        let bullet = Bullet::new(id, self.player.muzzle(), self.player.angle, self.tuning.bullet_speed);
        self.bullets.push(bullet);
        id
    }

    /// Roll the drop chance for a monster that died at `pos`
    pub fn roll_exp_drop(&mut self, pos: Vec2) -> Option<u32> {
        if self.rng.random::<f64>() >= self.tuning.exp_drop_chance {
            return None;
        }
        let id = self.next_entity_id();
        self.exp_packs.push(ExpPack::new(id, pos));
        self.record(GameEvent::ExpPackDropped { id });
        Some(id)
    }

    /// Pause for an upgrade choice with a fresh draft
    pub fn open_upgrade_draft(&mut self) -> &UpgradeDraft {
        self.phase = GamePhase::ChoosingUpgrade;
        self.pending_draft.insert(UpgradeDraft::draw(&mut self.rng))
    }

    /// Apply the chosen upgrade from the open draft and resume play
    pub fn choose_upgrade(&mut self, index: usize) -> Result<UpgradeKind, SelectError> {
        let draft = self.pending_draft.as_ref().ok_or(SelectError::NoDraftOpen)?;
        let upgrade = draft.pick(index).ok_or(SelectError::IndexOutOfRange {
            index,
            choices: draft.choices().len(),
        })?;

        self.pending_draft = None;
        upgrade.apply(&mut self.player);
        self.record(GameEvent::UpgradeApplied { upgrade });
        if self.phase == GamePhase::ChoosingUpgrade {
            self.phase = GamePhase::Playing;
        }
        log::info!("Upgrade chosen: {}", upgrade.label());
        Ok(upgrade)
    }

    /// End the run
    pub fn set_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.pending_draft = None;
        self.record(GameEvent::GameOver {
            level: self.player.level,
        });
        log::info!(
            "Game over at level {} after {:.1}s ({} kills)",
            self.player.level,
            self.elapsed_ms / 1000.0,
            self.kills
        );
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Queue an event for the host; the oldest are dropped once the queue is full
    pub fn record(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            ticks: self.time_ticks,
            elapsed_secs: self.elapsed_ms / 1000.0,
            session_secs: self.session_ms / 1000.0,
            phase: self.phase,
            level: self.player.level,
            health: self.player.health,
            kills: self.kills,
            exp_collected: self.exp_collected,
            monsters_alive: self.monsters.len(),
            bullets_alive: self.bullets.len(),
            exp_packs_on_ground: self.exp_packs.len(),
        }
    }
}
