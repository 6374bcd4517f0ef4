//! Fixed-order simulation tick
//!
//! Order within a tick: shot timer, player, spawner, bullets, monsters
//! (movement, separation, contact, bullet hits), exp packs. Removals are
//! recorded in per-pass flags and applied with `retain` after the pass, so
//! nothing is skipped or visited twice.

use serde::{Deserialize, Serialize};

use super::collision::{circles_overlap, contact_damage, first_bullet_hit};
use super::state::{GameEvent, GamePhase, GameState, Monster};
use crate::consts::*;

/// Directional intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Advance the game state by one frame of `dt_ms` milliseconds.
///
/// Does nothing unless the game is `Playing`. `dt_ms` drives timers only
/// (shots, spawns, monster speed); movement is per tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt_ms = clamp_frame_ms(dt_ms);
    state.time_ticks += 1;
    state.elapsed_ms += f64::from(dt_ms);
    state.session_ms += f64::from(dt_ms);

    update_weapon(state, dt_ms);
    update_player(state, input);
    update_spawner(state, dt_ms);
    update_bullets(state);
    update_monsters(state);
    update_exp_packs(state);
}

/// Clamp a frame delta into `[0, MAX_FRAME_MS]`; non-finite deltas count as 0
pub fn clamp_frame_ms(dt_ms: f32) -> f32 {
    if dt_ms.is_finite() {
        dt_ms.clamp(0.0, MAX_FRAME_MS)
    } else {
        0.0
    }
}

/// Fire one bullet when the shoot interval has elapsed
fn update_weapon(state: &mut GameState, dt_ms: f32) {
    state.shot_timer_ms += dt_ms;
    if state.shot_timer_ms >= state.player.shoot_interval_ms {
        state.fire_bullet();
        state.shot_timer_ms = 0.0;
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let outcome = state.player.update(input, &state.monsters, &state.tuning);
    state.camera.follow(state.player.pos);

    if outcome.game_over {
        state.set_game_over();
    }

    if outcome.leveled_up {
        let level = state.player.level;
        state.record(GameEvent::LevelUp { level });
        state.spawner.sync_level(level);
        log::info!(
            "Level up! level={} next={} health={}",
            level,
            state.player.exp_to_next,
            state.player.health
        );
        if state.phase == GamePhase::Playing {
            state.open_upgrade_draft();
        }
    }
}

/// Spawning only runs while play continues this tick
fn update_spawner(state: &mut GameState, dt_ms: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let due = state.spawner.advance(dt_ms);
    for _ in 0..due {
        state.spawn_monster();
    }
}

fn update_bullets(state: &mut GameState) {
    let camera = state.camera;
    state.bullets.retain_mut(|bullet| {
        bullet.update();
        bullet.in_bounds(&camera, BULLET_CULL_MARGIN)
    });
}

fn update_monsters(state: &mut GameState) {
    let target = state.player.pos;
    let speed = state.tuning.monster_speed_at(state.session_ms);

    let mut alive = vec![true; state.monsters.len()];
    let mut consumed = vec![false; state.bullets.len()];

    for i in 0..state.monsters.len() {
        Monster::update_at(&mut state.monsters, &alive, i, target, speed);
        let (id, pos, radius) = {
            let m = &state.monsters[i];
            (m.id, m.pos, m.radius)
        };

        // Contact: damage the player, the monster vanishes without a drop
        if circles_overlap(pos, radius, state.player.pos, state.player.radius) {
            let damage = contact_damage(state.player.defense);
            state.player.health -= damage;
            state.record(GameEvent::PlayerHit {
                damage,
                health: state.player.health,
            });
            alive[i] = false;
            if state.player.health <= 0.0 {
                state.set_game_over();
            }
            continue;
        }

        // One bullet per monster per tick
        if let Some(hit) = first_bullet_hit(&state.bullets, &consumed, pos, radius) {
            consumed[hit] = true;
            let monster = &mut state.monsters[i];
            monster.take_damage(state.player.attack);
            if monster.is_dead() {
                alive[i] = false;
                state.kills += 1;
                state.record(GameEvent::MonsterKilled { id });
                state.roll_exp_drop(pos);
            }
        }
    }

    let mut keep = alive.into_iter();
    state.monsters.retain(|_| keep.next().unwrap_or(true));
    let mut spent = consumed.into_iter();
    state.bullets.retain(|_| !spent.next().unwrap_or(false));
}

fn update_exp_packs(state: &mut GameState) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    let mut collected = 0;
    state.exp_packs.retain(|pack| {
        if circles_overlap(player_pos, player_radius, pack.pos, pack.radius) {
            collected += 1;
            false
        } else {
            true
        }
    });

    let amount = state.tuning.exp_pack_value;
    for _ in 0..collected {
        state.player.gain_exp(amount);
        state.exp_collected += amount;
        state.record(GameEvent::ExpCollected { amount });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, ExpPack};
    use crate::tuning::Tuning;
    use glam::Vec2;

    const FRAME: f32 = 1000.0 / 60.0;

    /// No initial wave, no automatic shots
    fn quiet_state() -> GameState {
        let tuning = Tuning {
            initial_monsters: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(12345, tuning);
        state.player.shoot_interval_ms = 1.0e9;
        state.shot_timer_ms = 0.0;
        state
    }

    fn place_monster(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.monsters.push(Monster::new(id, pos, &state.tuning));
        id
    }

    /// Put a bullet right on top of the first monster
    fn bullet_on_first_monster(state: &mut GameState) {
        let id = state.next_entity_id();
        let pos = state.monsters[0].pos;
        state.bullets.push(Bullet::new(id, pos, 0.0, 5.0));
    }

    #[test]
    fn test_first_tick_fires() {
        let mut state = GameState::new(1, Tuning::default());
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.bullets.len(), 1, "interval not elapsed yet");
    }

    #[test]
    fn test_monster_dies_on_third_hit() {
        let mut state = quiet_state();
        let start = state.player.pos + Vec2::new(200.0, 0.0);
        place_monster(&mut state, start);

        for hit in 1..=3 {
            bullet_on_first_monster(&mut state);
            tick(&mut state, &TickInput::default(), FRAME);
            assert!(state.bullets.is_empty(), "bullet consumed on hit {hit}");
            if hit < 3 {
                assert_eq!(state.monsters.len(), 1);
                assert_eq!(state.monsters[0].health, 3.0 - hit as f32);
            }
        }
        assert!(state.monsters.is_empty());
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_strong_attack_kills_in_one_hit() {
        let mut state = quiet_state();
        state.player.attack = 3.0;
        let start = state.player.pos + Vec2::new(200.0, 0.0);
        place_monster(&mut state, start);
        bullet_on_first_monster(&mut state);
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.monsters.is_empty());
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_bullet_hits_only_one_monster() {
        let mut state = quiet_state();
        let base = state.player.pos + Vec2::new(300.0, 0.0);
        place_monster(&mut state, base);
        place_monster(&mut state, base + Vec2::new(0.0, 15.0));
        bullet_on_first_monster(&mut state);
        tick(&mut state, &TickInput::default(), FRAME);
        let total_damage: f32 = state.monsters.iter().map(|m| m.max_health - m.health).sum();
        assert_eq!(total_damage, 1.0);
    }

    #[test]
    fn test_removals_in_one_pass_skip_nothing() {
        let mut state = quiet_state();
        state.tuning.exp_drop_chance = 0.0;
        let origin = state.player.pos;

        // A touches the player, B dies to a bullet, C only takes a hit
        let a = place_monster(&mut state, origin + Vec2::new(5.0, 0.0));
        let b = place_monster(&mut state, origin + Vec2::new(200.0, 0.0));
        let c = place_monster(&mut state, origin + Vec2::new(0.0, 300.0));
        state.monsters[1].health = 1.0;
        let c_start = state.monsters[2].pos;

        let on_b = state.next_entity_id();
        state.bullets.push(Bullet::new(on_b, state.monsters[1].pos, 0.0, 5.0));
        let on_c = state.next_entity_id();
        state.bullets.push(Bullet::new(on_c, c_start, 0.0, 5.0));
        let stray = state.next_entity_id();
        state.bullets.push(Bullet::new(stray, origin - Vec2::new(300.0, 0.0), std::f32::consts::PI, 5.0));

        tick(&mut state, &TickInput::default(), FRAME);

        let ids: Vec<u32> = state.monsters.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![c]);
        let survivor = &state.monsters[0];
        assert_eq!(survivor.health, 2.0);
        assert!((survivor.pos.distance(c_start) - 0.5).abs() < 1e-4, "C still moved");

        let bullet_ids: Vec<u32> = state.bullets.iter().map(|b| b.id).collect();
        assert_eq!(bullet_ids, vec![stray]);

        assert_eq!(state.player.health, 9.0);
        assert_eq!(state.kills, 1);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::MonsterKilled { id: b }));
        assert!(!events.contains(&GameEvent::MonsterKilled { id: a }));
    }

    #[test]
    fn test_kill_drop_follows_chance() {
        for (chance, expected) in [(1.0, 1), (0.0, 0)] {
            let mut state = quiet_state();
            state.tuning.exp_drop_chance = chance;
            state.player.attack = 3.0;
            let start = state.player.pos + Vec2::new(200.0, 0.0);
            place_monster(&mut state, start);
            bullet_on_first_monster(&mut state);
            tick(&mut state, &TickInput::default(), FRAME);
            assert_eq!(state.exp_packs.len(), expected);
        }
    }

    #[test]
    fn test_contact_damages_and_removes() {
        let mut state = quiet_state();
        state.tuning.exp_drop_chance = 1.0;
        let pos = state.player.pos + Vec2::new(5.0, 0.0);
        place_monster(&mut state, pos);
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.monsters.is_empty());
        assert!(state.exp_packs.is_empty(), "contact kills never drop");
        assert_eq!(state.player.health, 9.0);
        assert_eq!(state.kills, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_defense_reduces_contact_damage() {
        let mut state = quiet_state();
        state.player.defense = 0.4;
        let pos = state.player.pos + Vec2::new(5.0, 0.0);
        place_monster(&mut state, pos);
        tick(&mut state, &TickInput::default(), FRAME);
        assert!((state.player.health - 9.4).abs() < 1e-5);
    }

    #[test]
    fn test_lethal_contact_ends_game() {
        let mut state = quiet_state();
        state.player.health = 1.0;
        let pos = state.player.pos + Vec2::new(5.0, 0.0);
        place_monster(&mut state, pos);
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { level: 1 }));

        // Frozen afterwards
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_exp_pickup() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        state.exp_packs.push(ExpPack::new(id, state.player.pos + Vec2::new(10.0, 0.0)));
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.exp_packs.is_empty());
        assert_eq!(state.player.exp, 10.0);
        assert!(state.events.contains(&GameEvent::ExpCollected { amount: 10.0 }));
    }

    #[test]
    fn test_level_up_pauses_for_upgrade() {
        let mut state = quiet_state();
        state.player.exp = 100.0;
        state.player.display_exp = 99.0;
        tick(&mut state, &TickInput::default(), FRAME);

        assert_eq!(state.player.level, 2);
        assert_eq!(state.phase, GamePhase::ChoosingUpgrade);
        assert!(state.pending_draft.is_some());
        assert_eq!(state.spawner.armed_level(), 2);
        assert_eq!(state.spawner.period_ms(), 500.0);

        // Paused until the choice is made
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.time_ticks, ticks);

        state.choose_upgrade(0).unwrap();
        tick(&mut state, &TickInput::default(), FRAME);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_spawner_cadence_in_tick() {
        let mut state = quiet_state();
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 50.0);
        }
        assert_eq!(state.monsters.len(), 1);
    }

    #[test]
    fn test_zero_spawn_interval_does_not_stall() {
        let tuning = Tuning {
            initial_monsters: 0,
            base_spawn_interval_ms: 0.0,
            min_spawn_interval_ms: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(8, tuning);
        tick(&mut state, &TickInput::default(), 50.0);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.monsters.len(), 50);
    }

    #[test]
    fn test_offscreen_bullets_culled() {
        let mut state = quiet_state();
        let id = state.next_entity_id();
        let far = state.player.pos + Vec2::new(895.0, 0.0);
        state.bullets.push(Bullet::new(id, far, 0.0, 5.0));
        tick(&mut state, &TickInput::default(), FRAME);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_monster_speed_tracks_session_time() {
        let mut state = quiet_state();
        state.session_ms = 120_000.0;
        let pos = state.player.pos + Vec2::new(400.0, 0.0);
        place_monster(&mut state, pos);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!((state.monsters[0].speed - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut state = quiet_state();
        tick(&mut state, &TickInput::default(), 10_000.0);
        assert_eq!(state.elapsed_ms, f64::from(MAX_FRAME_MS));
        assert_eq!(state.session_ms, f64::from(MAX_FRAME_MS));
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.elapsed_ms, f64::from(MAX_FRAME_MS));
    }

    #[test]
    fn test_camera_follows_player() {
        let mut state = quiet_state();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME);
        assert_eq!(state.camera.world_to_screen(state.player.pos), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                down: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, FRAME);
            tick(&mut state2, input, FRAME);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.monsters.len(), state2.monsters.len());
        assert_eq!(state1.kills, state2.kills);
        for (a, b) in state1.monsters.iter().zip(&state2.monsters) {
            assert_eq!(a.pos, b.pos);
        }
        assert!((state1.player.angle - state2.player.angle).abs() < 0.0001);
    }
}
