//! Frame composition: world entities and HUD as renderer primitives

use glam::Vec2;

use super::{Renderer, palette};
use crate::direction;
use crate::sim::state::{Camera, GameState, Monster, Player};

/// HUD health bar: width per point of (displayed) health
const HEALTH_BAR_SCALE: f32 = 10.0;
const HUD_MARGIN: f32 = 10.0;
const EXP_BAR_WIDTH: f32 = 100.0;
const EXP_BAR_HEIGHT: f32 = 5.0;

const MONSTER_BAR_WIDTH: f32 = 40.0;
const MONSTER_BAR_HEIGHT: f32 = 5.0;
/// Bar sits this far above the monster center
const MONSTER_BAR_LIFT: f32 = 30.0;

const GUN_REACH: f32 = 20.0;
const GUN_RADIUS: f32 = 4.0;

/// Draw the whole frame
pub fn draw_frame(state: &GameState, out: &mut impl Renderer) {
    let camera = &state.camera;
    out.clear();

    draw_player(&state.player, camera, out);
    for bullet in &state.bullets {
        out.fill_circle(camera.world_to_screen(bullet.pos), bullet.radius, palette::BULLET);
    }
    for monster in &state.monsters {
        draw_monster(monster, camera, out);
    }
    for pack in &state.exp_packs {
        out.fill_circle(camera.world_to_screen(pack.pos), pack.radius, palette::EXP_PACK);
    }

    draw_hud(&state.player, out);
}

fn draw_player(player: &Player, camera: &Camera, out: &mut impl Renderer) {
    let center = camera.world_to_screen(player.pos);
    out.fill_circle(center, player.radius, palette::PLAYER);
    // Gun points along the facing angle
    out.fill_circle(center + direction(player.angle) * GUN_REACH, GUN_RADIUS, palette::GUN);
}

fn draw_monster(monster: &Monster, camera: &Camera, out: &mut impl Renderer) {
    let center = camera.world_to_screen(monster.pos);
    out.fill_circle(center, monster.radius, palette::MONSTER);

    let origin = center - Vec2::new(MONSTER_BAR_WIDTH / 2.0, MONSTER_BAR_LIFT);
    out.fill_rect(origin, Vec2::new(MONSTER_BAR_WIDTH, MONSTER_BAR_HEIGHT), palette::HEALTH_BAR_BG);
    out.fill_rect(
        origin,
        Vec2::new(MONSTER_BAR_WIDTH * monster.health_fraction(), MONSTER_BAR_HEIGHT),
        palette::HEALTH,
    );
}

fn draw_hud(player: &Player, out: &mut impl Renderer) {
    let health_width = (player.display_health * HEALTH_BAR_SCALE).max(0.0);
    out.fill_rect(
        Vec2::new(HUD_MARGIN, HUD_MARGIN),
        Vec2::new(health_width, 10.0),
        palette::HEALTH,
    );

    let exp_origin = Vec2::new(HUD_MARGIN, 25.0);
    out.fill_rect(exp_origin, Vec2::new(EXP_BAR_WIDTH, EXP_BAR_HEIGHT), palette::EXP_BAR_BG);
    let exp_rate = if player.exp_to_next > 0.0 {
        (player.display_exp / player.exp_to_next).clamp(0.0, 1.0)
    } else {
        0.0
    };
    out.fill_rect(
        exp_origin,
        Vec2::new(exp_rate * EXP_BAR_WIDTH, EXP_BAR_HEIGHT),
        palette::EXP,
    );

    out.text(Vec2::new(120.0, 35.0), &format!("Level {}", player.level), palette::TEXT);
}
