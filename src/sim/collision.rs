//! Circle overlap tests and push-apart resolution
//!
//! Every entity is a circle. Monsters separate from each other, the player
//! takes contact damage, bullets are consumed by the first monster they touch.

use glam::Vec2;

use super::state::{Bullet, Monster};

/// True if two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Push two overlapping circles apart along the line between their centers.
///
/// Each circle moves by half the penetration depth, so they end up exactly
/// touching. Coincident centers have no defined direction and are left alone.
/// Returns whether anything moved.
pub fn resolve_overlap(a: &mut Vec2, radius_a: f32, b: &mut Vec2, radius_b: f32) -> bool {
    let delta = *b - *a;
    let dist = delta.length();
    if dist == 0.0 || !dist.is_finite() {
        return false;
    }

    let min_dist = radius_a + radius_b;
    if dist >= min_dist {
        return false;
    }

    let push = delta / dist * ((min_dist - dist) / 2.0);
    *a -= push;
    *b += push;
    true
}

/// Separate `monsters[index]` from every other live monster.
///
/// `alive` has one flag per monster; removed monsters neither push nor get pushed.
pub fn separate_monster(monsters: &mut [Monster], alive: &[bool], index: usize) {
    for other in 0..monsters.len() {
        if other == index || !alive[other] {
            continue;
        }
        let (a, b) = pair_mut(monsters, index, other);
        resolve_overlap(&mut a.pos, a.radius, &mut b.pos, b.radius);
    }
}

/// Mutable references to two distinct slice elements
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Damage a monster deals on contact: `max(1 - defense, 0)`
#[inline]
pub fn contact_damage(defense: f32) -> f32 {
    (1.0 - defense).max(0.0)
}

/// Index of the first unconsumed bullet overlapping the circle
pub fn first_bullet_hit(
    bullets: &[Bullet],
    consumed: &[bool],
    pos: Vec2,
    radius: f32,
) -> Option<usize> {
    bullets
        .iter()
        .enumerate()
        .find(|(i, b)| !consumed[*i] && circles_overlap(b.pos, b.radius, pos, radius))
        .map(|(i, _)| i)
}

/// Closest monster to `pos`; ties go to the earliest in iteration order
pub fn nearest_monster(pos: Vec2, monsters: &[Monster]) -> Option<&Monster> {
    let mut best: Option<(&Monster, f32)> = None;
    for monster in monsters {
        let d = pos.distance(monster.pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((monster, d));
        }
    }
    best.map(|(m, _)| m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn monster_at(id: u32, x: f32, y: f32) -> Monster {
        Monster::new(id, Vec2::new(x, y), &Tuning::default())
    }

    #[test]
    fn test_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.9, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_resolve_pushes_symmetrically() {
        let mut a = Vec2::new(0.0, 0.0);
        let mut b = Vec2::new(10.0, 0.0);
        assert!(resolve_overlap(&mut a, 10.0, &mut b, 10.0));
        assert!((a.x + 5.0).abs() < 1e-5);
        assert!((b.x - 15.0).abs() < 1e-5);
        assert!((a.distance(b) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_resolve_coincident_is_noop() {
        let mut a = Vec2::new(42.0, -7.0);
        let mut b = a;
        assert!(!resolve_overlap(&mut a, 15.0, &mut b, 10.0));
        assert_eq!(a, Vec2::new(42.0, -7.0));
        assert_eq!(b, Vec2::new(42.0, -7.0));
        assert!(a.x.is_finite() && b.y.is_finite());
    }

    #[test]
    fn test_resolve_ignores_separated() {
        let mut a = Vec2::ZERO;
        let mut b = Vec2::new(30.0, 0.0);
        assert!(!resolve_overlap(&mut a, 10.0, &mut b, 10.0));
        assert_eq!(b, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_separate_skips_dead() {
        let mut monsters = vec![monster_at(1, 0.0, 0.0), monster_at(2, 5.0, 0.0), monster_at(3, -5.0, 0.0)];
        let alive = [true, true, false];
        separate_monster(&mut monsters, &alive, 0);
        assert!(monsters[0].pos.distance(monsters[1].pos) >= 20.0 - 1e-4);
        assert_eq!(monsters[2].pos, Vec2::new(-5.0, 0.0));
    }

    #[test]
    fn test_contact_damage_floor() {
        assert_eq!(contact_damage(0.0), 1.0);
        assert!((contact_damage(0.4) - 0.6).abs() < 1e-6);
        assert_eq!(contact_damage(1.2), 0.0);
    }

    #[test]
    fn test_first_bullet_hit_skips_consumed() {
        let bullets = vec![
            Bullet::new(1, Vec2::new(0.0, 0.0), 0.0, 5.0),
            Bullet::new(2, Vec2::new(3.0, 0.0), 0.0, 5.0),
            Bullet::new(3, Vec2::new(500.0, 0.0), 0.0, 5.0),
        ];
        assert_eq!(first_bullet_hit(&bullets, &[false, false, false], Vec2::ZERO, 10.0), Some(0));
        assert_eq!(first_bullet_hit(&bullets, &[true, false, false], Vec2::ZERO, 10.0), Some(1));
        assert_eq!(first_bullet_hit(&bullets, &[true, true, false], Vec2::ZERO, 10.0), None);
    }

    #[test]
    fn test_nearest_monster_tie_goes_first() {
        let monsters = vec![monster_at(1, 10.0, 0.0), monster_at(2, -10.0, 0.0), monster_at(3, 50.0, 0.0)];
        assert_eq!(nearest_monster(Vec2::ZERO, &monsters).map(|m| m.id), Some(1));
        assert!(nearest_monster(Vec2::ZERO, &[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_resolution_leaves_circles_touching(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            dx in -19.0f32..19.0, dy in -19.0f32..19.0,
            ra in 5.0f32..20.0, rb in 5.0f32..20.0,
        ) {
            let mut a = Vec2::new(ax, ay);
            let mut b = Vec2::new(ax + dx, ay + dy);
            let start = (a, b);
            let moved = resolve_overlap(&mut a, ra, &mut b, rb);
            if start.0 == start.1 {
                prop_assert!(!moved);
                prop_assert_eq!((a, b), start);
            } else {
                prop_assert!(a.distance(b) >= ra + rb - 1e-2);
            }
        }
    }
}
