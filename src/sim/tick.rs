//! Per-sub-step update
//!
//! One call advances the world by a single sub-step of at most 1/60s.
//! The frame clock decides how many sub-steps a real frame needs; this
//! module only knows about one of them. Movement runs first, then the
//! camera, then enemy patrol, then collision resolution.

use super::collision;
use super::state::{Facing, GameEvent, GamePhase, Session};
use crate::consts::VIEWPORT_W;

/// Input snapshot for one animation frame.
///
/// Captured from the key state once per frame and applied unchanged to
/// every sub-step of that frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

/// Advance the session by one sub-step of `dt` seconds.
///
/// Outside of `Playing` this is a no-op: the world stays frozen and no
/// events are produced, whatever the input says.
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase != GamePhase::Playing {
        return events;
    }
    session.ticks += 1;
    let t = session.tuning;

    // Jumping is only armed on the ground; airborne presses do nothing
    if input.jump && !session.player.is_jumping {
        session.player.vel.y = -session.player.jump_power;
        session.player.is_jumping = true;
        events.push(GameEvent::Jumped);
    }

    if input.move_right {
        session.player.vel.x += session.player.speed * dt;
    }
    if input.move_left {
        session.player.vel.x -= session.player.speed * dt;
    }

    // Exponential friction, normalized so the decay per real second does
    // not depend on the sub-step size
    session.player.vel.x *= t.friction.powf(dt * t.rate);
    session.player.vel.y += t.gravity * dt * t.rate;

    session.player.body.pos.x += session.player.vel.x * dt * t.pos_scale_x;
    session.player.body.pos.y += session.player.vel.y * dt * t.pos_scale_y;

    // A level override narrower than the player collapses the range to zero
    let max_x = (session.level.width - session.player.body.size.x).max(0.0);
    session.player.body.pos.x = session.player.body.pos.x.clamp(0.0, max_x);

    // Small deadzone keeps the facing stable while friction rings down
    if session.player.vel.x > 0.1 {
        session.player.facing = Facing::Right;
    } else if session.player.vel.x < -0.1 {
        session.player.facing = Facing::Left;
    }

    session
        .camera
        .follow(&session.player.body, session.level.width, VIEWPORT_W);

    // Patrol: move first, then turn around past the leash. An overshoot
    // recovers on the next sub-step walking back in.
    for enemy in &mut session.enemies {
        enemy.body.pos.x += enemy.vx * dt * t.enemy_scale;
        if (enemy.body.pos.x - enemy.start_x).abs() > enemy.range {
            enemy.vx = -enemy.vx;
        }
    }

    // The first sub-step after a resume moves the world but skips
    // resolution, so nothing fires out of a stale overlap.
    if session.skip_collisions_once {
        session.skip_collisions_once = false;
    } else {
        collision::resolve(session, &mut events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYER_JUMP_POWER, START_LIVES};
    use crate::sim::level::LevelConfig;
    use crate::sim::rect::Rect;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn playing() -> Session {
        let mut s = Session::new(LevelConfig::classic(), Tuning::default());
        s.begin_loading();
        s.finish_loading();
        s
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_tick_is_noop_outside_playing() {
        let mut s = Session::new(LevelConfig::classic(), Tuning::default());
        let input = TickInput {
            move_right: true,
            jump: true,
            ..Default::default()
        };
        let pos = s.player.body.pos;

        assert!(tick(&mut s, &input, DT).is_empty());
        assert_eq!(s.player.body.pos, pos);
        assert_eq!(s.ticks, 0);

        s.begin_loading();
        s.finish_loading();
        s.phase = GamePhase::Won;
        assert!(tick(&mut s, &input, DT).is_empty());
        assert_eq!(s.ticks, 0);
    }

    #[test]
    fn test_jump_launches_and_lands() {
        let mut s = playing();
        s.coins.clear();
        s.enemies.clear();
        // Resting on the ground platform
        s.player.body.pos = Vec2::new(100.0, 550.0 - 32.0);
        s.player.vel = Vec2::ZERO;
        s.player.is_jumping = false;

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut s, &jump, DT);
        assert!(events.contains(&GameEvent::Jumped));
        assert!(s.player.is_jumping);
        assert!(s.player.vel.y < 0.0);
        assert!(s.player.body.pos.y < 518.0);

        // Gravity brings the player back down within a few seconds
        let mut landed = false;
        for _ in 0..300 {
            tick(&mut s, &idle(), DT);
            if !s.player.is_jumping {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(s.player.body.bottom(), 550.0);
        assert_eq!(s.player.vel.y, 0.0);
        assert_eq!(s.player.lives, START_LIVES);
    }

    #[test]
    fn test_airborne_jump_press_is_ignored() {
        let mut s = playing();
        s.coins.clear();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(100.0, 300.0);
        s.player.vel = Vec2::new(0.0, -PLAYER_JUMP_POWER);
        s.player.is_jumping = true;

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = tick(&mut s, &jump, DT);
        assert!(!events.contains(&GameEvent::Jumped));
        // Only gravity touched the vertical velocity
        assert!(s.player.vel.y > -PLAYER_JUMP_POWER);
        assert!(s.player.vel.y < 0.0);
    }

    #[test]
    fn test_moving_left_turns_the_player() {
        let mut s = playing();
        s.coins.clear();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(400.0, 550.0 - 32.0);
        assert_eq!(s.player.facing, Facing::Right);

        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut s, &left, DT);
        assert_eq!(s.player.facing, Facing::Left);
        assert!(s.player.body.pos.x < 400.0);

        // Coasting to a stop keeps the last facing
        for _ in 0..120 {
            tick(&mut s, &idle(), DT);
        }
        assert!(s.player.vel.x.abs() < 0.1);
        assert_eq!(s.player.facing, Facing::Left);
    }

    #[test]
    fn test_position_clamped_to_level_bounds() {
        let mut s = playing();
        s.coins.clear();
        s.enemies.clear();
        // No platforms: only the clamp itself is under test
        s.platforms.clear();
        s.player.body.pos = Vec2::new(1.0, 550.0 - 32.0);
        s.player.vel.x = -5.0;

        tick(&mut s, &idle(), DT);
        assert_eq!(s.player.body.pos.x, 0.0);

        s.player.body.pos.x = s.level.width - 33.0;
        s.player.vel.x = 5.0;
        tick(&mut s, &idle(), DT);
        assert_eq!(s.player.body.pos.x, s.level.width - 32.0);
    }

    #[test]
    fn test_level_narrower_than_player_pins_at_zero() {
        // A page-supplied layout may be narrower than the player itself
        let json = r#"{
            "width": 10.0,
            "height": 600.0,
            "spawn": [0.0, 0.0],
            "seed": 1,
            "platforms": [],
            "coins": [],
            "enemies": [],
            "enemy_speed": 2.0,
            "enemy_range": 50.0
        }"#;
        let level: LevelConfig = serde_json::from_str(json).expect("valid level json");
        let mut s = Session::new(level, Tuning::default());
        s.begin_loading();
        s.finish_loading();

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        // Holding right across fall-outs and respawns never escapes the
        // zero-width range
        for _ in 0..120 {
            tick(&mut s, &right, DT);
            assert_eq!(s.player.body.pos.x, 0.0);
            assert_eq!(s.camera.x, 0.0);
        }
    }

    #[test]
    fn test_camera_tracks_and_clamps() {
        let mut s = playing();
        s.coins.clear();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(1000.0, 550.0 - 32.0);
        s.player.vel = Vec2::ZERO;

        tick(&mut s, &idle(), DT);
        assert_eq!(s.camera.x, 1000.0 - 400.0 + 16.0);

        // At the left edge the camera pins to zero instead of going negative
        s.player.body.pos = Vec2::new(50.0, 550.0 - 32.0);
        tick(&mut s, &idle(), DT);
        assert_eq!(s.camera.x, 0.0);

        // And at the right edge it stops at level_width - viewport
        s.player.body.pos = Vec2::new(1990.0, 550.0 - 32.0);
        tick(&mut s, &idle(), DT);
        assert_eq!(s.camera.x, s.level.width - 800.0);
    }

    #[test]
    fn test_enemy_patrol_reverses_at_range() {
        let mut s = playing();
        let start_x = s.enemies[0].start_x;
        let range = s.enemies[0].range;
        // Rest the player on a ledge out of every patrol band so the
        // session stays in Playing for the whole observation window
        s.player.body.pos = Vec2::new(1720.0, 418.0);
        s.player.vel = Vec2::ZERO;
        s.coins.clear();

        let mut seen_left = false;
        let mut seen_right = false;
        for _ in 0..600 {
            tick(&mut s, &idle(), DT);
            let e = &s.enemies[0];
            // Move-then-turn can overshoot by at most one sub-step of travel
            assert!((e.body.pos.x - start_x).abs() <= range + 2.1);
            if e.vx < 0.0 {
                seen_left = true;
            } else {
                seen_right = true;
            }
        }
        assert!(seen_left && seen_right);
    }

    #[test]
    fn test_resume_skips_exactly_one_resolution() {
        let mut s = playing();
        s.enemies.clear();
        // Drop the player straight onto a coin
        s.coins[0].body = Rect::new(220.0, 420.0, 20.0, 20.0);
        s.player.body.pos = Vec2::new(210.0, 415.0);
        s.player.vel = Vec2::ZERO;

        assert!(s.toggle_pause());
        assert!(s.toggle_pause());

        // First sub-step after resume: overlap exists but nothing fires
        let events = tick(&mut s, &idle(), DT);
        assert!(!events.contains(&GameEvent::CoinCollected));
        assert_eq!(s.score, 0);

        // Second sub-step resolves normally
        let events = tick(&mut s, &idle(), DT);
        assert!(events.contains(&GameEvent::CoinCollected));
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_patrol_still_moves_on_the_skipped_step() {
        let mut s = playing();
        s.player.body.pos = Vec2::new(2300.0, 100.0);
        s.coins.clear();

        assert!(s.toggle_pause());
        assert!(s.toggle_pause());

        let before = s.enemies[0].body.pos.x;
        tick(&mut s, &idle(), DT);
        assert_ne!(s.enemies[0].body.pos.x, before);
    }

    #[test]
    fn test_two_coins_in_one_step() {
        let mut s = playing();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(400.0, 300.0);
        s.player.vel = Vec2::ZERO;
        s.coins[0].body = Rect::new(400.0, 300.0, 20.0, 20.0);
        s.coins[1].body = Rect::new(410.0, 310.0, 20.0, 20.0);

        let events = tick(&mut s, &idle(), DT);
        let picked = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected))
            .count();
        assert_eq!(picked, 2);
        assert_eq!(s.score, 2);
    }
}
