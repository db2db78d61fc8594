//! Collision resolution
//!
//! Runs once per sub-step, after movement. Order matters: platform landing
//! first (it can end the run on the goal), then coin pickup, then enemy
//! contact, then the fell-off-the-world check. A terminal transition stops
//! resolution immediately so lives can never go below zero.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, Session};
use crate::consts::VIEWPORT_H;

/// Resolve all collisions for the current sub-step, appending any events.
pub(crate) fn resolve(session: &mut Session, events: &mut Vec<GameEvent>) {
    if land_on_platform(session, events) {
        return;
    }
    collect_coins(session, events);

    // Each overlapping enemy hurts independently. A hurt respawns the
    // player, so later enemies test against the updated rectangle.
    for i in 0..session.enemies.len() {
        if session.player.body.overlaps(&session.enemies[i].body) {
            hurt_player(session, events);
            if session.phase != GamePhase::Playing {
                return;
            }
        }
    }

    // Falling past the bottom of the screen counts as a hit
    if session.player.body.top() > VIEWPORT_H {
        hurt_player(session, events);
        if session.phase == GamePhase::Playing {
            session.player.body.pos.y = 0.0;
        }
    }
}

/// Landing test: horizontal overlap, bottom edge within the top half of the
/// platform, and moving downward (or resting). Not a full AABB test - rising
/// through a ledge from below must pass freely.
///
/// Every qualifying platform snaps the player, so where two platforms share
/// a top edge (the goal sits on the ground strip) both register, and the
/// goal still counts.
///
/// Returns true when the run just ended on the goal platform.
fn land_on_platform(session: &mut Session, events: &mut Vec<GameEvent>) -> bool {
    let mut landed = false;
    let mut on_goal = false;
    for platform in &session.platforms {
        let top = platform.body.top();
        let body = &session.player.body;
        if session.player.vel.y >= 0.0
            && body.overlaps_x(&platform.body)
            && body.bottom() >= top
            && body.bottom() <= top + platform.body.size.y / 2.0
        {
            session.player.body.pos.y = top - session.player.body.size.y;
            session.player.vel.y = 0.0;
            session.player.is_jumping = false;
            landed = true;
            on_goal = on_goal || platform.is_goal;
        }
    }

    if !landed {
        // Airborne until proven otherwise
        session.player.is_jumping = true;
        return false;
    }
    if on_goal {
        session.phase = GamePhase::Won;
        events.push(GameEvent::Won);
        log::info!("goal reached with score {}", session.score);
        return true;
    }
    false
}

fn collect_coins(session: &mut Session, events: &mut Vec<GameEvent>) {
    let body = &session.player.body;
    for coin in &mut session.coins {
        if !coin.collected && body.overlaps(&coin.body) {
            coin.collected = true;
            session.score += 1;
            events.push(GameEvent::CoinCollected);
        }
    }
}

/// Spend a life. Either respawn at the level start with the camera rewound,
/// or end the run if that was the last one.
fn hurt_player(session: &mut Session, events: &mut Vec<GameEvent>) {
    session.player.lives = session.player.lives.saturating_sub(1);
    events.push(GameEvent::Hurt {
        lives_left: session.player.lives,
    });

    if session.player.lives == 0 {
        session.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver);
        log::info!("out of lives at score {}", session.score);
    } else {
        session.player.body.pos = session.level.spawn;
        session.player.vel = Vec2::ZERO;
        session.camera.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::START_LIVES;
    use crate::sim::level::LevelConfig;
    use crate::sim::rect::Rect;
    use crate::sim::state::Platform;
    use crate::tuning::Tuning;

    /// A session already in gameplay, positioned by each test
    fn playing() -> Session {
        let mut s = Session::new(LevelConfig::classic(), Tuning::default());
        s.begin_loading();
        s.finish_loading();
        s
    }

    fn resolve_once(session: &mut Session) -> Vec<GameEvent> {
        let mut events = Vec::new();
        resolve(session, &mut events);
        events
    }

    #[test]
    fn test_landing_snaps_and_grounds() {
        let mut s = playing();
        // 10px into the ground platform (top at 550), falling
        s.player.body.pos = Vec2::new(100.0, 550.0 - 32.0 + 10.0);
        s.player.vel.y = 5.0;
        s.player.is_jumping = true;

        resolve_once(&mut s);
        assert_eq!(s.player.body.bottom(), 550.0);
        assert_eq!(s.player.vel.y, 0.0);
        assert!(!s.player.is_jumping);
    }

    #[test]
    fn test_landing_tolerance_is_half_height() {
        let mut s = playing();
        // Ground platform is 50 tall: a bottom edge deeper than 25px in must
        // not snap - the player has already fallen through.
        s.player.body.pos = Vec2::new(100.0, 550.0 - 32.0 + 30.0);
        s.player.vel.y = 5.0;

        resolve_once(&mut s);
        assert!(s.player.is_jumping);
        assert_ne!(s.player.vel.y, 0.0);
    }

    #[test]
    fn test_rising_player_passes_through() {
        let mut s = playing();
        s.player.body.pos = Vec2::new(220.0, 450.0 - 32.0 + 5.0);
        s.player.vel.y = -8.0;

        resolve_once(&mut s);
        assert!(s.player.is_jumping);
        assert_eq!(s.player.vel.y, -8.0);
    }

    #[test]
    fn test_landing_requires_horizontal_overlap() {
        let mut s = playing();
        s.platforms.clear();
        s.platforms.push(Platform {
            body: Rect::new(200.0, 450.0, 100.0, 20.0),
            is_goal: false,
        });
        // Vertically aligned with the ledge but entirely to its left
        s.player.body.pos = Vec2::new(100.0, 450.0 - 32.0 + 5.0);
        s.player.vel.y = 3.0;

        resolve_once(&mut s);
        assert!(s.player.is_jumping);
    }

    #[test]
    fn test_goal_landing_wins_and_stops_resolution() {
        let mut s = playing();
        // Put a coin and an enemy right on the goal; neither may fire
        s.player.body.pos = Vec2::new(2250.0, 550.0 - 32.0 + 5.0);
        s.player.vel.y = 2.0;
        s.coins[0].body.pos = s.player.body.pos;
        s.enemies[0].body.pos = s.player.body.pos;

        let events = resolve_once(&mut s);
        assert_eq!(s.phase, GamePhase::Won);
        assert_eq!(events, vec![GameEvent::Won]);
        assert_eq!(s.score, 0);
        assert_eq!(s.player.lives, START_LIVES);
    }

    #[test]
    fn test_coin_pickup_is_monotonic() {
        let mut s = playing();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(220.0, 415.0);
        s.player.vel.y = 0.0;

        let events = resolve_once(&mut s);
        assert!(events.contains(&GameEvent::CoinCollected));
        assert_eq!(s.score, 1);

        // Still overlapping: the same coin never pays twice
        let events = resolve_once(&mut s);
        assert!(!events.contains(&GameEvent::CoinCollected));
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_enemy_hit_respawns_player() {
        let mut s = playing();
        s.player.body.pos = Vec2::new(300.0, 520.0);
        s.player.vel = Vec2::new(3.0, -1.0);
        s.camera.x = 100.0;

        let events = resolve_once(&mut s);
        let hurts = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Hurt { .. }))
            .count();
        assert_eq!(hurts, 1);
        assert_eq!(s.player.lives, START_LIVES - 1);
        assert_eq!(s.player.body.pos, s.level.spawn);
        assert_eq!(s.player.vel, Vec2::ZERO);
        assert_eq!(s.camera.x, 0.0);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_two_enemies_can_hurt_in_one_step() {
        let mut s = playing();
        let hit_pos = Vec2::new(900.0, 520.0);
        s.enemies[0].body.pos = hit_pos;
        // Second enemy camped on the spawn point catches the respawn
        s.enemies[1].body.pos = s.level.spawn;
        s.player.body.pos = hit_pos;
        s.player.vel.y = 0.0;

        let events = resolve_once(&mut s);
        let hurts = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Hurt { .. }))
            .count();
        assert_eq!(hurts, 2);
        assert_eq!(s.player.lives, START_LIVES - 2);
    }

    #[test]
    fn test_last_life_ends_run_without_respawn() {
        let mut s = playing();
        s.player.lives = 1;
        // Resting on the ground, exactly flush with the platform top
        let hit_pos = Vec2::new(300.0, 550.0 - 32.0);
        s.player.body.pos = hit_pos;
        s.player.vel.y = 0.0;

        let events = resolve_once(&mut s);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.player.lives, 0);
        // No respawn: the player stays where it died
        assert_eq!(s.player.body.pos, hit_pos);
        assert!(events.contains(&GameEvent::Hurt { lives_left: 0 }));
        assert!(events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_terminal_hurt_short_circuits_later_enemies() {
        let mut s = playing();
        s.player.lives = 1;
        let hit_pos = Vec2::new(900.0, 520.0);
        s.enemies[0].body.pos = hit_pos;
        s.enemies[1].body.pos = hit_pos;
        s.player.body.pos = hit_pos;
        s.player.vel.y = 0.0;

        let events = resolve_once(&mut s);
        let hurts = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Hurt { .. }))
            .count();
        assert_eq!(hurts, 1);
        assert_eq!(s.player.lives, 0);
    }

    #[test]
    fn test_falling_off_the_world_hurts() {
        let mut s = playing();
        s.enemies.clear();
        s.player.body.pos = Vec2::new(400.0, VIEWPORT_H + 50.0);
        s.player.vel.y = 4.0;

        let events = resolve_once(&mut s);
        assert!(events.contains(&GameEvent::Hurt {
            lives_left: START_LIVES - 1
        }));
        assert_eq!(s.player.body.pos, s.level.spawn);
    }
}
