//! Arcade body step: gravity, landing on platform tops, world-bound clamping.
//!
//! Positions are in canvas space (origin top-left, y down).

use bevy::prelude::*;

use crate::config::{GameConfig, MAX_PHYSICS_DT};
use crate::level::Level;
use crate::player::Player;

/// How far above a platform top a body's bottom may be and still count as touching.
const CONTACT_SLOP: f32 = 0.5;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Body {
    /// Centre, canvas space.
    pub pos: Vec2,
    pub half_size: Vec2,
    pub velocity: Vec2,
    pub touching_down: bool,
}

impl Body {
    pub fn new(pos: Vec2, half_size: Vec2) -> Self {
        Self {
            pos,
            half_size,
            velocity: Vec2::ZERO,
            touching_down: false,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_size.y
    }
}

/// A body touched the top of a platform this frame.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformContact {
    pub entity: Entity,
    pub platform: usize,
}

/// Advance one body by `dt`. A `driven` body is positioned by something else
/// (a jump tween): it is neither integrated nor pushed, only checked for contact.
/// Returns the index of the platform touched, if any.
pub fn step_body(
    body: &mut Body,
    level: &Level,
    bounds: Rect,
    gravity: f32,
    dt: f32,
    driven: bool,
) -> Option<usize> {
    if !driven {
        body.velocity.y += gravity * dt;
        body.pos += body.velocity * dt;
    }

    body.touching_down = false;
    let mut contact = None;

    if body.velocity.y >= 0.0 {
        for (index, platform) in level.iter() {
            let half = platform.half_size();
            let overlaps_x = (body.pos.x - platform.pos.x).abs() < body.half_size.x + half.x;
            let top = platform.top();
            let bottom = body.bottom();
            // Anything deeper than half the platform came from below or the side.
            if overlaps_x && bottom >= top - CONTACT_SLOP && bottom <= top + half.y {
                if !driven {
                    body.pos.y = top - body.half_size.y;
                    body.velocity.y = 0.0;
                }
                body.touching_down = true;
                contact = Some(index);
                break;
            }
        }
    }

    if !driven {
        let min = bounds.min + body.half_size;
        let max = bounds.max - body.half_size;
        if body.pos.x < min.x || body.pos.x > max.x {
            body.pos.x = body.pos.x.clamp(min.x, max.x);
            body.velocity.x = 0.0;
        }
        if body.pos.y < min.y || body.pos.y > max.y {
            body.pos.y = body.pos.y.clamp(min.y, max.y);
            body.velocity.y = 0.0;
        }
    }

    contact
}

pub fn apply_physics(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    level: Res<Level>,
    mut contacts: EventWriter<PlatformContact>,
    mut q: Query<(Entity, &mut Body, Option<&Player>)>,
) {
    let dt = time.delta_seconds().min(MAX_PHYSICS_DT);
    for (entity, mut body, player) in &mut q {
        let driven = player.is_some_and(|p| p.is_jumping);
        if let Some(platform) =
            step_body(&mut body, &level, cfg.world_bounds, cfg.gravity, dt, driven)
        {
            contacts.send(PlatformContact { entity, platform });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        Level::from_specs(&GameConfig::default().platforms)
    }

    fn player_body(pos: Vec2) -> Body {
        Body::new(pos, Vec2::new(39.0, 30.0))
    }

    fn bounds() -> Rect {
        GameConfig::default().world_bounds
    }

    #[test]
    fn falling_body_lands_on_platform_top() {
        let level = level();
        let mut body = player_body(Vec2::new(125.0, 375.0));
        let mut landed = None;
        for _ in 0..120 {
            if let Some(i) = step_body(&mut body, &level, bounds(), 300.0, 1.0 / 60.0, false) {
                landed = Some(i);
            }
        }
        assert_eq!(landed, Some(0));
        assert!(body.touching_down);
        assert!((body.bottom() - level.get(0).unwrap().top()).abs() < 1e-3);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn resting_body_stays_in_contact() {
        let level = level();
        let top = level.get(3).unwrap().top();
        let mut body = player_body(Vec2::new(500.0, top - 30.0));
        for _ in 0..10 {
            assert_eq!(
                step_body(&mut body, &level, bounds(), 300.0, 1.0 / 60.0, false),
                Some(3)
            );
        }
    }

    #[test]
    fn driven_body_is_not_moved() {
        let level = level();
        let mut body = player_body(Vec2::new(300.0, 200.0));
        let contact = step_body(&mut body, &level, bounds(), 300.0, 1.0 / 60.0, true);
        assert_eq!(contact, None);
        assert_eq!(body.pos, Vec2::new(300.0, 200.0));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(!body.touching_down);
    }

    #[test]
    fn driven_body_reports_contact_at_rest_height() {
        let level = level();
        let top = level.get(2).unwrap().top();
        let mut body = player_body(Vec2::new(375.0, top - 30.0));
        assert_eq!(
            step_body(&mut body, &level, bounds(), 300.0, 1.0 / 60.0, true),
            Some(2)
        );
        assert!(body.touching_down);
    }

    #[test]
    fn world_bounds_hold_the_body() {
        let level = Level::default();
        let mut body = player_body(Vec2::new(790.0, 100.0));
        body.velocity.x = 500.0;
        step_body(&mut body, &level, bounds(), 0.0, 1.0 / 60.0, false);
        assert_eq!(body.pos.x, 800.0 - 39.0);
        assert_eq!(body.velocity.x, 0.0);

        let mut body = player_body(Vec2::new(400.0, 590.0));
        body.velocity.y = 200.0;
        step_body(&mut body, &level, bounds(), 300.0, 1.0 / 60.0, false);
        assert_eq!(body.pos.y, 600.0 - 30.0);
        assert!(!body.touching_down);
    }
}
