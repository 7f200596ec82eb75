use bevy::prelude::*;
use std::f32::consts::PI;
use std::fmt;

use crate::config::GameConfig;
use crate::level::Level;
use crate::physics::Body;
use crate::player::{Player, Pose};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Zero counts as rightward.
    pub fn of(delta: f32) -> Self {
        if delta >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn sign(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Ask the player to jump `steps` platform slots. Any system may send one;
/// the executor validates it independently of the gesture interpreter.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JumpRequest {
    pub steps: u32,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpRefusal {
    Airborne,
    AlreadyJumping,
    UnknownOrigin,
    TooFar { requested: u32, allowed: u32 },
    NoDisplacement,
}

impl fmt::Display for JumpRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpRefusal::Airborne => write!(f, "not standing on a platform"),
            JumpRefusal::AlreadyJumping => write!(f, "already jumping"),
            JumpRefusal::UnknownOrigin => write!(f, "origin platform unknown"),
            JumpRefusal::TooFar { requested, allowed } => write!(
                f,
                "jump too far! requested {requested} steps, allowed steps: {allowed}"
            ),
            JumpRefusal::NoDisplacement => write!(f, "destination is the origin"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JumpPlan {
    pub origin: usize,
    pub destination: usize,
    /// Signed slot displacement after clamping to the row.
    pub effective_steps: i64,
}

/// Validate a request against the player's state and the origin's range.
pub fn plan_jump(
    level: &Level,
    player: &Player,
    grounded: bool,
    request: JumpRequest,
) -> Result<JumpPlan, JumpRefusal> {
    if !grounded {
        return Err(JumpRefusal::Airborne);
    }
    if player.is_jumping {
        return Err(JumpRefusal::AlreadyJumping);
    }
    let origin = player.current_platform.ok_or(JumpRefusal::UnknownOrigin)?;
    let allowed = level.jump_range(origin).ok_or(JumpRefusal::UnknownOrigin)?;
    if request.steps > allowed {
        return Err(JumpRefusal::TooFar {
            requested: request.steps,
            allowed,
        });
    }

    let destination = level.clamp_index(origin, request.direction.sign() * request.steps as i64);
    let effective_steps = destination as i64 - origin as i64;
    if effective_steps == 0 {
        return Err(JumpRefusal::NoDisplacement);
    }

    Ok(JumpPlan {
        origin,
        destination,
        effective_steps,
    })
}

/// Arc height grows linearly with the distance actually travelled.
pub fn arc_peak(base_height: f32, effective_steps: i64) -> f32 {
    base_height * effective_steps.unsigned_abs() as f32
}

/// Vertical offset (canvas space, negative is up) at linear progress `t`.
pub fn arc_offset(peak: f32, t: f32) -> f32 {
    -peak * (PI * t).sin()
}

pub fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Position-driven arc between two platforms. While present the body is not
/// integrated by physics.
#[derive(Component, Debug)]
pub struct JumpTween {
    pub start_x: f32,
    pub dest_x: f32,
    pub base_y: f32,
    pub peak: f32,
    pub timer: Timer,
}

impl JumpTween {
    pub fn new(start: Vec2, dest_x: f32, peak: f32, duration: f32) -> Self {
        Self {
            start_x: start.x,
            dest_x,
            base_y: start.y,
            peak,
            timer: Timer::from_seconds(duration, TimerMode::Once),
        }
    }

    pub fn progress(&self) -> f32 {
        self.timer.fraction()
    }

    pub fn sample(&self) -> Vec2 {
        let t = self.progress();
        Vec2::new(
            self.start_x + (self.dest_x - self.start_x) * ease_out_quad(t),
            self.base_y + arc_offset(self.peak, t),
        )
    }
}

pub fn execute_jump_requests(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    level: Res<Level>,
    mut requests: EventReader<JumpRequest>,
    mut q: Query<(Entity, &mut Player, &mut Body)>,
) {
    let Ok((entity, mut player, mut body)) = q.get_single_mut() else {
        requests.clear();
        return;
    };

    for request in requests.read() {
        let plan = match plan_jump(&level, &player, body.touching_down, *request) {
            Ok(plan) => plan,
            Err(refusal @ JumpRefusal::TooFar { .. }) => {
                info!("{refusal}");
                continue;
            }
            Err(refusal) => {
                debug!("jump ignored: {refusal}");
                continue;
            }
        };
        let Some(dest) = level.get(plan.destination) else {
            continue;
        };

        player.is_jumping = true;
        player.pose = Pose::Jump;
        player.facing_left = plan.effective_steps < 0;
        body.velocity = Vec2::ZERO;

        let peak = arc_peak(cfg.base_arc_height, plan.effective_steps);
        commands
            .entity(entity)
            .insert(JumpTween::new(body.pos, dest.pos.x, peak, cfg.jump_duration));
        info!(
            "jump {} -> {} ({} steps)",
            plan.origin, plan.destination, plan.effective_steps
        );
    }
}

pub fn advance_jump_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut JumpTween, &mut Body, &mut Player)>,
) {
    for (entity, mut tween, mut body, mut player) in &mut q {
        tween.timer.tick(time.delta());
        body.pos = tween.sample();
        if tween.timer.finished() {
            player.is_jumping = false;
            player.pose = Pose::Idle;
            commands.entity(entity).remove::<JumpTween>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn level() -> Level {
        Level::from_specs(&GameConfig::default().platforms)
    }

    fn standing_on(index: usize) -> Player {
        Player {
            current_platform: Some(index),
            ..default()
        }
    }

    fn right(steps: u32) -> JumpRequest {
        JumpRequest {
            steps,
            direction: Direction::Right,
        }
    }

    fn left(steps: u32) -> JumpRequest {
        JumpRequest {
            steps,
            direction: Direction::Left,
        }
    }

    #[test]
    fn accepted_jump_matches_clamped_destination() {
        let level = level();
        for origin in 0..level.len() {
            let range = level.jump_range(origin).unwrap();
            for steps in 0..=6u32 {
                for req in [right(steps), left(steps)] {
                    let result = plan_jump(&level, &standing_on(origin), true, req);
                    if steps > range {
                        assert!(matches!(result, Err(JumpRefusal::TooFar { .. })));
                        continue;
                    }
                    let expected = level.clamp_index(origin, req.direction.sign() * steps as i64);
                    match result {
                        Ok(plan) => {
                            assert_eq!(plan.destination, expected);
                            assert!(plan.effective_steps.unsigned_abs() <= range as u64);
                        }
                        Err(refusal) => {
                            assert_eq!(refusal, JumpRefusal::NoDisplacement);
                            assert_eq!(expected, origin);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn no_jump_while_jumping_or_airborne() {
        let level = level();
        let mut player = standing_on(1);
        player.is_jumping = true;
        assert_eq!(
            plan_jump(&level, &player, true, right(1)),
            Err(JumpRefusal::AlreadyJumping)
        );
        assert_eq!(
            plan_jump(&level, &standing_on(1), false, right(1)),
            Err(JumpRefusal::Airborne)
        );
        assert_eq!(
            plan_jump(&level, &Player::default(), true, right(1)),
            Err(JumpRefusal::UnknownOrigin)
        );
    }

    #[test]
    fn zero_range_platform_refuses_every_jump() {
        let level = level();
        assert_eq!(
            plan_jump(&level, &standing_on(2), true, right(1)),
            Err(JumpRefusal::TooFar {
                requested: 1,
                allowed: 0
            })
        );
        assert_eq!(
            plan_jump(&level, &standing_on(2), true, left(0)),
            Err(JumpRefusal::NoDisplacement)
        );
    }

    #[test]
    fn boundary_clamp_shortens_jump() {
        let level = level();
        let plan = plan_jump(&level, &standing_on(1), true, left(3)).unwrap();
        assert_eq!(plan.destination, 0);
        assert_eq!(plan.effective_steps, -1);
        assert_eq!(
            plan_jump(&level, &standing_on(4), true, right(2)),
            Err(JumpRefusal::NoDisplacement)
        );
    }

    #[test]
    fn arc_peak_scales_with_distance() {
        assert_eq!(arc_peak(50.0, 0), 0.0);
        let mut last = 0.0;
        for steps in 1..6 {
            let peak = arc_peak(50.0, -steps);
            assert!(peak > last);
            assert_eq!(peak, arc_peak(50.0, steps));
            last = peak;
        }
    }

    #[test]
    fn tween_starts_and_ends_at_base_height() {
        let mut tween = JumpTween::new(Vec2::new(250.0, 424.0), 500.0, 100.0, 0.5);
        assert_eq!(tween.sample(), Vec2::new(250.0, 424.0));

        tween.timer.tick(Duration::from_secs_f32(0.25));
        let mid = tween.sample();
        assert!((mid.y - 324.0).abs() < 1e-3);
        // Quad ease-out is ahead of linear at the halfway mark.
        assert!((mid.x - (250.0 + 250.0 * 0.75)).abs() < 1e-3);

        tween.timer.tick(Duration::from_secs_f32(0.25));
        assert!(tween.timer.finished());
        let end = tween.sample();
        assert!((end.x - 500.0).abs() < 1e-3);
        assert!((end.y - 424.0).abs() < 1e-3);
    }

    #[test]
    fn tween_end_does_not_move_current_platform() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .add_systems(Update, advance_jump_tweens);
        let mut tween = JumpTween::new(Vec2::new(250.0, 424.0), 500.0, 100.0, 0.5);
        tween.timer.tick(Duration::from_secs_f32(0.5));
        let entity = app
            .world_mut()
            .spawn((
                Player {
                    is_jumping: true,
                    current_platform: Some(1),
                    pose: Pose::Jump,
                    facing_left: false,
                },
                Body::new(Vec2::new(250.0, 424.0), Vec2::new(39.0, 30.0)),
                tween,
            ))
            .id();
        app.update();

        let player = app.world().get::<Player>(entity).unwrap();
        assert!(!player.is_jumping);
        assert_eq!(player.pose, Pose::Idle);
        assert_eq!(player.current_platform, Some(1));
        assert!(app.world().get::<JumpTween>(entity).is_none());
        let body = app.world().get::<Body>(entity).unwrap();
        assert!((body.pos.x - 500.0).abs() < 1e-3);
    }

    #[test]
    fn refusal_message_names_allowed_steps() {
        let msg = JumpRefusal::TooFar {
            requested: 3,
            allowed: 2,
        }
        .to_string();
        assert!(msg.contains("allowed steps: 2"));
    }
}
