//! Swipe interpretation: pointer down/move/up in canvas space becomes a
//! signed platform-step count, a live trajectory preview, and on release a
//! [`JumpRequest`].

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::config::GameConfig;
use crate::jump::{arc_peak, Direction, JumpRequest};
use crate::level::Level;
use crate::physics::Body;
use crate::player::Player;

/// Engine-independent pointer input, queued once per frame.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct Gesture {
    start: Option<Vec2>,
    predicted_steps: i64,
    was_grounded: bool,
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    pub fn reset(&mut self) {
        self.start = None;
        self.predicted_steps = 0;
    }
}

/// Polyline and landing marker for the jump the current swipe would make.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct TrajectoryPreview {
    pub path: Vec<Vec2>,
    pub landing: Option<Vec2>,
}

impl TrajectoryPreview {
    pub fn clear(&mut self) {
        self.path.clear();
        self.landing = None;
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.landing.is_none()
    }
}

/// Everything a swipe is measured against.
pub struct SwipeContext<'a> {
    pub level: &'a Level,
    pub origin: Option<usize>,
    pub player_pos: Vec2,
    pub pixels_per_step: f32,
    pub base_arc_height: f32,
    pub segments: usize,
}

/// Signed effective steps for a horizontal swipe of `delta_x` from `origin`:
/// rounded to whole steps, capped by the origin's range, then clamped to the row.
pub fn swipe_steps(
    level: &Level,
    origin: Option<usize>,
    delta_x: f32,
    pixels_per_step: f32,
) -> i64 {
    let Some(origin) = origin else {
        return 0;
    };
    let Some(allowed) = level.jump_range(origin) else {
        return 0;
    };
    let direction = Direction::of(delta_x);
    let raw = (delta_x.abs() / pixels_per_step).round() as u32;
    let steps = raw.min(allowed);
    let destination = level.clamp_index(origin, direction.sign() * steps as i64);
    destination as i64 - origin as i64
}

/// Sample the arc from `start` to `dest_x` into `segments + 1` points.
pub fn trajectory(start: Vec2, dest_x: f32, peak: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            Vec2::new(
                start.x + (dest_x - start.x) * t,
                start.y - peak * (PI * t).sin(),
            )
        })
        .collect()
}

impl Gesture {
    /// Feed one pointer event. Returns the jump to request on a qualifying release.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        ctx: &SwipeContext,
        preview: &mut TrajectoryPreview,
    ) -> Option<JumpRequest> {
        match event {
            PointerEvent::Down(p) => {
                self.start = Some(p);
                self.predicted_steps = 0;
                None
            }
            PointerEvent::Move(p) => {
                let start = self.start?;
                let steps = swipe_steps(ctx.level, ctx.origin, p.x - start.x, ctx.pixels_per_step);
                self.predicted_steps = steps;
                preview.clear();

                let Some(origin) = ctx.origin.filter(|_| steps != 0) else {
                    return None;
                };
                let dest = ctx.level.get(ctx.level.clamp_index(origin, steps))?;
                let peak = arc_peak(ctx.base_arc_height, steps);
                preview.path = trajectory(ctx.player_pos, dest.pos.x, peak, ctx.segments);
                preview.landing = Some(Vec2::new(dest.pos.x, ctx.player_pos.y));
                None
            }
            PointerEvent::Up(_) => {
                preview.clear();
                if self.start.is_none() {
                    return None;
                }
                let steps = self.predicted_steps;
                self.reset();
                (steps != 0).then(|| JumpRequest {
                    steps: steps.unsigned_abs() as u32,
                    direction: if steps < 0 {
                        Direction::Left
                    } else {
                        Direction::Right
                    },
                })
            }
        }
    }
}

pub fn interpret_pointer_events(
    cfg: Res<GameConfig>,
    level: Res<Level>,
    mut gesture: ResMut<Gesture>,
    mut preview: ResMut<TrajectoryPreview>,
    mut pointer: EventReader<PointerEvent>,
    mut jumps: EventWriter<JumpRequest>,
    q: Query<(&Player, &Body)>,
) {
    let Ok((player, body)) = q.get_single() else {
        pointer.clear();
        return;
    };

    // Leaving the ground abandons the swipe in progress.
    if gesture.was_grounded && !body.touching_down && gesture.is_active() {
        gesture.reset();
        preview.clear();
    }
    gesture.was_grounded = body.touching_down;

    let ctx = SwipeContext {
        level: &level,
        origin: player.current_platform,
        player_pos: body.pos,
        pixels_per_step: cfg.pixels_per_step,
        base_arc_height: cfg.base_arc_height,
        segments: cfg.preview_segments,
    };
    for event in pointer.read() {
        if let Some(request) = gesture.handle(*event, &ctx, &mut preview) {
            jumps.send(request);
        }
    }
}
