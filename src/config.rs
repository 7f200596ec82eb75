use bevy::prelude::*;

// ===== Canvas =====
pub const CANVAS_WIDTH: f32 = 960.0;
pub const CANVAS_HEIGHT: f32 = 540.0;

// ===== Arcade physics =====
pub const GRAVITY: f32 = 300.0; // px/s^2, canvas y points down
pub const WORLD_BOUNDS: (f32, f32) = (800.0, 600.0);
pub const MAX_PHYSICS_DT: f32 = 1.0 / 30.0;

// ===== Swipe / jump tuning =====
pub const PIXELS_PER_STEP: f32 = 50.0;
pub const BASE_ARC_HEIGHT: f32 = 50.0; // peak per platform slot
pub const JUMP_DURATION: f32 = 0.5;
pub const PREVIEW_SEGMENTS: usize = 20;
pub const PREVIEW_LINE_WIDTH: f32 = 3.5;
pub const LANDING_MARKER_RADIUS: f32 = 10.0;

// ===== Sprite sheets =====
pub const FRAME_W: u32 = 208;
pub const FRAME_H: u32 = 160;
pub const IDLE_FRAMES: usize = 12;
pub const JUMP_FRAMES: usize = 2;
pub const FPS_IDLE: f32 = 15.0;
pub const FPS_JUMP: f32 = 5.0;

// ===== Scene layout =====
pub const PLAYER_SCALE: f32 = 0.375;
pub const PLAYER_SPAWN: (f32, f32) = (125.0, 375.0);
pub const PLATFORM_SCALE: f32 = 0.15;
pub const PLATFORM_IMAGE: (f32, f32) = (740.0, 280.0);
pub const PLATFORM_XS: [f32; 5] = [125.0, 250.0, 375.0, 500.0, 625.0];
pub const PLATFORM_Y: f32 = 475.0;
pub const JUMP_RANGES: [u32; 5] = [2, 3, 0, 1, 4];
pub const BACKGROUND_POS: (f32, f32) = (480.0, 270.0);
pub const BACKGROUND_SCALE: f32 = 0.645;
pub const LABEL_FONT_SIZE: f32 = 52.0;

/// Authoring record for one platform of the row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformSpec {
    pub pos: Vec2,
    pub scale: f32,
    pub jump_range: u32,
}

/// Tuning for a session, built from the constants above and CLI flags.
#[derive(Resource, Clone, Debug)]
pub struct GameConfig {
    pub canvas: Vec2,
    pub gravity: f32,
    pub world_bounds: Rect,
    pub pixels_per_step: f32,
    pub base_arc_height: f32,
    pub jump_duration: f32,
    pub preview_segments: usize,
    pub player_spawn: Vec2,
    pub player_size: Vec2,
    pub platforms: Vec<PlatformSpec>,
    pub debug_bodies: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let platforms = PLATFORM_XS
            .iter()
            .zip(JUMP_RANGES)
            .map(|(&x, jump_range)| PlatformSpec {
                pos: Vec2::new(x, PLATFORM_Y),
                scale: PLATFORM_SCALE,
                jump_range,
            })
            .collect();

        Self {
            canvas: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            gravity: GRAVITY,
            world_bounds: Rect::new(0.0, 0.0, WORLD_BOUNDS.0, WORLD_BOUNDS.1),
            pixels_per_step: PIXELS_PER_STEP,
            base_arc_height: BASE_ARC_HEIGHT,
            jump_duration: JUMP_DURATION,
            preview_segments: PREVIEW_SEGMENTS,
            player_spawn: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            player_size: Vec2::new(FRAME_W as f32, FRAME_H as f32) * PLAYER_SCALE,
            platforms,
            debug_bodies: false,
        }
    }
}

impl GameConfig {
    /// Apply command-line flags (`--debug`).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            if arg.as_ref() == "--debug" {
                self.debug_bodies = true;
            }
        }
        self
    }
}

/// Canvas space (origin top-left, y down) to Bevy world space (origin centre, y up).
pub fn canvas_to_world(p: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(p.x - canvas.x * 0.5, canvas.y * 0.5 - p.y)
}
