use bevy::prelude::*;
use std::time::Duration;

use crate::config::{FPS_IDLE, FPS_JUMP, FRAME_H, FRAME_W, IDLE_FRAMES, JUMP_FRAMES};
use crate::player::{Player, Pose};

/// One texture + atlas per pose; each sheet is a single row of frames.
#[derive(Resource, Default)]
pub struct PlayerSheets {
    pub idle_texture: Handle<Image>,
    pub idle_layout: Handle<TextureAtlasLayout>,
    pub jump_texture: Handle<Image>,
    pub jump_layout: Handle<TextureAtlasLayout>,
}

impl PlayerSheets {
    fn texture(&self, pose: Pose) -> Handle<Image> {
        match pose {
            Pose::Idle => self.idle_texture.clone(),
            Pose::Jump => self.jump_texture.clone(),
        }
    }

    fn layout(&self, pose: Pose) -> Handle<TextureAtlasLayout> {
        match pose {
            Pose::Idle => self.idle_layout.clone(),
            Pose::Jump => self.jump_layout.clone(),
        }
    }
}

/// Frame count and playback rate of the looping clip for a pose.
pub fn clip_for(pose: Pose) -> (usize, f32) {
    match pose {
        Pose::Idle => (IDLE_FRAMES, FPS_IDLE),
        Pose::Jump => (JUMP_FRAMES, FPS_JUMP),
    }
}

#[derive(Component)]
pub struct Anim {
    pub pose: Pose,
    pub len: usize,
    pub timer: Timer,
}

impl Anim {
    pub fn new(pose: Pose) -> Self {
        let (len, fps) = clip_for(pose);
        Self {
            pose,
            len,
            timer: Timer::from_seconds(1.0 / fps.max(1.0), TimerMode::Repeating),
        }
    }
}

pub fn load_player_sheets(
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut sheets: ResMut<PlayerSheets>,
) {
    let frame = UVec2::new(FRAME_W, FRAME_H);
    sheets.idle_texture = asset_server.load("images/player/idle-sheet.png");
    sheets.idle_layout = layouts.add(TextureAtlasLayout::from_grid(
        frame,
        IDLE_FRAMES as u32,
        1,
        None,
        None,
    ));
    sheets.jump_texture = asset_server.load("images/player/jump-sheet.png");
    sheets.jump_layout = layouts.add(TextureAtlasLayout::from_grid(
        frame,
        JUMP_FRAMES as u32,
        1,
        None,
        None,
    ));
}

/// Only switch sheets when the pose actually changes; snap to its first frame.
fn set_anim_if_changed(
    anim: &mut Anim,
    atlas: &mut TextureAtlas,
    texture: &mut Handle<Image>,
    sheets: &PlayerSheets,
    pose: Pose,
) {
    if anim.pose == pose {
        return;
    }
    let (len, fps) = clip_for(pose);
    anim.pose = pose;
    anim.len = len;
    anim.timer
        .set_duration(Duration::from_secs_f32(1.0 / fps.max(1.0)));
    anim.timer.reset();
    *texture = sheets.texture(pose);
    atlas.layout = sheets.layout(pose);
    atlas.index = 0;
}

/// Mirror the sprite and keep its sheet in step with the player's pose.
pub fn apply_pose(
    sheets: Res<PlayerSheets>,
    mut q: Query<(
        &Player,
        &mut Anim,
        &mut TextureAtlas,
        &mut Handle<Image>,
        &mut Sprite,
    )>,
) {
    for (player, mut anim, mut atlas, mut texture, mut sprite) in &mut q {
        set_anim_if_changed(&mut anim, &mut atlas, &mut texture, &sheets, player.pose);
        sprite.flip_x = player.facing_left;
    }
}

/// Advance the frame within the current clip, looping.
pub fn animate_sprite(time: Res<Time>, mut q: Query<(&mut TextureAtlas, &mut Anim)>) {
    for (mut atlas, mut anim) in &mut q {
        anim.timer.tick(time.delta());
        if anim.timer.just_finished() && anim.len > 0 {
            let steps = anim.timer.times_finished_this_tick() as usize;
            atlas.index = (atlas.index.min(anim.len - 1) + steps) % anim.len;
        }
    }
}
