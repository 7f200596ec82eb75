use bevy::prelude::*;

use crate::animation::{Anim, PlayerSheets};
use crate::config::{
    canvas_to_world, GameConfig, BACKGROUND_POS, BACKGROUND_SCALE, LABEL_FONT_SIZE,
    LANDING_MARKER_RADIUS, PLAYER_SCALE, PREVIEW_LINE_WIDTH,
};
use crate::gesture::TrajectoryPreview;
use crate::level::{Level, PlatformTag};
use crate::physics::Body;
use crate::player::{Player, Pose};

const Z_BACKGROUND: f32 = -10.0;
const Z_PLATFORM: f32 = 0.0;
const Z_LABEL: f32 = 0.5;
const Z_PLAYER: f32 = 1.0;

// Dark plate behind each range label so it reads against the grass texture.
const LABEL_BACKING: Vec2 = Vec2::new(44.0, 58.0);
const LABEL_BACKING_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

pub fn configure_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    config.line_width = PREVIEW_LINE_WIDTH;
}

/// Background and the platform row, each platform labelled with its jump range.
pub fn spawn_scenery(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<GameConfig>,
    level: Res<Level>,
) {
    let bg = canvas_to_world(Vec2::new(BACKGROUND_POS.0, BACKGROUND_POS.1), cfg.canvas);
    commands.spawn(SpriteBundle {
        texture: asset_server.load("images/background/MainBackGround.png"),
        transform: Transform::from_translation(bg.extend(Z_BACKGROUND))
            .with_scale(Vec3::splat(BACKGROUND_SCALE)),
        ..default()
    });

    let platform_texture: Handle<Image> =
        asset_server.load("images/background/GrassPlatform.png");
    for (index, platform) in level.iter() {
        let at = canvas_to_world(platform.pos, cfg.canvas);
        commands.spawn((
            SpriteBundle {
                texture: platform_texture.clone(),
                transform: Transform::from_translation(at.extend(Z_PLATFORM))
                    .with_scale(Vec3::splat(platform.scale)),
                ..default()
            },
            PlatformTag(index),
        ));
        let (backing, label) = range_label(platform.jump_range, at);
        commands.spawn(backing);
        commands.spawn(label);
    }
}

/// Jump-range number centred on a platform, over a dark backing plate.
fn range_label(jump_range: u32, at: Vec2) -> (SpriteBundle, Text2dBundle) {
    let backing = SpriteBundle {
        sprite: Sprite {
            color: LABEL_BACKING_COLOR,
            custom_size: Some(LABEL_BACKING),
            ..default()
        },
        transform: Transform::from_translation(at.extend(Z_LABEL - 0.1)),
        ..default()
    };
    let label = Text2dBundle {
        text: Text::from_section(
            jump_range.to_string(),
            TextStyle {
                font_size: LABEL_FONT_SIZE,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_justify(JustifyText::Center),
        transform: Transform::from_translation(at.extend(Z_LABEL)),
        ..default()
    };
    (backing, label)
}

/// Give a freshly spawned player its sprite, starting on the idle sheet.
pub fn attach_player_sprite(
    mut commands: Commands,
    sheets: Res<PlayerSheets>,
    q: Query<Entity, Added<Player>>,
) {
    for entity in &q {
        commands.entity(entity).insert((
            SpriteBundle {
                texture: sheets.idle_texture.clone(),
                transform: Transform::from_scale(Vec3::splat(PLAYER_SCALE)),
                ..default()
            },
            TextureAtlas {
                layout: sheets.idle_layout.clone(),
                index: 0,
            },
            Anim::new(Pose::Idle),
        ));
    }
}

/// Bodies live in canvas space; mirror them into world transforms.
pub fn sync_body_transforms(cfg: Res<GameConfig>, mut q: Query<(&Body, &mut Transform)>) {
    for (body, mut tf) in &mut q {
        tf.translation = canvas_to_world(body.pos, cfg.canvas).extend(Z_PLAYER);
    }
}

pub fn draw_trajectory_preview(
    cfg: Res<GameConfig>,
    preview: Res<TrajectoryPreview>,
    player: Query<&Body, With<Player>>,
    mut gizmos: Gizmos,
) {
    if preview.is_empty() {
        return;
    }
    // Gizmos draw over every sprite, so keep the line off the player.
    let path = match player.get_single() {
        Ok(body) => path_outside_body(&preview.path, body),
        Err(_) => &preview.path[..],
    };
    if path.len() > 1 {
        gizmos.linestrip_2d(
            path.iter().map(|p| canvas_to_world(*p, cfg.canvas)),
            Color::BLACK,
        );
    }
    if let Some(landing) = preview.landing {
        let at = canvas_to_world(landing, cfg.canvas);
        // Gizmos only stroke; shrink rings to suggest a filled marker.
        let mut r = LANDING_MARKER_RADIUS;
        while r > 0.0 {
            gizmos.circle_2d(at, r, Color::BLACK);
            r -= PREVIEW_LINE_WIDTH;
        }
    }
}

/// Drop the leading points of `path` that fall inside `body`.
fn path_outside_body<'a>(path: &'a [Vec2], body: &Body) -> &'a [Vec2] {
    let first_outside = path
        .iter()
        .position(|p| {
            let d = (*p - body.pos).abs();
            d.x > body.half_size.x || d.y > body.half_size.y
        })
        .unwrap_or(path.len());
    &path[first_outside..]
}

pub fn draw_debug_bodies(
    cfg: Res<GameConfig>,
    level: Res<Level>,
    platforms: Query<&PlatformTag>,
    bodies: Query<&Body>,
    mut gizmos: Gizmos,
) {
    if !cfg.debug_bodies {
        return;
    }
    let debug_color = Color::srgb(1.0, 0.0, 1.0);
    for platform in platforms.iter().filter_map(|tag| level.get(tag.0)) {
        gizmos.rect_2d(
            canvas_to_world(platform.pos, cfg.canvas),
            0.0,
            platform.half_size() * 2.0,
            debug_color,
        );
    }
    for body in &bodies {
        let color = if body.touching_down {
            Color::srgb(0.0, 1.0, 0.0)
        } else {
            debug_color
        };
        gizmos.rect_2d(
            canvas_to_world(body.pos, cfg.canvas),
            0.0,
            body.half_size * 2.0,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::trajectory;

    #[test]
    fn range_label_sits_on_a_dark_plate() {
        let at = Vec2::new(-355.0, -205.0);
        let (backing, label) = range_label(3, at);

        assert_eq!(label.text.sections[0].value, "3");
        assert_eq!(label.text.sections[0].style.color, Color::WHITE);
        assert!(backing.transform.translation.z < label.transform.translation.z);
        assert_eq!(backing.transform.translation.truncate(), at);

        let size = backing.sprite.custom_size.unwrap();
        assert!(size.y >= LABEL_FONT_SIZE);
        assert!(backing.sprite.color.alpha() > 0.5);
    }

    #[test]
    fn preview_line_starts_at_player_edge() {
        let body = Body::new(Vec2::new(125.0, 424.0), Vec2::new(39.0, 30.0));
        let path = trajectory(body.pos, 375.0, 100.0, 20);
        let visible = path_outside_body(&path, &body);

        assert!(!visible.is_empty());
        assert!(visible.len() < path.len());
        let first = visible[0];
        assert!((first.x - body.pos.x).abs() > 39.0 || (first.y - body.pos.y).abs() > 30.0);
        assert_eq!(visible.last(), path.last());
    }

    #[test]
    fn path_fully_inside_body_draws_nothing() {
        let body = Body::new(Vec2::ZERO, Vec2::splat(50.0));
        let path = [Vec2::ZERO, Vec2::new(10.0, -5.0)];
        assert!(path_outside_body(&path, &body).is_empty());
    }
}
