mod animation;
mod config;
mod gameplay;
mod gesture;
mod input;
mod jump;
mod level;
mod physics;
mod player;
mod scene;


use bevy::prelude::*;
use bevy::window::WindowResolution;

use animation::{animate_sprite, apply_pose, load_player_sheets, PlayerSheets};
use config::{GameConfig, CANVAS_HEIGHT, CANVAS_WIDTH};
use gameplay::{GameplayPlugin, GameplaySet};
use input::collect_pointer_input;
use scene::{
    attach_player_sprite, configure_gizmos, draw_debug_bodies, draw_trajectory_preview,
    setup_camera, spawn_scenery, sync_body_transforms,
};

fn main() {
    let config = GameConfig::default().with_args(std::env::args().skip(1));
    let debug_bodies = config.debug_bodies;

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "jumper".into(),
            name: Some("jumper".into()),
            resolution: WindowResolution::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            resizable: false,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
    .init_resource::<PlayerSheets>()
    .add_plugins(GameplayPlugin { config })
    .add_systems(
        Startup,
        (
            setup_camera,
            configure_gizmos,
            spawn_scenery,
            load_player_sheets,
        ),
    )
    .add_systems(Update, collect_pointer_input.in_set(GameplaySet::Input))
    .add_systems(
        Update,
        (
            attach_player_sprite,
            apply_pose,
            animate_sprite,
            sync_body_transforms,
            draw_trajectory_preview,
            draw_debug_bodies,
        )
            .chain()
            .after(GameplaySet::Reconcile),
    );

    if debug_bodies {
        info!("Drawing physics bodies (--debug).");
    } else {
        info!("Swipe left or right to jump (pass --debug to draw physics bodies).");
    }

    app.run();
}
