use bevy::prelude::*;

use crate::config::GameConfig;
use crate::gesture::{interpret_pointer_events, Gesture, PointerEvent, TrajectoryPreview};
use crate::jump::{advance_jump_tweens, execute_jump_requests, JumpRequest};
use crate::level::Level;
use crate::physics::{apply_physics, PlatformContact};
use crate::player::{reconcile_player, spawn_player, track_platform_contacts};

/// Per-frame order of the simulation. Presentation runs after `Reconcile`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Gesture,
    Jump,
    Physics,
    Contacts,
    Reconcile,
}

/// Headless game rules: world state, input interpretation, jumps and physics.
#[derive(Default)]
pub struct GameplayPlugin {
    pub config: GameConfig,
}

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(Level::from_specs(&self.config.platforms))
            .init_resource::<Gesture>()
            .init_resource::<TrajectoryPreview>()
            .add_event::<PointerEvent>()
            .add_event::<JumpRequest>()
            .add_event::<PlatformContact>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Gesture,
                    GameplaySet::Jump,
                    GameplaySet::Physics,
                    GameplaySet::Contacts,
                    GameplaySet::Reconcile,
                )
                    .chain(),
            )
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    interpret_pointer_events.in_set(GameplaySet::Gesture),
                    (execute_jump_requests, advance_jump_tweens)
                        .chain()
                        .in_set(GameplaySet::Jump),
                    apply_physics.in_set(GameplaySet::Physics),
                    track_platform_contacts.in_set(GameplaySet::Contacts),
                    reconcile_player.in_set(GameplaySet::Reconcile),
                ),
            );
    }
}
