use bevy::prelude::*;

use crate::config::GameConfig;
use crate::physics::{Body, PlatformContact};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Pose {
    #[default]
    Idle,
    Jump,
}

#[derive(Component, Clone, Debug, Default)]
pub struct Player {
    pub is_jumping: bool,
    /// None until the first platform contact.
    pub current_platform: Option<usize>,
    pub pose: Pose,
    pub facing_left: bool,
}

pub fn spawn_player(mut commands: Commands, cfg: Res<GameConfig>) {
    commands.spawn((
        Name::new("player"),
        Player::default(),
        Body::new(cfg.player_spawn, cfg.player_size * 0.5),
    ));
}

/// Record the platform the player last touched.
pub fn track_platform_contacts(
    mut contacts: EventReader<PlatformContact>,
    mut q: Query<&mut Player>,
) {
    for contact in contacts.read() {
        let Ok(mut player) = q.get_mut(contact.entity) else {
            continue;
        };
        if player.current_platform != Some(contact.platform) {
            debug!("player now on platform {}", contact.platform);
        }
        player.current_platform = Some(contact.platform);
    }
}

/// Grounded bodies don't drift, and a grounded player that isn't mid-jump is idle.
pub fn reconcile_player(mut q: Query<(&mut Player, &mut Body)>) {
    for (mut player, mut body) in &mut q {
        if !body.touching_down {
            continue;
        }
        body.velocity.x = 0.0;
        if !player.is_jumping && player.pose != Pose::Idle {
            player.pose = Pose::Idle;
        }
    }
}
