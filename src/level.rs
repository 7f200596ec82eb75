use bevy::prelude::*;

use crate::config::{PlatformSpec, PLATFORM_IMAGE};

/// One platform of the row. Immutable after world setup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Platform {
    pub pos: Vec2,
    pub scale: f32,
    pub jump_range: u32,
}

impl Platform {
    pub fn half_size(&self) -> Vec2 {
        Vec2::new(PLATFORM_IMAGE.0, PLATFORM_IMAGE.1) * self.scale * 0.5
    }

    /// Canvas y of the walkable surface.
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_size().y
    }
}

/// The static platform row, indexed left to right.
#[derive(Resource, Clone, Debug, Default)]
pub struct Level {
    platforms: Vec<Platform>,
}

/// Marks the sprite entity drawn for a platform.
#[derive(Component, Clone, Copy, Debug)]
pub struct PlatformTag(pub usize);

impl Level {
    pub fn from_specs(specs: &[PlatformSpec]) -> Self {
        Self {
            platforms: specs
                .iter()
                .map(|s| Platform {
                    pos: s.pos,
                    scale: s.scale,
                    jump_range: s.jump_range,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Platform> {
        self.platforms.get(index)
    }

    pub fn jump_range(&self, index: usize) -> Option<u32> {
        self.get(index).map(|p| p.jump_range)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Platform)> {
        self.platforms.iter().enumerate()
    }

    /// Clamp `origin + offset` into the row. Returns `origin` for an empty row.
    pub fn clamp_index(&self, origin: usize, offset: i64) -> usize {
        if self.is_empty() {
            return origin;
        }
        let last = (self.len() - 1) as i64;
        (origin as i64 + offset).clamp(0, last) as usize
    }
}
