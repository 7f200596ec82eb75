use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::gesture::PointerEvent;

/// The one finger that owns the current swipe; other fingers are ignored.
#[derive(Default, Debug)]
pub struct SwipeFinger {
    active: Option<u64>,
}

impl SwipeFinger {
    /// Claim the swipe for `id` if no finger holds it.
    pub fn press(&mut self, id: u64) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn owns(&self, id: u64) -> bool {
        self.active == Some(id)
    }

    /// Release the swipe if `id` holds it.
    pub fn release(&mut self, id: u64) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.active = None;
        true
    }
}

/// Normalise mouse and touch input into the frame's pointer-event queue.
/// Window logical coordinates already match canvas space (top-left, y down).
pub fn collect_pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cursor_moves: EventReader<CursorMoved>,
    mut pointer: EventWriter<PointerEvent>,
    mut finger: Local<SwipeFinger>,
) {
    let cursor = windows.get_single().ok().and_then(|w| w.cursor_position());

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(p) = cursor {
            pointer.send(PointerEvent::Down(p));
        }
    }
    for touch in touches.iter_just_pressed() {
        if finger.press(touch.id()) {
            pointer.send(PointerEvent::Down(touch.position()));
        }
    }

    for moved in cursor_moves.read() {
        pointer.send(PointerEvent::Move(moved.position));
    }
    for touch in touches.iter() {
        if finger.owns(touch.id()) && touch.delta() != Vec2::ZERO {
            pointer.send(PointerEvent::Move(touch.position()));
        }
    }

    if buttons.just_released(MouseButton::Left) {
        pointer.send(PointerEvent::Up(cursor.unwrap_or_default()));
    }
    for touch in touches
        .iter_just_released()
        .chain(touches.iter_just_canceled())
    {
        if finger.release(touch.id()) {
            pointer.send(PointerEvent::Up(touch.position()));
        }
    }
}
