//! Player physics: the moth
//!
//! The flap model: a press sets a strong upward impulse, but only once the
//! rise accumulator has settled back past the re-arm threshold, so mashing
//! the key cannot stack impulses. A release refunds part of the impulse,
//! which makes taps and holds trace different arcs.

use glam::IVec2;

use super::rect::{ColliderSet, MOTH_BOXES};
use crate::consts::*;

/// The player character
#[derive(Debug, Clone)]
pub struct Moth {
    pos: IVec2,
    /// Integer velocity applied to the position each frame
    vel_y: i32,
    /// Float accumulator the integer velocity is derived from
    rise_vel: f32,
    colliders: ColliderSet,
}

impl Moth {
    /// Spawn centered on screen
    pub fn new() -> Self {
        let pos = IVec2::new(SCREEN_W / 2 - MOTH_W / 2, SCREEN_H / 2 - MOTH_H / 2);
        Self {
            pos,
            vel_y: 0,
            rise_vel: 0.0,
            colliders: ColliderSet::new(&MOTH_BOXES, pos),
        }
    }

    /// Control pressed. Fires only when the accumulator has re-armed.
    pub fn flap_pressed(&mut self) {
        if self.rise_vel >= FLAP_REARM {
            self.rise_vel = FLAP_IMPULSE;
        }
    }

    /// Control released: refund part of the impulse
    pub fn flap_released(&mut self) {
        self.rise_vel += FLAP_REARM;
    }

    /// One simulated millisecond of gravity
    pub fn gravitate(&mut self) {
        self.rise_vel += RISE_STEP;
        self.vel_y = self.rise_vel.floor() as i32;
    }

    /// Per-frame integration. Returns true when the moth would leave the
    /// screen vertically; the position delta is reverted first so the next
    /// rendered frame shows the last legal position.
    pub fn advance(&mut self) -> bool {
        if self.vel_y >= GRAVITY as i32 {
            self.vel_y = GRAVITY as i32;
        }
        self.pos.y += self.vel_y;
        self.colliders.reposition(self.pos);

        if self.pos.y < 0 || self.pos.y + MOTH_H > SCREEN_H {
            self.pos.y -= self.vel_y;
            self.colliders.reposition(self.pos);
            return true;
        }
        false
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }
}

impl Default for Moth {
    fn default() -> Self {
        Self::new()
    }
}
