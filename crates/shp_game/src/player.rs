//! Player movement: gravity, horizontal control, jump triggering.
//!
//! All tuning is in logical pixels per 30 Hz tick. The per-step order is
//! load-bearing and matches the game's observable behavior: gravity first
//! (with the floor clamp), then horizontal control and the horizontal move
//! with a resolver pass, then the jump check, then the vertical move with a
//! second resolver pass.

use crate::collision::{self, MotionState, Obstacle, RectF};

pub const SCREEN_W: f32 = 800.0;
pub const SCREEN_H: f32 = 600.0;
pub const PLAYER_SIZE: f32 = 100.0;
pub const GRAVITY: f32 = 0.5;
pub const ACCELERATION: f32 = 0.3;
pub const MAX_SPEED: f32 = 7.0;
pub const JUMP_STRENGTH: f32 = -12.0;

/// Which way the sprite faces. Rendering orientation only; no effect on
/// physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Snapshot of the gameplay keys for one fixed step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
    rect: RectF,
    velocity_x: f32,
    velocity_y: f32,
    facing: Facing,
    motion: MotionState,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: RectF::new(x, y, PLAYER_SIZE, PLAYER_SIZE),
            velocity_x: 0.0,
            velocity_y: 0.0,
            facing: Facing::Right,
            motion: MotionState::Grounded,
        }
    }

    pub fn rect(&self) -> RectF {
        self.rect
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    #[allow(dead_code)]
    pub fn motion(&self) -> MotionState {
        self.motion
    }

    #[allow(dead_code)]
    pub fn velocity(&self) -> (f32, f32) {
        (self.velocity_x, self.velocity_y)
    }

    /// One 30 Hz simulation step against the level's obstacle set.
    pub fn step(&mut self, input: FrameInput, obstacles: &[Obstacle]) {
        self.apply_gravity();

        if input.left {
            self.velocity_x = (self.velocity_x - ACCELERATION).max(-MAX_SPEED);
            self.facing = Facing::Left;
        } else if input.right {
            self.velocity_x = (self.velocity_x + ACCELERATION).min(MAX_SPEED);
            self.facing = Facing::Right;
        } else {
            // Instant stop, no deceleration ramp.
            self.velocity_x = 0.0;
        }

        self.rect.x += self.velocity_x;
        collision::resolve_overlaps(
            &mut self.rect,
            &mut self.velocity_y,
            &mut self.motion,
            obstacles,
        );

        // Jump is legal from the floor line or with the buffer armed. The
        // key is sampled as held, so standing on the floor with Up down
        // re-triggers the instant the body becomes eligible again.
        if input.up
            && (self.rect.bottom() >= SCREEN_H || self.motion == MotionState::JumpBuffered)
        {
            self.jump();
        }

        self.rect.y += self.velocity_y;
        collision::resolve_overlaps(
            &mut self.rect,
            &mut self.velocity_y,
            &mut self.motion,
            obstacles,
        );
    }

    fn apply_gravity(&mut self) {
        self.velocity_y += GRAVITY;
        // The floor is the window's bottom edge, not level geometry. Floor
        // contact clamps position and velocity but leaves MotionState alone.
        if self.rect.y >= SCREEN_H - self.rect.h && self.velocity_y >= 0.0 {
            self.velocity_y = 0.0;
            self.rect.y = SCREEN_H - self.rect.h;
        }
    }

    fn jump(&mut self) {
        self.velocity_y = JUMP_STRENGTH;
        self.motion = MotionState::Airborne;
    }

    /// Keep the body inside the screen's horizontal bounds. Called by the
    /// frame driver after each step.
    pub fn clamp_to_screen(&mut self) {
        if self.rect.right() > SCREEN_W {
            self.rect.set_right(SCREEN_W);
        }
        if self.rect.left() < 0.0 {
            self.rect.set_left(0.0);
        }
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }
}
