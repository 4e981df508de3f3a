//! Platform collision resolution.
//!
//! The player is an axis-aligned rectangle tested against every obstacle in
//! insertion order, each overlap resolved independently by snapping along the
//! vertical axis and zeroing vertical velocity. Two deliberate oddities of the
//! game are preserved here rather than fixed, because both are observable in
//! play:
//!
//!  - The snap logic branches only on vertical velocity, so horizontal
//!    penetration is never pushed back. Side contacts are inert.
//!  - Any contact while the body is not mid-jump arms the jump buffer,
//!    including the landing contact itself. Landing on a platform therefore
//!    leaves the body in `JumpBuffered`, which is the only way a jump away
//!    from a platform (whose top is above the floor line) is possible.
//!
//! Simultaneous overlaps resolve in collection order with no distance
//! tie-break, so stacked platforms can resolve order-dependently.

/// Axis-aligned rectangle in logical pixels, top-left origin, y-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap: rectangles that merely share an edge do not overlap.
    /// This is what makes re-resolving an already-snapped pair a no-op.
    pub fn overlaps(&self, other: &RectF) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A static level rectangle. At most one obstacle per level carries the goal
/// flag; the resolver itself ignores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub rect: RectF,
    pub is_goal: bool,
}

/// Per-frame classification of the player body, derived from collision
/// outcomes and jump triggering. Replaces a pair of implicit booleans so the
/// buffer-arming rule above is explicit and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// On the floor line, or falling without having jumped.
    Grounded,
    /// Mid-jump: set by the jump trigger, cleared by a landing contact.
    Airborne,
    /// A contact armed the jump buffer; the next jump input is honored.
    JumpBuffered,
}

/// Resolve every body/obstacle overlap, in obstacle insertion order.
///
/// Moving down: the body's bottom snaps to the obstacle's top (a landing).
/// Moving up: the body's top snaps to the obstacle's bottom. Either way the
/// vertical velocity is zeroed. After each snap the jump buffer is armed
/// unless the body is still mid-jump.
pub fn resolve_overlaps(
    body: &mut RectF,
    velocity_y: &mut f32,
    motion: &mut MotionState,
    obstacles: &[Obstacle],
) {
    for obstacle in obstacles {
        if !body.overlaps(&obstacle.rect) {
            continue;
        }

        if *velocity_y > 0.0 {
            body.set_bottom(obstacle.rect.top());
            *velocity_y = 0.0;
            if *motion == MotionState::Airborne {
                *motion = MotionState::Grounded;
            }
        } else if *velocity_y < 0.0 {
            body.set_top(obstacle.rect.bottom());
            *velocity_y = 0.0;
        }

        if *motion != MotionState::Airborne {
            *motion = MotionState::JumpBuffered;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(x: f32, y: f32, w: f32, h: f32) -> Obstacle {
        Obstacle {
            rect: RectF::new(x, y, w, h),
            is_goal: false,
        }
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = RectF::new(0.0, 0.0, 100.0, 100.0);
        let b = RectF::new(100.0, 0.0, 100.0, 100.0);
        let c = RectF::new(0.0, 100.0, 100.0, 100.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));

        let d = RectF::new(99.0, 99.0, 100.0, 100.0);
        assert!(a.overlaps(&d));
    }

    #[test]
    fn downward_overlap_snaps_bottom_to_obstacle_top() {
        let obstacles = [obstacle(400.0, 500.0, 250.0, 50.0)];
        let mut body = RectF::new(450.0, 410.0, 100.0, 100.0);
        let mut vy = 6.0;
        let mut motion = MotionState::Airborne;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);

        assert_eq!(body.bottom(), 500.0);
        assert_eq!(vy, 0.0);
        assert_ne!(motion, MotionState::Airborne);
    }

    #[test]
    fn landing_arms_the_jump_buffer() {
        // The quirk, pinned: a landing clears Airborne and the same contact
        // then arms the buffer, so the body ends JumpBuffered rather than
        // plain Grounded.
        let obstacles = [obstacle(400.0, 500.0, 250.0, 50.0)];
        let mut body = RectF::new(450.0, 410.0, 100.0, 100.0);
        let mut vy = 6.0;
        let mut motion = MotionState::Airborne;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);

        assert_eq!(motion, MotionState::JumpBuffered);
    }

    #[test]
    fn upward_overlap_snaps_top_to_obstacle_bottom_and_keeps_airborne() {
        let obstacles = [obstacle(400.0, 200.0, 250.0, 50.0)];
        let mut body = RectF::new(450.0, 245.0, 100.0, 100.0);
        let mut vy = -10.0;
        let mut motion = MotionState::Airborne;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);

        assert_eq!(body.top(), 250.0);
        assert_eq!(vy, 0.0);
        // A ceiling hit mid-jump does not arm the buffer.
        assert_eq!(motion, MotionState::Airborne);
    }

    #[test]
    fn grounded_contact_with_zero_velocity_arms_buffer_without_moving() {
        // Walking into a platform while on the floor: vy is 0, so neither
        // snap branch runs, but the contact still arms the buffer.
        let obstacles = [obstacle(400.0, 520.0, 250.0, 50.0)];
        let mut body = RectF::new(350.0, 500.0, 100.0, 100.0);
        let before = body;
        let mut vy = 0.0;
        let mut motion = MotionState::Grounded;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);

        assert_eq!(body, before);
        assert_eq!(motion, MotionState::JumpBuffered);
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let obstacles = [obstacle(400.0, 500.0, 250.0, 50.0)];
        let mut body = RectF::new(450.0, 410.0, 100.0, 100.0);
        let mut vy = 6.0;
        let mut motion = MotionState::Airborne;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);
        let after_first = (body, vy, motion);

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);
        assert_eq!((body, vy, motion), after_first);
    }

    #[test]
    fn empty_obstacle_set_is_a_no_op() {
        let mut body = RectF::new(100.0, 100.0, 100.0, 100.0);
        let before = body;
        let mut vy = 3.0;
        let mut motion = MotionState::Grounded;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &[]);

        assert_eq!(body, before);
        assert_eq!(vy, 3.0);
    }

    #[test]
    fn simultaneous_overlaps_resolve_in_insertion_order() {
        // Two overlapping platforms at different heights; the body overlaps
        // both. Whichever comes first in the collection wins the first snap,
        // and resolving against the higher one first separates the body from
        // the lower one entirely.
        let high = obstacle(400.0, 480.0, 250.0, 50.0);
        let low = obstacle(400.0, 510.0, 250.0, 50.0);

        let mut body_a = RectF::new(450.0, 430.0, 100.0, 100.0);
        let mut vy_a = 6.0;
        let mut motion_a = MotionState::Airborne;
        resolve_overlaps(&mut body_a, &mut vy_a, &mut motion_a, &[high, low]);
        assert_eq!(body_a.bottom(), 480.0);

        let mut body_b = RectF::new(450.0, 430.0, 100.0, 100.0);
        let mut vy_b = 6.0;
        let mut motion_b = MotionState::Airborne;
        resolve_overlaps(&mut body_b, &mut vy_b, &mut motion_b, &[low, high]);
        // Low platform snapped first (bottom = 510); the body then still
        // overlaps the high platform with vy already zeroed, so only the
        // buffer rule applies on the second contact.
        assert_eq!(body_b.bottom(), 510.0);

        assert_ne!(body_a, body_b, "resolution order is observable");
    }

    #[test]
    fn side_contact_does_not_push_back_horizontally() {
        // Body moved horizontally into a platform at equal height while
        // falling: the snap treats it as a landing, never a horizontal
        // push-back. There is no side resolution at all.
        let obstacles = [obstacle(500.0, 450.0, 250.0, 50.0)];
        let mut body = RectF::new(420.0, 420.0, 100.0, 100.0);
        let mut vy = 0.5;
        let mut motion = MotionState::Grounded;

        resolve_overlaps(&mut body, &mut vy, &mut motion, &obstacles);

        assert_eq!(body.x, 420.0, "x is never corrected");
        assert_eq!(body.bottom(), 450.0, "vertical snap applies instead");
    }
}
