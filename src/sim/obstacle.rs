//! Obstacle physics: shelves rising from the floor, lamps hanging overhead
//!
//! Both obstacle kinds share the integration pattern of the moth: a float
//! accumulator grows a fixed step per simulated millisecond, the integer
//! velocity is its floor clamped to the scroll ceiling, and the position
//! moves once per frame. Recycling is where they differ: a shelf re-enters
//! on the right edge as soon as it clears the left, while a lamp waits for
//! its paired shelf to cross the screen midpoint and re-enters relative to
//! that shelf.

use glam::IVec2;
use rand::Rng;

use super::collision::overlaps;
use super::rect::{ColliderSet, LAMP_BOXES, SHELF_BOXES};
use crate::consts::*;

/// Vertical barrier scrolling in from the right
#[derive(Debug, Clone)]
pub struct Shelf {
    pos: IVec2,
    /// Integer velocity applied to the position each frame
    vel_x: i32,
    /// Float accumulator the integer velocity is derived from
    scroll_vel: f32,
    colliders: ColliderSet,
}

impl Shelf {
    fn new(rng: &mut impl Rng) -> Self {
        let pos = IVec2::new(
            SCREEN_W - rng.random_range(0..SPAWN_JITTER),
            rng.random_range(SHELF_SPAWN_MIN_Y..=SHELF_SPAWN_MAX_Y),
        );
        Self {
            pos,
            vel_x: 0,
            scroll_vel: 0.0,
            colliders: ColliderSet::new(&SHELF_BOXES, pos),
        }
    }

    /// One simulated millisecond of scroll acceleration
    fn accelerate(&mut self) {
        self.scroll_vel += RISE_STEP;
        self.vel_x = self.scroll_vel.floor() as i32;
    }

    /// Per-frame movement, recycle, and hit test against the moth.
    /// Returns true on a hit; the position delta is reverted first.
    fn advance(&mut self, moth: &ColliderSet, rng: &mut impl Rng) -> bool {
        if self.vel_x >= MAX_SCROLL_SPEED as i32 {
            self.vel_x = MAX_SCROLL_SPEED as i32;
        }
        self.pos.x -= self.vel_x;
        self.colliders.reposition(self.pos);

        if self.pos.x + SHELF_W < 0 {
            self.pos.x = SCREEN_W;
            self.pos.y = recycled_shelf_top(rng);
            self.colliders.reposition(self.pos);
        }

        if overlaps(moth, &self.colliders) {
            self.pos.x += self.vel_x;
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

/// Hanging barrier scrolling in from the right, recycle-coupled to a shelf
#[derive(Debug, Clone)]
pub struct Lamp {
    pos: IVec2,
    vel_x: i32,
    scroll_vel: f32,
    colliders: ColliderSet,
}

impl Lamp {
    fn new(rng: &mut impl Rng) -> Self {
        let pos = IVec2::new(
            SCREEN_W - rng.random_range(0..SPAWN_JITTER),
            -rng.random_range(LAMP_SPAWN_MIN_RISE..=LAMP_SPAWN_MAX_RISE),
        );
        Self {
            pos,
            vel_x: 0,
            scroll_vel: 0.0,
            colliders: ColliderSet::new(&LAMP_BOXES, pos),
        }
    }

    /// One simulated millisecond of scroll acceleration
    fn accelerate(&mut self) {
        self.scroll_vel += RISE_STEP;
        self.vel_x = self.scroll_vel.floor() as i32;
    }

    /// Per-frame movement, recycle, and hit test against the moth.
    ///
    /// A lamp past the left edge keeps drifting until its paired shelf has
    /// crossed the screen midpoint; only then does it re-enter, hung just
    /// right of that shelf.
    fn advance(&mut self, shelf_pos: IVec2, moth: &ColliderSet, rng: &mut impl Rng) -> bool {
        if self.vel_x >= MAX_SCROLL_SPEED as i32 {
            self.vel_x = MAX_SCROLL_SPEED as i32;
        }
        self.pos.x -= self.vel_x;
        self.colliders.reposition(self.pos);

        if self.pos.x + LAMP_W < 0 && shelf_pos.x > SCREEN_W / 2 {
            self.pos.x = shelf_pos.x + LAMP_RECYCLE_OFFSET;
            self.pos.y = recycled_lamp_top(shelf_pos.y, rng);
            self.colliders.reposition(self.pos);
        }

        if overlaps(moth, &self.colliders) {
            self.pos.x += self.vel_x;
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

/// Draw a recycled shelf's top edge: uniform over the full screen height,
/// with draws landing in the top third pushed down by a fixed bias
fn recycled_shelf_top(rng: &mut impl Rng) -> i32 {
    let mut top = rng.random_range(0..=SCREEN_H);
    if top < SCREEN_H / 3 {
        top += SHELF_TOP_BIAS;
    }
    top
}

/// Draw a recycled lamp's top edge relative to its paired shelf.
///
/// The raw draw hangs the lamp so its bottom lands anywhere above the
/// bottom margin. Two fixups then apply in order: a lamp too close to the
/// shelf top is re-hung at a fixed offset above it, and a lamp hanging
/// into the bottom margin is lifted by a fixed bias.
fn recycled_lamp_top(shelf_top: i32, rng: &mut impl Rng) -> i32 {
    let mut top = -rng.random_range(0..LAMP_H - LAMP_BOTTOM_MARGIN);
    if top + LAMP_H >= shelf_top - LAMP_SHELF_CLEARANCE {
        top = shelf_top - LAMP_H - LAMP_BOTTOM_MARGIN;
    }
    if top + LAMP_H >= SCREEN_H - LAMP_BOTTOM_MARGIN {
        top -= LAMP_BOTTOM_BIAS;
    }
    top
}

/// A shelf and the lamp whose recycle timing is coupled to it
#[derive(Debug, Clone)]
pub struct ObstaclePair {
    shelf: Shelf,
    lamp: Lamp,
}

impl ObstaclePair {
    /// One simulated millisecond of scroll acceleration for both members
    pub fn accelerate(&mut self) {
        self.shelf.accelerate();
        self.lamp.accelerate();
    }

    /// Per-frame movement: the shelf first, then the lamp against the
    /// shelf's updated position. Both members always move, even when the
    /// first one hits. Returns true when either member hit the moth.
    pub fn advance(&mut self, moth: &ColliderSet, rng: &mut impl Rng) -> bool {
        let shelf_hit = self.shelf.advance(moth, rng);
        let lamp_hit = self.lamp.advance(self.shelf.pos, moth, rng);
        shelf_hit || lamp_hit
    }

    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    pub fn lamp(&self) -> &Lamp {
        &self.lamp
    }
}

/// Initial placement: pairs staggered rightward from the right screen edge.
/// The first pair spawns with a small jitter off the edge; each later pair
/// sits one obstacle width plus a fixed gap right of the previous one.
pub fn spawn_pairs(rng: &mut impl Rng) -> Vec<ObstaclePair> {
    let mut pairs: Vec<ObstaclePair> = Vec::with_capacity(PAIR_COUNT);
    for _ in 0..PAIR_COUNT {
        let mut shelf = Shelf::new(rng);
        let mut lamp = Lamp::new(rng);
        if let Some(prev) = pairs.last() {
            shelf.pos.x = prev.shelf.pos.x + SHELF_W + SHELF_GAP;
            shelf.colliders.reposition(shelf.pos);
            lamp.pos.x = prev.lamp.pos.x + LAMP_W + LAMP_GAP;
            lamp.colliders.reposition(lamp.pos);
        }
        pairs.push(ObstaclePair { shelf, lamp });
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::MOTH_BOXES;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    /// A moth collider set far outside every obstacle path
    fn distant_moth() -> ColliderSet {
        ColliderSet::new(&MOTH_BOXES, IVec2::new(-2000, -2000))
    }

    /// Pump the accumulator until the integer velocity is nonzero
    fn ramp(shelf: &mut Shelf) {
        for _ in 0..200 {
            shelf.accelerate();
        }
    }

    #[test]
    fn test_scroll_speed_clamps_at_the_ceiling() {
        let mut r = rng();
        let mut shelf = Shelf::new(&mut r);
        for _ in 0..100_000 {
            shelf.accelerate();
        }
        let before = shelf.pos.x;
        shelf.advance(&distant_moth(), &mut r);
        assert_eq!(before - shelf.pos.x, MAX_SCROLL_SPEED as i32);
    }

    #[test]
    fn test_shelf_recycles_to_the_right_edge() {
        let mut r = rng();
        let mut shelf = Shelf::new(&mut r);
        ramp(&mut shelf);
        // One step short of gone: right edge exactly at zero
        shelf.pos.x = -SHELF_W;
        shelf.colliders.reposition(shelf.pos);
        assert!(!shelf.advance(&distant_moth(), &mut r));
        assert_eq!(shelf.pos.x, SCREEN_W);
        assert_eq!(shelf.colliders.boxes()[0].left(), SCREEN_W);
    }

    #[test]
    fn test_shelf_recycle_top_stays_in_bounds() {
        let mut r = rng();
        let mut shelf = Shelf::new(&mut r);
        ramp(&mut shelf);
        for _ in 0..200 {
            shelf.pos.x = -SHELF_W;
            shelf.advance(&distant_moth(), &mut r);
            assert!(
                shelf.pos.y >= SHELF_TOP_BIAS && shelf.pos.y <= SCREEN_H,
                "recycled top {} out of bounds",
                shelf.pos.y
            );
        }
    }

    #[test]
    fn test_lamp_waits_for_its_shelf() {
        let mut r = rng();
        let mut lamp = Lamp::new(&mut r);
        for _ in 0..200 {
            lamp.accelerate();
        }
        lamp.pos.x = -LAMP_W;
        lamp.colliders.reposition(lamp.pos);

        // Shelf exactly at the midpoint: no recycle, the lamp keeps drifting
        lamp.advance(IVec2::new(SCREEN_W / 2, 300), &distant_moth(), &mut r);
        assert_eq!(lamp.pos.x, -LAMP_W - 1);

        // One pixel past the midpoint: recycle lands right of the shelf
        lamp.advance(IVec2::new(SCREEN_W / 2 + 1, 300), &distant_moth(), &mut r);
        assert_eq!(lamp.pos.x, SCREEN_W / 2 + 1 + LAMP_RECYCLE_OFFSET);
    }

    #[test]
    fn test_lamp_rehangs_above_a_high_shelf() {
        // A shelf top of 100 makes the clearance test fire on every draw,
        // so the re-hang offset is the only possible outcome
        let mut r = rng();
        for _ in 0..100 {
            let top = recycled_lamp_top(100, &mut r);
            assert_eq!(top, 100 - LAMP_H - LAMP_BOTTOM_MARGIN);
        }
    }

    #[test]
    fn test_lamp_avoids_the_bottom_margin() {
        // With the shelf at the very bottom, a draw either clears the shelf
        // outright or gets re-hung and then lifted off the bottom margin
        let mut r = rng();
        for _ in 0..200 {
            let top = recycled_lamp_top(SCREEN_H, &mut r);
            let cleared = top + LAMP_H < SCREEN_H - LAMP_SHELF_CLEARANCE;
            let rehung = top == SCREEN_H - LAMP_H - LAMP_BOTTOM_MARGIN - LAMP_BOTTOM_BIAS;
            assert!(cleared || rehung, "top {top} satisfies neither rule");
        }
    }

    #[test]
    fn test_hit_reverts_the_frame_delta() {
        let mut r = rng();
        let mut shelf = Shelf::new(&mut r);
        ramp(&mut shelf);
        shelf.pos = IVec2::new(300, 200);
        shelf.colliders.reposition(shelf.pos);

        // Moth body overlaps the shelf column
        let moth = ColliderSet::new(&MOTH_BOXES, IVec2::new(280, 250));
        assert!(shelf.advance(&moth, &mut r));
        assert_eq!(shelf.pos, IVec2::new(300, 200));
        assert_eq!(shelf.colliders.boxes()[0].left(), 300);
    }

    #[test]
    fn test_spawn_staggers_pairs() {
        let mut r = rng();
        let pairs = spawn_pairs(&mut r);
        assert_eq!(pairs.len(), PAIR_COUNT);

        for pair in &pairs {
            let shelf = pair.shelf().pos();
            let lamp = pair.lamp().pos();
            assert!(shelf.y >= SHELF_SPAWN_MIN_Y && shelf.y <= SHELF_SPAWN_MAX_Y);
            assert!(lamp.y >= -LAMP_SPAWN_MAX_RISE && lamp.y <= -LAMP_SPAWN_MIN_RISE);
        }

        let first = &pairs[0];
        assert!(first.shelf().pos().x > SCREEN_W - SPAWN_JITTER);
        assert!(first.shelf().pos().x <= SCREEN_W);

        for pair in pairs.windows(2) {
            let shelf_gap = pair[1].shelf().pos().x - pair[0].shelf().pos().x;
            let lamp_gap = pair[1].lamp().pos().x - pair[0].lamp().pos().x;
            assert_eq!(shelf_gap, SHELF_W + SHELF_GAP);
            assert_eq!(lamp_gap, LAMP_W + LAMP_GAP);
        }
    }
}
