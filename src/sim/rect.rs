//! Axis-aligned rectangles and composite collider sets
//!
//! Collision geometry is data: each entity variant has a constant table of
//! boxes (size plus a fixed offset from the entity origin), and the live
//! collider set is recomputed from the owner's position whenever it moves.

use glam::IVec2;

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// One collider box of an entity: size plus fixed offset from the origin
#[derive(Debug, Clone, Copy)]
pub struct BoxSpec {
    pub size: IVec2,
    pub offset: IVec2,
}

impl BoxSpec {
    pub const fn new(w: i32, h: i32, dx: i32, dy: i32) -> Self {
        Self {
            size: IVec2::new(w, h),
            offset: IVec2::new(dx, dy),
        }
    }
}

/// Moth hit-shape: body box plus a wider wing/leg skirt below it
pub const MOTH_BOXES: [BoxSpec; 2] = [BoxSpec::new(66, 33, 28, 5), BoxSpec::new(91, 17, 2, 33)];

/// Shelf hit-shape: one box covering the whole obstacle
pub const SHELF_BOXES: [BoxSpec; 1] = [BoxSpec::new(141, 480, 0, 0)];

/// Lamp hit-shape: cord, shade, and bulb stacked top to bottom
pub const LAMP_BOXES: [BoxSpec; 3] = [
    BoxSpec::new(11, 420, 46, 0),
    BoxSpec::new(103, 45, 0, 420),
    BoxSpec::new(20, 17, 40, 465),
];

/// Live collider set of an entity, positioned in world space
#[derive(Debug, Clone)]
pub struct ColliderSet {
    boxes: Vec<Rect>,
    specs: &'static [BoxSpec],
}

impl ColliderSet {
    /// Build a set from a spec table, positioned at `pos`
    pub fn new(specs: &'static [BoxSpec], pos: IVec2) -> Self {
        let mut set = Self {
            boxes: specs
                .iter()
                .map(|s| Rect::new(0, 0, s.size.x, s.size.y))
                .collect(),
            specs,
        };
        set.reposition(pos);
        set
    }

    /// Recompute every box from the owner's position plus its fixed offset
    pub fn reposition(&mut self, pos: IVec2) {
        for (rect, spec) in self.boxes.iter_mut().zip(self.specs) {
            rect.x = pos.x + spec.offset.x;
            rect.y = pos.y + spec.offset.y;
        }
    }

    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }
}
