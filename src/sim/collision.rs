//! AABB collision detection between composite collider sets
//!
//! Brute-force pairwise testing is intentional: a set holds at most three
//! boxes, so anything cleverer than the separating-axis short-circuit would
//! be overhead. Edge touching counts as NON-overlap (strict inequality);
//! that boundary convention is gameplay-defining and must not drift.

use super::rect::{ColliderSet, Rect};

/// AABB overlap test with strict-inequality boundaries.
///
/// Rectangles that share only an edge do not overlap.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.bottom() <= b.top()
        || a.top() >= b.bottom()
        || a.right() <= b.left()
        || a.left() >= b.right())
}

/// Test two collider sets, returning true on the first overlapping pair
pub fn overlaps(set_a: &ColliderSet, set_b: &ColliderSet) -> bool {
    for b in set_b.boxes() {
        for a in set_a.boxes() {
            if rects_overlap(a, b) {
                return true;
            }
        }
    }
    false
}
