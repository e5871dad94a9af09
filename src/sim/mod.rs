//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Millisecond sub-stepping driven by caller timestamps
//! - No rendering or platform dependencies

pub mod collision;
pub mod moth;
pub mod obstacle;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{overlaps, rects_overlap};
pub use moth::Moth;
pub use obstacle::{Lamp, ObstaclePair, Shelf};
pub use rect::{BoxSpec, ColliderSet, Rect};
pub use state::Session;
pub use tick::{ControlEvent, advance, handle_control};
