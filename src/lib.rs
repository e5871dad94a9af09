//! Pantry Moth - a terminal arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, session state)
//! - `gateway`: Presentation abstraction and the terminal backend
//! - `app`: Top-level screen state machine and frame pacing
//! - `assets`: Sprite staging at startup
//! - `highscore`: Single-value high score persistence
//! - `settings`: JSON-backed runtime configuration

pub mod app;
pub mod assets;
pub mod error;
pub mod gateway;
pub mod highscore;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// World dimensions in pixels
    pub const SCREEN_W: i32 = 640;
    pub const SCREEN_H: i32 = 480;

    /// Moth sprite dimensions
    pub const MOTH_W: i32 = 92;
    pub const MOTH_H: i32 = 59;

    /// Gravity constant, doubles as the terminal fall speed (px/frame)
    pub const GRAVITY: f32 = 10.0;
    /// Rise-velocity accumulator increment per simulated millisecond
    pub const RISE_STEP: f32 = 0.008;
    /// Velocity set on a flap (upward impulse)
    pub const FLAP_IMPULSE: f32 = -(GRAVITY / 2.2);
    /// Accumulator level that re-arms the flap; also the release refund
    pub const FLAP_REARM: f32 = GRAVITY / 8.0;

    /// Shelf obstacle dimensions (rises from the floor)
    pub const SHELF_W: i32 = 141;
    pub const SHELF_H: i32 = 480;
    /// Lamp obstacle dimensions (hangs from the ceiling)
    pub const LAMP_W: i32 = 103;
    pub const LAMP_H: i32 = 480;

    /// Obstacle scroll speed ceiling (px/frame once the accumulator fills)
    pub const MAX_SCROLL_SPEED: f32 = 1.0;
    /// Obstacle pairs alive per session
    pub const PAIR_COUNT: usize = 2;
    /// Horizontal spacing between consecutive shelves at spawn
    pub const SHELF_GAP: i32 = 200;
    /// Horizontal spacing between consecutive lamps at spawn
    pub const LAMP_GAP: i32 = 250;
    /// Entities spawn at SCREEN_W minus a jitter below this bound
    pub const SPAWN_JITTER: i32 = 20;

    /// Shelf top edge at spawn: uniform in [SHELF_SPAWN_MIN_Y, SHELF_SPAWN_MAX_Y]
    pub const SHELF_SPAWN_MIN_Y: i32 = 290;
    pub const SHELF_SPAWN_MAX_Y: i32 = 380;
    /// Shelf recycle draws landing in the top third get pushed down by this
    pub const SHELF_TOP_BIAS: i32 = 100;

    /// Lamp hang depth at spawn: top edge at -h, h uniform in this range
    pub const LAMP_SPAWN_MIN_RISE: i32 = 340;
    pub const LAMP_SPAWN_MAX_RISE: i32 = 380;
    /// Recycled lamp lands this far right of its paired shelf
    pub const LAMP_RECYCLE_OFFSET: i32 = 20;
    /// Minimum vertical clearance between lamp bottom and shelf top
    pub const LAMP_SHELF_CLEARANCE: i32 = 200;
    /// Lamp bottom must stay this far above the screen bottom
    pub const LAMP_BOTTOM_MARGIN: i32 = 100;
    /// Lift applied when a lamp would hang into the bottom margin
    pub const LAMP_BOTTOM_BIAS: i32 = 150;

    /// Scoring: no points until this much session time has passed
    pub const SCORE_GRACE_MS: u64 = 3000;
    /// One credit per interval past the grace period
    pub const SCORE_INTERVAL_MS: u64 = 100;
    /// Points per credited interval
    pub const SCORE_STEP: u32 = 5;

    /// Frame cap for every screen
    pub const TARGET_FPS: u32 = 30;
    /// Sub-step catch-up ceiling per frame (ms of simulated time)
    pub const MAX_CATCHUP_MS: u64 = 250;
    /// How long the final frame stays up after a session ends
    pub const DEATH_HOLD_MS: u64 = 2000;
}
