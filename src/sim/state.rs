//! Session state: everything one run of the game owns
//!
//! A session is pure and deterministic: all randomness flows from the seed,
//! all timing from the caller's timestamps. The clock bookkeeping fields are
//! crate-private so only the tick module can touch them.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::moth::Moth;
use super::obstacle::{ObstaclePair, spawn_pairs};

/// One run of the game, from "New Game" to the end flag
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed all obstacle randomization flows from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub moth: Moth,
    pub pairs: Vec<ObstaclePair>,
    /// Monotonic score, credited in whole intervals past the grace period
    pub score: u32,
    /// Background scroll offset in pixels, wraps at one screen width
    pub scroll: i32,
    /// Set when the moth leaves the screen or hits an obstacle; the session
    /// never advances past the frame that set it
    pub over: bool,
    /// Timestamp the session started at (caller clock, ms)
    pub(crate) started_at: u64,
    /// Timestamp of the last advance
    pub(crate) last_advance: u64,
    /// Score intervals already credited
    pub(crate) credited: u64,
}

impl Session {
    /// Start a session at the given timestamp
    pub fn new(seed: u64, now_ms: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let pairs = spawn_pairs(&mut rng);
        Self {
            seed,
            rng,
            moth: Moth::new(),
            pairs,
            score: 0,
            scroll: 0,
            over: false,
            started_at: now_ms,
            last_advance: now_ms,
            credited: 0,
        }
    }

    /// Milliseconds of session time elapsed at `now_ms`
    pub fn run_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at)
    }
}
