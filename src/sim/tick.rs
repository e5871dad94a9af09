//! Session advance: control edges, sub-stepped integration, scoring
//!
//! The caller owns the clock. Each frame it hands the current timestamp to
//! [`advance`]; the gap since the last call is replayed as one-millisecond
//! acceleration sub-steps (capped, so a stalled process does not slingshot
//! the physics), then movement and collisions run once for the frame.

use super::state::Session;
use crate::consts::*;

/// A control edge forwarded from the input layer. Key auto-repeat must be
/// filtered out before this point; the sim only sees real edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    FlapPressed,
    FlapReleased,
}

/// Apply one control edge to the session
pub fn handle_control(session: &mut Session, event: ControlEvent) {
    if session.over {
        return;
    }
    match event {
        ControlEvent::FlapPressed => session.moth.flap_pressed(),
        ControlEvent::FlapReleased => session.moth.flap_released(),
    }
}

/// Advance the session to `now_ms`: catch the accumulators up, move every
/// entity once, fold in collisions, and recompute the score
pub fn advance(session: &mut Session, now_ms: u64) {
    if session.over {
        return;
    }

    // One acceleration sub-step per elapsed millisecond, capped
    let elapsed = now_ms
        .saturating_sub(session.last_advance)
        .min(MAX_CATCHUP_MS);
    for _ in 0..elapsed {
        session.moth.gravitate();
        for pair in &mut session.pairs {
            pair.accelerate();
        }
    }
    session.last_advance = now_ms;

    // Per-frame movement; terminal conditions revert and raise the flag
    let Session {
        moth,
        pairs,
        rng,
        over,
        ..
    } = session;
    if moth.advance() {
        *over = true;
    }
    for pair in pairs.iter_mut() {
        if pair.advance(moth.colliders(), rng) {
            *over = true;
        }
    }

    // Background scroll wraps at one screen width
    session.scroll -= 1;
    if session.scroll <= -SCREEN_W {
        session.scroll = 0;
    }

    // Credit whole score intervals past the grace period. The final frame
    // still counts: a session that ends at the instant an interval closes
    // keeps that interval.
    let run_ms = session.run_ms(now_ms);
    if run_ms >= SCORE_GRACE_MS {
        let intervals = (run_ms - SCORE_GRACE_MS) / SCORE_INTERVAL_MS;
        if intervals > session.credited {
            session.score += (intervals - session.credited) as u32 * SCORE_STEP;
            session.credited = intervals;
        }
    }

    if session.over {
        log::info!("session over at {run_ms} ms, score {}", session.score);
    }
}
