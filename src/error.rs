//! Error types for startup, asset staging, and the terminal backend

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for fallible game operations
#[derive(Debug, Error)]
pub enum GameError {
    /// The terminal could not be put into the mode the game needs.
    /// Fatal: raised before any game state is entered.
    #[error("terminal init failed: {0}")]
    Init(#[source] io::Error),

    /// A sprite file was missing or failed to parse
    #[error("failed to load asset {}: {reason}", .path.display())]
    Asset { path: PathBuf, reason: String },

    /// I/O failure while presenting a frame or polling events
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

impl GameError {
    /// Shorthand for an asset failure at a given path
    pub fn asset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Asset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
