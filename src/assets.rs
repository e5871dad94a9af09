//! Sprite staging
//!
//! All art the game draws is staged up front, before the first frame.
//! Staging keeps going past a bad file so one startup failure log names
//! every missing asset, then reports the first error.

use std::path::Path;

use crate::error::GameError;
use crate::gateway::{Gateway, TextureId};

const SPRITE_FILES: [&str; 5] = [
    "moth.sprite",
    "shelf.sprite",
    "lamp.sprite",
    "background.sprite",
    "logo.sprite",
];

/// Texture handles for every sprite the game draws
#[derive(Debug, Clone, Copy)]
pub struct Assets {
    pub moth: TextureId,
    pub shelf: TextureId,
    pub lamp: TextureId,
    pub background: TextureId,
    pub logo: TextureId,
}

impl Assets {
    /// Stage all sprites from `dir`
    pub fn load(gw: &mut impl Gateway, dir: &Path) -> Result<Self, GameError> {
        let mut ids = [None; 5];
        let mut first_failure = None;

        for (slot, name) in ids.iter_mut().zip(SPRITE_FILES) {
            match gw.load_image(&dir.join(name)) {
                Ok(id) => *slot = Some(id),
                Err(err) => {
                    log::error!("{err}");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        if let [Some(moth), Some(shelf), Some(lamp), Some(background), Some(logo)] = ids {
            log::info!(
                "staged {} sprites from {}",
                SPRITE_FILES.len(),
                dir.display()
            );
            return Ok(Self {
                moth,
                shelf,
                lamp,
                background,
                logo,
            });
        }
        Err(first_failure.unwrap_or_else(|| GameError::asset(dir, "sprite staging failed")))
    }
}
