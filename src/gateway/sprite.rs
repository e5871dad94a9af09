//! Text sprite format
//!
//! A sprite file is a directive header, a `---` separator, and an art grid:
//!
//! ```text
//! ; a 2x2 checker
//! size 2 2
//! palette x 102030
//! ---
//! x.
//! .x
//! ```
//!
//! `size` gives the world dimensions the art is scaled to at load time
//! (nearest neighbor, so the grid can be authored at any resolution).
//! `palette` maps one grid character to an RRGGBB color. `.` and space are
//! transparent; lines starting with `;` before the separator are comments.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::IVec2;

use super::Rgb;
use crate::error::GameError;

/// A decoded sprite, already scaled to its world dimensions
#[derive(Debug)]
pub struct Sprite {
    pub size: IVec2,
    /// Row-major world-size grid; None is transparent
    pub pixels: Vec<Option<Rgb>>,
}

impl Sprite {
    /// Load and decode a sprite file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path).map_err(|err| GameError::asset(path, err.to_string()))?;
        Self::parse(&text).map_err(|reason| GameError::asset(path, reason))
    }

    /// Decode sprite text; errors carry the reason, the caller adds the path
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut size: Option<IVec2> = None;
        let mut palette: HashMap<char, Rgb> = HashMap::new();

        let mut lines = text.lines();
        for line in lines.by_ref() {
            if line.trim_end() == "---" {
                break;
            }
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let mut words = line.split_whitespace();
            match words.next() {
                Some("size") => {
                    let w: Option<i32> = words.next().and_then(|v| v.parse().ok());
                    let h: Option<i32> = words.next().and_then(|v| v.parse().ok());
                    match (w, h) {
                        // The pixel count must stay indexable as i32
                        (Some(w), Some(h)) if w > 0 && h > 0 && w.checked_mul(h).is_some() => {
                            size = Some(IVec2::new(w, h));
                        }
                        _ => return Err("malformed size directive".into()),
                    }
                }
                Some("palette") => {
                    let mut key_chars = words.next().unwrap_or("").chars();
                    let (Some(key), None) = (key_chars.next(), key_chars.next()) else {
                        return Err("palette key must be a single character".into());
                    };
                    if key == '.' {
                        return Err("palette key `.` is reserved for transparency".into());
                    }
                    let color = words
                        .next()
                        .and_then(parse_color)
                        .ok_or("palette color must be six hex digits")?;
                    palette.insert(key, color);
                }
                Some(other) => return Err(format!("unknown directive `{other}`")),
                None => {}
            }
        }
        let Some(size) = size else {
            return Err("missing size directive".into());
        };

        // Art grid: rows keep leading spaces (transparent), trailing blank
        // rows are ignored
        let mut grid: Vec<&str> = lines.map(|l| l.trim_end()).collect();
        while grid.last().is_some_and(|l| l.is_empty()) {
            grid.pop();
        }
        let grid_h = grid.len() as i32;
        let grid_w = grid.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        if grid_w == 0 || grid_h == 0 {
            return Err("missing art grid".into());
        }

        let cell_count = grid_w.checked_mul(grid_h).ok_or("art grid too large")?;
        let mut cells: Vec<Option<Rgb>> = vec![None; cell_count as usize];
        for (y, row) in grid.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '.' || ch == ' ' {
                    continue;
                }
                let Some(&color) = palette.get(&ch) else {
                    return Err(format!("unknown palette char `{ch}` in art row {}", y + 1));
                };
                cells[y * grid_w as usize + x] = Some(color);
            }
        }

        // Nearest-neighbor scale up to the world size
        let mut pixels = vec![None; (size.x * size.y) as usize];
        for wy in 0..size.y {
            let gy = (i64::from(wy) * i64::from(grid_h) / i64::from(size.y)) as i32;
            for wx in 0..size.x {
                let gx = (i64::from(wx) * i64::from(grid_w) / i64::from(size.x)) as i32;
                pixels[(wy * size.x + wx) as usize] = cells[(gy * grid_w + gx) as usize];
            }
        }
        Ok(Self { size, pixels })
    }
}

fn parse_color(hex: &str) -> Option<Rgb> {
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
}
