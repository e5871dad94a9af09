//! Embedded 4x6 bitmap font
//!
//! Each glyph is six rows with the four high bits of every byte carrying
//! the columns; content is three columns wide with the sixth row left
//! blank, so letters stay readable at one terminal pixel per bit. Lowercase
//! maps onto the uppercase shapes and unknown characters render blank.

use glam::IVec2;

use super::Rgb;

/// Columns per glyph cell
pub const GLYPH_COLS: i32 = 4;
/// Rows per glyph cell
pub const GLYPH_ROWS: i32 = 6;
/// Horizontal pen advance per character, in cells
pub const GLYPH_ADVANCE: i32 = 5;
/// World pixels per font pixel used for on-screen text
pub const GLYPH_SCALE: i32 = 4;

#[rustfmt::skip]
fn glyph(ch: char) -> [u8; 6] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01000000, 0b10100000, 0b10100000, 0b11100000, 0b10100000, 0],
        'B' => [0b11000000, 0b10100000, 0b11000000, 0b10100000, 0b11000000, 0],
        'C' => [0b01000000, 0b10100000, 0b10000000, 0b10100000, 0b01000000, 0],
        'D' => [0b11000000, 0b10100000, 0b10100000, 0b10100000, 0b11000000, 0],
        'E' => [0b11100000, 0b10000000, 0b11000000, 0b10000000, 0b11100000, 0],
        'F' => [0b11100000, 0b10000000, 0b11100000, 0b10000000, 0b10000000, 0],
        'G' => [0b01100000, 0b10000000, 0b10100000, 0b10100000, 0b01100000, 0],
        'H' => [0b10100000, 0b10100000, 0b11100000, 0b10100000, 0b10100000, 0],
        'I' => [0b11100000, 0b01000000, 0b01000000, 0b01000000, 0b11100000, 0],
        'J' => [0b01100000, 0b00100000, 0b00100000, 0b10100000, 0b01000000, 0],
        'K' => [0b10100000, 0b11000000, 0b10000000, 0b11000000, 0b10100000, 0],
        'L' => [0b10000000, 0b10000000, 0b10000000, 0b10000000, 0b11100000, 0],
        'M' => [0b10100000, 0b11100000, 0b11100000, 0b10100000, 0b10100000, 0],
        'N' => [0b11000000, 0b10100000, 0b10100000, 0b10100000, 0b10100000, 0],
        'O' => [0b01000000, 0b10100000, 0b10100000, 0b10100000, 0b01000000, 0],
        'P' => [0b11000000, 0b10100000, 0b11000000, 0b10000000, 0b10000000, 0],
        'Q' => [0b01000000, 0b10100000, 0b10100000, 0b11000000, 0b01100000, 0],
        'R' => [0b11000000, 0b10100000, 0b11000000, 0b10100000, 0b10100000, 0],
        'S' => [0b01100000, 0b10000000, 0b01000000, 0b00100000, 0b11000000, 0],
        'T' => [0b11100000, 0b01000000, 0b01000000, 0b01000000, 0b01000000, 0],
        'U' => [0b10100000, 0b10100000, 0b10100000, 0b10100000, 0b01100000, 0],
        'V' => [0b10100000, 0b10100000, 0b10100000, 0b10100000, 0b01000000, 0],
        'W' => [0b10100000, 0b10100000, 0b11100000, 0b11100000, 0b10100000, 0],
        'X' => [0b10100000, 0b10100000, 0b01000000, 0b10100000, 0b10100000, 0],
        'Y' => [0b10100000, 0b10100000, 0b01000000, 0b01000000, 0b01000000, 0],
        'Z' => [0b11100000, 0b00100000, 0b01000000, 0b10000000, 0b11100000, 0],
        '0' => [0b11100000, 0b10100000, 0b10100000, 0b10100000, 0b11100000, 0],
        '1' => [0b01000000, 0b11000000, 0b01000000, 0b01000000, 0b11100000, 0],
        '2' => [0b11100000, 0b00100000, 0b11100000, 0b10000000, 0b11100000, 0],
        '3' => [0b11100000, 0b00100000, 0b01100000, 0b00100000, 0b11100000, 0],
        '4' => [0b10100000, 0b10100000, 0b11100000, 0b00100000, 0b00100000, 0],
        '5' => [0b11100000, 0b10000000, 0b11100000, 0b00100000, 0b11100000, 0],
        '6' => [0b11100000, 0b10000000, 0b11100000, 0b10100000, 0b11100000, 0],
        '7' => [0b11100000, 0b00100000, 0b01000000, 0b01000000, 0b01000000, 0],
        '8' => [0b11100000, 0b10100000, 0b11100000, 0b10100000, 0b11100000, 0],
        '9' => [0b11100000, 0b10100000, 0b11100000, 0b00100000, 0b11100000, 0],
        ':' => [0, 0b01000000, 0, 0b01000000, 0, 0],
        '.' => [0, 0, 0, 0, 0b01000000, 0],
        '!' => [0b01000000, 0b01000000, 0b01000000, 0, 0b01000000, 0],
        '[' => [0b11000000, 0b10000000, 0b10000000, 0b10000000, 0b11000000, 0],
        ']' => [0b01100000, 0b00100000, 0b00100000, 0b00100000, 0b01100000, 0],
        '-' => [0, 0, 0b11100000, 0, 0, 0],
        _ => [0; 6],
    }
}

/// Largest scale, at most `preferred`, at which `text` fits in `max_w`
/// world pixels on one line; never below 1
pub fn fit_scale(text: &str, max_w: i32, preferred: i32) -> i32 {
    let mut scale = preferred.max(1);
    while scale > 1 && text_size(text, scale).x > max_w {
        scale -= 1;
    }
    scale
}

/// World-space dimensions of a rasterized line
pub fn text_size(text: &str, scale: i32) -> IVec2 {
    let s = scale.max(1);
    let count = text.chars().count() as i32;
    let w = if count == 0 {
        0
    } else {
        (count * GLYPH_ADVANCE - 1) * s
    };
    IVec2::new(w, GLYPH_ROWS * s)
}

/// Rasterize one line of text into a pixel grid; None is transparent
pub fn rasterize(text: &str, color: Rgb, scale: i32) -> (IVec2, Vec<Option<Rgb>>) {
    let s = scale.max(1);
    let size = text_size(text, s);
    let mut pixels = vec![None; (size.x * size.y) as usize];

    let mut pen_x = 0;
    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if (bits >> (7 - col)) & 1 == 0 {
                    continue;
                }
                for dy in 0..s {
                    for dx in 0..s {
                        let x = pen_x + col * s + dx;
                        let y = row as i32 * s + dy;
                        if x < size.x && y < size.y {
                            pixels[(y * size.x + x) as usize] = Some(color);
                        }
                    }
                }
            }
        }
        pen_x += GLYPH_ADVANCE * s;
    }
    (size, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size() {
        assert_eq!(text_size("", 4), IVec2::new(0, 24));
        assert_eq!(text_size("A", 1), IVec2::new(4, 6));
        assert_eq!(text_size("New Game", 4), IVec2::new(156, 24));
    }

    #[test]
    fn test_fit_scale_shrinks_long_lines() {
        // 8 chars: 39 px at scale 1
        assert_eq!(fit_scale("New Game", 640, 4), 4);
        // 42 chars: 209 px at scale 1, so scale 4 (836) overflows 640
        let prompt = "Press [SPACE] to restart or [ESC] to exit.";
        assert_eq!(fit_scale(prompt, 640, 4), 3);
        assert!(text_size(prompt, 3).x <= 640);
        // Never shrinks below 1, even when the line cannot fit
        assert_eq!(fit_scale(prompt, 10, 4), 1);
    }

    #[test]
    fn test_rasterize_sets_expected_pixels() {
        let (size, pixels) = rasterize("I", Rgb::WHITE, 1);
        assert_eq!(size, IVec2::new(4, 6));
        // Top row of I is three lit columns, the fourth blank
        assert_eq!(pixels[0], Some(Rgb::WHITE));
        assert_eq!(pixels[1], Some(Rgb::WHITE));
        assert_eq!(pixels[2], Some(Rgb::WHITE));
        assert_eq!(pixels[3], None);
        // Bottom cell row is always blank
        assert!(pixels[5 * 4..].iter().all(|p| p.is_none()));
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        let (_, upper) = rasterize("SCORE", Rgb::WHITE, 2);
        let (_, lower) = rasterize("score", Rgb::WHITE, 2);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_unknown_chars_render_blank() {
        let (_, pixels) = rasterize("#", Rgb::WHITE, 1);
        assert!(pixels.iter().all(|p| p.is_none()));
    }

    #[test]
    fn test_scale_multiplies_blocks() {
        let (size, pixels) = rasterize(".", Rgb::WHITE, 3);
        assert_eq!(size, IVec2::new(12, 18));
        let lit = pixels.iter().filter(|p| p.is_some()).count();
        assert_eq!(lit, 9);
    }
}
