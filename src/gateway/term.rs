//! Terminal presentation backend
//!
//! Composites the 640x480 world into an RGB pixel buffer at terminal
//! resolution and presents it with the upper-half-block glyph: each
//! character cell carries two vertically stacked pixels, foreground on top
//! and background below. Color escape sequences are only emitted when the
//! color actually changes, which keeps a full-screen frame inside a 30 fps
//! budget on ordinary terminals.
//!
//! The constructor claims the terminal (raw mode, alternate screen, hidden
//! cursor, mouse capture, keyboard enhancement where supported) and `Drop`
//! restores all of it, so a panic or early error still leaves the shell
//! usable.

use std::io::{self, Stdout, Write, stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseButton,
    MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use glam::IVec2;

use super::sprite::Sprite;
use super::{Flip, Gateway, InputEvent, Key, Rgb, TextureId, font};
use crate::consts::{SCREEN_H, SCREEN_W};
use crate::error::GameError;
use crate::sim::Rect;

/// A staged texture: world-space size, row-major pixels, None transparent
struct Texture {
    size: IVec2,
    pixels: Vec<Option<Rgb>>,
}

/// Off-screen frame at terminal resolution (width x rows*2)
struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb::BLACK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize, fill: Rgb) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, fill);
    }

    fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    /// Composite a texture into the buffer. The destination rectangle is the
    /// world rect of the clip scaled to buffer resolution; every destination
    /// pixel is inverse-mapped (rotation about the clip center, then flip)
    /// back to a source texel, nearest neighbor.
    fn blit(&mut self, tex: &Texture, x: i32, y: i32, clip: Option<Rect>, angle: f64, flip: Flip) {
        if self.w == 0 || self.h == 0 {
            return;
        }
        let src = clip.unwrap_or(Rect::new(0, 0, tex.size.x, tex.size.y));
        if src.w <= 0 || src.h <= 0 {
            return;
        }
        let sx = self.w as f32 / SCREEN_W as f32;
        let sy = self.h as f32 / SCREEN_H as f32;

        let bx0 = ((x as f32) * sx).floor() as i32;
        let by0 = ((y as f32) * sy).floor() as i32;
        let bx1 = (((x + src.w) as f32) * sx).ceil() as i32;
        let by1 = (((y + src.h) as f32) * sy).ceil() as i32;

        let rotated = angle != 0.0;
        let (sin, cos) = (angle as f32).to_radians().sin_cos();
        let cx = x as f32 + src.w as f32 / 2.0;
        let cy = y as f32 + src.h as f32 / 2.0;

        for by in by0.max(0)..by1.min(self.h as i32) {
            for bx in bx0.max(0)..bx1.min(self.w as i32) {
                // Buffer pixel center, in world coordinates
                let wx = (bx as f32 + 0.5) / sx;
                let wy = (by as f32 + 0.5) / sy;
                let (rx, ry) = if rotated {
                    let dx = wx - cx;
                    let dy = wy - cy;
                    (cx + dx * cos + dy * sin, cy - dx * sin + dy * cos)
                } else {
                    (wx, wy)
                };
                let mut lx = (rx - x as f32).floor() as i32;
                let mut ly = (ry - y as f32).floor() as i32;
                if lx < 0 || ly < 0 || lx >= src.w || ly >= src.h {
                    continue;
                }
                match flip {
                    Flip::None => {}
                    Flip::Horizontal => lx = src.w - 1 - lx,
                    Flip::Vertical => ly = src.h - 1 - ly,
                }
                let tx = src.x + lx;
                let ty = src.y + ly;
                if tx < 0 || ty < 0 || tx >= tex.size.x || ty >= tex.size.y {
                    continue;
                }
                if let Some(c) = tex.pixels[(ty * tex.size.x + tx) as usize] {
                    self.px[by as usize * self.w + bx as usize] = c;
                }
            }
        }
    }

    /// Write the frame as half-block glyphs, batching color changes
    fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.px[row * 2 * self.w + col];
                let bot = self.px[(row * 2 + 1) * self.w + col];
                if top == bot {
                    if prev_bg != Some(top) {
                        queue!(out, style::SetBackgroundColor(term_color(top)))?;
                        prev_bg = Some(top);
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = Some(top);
                    }
                    if prev_bg != Some(bot) {
                        queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                        prev_bg = Some(bot);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => Key::Other,
    }
}

/// Map a terminal cell to world coordinates through the cell's center
fn world_from_cell(col: u16, row: u16, pw: usize, ph: usize) -> IVec2 {
    let bx = f32::from(col) + 0.5;
    let by = f32::from(row) * 2.0 + 1.0;
    IVec2::new(
        (bx * SCREEN_W as f32 / pw.max(1) as f32) as i32,
        (by * SCREEN_H as f32 / ph.max(1) as f32) as i32,
    )
}

/// Crossterm-backed gateway
pub struct TermGateway {
    out: Stdout,
    buf: PixelBuf,
    textures: Vec<Option<Texture>>,
    clear_color: Rgb,
    keyboard_enhanced: bool,
}

impl TermGateway {
    /// Claim the terminal. On failure every step already taken is undone.
    pub fn new() -> Result<Self, GameError> {
        terminal::enable_raw_mode().map_err(GameError::Init)?;
        match Self::enter() {
            Ok(gw) => Ok(gw),
            Err(err) => {
                let _ = terminal::disable_raw_mode();
                Err(GameError::Init(err))
            }
        }
    }

    fn enter() -> io::Result<Self> {
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            event::EnableMouseCapture,
        )?;
        // Key release and repeat events need the kitty protocol; without it
        // every key event arrives as a plain press
        let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if keyboard_enhanced {
            execute!(
                out,
                event::PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES),
            )?;
        }
        log::debug!("keyboard enhancement supported: {keyboard_enhanced}");

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            textures: Vec::new(),
            clear_color: Rgb::BLACK,
            keyboard_enhanced,
        })
    }

    fn alloc(&mut self, size: IVec2, pixels: Vec<Option<Rgb>>) -> TextureId {
        let tex = Texture { size, pixels };
        if let Some(slot) = self.textures.iter().position(|t| t.is_none()) {
            self.textures[slot] = Some(tex);
            TextureId(slot as u32)
        } else {
            self.textures.push(Some(tex));
            TextureId((self.textures.len() - 1) as u32)
        }
    }
}

impl Drop for TermGateway {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(self.out, event::PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            event::DisableMouseCapture,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        let _ = terminal::disable_raw_mode();
    }
}

impl Gateway for TermGateway {
    fn load_image(&mut self, path: &Path) -> Result<TextureId, GameError> {
        let sprite = Sprite::load(path)?;
        log::debug!(
            "staged sprite {} ({}x{})",
            path.display(),
            sprite.size.x,
            sprite.size.y
        );
        Ok(self.alloc(sprite.size, sprite.pixels))
    }

    fn load_glyph(&mut self, text: &str, color: Rgb) -> Result<TextureId, GameError> {
        // Long lines drop to a smaller scale instead of running off screen
        let scale = font::fit_scale(text, SCREEN_W, font::GLYPH_SCALE);
        let (size, pixels) = font::rasterize(text, color, scale);
        Ok(self.alloc(size, pixels))
    }

    fn free(&mut self, id: TextureId) {
        if let Some(slot) = self.textures.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn size_of(&self, id: TextureId) -> IVec2 {
        self.textures
            .get(id.0 as usize)
            .and_then(|t| t.as_ref())
            .map_or(IVec2::ZERO, |t| t.size)
    }

    fn clear(&mut self, color: Rgb) {
        self.clear_color = color;
        self.buf.fill(color);
    }

    fn render(
        &mut self,
        id: TextureId,
        x: i32,
        y: i32,
        clip: Option<Rect>,
        angle: f64,
        flip: Flip,
    ) {
        let Some(tex) = self.textures.get(id.0 as usize).and_then(|t| t.as_ref()) else {
            return;
        };
        self.buf.blit(tex, x, y, clip, angle, flip);
    }

    fn present(&mut self) -> Result<(), GameError> {
        self.buf.present(&mut self.out)?;
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press
                        && key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        events.push(InputEvent::Quit);
                        continue;
                    }
                    let mapped = map_key(key.code);
                    match key.kind {
                        KeyEventKind::Press => events.push(InputEvent::KeyDown {
                            key: mapped,
                            repeat: false,
                        }),
                        KeyEventKind::Repeat => events.push(InputEvent::KeyDown {
                            key: mapped,
                            repeat: true,
                        }),
                        KeyEventKind::Release => events.push(InputEvent::KeyUp { key: mapped }),
                    }
                }
                Event::Mouse(mouse) => {
                    let pos = world_from_cell(mouse.column, mouse.row, self.buf.w, self.buf.h);
                    match mouse.kind {
                        MouseEventKind::Moved => events.push(InputEvent::MouseMove { pos }),
                        MouseEventKind::Down(MouseButton::Left) => {
                            events.push(InputEvent::MouseDown { pos });
                        }
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    self.buf
                        .resize(cols as usize, rows as usize * 2, self.clear_color);
                }
                _ => {}
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: i32, h: i32, c: Rgb) -> Texture {
        Texture {
            size: IVec2::new(w, h),
            pixels: vec![Some(c); (w * h) as usize],
        }
    }

    const RED: Rgb = Rgb::new(200, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 200);

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Char(' ')), Key::Space);
        assert_eq!(map_key(KeyCode::Esc), Key::Escape);
        assert_eq!(map_key(KeyCode::Enter), Key::Enter);
        assert_eq!(map_key(KeyCode::Char('x')), Key::Other);
    }

    #[test]
    fn test_world_from_cell_scales_to_world() {
        // An 80x24 terminal is a 80x48 pixel buffer
        let center = world_from_cell(40, 12, 80, 48);
        assert_eq!(center, IVec2::new(324, 250));
        let origin = world_from_cell(0, 0, 80, 48);
        assert!(origin.x < 8 && origin.y < 12);
    }

    #[test]
    fn test_blit_one_to_one() {
        let mut buf = PixelBuf::new(SCREEN_W as usize, SCREEN_H as usize);
        buf.blit(&solid(10, 10, RED), 5, 7, None, 0.0, Flip::None);
        assert_eq!(buf.px[7 * buf.w + 5], RED);
        assert_eq!(buf.px[16 * buf.w + 14], RED);
        assert_eq!(buf.px[17 * buf.w + 15], Rgb::BLACK);
        assert_eq!(buf.px[6 * buf.w + 5], Rgb::BLACK);
    }

    #[test]
    fn test_blit_downscale() {
        // A tenth-resolution buffer: each buffer pixel covers 10x10 world
        let mut buf = PixelBuf::new(64, 48);
        buf.blit(&solid(10, 10, RED), 0, 0, None, 0.0, Flip::None);
        assert_eq!(buf.px[0], RED);
        assert_eq!(buf.px[1], Rgb::BLACK);
        assert_eq!(buf.px[buf.w], Rgb::BLACK);
    }

    #[test]
    fn test_blit_clip_selects_source_region() {
        let mut buf = PixelBuf::new(SCREEN_W as usize, SCREEN_H as usize);
        let tex = Texture {
            size: IVec2::new(2, 1),
            pixels: vec![Some(RED), Some(BLUE)],
        };
        buf.blit(&tex, 0, 0, Some(Rect::new(1, 0, 1, 1)), 0.0, Flip::None);
        assert_eq!(buf.px[0], BLUE);
        assert_eq!(buf.px[1], Rgb::BLACK);
    }

    #[test]
    fn test_blit_vertical_flip() {
        let mut buf = PixelBuf::new(SCREEN_W as usize, SCREEN_H as usize);
        let tex = Texture {
            size: IVec2::new(1, 2),
            pixels: vec![Some(RED), Some(BLUE)],
        };
        buf.blit(&tex, 0, 0, None, 0.0, Flip::Vertical);
        assert_eq!(buf.px[0], BLUE);
        assert_eq!(buf.px[buf.w], RED);
    }

    #[test]
    fn test_blit_half_turn() {
        let mut buf = PixelBuf::new(SCREEN_W as usize, SCREEN_H as usize);
        let tex = Texture {
            size: IVec2::new(2, 1),
            pixels: vec![Some(RED), Some(BLUE)],
        };
        buf.blit(&tex, 0, 0, None, 180.0, Flip::None);
        assert_eq!(buf.px[0], BLUE);
        assert_eq!(buf.px[1], RED);
    }

    #[test]
    fn test_blit_transparency_preserves_background() {
        let mut buf = PixelBuf::new(SCREEN_W as usize, SCREEN_H as usize);
        buf.fill(BLUE);
        let tex = Texture {
            size: IVec2::new(2, 1),
            pixels: vec![Some(RED), None],
        };
        buf.blit(&tex, 0, 0, None, 0.0, Flip::None);
        assert_eq!(buf.px[0], RED);
        assert_eq!(buf.px[1], BLUE);
    }

    #[test]
    fn test_blit_clamps_to_buffer_edges() {
        let mut buf = PixelBuf::new(64, 48);
        // Partially off every edge; must not panic
        buf.blit(&solid(100, 100, RED), -50, -50, None, 0.0, Flip::None);
        buf.blit(&solid(100, 100, RED), 600, 440, None, 0.0, Flip::None);
        assert_eq!(buf.px[0], RED);
    }

    #[test]
    fn test_present_writes_frames() {
        let mut buf = PixelBuf::new(4, 4);
        buf.px[0] = RED;
        let mut sink = Vec::new();
        buf.present(&mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains('\u{2580}'));
        assert!(text.contains("\r\n"));
    }

    #[test]
    fn test_present_empty_buffer_is_fine() {
        let buf = PixelBuf::new(0, 0);
        let mut sink = Vec::new();
        buf.present(&mut sink).unwrap();
    }
}
