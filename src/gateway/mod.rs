//! Presentation gateway
//!
//! The game talks to its display through the [`Gateway`] trait: texture
//! staging, rasterized text, frame composition, and input polling, all in
//! world coordinates (640x480, y down). One concrete backend ships
//! ([`term::TermGateway`]); tests drive the app with scripted ones.

pub mod font;
pub mod sprite;
pub mod term;

use std::path::Path;

use glam::IVec2;

use crate::error::GameError;
use crate::sim::Rect;

pub use term::TermGateway;

/// Handle to a texture owned by a gateway backend; backends mint the values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

/// Mirroring applied when a texture is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Keys the game distinguishes; everything else maps to `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Enter,
    Up,
    Down,
    Other,
}

/// A discrete input event, pointer coordinates already in world space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Close/interrupt signal: leave the application from any state
    Quit,
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key },
    MouseMove { pos: IVec2 },
    MouseDown { pos: IVec2 },
}

/// What the game needs from a display backend
pub trait Gateway {
    /// Stage a sprite texture from disk
    fn load_image(&mut self, path: &Path) -> Result<TextureId, GameError>;

    /// Rasterize one line of text into a texture
    fn load_glyph(&mut self, text: &str, color: Rgb) -> Result<TextureId, GameError>;

    /// Release a texture
    fn free(&mut self, id: TextureId);

    /// World-space dimensions of a texture (zero if freed)
    fn size_of(&self, id: TextureId) -> IVec2;

    /// Fill the frame with a solid color
    fn clear(&mut self, color: Rgb);

    /// Draw a texture at a world position, with an optional source clip,
    /// a rotation in degrees about the drawn region's center, and mirroring
    fn render(&mut self, id: TextureId, x: i32, y: i32, clip: Option<Rect>, angle: f64, flip: Flip);

    /// Push the composed frame to the display
    fn present(&mut self) -> Result<(), GameError>;

    /// Drain pending input events without blocking
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError>;
}
