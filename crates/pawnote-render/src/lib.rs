//! Paw Note Render Library
//!
//! CPU compositing of the Paw Note canvas: the drawing surface, the sticker
//! layer and selection chrome are flattened into one RGBA frame.

pub mod cat;
mod compositor;
pub mod glyph;

pub use compositor::{Compositor, SelectionStyle};
pub use glyph::{BlockGlyphs, FontGlyphs, GlyphRasterizer};

use pawnote_core::codec::FrameError;
use thiserror::Error;

/// Render errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font load failed: {0}")]
    Font(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
