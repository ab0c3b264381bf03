//! Frame compositing: surface pixels, stickers and selection chrome.

use crate::RenderError;
use crate::glyph::{BlockGlyphs, GlyphRasterizer};
use image::{Rgba, RgbaImage};
use pawnote_core::frame::Frame;
use pawnote_core::raster;
use pawnote_core::sticker::{StickerContent, StickerLayer};
use pawnote_core::surface::Surface;

/// Outline and handle drawn around the active sticker, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionStyle {
    pub color: Rgba<u8>,
    pub line_width: f64,
    /// `(on, off)` dash lengths.
    pub dash: (f64, f64),
}

impl Default for SelectionStyle {
    fn default() -> Self {
        Self {
            // #22c55e
            color: Rgba([0x22, 0xc5, 0x5e, 255]),
            line_width: 2.0,
            dash: (4.0, 2.0),
        }
    }
}

/// Builds the visible frame from the drawing surface and the sticker layer.
///
/// Composition never mutates its inputs, so composing twice without an
/// intervening edit yields identical pixels.
pub struct Compositor {
    glyphs: Box<dyn GlyphRasterizer>,
    selection: SelectionStyle,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Box::new(BlockGlyphs))
    }
}

impl Compositor {
    pub fn new(glyphs: Box<dyn GlyphRasterizer>) -> Self {
        Self {
            glyphs,
            selection: SelectionStyle::default(),
        }
    }

    pub fn with_selection_style(mut self, selection: SelectionStyle) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection_style(&self) -> SelectionStyle {
        self.selection
    }

    /// Compose a frame at the surface's device resolution.
    ///
    /// Stickers are painted in z-order. The active sticker's dashed outline
    /// and filled resize handle go on top of all of them.
    pub fn compose(&self, surface: &Surface, stickers: &StickerLayer) -> RgbaImage {
        let mut frame = surface.pixels().clone();
        let viewport = surface.viewport();

        for sticker in stickers.stickers() {
            let rect = viewport.rect_to_device(sticker.bounds());
            match &sticker.content {
                StickerContent::Image(image) => raster::draw_image(&mut frame, image, rect),
                StickerContent::Glyph(text) => {
                    self.glyphs.draw(&mut frame, text, rect.center(), rect.height())
                }
            }
        }

        if let Some(active) = stickers.active() {
            let rect = viewport.rect_to_device(active.bounds());
            raster::stroke_dashed_rect(
                &mut frame,
                rect,
                viewport.length_to_device(self.selection.line_width),
                (
                    viewport.length_to_device(self.selection.dash.0),
                    viewport.length_to_device(self.selection.dash.1),
                ),
                self.selection.color,
            );
            let handle = active.handle_rect(stickers.metrics().handle_size);
            raster::fill_rect(&mut frame, viewport.rect_to_device(handle), self.selection.color);
        }
        frame
    }

    /// Compose and encode the result as a frame for history and entries.
    pub fn render_and_capture(
        &self,
        surface: &Surface,
        stickers: &StickerLayer,
    ) -> Result<(RgbaImage, Frame), RenderError> {
        let image = self.compose(surface, stickers);
        let frame = Frame::encode(&image)?;
        log::trace!("Captured frame {}x{}", image.width(), image.height());
        Ok((image, frame))
    }
}
