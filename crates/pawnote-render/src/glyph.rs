//! Glyph rasterization for text stickers.

use crate::RenderError;
use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect};
use pawnote_core::raster::{self, BlendMode};
use std::path::Path;

/// Glyph fill color.
pub const GLYPH_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draws a short text run centered on a point.
pub trait GlyphRasterizer: Send + Sync {
    /// Draw `text` with its em box centered on `center`, at `font_size` pixels.
    ///
    /// Output is not clipped to any sticker box, only to the target image.
    fn draw(&self, target: &mut RgbaImage, text: &str, center: Point, font_size: f64);
}

/// Outline rasterizer backed by a TrueType/OpenType font.
pub struct FontGlyphs {
    font: FontArc,
}

impl FontGlyphs {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        FontArc::try_from_vec(bytes)
            .map(Self::new)
            .map_err(|e| RenderError::Font(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
    }

    /// First installed system font from the per-platform candidate list.
    pub fn discover() -> Option<Self> {
        let candidates: &[&str] = &[
            #[cfg(target_os = "linux")]
            "/usr/share/fonts/truetype/noto/NotoSansSymbols2-Regular.ttf",
            #[cfg(target_os = "linux")]
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            #[cfg(target_os = "linux")]
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            #[cfg(target_os = "linux")]
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            #[cfg(target_os = "linux")]
            "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
            #[cfg(target_os = "windows")]
            "C:\\Windows\\Fonts\\seguisym.ttf",
            #[cfg(target_os = "windows")]
            "C:\\Windows\\Fonts\\arial.ttf",
            #[cfg(target_os = "macos")]
            "/System/Library/Fonts/Apple Symbols.ttf",
            #[cfg(target_os = "macos")]
            "/Library/Fonts/Arial Unicode.ttf",
            #[cfg(target_os = "macos")]
            "/System/Library/Fonts/Supplemental/Arial.ttf",
        ];
        let paths: Vec<&Path> = candidates.iter().map(Path::new).collect();
        Self::discover_in(&paths)
    }

    /// First path that reads and parses as a font. Unreadable or invalid
    /// files are skipped.
    pub fn discover_in(paths: &[&Path]) -> Option<Self> {
        paths.iter().find_map(|path| match Self::from_file(path) {
            Ok(glyphs) => {
                log::info!("Using system font {}", path.display());
                Some(glyphs)
            }
            Err(e) => {
                log::debug!("Skipping font candidate: {e}");
                None
            }
        })
    }

    /// Glyph ids and pen x offsets, plus the total advance.
    fn layout(&self, text: &str, scale: PxScale) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::new();
        let mut cursor_x = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                cursor_x += scaled.kern(prev, id);
            }
            glyphs.push((id, cursor_x));
            cursor_x += scaled.h_advance(id);
            last = Some(id);
        }
        (glyphs, cursor_x)
    }
}

impl GlyphRasterizer for FontGlyphs {
    fn draw(&self, target: &mut RgbaImage, text: &str, center: Point, font_size: f64) {
        if font_size <= 0.0 {
            return;
        }
        let scale = PxScale::from(font_size as f32);
        let scaled = self.font.as_scaled(scale);
        let (glyphs, width) = self.layout(text, scale);

        let origin_x = center.x as f32 - width / 2.0;
        // Middle baseline: the em box is centered vertically on `center`.
        let baseline = center.y as f32 + (scaled.ascent() + scaled.descent()) / 2.0;
        let (tw, th) = (target.width() as i64, target.height() as i64);

        for (id, x) in glyphs {
            let glyph = id.with_scale_and_position(scale, point(origin_x + x, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if px >= 0 && py >= 0 && px < tw && py < th {
                    raster::blend(
                        target.get_pixel_mut(px as u32, py as u32),
                        GLYPH_COLOR,
                        coverage,
                        BlendMode::SourceOver,
                    );
                }
            });
        }
    }
}

/// Font-less fallback: each glyph run becomes a solid block.
///
/// The block color is derived from the text, so different glyphs stay
/// distinguishable and the output is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    fn color_for(text: &str) -> Rgba<u8> {
        // FNV-1a
        let hash = text.bytes().fold(0x811c_9dc5u32, |h, b| {
            (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
        });
        let [r, g, b, _] = hash.to_le_bytes();
        Rgba([r / 2, g / 2, b / 2, 255])
    }
}

impl GlyphRasterizer for BlockGlyphs {
    fn draw(&self, target: &mut RgbaImage, text: &str, center: Point, font_size: f64) {
        if text.is_empty() || font_size <= 0.0 {
            return;
        }
        let half = font_size * 0.3;
        let rect = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
        raster::fill_rect(target, rect, Self::color_for(text));
    }
}
