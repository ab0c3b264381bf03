//! Sticker layer: positioned image and glyph overlays above the surface.
//!
//! Stickers live in logical coordinates and are kept in insertion order,
//! which doubles as their z-order. Hit testing scans topmost-first; rendering
//! walks the collection front to back.

use image::RgbaImage;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default edge length of an image sticker.
pub const IMAGE_STICKER_SIZE: f64 = 80.0;
/// Default edge length of a glyph sticker.
pub const GLYPH_STICKER_SIZE: f64 = 40.0;
/// Resizing never shrinks a sticker below this width or height.
pub const STICKER_MIN_SIZE: f64 = 20.0;
/// Edge length of the square resize handle at the bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f64 = 12.0;

/// What a sticker shows.
#[derive(Clone, PartialEq)]
pub enum StickerContent {
    /// A decoded raster image, stretched to the sticker box.
    Image(Arc<RgbaImage>),
    /// A text glyph (usually a single emoji), centered in the box.
    Glyph(String),
}

impl fmt::Debug for StickerContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(image) => write!(f, "Image({}x{})", image.width(), image.height()),
            Self::Glyph(glyph) => f.debug_tuple("Glyph").field(glyph).finish(),
        }
    }
}

/// Sizes used when creating and manipulating stickers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerMetrics {
    pub image_size: f64,
    pub glyph_size: f64,
    pub min_size: f64,
    pub handle_size: f64,
}

impl Default for StickerMetrics {
    fn default() -> Self {
        Self {
            image_size: IMAGE_STICKER_SIZE,
            glyph_size: GLYPH_STICKER_SIZE,
            min_size: STICKER_MIN_SIZE,
            handle_size: RESIZE_HANDLE_SIZE,
        }
    }
}

impl StickerMetrics {
    fn default_size(&self, content: &StickerContent) -> f64 {
        match content {
            StickerContent::Image(_) => self.image_size,
            StickerContent::Glyph(_) => self.glyph_size,
        }
    }
}

/// A positioned overlay object.
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    /// Top-left corner
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub content: StickerContent,
}

impl Sticker {
    /// Create a square sticker of edge `size` centered on `center`.
    pub fn centered(center: Point, size: f64, content: StickerContent) -> Self {
        Self {
            position: center - Vec2::new(size / 2.0, size / 2.0),
            width: size,
            height: size,
            content,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }

    /// Bounding box test, edges inclusive.
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    /// The resize handle box at the bottom-right corner.
    pub fn handle_rect(&self, handle_size: f64) -> Rect {
        let b = self.bounds();
        Rect::new(b.x1 - handle_size, b.y1 - handle_size, b.x1, b.y1)
    }

    pub fn handle_contains(&self, point: Point, handle_size: f64) -> bool {
        let h = self.handle_rect(handle_size);
        point.x >= h.x0 && point.x <= h.x1 && point.y >= h.y0 && point.y <= h.y1
    }
}

/// Ordered collection of stickers with at most one active sticker.
#[derive(Debug, Clone, Default)]
pub struct StickerLayer {
    stickers: Vec<Sticker>,
    active: Option<usize>,
    metrics: StickerMetrics,
    grab_offset: Vec2,
}

impl StickerLayer {
    pub fn new(metrics: StickerMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> StickerMetrics {
        self.metrics
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Sticker> {
        self.active.and_then(|i| self.stickers.get(i))
    }

    fn active_mut(&mut self) -> Option<&mut Sticker> {
        self.active.and_then(|i| self.stickers.get_mut(i))
    }

    /// Select a sticker by index. Out-of-range indices clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.active = index.filter(|&i| i < self.stickers.len());
    }

    /// Place a new sticker centered on `point` and make it active.
    ///
    /// Returns `false` without a template.
    pub fn place(&mut self, point: Point, template: Option<&StickerContent>) -> bool {
        let Some(content) = template else {
            return false;
        };
        let size = self.metrics.default_size(content);
        self.stickers.push(Sticker::centered(point, size, content.clone()));
        self.active = Some(self.stickers.len() - 1);
        log::debug!("Placed sticker #{} at {:?}", self.stickers.len() - 1, point);
        true
    }

    /// Topmost sticker containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.stickers.iter().rposition(|s| s.contains(point))
    }

    /// True if `point` is on the active sticker's resize handle.
    pub fn hit_test_handle(&self, point: Point) -> bool {
        self.active()
            .is_some_and(|s| s.handle_contains(point, self.metrics.handle_size))
    }

    /// Select `index` and remember where inside it the pointer grabbed.
    pub fn begin_drag(&mut self, index: usize, point: Point) -> bool {
        let Some(sticker) = self.stickers.get(index) else {
            return false;
        };
        self.grab_offset = point - sticker.position;
        self.active = Some(index);
        true
    }

    /// Move the active sticker so the grab offset is preserved.
    pub fn drag(&mut self, point: Point) -> bool {
        let offset = self.grab_offset;
        match self.active_mut() {
            Some(sticker) => {
                sticker.position = point - offset;
                true
            }
            None => false,
        }
    }

    pub fn begin_resize(&mut self, index: usize) -> bool {
        if index >= self.stickers.len() {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Resize the active sticker so its bottom-right corner follows `point`.
    pub fn resize(&mut self, point: Point) -> bool {
        let min = self.metrics.min_size;
        match self.active_mut() {
            Some(sticker) => {
                sticker.width = (point.x - sticker.position.x).max(min);
                sticker.height = (point.y - sticker.position.y).max(min);
                true
            }
            None => false,
        }
    }

    /// Remove the sticker at `index`, keeping the active index valid.
    pub fn delete(&mut self, index: usize) -> Option<Sticker> {
        if index >= self.stickers.len() {
            return None;
        }
        let removed = self.stickers.remove(index);
        self.active = match self.active {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        Some(removed)
    }

    pub fn delete_active(&mut self) -> Option<Sticker> {
        let index = self.active?;
        self.delete(index)
    }

    pub fn clear_all(&mut self) {
        self.stickers.clear();
        self.active = None;
        self.grab_offset = Vec2::ZERO;
    }
}
