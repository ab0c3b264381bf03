//! Raster surface holding the persistent strokes layer.

use crate::paint::PaintConfig;
use crate::raster::{self, BlendMode};
use crate::viewport::Viewport;
use image::RgbaImage;
use kurbo::Point;

/// A stroke in progress. Points are kept in device pixels.
#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    last: Point,
    paint: PaintConfig,
}

/// Fixed-size pixel buffer that strokes are painted into.
///
/// The buffer is allocated in device pixels; every method takes logical
/// coordinates and maps them through the [`Viewport`].
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    viewport: Viewport,
    stroke: Option<ActiveStroke>,
}

impl Surface {
    /// Create an opaque white surface for the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        let (width, height) = viewport.device_size();
        Self {
            pixels: raster::blank(width, height),
            viewport,
            stroke: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Reallocate the buffer for a new viewport, filled white.
    ///
    /// Returns `false` (and changes nothing) for a zero-area viewport. Prior
    /// content is not carried over; callers redraw it from the last frame.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            return false;
        }
        let (width, height) = viewport.device_size();
        self.viewport = viewport;
        self.pixels = raster::blank(width, height);
        self.stroke = None;
        log::debug!("Surface resized to {width}x{height}");
        true
    }

    /// Start a stroke at `point`. Nothing is painted until the stroke moves.
    pub fn begin_stroke(&mut self, point: Point, paint: PaintConfig) {
        self.stroke = Some(ActiveStroke {
            last: self.viewport.to_device(point),
            paint,
        });
    }

    /// Extend the current stroke to `point`, painting the new segment.
    ///
    /// Returns `false` if no stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        let Some(stroke) = self.stroke.as_mut() else {
            return false;
        };
        let to = self.viewport.to_device(point);
        let width = self.viewport.length_to_device(stroke.paint.width);
        let mode = if stroke.paint.erase {
            BlendMode::DestinationOut
        } else {
            BlendMode::SourceOver
        };
        raster::stroke_segment(
            &mut self.pixels,
            stroke.last,
            to,
            width,
            stroke.paint.color.to_rgba(),
            mode,
        );
        stroke.last = to;
        true
    }

    /// Finish the current stroke. Returns `false` if none was in progress.
    pub fn end_stroke(&mut self) -> bool {
        self.stroke.take().is_some()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Reset every pixel to opaque white.
    pub fn clear(&mut self) {
        self.pixels = raster::blank(self.pixels.width(), self.pixels.height());
        self.stroke = None;
    }

    /// Replace the whole buffer with `image`, stretched to the current size.
    pub fn replace_with(&mut self, image: &RgbaImage) {
        let (width, height) = self.pixels.dimensions();
        self.pixels = raster::stretch(image, width, height);
        self.stroke = None;
    }

    /// True if the buffer is pixel-equal to a fresh blank surface.
    pub fn is_blank(&self) -> bool {
        raster::is_blank(&self.pixels)
    }
}
