//! Viewport mapping between logical (CSS) pixels and device pixels.

use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// The displayed size of the drawing area and the device scale factor.
///
/// Input and sticker geometry are in logical pixels. The backing surface is
/// allocated at `logical size * scale_factor` so drawing stays crisp on
/// high-density displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Logical width
    pub width: f64,
    /// Logical height
    pub height: f64,
    /// Device pixels per logical pixel
    pub scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale_factor: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale_factor,
        }
    }

    /// True when the displayed area has no size (e.g. the editor is hidden).
    pub fn is_empty(&self) -> bool {
        self.device_size().0 == 0 || self.device_size().1 == 0
    }

    /// Backing buffer size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        let w = (self.width * self.scale_factor).round().max(0.0);
        let h = (self.height * self.scale_factor).round().max(0.0);
        (w as u32, h as u32)
    }

    /// Logical to device transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor)
    }

    pub fn to_device(&self, point: Point) -> Point {
        self.transform() * point
    }

    pub fn to_logical(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    pub fn rect_to_device(&self, rect: Rect) -> Rect {
        self.transform().transform_rect_bbox(rect)
    }

    /// Scale a logical length (e.g. a brush width) to device pixels.
    pub fn length_to_device(&self, length: f64) -> f64 {
        length * self.scale_factor
    }

    /// The logical drawing area.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
