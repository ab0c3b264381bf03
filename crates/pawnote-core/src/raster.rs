//! Pixel-level drawing primitives shared by the surface and the compositor.
//!
//! All coordinates here are device pixels. Colors are straight (not
//! premultiplied) RGBA, matching what `image` stores in an `RgbaImage`.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use kurbo::{Point, Rect};
use std::borrow::Cow;

/// Opaque white, the color of an untouched surface.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Fully transparent.
pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// How source pixels combine with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Remove destination alpha where the source covers it.
    DestinationOut,
}

/// A freshly initialized surface buffer: opaque white.
pub fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

/// True if `image` is pixel-equal to a blank buffer of the same size.
pub fn is_blank(image: &RgbaImage) -> bool {
    image.pixels().all(|p| *p == WHITE)
}

/// Blend `src` into `dst` with the given coverage in `0.0..=1.0`.
pub fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32, mode: BlendMode) {
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }

    let sa = f32::from(src.0[3]) / 255.0 * coverage;
    let da = f32::from(dst.0[3]) / 255.0;

    match mode {
        BlendMode::SourceOver => {
            let out_a = sa + da * (1.0 - sa);
            if out_a <= f32::EPSILON {
                *dst = CLEAR;
                return;
            }
            for c in 0..3 {
                let value = (f32::from(src.0[c]) * sa + f32::from(dst.0[c]) * da * (1.0 - sa)) / out_a;
                dst.0[c] = to_u8(value);
            }
            dst.0[3] = to_u8(out_a * 255.0);
        }
        BlendMode::DestinationOut => {
            let alpha = to_u8(da * (1.0 - sa) * 255.0);
            if alpha == 0 {
                *dst = CLEAR;
            } else {
                dst.0[3] = alpha;
            }
        }
    }
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Clamp a rectangle to the image and return its pixel span `(x0, y0, x1, y1)`.
fn pixel_span(image: &RgbaImage, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x0.floor().max(0.0);
    let y0 = rect.y0.floor().max(0.0);
    let x1 = rect.x1.ceil().min(f64::from(image.width()));
    let y1 = rect.y1.ceil().min(f64::from(image.height()));
    if !(x0 < x1 && y0 < y1) {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Stroke one segment of a path with round caps.
///
/// Consecutive segments of the same path overlap at their shared endpoint,
/// which yields round joins.
pub fn stroke_segment(
    image: &mut RgbaImage,
    from: Point,
    to: Point,
    width: f64,
    color: Rgba<u8>,
    mode: BlendMode,
) {
    let radius = (width / 2.0).max(0.5);
    let bounds = Rect::from_points(from, to).inflate(radius + 1.0, radius + 1.0);
    let Some((x0, y0, x1, y1)) = pixel_span(image, bounds) else {
        return;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            let d = distance_to_segment(pixel_center(x, y), from, to);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0) as f32;
            if coverage > 0.0 {
                blend(image.get_pixel_mut(x, y), color, coverage, mode);
            }
        }
    }
}

/// Fill every pixel whose center lies inside `rect`.
pub fn fill_rect(image: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let Some((x0, y0, x1, y1)) = pixel_span(image, rect) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if rect.contains(pixel_center(x, y)) {
                blend(image.get_pixel_mut(x, y), color, 1.0, BlendMode::SourceOver);
            }
        }
    }
}

/// Stroke the outline of `rect` with a dash pattern of `(on, off)` lengths.
///
/// The line is centered on the rectangle edge. The dash phase runs clockwise
/// from the top-left corner.
pub fn stroke_dashed_rect(
    image: &mut RgbaImage,
    rect: Rect,
    line_width: f64,
    dash: (f64, f64),
    color: Rgba<u8>,
) {
    let half = line_width / 2.0;
    let (w, h) = (rect.width(), rect.height());
    let period = dash.0 + dash.1;
    let Some((x0, y0, x1, y1)) = pixel_span(image, rect.inflate(half, half)) else {
        return;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            let p = pixel_center(x, y);
            let along = if (p.y - rect.y0).abs() <= half {
                Some((p.x - rect.x0).clamp(0.0, w))
            } else if (p.x - rect.x1).abs() <= half {
                Some(w + (p.y - rect.y0).clamp(0.0, h))
            } else if (p.y - rect.y1).abs() <= half {
                Some(w + h + (rect.x1 - p.x).clamp(0.0, w))
            } else if (p.x - rect.x0).abs() <= half {
                Some(2.0 * w + h + (rect.y1 - p.y).clamp(0.0, h))
            } else {
                None
            };

            let Some(along) = along else { continue };
            if period <= 0.0 || along.rem_euclid(period) < dash.0 {
                blend(image.get_pixel_mut(x, y), color, 1.0, BlendMode::SourceOver);
            }
        }
    }
}

/// Stretch `src` to `(width, height)`.
pub fn stretch(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    imageops::resize(src, width, height, FilterType::Triangle)
}

/// Draw `src` stretched into `rect`, blending over the destination.
pub fn draw_image(dst: &mut RgbaImage, src: &RgbaImage, rect: Rect) {
    let width = rect.width().round();
    let height = rect.height().round();
    if width < 1.0 || height < 1.0 || src.width() == 0 || src.height() == 0 {
        return;
    }

    let (width, height) = (width as u32, height as u32);
    let scaled: Cow<'_, RgbaImage> = if src.dimensions() == (width, height) {
        Cow::Borrowed(src)
    } else {
        Cow::Owned(imageops::resize(src, width, height, FilterType::Triangle))
    };
    imageops::overlay(dst, scaled.as_ref(), rect.x0.round() as i64, rect.y0.round() as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_blank_is_blank() {
        let image = blank(4, 3);
        assert!(is_blank(&image));
        let mut touched = image.clone();
        touched.put_pixel(1, 1, RED);
        assert!(!is_blank(&touched));
    }

    #[test]
    fn test_source_over_opaque_replaces() {
        let mut dst = WHITE;
        blend(&mut dst, RED, 1.0, BlendMode::SourceOver);
        assert_eq!(dst, RED);
    }

    #[test]
    fn test_source_over_zero_coverage_is_noop() {
        let mut dst = WHITE;
        blend(&mut dst, RED, 0.0, BlendMode::SourceOver);
        assert_eq!(dst, WHITE);
    }

    #[test]
    fn test_destination_out_clears() {
        let mut dst = RED;
        blend(&mut dst, WHITE, 1.0, BlendMode::DestinationOut);
        assert_eq!(dst, CLEAR);

        let mut half = RED;
        blend(&mut half, WHITE, 0.5, BlendMode::DestinationOut);
        assert_eq!(half.0[3], 128);
        assert_eq!(half.0[0], 255);
    }

    #[test]
    fn test_stroke_segment_paints_along_line_only() {
        let mut image = blank(40, 40);
        stroke_segment(
            &mut image,
            Point::new(5.0, 20.0),
            Point::new(35.0, 20.0),
            4.0,
            RED,
            BlendMode::SourceOver,
        );
        assert_eq!(*image.get_pixel(20, 19), RED);
        assert_eq!(*image.get_pixel(20, 5), WHITE);
        // Round cap extends past the endpoint by the radius.
        assert_eq!(*image.get_pixel(3, 19), RED);
        assert_eq!(*image.get_pixel(0, 19), WHITE);
    }

    #[test]
    fn test_stroke_segment_outside_image_is_ignored() {
        let mut image = blank(10, 10);
        stroke_segment(
            &mut image,
            Point::new(-50.0, -50.0),
            Point::new(-40.0, -40.0),
            4.0,
            RED,
            BlendMode::SourceOver,
        );
        assert!(is_blank(&image));
    }

    #[test]
    fn test_fill_rect() {
        let mut image = blank(10, 10);
        fill_rect(&mut image, Rect::new(2.0, 2.0, 4.0, 4.0), RED);
        assert_eq!(*image.get_pixel(2, 2), RED);
        assert_eq!(*image.get_pixel(3, 3), RED);
        assert_eq!(*image.get_pixel(4, 4), WHITE);
    }

    #[test]
    fn test_dashed_rect_has_gaps() {
        let mut image = blank(30, 30);
        stroke_dashed_rect(&mut image, Rect::new(5.0, 5.0, 25.0, 25.0), 2.0, (4.0, 2.0), RED);
        // Top edge: positions 0..4 on, 4..6 off.
        assert_eq!(*image.get_pixel(6, 5), RED);
        assert_eq!(*image.get_pixel(9, 5), WHITE);
        // Interior untouched.
        assert_eq!(*image.get_pixel(15, 15), WHITE);
    }

    #[test]
    fn test_draw_image_stretches_into_rect() {
        let mut dst = blank(20, 20);
        let src = RgbaImage::from_pixel(2, 2, RED);
        draw_image(&mut dst, &src, Rect::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(*dst.get_pixel(10, 10), RED);
        assert_eq!(*dst.get_pixel(4, 4), WHITE);
        assert_eq!(*dst.get_pixel(15, 15), WHITE);
    }
}
