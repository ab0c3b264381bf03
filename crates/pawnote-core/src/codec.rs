//! Image byte codecs: format sniffing, PNG encoding, and decoding.

use crate::storage::BoxFuture;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from encoding or decoding frames and uploaded images.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Invalid data URL")]
    InvalidDataUrl,
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Not a supported image")]
    UnsupportedImage,
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Result type for codec operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Encode RGBA pixels as PNG.
pub fn encode_png(image: &RgbaImage) -> FrameResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
    }
    Ok(png_data)
}

/// Decode PNG, JPEG or WebP bytes to RGBA.
pub fn decode_image(bytes: &[u8]) -> FrameResult<RgbaImage> {
    let format = ImageFormat::from_magic_bytes(bytes).ok_or(FrameError::UnsupportedImage)?;
    let image = image::load_from_memory_with_format(bytes, format.to_image_format())?;
    Ok(image.to_rgba8())
}

/// Check the bytes up front and defer the actual decode.
///
/// Bytes that are not a recognizable image are rejected immediately; the
/// returned future performs the (possibly slow) decode when polled.
pub fn decode_image_deferred(bytes: Vec<u8>) -> FrameResult<BoxFuture<'static, FrameResult<RgbaImage>>> {
    if ImageFormat::from_magic_bytes(&bytes).is_none() {
        return Err(FrameError::UnsupportedImage);
    }
    Ok(Box::pin(async move { decode_image(&bytes) }))
}

/// Build a `data:<mime>;base64,` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 data URL into its MIME type and payload bytes.
pub fn parse_data_url(url: &str) -> FrameResult<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:").ok_or(FrameError::InvalidDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(FrameError::InvalidDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(FrameError::InvalidDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"hello world"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
    }

    #[test]
    fn test_png_encode_decode() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        image.put_pixel(2, 1, Rgba([0, 0, 0, 0]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(ImageFormat::from_magic_bytes(&bytes), Some(ImageFormat::Png));
        assert_eq!(decode_image(&bytes).unwrap(), image);
    }

    #[test]
    fn test_non_image_rejected_up_front() {
        assert!(matches!(
            decode_image_deferred(b"not an image".to_vec()),
            Err(FrameError::UnsupportedImage)
        ));
    }

    #[test]
    fn test_deferred_decode_resolves() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let pending = decode_image_deferred(encode_png(&image).unwrap()).unwrap();
        assert_eq!(pollster::block_on(pending).unwrap(), image);
    }

    #[test]
    fn test_truncated_image_fails_late() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let mut bytes = encode_png(&image).unwrap();
        bytes.truncate(12);
        let pending = decode_image_deferred(bytes).unwrap();
        assert!(pollster::block_on(pending).is_err());
    }

    #[test]
    fn test_data_url() {
        let url = to_data_url("image/png", b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"abc");
        assert!(matches!(parse_data_url("image/png,abc"), Err(FrameError::InvalidDataUrl)));
        assert!(matches!(parse_data_url("data:image/png,abc"), Err(FrameError::InvalidDataUrl)));
    }
}
