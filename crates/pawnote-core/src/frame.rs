//! Flattened frames stored in history and in diary entries.

use crate::codec::{self, FrameError, FrameResult, ImageFormat};
use crate::storage::BoxFuture;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// A flattened image encoded as a `data:image/...;base64,` URL.
///
/// Frames produced by the compositor are always PNG. Frames loaded from
/// stored entries may carry any supported image format.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame(String);

impl Frame {
    /// Encode pixels as a PNG data URL.
    pub fn encode(image: &RgbaImage) -> FrameResult<Self> {
        let png = codec::encode_png(image)?;
        Ok(Self(codec::to_data_url(ImageFormat::Png.mime_type(), &png)))
    }

    /// Wrap an existing data URL after checking it names an image type.
    pub fn from_data_url(url: impl Into<String>) -> FrameResult<Self> {
        let url = url.into();
        if !url.starts_with("data:image/") || !url.contains(";base64,") {
            return Err(FrameError::InvalidDataUrl);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The raw encoded image bytes.
    pub fn image_bytes(&self) -> FrameResult<Vec<u8>> {
        codec::parse_data_url(&self.0).map(|(_, bytes)| bytes)
    }

    /// Pixel dimensions, read from the image header without a full decode.
    pub fn dimensions(&self) -> FrameResult<(u32, u32)> {
        let bytes = self.image_bytes()?;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| FrameError::Image(image::ImageError::IoError(e)))?;
        Ok(reader.into_dimensions()?)
    }

    /// Decode the frame synchronously.
    pub fn decode(&self) -> FrameResult<RgbaImage> {
        codec::decode_image(&self.image_bytes()?)
    }

    /// Decode the frame later, when the returned future is polled.
    pub fn decode_deferred(&self) -> BoxFuture<'static, FrameResult<RgbaImage>> {
        let frame = self.clone();
        Box::pin(async move { frame.decode() })
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(32).collect();
        write!(f, "Frame({head}... {} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_is_png_data_url() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]));
        let frame = Frame::encode(&image).unwrap();
        assert!(frame.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(frame.dimensions().unwrap(), (4, 3));
        assert_eq!(frame.decode().unwrap(), image);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let image = RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 4]));
        assert_eq!(Frame::encode(&image).unwrap(), Frame::encode(&image).unwrap());
    }

    #[test]
    fn test_from_data_url_validates() {
        assert!(Frame::from_data_url("data:text/plain;base64,YWJj").is_err());
        assert!(Frame::from_data_url("hello").is_err());
        assert!(Frame::from_data_url("data:image/png;base64,YWJj").is_ok());
    }

    #[test]
    fn test_deferred_decode() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let frame = Frame::encode(&image).unwrap();
        let decoded = pollster::block_on(frame.decode_deferred()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_serde_transparent() {
        let frame = Frame::from_data_url("data:image/png;base64,YWJj").unwrap();
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, "\"data:image/png;base64,YWJj\"");
    }
}
