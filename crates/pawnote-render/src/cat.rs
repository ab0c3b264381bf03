//! Layered cat avatar rendering.

use crate::{RenderError, RenderResult};
use image::RgbaImage;
use pawnote_core::cat::{CatPart, CatProfile};
use pawnote_core::{codec, raster};
use std::path::{Path, PathBuf};

/// Asset file for a part value: `<dir>/<value>.png`.
pub fn asset_path(asset_dir: &Path, value: &str) -> PathBuf {
    asset_dir.join(format!("{value}.png"))
}

/// Decode every chosen layer of `profile`, back to front.
pub fn load_layers(
    profile: &CatProfile,
    asset_dir: &Path,
) -> RenderResult<Vec<(CatPart, RgbaImage)>> {
    profile
        .layers()
        .map(|(part, value)| {
            let path = asset_path(asset_dir, value);
            let bytes = std::fs::read(&path).map_err(|e| {
                RenderError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Ok((part, codec::decode_image(&bytes)?))
        })
        .collect()
}

/// Stack layers onto a transparent canvas, each stretched to the full size.
pub fn compose_layers<'a>(
    layers: impl IntoIterator<Item = &'a RgbaImage>,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    let bounds = kurbo::Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    for layer in layers {
        raster::draw_image(&mut canvas, layer, bounds);
    }
    canvas
}

/// Load and stack the avatar for `profile`.
pub fn render_cat(
    profile: &CatProfile,
    asset_dir: &Path,
    width: u32,
    height: u32,
) -> RenderResult<RgbaImage> {
    let layers = load_layers(profile, asset_dir)?;
    log::debug!("Rendering cat with {} layers", layers.len());
    Ok(compose_layers(layers.iter().map(|(_, image)| image), width, height))
}
