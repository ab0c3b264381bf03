//! Application configuration.

use pawnote_core::history::MAX_HISTORY;
use pawnote_core::paint::{Color, DEFAULT_BRUSH_WIDTH, PaintConfig};
use pawnote_core::sticker::StickerMetrics;
use pawnote_core::viewport::Viewport;
use pawnote_render::{BlockGlyphs, FontGlyphs, GlyphRasterizer, RenderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application configuration.
///
/// Loaded from an optional JSON file. Missing fields take their defaults and
/// unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Canvas width in logical pixels.
    pub width: f64,
    /// Canvas height in logical pixels.
    pub height: f64,
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
    pub history_capacity: usize,
    pub stickers: StickerMetrics,
    pub brush_color: Color,
    pub brush_width: f64,
    /// Font used for glyph stickers. Without one, glyphs render as blocks.
    pub font_path: Option<PathBuf>,
    /// Where entries and settings are stored.
    pub data_dir: Option<PathBuf>,
    /// Directory holding the cat part images.
    pub cat_asset_dir: PathBuf,
    /// Edge length of rendered cat pictures.
    pub cat_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale_factor: 1.0,
            history_capacity: MAX_HISTORY,
            stickers: StickerMetrics::default(),
            brush_color: Color::black(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            font_path: None,
            data_dir: None,
            cat_asset_dir: PathBuf::from("images/cat"),
            cat_size: 300,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height, self.scale_factor)
    }

    pub fn paint(&self) -> PaintConfig {
        PaintConfig::new(self.brush_color, self.brush_width)
    }

    /// Glyph rasterizer for the configured font, else an installed system
    /// font, else the block fallback.
    pub fn glyphs(&self) -> Result<Box<dyn GlyphRasterizer>, RenderError> {
        if let Some(path) = &self.font_path {
            return Ok(Box::new(FontGlyphs::from_file(path)?));
        }
        match FontGlyphs::discover() {
            Some(glyphs) => Ok(Box::new(glyphs)),
            None => {
                log::warn!("No font configured or found; glyph stickers render as blocks");
                Ok(Box::new(BlockGlyphs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r##"{"width": 320, "brush_color": "#ff0000"}"##).unwrap();
        assert_eq!(config.width, 320.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.brush_color, Color::new(255, 0, 0, 255));
        assert_eq!(config.stickers.handle_size, 12.0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<AppConfig>(r#"{"grid_style": "lines"}"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pawnote.json");
        std::fs::write(&path, r#"{"scale_factor": 2.0}"#).unwrap();
        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.viewport().device_size(), (1600, 1200));

        let missing = AppConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_default_paint_and_glyphs() {
        let config = AppConfig::default();
        assert_eq!(config.paint(), PaintConfig::default());
        assert!(config.glyphs().is_ok());
    }

    #[test]
    fn test_missing_configured_font_is_error() {
        let config = AppConfig {
            font_path: Some(PathBuf::from("/nonexistent/paw.ttf")),
            ..AppConfig::default()
        };
        assert!(matches!(config.glyphs(), Err(RenderError::Io(_))));
    }
}
