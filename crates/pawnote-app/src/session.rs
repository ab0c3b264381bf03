//! Scripted editor sessions, replayed headlessly by the CLI.
//!
//! A session is a JSON document listing editor actions in order:
//!
//! ```json
//! {
//!   "actions": [
//!     { "action": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 10 } } },
//!     { "action": "pointer", "event": { "kind": "move", "position": { "x": 90, "y": 40 } } },
//!     { "action": "pointer", "event": { "kind": "up" } },
//!     { "action": "mode", "mode": "sticker" },
//!     { "action": "glyph", "glyph": "🐾" },
//!     { "action": "pointer", "event": { "kind": "down", "position": { "x": 60, "y": 60 } } },
//!     { "action": "undo" }
//!   ]
//! }
//! ```

use crate::editor::{Editor, EditorError, PendingRestore};
use kurbo::Rect;
use pawnote_core::input::{PointerEvent, RawPointerEvent};
use pawnote_core::notice::Notice;
use pawnote_core::paint::{Color, PaintConfig};
use pawnote_core::router::Mode;
use pawnote_core::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Invalid session: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// One editor action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Pointer { event: PointerEvent },
    /// Mouse or touch input in client coordinates, relative to `host`.
    Raw { event: RawPointerEvent, host: Rect },
    Mode { mode: Mode },
    Color { color: Color },
    BrushWidth { width: f64 },
    Eraser { enabled: bool },
    Glyph { glyph: String },
    /// Image file used as the sticker template; relative to the session file.
    Image { path: PathBuf },
    ClearTemplate,
    Undo,
    Redo,
    DeleteSticker,
    Clear,
    Resize { viewport: Viewport },
    Visible { visible: bool },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub actions: Vec<Action>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path).map_err(|e| SessionError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Apply every action to `editor`, resolving restores as they come.
    ///
    /// Notices do not stop the replay; they are logged and returned in order.
    pub async fn replay(
        &self,
        editor: &mut Editor,
        base_dir: &Path,
    ) -> Result<Vec<Notice>, SessionError> {
        let mut notices = Vec::new();
        for (index, action) in self.actions.iter().enumerate() {
            log::debug!("Action {index}: {action:?}");
            match apply(action, editor, base_dir).await {
                Ok(Some(pending)) => {
                    let decoded = pending.finish().await;
                    editor.apply_restore(decoded);
                }
                Ok(None) => {}
                Err(EditorError::Notice(notice)) => {
                    log::warn!("Action {index}: {notice}");
                    notices.push(notice);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(notices)
    }
}

async fn apply(
    action: &Action,
    editor: &mut Editor,
    base_dir: &Path,
) -> Result<Option<PendingRestore>, EditorError> {
    match action {
        Action::Pointer { event } => {
            editor.handle_pointer(event)?;
        }
        Action::Raw { event, host } => {
            editor.handle_raw_pointer(event, *host)?;
        }
        Action::Mode { mode } => {
            editor.set_mode(*mode)?;
        }
        Action::Color { color } => editor.set_paint(PaintConfig {
            color: *color,
            ..editor.paint()
        }),
        Action::BrushWidth { width } => editor.set_paint(PaintConfig {
            width: *width,
            ..editor.paint()
        }),
        Action::Eraser { enabled } => editor.set_paint(PaintConfig {
            erase: *enabled,
            ..editor.paint()
        }),
        Action::Glyph { glyph } => editor.set_glyph_template(glyph.as_str()),
        Action::Image { path } => {
            let path = base_dir.join(path);
            let bytes = std::fs::read(&path).map_err(|e| {
                log::error!("Failed to read {}: {}", path.display(), e);
                Notice::NotAnImage
            })?;
            editor.load_image_template(bytes).await?;
        }
        Action::ClearTemplate => editor.clear_template(),
        Action::Undo => return editor.undo().map(Some),
        Action::Redo => return editor.redo().map(Some),
        Action::DeleteSticker => editor.delete_active_sticker()?,
        Action::Clear => editor.clear()?,
        Action::Resize { viewport } => return Ok(editor.resize(*viewport)),
        Action::Visible { visible } => return Ok(editor.set_visible(*visible)),
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use pawnote_core::codec;
    use pollster::block_on;

    fn editor() -> Editor {
        Editor::from_config(&AppConfig {
            width: 100.0,
            height: 100.0,
            ..AppConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_replay_stroke_and_sticker() {
        let json = r#"{"actions": [
            {"action": "brush_width", "width": 8},
            {"action": "pointer", "event": {"kind": "down", "position": {"x": 10, "y": 10}}},
            {"action": "pointer", "event": {"kind": "move", "position": {"x": 90, "y": 40}}},
            {"action": "pointer", "event": {"kind": "up"}},
            {"action": "mode", "mode": "sticker"},
            {"action": "glyph", "glyph": "*"},
            {"action": "pointer", "event": {"kind": "down", "position": {"x": 60, "y": 60}}},
            {"action": "pointer", "event": {"kind": "up"}}
        ]}"#;
        let session = Session::from_json(json).unwrap();
        let mut editor = editor();
        let notices = block_on(session.replay(&mut editor, Path::new("."))).unwrap();

        assert!(notices.is_empty());
        assert_eq!(editor.paint().width, 8.0);
        assert_eq!(editor.stickers().len(), 1);
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn test_replay_collects_notices() {
        let json = r#"{"actions": [
            {"action": "undo"},
            {"action": "delete_sticker"},
            {"action": "redo"}
        ]}"#;
        let session = Session::from_json(json).unwrap();
        let notices = block_on(session.replay(&mut editor(), Path::new("."))).unwrap();
        assert_eq!(
            notices,
            vec![Notice::NothingToUndo, Notice::NoStickerSelected, Notice::NothingToRedo]
        );
    }

    #[test]
    fn test_replay_undo_applies_restore() {
        let json = r#"{"actions": [
            {"action": "pointer", "event": {"kind": "down", "position": {"x": 0, "y": 50}}},
            {"action": "pointer", "event": {"kind": "move", "position": {"x": 100, "y": 50}}},
            {"action": "pointer", "event": {"kind": "leave"}},
            {"action": "undo"}
        ]}"#;
        let session = Session::from_json(json).unwrap();
        let mut editor = editor();
        block_on(session.replay(&mut editor, Path::new("."))).unwrap();
        assert!(editor.surface().is_blank());
    }

    #[test]
    fn test_replay_image_template_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let png = codec::encode_png(&image::RgbaImage::from_pixel(
            3,
            3,
            image::Rgba([0, 128, 0, 255]),
        ))
        .unwrap();
        std::fs::write(dir.path().join("leaf.png"), png).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let json = r#"{"actions": [
            {"action": "image", "path": "notes.txt"},
            {"action": "image", "path": "leaf.png"},
            {"action": "mode", "mode": "sticker"},
            {"action": "pointer", "event": {"kind": "down", "position": {"x": 50, "y": 50}}}
        ]}"#;
        let session = Session::from_json(json).unwrap();
        let mut editor = editor();
        let notices = block_on(session.replay(&mut editor, dir.path())).unwrap();
        assert_eq!(notices, vec![Notice::NotAnImage]);
        assert_eq!(editor.stickers().len(), 1);
    }

    #[test]
    fn test_replay_raw_touch_relative_to_host() {
        let host = r#"{"x0": 100, "y0": 50, "x1": 200, "y1": 150}"#;
        let json = format!(
            r#"{{"actions": [
                {{"action": "mode", "mode": "sticker"}},
                {{"action": "glyph", "glyph": "*"}},
                {{"action": "raw", "host": {host}, "event": {{"source": "touch", "phase": "start", "touches": [{{"x": 150, "y": 100}}, {{"x": 0, "y": 0}}]}}}},
                {{"action": "raw", "host": {host}, "event": {{"source": "mouse", "phase": "end", "client": {{"x": 0, "y": 0}}}}}}
            ]}}"#
        );
        let session = Session::from_json(&json).unwrap();
        let mut editor = editor();
        block_on(session.replay(&mut editor, Path::new("."))).unwrap();

        let bounds = editor.stickers().stickers()[0].bounds();
        assert_eq!(bounds.center(), kurbo::Point::new(50.0, 50.0));
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(matches!(
            Session::from_json(r#"{"actions": [{"action": "teleport"}]}"#),
            Err(SessionError::Parse(_))
        ));
    }
}
