//! Editor: owns the drawing state and turns gestures into history frames.

use crate::config::AppConfig;
use image::RgbaImage;
use kurbo::Rect;
use pawnote_core::codec::{self, FrameError, FrameResult};
use pawnote_core::frame::Frame;
use pawnote_core::history::History;
use pawnote_core::input::{self, PointerEvent, RawPointerEvent};
use pawnote_core::notice::Notice;
use pawnote_core::paint::PaintConfig;
use pawnote_core::raster;
use pawnote_core::router::{InteractionRouter, Mode, RouterContext, RouterOutcome};
use pawnote_core::sticker::{StickerContent, StickerLayer, StickerMetrics};
use pawnote_core::storage::BoxFuture;
use pawnote_core::surface::Surface;
use pawnote_core::viewport::Viewport;
use pawnote_render::{Compositor, RenderError};
use std::sync::Arc;
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Notice(#[from] Notice),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}

impl EditorError {
    /// The user notice, if this error is one.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            EditorError::Notice(notice) => Some(*notice),
            _ => None,
        }
    }
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// A surface restore whose decode has not run yet.
///
/// Await [`PendingRestore::finish`] and hand the result to
/// [`Editor::apply_restore`].
pub struct PendingRestore {
    generation: u64,
    decode: BoxFuture<'static, FrameResult<RgbaImage>>,
}

impl PendingRestore {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn finish(self) -> DecodedRestore {
        DecodedRestore {
            generation: self.generation,
            image: self.decode.await,
        }
    }
}

/// A finished restore decode, ready to apply.
pub struct DecodedRestore {
    generation: u64,
    image: FrameResult<RgbaImage>,
}

/// A composited frame taken for saving, not yet recorded in history.
pub struct EntrySnapshot {
    display: RgbaImage,
    frame: Frame,
    blank: bool,
}

impl EntrySnapshot {
    /// Whether the frame is all white.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The frame as an entry drawing; `None` when blank.
    pub fn into_drawing(self) -> Option<Frame> {
        (!self.blank).then_some(self.frame)
    }
}

/// Drawing surface, stickers and history wired to the pointer router.
pub struct Editor {
    surface: Surface,
    stickers: StickerLayer,
    history: History<Frame>,
    router: InteractionRouter,
    compositor: Compositor,
    paint: PaintConfig,
    template: Option<StickerContent>,
    /// Last composited frame.
    display: RgbaImage,
    visible: bool,
    /// Viewport received while hidden, applied when shown again.
    deferred_viewport: Option<Viewport>,
    /// Bumped by every restore or reset; stale decodes are dropped.
    generation: u64,
}

impl Editor {
    /// Create an editor with a blank surface as its only history frame.
    pub fn new(
        viewport: Viewport,
        metrics: StickerMetrics,
        history_capacity: usize,
        compositor: Compositor,
    ) -> EditorResult<Self> {
        let surface = Surface::new(viewport);
        let stickers = StickerLayer::new(metrics);
        let (display, frame) = compositor.render_and_capture(&surface, &stickers)?;
        let mut history = History::new(history_capacity);
        history.reset(frame);

        Ok(Self {
            surface,
            stickers,
            history,
            router: InteractionRouter::default(),
            compositor,
            paint: PaintConfig::default(),
            template: None,
            display,
            visible: true,
            deferred_viewport: None,
            generation: 0,
        })
    }

    pub fn from_config(config: &AppConfig) -> EditorResult<Self> {
        let compositor = Compositor::new(config.glyphs()?);
        let mut editor = Self::new(
            config.viewport(),
            config.stickers,
            config.history_capacity,
            compositor,
        )?;
        editor.paint = config.paint();
        Ok(editor)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn stickers(&self) -> &StickerLayer {
        &self.stickers
    }

    pub fn history(&self) -> &History<Frame> {
        &self.history
    }

    pub fn viewport(&self) -> Viewport {
        self.surface.viewport()
    }

    /// The last composited frame.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn mode(&self) -> Mode {
        self.router.mode()
    }

    pub fn paint(&self) -> PaintConfig {
        self.paint
    }

    /// Paint used by the next stroke. A stroke in progress keeps its own.
    pub fn set_paint(&mut self, paint: PaintConfig) {
        self.paint = paint;
    }

    pub fn template(&self) -> Option<&StickerContent> {
        self.template.as_ref()
    }

    pub fn set_glyph_template(&mut self, glyph: impl Into<String>) {
        self.template = Some(StickerContent::Glyph(glyph.into()));
    }

    /// Decode uploaded or dropped bytes into the pending sticker template.
    ///
    /// Bytes that are not an image are rejected before any decode work.
    pub async fn load_image_template(&mut self, bytes: Vec<u8>) -> EditorResult<()> {
        let decode = codec::decode_image_deferred(bytes).map_err(|_| Notice::NotAnImage)?;
        let image = decode.await.map_err(|e| {
            log::error!("Sticker image decode failed: {e}");
            Notice::NotAnImage
        })?;
        log::debug!("Sticker template {}x{}", image.width(), image.height());
        self.template = Some(StickerContent::Image(Arc::new(image)));
        Ok(())
    }

    pub fn clear_template(&mut self) {
        self.template = None;
    }

    fn context(&mut self) -> RouterContext<'_> {
        RouterContext {
            surface: &mut self.surface,
            stickers: &mut self.stickers,
            paint: self.paint,
            template: self.template.as_ref(),
        }
    }

    fn apply_outcome(&mut self, outcome: RouterOutcome) -> EditorResult<RouterOutcome> {
        match outcome {
            RouterOutcome::None => {}
            RouterOutcome::Redraw => self.redraw(),
            RouterOutcome::Commit => self.commit()?,
        }
        Ok(outcome)
    }

    /// Switch between drawing and sticker placement.
    pub fn set_mode(&mut self, mode: Mode) -> EditorResult<RouterOutcome> {
        let mut router = std::mem::take(&mut self.router);
        let outcome = router.set_mode(mode, self.context());
        self.router = router;
        self.apply_outcome(outcome)
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> EditorResult<RouterOutcome> {
        let mut router = std::mem::take(&mut self.router);
        let outcome = router.handle(event, self.context());
        self.router = router;
        self.apply_outcome(outcome)
    }

    /// Normalize a mouse or touch event against the host rect, then handle it.
    pub fn handle_raw_pointer(
        &mut self,
        event: &RawPointerEvent,
        host: Rect,
    ) -> EditorResult<RouterOutcome> {
        match input::normalize(event, host) {
            Some(event) => self.handle_pointer(&event),
            None => Ok(RouterOutcome::None),
        }
    }

    /// Recomposite without recording history.
    pub fn redraw(&mut self) {
        self.display = self.compositor.compose(&self.surface, &self.stickers);
    }

    /// Composite and push the result onto the history.
    pub fn commit(&mut self) -> EditorResult<()> {
        let (display, frame) = self
            .compositor
            .render_and_capture(&self.surface, &self.stickers)?;
        self.display = display;
        self.history.commit(frame);
        Ok(())
    }

    /// Start restoring `frame`: stickers go now, pixels once decoded.
    fn begin_restore(&mut self, frame: &Frame) -> PendingRestore {
        self.stickers.clear_all();
        self.router.reset();
        self.generation += 1;
        log::debug!("Restore #{} pending", self.generation);
        PendingRestore {
            generation: self.generation,
            decode: frame.decode_deferred(),
        }
    }

    pub fn undo(&mut self) -> EditorResult<PendingRestore> {
        let frame = self.history.undo().map_err(Notice::from)?.clone();
        Ok(self.begin_restore(&frame))
    }

    pub fn redo(&mut self) -> EditorResult<PendingRestore> {
        let frame = self.history.redo().map_err(Notice::from)?.clone();
        Ok(self.begin_restore(&frame))
    }

    /// Paint a decoded restore onto the surface.
    ///
    /// Returns `false` if a newer restore or reset superseded it, or if the
    /// decode failed; the surface is left untouched in both cases.
    pub fn apply_restore(&mut self, restore: DecodedRestore) -> bool {
        if restore.generation != self.generation {
            log::debug!(
                "Dropping stale restore #{} (current #{})",
                restore.generation,
                self.generation
            );
            return false;
        }
        match restore.image {
            Ok(image) => {
                self.surface.replace_with(&image);
                self.redraw();
                true
            }
            Err(e) => {
                log::error!("Failed to restore frame: {e}");
                false
            }
        }
    }

    /// Track a new host size or pixel ratio.
    ///
    /// Ignored for a zero-area viewport and deferred while hidden. Otherwise the
    /// surface is reallocated and the current history frame is redrawn into it
    /// through the restore path, which drops the stickers baked into it.
    pub fn resize(&mut self, viewport: Viewport) -> Option<PendingRestore> {
        if viewport.is_empty() {
            return None;
        }
        if !self.visible {
            self.deferred_viewport = Some(viewport);
            return None;
        }
        if !self.surface.resize(viewport) {
            return None;
        }
        let pending = self
            .history
            .current()
            .cloned()
            .map(|frame| self.begin_restore(&frame));
        self.redraw();
        pending
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the editor. Showing it applies any deferred resize.
    pub fn set_visible(&mut self, visible: bool) -> Option<PendingRestore> {
        self.visible = visible;
        if !visible {
            return None;
        }
        let viewport = self.deferred_viewport.take()?;
        self.resize(viewport)
    }

    /// Remove the selected sticker and commit.
    pub fn delete_active_sticker(&mut self) -> EditorResult<()> {
        if self.stickers.delete_active().is_none() {
            return Err(Notice::NoStickerSelected.into());
        }
        self.commit()
    }

    /// Wipe the surface and stickers, then commit.
    pub fn clear(&mut self) -> EditorResult<()> {
        self.router.reset();
        self.surface.clear();
        self.stickers.clear_all();
        self.commit()
    }

    /// Composite and encode the current state without touching history.
    pub fn entry_snapshot(&self) -> EditorResult<EntrySnapshot> {
        let (display, frame) = self
            .compositor
            .render_and_capture(&self.surface, &self.stickers)?;
        let blank = raster::is_blank(&display);
        Ok(EntrySnapshot {
            display,
            frame,
            blank,
        })
    }

    /// Make `snapshot` the displayed frame, committing it unless it already
    /// sits at the history cursor.
    pub fn record_snapshot(&mut self, snapshot: &EntrySnapshot) {
        if self.history.current() != Some(&snapshot.frame) {
            self.history.commit(snapshot.frame.clone());
        }
        self.display = snapshot.display.clone();
    }

    /// Record the current state and return it as an entry drawing.
    ///
    /// An all-white frame is `None`.
    pub fn capture_for_entry(&mut self) -> EditorResult<Option<Frame>> {
        let snapshot = self.entry_snapshot()?;
        self.record_snapshot(&snapshot);
        Ok(snapshot.into_drawing())
    }

    /// The current frame as PNG bytes.
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        Ok(codec::encode_png(&self.display)?)
    }

    /// Start editing an entry's saved drawing.
    ///
    /// History restarts from `frame`; the surface is repainted once the
    /// returned restore is applied.
    pub fn load_frame(&mut self, frame: Frame) -> PendingRestore {
        self.surface.clear();
        let pending = self.begin_restore(&frame);
        self.history.reset(frame);
        pending
    }

    /// Start a fresh page: blank surface, no stickers, single-frame history.
    pub fn new_entry(&mut self) -> EditorResult<()> {
        self.router.reset();
        self.surface.clear();
        self.stickers.clear_all();
        // Invalidates any restore still in flight.
        self.generation += 1;
        let (display, frame) = self
            .compositor
            .render_and_capture(&self.surface, &self.stickers)?;
        self.display = display;
        self.history.reset(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use kurbo::Point;
    use pawnote_core::router::GestureState;
    use pollster::block_on;

    fn editor() -> Editor {
        Editor::from_config(&AppConfig {
            width: 200.0,
            height: 200.0,
            ..AppConfig::default()
        })
        .unwrap()
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn stroke(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
        editor.handle_pointer(&down(from.0, from.1)).unwrap();
        editor.handle_pointer(&moved(to.0, to.1)).unwrap();
        let outcome = editor.handle_pointer(&PointerEvent::Up).unwrap();
        assert_eq!(outcome, RouterOutcome::Commit);
    }

    fn finish(editor: &mut Editor, pending: PendingRestore) -> bool {
        let decoded = block_on(pending.finish());
        editor.apply_restore(decoded)
    }

    #[test]
    fn test_glyph_place_and_drag() {
        let mut editor = editor();
        editor.set_mode(Mode::Sticker).unwrap();
        editor.set_glyph_template("🐾");

        let placed = editor.handle_pointer(&down(100.0, 100.0)).unwrap();
        assert_eq!(placed, RouterOutcome::Commit);
        editor.handle_pointer(&PointerEvent::Up).unwrap();
        assert_eq!(editor.history().len(), 2);

        editor.handle_pointer(&down(100.0, 100.0)).unwrap();
        editor.handle_pointer(&moved(150.0, 120.0)).unwrap();
        assert_eq!(
            editor.handle_pointer(&PointerEvent::Leave).unwrap(),
            RouterOutcome::Commit
        );

        let bounds = editor.stickers().stickers()[0].bounds();
        assert_eq!((bounds.x0, bounds.y0), (130.0, 100.0));
        assert_eq!(editor.history().len(), 3);
    }

    #[test]
    fn test_undo_restores_pre_stroke_and_drops_stickers() {
        let mut editor = editor();
        let before = editor.surface().pixels().clone();

        stroke(&mut editor, (20.0, 20.0), (120.0, 120.0));
        assert_ne!(editor.surface().pixels(), &before);

        editor.set_mode(Mode::Sticker).unwrap();
        editor.set_glyph_template("★");
        editor.handle_pointer(&down(50.0, 150.0)).unwrap();
        editor.handle_pointer(&PointerEvent::Up).unwrap();
        editor.undo().unwrap();

        let pending = editor.undo().unwrap();
        assert!(editor.stickers().is_empty());
        assert!(finish(&mut editor, pending));
        assert_eq!(editor.surface().pixels(), &before);
        assert!(matches!(
            editor.undo().map(|_| ()),
            Err(EditorError::Notice(Notice::NothingToUndo))
        ));
    }

    #[test]
    fn test_undo_keeps_baked_sticker_pixels() {
        let mut editor = editor();
        let red = Rgba([255, 0, 0, 255]);
        let png = codec::encode_png(&RgbaImage::from_pixel(2, 2, red)).unwrap();
        block_on(editor.load_image_template(png)).unwrap();
        editor.set_mode(Mode::Sticker).unwrap();
        editor.handle_pointer(&down(100.0, 100.0)).unwrap();
        editor.handle_pointer(&PointerEvent::Up).unwrap();

        editor.set_mode(Mode::Draw).unwrap();
        stroke(&mut editor, (20.0, 190.0), (180.0, 190.0));
        assert_eq!(editor.stickers().len(), 1);

        let pending = editor.undo().unwrap();
        assert!(editor.stickers().is_empty());
        assert!(finish(&mut editor, pending));
        assert_eq!(*editor.surface().pixels().get_pixel(100, 100), red);
        assert_eq!(
            *editor.surface().pixels().get_pixel(100, 190),
            Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_stale_restore_is_dropped() {
        let mut editor = editor();
        stroke(&mut editor, (20.0, 20.0), (120.0, 120.0));
        let drawn = editor.surface().pixels().clone();

        let undo = editor.undo().unwrap();
        let redo = editor.redo().unwrap();
        let undo = block_on(undo.finish());
        let redo = block_on(redo.finish());

        assert!(!editor.apply_restore(undo));
        assert!(editor.apply_restore(redo));
        assert_eq!(editor.surface().pixels(), &drawn);
    }

    #[test]
    fn test_redo_past_tail_is_notice() {
        let mut editor = editor();
        let err = editor.redo().map(|_| ()).unwrap_err();
        assert_eq!(err.notice(), Some(Notice::NothingToRedo));
    }

    #[test]
    fn test_untouched_surface_captures_none() {
        let mut editor = editor();
        assert_eq!(editor.capture_for_entry().unwrap(), None);

        stroke(&mut editor, (10.0, 10.0), (60.0, 10.0));
        assert!(editor.capture_for_entry().unwrap().is_some());
        assert!(editor.capture_for_entry().unwrap().is_some());
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_delete_without_selection() {
        let mut editor = editor();
        let err = editor.delete_active_sticker().unwrap_err();
        assert_eq!(err.notice(), Some(Notice::NoStickerSelected));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_delete_selected_sticker_commits() {
        let mut editor = editor();
        editor.set_mode(Mode::Sticker).unwrap();
        editor.set_glyph_template("★");
        editor.handle_pointer(&down(100.0, 100.0)).unwrap();
        editor.handle_pointer(&PointerEvent::Up).unwrap();

        editor.delete_active_sticker().unwrap();
        assert!(editor.stickers().is_empty());
        assert_eq!(editor.history().len(), 3);
        assert!(raster::is_blank(editor.display()));
    }

    #[test]
    fn test_mode_switch_ends_stroke() {
        let mut editor = editor();
        editor.handle_pointer(&down(10.0, 10.0)).unwrap();
        editor.handle_pointer(&moved(80.0, 80.0)).unwrap();
        assert_eq!(editor.set_mode(Mode::Sticker).unwrap(), RouterOutcome::Commit);
        assert_eq!(editor.mode(), Mode::Sticker);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_eraser_clears_to_transparent() {
        let mut editor = editor();
        editor.set_paint(PaintConfig::eraser(10.0));
        stroke(&mut editor, (10.0, 100.0), (190.0, 100.0));
        assert_eq!(*editor.surface().pixels().get_pixel(100, 100), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_resize_redraws_last_frame() {
        let mut editor = editor();
        stroke(&mut editor, (0.0, 0.0), (200.0, 200.0));

        let pending = editor.resize(Viewport::new(100.0, 100.0, 1.0)).unwrap();
        assert!(raster::is_blank(editor.surface().pixels()));
        assert!(finish(&mut editor, pending));
        assert_eq!(editor.surface().width(), 100);
        assert!(!editor.surface().is_blank());

        assert!(editor.resize(Viewport::new(0.0, 100.0, 1.0)).is_none());
        assert_eq!(editor.surface().width(), 100);
    }

    #[test]
    fn test_resize_deferred_while_hidden() {
        let mut editor = editor();
        assert!(editor.set_visible(false).is_none());
        assert!(editor.resize(Viewport::new(300.0, 300.0, 1.0)).is_none());
        assert_eq!(editor.surface().width(), 200);

        let pending = editor.set_visible(true).unwrap();
        assert!(finish(&mut editor, pending));
        assert_eq!(editor.surface().width(), 300);
    }

    #[test]
    fn test_image_template_rejects_non_image() {
        let mut editor = editor();
        let err = block_on(editor.load_image_template(b"hello".to_vec())).unwrap_err();
        assert_eq!(err.notice(), Some(Notice::NotAnImage));
        assert!(editor.template().is_none());

        let png = codec::encode_png(&RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))).unwrap();
        block_on(editor.load_image_template(png)).unwrap();
        assert!(matches!(editor.template(), Some(StickerContent::Image(_))));
    }

    #[test]
    fn test_load_frame_then_new_entry() {
        let mut editor = editor();
        stroke(&mut editor, (10.0, 10.0), (150.0, 150.0));
        let saved = editor.capture_for_entry().unwrap().unwrap();

        editor.new_entry().unwrap();
        assert!(editor.surface().is_blank());
        assert_eq!(editor.history().len(), 1);

        let pending = editor.load_frame(saved);
        assert_eq!(editor.history().len(), 1);
        assert!(finish(&mut editor, pending));
        assert!(!editor.surface().is_blank());
        assert_eq!(editor.router.state(), GestureState::Idle);
    }
}
