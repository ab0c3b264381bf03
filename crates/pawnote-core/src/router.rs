//! Pointer-event state machine dispatching to drawing or sticker manipulation.

use crate::input::PointerEvent;
use crate::paint::PaintConfig;
use crate::sticker::{StickerContent, StickerLayer};
use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a pointer press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Paint strokes into the surface.
    #[default]
    Draw,
    /// Place, move and resize stickers.
    Sticker,
}

/// Gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
    DraggingSticker,
    ResizingSticker,
}

/// What the caller should do after an event was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterOutcome {
    /// Nothing visible changed.
    None,
    /// Recomposite the visible frame.
    Redraw,
    /// A discrete interaction ended: recomposite and push a history frame.
    Commit,
}

/// Everything the router mutates or reads while handling one event.
pub struct RouterContext<'a> {
    pub surface: &'a mut Surface,
    pub stickers: &'a mut StickerLayer,
    /// Paint settings applied when a stroke starts.
    pub paint: PaintConfig,
    /// Pending sticker template for placement.
    pub template: Option<&'a StickerContent>,
}

/// Routes pointer events according to the current mode and gesture.
#[derive(Debug, Clone, Default)]
pub struct InteractionRouter {
    mode: Mode,
    state: GestureState,
}

impl InteractionRouter {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            state: GestureState::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Switch mode, ending (and committing) any gesture in progress.
    pub fn set_mode(&mut self, mode: Mode, ctx: RouterContext<'_>) -> RouterOutcome {
        let outcome = self.finish(ctx);
        self.mode = mode;
        log::debug!("Interaction mode: {mode:?}");
        outcome
    }

    /// Drop any gesture without committing it.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn handle(&mut self, event: &PointerEvent, ctx: RouterContext<'_>) -> RouterOutcome {
        match *event {
            PointerEvent::Down { position } => self.pointer_down(position, ctx),
            PointerEvent::Move { position } => self.pointer_move(position, ctx),
            PointerEvent::Up | PointerEvent::Leave => self.finish(ctx),
        }
    }

    fn pointer_down(&mut self, position: Point, ctx: RouterContext<'_>) -> RouterOutcome {
        if self.state != GestureState::Idle {
            log::debug!("Ignoring pointer down during {:?}", self.state);
            return RouterOutcome::None;
        }

        match self.mode {
            Mode::Draw => {
                ctx.surface.begin_stroke(position, ctx.paint);
                self.state = GestureState::Drawing;
                RouterOutcome::None
            }
            Mode::Sticker => {
                let stickers = ctx.stickers;
                if stickers.hit_test_handle(position) {
                    if let Some(index) = stickers.active_index() {
                        stickers.begin_resize(index);
                        self.state = GestureState::ResizingSticker;
                        return RouterOutcome::Redraw;
                    }
                }
                if let Some(index) = stickers.hit_test(position) {
                    stickers.begin_drag(index, position);
                    self.state = GestureState::DraggingSticker;
                    return RouterOutcome::Redraw;
                }
                if stickers.place(position, ctx.template) {
                    RouterOutcome::Commit
                } else {
                    RouterOutcome::None
                }
            }
        }
    }

    fn pointer_move(&mut self, position: Point, ctx: RouterContext<'_>) -> RouterOutcome {
        let changed = match self.state {
            GestureState::Idle => false,
            GestureState::Drawing => ctx.surface.extend_stroke(position),
            GestureState::DraggingSticker => ctx.stickers.drag(position),
            GestureState::ResizingSticker => ctx.stickers.resize(position),
        };
        if changed {
            RouterOutcome::Redraw
        } else {
            RouterOutcome::None
        }
    }

    /// End the current gesture. Pointer-up and leaving the surface both land here.
    fn finish(&mut self, ctx: RouterContext<'_>) -> RouterOutcome {
        let state = std::mem::take(&mut self.state);
        match state {
            GestureState::Idle => RouterOutcome::None,
            GestureState::Drawing => {
                ctx.surface.end_stroke();
                RouterOutcome::Commit
            }
            GestureState::DraggingSticker | GestureState::ResizingSticker => RouterOutcome::Commit,
        }
    }
}
