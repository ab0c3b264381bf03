//! Pointer input normalization for mouse and touch events.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Pointer event in surface-local logical coordinates.
///
/// Mouse and touch input are both reduced to this type before reaching the
/// router. Leaving the surface is its own variant but is routed like `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up,
    Leave,
}

impl PointerEvent {
    /// The pointer position, if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { position } | Self::Move { position } => Some(*position),
            Self::Up | Self::Leave => None,
        }
    }

    /// True for events that end a gesture.
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Up | Self::Leave)
    }
}

/// Phase of a raw host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Leave,
}

/// Host event before normalization, in client (window) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawPointerEvent {
    Mouse { phase: PointerPhase, client: Point },
    Touch { phase: PointerPhase, touches: Vec<Point> },
}

/// Normalize a raw event against the host element's client rect.
///
/// Touch events use their first touch point only. A touch start or move with
/// no touch points yields `None`.
pub fn normalize(raw: &RawPointerEvent, host: Rect) -> Option<PointerEvent> {
    let (phase, client) = match raw {
        RawPointerEvent::Mouse { phase, client } => (*phase, Some(*client)),
        RawPointerEvent::Touch { phase, touches } => (*phase, touches.first().copied()),
    };
    let local = client.map(|p| Point::new(p.x - host.x0, p.y - host.y0));

    match phase {
        PointerPhase::Start => local.map(|position| PointerEvent::Down { position }),
        PointerPhase::Move => local.map(|position| PointerEvent::Move { position }),
        PointerPhase::End => Some(PointerEvent::Up),
        PointerPhase::Leave => Some(PointerEvent::Leave),
    }
}
