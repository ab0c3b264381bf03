//! Paw Note Core Library
//!
//! Platform-agnostic drawing engine and diary data model for Paw Note: the
//! raster surface, sticker layer, snapshot history and interaction router,
//! plus entries, calendar, statistics and storage.

pub mod book;
pub mod calendar;
pub mod cat;
pub mod codec;
pub mod entry;
pub mod export;
pub mod frame;
pub mod history;
pub mod input;
pub mod lock;
pub mod notice;
pub mod paint;
pub mod raster;
pub mod router;
pub mod settings;
pub mod stats;
pub mod sticker;
pub mod storage;
pub mod surface;
pub mod viewport;

pub use book::DiaryBook;
pub use calendar::{CalendarCell, CalendarMonth};
pub use cat::{CatGallery, CatPart, CatProfile};
pub use codec::{FrameError, FrameResult, ImageFormat};
pub use entry::{DiaryEntry, Mood, Weather};
pub use frame::Frame;
pub use history::{History, HistoryError, MAX_HISTORY};
pub use input::{PointerEvent, RawPointerEvent};
pub use lock::{LockError, PinLock};
pub use notice::Notice;
pub use paint::{Color, PaintConfig};
pub use router::{GestureState, InteractionRouter, Mode, RouterContext, RouterOutcome};
pub use settings::Theme;
pub use stats::{MoodStats, StatsPeriod};
pub use sticker::{Sticker, StickerContent, StickerLayer, StickerMetrics};
pub use storage::{BoxFuture, KeyValueStore, StorageError, StorageResult};
pub use surface::Surface;
pub use viewport::Viewport;
