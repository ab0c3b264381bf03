//! Diary application: the editor plus entry persistence and export.

use crate::config::AppConfig;
use crate::editor::{Editor, EditorError, PendingRestore};
use chrono::NaiveDate;
use pawnote_core::book::DiaryBook;
use pawnote_core::entry::{DATE_FORMAT, DiaryEntry, Mood, Weather};
use pawnote_core::export;
use pawnote_core::lock::LockError;
use pawnote_core::notice::Notice;
use pawnote_core::storage::{KeyValueStore, StorageError};
use pawnote_render::RenderError;
use std::sync::Arc;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Notice(#[from] Notice),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Frame error: {0}")]
    Frame(#[from] pawnote_core::codec::FrameError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Session(#[from] crate::session::SessionError),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<LockError> for AppError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Notice(notice) => AppError::Notice(notice),
            LockError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl AppError {
    /// The user notice, if this error is one.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AppError::Notice(notice) => Some(*notice),
            AppError::Editor(e) => e.notice(),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Entry fields filled in next to the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub content: String,
    pub mood: Mood,
    pub weather: Weather,
}

/// The diary page: one editor and the entry book it saves into.
pub struct App<S: KeyValueStore + ?Sized> {
    config: AppConfig,
    editor: Editor,
    book: DiaryBook<S>,
}

impl<S: KeyValueStore + ?Sized> App<S> {
    pub fn new(config: AppConfig, store: Arc<S>) -> AppResult<Self> {
        let editor = Editor::from_config(&config)?;
        Ok(Self {
            config,
            editor,
            book: DiaryBook::new(store),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn book(&self) -> &DiaryBook<S> {
        &self.book
    }

    /// Save the draft and current drawing under `date`, replacing any entry
    /// already stored for that date. Returns `true` on replacement.
    ///
    /// An untouched canvas is stored as no drawing; a draft with neither text
    /// nor drawing is refused and leaves history alone. Otherwise the drawing
    /// is committed to history unless it already sits at the cursor.
    pub async fn save_entry(&mut self, date: NaiveDate, draft: EntryDraft) -> AppResult<bool> {
        let snapshot = self.editor.entry_snapshot()?;
        if draft.content.trim().is_empty() && snapshot.is_blank() {
            return Err(Notice::EmptyEntry.into());
        }
        self.editor.record_snapshot(&snapshot);
        let frame = snapshot.into_drawing();
        let entry = DiaryEntry {
            date,
            content: draft.content,
            mood: draft.mood,
            weather: draft.weather,
            frame,
        };
        Ok(self.book.save(entry).await?)
    }

    /// Open the entry for `date` in the editor.
    ///
    /// Without a saved drawing the editor starts blank. Returns `None` when no
    /// entry exists for the date; the editor is left as is.
    pub async fn load_entry(
        &mut self,
        date: NaiveDate,
    ) -> AppResult<Option<(DiaryEntry, Option<PendingRestore>)>> {
        let Some(entry) = self.book.get(date).await? else {
            return Ok(None);
        };
        let restore = match &entry.frame {
            Some(frame) => Some(self.editor.load_frame(frame.clone())),
            None => {
                self.editor.new_entry()?;
                None
            }
        };
        log::info!("Loaded entry {}", entry.date_text());
        Ok(Some((entry, restore)))
    }

    /// Load an entry and wait for its drawing to be painted.
    pub async fn open_entry(&mut self, date: NaiveDate) -> AppResult<Option<DiaryEntry>> {
        let Some((entry, restore)) = self.load_entry(date).await? else {
            return Ok(None);
        };
        if let Some(pending) = restore {
            let decoded = pending.finish().await;
            self.editor.apply_restore(decoded);
        }
        Ok(Some(entry))
    }

    /// Clear the editor for a new entry.
    pub fn new_entry(&mut self) -> AppResult<()> {
        Ok(self.editor.new_entry()?)
    }

    /// The current frame as a PNG, with its download file name.
    pub fn export_png(&self, date: Option<NaiveDate>) -> AppResult<(String, Vec<u8>)> {
        let date = date.map(|d| d.format(DATE_FORMAT).to_string());
        let name = export::png_file_name(date.as_deref());
        let bytes = self.editor.export_png()?;
        log::info!("Exported {name}");
        Ok((name, bytes))
    }

    /// The stored drawing of the entry for `date`, as image bytes.
    pub async fn export_entry_drawing(&self, date: NaiveDate) -> AppResult<(String, Vec<u8>)> {
        let frame = self
            .book
            .get(date)
            .await?
            .and_then(|entry| entry.frame)
            .ok_or(Notice::NoDrawing)?;
        let name = export::png_file_name(Some(&date.format(DATE_FORMAT).to_string()));
        Ok((name, frame.image_bytes()?))
    }

    /// Text backup of every entry, oldest first.
    pub async fn export_txt(&self) -> AppResult<String> {
        let entries = self.book.load_all().await?;
        let text = export::text_backup(&entries)?;
        log::info!("Exported {} entries as text", entries.len());
        Ok(text)
    }
}
