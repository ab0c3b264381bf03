//! User-facing notices for empty states and rejected input.

use thiserror::Error;

use crate::history::HistoryError;

/// A condition reported to the user instead of mutating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Notice {
    #[error("Nothing to undo.")]
    NothingToUndo,
    #[error("Nothing to redo.")]
    NothingToRedo,
    #[error("Select a sticker to delete first.")]
    NoStickerSelected,
    #[error("There are no entries to export.")]
    NoEntriesToExport,
    #[error("Only image files can be used.")]
    NotAnImage,
    #[error("Write something or draw a picture before saving.")]
    EmptyEntry,
    #[error("There is no drawing to export.")]
    NoDrawing,
    #[error("Enter the PIN in both fields.")]
    PinMissing,
    #[error("The two PINs do not match.")]
    PinMismatch,
    #[error("Wrong PIN.")]
    WrongPin,
    #[error("No PIN has been set.")]
    NoPinSet,
}

impl From<HistoryError> for Notice {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NothingToUndo => Notice::NothingToUndo,
            HistoryError::NothingToRedo => Notice::NothingToRedo,
        }
    }
}
