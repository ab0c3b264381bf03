//! Paw Note Application
//!
//! The diary editor shell: wires the drawing engine to history, entry
//! storage and export, and drives it headlessly from the command line.

mod app;
pub mod config;
pub mod editor;
pub mod session;

#[cfg(feature = "native")]
pub mod cli;

pub use app::{App, AppError, AppResult, EntryDraft};
pub use config::{AppConfig, ConfigError};
pub use editor::{
    DecodedRestore, Editor, EditorError, EditorResult, EntrySnapshot, PendingRestore,
};
pub use session::{Action, Session, SessionError};
