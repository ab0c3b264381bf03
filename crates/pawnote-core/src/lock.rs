//! PIN gate in front of the diary.

use crate::notice::Notice;
use crate::storage::{KeyValueStore, PIN_KEY, StorageError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockError {
    #[error(transparent)]
    Notice(#[from] Notice),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Stores and checks the diary PIN.
pub struct PinLock<S: KeyValueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KeyValueStore + ?Sized> PinLock<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn is_set(&self) -> Result<bool, LockError> {
        Ok(self.store.get(PIN_KEY).await?.is_some())
    }

    /// Set a new PIN. Both fields must be non-empty and equal.
    pub async fn set(&self, pin: &str, confirm: &str) -> Result<(), LockError> {
        let (pin, confirm) = (pin.trim(), confirm.trim());
        if pin.is_empty() || confirm.is_empty() {
            return Err(Notice::PinMissing.into());
        }
        if pin != confirm {
            return Err(Notice::PinMismatch.into());
        }
        self.store.set(PIN_KEY, pin.to_string()).await?;
        log::info!("PIN set");
        Ok(())
    }

    /// Check `pin` against the stored PIN.
    pub async fn unlock(&self, pin: &str) -> Result<(), LockError> {
        let saved = self.store.get(PIN_KEY).await?.ok_or(Notice::NoPinSet)?;
        if saved != pin.trim() {
            log::warn!("Unlock attempt with wrong PIN");
            return Err(Notice::WrongPin.into());
        }
        Ok(())
    }

    /// Forget the stored PIN.
    pub async fn reset(&self) -> Result<(), LockError> {
        self.store.remove(PIN_KEY).await?;
        log::info!("PIN removed");
        Ok(())
    }
}
