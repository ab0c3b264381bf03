//! Persisted UI preferences.

use crate::storage::{KeyValueStore, StorageResult, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored theme, falling back to light for missing or unknown values.
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Self> {
        let saved = store.get(THEME_KEY).await?;
        Ok(saved.and_then(|s| s.parse().ok()).unwrap_or_default())
    }

    pub async fn save<S: KeyValueStore + ?Sized>(self, store: &S) -> StorageResult<()> {
        store.set(THEME_KEY, self.as_str().to_string()).await
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pollster::block_on;

    #[test]
    fn test_theme_persistence() {
        let store = MemoryStore::new();
        assert_eq!(block_on(Theme::load(&store)).unwrap(), Theme::Light);
        block_on(Theme::Dark.save(&store)).unwrap();
        assert_eq!(block_on(Theme::load(&store)).unwrap(), Theme::Dark);

        block_on(store.set(THEME_KEY, "sepia".to_string())).unwrap();
        assert_eq!(block_on(Theme::load(&store)).unwrap(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
