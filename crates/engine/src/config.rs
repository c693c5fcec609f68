//! Engine configuration from the environment.
//!
//! The binary loads `.env.local` and `.env` from the repo root first, so the
//! same variables can live in either place.

use std::path::PathBuf;

use bookforge_domain::{BookId, ChapterId, VersionId};

const DEFAULT_SNAPSHOT: &str = "library.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// JSON library snapshot (`BOOKFORGE_SNAPSHOT`)
    pub snapshot_path: PathBuf,
    /// Book to open (`BOOKFORGE_BOOK_ID`)
    pub book_id: BookId,
    /// Version to open (`BOOKFORGE_VERSION_ID`); `None` opens the latest
    pub version_id: Option<VersionId>,
    /// Chapter the editor is on (`BOOKFORGE_CURRENT_CHAPTER`)
    pub current_chapter: Option<ChapterId>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let book_id = get("BOOKFORGE_BOOK_ID")
            .map(BookId::from)
            .ok_or(ConfigError::Missing("BOOKFORGE_BOOK_ID"))?;

        Ok(Self {
            snapshot_path: get("BOOKFORGE_SNAPSHOT")
                .unwrap_or_else(|| DEFAULT_SNAPSHOT.into())
                .into(),
            book_id,
            version_id: get("BOOKFORGE_VERSION_ID").map(VersionId::from),
            current_chapter: get("BOOKFORGE_CURRENT_CHAPTER").map(ChapterId::from),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}
