//! Book, version and character records as the book data provider hands them out.
//!
//! These are snapshots. Persistence, sync and encryption live behind the
//! engine's repository port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookId, CharacterId, VersionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: String,
}

impl Book {
    pub fn new(id: impl Into<BookId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            author: None,
            genre: String::new(),
        }
    }
}

/// Lifecycle of a manuscript version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    #[default]
    Draft,
    InReview,
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookVersion {
    pub id: VersionId,
    pub name: String,
    #[serde(default)]
    pub status: VersionStatus,
    #[serde(default)]
    pub word_count: u64,
    pub created_at: DateTime<Utc>,
}

impl BookVersion {
    pub fn new(id: impl Into<VersionId>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: VersionStatus::default(),
            word_count: 0,
            created_at: now,
        }
    }
}

/// Character profile as shown on cards and in scene participant pickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub quote: String,
}

impl Character {
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            quote: String::new(),
        }
    }
}
