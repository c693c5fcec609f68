//! In-memory book repository backed by a JSON library snapshot
//!
//! The whole library lives behind one `RwLock`. `sync_book` writes the
//! snapshot back to the file it was opened from; a repository built from an
//! in-memory snapshot has nowhere to sync to and treats sync as a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use bookforge_domain::{
    Book, BookId, BookVersion, Chapter, Character, CharacterId, PlotCanvas, VersionId,
};

use crate::infrastructure::ports::{BookRepo, ClockPort, RepoError};

/// Everything the desktop app stores for one user, as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub books: Vec<BookRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(flatten)]
    pub book: Book,
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    #[serde(flatten)]
    pub version: BookVersion,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_canvas: Option<PlotCanvas>,
}

impl VersionRecord {
    fn empty(version: BookVersion) -> Self {
        Self {
            version,
            chapters: Vec::new(),
            characters: Vec::new(),
            plot_canvas: None,
        }
    }
}

impl LibrarySnapshot {
    fn book(&self, book_id: &BookId) -> Option<&BookRecord> {
        self.books.iter().find(|record| &record.book.id == book_id)
    }

    fn book_mut(&mut self, book_id: &BookId) -> Option<&mut BookRecord> {
        self.books.iter_mut().find(|record| &record.book.id == book_id)
    }

    fn version(&self, book_id: &BookId, version_id: &VersionId) -> Result<&VersionRecord, RepoError> {
        self.book(book_id)
            .ok_or_else(|| RepoError::not_found("Book", book_id))?
            .versions
            .iter()
            .find(|record| &record.version.id == version_id)
            .ok_or_else(|| RepoError::not_found("Version", version_id))
    }

    fn version_mut(
        &mut self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<&mut VersionRecord, RepoError> {
        self.book_mut(book_id)
            .ok_or_else(|| RepoError::not_found("Book", book_id))?
            .versions
            .iter_mut()
            .find(|record| &record.version.id == version_id)
            .ok_or_else(|| RepoError::not_found("Version", version_id))
    }
}

/// [`BookRepo`] over a [`LibrarySnapshot`] held in memory.
pub struct InMemoryBookRepo {
    library: RwLock<LibrarySnapshot>,
    source: Option<PathBuf>,
    clock: Arc<dyn ClockPort>,
}

impl InMemoryBookRepo {
    pub fn new(library: LibrarySnapshot, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            library: RwLock::new(library),
            source: None,
            clock,
        }
    }

    /// Loads a snapshot from a JSON file. `sync_book` writes back to the same path.
    pub async fn open(path: impl AsRef<Path>, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::storage("open", format!("{}: {}", path.display(), e)))?;
        let library: LibrarySnapshot =
            serde_json::from_str(&raw).map_err(RepoError::serialization)?;

        tracing::debug!(
            path = %path.display(),
            books = library.books.len(),
            "Loaded library snapshot"
        );

        Ok(Self {
            library: RwLock::new(library),
            source: Some(path.to_path_buf()),
            clock,
        })
    }

    /// Copy of the current library state.
    pub async fn snapshot(&self) -> LibrarySnapshot {
        self.library.read().await.clone()
    }
}

#[async_trait]
impl BookRepo for InMemoryBookRepo {
    async fn get_book(&self, book_id: &BookId) -> Result<Option<Book>, RepoError> {
        let library = self.library.read().await;
        Ok(library.book(book_id).map(|record| record.book.clone()))
    }

    async fn list_versions(&self, book_id: &BookId) -> Result<Vec<BookVersion>, RepoError> {
        let library = self.library.read().await;
        let record = library
            .book(book_id)
            .ok_or_else(|| RepoError::not_found("Book", book_id))?;
        Ok(record
            .versions
            .iter()
            .map(|version| version.version.clone())
            .collect())
    }

    async fn create_version(
        &self,
        book_id: &BookId,
        name: &str,
    ) -> Result<BookVersion, RepoError> {
        let mut library = self.library.write().await;
        let record = library
            .book_mut(book_id)
            .ok_or_else(|| RepoError::not_found("Book", book_id))?;

        let version = BookVersion::new(VersionId::new(), name, self.clock.now());
        record.versions.push(VersionRecord::empty(version.clone()));
        Ok(version)
    }

    async fn update_book(&self, book: &Book) -> Result<(), RepoError> {
        let mut library = self.library.write().await;
        let record = library
            .book_mut(&book.id)
            .ok_or_else(|| RepoError::not_found("Book", &book.id))?;
        record.book = book.clone();
        Ok(())
    }

    async fn delete_book(&self, book_id: &BookId) -> Result<(), RepoError> {
        let mut library = self.library.write().await;
        let before = library.books.len();
        library.books.retain(|record| &record.book.id != book_id);
        if library.books.len() == before {
            return Err(RepoError::not_found("Book", book_id));
        }
        Ok(())
    }

    async fn sync_book(&self, book_id: &BookId) -> Result<(), RepoError> {
        let Some(path) = self.source.as_ref() else {
            tracing::debug!(book_id = %book_id, "No snapshot file, sync skipped");
            return Ok(());
        };

        let json = {
            let library = self.library.read().await;
            if library.book(book_id).is_none() {
                return Err(RepoError::not_found("Book", book_id));
            }
            serde_json::to_string_pretty(&*library).map_err(RepoError::serialization)?
        };

        tokio::fs::write(path, json)
            .await
            .map_err(|e| RepoError::storage("sync_book", e))?;
        tracing::info!(book_id = %book_id, path = %path.display(), "Library synced");
        Ok(())
    }

    async fn get_characters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Vec<Character>, RepoError> {
        let library = self.library.read().await;
        Ok(library.version(book_id, version_id)?.characters.clone())
    }

    async fn get_character(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        character_id: &CharacterId,
    ) -> Result<Option<Character>, RepoError> {
        let library = self.library.read().await;
        Ok(library
            .version(book_id, version_id)?
            .characters
            .iter()
            .find(|character| &character.id == character_id)
            .cloned())
    }

    async fn get_plot_canvas(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Option<PlotCanvas>, RepoError> {
        let library = self.library.read().await;
        Ok(library.version(book_id, version_id)?.plot_canvas.clone())
    }

    async fn save_plot_canvas(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        canvas: &PlotCanvas,
    ) -> Result<(), RepoError> {
        let mut library = self.library.write().await;
        library.version_mut(book_id, version_id)?.plot_canvas = Some(canvas.clone());
        Ok(())
    }

    async fn list_chapters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Vec<Chapter>, RepoError> {
        let library = self.library.read().await;
        Ok(library.version(book_id, version_id)?.chapters.clone())
    }

    async fn save_chapters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        chapters: &[Chapter],
    ) -> Result<(), RepoError> {
        let mut library = self.library.write().await;
        library.version_mut(book_id, version_id)?.chapters = chapters.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    const LIBRARY_JSON: &str = r#"{
        "books": [{
            "id": "book-1",
            "title": "The Philosopher's Stone",
            "author": "J. K. Rowling",
            "versions": [{
                "id": "v1",
                "name": "First draft",
                "status": "DRAFT",
                "createdAt": "2025-01-10T08:00:00Z",
                "chapters": [
                    {"id": "c1", "title": "The Boy Who Lived", "position": 0, "isComplete": true},
                    {"id": "c2", "title": "The Vanishing Glass", "position": 1}
                ],
                "characters": [{"id": "harry", "name": "Harry Potter"}],
                "plotCanvas": {"nodes": [
                    {"id": "act-1", "type": "act", "data": {"title": "Beginnings"}}
                ]}
            }]
        }]
    }"#;

    fn fixed_clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()))
    }

    fn write_library() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LIBRARY_JSON.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn opens_snapshot_from_file() {
        let file = write_library();
        let repo = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();

        let book_id = BookId::from("book-1");
        let version_id = VersionId::from("v1");

        let book = repo.get_book(&book_id).await.unwrap().unwrap();
        assert_eq!(book.author.as_deref(), Some("J. K. Rowling"));

        let chapters = repo.list_chapters(&book_id, &version_id).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert!(chapters[0].is_complete);

        let canvas = repo
            .get_plot_canvas(&book_id, &version_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(canvas.nodes[0].title(), "Beginnings");

        let harry = repo
            .get_character(&book_id, &version_id, &CharacterId::from("harry"))
            .await
            .unwrap();
        assert_eq!(harry.map(|c| c.name), Some("Harry Potter".to_string()));
    }

    #[tokio::test]
    async fn open_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = InMemoryBookRepo::open(file.path(), fixed_clock()).await;

        assert!(matches!(result, Err(RepoError::Serialization(_))));
    }

    #[tokio::test]
    async fn unknown_version_is_not_found() {
        let file = write_library();
        let repo = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();

        let err = repo
            .list_chapters(&BookId::from("book-1"), &VersionId::from("v9"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_version_uses_clock() {
        let file = write_library();
        let repo = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();
        let book_id = BookId::from("book-1");

        let version = repo.create_version(&book_id, "Second draft").await.unwrap();

        assert_eq!(
            version.created_at,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
        );
        let versions = repo.list_versions(&book_id).await.unwrap();
        assert_eq!(versions.len(), 2);
        assert!(repo
            .list_chapters(&book_id, &version.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn sync_writes_changes_back_to_file() {
        let file = write_library();
        let repo = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();
        let book_id = BookId::from("book-1");
        let version_id = VersionId::from("v1");

        let chapters = vec![Chapter::new("c9", 5).with_title("Diagon Alley")];
        repo.save_chapters(&book_id, &version_id, &chapters)
            .await
            .unwrap();
        repo.sync_book(&book_id).await.unwrap();

        let reopened = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();
        let stored = reopened.list_chapters(&book_id, &version_id).await.unwrap();
        assert_eq!(stored, chapters);
    }

    #[tokio::test]
    async fn sync_without_source_is_noop() {
        let repo = InMemoryBookRepo::new(LibrarySnapshot::default(), fixed_clock());
        assert!(repo.sync_book(&BookId::from("anything")).await.is_ok());
    }

    #[tokio::test]
    async fn delete_and_update_book() {
        let file = write_library();
        let repo = InMemoryBookRepo::open(file.path(), fixed_clock()).await.unwrap();
        let book_id = BookId::from("book-1");

        let mut book = repo.get_book(&book_id).await.unwrap().unwrap();
        book.genre = "Fantasy".to_string();
        repo.update_book(&book).await.unwrap();
        assert_eq!(repo.snapshot().await.books[0].book.genre, "Fantasy");

        repo.delete_book(&book_id).await.unwrap();
        assert!(repo.get_book(&book_id).await.unwrap().is_none());
        assert!(repo.delete_book(&book_id).await.unwrap_err().is_not_found());
    }
}
