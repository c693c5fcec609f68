//! Repository port traits for book data access.

use async_trait::async_trait;
use bookforge_domain::*;

use super::error::RepoError;

// =============================================================================
// Book Data Provider
// =============================================================================

/// Book and version data as the desktop app's sync backend exposes it.
///
/// Derivations never call back into this port; use cases fetch a snapshot,
/// derive, and write back only through the explicit save methods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepo: Send + Sync {
    // Books and versions
    async fn get_book(&self, book_id: &BookId) -> Result<Option<Book>, RepoError>;
    async fn list_versions(&self, book_id: &BookId) -> Result<Vec<BookVersion>, RepoError>;
    async fn create_version(&self, book_id: &BookId, name: &str)
        -> Result<BookVersion, RepoError>;
    async fn update_book(&self, book: &Book) -> Result<(), RepoError>;
    async fn delete_book(&self, book_id: &BookId) -> Result<(), RepoError>;
    /// Push local changes to the backing store.
    async fn sync_book(&self, book_id: &BookId) -> Result<(), RepoError>;

    // Characters
    async fn get_characters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Vec<Character>, RepoError>;
    async fn get_character(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        character_id: &CharacterId,
    ) -> Result<Option<Character>, RepoError>;

    // Planning board
    /// `None` when the version has never had a board.
    async fn get_plot_canvas(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Option<PlotCanvas>, RepoError>;
    async fn save_plot_canvas(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        canvas: &PlotCanvas,
    ) -> Result<(), RepoError>;

    // Chapters
    async fn list_chapters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<Vec<Chapter>, RepoError>;
    /// Replaces the version's chapter list.
    async fn save_chapters(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        chapters: &[Chapter],
    ) -> Result<(), RepoError>;
}
