//! Chapter organizer use case - acts on the planning board and chapter membership.
//!
//! Acts are act nodes on the version's board; chapters join an act through
//! `linked_act`. Every operation here reads the current snapshot, edits it,
//! and writes back the parts it changed.

use std::sync::Arc;

use bookforge_domain::{
    sort_by_position, sorted_by_position, BookId, CanvasPosition, Chapter, ChapterId,
    DomainError, NarrativeNode, NodeId, NodeKind, NodeType, PlanPayload, PlotCanvas, VersionId,
};

use crate::infrastructure::ports::{BookRepo, RepoError};

/// Column new acts are placed in on the board
const NEW_ACT_X: f64 = -300.0;
const NEW_ACT_FIRST_Y: f64 = 200.0;
const NEW_ACT_SPACING_Y: f64 = 150.0;

/// Outcome of deleting an act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedAct {
    /// Act that took over the deleted act's chapters, if there was one
    pub rehomed_to: Option<NodeId>,
    pub moved_chapters: usize,
}

/// Act and chapter organisation for a book version.
pub struct ChapterOrganizer {
    book_repo: Arc<dyn BookRepo>,
}

impl ChapterOrganizer {
    pub fn new(book_repo: Arc<dyn BookRepo>) -> Self {
        Self { book_repo }
    }

    /// Adds an act node below the existing acts, under the outline if there is one.
    pub async fn create_act(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        title: &str,
    ) -> Result<NarrativeNode, OrganizerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Act title cannot be empty").into());
        }

        let mut canvas = self
            .book_repo
            .get_plot_canvas(book_id, version_id)
            .await?
            .unwrap_or_default();

        let existing_acts = canvas.nodes.iter().filter(|node| node.is_act()).count();
        let position = CanvasPosition::new(
            NEW_ACT_X,
            NEW_ACT_FIRST_Y + existing_acts as f64 * NEW_ACT_SPACING_Y,
        );
        let outline_id = canvas.outline().map(|outline| outline.id.clone());

        let mut act = NarrativeNode::create(NodeType::Act, outline_id, position);
        act.kind = NodeKind::Act(PlanPayload {
            title: title.to_string(),
            description: format!("Act: {}", title),
            ..Default::default()
        });
        act.is_expanded = true;

        canvas.insert(act.clone())?;
        self.book_repo
            .save_plot_canvas(book_id, version_id, &canvas)
            .await?;

        tracing::info!(
            book_id = %book_id,
            version_id = %version_id,
            act_id = %act.id,
            title = %title,
            "Created act"
        );
        Ok(act)
    }

    /// Removes an act node. Its chapters move to the first other act on the
    /// board; with no other act they keep the stale link and navigation
    /// treats them as orphans.
    pub async fn delete_act(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        act_id: &NodeId,
    ) -> Result<DeletedAct, OrganizerError> {
        let mut canvas = self.load_canvas(book_id, version_id).await?;
        require_act(&canvas, act_id)?;

        let rehomed_to = canvas
            .nodes
            .iter()
            .find(|node| node.is_act() && &node.id != act_id)
            .map(|node| node.id.clone());

        let mut chapters = self.book_repo.list_chapters(book_id, version_id).await?;
        let mut moved_chapters = 0;
        if let Some(target) = rehomed_to.as_ref() {
            for chapter in chapters.iter_mut().filter(|c| c.is_linked_to(act_id)) {
                chapter.linked_act = Some(target.clone());
                moved_chapters += 1;
            }
        } else if chapters.iter().any(|c| c.is_linked_to(act_id)) {
            tracing::warn!(
                book_id = %book_id,
                act_id = %act_id,
                "Deleted last act; its chapters are now unassigned"
            );
        }

        // Board before chapters: a failed chapter save must leave orphans,
        // never chapters moved away from an act that still exists.
        canvas.remove(act_id)?;
        self.book_repo
            .save_plot_canvas(book_id, version_id, &canvas)
            .await?;
        if moved_chapters > 0 {
            self.book_repo
                .save_chapters(book_id, version_id, &chapters)
                .await?;
        }

        tracing::info!(
            book_id = %book_id,
            version_id = %version_id,
            act_id = %act_id,
            moved_chapters,
            "Deleted act"
        );
        Ok(DeletedAct {
            rehomed_to,
            moved_chapters,
        })
    }

    /// Chapters linked to `act_id`, by position.
    pub async fn chapters_by_act(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        act_id: &NodeId,
    ) -> Result<Vec<Chapter>, OrganizerError> {
        let chapters = self.book_repo.list_chapters(book_id, version_id).await?;
        let linked: Vec<Chapter> = chapters
            .into_iter()
            .filter(|chapter| chapter.is_linked_to(act_id))
            .collect();
        Ok(sorted_by_position(&linked))
    }

    /// Links a chapter to another act and places it after that act's chapters.
    ///
    /// The new position is the target act's chapter count plus one, so it is
    /// act-local rather than a manuscript-wide order.
    pub async fn move_chapter_to_act(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        chapter_id: &ChapterId,
        target_act: &NodeId,
    ) -> Result<Chapter, OrganizerError> {
        let canvas = self.load_canvas(book_id, version_id).await?;
        require_act(&canvas, target_act)?;

        let mut chapters = self.book_repo.list_chapters(book_id, version_id).await?;
        let target_count = chapters
            .iter()
            .filter(|chapter| chapter.is_linked_to(target_act))
            .count();

        let chapter = chapters
            .iter_mut()
            .find(|chapter| &chapter.id == chapter_id)
            .ok_or_else(|| OrganizerError::ChapterNotFound(chapter_id.clone()))?;
        chapter.linked_act = Some(target_act.clone());
        chapter.position = target_count as i64 + 1;
        let moved = chapter.clone();

        self.book_repo
            .save_chapters(book_id, version_id, &chapters)
            .await?;

        tracing::info!(
            book_id = %book_id,
            chapter_id = %chapter_id,
            act_id = %target_act,
            position = moved.position,
            "Moved chapter to act"
        );
        Ok(moved)
    }

    /// Sets a chapter's position, optionally relinking it, and stores the
    /// list re-sorted by position.
    pub async fn reorder_chapter(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        chapter_id: &ChapterId,
        new_position: i64,
        new_act: Option<&NodeId>,
    ) -> Result<Vec<Chapter>, OrganizerError> {
        let mut chapters = self.book_repo.list_chapters(book_id, version_id).await?;

        let chapter = chapters
            .iter_mut()
            .find(|chapter| &chapter.id == chapter_id)
            .ok_or_else(|| OrganizerError::ChapterNotFound(chapter_id.clone()))?;
        chapter.position = new_position;
        if let Some(act_id) = new_act {
            chapter.linked_act = Some(act_id.clone());
        }

        sort_by_position(&mut chapters);
        self.book_repo
            .save_chapters(book_id, version_id, &chapters)
            .await?;

        tracing::info!(
            book_id = %book_id,
            chapter_id = %chapter_id,
            position = new_position,
            "Reordered chapter"
        );
        Ok(chapters)
    }

    async fn load_canvas(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
    ) -> Result<PlotCanvas, OrganizerError> {
        self.book_repo
            .get_plot_canvas(book_id, version_id)
            .await?
            .ok_or(OrganizerError::NoPlanningBoard)
    }
}

fn require_act(canvas: &PlotCanvas, act_id: &NodeId) -> Result<(), OrganizerError> {
    match canvas.get(act_id) {
        Some(node) if node.is_act() => Ok(()),
        _ => Err(OrganizerError::ActNotFound(act_id.clone())),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error("Chapter not found: {0}")]
    ChapterNotFound(ChapterId),
    #[error("Act not found: {0}")]
    ActNotFound(NodeId),
    #[error("Version has no planning board")]
    NoPlanningBoard,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
