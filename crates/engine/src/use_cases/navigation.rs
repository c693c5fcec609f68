//! Chapter navigation use case - act grouping and progress for the editor sidebar.

use std::sync::Arc;

use bookforge_domain::{
    build_chapter_navigation, next_chapter, previous_chapter, BookId, Chapter,
    ChapterId, ChapterNavigationData, VersionId,
};

use crate::infrastructure::ports::{BookRepo, RepoError};

/// Container for navigation use cases.
pub struct NavigationUseCases {
    pub chapters: Arc<ChapterNavigation>,
}

impl NavigationUseCases {
    pub fn new(chapters: Arc<ChapterNavigation>) -> Self {
        Self { chapters }
    }
}

/// Navigation state plus the neighbours of the current chapter.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNavigationView {
    #[serde(flatten)]
    pub navigation: ChapterNavigationData,
    pub next_chapter: Option<ChapterId>,
    pub previous_chapter: Option<ChapterId>,
}

/// Builds the act/chapter navigation for a book version.
///
/// Fetches the chapter list and planning board, then derives. The board is
/// optional: versions without one get the default three-act split.
pub struct ChapterNavigation {
    book_repo: Arc<dyn BookRepo>,
}

impl ChapterNavigation {
    pub fn new(book_repo: Arc<dyn BookRepo>) -> Self {
        Self { book_repo }
    }

    pub async fn execute(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        current_chapter_id: Option<&ChapterId>,
    ) -> Result<ChapterNavigationView, NavigationError> {
        let chapters = self.book_repo.list_chapters(book_id, version_id).await?;
        let canvas = self.book_repo.get_plot_canvas(book_id, version_id).await?;

        let current = current_chapter_id.and_then(|id| {
            let found = chapters.iter().find(|chapter| &chapter.id == id);
            if found.is_none() {
                tracing::warn!(
                    book_id = %book_id,
                    version_id = %version_id,
                    chapter_id = %id,
                    "Current chapter not in version, navigating without one"
                );
            }
            found
        });

        let navigation = build_chapter_navigation(
            &chapters,
            canvas.as_ref().map(|canvas| canvas.nodes.as_slice()),
            current,
        );

        tracing::debug!(
            book_id = %book_id,
            version_id = %version_id,
            acts = navigation.acts.len(),
            chapters = navigation.total_chapters,
            completed = navigation.completed_chapters,
            "Built chapter navigation"
        );

        let neighbour = |chapter: Option<&Chapter>| chapter.map(|c| c.id.clone());
        Ok(ChapterNavigationView {
            next_chapter: neighbour(next_chapter(&chapters, current)),
            previous_chapter: neighbour(previous_chapter(&chapters, current)),
            navigation,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockBookRepo;
    use bookforge_domain::{NarrativeNode, NodeKind, PlanPayload, PlotCanvas};

    fn act(id: &str, title: &str, y: f64) -> NarrativeNode {
        NarrativeNode::new(
            id,
            NodeKind::Act(PlanPayload {
                title: title.to_string(),
                ..Default::default()
            }),
        )
        .at_y(y)
    }

    #[tokio::test]
    async fn uses_board_acts_when_present() {
        let mut book_repo = MockBookRepo::new();
        book_repo.expect_list_chapters().returning(|_, _| {
            Ok(vec![
                Chapter::new("c1", 0).with_linked_act("actX"),
                Chapter::new("c2", 1).with_linked_act("actY"),
            ])
        });
        book_repo.expect_get_plot_canvas().returning(|_, _| {
            Ok(Some(PlotCanvas::new(vec![
                act("actY", "Climax", 400.0),
                act("actX", "Rising Action", 100.0),
            ])))
        });

        let use_case = ChapterNavigation::new(Arc::new(book_repo));
        let current = ChapterId::from("c1");
        let view = use_case
            .execute(&BookId::from("b"), &VersionId::from("v"), Some(&current))
            .await
            .unwrap();

        let names: Vec<&str> = view.navigation.acts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Rising Action", "Climax"]);
        assert_eq!(view.navigation.current_act_index, Some(0));
        assert_eq!(view.next_chapter, Some(ChapterId::from("c2")));
        assert_eq!(view.previous_chapter, None);
    }

    #[tokio::test]
    async fn missing_board_falls_back_to_three_acts() {
        let mut book_repo = MockBookRepo::new();
        book_repo.expect_list_chapters().returning(|_, _| {
            Ok(vec![
                Chapter::new("c1", 0),
                Chapter::new("c2", 1),
                Chapter::new("c3", 2).completed(),
            ])
        });
        book_repo.expect_get_plot_canvas().returning(|_, _| Ok(None));

        let use_case = ChapterNavigation::new(Arc::new(book_repo));
        let view = use_case
            .execute(&BookId::from("b"), &VersionId::from("v"), None)
            .await
            .unwrap();

        assert_eq!(view.navigation.acts.len(), 3);
        assert_eq!(view.navigation.completed_chapters, 1);
        assert_eq!(view.navigation.current_act_index, None);
        // No current chapter: next is the first chapter, previous is nothing
        assert_eq!(view.next_chapter, Some(ChapterId::from("c1")));
        assert_eq!(view.previous_chapter, None);
    }

    #[tokio::test]
    async fn unknown_current_chapter_is_ignored() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_list_chapters()
            .returning(|_, _| Ok(vec![Chapter::new("c1", 0)]));
        book_repo.expect_get_plot_canvas().returning(|_, _| Ok(None));

        let use_case = ChapterNavigation::new(Arc::new(book_repo));
        let missing = ChapterId::from("gone");
        let view = use_case
            .execute(&BookId::from("b"), &VersionId::from("v"), Some(&missing))
            .await
            .unwrap();

        assert_eq!(view.navigation.current_chapter_index, None);
    }

    #[tokio::test]
    async fn propagates_repo_errors() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_list_chapters()
            .returning(|_, version_id| Err(RepoError::not_found("Version", version_id)));

        let use_case = ChapterNavigation::new(Arc::new(book_repo));
        let result = use_case
            .execute(&BookId::from("b"), &VersionId::from("v9"), None)
            .await;

        assert!(matches!(result, Err(NavigationError::Repo(e)) if e.is_not_found()));
    }
}
