//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{AssetUploadPort, BookRepo};
use crate::use_cases;

/// Main application state.
///
/// Holds the injected ports and every use case built on them.
pub struct App {
    pub book_repo: Arc<dyn BookRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub navigation: use_cases::NavigationUseCases,
    pub planning: use_cases::PlanningUseCases,
    pub organizer: Arc<use_cases::ChapterOrganizer>,
    /// `None` when the host provides no upload service
    pub assets: Option<use_cases::AssetUseCases>,
}

impl App {
    pub fn new(book_repo: Arc<dyn BookRepo>, uploads: Option<Arc<dyn AssetUploadPort>>) -> Self {
        let navigation = use_cases::NavigationUseCases::new(Arc::new(
            use_cases::ChapterNavigation::new(book_repo.clone()),
        ));
        let planning = use_cases::PlanningUseCases::new(
            Arc::new(use_cases::PlanningBoard::new(book_repo.clone())),
            Arc::new(use_cases::ScreenTime::new(book_repo.clone())),
        );
        let organizer = Arc::new(use_cases::ChapterOrganizer::new(book_repo.clone()));
        let assets = uploads.map(|uploads| {
            use_cases::AssetUseCases::new(Arc::new(use_cases::UploadCharacterPortrait::new(
                book_repo.clone(),
                uploads,
            )))
        });

        Self {
            book_repo,
            use_cases: UseCases {
                navigation,
                planning,
                organizer,
                assets,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockBookRepo;
    use bookforge_domain::{BookId, Chapter, VersionId};

    #[tokio::test]
    async fn use_cases_share_the_injected_repo() {
        let mut book_repo = MockBookRepo::new();
        book_repo
            .expect_list_chapters()
            .returning(|_, _| Ok(vec![Chapter::new("c1", 0)]));
        book_repo.expect_get_plot_canvas().returning(|_, _| Ok(None));

        let app = App::new(Arc::new(book_repo), None);
        assert!(app.use_cases.assets.is_none());

        let view = app
            .use_cases
            .navigation
            .chapters
            .execute(&BookId::from("b"), &VersionId::from("v"), None)
            .await
            .unwrap();
        assert_eq!(view.navigation.total_chapters, 1);
    }
}
