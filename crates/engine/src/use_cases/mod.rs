//! Use cases - User story orchestration.
//!
//! Each module fetches what it needs through the ports, runs the pure
//! derivations from `bookforge_domain`, and writes back explicit changes.

pub mod assets;
pub mod navigation;
pub mod organizer;
pub mod planning;

// Re-export main types
pub use assets::{AssetError, AssetUseCases, UploadCharacterPortrait};
pub use navigation::{ChapterNavigation, ChapterNavigationView, NavigationError, NavigationUseCases};
pub use organizer::{ChapterOrganizer, DeletedAct, OrganizerError};
pub use planning::{
    PlanningBoard, PlanningBoardView, PlanningError, PlanningQuery, PlanningUseCases,
    PresenceCell, ScreenTime, ScreenTimeReport,
};
