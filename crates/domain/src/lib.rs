extern crate self as bookforge_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod narrative;
pub mod navigation;

// Re-export entities (explicit list in entities/mod.rs)
pub use entities::{
    acts_in_order, sort_by_position, sorted_by_position, ArcType, Book, BookVersion,
    CanvasPosition, Chapter, Character, CharacterArcPayload, HierarchyViolation,
    LocationArcPayload, LoreArcPayload, NarrativeNode, NodeIndex, NodeKind, NodeStatus, NodeType,
    ObjectArcPayload, PlanPayload, PlotCanvas, ScenePayload, VersionStatus,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{
    AssetId, BookId, ChapterId, CharacterId, LocationId, LoreId, NodeId, ObjectId,
    TimelineEventId, VersionId,
};

pub use narrative::{
    analyze_presence, column_layout, default_expanded, filter_nodes, focused_nodes,
    matches_search, presence_in_node, selection_states, with_ancestors, ColumnEntry,
    ColumnLayout, EntityRef, ExpansionState, NarrativeFilters, NodeDisplayState, Presence,
    PresenceSummary, PresenceTier, SelectionMode,
};

pub use navigation::{
    act_name, build_chapter_navigation, next_chapter, previous_chapter, ActWithChapters,
    ChapterNavigationData,
};
