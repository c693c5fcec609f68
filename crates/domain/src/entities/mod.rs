//! Domain entities: manuscript records and the planning board.

mod book;
mod chapter;
mod narrative_node;
mod plot_canvas;

pub use book::{Book, BookVersion, Character, VersionStatus};
pub use chapter::{sort_by_position, sorted_by_position, Chapter};
pub use narrative_node::{
    ArcType, CanvasPosition, CharacterArcPayload, LocationArcPayload, LoreArcPayload,
    NarrativeNode, NodeKind, NodeStatus, NodeType, ObjectArcPayload, PlanPayload, ScenePayload,
};
pub use plot_canvas::{acts_in_order, HierarchyViolation, NodeIndex, PlotCanvas};
