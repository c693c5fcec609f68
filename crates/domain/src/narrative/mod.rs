//! Planning board derivations over the narrative node forest.
//!
//! Everything here is a pure function of its inputs. Nodes are never
//! mutated; view state lives in [`ExpansionState`] and the returned records.

mod filter;
mod layout;
mod presence;
mod selection;

pub use filter::{filter_nodes, matches_search, with_ancestors, NarrativeFilters};
pub use layout::{column_layout, ColumnEntry, ColumnLayout, ExpansionState};
pub use presence::{
    analyze_presence, presence_in_node, EntityRef, Presence, PresenceSummary, PresenceTier,
};
pub use selection::{
    default_expanded, focused_nodes, selection_states, NodeDisplayState, SelectionMode,
};
