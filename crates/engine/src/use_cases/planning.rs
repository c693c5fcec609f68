//! Planning board use cases.
//!
//! Fetch the version's board once, then run the pure derivations:
//! - filtered node set (optionally with ancestor context)
//! - heat-map column layout under the caller's expansion state
//! - selection focus display flags
//! - entity screen time over the rendered columns

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bookforge_domain::{
    analyze_presence, column_layout, default_expanded, filter_nodes, presence_in_node,
    selection_states, with_ancestors, BookId, ColumnLayout, EntityRef, ExpansionState,
    NarrativeFilters, NarrativeNode, NodeDisplayState, NodeId, NodeIndex, Presence,
    PresenceSummary, SelectionMode, VersionId,
};

use crate::infrastructure::ports::{BookRepo, RepoError};

/// Container for planning board use cases.
pub struct PlanningUseCases {
    pub board: Arc<PlanningBoard>,
    pub screen_time: Arc<ScreenTime>,
}

impl PlanningUseCases {
    pub fn new(board: Arc<PlanningBoard>, screen_time: Arc<ScreenTime>) -> Self {
        Self { board, screen_time }
    }
}

/// View settings the board is rendered with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanningQuery {
    pub filters: NarrativeFilters,
    pub search: String,
    /// `None` opens the board with outline and acts expanded
    pub expanded: Option<ExpansionState>,
    /// Keep the ancestors of every match so hits stay in their hierarchy
    pub with_context: bool,
    pub selected: Option<NodeId>,
    pub mode: SelectionMode,
}

impl PlanningQuery {
    fn expansion_for(&self, nodes: &[NarrativeNode]) -> ExpansionState {
        match &self.expanded {
            Some(expanded) => expanded.clone(),
            None => default_expanded(nodes).into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningBoardView {
    /// Nodes passing the query, in board order
    pub nodes: Vec<NarrativeNode>,
    pub layout: ColumnLayout,
    pub display: Vec<NodeDisplayState>,
    pub total_nodes: usize,
}

impl PlanningBoardView {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            layout: ColumnLayout::default(),
            display: Vec::new(),
            total_nodes: 0,
        }
    }
}

/// Renders a version's planning board for a query.
pub struct PlanningBoard {
    book_repo: Arc<dyn BookRepo>,
}

impl PlanningBoard {
    pub fn new(book_repo: Arc<dyn BookRepo>) -> Self {
        Self { book_repo }
    }

    pub async fn execute(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        query: &PlanningQuery,
    ) -> Result<PlanningBoardView, PlanningError> {
        let Some(canvas) = self.book_repo.get_plot_canvas(book_id, version_id).await? else {
            tracing::debug!(
                book_id = %book_id,
                version_id = %version_id,
                "Version has no planning board"
            );
            return Ok(PlanningBoardView::empty());
        };

        let matches = filter_nodes(&canvas.nodes, &query.filters, &query.search);
        let mut visible: Vec<NarrativeNode> = if query.with_context {
            with_ancestors(&canvas.nodes, &matches)
        } else {
            matches
        }
        .into_iter()
        .cloned()
        .collect();

        let mut display = selection_states(&visible, query.selected.as_ref(), query.mode);
        let expansion = if query.mode == SelectionMode::Focus {
            // Focus narrows the board itself and brings its own expansion
            display.retain(|state| state.visible);
            let kept: HashSet<&NodeId> = display.iter().map(|state| &state.node_id).collect();
            visible.retain(|node| kept.contains(&node.id));
            match &query.expanded {
                Some(expanded) => expanded.clone(),
                None => display
                    .iter()
                    .filter(|state| state.expanded)
                    .map(|state| state.node_id.clone())
                    .collect(),
            }
        } else {
            query.expansion_for(&canvas.nodes)
        };
        let layout = column_layout(&visible, &expansion);

        tracing::debug!(
            book_id = %book_id,
            version_id = %version_id,
            total = canvas.nodes.len(),
            visible = visible.len(),
            columns = layout.len(),
            "Rendered planning board"
        );

        Ok(PlanningBoardView {
            total_nodes: canvas.nodes.len(),
            nodes: visible,
            layout,
            display,
        })
    }
}

/// One heat-map cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceCell {
    pub node_id: NodeId,
    pub presence: Presence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTimeReport {
    pub entity: EntityRef,
    pub display_name: String,
    pub summary: PresenceSummary,
    /// One cell per final column of the layout
    pub cells: Vec<PresenceCell>,
}

/// Screen-time heat map row for one character, location, object or lore entry.
pub struct ScreenTime {
    book_repo: Arc<dyn BookRepo>,
}

impl ScreenTime {
    pub fn new(book_repo: Arc<dyn BookRepo>) -> Self {
        Self { book_repo }
    }

    /// Characters default to their stored name for mention matching; other
    /// entities are only matched by name when `display_name` is given.
    pub async fn execute(
        &self,
        book_id: &BookId,
        version_id: &VersionId,
        entity: EntityRef,
        display_name: Option<String>,
        expanded: Option<&ExpansionState>,
    ) -> Result<ScreenTimeReport, PlanningError> {
        let display_name = match (display_name, &entity) {
            (Some(name), _) => name,
            (None, EntityRef::Character(character_id)) => self
                .book_repo
                .get_character(book_id, version_id, character_id)
                .await?
                .map(|character| character.name)
                .ok_or_else(|| RepoError::not_found("Character", character_id))?,
            (None, _) => String::new(),
        };

        let nodes = self
            .book_repo
            .get_plot_canvas(book_id, version_id)
            .await?
            .map(|canvas| canvas.nodes)
            .unwrap_or_default();

        let summary = analyze_presence(&nodes, &entity, &display_name);

        let expansion = match expanded {
            Some(expanded) => expanded.clone(),
            None => default_expanded(&nodes).into_iter().collect(),
        };
        let layout = column_layout(&nodes, &expansion);
        let by_id = NodeIndex::new(&nodes);
        let cells = layout
            .final_columns()
            .into_iter()
            .filter_map(|column| by_id.get(&column.node_id))
            .map(|node| PresenceCell {
                node_id: node.id.clone(),
                presence: presence_in_node(node, &entity, &display_name),
            })
            .collect();

        Ok(ScreenTimeReport {
            entity,
            display_name,
            summary,
            cells,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanningError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
