//! Selection focus on the planning board.
//!
//! Selecting a node highlights its lineage. In [`SelectionMode::Path`] the
//! whole board stays on screen with unrelated nodes muted; in
//! [`SelectionMode::DrillDown`] only the selected node, its subtree and its
//! siblings are shown. [`SelectionMode::Focus`] keeps the lineage plus the
//! arcs linked from it, see [`focused_nodes`]. A selection that does not
//! resolve behaves like no selection.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entities::{NarrativeNode, NodeIndex, NodeType};
use crate::ids::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    #[default]
    Path,
    DrillDown,
    Focus,
}

/// Derived per-node display flags. Never written back to the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDisplayState {
    pub node_id: NodeId,
    pub expanded: bool,
    pub muted: bool,
    pub visible: bool,
}

struct Lineage {
    selected: NodeId,
    ancestors: HashSet<NodeId>,
    descendants: HashSet<NodeId>,
}

impl Lineage {
    fn resolve(index: &NodeIndex<'_>, selected: Option<&NodeId>) -> Option<Self> {
        let selected = selected.filter(|id| index.contains(id))?;
        Some(Self {
            selected: selected.clone(),
            ancestors: index.ancestors(selected).into_iter().collect(),
            descendants: index.descendants(selected).into_iter().collect(),
        })
    }

    fn in_path(&self, id: &NodeId) -> bool {
        &self.selected == id || self.ancestors.contains(id) || self.descendants.contains(id)
    }
}

/// Display state for every node, in input order.
pub fn selection_states(
    nodes: &[NarrativeNode],
    selected: Option<&NodeId>,
    mode: SelectionMode,
) -> Vec<NodeDisplayState> {
    if mode == SelectionMode::Focus {
        return hide_unfocused(nodes, focused_nodes(nodes, selected));
    }

    let index = NodeIndex::new(nodes);
    let Some(lineage) = Lineage::resolve(&index, selected) else {
        return nodes
            .iter()
            .map(|node| NodeDisplayState {
                node_id: node.id.clone(),
                expanded: false,
                muted: false,
                visible: true,
            })
            .collect();
    };

    if mode == SelectionMode::Path {
        nodes
            .iter()
            .map(|node| NodeDisplayState {
                node_id: node.id.clone(),
                expanded: node.id == lineage.selected || lineage.descendants.contains(&node.id),
                muted: !lineage.in_path(&node.id),
                visible: true,
            })
            .collect()
    } else {
        let siblings: HashSet<NodeId> = index.siblings(&lineage.selected).into_iter().collect();
        nodes
            .iter()
            .map(|node| {
                let shown = node.id == lineage.selected
                    || lineage.descendants.contains(&node.id)
                    || siblings.contains(&node.id);
                NodeDisplayState {
                    node_id: node.id.clone(),
                    expanded: node.id == lineage.selected,
                    muted: !shown,
                    visible: shown,
                }
            })
            .collect()
    }
}

/// Every node in input order; those outside `focused` are hidden and muted.
fn hide_unfocused(nodes: &[NarrativeNode], focused: Vec<NodeDisplayState>) -> Vec<NodeDisplayState> {
    let mut focused: HashMap<NodeId, NodeDisplayState> = focused
        .into_iter()
        .map(|state| (state.node_id.clone(), state))
        .collect();
    nodes
        .iter()
        .map(|node| {
            focused.remove(&node.id).unwrap_or_else(|| NodeDisplayState {
                node_id: node.id.clone(),
                expanded: false,
                muted: true,
                visible: false,
            })
        })
        .collect()
}

/// Display state of the nodes kept on screen for a focused selection, in
/// input order. Everything returned is visible and unmuted.
///
/// The focus is the selection with its ancestors and descendants. When the
/// selection is a chapter or scene, arc nodes linked from it or from any
/// scene below it join the focus, collapsed. The selection and its ancestors
/// are expanded, and so are its direct children. With no selection every node
/// is kept, with outline and acts expanded.
pub fn focused_nodes(nodes: &[NarrativeNode], selected: Option<&NodeId>) -> Vec<NodeDisplayState> {
    let index = NodeIndex::new(nodes);
    let Some(lineage) = Lineage::resolve(&index, selected) else {
        return nodes
            .iter()
            .map(|node| NodeDisplayState {
                node_id: node.id.clone(),
                expanded: opens_by_default(node),
                muted: false,
                visible: true,
            })
            .collect();
    };

    let mut linked_arcs: HashSet<&NodeId> = HashSet::new();
    let selected_node = index.get(&lineage.selected);
    let pulls_arcs = selected_node
        .is_some_and(|node| matches!(node.node_type(), NodeType::Chapter | NodeType::Scene));
    if pulls_arcs {
        let link_sources = selected_node.into_iter().chain(
            lineage
                .descendants
                .iter()
                .filter_map(|id| index.get(id))
                .filter(|node| node.node_type() == NodeType::Scene),
        );
        for source in link_sources {
            linked_arcs.extend(
                source
                    .linked_node_ids
                    .iter()
                    .filter_map(|id| index.get(id))
                    .filter(|linked| linked.node_type().is_arc())
                    .map(|linked| &linked.id),
            );
        }
    }

    nodes
        .iter()
        .filter(|node| lineage.in_path(&node.id) || linked_arcs.contains(&node.id))
        .map(|node| {
            let expanded = if node.id == lineage.selected || lineage.ancestors.contains(&node.id) {
                true
            } else if lineage.descendants.contains(&node.id) {
                node.parent_id.as_ref() == Some(&lineage.selected)
            } else {
                false
            };
            NodeDisplayState {
                node_id: node.id.clone(),
                expanded,
                muted: false,
                visible: true,
            }
        })
        .collect()
}

fn opens_by_default(node: &NarrativeNode) -> bool {
    matches!(node.node_type(), NodeType::Outline | NodeType::Act)
}

/// Expansion a freshly opened board starts with: outline and act nodes.
pub fn default_expanded(nodes: &[NarrativeNode]) -> Vec<NodeId> {
    nodes
        .iter()
        .filter(|node| opens_by_default(node))
        .map(|node| node.id.clone())
        .collect()
}
