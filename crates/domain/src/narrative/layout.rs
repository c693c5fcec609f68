//! Expand/collapse state and heat-map column layout.
//!
//! The layout walks the hierarchy depth-first from the effective roots and
//! only descends into expanded nodes. Each node is visited at most once, so
//! boards with parent cycles still terminate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::{NarrativeNode, NodeIndex};
use crate::ids::NodeId;

/// Which nodes currently show their children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    expanded: HashSet<NodeId>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Flips the node's state and returns the new one.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    pub fn expand(&mut self, id: impl Into<NodeId>) {
        self.expanded.insert(id.into());
    }

    pub fn collapse(&mut self, id: &NodeId) {
        self.expanded.remove(id);
    }

    /// Expands `id` and everything below it.
    pub fn expand_all_descendants(&mut self, nodes: &[NarrativeNode], id: &NodeId) {
        let index = NodeIndex::new(nodes);
        if !index.contains(id) {
            return;
        }
        self.expanded.insert(id.clone());
        self.expanded.extend(index.descendants(id));
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl<T: Into<NodeId>> FromIterator<T> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// One visited node in the heat-map header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnEntry {
    pub node_id: NodeId,
    pub depth_level: usize,
    /// Depth-first visit index
    pub column_position: usize,
    /// Always 1: spans are not aggregated over descendants yet.
    pub column_span: usize,
    /// Whether the walk descended into this node's children
    pub expanded: bool,
    /// Whether the node has resolvable children at all
    pub has_children: bool,
}

impl ColumnEntry {
    /// Data column: the walk stopped here.
    pub fn is_final(&self) -> bool {
        !self.expanded || !self.has_children
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    pub entries: Vec<ColumnEntry>,
}

impl ColumnLayout {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&ColumnEntry> {
        self.entries.iter().find(|entry| &entry.node_id == id)
    }

    /// Number of header rows (deepest level + 1), 0 when empty.
    pub fn depth(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.depth_level + 1)
            .max()
            .unwrap_or(0)
    }

    /// Entries on one header row, in column order.
    pub fn level(&self, depth_level: usize) -> Vec<&ColumnEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.depth_level == depth_level)
            .collect()
    }

    /// Leaf or collapsed entries: the columns that carry cell data.
    pub fn final_columns(&self) -> Vec<&ColumnEntry> {
        self.entries.iter().filter(|entry| entry.is_final()).collect()
    }
}

/// Depth-first column layout over `nodes` under `expansion`.
///
/// Nodes the root walk cannot reach through `child_ids` (pure parent cycles,
/// children their parent does not list) start walks of their own afterwards,
/// top to bottom by `position.y`, so every node lands in the layout.
pub fn column_layout(nodes: &[NarrativeNode], expansion: &ExpansionState) -> ColumnLayout {
    let index = NodeIndex::new(nodes);
    let mut reachable: HashSet<&NodeId> = HashSet::new();
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut entries = Vec::new();

    let mut stray: Vec<&NarrativeNode> = nodes.iter().collect();
    stray.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    for start in index.roots().into_iter().chain(stray) {
        if reachable.contains(&start.id) {
            continue;
        }
        mark_reachable(&index, start, &mut reachable);
        walk(&index, start, expansion, &mut visited, &mut entries);
    }

    ColumnLayout { entries }
}

/// Records `start` and everything below it, expanded or not.
fn mark_reachable<'a>(
    index: &NodeIndex<'a>,
    start: &'a NarrativeNode,
    reachable: &mut HashSet<&'a NodeId>,
) {
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if reachable.insert(&node.id) {
            stack.extend(index.children(node));
        }
    }
}

fn walk<'a>(
    index: &NodeIndex<'a>,
    start: &'a NarrativeNode,
    expansion: &ExpansionState,
    visited: &mut HashSet<&'a NodeId>,
    entries: &mut Vec<ColumnEntry>,
) {
    // Explicit stack of (node, depth); children pushed in reverse to keep order.
    let mut stack: Vec<(&NarrativeNode, usize)> = vec![(start, 0)];

    while let Some((node, depth_level)) = stack.pop() {
        if !visited.insert(&node.id) {
            continue;
        }

        let children = index.children(node);
        let expanded = expansion.is_expanded(&node.id);
        entries.push(ColumnEntry {
            node_id: node.id.clone(),
            depth_level,
            column_position: entries.len(),
            column_span: 1,
            expanded,
            has_children: !children.is_empty(),
        });

        if expanded {
            stack.extend(
                children
                    .into_iter()
                    .rev()
                    .filter(|child| !visited.contains(&child.id))
                    .map(|child| (child, depth_level + 1)),
            );
        }
    }
}
