//! PlotCanvas entity - The node forest of one book version's planning board
//!
//! Hierarchy membership only changes through the explicit edits here
//! (`insert`, `attach_child`, `detach`, `remove`), which keep `parent_id`
//! and `child_ids` in agreement. Stored boards may still be inconsistent, so
//! every query tolerates dangling references and cycles: unknown parents make
//! a node a root, and each walk visits a node at most once.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::NodeId;

use super::narrative_node::NarrativeNode;

/// A book version's planning board
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotCanvas {
    #[serde(default)]
    pub nodes: Vec<NarrativeNode>,
}

/// A broken parent/child agreement found by [`PlotCanvas::check_consistency`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyViolation {
    /// `parent` lists a child id that does not exist
    MissingChild { parent: NodeId, child: NodeId },
    /// `parent` lists `child`, but the child points elsewhere
    ChildDisowned {
        parent: NodeId,
        child: NodeId,
        actual_parent: Option<NodeId>,
    },
    /// `node` names a parent that does not exist
    MissingParent { node: NodeId, parent: NodeId },
    /// `node` names `parent`, but the parent does not list it
    NotListedByParent { node: NodeId, parent: NodeId },
    /// Following `parent_id` from `node` comes back to `node`
    ParentCycle { node: NodeId },
}

/// Read-only lookup over a node slice.
///
/// Built once per derivation; all hierarchy walks go through it.
pub struct NodeIndex<'a> {
    nodes: &'a [NarrativeNode],
    by_id: HashMap<&'a NodeId, &'a NarrativeNode>,
}

impl<'a> NodeIndex<'a> {
    pub fn new(nodes: &'a [NarrativeNode]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            // First occurrence wins for duplicated ids
            by_id.entry(&node.id).or_insert(node);
        }
        Self { nodes, by_id }
    }

    pub fn nodes(&self) -> &'a [NarrativeNode] {
        self.nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<&'a NarrativeNode> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.by_id.contains_key(id)
    }

    /// The parent node, if `parent_id` resolves.
    pub fn parent_of(&self, node: &NarrativeNode) -> Option<&'a NarrativeNode> {
        node.parent_id.as_ref().and_then(|id| self.get(id))
    }

    /// Whether the node is treated as a root: no parent, or a dangling one.
    pub fn is_effective_root(&self, node: &NarrativeNode) -> bool {
        self.parent_of(node).is_none()
    }

    /// Effective roots, top to bottom by `position.y`. Ties keep input order.
    pub fn roots(&self) -> Vec<&'a NarrativeNode> {
        let mut roots: Vec<_> = self
            .nodes
            .iter()
            .filter(|node| self.is_effective_root(node))
            .collect();
        roots.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
        roots
    }

    /// Direct children in `child_ids` order, skipping ids that do not resolve.
    pub fn children(&self, node: &NarrativeNode) -> Vec<&'a NarrativeNode> {
        node.child_ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Parent chain from nearest to farthest. Stops at a dangling parent or
    /// when the chain loops.
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut visited: HashSet<&NodeId> = HashSet::new();
        visited.insert(id);

        let mut current = self.get(id);
        while let Some(parent) = current.and_then(|node| self.parent_of(node)) {
            if !visited.insert(&parent.id) {
                break;
            }
            ancestors.push(parent.id.clone());
            current = Some(parent);
        }
        ancestors
    }

    /// All nodes below `id`, depth-first pre-order, each at most once.
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        let Some(start) = self.get(id) else {
            return descendants;
        };

        let mut visited: HashSet<&NodeId> = HashSet::new();
        visited.insert(&start.id);
        let mut stack: Vec<&NarrativeNode> = self.children(start).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !visited.insert(&node.id) {
                continue;
            }
            descendants.push(node.id.clone());
            stack.extend(self.children(node).into_iter().rev());
        }
        descendants
    }

    /// Nodes sharing this node's (non-null) parent id, excluding itself.
    pub fn siblings(&self, id: &NodeId) -> Vec<NodeId> {
        let Some(parent_id) = self.get(id).and_then(|node| node.parent_id.as_ref()) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|node| node.parent_id.as_ref() == Some(parent_id) && &node.id != id)
            .map(|node| node.id.clone())
            .collect()
    }

    /// Act nodes top to bottom by `position.y`. Ties keep input order.
    pub fn acts_in_order(&self) -> Vec<&'a NarrativeNode> {
        acts_in_order(self.nodes)
    }
}

/// Act nodes top to bottom by `position.y`. Ties keep input order.
pub fn acts_in_order(nodes: &[NarrativeNode]) -> Vec<&NarrativeNode> {
    let mut acts: Vec<_> = nodes.iter().filter(|node| node.is_act()).collect();
    acts.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));
    acts
}

impl PlotCanvas {
    pub fn new(nodes: Vec<NarrativeNode>) -> Self {
        Self { nodes }
    }

    pub fn index(&self) -> NodeIndex<'_> {
        NodeIndex::new(&self.nodes)
    }

    pub fn get(&self, id: &NodeId) -> Option<&NarrativeNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    fn get_mut(&mut self, id: &NodeId) -> Option<&mut NarrativeNode> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        self.index().ancestors(id)
    }

    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        self.index().descendants(id)
    }

    pub fn siblings(&self, id: &NodeId) -> Vec<NodeId> {
        self.index().siblings(id)
    }

    pub fn acts_in_order(&self) -> Vec<&NarrativeNode> {
        acts_in_order(&self.nodes)
    }

    /// First outline node on the board, the conventional parent for new acts.
    pub fn outline(&self) -> Option<&NarrativeNode> {
        self.nodes
            .iter()
            .find(|node| node.node_type() == super::narrative_node::NodeType::Outline)
    }

    /// Add a node. If its `parent_id` resolves, the parent lists it as its last child.
    pub fn insert(&mut self, node: NarrativeNode) -> Result<(), DomainError> {
        if self.contains(&node.id) {
            return Err(DomainError::constraint(format!(
                "node {} already exists on the board",
                node.id
            )));
        }

        let node_id = node.id.clone();
        let parent_id = node.parent_id.clone();
        self.nodes.push(node);

        if let Some(parent) = parent_id.as_ref().and_then(|id| self.get_mut(id)) {
            if !parent.child_ids.contains(&node_id) {
                parent.child_ids.push(node_id);
            }
        }
        Ok(())
    }

    /// Make `child` the last child of `parent`, detaching it from any previous parent.
    pub fn attach_child(&mut self, parent_id: &NodeId, child_id: &NodeId) -> Result<(), DomainError> {
        if parent_id == child_id {
            return Err(DomainError::constraint(format!(
                "node {} cannot be its own parent",
                child_id
            )));
        }
        if !self.contains(parent_id) {
            return Err(DomainError::not_found("NarrativeNode", parent_id.as_str()));
        }
        if !self.contains(child_id) {
            return Err(DomainError::not_found("NarrativeNode", child_id.as_str()));
        }
        if self.ancestors(parent_id).contains(child_id) {
            return Err(DomainError::constraint(format!(
                "attaching {} under {} would create a cycle",
                child_id, parent_id
            )));
        }

        self.detach(child_id)?;

        if let Some(parent) = self.get_mut(parent_id) {
            parent.child_ids.push(child_id.clone());
        }
        if let Some(child) = self.get_mut(child_id) {
            child.parent_id = Some(parent_id.clone());
        }
        Ok(())
    }

    /// Turn `child` into a root. No-op for nodes that already are roots.
    pub fn detach(&mut self, child_id: &NodeId) -> Result<(), DomainError> {
        let child = self
            .get_mut(child_id)
            .ok_or_else(|| DomainError::not_found("NarrativeNode", child_id.as_str()))?;
        let previous = child.parent_id.take();

        if let Some(parent) = previous.as_ref().and_then(|id| self.get_mut(id)) {
            parent.child_ids.retain(|id| id != child_id);
        }
        Ok(())
    }

    /// Remove a node. Its children become roots and every reference to it is dropped.
    pub fn remove(&mut self, id: &NodeId) -> Result<NarrativeNode, DomainError> {
        let position = self
            .nodes
            .iter()
            .position(|node| &node.id == id)
            .ok_or_else(|| DomainError::not_found("NarrativeNode", id.as_str()))?;
        let removed = self.nodes.remove(position);

        for node in &mut self.nodes {
            node.child_ids.retain(|child| child != id);
            node.linked_node_ids.retain(|linked| linked != id);
            if node.parent_id.as_ref() == Some(id) {
                node.parent_id = None;
            }
        }
        Ok(removed)
    }

    /// Every broken parent/child agreement on the board. Empty when consistent.
    pub fn check_consistency(&self) -> Vec<HierarchyViolation> {
        let index = self.index();
        let mut violations = Vec::new();

        for node in &self.nodes {
            for child_id in &node.child_ids {
                match index.get(child_id) {
                    None => violations.push(HierarchyViolation::MissingChild {
                        parent: node.id.clone(),
                        child: child_id.clone(),
                    }),
                    Some(child) if child.parent_id.as_ref() != Some(&node.id) => {
                        violations.push(HierarchyViolation::ChildDisowned {
                            parent: node.id.clone(),
                            child: child_id.clone(),
                            actual_parent: child.parent_id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            if let Some(parent_id) = &node.parent_id {
                match index.get(parent_id) {
                    None => violations.push(HierarchyViolation::MissingParent {
                        node: node.id.clone(),
                        parent: parent_id.clone(),
                    }),
                    Some(parent) if !parent.child_ids.contains(&node.id) => {
                        violations.push(HierarchyViolation::NotListedByParent {
                            node: node.id.clone(),
                            parent: parent_id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            if parent_chain_loops(&index, node) {
                violations.push(HierarchyViolation::ParentCycle {
                    node: node.id.clone(),
                });
            }
        }
        violations
    }

    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_empty()
    }
}

fn parent_chain_loops(index: &NodeIndex<'_>, start: &NarrativeNode) -> bool {
    let mut visited: HashSet<&NodeId> = HashSet::new();
    let mut current = index.parent_of(start);
    while let Some(node) = current {
        if node.id == start.id {
            return true;
        }
        if !visited.insert(&node.id) {
            // Loops further up, not through `start`
            return false;
        }
        current = index.parent_of(node);
    }
    false
}
