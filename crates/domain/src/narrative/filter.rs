//! Multi-criteria filtering of planning board nodes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::contains_ignore_case;
use crate::entities::{NarrativeNode, NodeIndex, NodeKind, NodeStatus, NodeType};
use crate::ids::{CharacterId, LocationId, NodeId, ObjectId, TimelineEventId};

/// Allowed values per dimension. An empty set means the dimension is not filtered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NarrativeFilters {
    pub characters: HashSet<CharacterId>,
    pub locations: HashSet<LocationId>,
    pub objects: HashSet<ObjectId>,
    pub timeline_events: HashSet<TimelineEventId>,
    pub node_types: HashSet<NodeType>,
    #[serde(alias = "status")]
    pub statuses: HashSet<NodeStatus>,
}

impl NarrativeFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
            && self.locations.is_empty()
            && self.objects.is_empty()
            && self.timeline_events.is_empty()
            && self.node_types.is_empty()
            && self.statuses.is_empty()
    }

    // Builder methods
    pub fn with_characters<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CharacterId>,
    {
        self.characters = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locations<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LocationId>,
    {
        self.locations = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_objects<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectId>,
    {
        self.objects = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeline_events<I, T>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TimelineEventId>,
    {
        self.timeline_events = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_node_types(mut self, types: impl IntoIterator<Item = NodeType>) -> Self {
        self.node_types = types.into_iter().collect();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = NodeStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Whether `node` passes every non-empty dimension.
    ///
    /// Type and status are read from the node itself. The entity dimensions
    /// read the payload; a node whose kind has no field for a filtered
    /// dimension (a chapter has no characters) does not match it.
    pub fn matches(&self, node: &NarrativeNode) -> bool {
        self.matches_type(node)
            && self.matches_status(node)
            && self.matches_characters(&node.kind)
            && self.matches_locations(&node.kind)
            && self.matches_objects(&node.kind)
            && self.matches_timeline_events(&node.kind)
    }

    fn matches_type(&self, node: &NarrativeNode) -> bool {
        self.node_types.is_empty() || self.node_types.contains(&node.node_type())
    }

    fn matches_status(&self, node: &NarrativeNode) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&node.status)
    }

    fn matches_characters(&self, kind: &NodeKind) -> bool {
        if self.characters.is_empty() {
            return true;
        }
        match kind {
            NodeKind::Scene(scene) => scene.characters.iter().any(|c| self.characters.contains(c)),
            NodeKind::CharacterArc(arc) => arc
                .character_id
                .as_ref()
                .is_some_and(|c| self.characters.contains(c)),
            _ => false,
        }
    }

    fn matches_locations(&self, kind: &NodeKind) -> bool {
        if self.locations.is_empty() {
            return true;
        }
        match kind {
            NodeKind::Scene(scene) => scene.worlds.iter().any(|l| self.locations.contains(l)),
            NodeKind::LocationArc(arc) => arc
                .location_id
                .as_ref()
                .is_some_and(|l| self.locations.contains(l)),
            _ => false,
        }
    }

    fn matches_objects(&self, kind: &NodeKind) -> bool {
        if self.objects.is_empty() {
            return true;
        }
        match kind {
            NodeKind::Scene(scene) => scene.objects.iter().any(|o| self.objects.contains(o)),
            NodeKind::ObjectArc(arc) => arc
                .object_id
                .as_ref()
                .is_some_and(|o| self.objects.contains(o)),
            _ => false,
        }
    }

    fn matches_timeline_events(&self, kind: &NodeKind) -> bool {
        if self.timeline_events.is_empty() {
            return true;
        }
        kind.timeline_event_ids()
            .is_some_and(|ids| ids.iter().any(|e| self.timeline_events.contains(e)))
    }
}

/// Whether the node's title or description contains `query`, ignoring case.
/// A blank query matches everything.
pub fn matches_search(node: &NarrativeNode, query: &str) -> bool {
    let query = query.trim();
    query.is_empty()
        || contains_ignore_case(node.title(), query)
        || contains_ignore_case(node.description(), query)
}

/// Nodes that pass `filters` and `search`, in input order.
pub fn filter_nodes<'a>(
    nodes: &'a [NarrativeNode],
    filters: &NarrativeFilters,
    search: &str,
) -> Vec<&'a NarrativeNode> {
    nodes
        .iter()
        .filter(|node| filters.matches(node) && matches_search(node, search))
        .collect()
}

/// `matches` plus every ancestor of every match, in input order.
///
/// Keeps the path from the roots to each hit on screen, so a matching scene
/// still shows under its chapter and act.
pub fn with_ancestors<'a>(
    nodes: &'a [NarrativeNode],
    matches: &[&NarrativeNode],
) -> Vec<&'a NarrativeNode> {
    let index = NodeIndex::new(nodes);
    let mut keep: HashSet<NodeId> = HashSet::new();
    for node in matches {
        keep.insert(node.id.clone());
        keep.extend(index.ancestors(&node.id));
    }

    nodes.iter().filter(|node| keep.contains(&node.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CharacterArcPayload, LocationArcPayload, ObjectArcPayload, PlanPayload, ScenePayload,
    };

    fn plan(id: &str, kind: fn(PlanPayload) -> NodeKind, title: &str) -> NarrativeNode {
        NarrativeNode::new(
            id,
            kind(PlanPayload {
                title: title.to_string(),
                description: String::new(),
                goal: String::new(),
                timeline_event_ids: vec![TimelineEventId::from("t-battle")],
            }),
        )
    }

    fn scene(id: &str, characters: &[&str], worlds: &[&str], objects: &[&str]) -> NarrativeNode {
        NarrativeNode::new(
            id,
            NodeKind::Scene(ScenePayload {
                title: format!("Scene {}", id),
                description: "Harry waits by the lake".to_string(),
                characters: characters.iter().map(|c| CharacterId::from(*c)).collect(),
                worlds: worlds.iter().map(|w| LocationId::from(*w)).collect(),
                objects: objects.iter().map(|o| ObjectId::from(*o)).collect(),
                ..Default::default()
            }),
        )
    }

    fn board() -> Vec<NarrativeNode> {
        vec![
            plan("outline", NodeKind::Outline, "Philosopher's Stone").with_children(["act-1"]),
            plan("act-1", NodeKind::Act, "Beginnings")
                .with_parent("outline")
                .with_children(["ch-1"])
                .with_status(NodeStatus::InProgress),
            plan("ch-1", NodeKind::Chapter, "The Boy Who Lived")
                .with_parent("act-1")
                .with_children(["s-1", "s-2"]),
            scene("s-1", &["harry", "hagrid"], &["hogwarts"], &["wand"]).with_parent("ch-1"),
            scene("s-2", &["vernon"], &["privet-drive"], &[])
                .with_parent("ch-1")
                .with_status(NodeStatus::Completed),
            NarrativeNode::new(
                "arc-harry",
                NodeKind::CharacterArc(CharacterArcPayload {
                    title: "Harry grows up".to_string(),
                    character_id: Some(CharacterId::from("harry")),
                    ..Default::default()
                }),
            ),
            NarrativeNode::new(
                "arc-hogwarts",
                NodeKind::LocationArc(LocationArcPayload {
                    title: "Hogwarts".to_string(),
                    location_id: Some(LocationId::from("hogwarts")),
                    ..Default::default()
                }),
            ),
            NarrativeNode::new(
                "arc-wand",
                NodeKind::ObjectArc(ObjectArcPayload {
                    title: "The Elder Wand".to_string(),
                    object_id: Some(ObjectId::from("wand")),
                    ..Default::default()
                }),
            ),
        ]
    }

    fn ids<'a>(nodes: &[&'a NarrativeNode]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filters_are_identity() {
        let nodes = board();
        let filtered = filter_nodes(&nodes, &NarrativeFilters::new(), "");
        assert_eq!(filtered.len(), nodes.len());
        assert!(filtered.iter().zip(&nodes).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_node_type_filter_returns_only_that_type() {
        let nodes = board();
        let filters = NarrativeFilters::new().with_node_types([NodeType::Scene]);

        let filtered = filter_nodes(&nodes, &filters, "");

        assert_eq!(ids(&filtered), vec!["s-1", "s-2"]);
        assert!(filtered.iter().all(|n| n.node_type() == NodeType::Scene));
    }

    #[test]
    fn test_status_filter_checks_node_field() {
        let nodes = board();
        let filters = NarrativeFilters::new().with_statuses([NodeStatus::InProgress]);
        assert_eq!(ids(&filter_nodes(&nodes, &filters, "")), vec!["act-1"]);
    }

    #[test]
    fn test_character_filter_matches_scenes_and_character_arcs_only() {
        let nodes = board();
        let filters = NarrativeFilters::new().with_characters(["harry"]);
        assert_eq!(
            ids(&filter_nodes(&nodes, &filters, "")),
            vec!["s-1", "arc-harry"]
        );
    }

    #[test]
    fn test_location_and_object_filters() {
        let nodes = board();

        let by_location = NarrativeFilters::new().with_locations(["hogwarts"]);
        assert_eq!(
            ids(&filter_nodes(&nodes, &by_location, "")),
            vec!["s-1", "arc-hogwarts"]
        );

        let by_object = NarrativeFilters::new().with_objects(["wand"]);
        assert_eq!(
            ids(&filter_nodes(&nodes, &by_object, "")),
            vec!["s-1", "arc-wand"]
        );
    }

    #[test]
    fn test_timeline_filter_excludes_kinds_without_timeline() {
        let nodes = board();
        let filters = NarrativeFilters::new().with_timeline_events(["t-battle"]);
        assert_eq!(
            ids(&filter_nodes(&nodes, &filters, "")),
            vec!["outline", "act-1", "ch-1"]
        );
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let nodes = board();
        let filters = NarrativeFilters::new()
            .with_characters(["harry", "vernon"])
            .with_node_types([NodeType::Scene])
            .with_statuses([NodeStatus::Completed]);
        assert_eq!(ids(&filter_nodes(&nodes, &filters, "")), vec!["s-2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let nodes = board();
        assert_eq!(
            ids(&filter_nodes(&nodes, &NarrativeFilters::new(), "  BOY who ")),
            vec!["ch-1"]
        );
        assert_eq!(
            ids(&filter_nodes(&nodes, &NarrativeFilters::new(), "lake")),
            vec!["s-1", "s-2"]
        );
    }

    #[test]
    fn test_with_ancestors_keeps_path_to_root() {
        let nodes = board();
        let filters = NarrativeFilters::new().with_characters(["vernon"]);
        let hits = filter_nodes(&nodes, &filters, "");

        let context = with_ancestors(&nodes, &hits);

        assert_eq!(ids(&context), vec!["outline", "act-1", "ch-1", "s-2"]);
    }

    #[test]
    fn test_filters_deserialize_from_board_settings() {
        let json = r#"{"characters":["harry"],"nodeTypes":["scene","lore-arc"],"status":["completed"]}"#;
        let filters: NarrativeFilters = serde_json::from_str(json).unwrap();
        assert!(filters.node_types.contains(&NodeType::LoreArc));
        assert!(filters.statuses.contains(&NodeStatus::Completed));
        assert!(filters.locations.is_empty());
        assert!(!filters.is_empty());
    }
}
