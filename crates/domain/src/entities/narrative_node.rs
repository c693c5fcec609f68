//! NarrativeNode entity - Typed entries on a book's planning board
//!
//! Nodes form a forest through `parent_id`/`child_ids` (outline -> act ->
//! chapter -> scene). Arc nodes (character, location, object, lore) usually
//! hang off the outline or float as roots. `linked_node_ids` are free
//! cross-references and never take part in the tree.
//!
//! The payload is a closed sum over the eight node kinds; the `type` tag picks
//! which payload shape is valid. On the wire this matches the stored board
//! format:
//!
//! ```json
//! { "id": "act-1", "type": "act", "status": "in-progress",
//!   "position": { "x": -300, "y": 200 }, "parentId": "outline-1",
//!   "childIds": [], "linkedNodeIds": [],
//!   "data": { "title": "Rising Action", "description": "", "goal": "", "timelineEventIds": [] } }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ids::{CharacterId, LocationId, LoreId, NodeId, ObjectId, TimelineEventId};

// =============================================================================
// Vocabulary
// =============================================================================

/// Discriminant of [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Outline,
    Act,
    Chapter,
    Scene,
    CharacterArc,
    LocationArc,
    ObjectArc,
    LoreArc,
}

impl NodeType {
    pub const ALL: [NodeType; 8] = [
        Self::Outline,
        Self::Act,
        Self::Chapter,
        Self::Scene,
        Self::CharacterArc,
        Self::LocationArc,
        Self::ObjectArc,
        Self::LoreArc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::Act => "act",
            Self::Chapter => "chapter",
            Self::Scene => "scene",
            Self::CharacterArc => "character-arc",
            Self::LocationArc => "location-arc",
            Self::ObjectArc => "object-arc",
            Self::LoreArc => "lore-arc",
        }
    }

    /// Arc nodes track an entity across the story rather than a slice of it.
    pub fn is_arc(&self) -> bool {
        matches!(
            self,
            Self::CharacterArc | Self::LocationArc | Self::ObjectArc | Self::LoreArc
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown node type: {}", s)))
    }
}

/// Writing progress of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    #[default]
    NotCompleted,
    InProgress,
    Completed,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCompleted => write!(f, "not-completed"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for NodeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not-completed" => Ok(Self::NotCompleted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::parse(format!("Unknown node status: {}", s))),
        }
    }
}

/// Importance of a character arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcType {
    Main,
    #[default]
    Secondary,
    Background,
}

/// 2-D placement on the board. A layout hint, never an order key, except that
/// acts and roots are read top to bottom by `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

impl CanvasPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Payload shared by outline, act and chapter nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanPayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub timeline_event_ids: Vec<TimelineEventId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenePayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    /// Display label of the chapter the scene is drafted in
    pub chapter: String,
    /// Participating characters, point-of-view character first
    pub characters: Vec<CharacterId>,
    /// Locations the scene takes place in, main setting first
    pub worlds: Vec<LocationId>,
    pub objects: Vec<ObjectId>,
    pub lore: Vec<LoreId>,
    pub timeline_event_ids: Vec<TimelineEventId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterArcPayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub character_id: Option<CharacterId>,
    pub arc_type: ArcType,
    pub emotional_journey: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationArcPayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub location_id: Option<LocationId>,
    pub timeline_event_ids: Vec<TimelineEventId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectArcPayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub object_id: Option<ObjectId>,
    pub timeline_event_ids: Vec<TimelineEventId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoreArcPayload {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub lore_id: Option<LoreId>,
    pub timeline_event_ids: Vec<TimelineEventId>,
}

/// Kind-specific content of a node, tagged by `type` with the payload under `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum NodeKind {
    Outline(PlanPayload),
    Act(PlanPayload),
    Chapter(PlanPayload),
    Scene(ScenePayload),
    CharacterArc(CharacterArcPayload),
    LocationArc(LocationArcPayload),
    ObjectArc(ObjectArcPayload),
    LoreArc(LoreArcPayload),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Outline(_) => NodeType::Outline,
            Self::Act(_) => NodeType::Act,
            Self::Chapter(_) => NodeType::Chapter,
            Self::Scene(_) => NodeType::Scene,
            Self::CharacterArc(_) => NodeType::CharacterArc,
            Self::LocationArc(_) => NodeType::LocationArc,
            Self::ObjectArc(_) => NodeType::ObjectArc,
            Self::LoreArc(_) => NodeType::LoreArc,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Outline(p) | Self::Act(p) | Self::Chapter(p) => &p.title,
            Self::Scene(p) => &p.title,
            Self::CharacterArc(p) => &p.title,
            Self::LocationArc(p) => &p.title,
            Self::ObjectArc(p) => &p.title,
            Self::LoreArc(p) => &p.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Outline(p) | Self::Act(p) | Self::Chapter(p) => &p.description,
            Self::Scene(p) => &p.description,
            Self::CharacterArc(p) => &p.description,
            Self::LocationArc(p) => &p.description,
            Self::ObjectArc(p) => &p.description,
            Self::LoreArc(p) => &p.description,
        }
    }

    pub fn goal(&self) -> &str {
        match self {
            Self::Outline(p) | Self::Act(p) | Self::Chapter(p) => &p.goal,
            Self::Scene(p) => &p.goal,
            Self::CharacterArc(p) => &p.goal,
            Self::LocationArc(p) => &p.goal,
            Self::ObjectArc(p) => &p.goal,
            Self::LoreArc(p) => &p.goal,
        }
    }

    /// Timeline events referenced by the payload. `None` for kinds that do not
    /// carry timeline references at all (character arcs).
    pub fn timeline_event_ids(&self) -> Option<&[TimelineEventId]> {
        match self {
            Self::Outline(p) | Self::Act(p) | Self::Chapter(p) => Some(&p.timeline_event_ids),
            Self::Scene(p) => Some(&p.timeline_event_ids),
            Self::CharacterArc(_) => None,
            Self::LocationArc(p) => Some(&p.timeline_event_ids),
            Self::ObjectArc(p) => Some(&p.timeline_event_ids),
            Self::LoreArc(p) => Some(&p.timeline_event_ids),
        }
    }

    /// Placeholder content for a freshly created node of the given type.
    pub fn placeholder(node_type: NodeType) -> Self {
        let plan = |title: &str, description: &str, goal: &str| PlanPayload {
            title: title.to_string(),
            description: description.to_string(),
            goal: goal.to_string(),
            timeline_event_ids: Vec::new(),
        };

        match node_type {
            NodeType::Outline => Self::Outline(plan(
                "New Outline",
                "Click to edit this outline...",
                "Define the overall story structure",
            )),
            NodeType::Act => Self::Act(plan(
                "New Act",
                "Click to edit this act...",
                "Advance the story arc",
            )),
            NodeType::Chapter => Self::Chapter(plan(
                "New Chapter",
                "Click to edit this chapter...",
                "Complete chapter objectives",
            )),
            NodeType::Scene => Self::Scene(ScenePayload {
                title: "New Scene".to_string(),
                description: "Click to edit this scene...".to_string(),
                goal: "Achieve scene purpose".to_string(),
                chapter: "TBD".to_string(),
                ..Default::default()
            }),
            NodeType::CharacterArc => Self::CharacterArc(CharacterArcPayload {
                title: "New Character Arc".to_string(),
                description: "Click to edit this character arc...".to_string(),
                goal: "Develop character growth".to_string(),
                ..Default::default()
            }),
            NodeType::LocationArc => Self::LocationArc(LocationArcPayload {
                title: "New Location Arc".to_string(),
                description: "Click to edit this location arc...".to_string(),
                goal: "Establish location significance".to_string(),
                ..Default::default()
            }),
            NodeType::ObjectArc => Self::ObjectArc(ObjectArcPayload {
                title: "New Object Arc".to_string(),
                description: "Click to edit this object arc...".to_string(),
                goal: "Define object importance".to_string(),
                ..Default::default()
            }),
            NodeType::LoreArc => Self::LoreArc(LoreArcPayload {
                title: "New Lore Arc".to_string(),
                description: "Click to edit this lore arc...".to_string(),
                goal: "Establish lore relevance".to_string(),
                ..Default::default()
            }),
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// A typed entry in the planning hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub position: CanvasPosition,
    /// `None` for roots
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Direct children, in sibling order. Must agree with the children's `parent_id`.
    #[serde(default)]
    pub child_ids: Vec<NodeId>,
    /// Non-hierarchical cross-references
    #[serde(default)]
    pub linked_node_ids: Vec<NodeId>,

    // UI-only flags; no effect on the hierarchy
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_highlighted: Option<bool>,
}

impl NarrativeNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: NodeStatus::default(),
            position: CanvasPosition::default(),
            parent_id: None,
            child_ids: Vec::new(),
            linked_node_ids: Vec::new(),
            is_expanded: false,
            is_muted: None,
            is_visible: None,
            is_highlighted: None,
        }
    }

    /// Create a node of the given type with placeholder content, ready to be
    /// inserted on a canvas. The id is `<type>-<uuid>`.
    pub fn create(node_type: NodeType, parent_id: Option<NodeId>, position: CanvasPosition) -> Self {
        let id = NodeId::from_string(format!("{}-{}", node_type, Uuid::new_v4()));
        let mut node = Self::new(id, NodeKind::placeholder(node_type)).with_position(position);
        node.parent_id = parent_id;
        node
    }

    // Builder methods
    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, position: CanvasPosition) -> Self {
        self.position = position;
        self
    }

    pub fn at_y(mut self, y: f64) -> Self {
        self.position.y = y;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_children<I, T>(mut self, child_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.child_ids = child_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_links<I, T>(mut self, linked: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.linked_node_ids = linked.into_iter().map(Into::into).collect();
        self
    }

    // Read accessors
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn title(&self) -> &str {
        self.kind.title()
    }

    pub fn description(&self) -> &str {
        self.kind.description()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }

    pub fn is_act(&self) -> bool {
        matches!(self.kind, NodeKind::Act(_))
    }
}
