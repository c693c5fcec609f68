//! Screen-time analysis: how strongly an entity appears across scenes.

use serde::{Deserialize, Serialize};

use crate::common::{contains_ignore_case, none_if_blank};
use crate::entities::{NarrativeNode, NodeKind, ScenePayload};
use crate::ids::{CharacterId, LocationId, LoreId, ObjectId};

/// Share of scenes an entity must lead to rank as [`PresenceTier::Primary`]
const PRIMARY_SHARE: f64 = 0.3;
/// Share of scenes an entity must support to rank as [`PresenceTier::Supporting`]
const SUPPORTING_SHARE: f64 = 0.2;

/// An entity that scenes can reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum EntityRef {
    Character(CharacterId),
    Location(LocationId),
    Object(ObjectId),
    Lore(LoreId),
}

impl EntityRef {
    /// Position of the entity in the scene's matching reference list.
    fn rank_in(&self, scene: &ScenePayload) -> Option<usize> {
        match self {
            Self::Character(id) => scene.characters.iter().position(|c| c == id),
            Self::Location(id) => scene.worlds.iter().position(|l| l == id),
            Self::Object(id) => scene.objects.iter().position(|o| o == id),
            Self::Lore(id) => scene.lore.iter().position(|l| l == id),
        }
    }
}

/// One heat-map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Primary,
    Supporting,
    Mentioned,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceTier {
    Primary,
    Major,
    Supporting,
    Minor,
    MentionedOnly,
    Absent,
}

impl std::fmt::Display for PresenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Primary => "Primary",
            Self::Major => "Major",
            Self::Supporting => "Supporting",
            Self::Minor => "Minor",
            Self::MentionedOnly => "Mentioned Only",
            Self::Absent => "Absent",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSummary {
    pub percentage: u32,
    pub tier: PresenceTier,
    pub primary: usize,
    pub supporting: usize,
    pub mentioned: usize,
    pub absent: usize,
    pub total: usize,
}

impl PresenceSummary {
    fn tally(counts: [usize; 4]) -> Self {
        let [primary, supporting, mentioned, absent] = counts;
        let total = primary + supporting + mentioned + absent;
        let present = primary + supporting + mentioned;

        let percentage = if total == 0 {
            0
        } else {
            (present as f64 * 100.0 / total as f64).round() as u32
        };

        let share = |count: usize| count as f64 / total.max(1) as f64;
        let tier = if primary > 0 {
            if share(primary) >= PRIMARY_SHARE {
                PresenceTier::Primary
            } else {
                PresenceTier::Major
            }
        } else if supporting > 0 {
            if share(supporting) >= SUPPORTING_SHARE {
                PresenceTier::Supporting
            } else {
                PresenceTier::Minor
            }
        } else if mentioned > 0 {
            PresenceTier::MentionedOnly
        } else {
            PresenceTier::Absent
        };

        Self {
            percentage,
            tier,
            primary,
            supporting,
            mentioned,
            absent,
            total,
        }
    }
}

/// Presence of `entity` in a single node. Only scenes reference entities;
/// every other kind is [`Presence::Absent`].
///
/// Listed first in the scene's matching list counts as primary, listed
/// anywhere else as supporting. Otherwise the display name appearing in the
/// scene description (ignoring case) counts as a mention.
pub fn presence_in_node(node: &NarrativeNode, entity: &EntityRef, display_name: &str) -> Presence {
    let NodeKind::Scene(scene) = &node.kind else {
        return Presence::Absent;
    };

    match entity.rank_in(scene) {
        Some(0) => Presence::Primary,
        Some(_) => Presence::Supporting,
        None => match none_if_blank(display_name) {
            Some(name) if contains_ignore_case(&scene.description, name.trim()) => {
                Presence::Mentioned
            }
            _ => Presence::Absent,
        },
    }
}

/// Aggregate presence of `entity` over the scene nodes in `nodes`.
pub fn analyze_presence(
    nodes: &[NarrativeNode],
    entity: &EntityRef,
    display_name: &str,
) -> PresenceSummary {
    let mut counts = [0usize; 4];
    for node in nodes.iter().filter(|node| matches!(node.kind, NodeKind::Scene(_))) {
        let slot = match presence_in_node(node, entity, display_name) {
            Presence::Primary => 0,
            Presence::Supporting => 1,
            Presence::Mentioned => 2,
            Presence::Absent => 3,
        };
        counts[slot] += 1;
    }
    PresenceSummary::tally(counts)
}
