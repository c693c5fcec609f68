//! Chapter entity - One writable unit of the manuscript
//!
//! Chapters are owned by the editor/version subsystem. The planning core only
//! reads them: ordering comes from `position`, act membership from
//! `linked_act` (an act node id on the plot canvas).

use serde::{Deserialize, Serialize};

use crate::ids::{ChapterId, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub title: String,
    /// Manuscript order. Not necessarily contiguous.
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub is_complete: bool,
    /// Act node this chapter belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_act: Option<NodeId>,
}

impl Chapter {
    pub fn new(id: impl Into<ChapterId>, position: i64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            position,
            is_complete: false,
            linked_act: None,
        }
    }

    // Builder methods
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_linked_act(mut self, act_id: impl Into<NodeId>) -> Self {
        self.linked_act = Some(act_id.into());
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_complete = true;
        self
    }

    pub fn is_linked_to(&self, act_id: &NodeId) -> bool {
        self.linked_act.as_ref() == Some(act_id)
    }
}

/// Returns the chapters sorted by `position`. Ties keep input order.
pub fn sorted_by_position(chapters: &[Chapter]) -> Vec<Chapter> {
    let mut sorted = chapters.to_vec();
    sort_by_position(&mut sorted);
    sorted
}

/// Stable in-place sort by `position`.
pub fn sort_by_position(chapters: &mut [Chapter]) {
    chapters.sort_by_key(|chapter| chapter.position);
}
