//! Chapter/act navigation for the manuscript progress bar.
//!
//! Buckets a version's chapters into acts, either from the act nodes on the
//! planning board or, when the board has none, into a default three-act
//! split. Pure and total: every input shape produces a value.

use serde::Serialize;

use crate::common::none_if_blank;
use crate::entities::{acts_in_order, sort_by_position, sorted_by_position, Chapter, NarrativeNode};

const DEFAULT_ACT_COUNT: usize = 3;
const ROMAN_NUMERALS: [&str; 10] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];

/// An act with its chapters, derived per call and never persisted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActWithChapters {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Planning node the act was derived from; `None` for synthesized acts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NarrativeNode>,
    /// Sorted by chapter position
    pub chapters: Vec<Chapter>,
    /// Ordinal of the act itself
    pub position: usize,
}

impl ActWithChapters {
    fn synthesized(id: &str, name: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
            description: None,
            node: None,
            chapters: Vec::new(),
            position,
        }
    }

    pub fn contains(&self, chapter: &Chapter) -> bool {
        self.chapters.iter().any(|c| c.id == chapter.id)
    }

    pub fn completed_chapters(&self) -> usize {
        self.chapters.iter().filter(|c| c.is_complete).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNavigationData {
    pub acts: Vec<ActWithChapters>,
    pub total_chapters: usize,
    pub completed_chapters: usize,
    /// In `[0, 100]`; 0 for an empty manuscript
    pub completion_percentage: f64,
    /// Act holding the current chapter
    pub current_act_index: Option<usize>,
    /// Index of the current chapter in the input slice, not within its act
    pub current_chapter_index: Option<usize>,
}

impl ChapterNavigationData {
    /// What the progress bar shows before a book version is open.
    pub fn empty() -> Self {
        Self {
            acts: Vec::new(),
            total_chapters: 0,
            completed_chapters: 0,
            completion_percentage: 0.0,
            current_act_index: None,
            current_chapter_index: None,
        }
    }

    pub fn current_act(&self) -> Option<&ActWithChapters> {
        self.current_act_index.and_then(|i| self.acts.get(i))
    }
}

/// Organize `chapters` into acts.
///
/// Without act nodes (`narrative_nodes` absent, or containing no act) the
/// chapters are split into "Act I", "Act II", "Act III" by contiguous runs of
/// `ceil(n / 3)`, with any overflow clamped into the third act.
///
/// With act nodes, acts follow the nodes top to bottom by `position.y`, each
/// holding the chapters linked to it. Chapters whose `linked_act` is missing
/// or unknown go to the first act.
pub fn build_chapter_navigation(
    chapters: &[Chapter],
    narrative_nodes: Option<&[NarrativeNode]>,
    current_chapter: Option<&Chapter>,
) -> ChapterNavigationData {
    let act_nodes = narrative_nodes.map(acts_in_order).unwrap_or_default();

    let acts = if act_nodes.is_empty() {
        default_acts(chapters)
    } else {
        acts_from_nodes(chapters, &act_nodes)
    };

    let total_chapters = chapters.len();
    let completed_chapters = chapters.iter().filter(|c| c.is_complete).count();
    let completion_percentage = if total_chapters > 0 {
        completed_chapters as f64 / total_chapters as f64 * 100.0
    } else {
        0.0
    };

    let (current_act_index, current_chapter_index) = match current_chapter {
        Some(current) => (
            acts.iter().position(|act| act.contains(current)),
            chapters.iter().position(|c| c.id == current.id),
        ),
        None => (None, None),
    };

    ChapterNavigationData {
        acts,
        total_chapters,
        completed_chapters,
        completion_percentage,
        current_act_index,
        current_chapter_index,
    }
}

fn default_acts(chapters: &[Chapter]) -> Vec<ActWithChapters> {
    let mut acts = vec![
        ActWithChapters::synthesized("act-1", "Act I", 0),
        ActWithChapters::synthesized("act-2", "Act II", 1),
        ActWithChapters::synthesized("act-3", "Act III", 2),
    ];

    let sorted = sorted_by_position(chapters);
    let per_act = sorted.len().div_ceil(DEFAULT_ACT_COUNT).max(1);
    for (index, chapter) in sorted.into_iter().enumerate() {
        let target = (index / per_act).min(DEFAULT_ACT_COUNT - 1);
        acts[target].chapters.push(chapter);
    }
    acts
}

fn acts_from_nodes(chapters: &[Chapter], act_nodes: &[&NarrativeNode]) -> Vec<ActWithChapters> {
    let mut acts: Vec<ActWithChapters> = act_nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let name = none_if_blank(node.title())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Act {}", index + 1));
            let mut act_chapters: Vec<Chapter> = chapters
                .iter()
                .filter(|c| c.is_linked_to(&node.id))
                .cloned()
                .collect();
            sort_by_position(&mut act_chapters);

            ActWithChapters {
                id: node.id.to_string(),
                name,
                description: Some(node.description().to_string()),
                node: Some((*node).clone()),
                chapters: act_chapters,
                position: index,
            }
        })
        .collect();

    let orphans: Vec<Chapter> = chapters
        .iter()
        .filter(|c| match &c.linked_act {
            Some(act_id) => !act_nodes.iter().any(|node| &node.id == act_id),
            None => true,
        })
        .cloned()
        .collect();

    if !orphans.is_empty() {
        match acts.first_mut() {
            Some(first) => {
                first.chapters.extend(orphans);
                sort_by_position(&mut first.chapters);
            }
            None => {
                // Unreachable while act_nodes is non-empty; kept so the
                // every-chapter-in-one-act guarantee holds regardless.
                let mut fallback = ActWithChapters::synthesized("default-act", "Act I", 0);
                fallback.description = Some("Default act for chapters".to_string());
                fallback.chapters = orphans;
                sort_by_position(&mut fallback.chapters);
                acts.push(fallback);
            }
        }
    }
    acts
}

/// The chapter after `current` in position order.
///
/// Without a current chapter this returns the first chapter of the slice as
/// given (not sorted), mirroring how the editor opens a book. `None` at the
/// end or when `current` is not in the list.
pub fn next_chapter<'a>(chapters: &'a [Chapter], current: Option<&Chapter>) -> Option<&'a Chapter> {
    let Some(current) = current else {
        return chapters.first();
    };

    let sorted = sorted_refs(chapters);
    let index = sorted.iter().position(|c| c.id == current.id)?;
    sorted.get(index + 1).copied()
}

/// The chapter before `current` in position order. Always `None` without a
/// current chapter, at the start, or when `current` is not in the list.
pub fn previous_chapter<'a>(
    chapters: &'a [Chapter],
    current: Option<&Chapter>,
) -> Option<&'a Chapter> {
    let current = current?;

    let sorted = sorted_refs(chapters);
    let index = sorted.iter().position(|c| c.id == current.id)?;
    index.checked_sub(1).and_then(|i| sorted.get(i).copied())
}

fn sorted_refs(chapters: &[Chapter]) -> Vec<&Chapter> {
    let mut sorted: Vec<&Chapter> = chapters.iter().collect();
    sorted.sort_by_key(|c| c.position);
    sorted
}

/// Display name for an act: the node's title, else "Act <roman>" for the
/// 1-based `fallback_index`. Numerals stop at X.
pub fn act_name(act_node: Option<&NarrativeNode>, fallback_index: usize) -> String {
    if let Some(title) = act_node.and_then(|node| none_if_blank(node.title())) {
        return title.to_string();
    }

    let numeral_index = fallback_index.saturating_sub(1).min(ROMAN_NUMERALS.len() - 1);
    format!("Act {}", ROMAN_NUMERALS[numeral_index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NodeKind, NodeType, PlanPayload};
    use crate::ids::ChapterId;

    fn chapter(id: &str, position: i64) -> Chapter {
        Chapter::new(id, position)
    }

    fn act_node(id: &str, title: &str, y: f64) -> NarrativeNode {
        NarrativeNode::new(
            id,
            NodeKind::Act(PlanPayload {
                title: title.to_string(),
                description: format!("{} description", id),
                ..Default::default()
            }),
        )
        .at_y(y)
    }

    fn chapter_ids(act: &ActWithChapters) -> Vec<&str> {
        act.chapters.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_default_mode_one_chapter_per_act() {
        let chapters = vec![chapter("c1", 0), chapter("c2", 1), chapter("c3", 2)];

        let nav = build_chapter_navigation(&chapters, None, None);

        let names: Vec<_> = nav.acts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Act I", "Act II", "Act III"]);
        assert_eq!(chapter_ids(&nav.acts[0]), vec!["c1"]);
        assert_eq!(chapter_ids(&nav.acts[1]), vec!["c2"]);
        assert_eq!(chapter_ids(&nav.acts[2]), vec!["c3"]);
        assert!(nav.acts.iter().all(|a| a.node.is_none()));
    }

    #[test]
    fn test_default_mode_places_every_chapter_exactly_once() {
        for n in 0..=20 {
            let chapters: Vec<_> = (0..n)
                .rev()
                .map(|i| chapter(&format!("c{}", i), i as i64 * 10))
                .collect();

            let nav = build_chapter_navigation(&chapters, None, None);

            assert_eq!(nav.acts.len(), 3);
            let placed: usize = nav.acts.iter().map(|a| a.chapters.len()).sum();
            assert_eq!(placed, n);
            for c in &chapters {
                assert_eq!(nav.acts.iter().filter(|a| a.contains(c)).count(), 1);
            }
        }
    }

    #[test]
    fn test_default_mode_uses_ceil_chunks_and_sorts() {
        let chapters: Vec<_> = [5, 3, 1, 4, 2]
            .into_iter()
            .map(|p| chapter(&format!("c{}", p), p))
            .collect();

        let nav = build_chapter_navigation(&chapters, None, None);

        assert_eq!(chapter_ids(&nav.acts[0]), vec!["c1", "c2"]);
        assert_eq!(chapter_ids(&nav.acts[1]), vec!["c3", "c4"]);
        assert_eq!(chapter_ids(&nav.acts[2]), vec!["c5"]);
    }

    #[test]
    fn test_nodes_without_acts_fall_back_to_default_mode() {
        let nodes = vec![NarrativeNode::new(
            "outline",
            NodeKind::placeholder(NodeType::Outline),
        )];
        let chapters = vec![chapter("c1", 0)];

        let nav = build_chapter_navigation(&chapters, Some(&nodes), None);

        assert_eq!(nav.acts.len(), 3);
        assert_eq!(nav.acts[0].id, "act-1");
    }

    #[test]
    fn test_narrative_mode_single_linked_act() {
        let nodes = vec![act_node("actX", "Rising Action", 0.0)];
        let c1 = chapter("c1", 0).with_linked_act("actX");
        let chapters = vec![c1.clone()];

        let nav = build_chapter_navigation(&chapters, Some(&nodes), Some(&c1));

        assert_eq!(nav.acts.len(), 1);
        assert_eq!(nav.acts[0].name, "Rising Action");
        assert_eq!(chapter_ids(&nav.acts[0]), vec!["c1"]);
        assert_eq!(nav.current_act_index, Some(0));
        assert_eq!(nav.current_chapter_index, Some(0));
    }

    #[test]
    fn test_narrative_mode_orders_acts_by_y_and_names_untitled() {
        let nodes = vec![
            act_node("late", "", 300.0),
            act_node("early", "Setup", 100.0),
        ];
        let chapters = vec![
            chapter("c2", 2).with_linked_act("late"),
            chapter("c1", 1).with_linked_act("early"),
        ];

        let nav = build_chapter_navigation(&chapters, Some(&nodes), None);

        assert_eq!(nav.acts[0].id, "early");
        assert_eq!(nav.acts[0].name, "Setup");
        assert_eq!(nav.acts[1].name, "Act 2");
        assert_eq!(nav.acts[1].position, 1);
        assert_eq!(
            nav.acts[1].description.as_deref(),
            Some("late description")
        );
    }

    #[test]
    fn test_orphans_join_first_act_in_position_order() {
        let nodes = vec![act_node("a1", "One", 0.0), act_node("a2", "Two", 10.0)];
        let chapters = vec![
            chapter("linked", 5).with_linked_act("a1"),
            chapter("unlinked", 1),
            chapter("dangling", 9).with_linked_act("gone"),
            chapter("second", 3).with_linked_act("a2"),
        ];

        let nav = build_chapter_navigation(&chapters, Some(&nodes), None);

        assert_eq!(chapter_ids(&nav.acts[0]), vec!["unlinked", "linked", "dangling"]);
        assert_eq!(chapter_ids(&nav.acts[1]), vec!["second"]);
        let placed: usize = nav.acts.iter().map(|a| a.chapters.len()).sum();
        assert_eq!(placed, chapters.len());
    }

    #[test]
    fn test_statistics_and_percentage_bounds() {
        let empty = build_chapter_navigation(&[], None, None);
        assert_eq!(empty.total_chapters, 0);
        assert_eq!(empty.completion_percentage, 0.0);
        assert!(empty.completion_percentage.is_finite());

        let chapters = vec![
            chapter("c1", 0).completed(),
            chapter("c2", 1),
            chapter("c3", 2).completed(),
            chapter("c4", 3),
        ];
        let nav = build_chapter_navigation(&chapters, None, None);
        assert_eq!(nav.completed_chapters, 2);
        assert_eq!(nav.completion_percentage, 50.0);
        assert!((0.0..=100.0).contains(&nav.completion_percentage));
    }

    #[test]
    fn test_current_indices_use_flat_input_order() {
        let chapters = vec![chapter("c3", 2), chapter("c1", 0), chapter("c2", 1)];
        let current = chapters[0].clone();

        let nav = build_chapter_navigation(&chapters, None, Some(&current));

        assert_eq!(nav.current_chapter_index, Some(0));
        assert_eq!(nav.current_act_index, Some(2));
        assert_eq!(nav.current_act().map(|a| a.name.as_str()), Some("Act III"));
    }

    #[test]
    fn test_unknown_current_chapter_has_no_indices() {
        let chapters = vec![chapter("c1", 0)];
        let stranger = chapter("zz", 0);

        let nav = build_chapter_navigation(&chapters, None, Some(&stranger));

        assert_eq!(nav.current_act_index, None);
        assert_eq!(nav.current_chapter_index, None);
    }

    #[test]
    fn test_empty_navigation_has_no_acts() {
        let nav = ChapterNavigationData::empty();
        assert!(nav.acts.is_empty());
        assert!(nav.current_act().is_none());
    }

    #[test]
    fn test_next_and_previous_walk_position_order() {
        let chapters = vec![chapter("c2", 20), chapter("c1", 10), chapter("c3", 30)];
        let c1 = &chapters[1];
        let c2 = &chapters[0];
        let c3 = &chapters[2];

        assert_eq!(next_chapter(&chapters, Some(c1)).map(|c| &c.id), Some(&c2.id));
        assert_eq!(next_chapter(&chapters, Some(c3)), None);
        assert_eq!(previous_chapter(&chapters, Some(c2)).map(|c| &c.id), Some(&c1.id));
        assert_eq!(previous_chapter(&chapters, Some(c1)), None);
    }

    #[test]
    fn test_next_and_previous_are_inverse_on_interior_chapters() {
        let chapters: Vec<_> = [7, 2, 9, 4, 1]
            .into_iter()
            .map(|p| chapter(&format!("c{}", p), p))
            .collect();

        for a in &chapters {
            if let Some(b) = next_chapter(&chapters, Some(a)) {
                assert_eq!(previous_chapter(&chapters, Some(b)).map(|c| &c.id), Some(&a.id));
            }
        }
    }

    #[test]
    fn test_next_without_current_returns_first_given_previous_returns_none() {
        let chapters = vec![chapter("c2", 2), chapter("c1", 1)];

        assert_eq!(
            next_chapter(&chapters, None).map(|c| c.id.clone()),
            Some(ChapterId::from("c2"))
        );
        assert_eq!(previous_chapter(&chapters, None), None);
        assert_eq!(next_chapter(&[], None), None);
    }

    #[test]
    fn test_neighbours_of_unknown_chapter_are_none() {
        let chapters = vec![chapter("c1", 1), chapter("c2", 2)];
        let stranger = chapter("zz", 1);

        assert_eq!(next_chapter(&chapters, Some(&stranger)), None);
        assert_eq!(previous_chapter(&chapters, Some(&stranger)), None);
    }

    #[test]
    fn test_act_name_prefers_title() {
        let node = act_node("a", "The Descent", 0.0);
        assert_eq!(act_name(Some(&node), 4), "The Descent");
    }

    #[test]
    fn test_act_name_roman_fallback_clamps_at_ten() {
        let untitled = act_node("a", "  ", 0.0);
        assert_eq!(act_name(Some(&untitled), 2), "Act II");
        assert_eq!(act_name(None, 1), "Act I");
        assert_eq!(act_name(None, 0), "Act I");
        assert_eq!(act_name(None, 10), "Act X");
        assert_eq!(act_name(None, 14), "Act X");
    }
}
