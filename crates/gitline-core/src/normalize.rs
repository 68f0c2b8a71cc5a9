#![forbid(unsafe_code)]

//! Flat event log → per-branch, position-sorted groups.
//!
//! Each group gets boundary markers the log never stores: a START at
//! position 0, an END one past the global maximum (unless the branch was
//! deleted) and EMPTY fillers for every live slot without activity, so a
//! renderer can walk a lane slot by slot.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug_span;

use crate::color::Color;
use crate::graph::{Event, EventKind, Graph};

/// Events of one branch, ready for layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchGroup {
    /// Branch name.
    pub key: String,
    /// Display index (lane).
    pub index: usize,
    pub color: Color,
    /// Sorted by position; ties keep log order.
    pub events: Vec<Event>,
}

impl BranchGroup {
    /// Whether the branch recorded a DELETE.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.events.iter().any(|event| event.kind == EventKind::Delete)
    }

    /// Position of the last event that is neither a boundary nor a filler.
    #[must_use]
    pub fn last_activity(&self) -> Option<i64> {
        self.events
            .iter()
            .rev()
            .find(|event| {
                !matches!(
                    event.kind,
                    EventKind::Start | EventKind::End | EventKind::Empty
                )
            })
            .map(|event| event.position)
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedGraph {
    /// One group per registered branch, in display order.
    pub groups: Vec<BranchGroup>,
    /// Largest position over all groups (never negative).
    pub max_position: i64,
    /// Position of the synthesized END markers.
    pub end_position: i64,
}

impl NormalizedGraph {
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&BranchGroup> {
        self.groups.iter().find(|group| group.key == key)
    }

    /// Lane index of a branch.
    #[must_use]
    pub fn lane_of(&self, key: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.key == key)
    }

    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.groups.len()
    }
}

/// Group, sort and pad the events of `graph`.
///
/// Pure: the same graph always yields the same result.
#[must_use]
pub fn normalize(graph: &Graph) -> NormalizedGraph {
    let _span = debug_span!(
        "normalize",
        branches = graph.branches().len(),
        events = graph.events().len()
    )
    .entered();

    let count = graph.branches().len();
    let mut groups: Vec<BranchGroup> = graph
        .branches()
        .iter()
        .enumerate()
        .map(|(index, branch)| BranchGroup {
            key: branch.name.clone(),
            index,
            color: branch
                .color
                .unwrap_or_else(|| Color::generated(index, count)),
            events: Vec::new(),
        })
        .collect();

    let lanes: HashMap<&str, usize> = graph
        .branches()
        .iter()
        .enumerate()
        .map(|(index, branch)| (branch.name.as_str(), index))
        .collect();

    for event in graph.events() {
        if let Some(branch) = event.branch.as_deref()
            && let Some(&lane) = lanes.get(branch)
        {
            groups[lane].events.push(event.clone());
        }
    }

    let mut max_position = 0;
    for group in &mut groups {
        // Stable: in-place events keep their place behind their predecessor.
        group.events.sort_by_key(|event| event.position);

        // START opens position 0, ahead of anything recorded in place on it.
        if !group.events.iter().any(|event| event.kind == EventKind::Start) {
            let at = group
                .events
                .iter()
                .position(|event| event.position >= 0)
                .unwrap_or(group.events.len());
            group
                .events
                .insert(at, Event::synthetic(EventKind::Start, group.key.clone(), 0));
        }

        if let Some(last) = group.events.iter().map(|event| event.position).max() {
            max_position = max_position.max(last);
        }
    }

    let end_position = max_position + 1;
    for group in &mut groups {
        let last = match group
            .events
            .iter()
            .find(|event| event.kind == EventKind::Delete)
        {
            Some(delete) => delete.position,
            None => {
                group
                    .events
                    .push(Event::synthetic(EventKind::End, group.key.clone(), end_position));
                end_position
            }
        };
        fill_empty_slots(group, last);
    }

    NormalizedGraph {
        groups,
        max_position,
        end_position,
    }
}

fn fill_empty_slots(group: &mut BranchGroup, last: i64) {
    let occupied: BTreeSet<i64> = group.events.iter().map(|event| event.position).collect();
    let fillers: Vec<Event> = (1..last)
        .filter(|position| !occupied.contains(position))
        .map(|position| Event::synthetic(EventKind::Empty, group.key.clone(), position))
        .collect();
    if fillers.is_empty() {
        return;
    }
    group.events.extend(fillers);
    group.events.sort_by_key(|event| event.position);
}
