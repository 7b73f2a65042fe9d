//! Visibility resolution: which system records a given navigation focus
//! exposes.
//!
//! With no focus, only the forest roots are visible. With a focus, the
//! focused record plus its descendants down to a bounded depth. The walk is
//! iterative over an explicit work queue of `(id, remaining_depth)` pairs,
//! so the traversal budget is visible in the code and stack depth stays
//! constant no matter how deep the forest is.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::ids::SystemId;
use crate::records::SystemRecord;

/// Resolves the visible subset of `all` for the given focus.
///
/// - `focus == None`: all records with no parent, in input order.
/// - `focus == Some(id)` and the record exists: the focus record followed by
///   its descendants, breadth-first, at most `max_depth` hops away. Within a
///   depth level, records keep the insertion order of `all`.
/// - `focus == Some(id)` and the record is missing (dangling focus): empty.
///
/// Records already emitted are never emitted twice, which also keeps the
/// walk finite on cyclic parent references (cycles are not validated here).
pub fn resolve_visible(
    all: &[SystemRecord],
    focus: Option<SystemId>,
    max_depth: usize,
) -> Vec<SystemRecord> {
    let Some(focus) = focus else {
        return all.iter().filter(|s| s.is_root()).cloned().collect();
    };

    let Some(focus_record) = all.iter().find(|s| s.id == focus) else {
        return Vec::new();
    };

    let mut visible = vec![focus_record.clone()];
    let mut seen: FxHashSet<SystemId> = FxHashSet::default();
    seen.insert(focus);

    let mut queue: VecDeque<(SystemId, usize)> = VecDeque::new();
    queue.push_back((focus, max_depth));

    while let Some((parent, remaining)) = queue.pop_front() {
        if remaining == 0 {
            continue;
        }
        for record in all.iter().filter(|s| s.parent_system_id == Some(parent)) {
            if !seen.insert(record.id) {
                continue;
            }
            visible.push(record.clone());
            queue.push_back((record.id, remaining - 1));
        }
    }

    visible
}
