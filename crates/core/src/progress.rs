//! Project progress computation over ordered phases and their tasks.
//!
//! All functions here are pure and recomputed on every read; percentages
//! are never stored.

use crate::types::DbId;

/// Phase titles seeded into every newly created project, in order.
pub const DEFAULT_PHASE_TITLES: [&str; 5] =
    ["Decode", "Align", "Systemize", "Activate", "Steward"];

/// Done/total task counts for a single phase, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCounts {
    pub done: usize,
    pub total: usize,
}

/// Completion percentage for one phase. Defined as 0 for an empty phase.
pub fn phase_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u8
}

/// Overall completion percentage across all phases.
/// Defined as 0 when the project has no tasks anywhere.
pub fn project_percent(phases: &[PhaseCounts]) -> u8 {
    let done: usize = phases.iter().map(|p| p.done).sum();
    let total: usize = phases.iter().map(|p| p.total).sum();
    phase_percent(done, total)
}

/// Index (into the ordered phase list) of the "current" phase shown to
/// clients: the first phase containing at least one undone task. An empty
/// phase has no undone tasks and is skipped. If every phase is fully done
/// the last phase is current; with no phases there is no current phase.
pub fn current_phase_index(phases: &[PhaseCounts]) -> Option<usize> {
    if phases.is_empty() {
        return None;
    }
    phases
        .iter()
        .position(|p| p.done < p.total)
        .or(Some(phases.len() - 1))
}

/// Renumber phases to a dense `1..N` order.
///
/// Takes `(phase_id, order)` pairs, sorts them by their current order
/// (stable, so ties keep their given relative position) and reassigns
/// contiguous orders starting at 1. Returns only the pairs whose order
/// actually changed, so callers can skip no-op writes.
pub fn dense_renumber(phases: &mut Vec<(DbId, i32)>) -> Vec<(DbId, i32)> {
    phases.sort_by_key(|&(_, order)| order);
    let mut changed = Vec::new();
    for (i, entry) in phases.iter_mut().enumerate() {
        let want = (i + 1) as i32;
        if entry.1 != want {
            entry.1 = want;
            changed.push(*entry);
        }
    }
    changed
}
