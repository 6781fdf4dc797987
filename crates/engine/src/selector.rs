//! Diversified selector: greedy category-capped pick with one backfill slot.
//!
//! ## Algorithm
//! Greedy pass: walk the ranked candidates in order, selecting each one
//! whose *primary* genre has fewer than `per_genre_cap` selections so far.
//! Skipped candidates are not retried. Stop at `target_size`.
//!
//! Backfill: only when the greedy pass lands on exactly `target_size - 1`
//! selections, one corrective slot is filled from the full ranked sequence
//! with the cap ignored — preferring the first unselected candidate touching
//! a neutral-classified genre, else the first unselected candidate at all.
//! A shortfall of two or more gets no backfill; the short list is returned
//! as-is. Both the exactly-one-short trigger and the cap exemption are
//! deliberate policy and must not be "fixed" here.

use crate::types::{GenreClass, GenreScore, ScoredCandidate};
use catalog::MovieId;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Pick up to `target_size` candidates from the ranked sequence, capping
/// primary-genre repetition at `per_genre_cap` during the greedy pass.
pub fn select_diverse(
    ranked: &[ScoredCandidate],
    scores: &BTreeMap<String, GenreScore>,
    target_size: usize,
    per_genre_cap: usize,
) -> Vec<ScoredCandidate> {
    let mut selected: Vec<ScoredCandidate> = Vec::with_capacity(target_size);
    let mut selected_ids: HashSet<MovieId> = HashSet::new();
    let mut genre_counts: HashMap<&str, usize> = HashMap::new();

    for candidate in ranked {
        if selected.len() >= target_size {
            break;
        }
        // Empty genre lists are rejected upstream; such an entry is simply
        // never selectable here.
        let Some(primary) = candidate.movie.primary_genre() else {
            continue;
        };
        let count = genre_counts.entry(primary).or_insert(0);
        if *count < per_genre_cap {
            *count += 1;
            selected_ids.insert(candidate.movie.id);
            selected.push(candidate.clone());
        }
    }

    // Written as len + 1 so a zero target can't underflow the comparison.
    if selected.len() + 1 == target_size {
        let neutral: HashSet<&str> = scores
            .values()
            .filter(|s| s.class == GenreClass::Neutral)
            .map(|s| s.genre.as_str())
            .collect();

        // Cap-exempt by policy: the backfill scan ignores genre_counts.
        let backfill = ranked
            .iter()
            .find(|c| {
                !selected_ids.contains(&c.movie.id)
                    && c.movie.genres.iter().any(|g| neutral.contains(g.as_str()))
            })
            .or_else(|| ranked.iter().find(|c| !selected_ids.contains(&c.movie.id)));

        if let Some(candidate) = backfill {
            debug!(movie_id = candidate.movie.id, "Backfilled final slot");
            selected.push(candidate.clone());
        }
    }

    debug!(
        ranked = ranked.len(),
        selected = selected.len(),
        "Selected diversified recommendations"
    );

    selected
}
