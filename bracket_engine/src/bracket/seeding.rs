//! Seed assignment and standard tournament slot ordering.

use super::errors::{BracketError, BracketResult};
use super::models::{Competitor, Entrant};
use std::collections::HashSet;

/// Smallest power of two that fits `count` competitors (at least 2)
pub fn bracket_size(count: usize) -> usize {
    count.max(2).next_power_of_two()
}

/// Seed order of the first-round slots for `count` competitors
///
/// Consecutive pairs are first-round opponents. The list always covers the
/// full bracket size; seeds above `count` are byes. Seeds 1 and 2 land in
/// opposite halves, seeds 1-4 in different quarters, and so on.
///
/// ```
/// use bracket_engine::bracket::seeding_order;
///
/// assert_eq!(seeding_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
/// ```
pub fn seeding_order(count: usize) -> Vec<u32> {
    let size = bracket_size(count);
    let mut order = vec![1u32, 2];

    while order.len() < size {
        let mirror = order.len() as u32 * 2 + 1;
        order = order.iter().flat_map(|&seed| [seed, mirror - seed]).collect();
    }

    order
}

/// First-round pairings as `(slot1 seed, slot2 seed)`
pub fn first_round_pairings(count: usize) -> Vec<(u32, u32)> {
    seeding_order(count)
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

/// Assign seeds 1..=N in the caller's ranking order
///
/// # Errors
///
/// * `InsufficientCompetitors` - fewer than two entrants
/// * `DuplicateCompetitor` - the same id appears twice
pub fn assign_seeds(ranked: Vec<Entrant>) -> BracketResult<Vec<Competitor>> {
    if ranked.len() < 2 {
        return Err(BracketError::InsufficientCompetitors {
            count: ranked.len(),
        });
    }

    let mut seen = HashSet::with_capacity(ranked.len());
    for entrant in &ranked {
        if !seen.insert(&entrant.id) {
            return Err(BracketError::DuplicateCompetitor(entrant.id.clone()));
        }
    }

    Ok(ranked
        .into_iter()
        .zip(1u32..)
        .map(|(entrant, seed)| Competitor {
            id: entrant.id,
            name: entrant.name,
            seed,
        })
        .collect())
}
