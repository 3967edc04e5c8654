//! Per-competitor records and final placements.

use super::config::ByePolicy;
use super::models::{Bracket, BracketSide, CompetitorId, Match};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Win/loss record and placement for one competitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub competitor_id: CompetitorId,
    pub name: String,
    pub seed: u32,
    /// Games won; includes byes under [`ByePolicy::Count`]
    pub wins: u32,
    pub losses: u32,
    /// Rounds advanced without playing
    pub byes: u32,
    pub eliminated: bool,
    /// Final placement, shared by everyone knocked out in the same round
    pub placement: Option<u32>,
}

/// Records for every competitor
///
/// Ordered with live competitors first, then by placement and seed.
pub fn standings(bracket: &Bracket) -> Vec<CompetitorRecord> {
    let mut records: Vec<CompetitorRecord> = bracket
        .competitors
        .iter()
        .map(|c| CompetitorRecord {
            competitor_id: c.id.clone(),
            name: c.name.clone(),
            seed: c.seed,
            wins: 0,
            losses: 0,
            byes: 0,
            eliminated: false,
            placement: None,
        })
        .collect();
    let index: HashMap<&CompetitorId, usize> = bracket
        .competitors
        .iter()
        .enumerate()
        .map(|(i, c)| (&c.id, i))
        .collect();

    // elimination depth per competitor; later rounds place higher
    let mut knocked_out: Vec<Option<u32>> = vec![None; records.len()];

    for m in bracket.matches().filter(|m| m.is_completed()) {
        let Some(winner) = m.winner_id.as_ref().and_then(|id| index.get(id)) else {
            continue;
        };

        match m.loser_id.as_ref().and_then(|id| index.get(id)) {
            Some(&loser) => {
                records[*winner].wins += 1;
                records[loser].losses += 1;
                if eliminates_loser(m) {
                    knocked_out[loser] = Some(elimination_depth(bracket, m));
                }
            }
            None => {
                records[*winner].byes += 1;
                if bracket.config.bye_policy == ByePolicy::Count {
                    records[*winner].wins += 1;
                }
            }
        }
    }

    let total = records.len() as u32;
    for (i, depth) in knocked_out.iter().enumerate() {
        if let Some(depth) = depth {
            let out_by_then = knocked_out
                .iter()
                .flatten()
                .filter(|other| *other <= depth)
                .count() as u32;
            records[i].eliminated = true;
            records[i].placement = Some(total - out_by_then + 1);
        }
    }

    if let Some(&champion) = bracket.champion().and_then(|id| index.get(id)) {
        records[champion].placement = Some(1);
    }

    records.sort_by_key(|r| (r.eliminated, r.placement, r.seed));
    records
}

/// Record for a single competitor
pub fn record_for(bracket: &Bracket, competitor: &CompetitorId) -> Option<CompetitorRecord> {
    standings(bracket)
        .into_iter()
        .find(|r| &r.competitor_id == competitor)
}

/// Whether losing this match ends the loser's tournament
fn eliminates_loser(m: &Match) -> bool {
    m.next_loser_match_id.is_none() && !m.reset_occurred
}

fn elimination_depth(bracket: &Bracket, m: &Match) -> u32 {
    match m.bracket_side {
        BracketSide::Losers => m.round_number,
        BracketSide::GrandFinals | BracketSide::Winners => bracket.losers_rounds + 1,
    }
}
