//! Bracket construction: winners, losers and grand finals wiring.
//!
//! For a bracket of size `2^R`:
//! - the winners bracket has `R` rounds and `2^R - 1` matches
//! - the losers bracket has `2(R - 1)` rounds and `2^R - 2` matches
//! - grand finals starts as a single match
//!
//! Winners round 1 losers pair up in losers round 1. Losers of winners round
//! `k >= 2` drop into losers round `2(k - 1)`, where each one meets a
//! losers-bracket survivor; the odd losers rounds after that halve the field.

use super::config::BracketConfig;
use super::errors::{BracketError, BracketResult};
use super::models::{Bracket, Competitor, Match, MatchId, Slot, SlotSource};
use super::seeding::{bracket_size, first_round_pairings};
use crate::tournament::TournamentId;
use std::collections::{BTreeMap, HashSet};

/// Build a bracket with the default configuration
pub fn build_bracket(
    tournament_id: TournamentId,
    competitors: &[Competitor],
) -> BracketResult<Bracket> {
    build_bracket_with_config(tournament_id, competitors, BracketConfig::default())
}

/// Build the complete match graph for seeded competitors
///
/// The result is fully wired and already has every bye resolved. Identical
/// input always yields an identical bracket.
///
/// # Errors
///
/// * `InsufficientCompetitors` - fewer than two competitors
/// * `InvalidSeeding` - seeds are not exactly `1..=N`
/// * `DuplicateCompetitor` - the same id appears twice
pub fn build_bracket_with_config(
    tournament_id: TournamentId,
    competitors: &[Competitor],
    config: BracketConfig,
) -> BracketResult<Bracket> {
    let competitors = validated(competitors)?;
    let count = competitors.len();
    let size = bracket_size(count) as u32;
    let winners_rounds = size.trailing_zeros();
    let losers_rounds = 2 * (winners_rounds - 1);

    let layout = Layout {
        size,
        winners_rounds,
        losers_rounds,
    };

    let mut matches = BTreeMap::new();
    layout.add_winners(&mut matches, &competitors);
    layout.add_losers(&mut matches);
    layout.add_grand_finals(&mut matches);

    let mut bracket = Bracket {
        tournament_id,
        config,
        competitors,
        bracket_size: size,
        winners_rounds,
        losers_rounds,
        matches,
    };

    let first_round: Vec<MatchId> = (1..=size / 2).map(|p| MatchId::winners(1, p)).collect();
    bracket.settle_all(first_round)?;

    log::info!(
        "Built bracket for tournament {}: {} competitors, size {}, {} matches",
        tournament_id,
        count,
        size,
        bracket.match_count()
    );

    Ok(bracket)
}

/// Sort by seed and check the seeding is complete and unique
fn validated(competitors: &[Competitor]) -> BracketResult<Vec<Competitor>> {
    if competitors.len() < 2 {
        return Err(BracketError::InsufficientCompetitors {
            count: competitors.len(),
        });
    }

    let mut seeded = competitors.to_vec();
    seeded.sort_by_key(|c| c.seed);

    for (expected, competitor) in (1u32..).zip(&seeded) {
        if competitor.seed != expected {
            return Err(BracketError::InvalidSeeding(format!(
                "expected seed {} but found {} ({})",
                expected, competitor.seed, competitor.id
            )));
        }
    }

    let mut ids = HashSet::with_capacity(seeded.len());
    for competitor in &seeded {
        if !ids.insert(&competitor.id) {
            return Err(BracketError::DuplicateCompetitor(competitor.id.clone()));
        }
    }

    Ok(seeded)
}

struct Layout {
    size: u32,
    winners_rounds: u32,
    losers_rounds: u32,
}

impl Layout {
    fn winners_matches(&self, round: u32) -> u32 {
        self.size >> round
    }

    fn losers_matches(&self, round: u32) -> u32 {
        self.size >> (1 + round.div_ceil(2))
    }

    /// Losers-bracket position a winners-round loser drops into
    ///
    /// Even winners rounds fill in reverse so a dropped player does not meet
    /// someone from their own corner of the bracket straight away.
    fn drop_position(&self, winners_round: u32, position: u32) -> u32 {
        if winners_round % 2 == 0 {
            self.winners_matches(winners_round) + 1 - position
        } else {
            position
        }
    }

    fn loser_destination(&self, round: u32, position: u32) -> MatchId {
        if self.losers_rounds == 0 {
            MatchId::grand_finals(1)
        } else if round == 1 {
            MatchId::losers(1, position.div_ceil(2))
        } else {
            MatchId::losers(2 * (round - 1), self.drop_position(round, position))
        }
    }

    fn add_winners(&self, matches: &mut BTreeMap<MatchId, Match>, competitors: &[Competitor]) {
        let entrant = |seed: u32| match competitors.get(seed as usize - 1) {
            Some(c) => Slot::Competitor(c.id.clone()),
            None => Slot::Empty,
        };
        let pairings = first_round_pairings(competitors.len());

        for round in 1..=self.winners_rounds {
            for position in 1..=self.winners_matches(round) {
                let mut m = Match::new(MatchId::winners(round, position));

                if round == 1 {
                    let (seed1, seed2) = pairings[position as usize - 1];
                    m.slot1 = entrant(seed1);
                    m.slot2 = entrant(seed2);
                } else {
                    wire(
                        &mut m,
                        SlotSource::winner_of(MatchId::winners(round - 1, 2 * position - 1)),
                        SlotSource::winner_of(MatchId::winners(round - 1, 2 * position)),
                    );
                }

                m.next_match_id = Some(if round == self.winners_rounds {
                    MatchId::grand_finals(1)
                } else {
                    MatchId::winners(round + 1, position.div_ceil(2))
                });
                m.next_loser_match_id = Some(self.loser_destination(round, position));

                matches.insert(m.id, m);
            }
        }
    }

    fn add_losers(&self, matches: &mut BTreeMap<MatchId, Match>) {
        for round in 1..=self.losers_rounds {
            let count = self.losers_matches(round);

            for position in 1..=count {
                let mut m = Match::new(MatchId::losers(round, position));

                let (first, second) = if round == 1 {
                    (
                        SlotSource::loser_of(MatchId::winners(1, 2 * position - 1)),
                        SlotSource::loser_of(MatchId::winners(1, 2 * position)),
                    )
                } else if round % 2 == 0 {
                    let dropping_round = round / 2 + 1;
                    // drop_position is its own inverse
                    let dropping = self.drop_position(dropping_round, position);
                    (
                        SlotSource::loser_of(MatchId::winners(dropping_round, dropping)),
                        SlotSource::winner_of(MatchId::losers(round - 1, position)),
                    )
                } else {
                    (
                        SlotSource::winner_of(MatchId::losers(round - 1, 2 * position - 1)),
                        SlotSource::winner_of(MatchId::losers(round - 1, 2 * position)),
                    )
                };
                wire(&mut m, first, second);

                m.next_match_id = Some(if round == self.losers_rounds {
                    MatchId::grand_finals(1)
                } else if round % 2 == 1 {
                    MatchId::losers(round + 1, position)
                } else {
                    MatchId::losers(round + 1, position.div_ceil(2))
                });

                matches.insert(m.id, m);
            }
        }
    }

    fn add_grand_finals(&self, matches: &mut BTreeMap<MatchId, Match>) {
        let mut m = Match::new(MatchId::grand_finals(1));
        let losers_champion = if self.losers_rounds == 0 {
            SlotSource::loser_of(MatchId::winners(1, 1))
        } else {
            SlotSource::winner_of(MatchId::losers(self.losers_rounds, 1))
        };
        wire(
            &mut m,
            SlotSource::winner_of(MatchId::winners(self.winners_rounds, 1)),
            losers_champion,
        );
        matches.insert(m.id, m);
    }
}

fn wire(m: &mut Match, first: SlotSource, second: SlotSource) {
    m.previous_match1_id = Some(first.match_id);
    m.previous_match2_id = Some(second.match_id);
    m.slot1 = Slot::Pending(first);
    m.slot2 = Slot::Pending(second);
}
