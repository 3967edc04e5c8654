/// Property-based tests for bracket construction and propagation
///
/// These tests play complete tournaments with randomly chosen winners and
/// check the double-elimination guarantees hold for every field size.
use bracket_engine::bracket::{
    Bracket, BracketSide, CompetitorId, Entrant, MatchReport, assign_seeds, build_bracket,
    seeding_order, standings,
};
use proptest::prelude::*;
use std::collections::HashMap;

// Strategy for a field size, covering exact powers of two and every bye count between
fn field_size_strategy() -> impl Strategy<Value = usize> {
    2usize..=40
}

// Strategy for the sequence of choices driving a playthrough:
// which playable match to report next, and whether slot 1 wins it
fn choices_strategy() -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((any::<usize>(), any::<bool>()), 1..64)
}

fn fresh_bracket(count: usize) -> Bracket {
    let entrants = (1..=count)
        .map(|i| Entrant::new(format!("p{i}"), format!("Player {i}")))
        .collect();
    build_bracket(1, &assign_seeds(entrants).unwrap()).unwrap()
}

// Report results until nothing is playable; returns the number of reports
fn play_out(bracket: &mut Bracket, choices: &[(usize, bool)], cursor: &mut usize) -> usize {
    let mut reported = 0;
    loop {
        let playable = bracket.playable_matches();
        if playable.is_empty() {
            return reported;
        }
        assert!(reported < 1000, "playthrough does not terminate");

        let (pick, first_wins) = choices[*cursor % choices.len()];
        *cursor += 1;

        let m = playable[pick % playable.len()];
        let (first, second) = m.occupants().unwrap();
        let (winner, loser) = if first_wins {
            (first.clone(), second.clone())
        } else {
            (second.clone(), first.clone())
        };
        let report = MatchReport::new(m.id, winner, loser);

        bracket.apply_result(&report).unwrap();
        reported += 1;
    }
}

fn losses(bracket: &Bracket) -> HashMap<CompetitorId, u32> {
    let mut losses = HashMap::new();
    for m in bracket.matches().filter(|m| m.is_completed()) {
        if let Some(loser) = &m.loser_id {
            *losses.entry(loser.clone()).or_insert(0) += 1;
        }
    }
    losses
}

fn played(bracket: &Bracket) -> usize {
    bracket
        .matches()
        .filter(|m| m.is_completed() && m.loser_id.is_some())
        .count()
}

fn check_finished(bracket: &Bracket) -> Result<(), TestCaseError> {
    let count = bracket.competitors.len();
    let champion = bracket.champion().cloned();
    prop_assert!(champion.is_some(), "tournament ended without a champion");
    let champion = champion.unwrap();

    let losses = losses(bracket);
    for competitor in &bracket.competitors {
        let lost = losses.get(&competitor.id).copied().unwrap_or(0);
        if competitor.id == champion {
            prop_assert!(lost <= 1, "champion lost {} times", lost);
        } else {
            prop_assert_eq!(lost, 2, "{} lost {} times", competitor.id, lost);
        }
    }

    // Every non-champion loses twice; the champion's only loss forces the reset
    let reset = usize::from(bracket.reset_match().is_some());
    prop_assert_eq!(played(bracket), 2 * count - 2 + reset);

    let records = standings(bracket);
    prop_assert_eq!(records[0].competitor_id.clone(), champion);
    prop_assert_eq!(records[0].placement, Some(1));
    for record in &records[1..] {
        prop_assert!(record.eliminated);
        let placement = record.placement.unwrap_or(0);
        prop_assert!(placement >= 2 && placement as usize <= count);
    }

    Ok(())
}

proptest! {
    #[test]
    fn test_seeding_order_is_a_permutation(count in field_size_strategy()) {
        let mut order = seeding_order(count);
        let size = order.len();
        prop_assert!(size.is_power_of_two());
        prop_assert!(size >= count && size < 2 * count.max(2));

        // Paired seeds always sum to size + 1
        for pair in order.chunks(2) {
            prop_assert_eq!((pair[0] + pair[1]) as usize, size + 1);
        }

        order.sort_unstable();
        prop_assert_eq!(order, (1..=size as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_match_counts(count in field_size_strategy()) {
        let bracket = fresh_bracket(count);
        let size = bracket.bracket_size as usize;

        prop_assert_eq!(bracket.matches_on_side(BracketSide::Winners).count(), size - 1);
        prop_assert_eq!(bracket.matches_on_side(BracketSide::Losers).count(), size - 2);
        prop_assert_eq!(bracket.matches_on_side(BracketSide::GrandFinals).count(), 1);

        // Byes land only in the first round, and never two empties together
        let byes = bracket
            .round(BracketSide::Winners, 1)
            .into_iter()
            .filter(|m| m.bye)
            .count();
        prop_assert_eq!(byes, size - count);
        prop_assert!(bracket.matches_on_side(BracketSide::Winners).all(|m| !m.is_void()));
    }

    #[test]
    fn test_build_is_deterministic(count in field_size_strategy()) {
        prop_assert_eq!(fresh_bracket(count), fresh_bracket(count));
    }

    #[test]
    fn test_random_playthrough_completes(
        count in field_size_strategy(),
        choices in choices_strategy(),
    ) {
        let mut bracket = fresh_bracket(count);
        let mut cursor = 0;
        play_out(&mut bracket, &choices, &mut cursor);

        check_finished(&bracket)?;
        prop_assert!(bracket.playable_matches().is_empty());
    }

    #[test]
    fn test_corrected_result_still_completes(
        count in field_size_strategy(),
        choices in choices_strategy(),
        corrected in any::<usize>(),
    ) {
        let mut bracket = fresh_bracket(count);
        let mut cursor = 0;
        play_out(&mut bracket, &choices, &mut cursor);

        // Swap the outcome of one played match, then finish the tournament again
        let played: Vec<MatchReport> = bracket
            .matches()
            .filter(|m| m.is_completed() && m.loser_id.is_some())
            .filter_map(|m| {
                Some(MatchReport::new(m.id, m.loser_id.clone()?, m.winner_id.clone()?))
            })
            .collect();
        let flip = &played[corrected % played.len()];

        bracket.apply_result(flip).unwrap();
        let m = bracket.get_match(&flip.match_id).unwrap();
        prop_assert_eq!(m.winner_id.as_ref(), Some(&flip.winner_id));

        play_out(&mut bracket, &choices, &mut cursor);
        check_finished(&bracket)?;
    }

    #[test]
    fn test_same_report_twice_changes_nothing(
        count in field_size_strategy(),
        choices in choices_strategy(),
    ) {
        let mut bracket = fresh_bracket(count);
        let first = bracket.playable_matches()[choices[0].0 % bracket.playable_matches().len()];
        let (winner, loser) = first.occupants().unwrap();
        let report = MatchReport::new(first.id, winner.clone(), loser.clone());

        bracket.apply_result(&report).unwrap();
        let once = bracket.clone();
        bracket.apply_result(&report).unwrap();
        prop_assert_eq!(bracket, once);
    }
}
