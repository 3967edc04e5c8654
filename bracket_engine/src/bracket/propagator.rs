//! Result propagation: recording results and moving competitors downstream.

use super::config::GrandFinalsMode;
use super::errors::{BracketError, BracketResult};
use super::models::{
    Bracket, BracketSide, CompetitorId, Match, MatchId, MatchStatus, Outcome, Slot, SlotSource,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A reported match result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub winner_id: CompetitorId,
    pub loser_id: CompetitorId,
    #[serde(default)]
    pub winner_score: u32,
    #[serde(default)]
    pub loser_score: u32,
}

impl MatchReport {
    pub fn new(
        match_id: MatchId,
        winner_id: impl Into<CompetitorId>,
        loser_id: impl Into<CompetitorId>,
    ) -> Self {
        Self {
            match_id,
            winner_id: winner_id.into(),
            loser_id: loser_id.into(),
            winner_score: 0,
            loser_score: 0,
        }
    }

    /// Attach game scores
    pub fn with_scores(mut self, winner_score: u32, loser_score: u32) -> Self {
        self.winner_score = winner_score;
        self.loser_score = loser_score;
        self
    }
}

/// Apply a result and return the updated bracket
///
/// The input bracket is never modified; on error nothing changes.
///
/// # Errors
///
/// * `MatchNotFound` - unknown match id
/// * `MatchNotReady` - a slot is still waiting on an earlier match
/// * `InvalidResult` - winner/loser are not the two occupants
pub fn report_result(bracket: &Bracket, report: &MatchReport) -> BracketResult<Bracket> {
    let mut staged = bracket.clone();
    staged.record(report)?;
    Ok(staged)
}

impl Bracket {
    /// Apply a result in place, all-or-nothing
    pub fn apply_result(&mut self, report: &MatchReport) -> BracketResult<()> {
        *self = report_result(self, report)?;
        Ok(())
    }

    fn record(&mut self, report: &MatchReport) -> BracketResult<()> {
        let id = report.match_id;
        let current = self
            .get_match(&id)
            .ok_or(BracketError::MatchNotFound(id))?;
        let winner_in_first = validate(current, report)?;
        let unchanged =
            current.is_completed() && current.winner_id.as_ref() == Some(&report.winner_id);
        let replacing = current.is_completed() && !unchanged;

        if replacing {
            log::debug!(
                "Match {}: replacing result {:?} with {}",
                id,
                current.winner_id,
                report.winner_id
            );
            self.retract(id)?;
        }

        let m = self.match_mut(id)?;
        (m.slot1_score, m.slot2_score) = if winner_in_first {
            (report.winner_score, report.loser_score)
        } else {
            (report.loser_score, report.winner_score)
        };

        if unchanged {
            return Ok(());
        }

        m.winner_id = Some(report.winner_id.clone());
        m.loser_id = Some(report.loser_id.clone());
        m.status = MatchStatus::Completed;
        log::debug!(
            "Match {}: {} beat {}",
            id,
            report.winner_id,
            report.loser_id
        );

        self.advance(id)
    }

    /// Resolve byes and empty matches starting from `ids`
    pub(crate) fn settle_all(&mut self, ids: Vec<MatchId>) -> BracketResult<()> {
        for id in ids {
            if self.settle(id)? {
                self.advance(id)?;
            }
        }
        Ok(())
    }

    /// Auto-complete a match that can never be played
    ///
    /// Returns true when the match was just decided.
    fn settle(&mut self, id: MatchId) -> BracketResult<bool> {
        let m = self.match_mut(id)?;
        if m.is_completed() {
            return Ok(false);
        }

        let winner = match (&m.slot1, &m.slot2) {
            (Slot::Pending(_), _) | (_, Slot::Pending(_)) => return Ok(false),
            (Slot::Competitor(_), Slot::Competitor(_)) => return Ok(false),
            (Slot::Competitor(c), Slot::Empty) | (Slot::Empty, Slot::Competitor(c)) => {
                Some(c.clone())
            }
            (Slot::Empty, Slot::Empty) => None,
        };

        match &winner {
            Some(c) => log::debug!("Match {}: bye for {}", id, c),
            None => log::debug!("Match {}: no competitors, voided", id),
        }

        m.winner_id = winner;
        m.loser_id = None;
        m.bye = true;
        m.status = MatchStatus::Completed;
        Ok(true)
    }

    /// Push a decided match's winner and loser downstream, settling as we go
    fn advance(&mut self, from: MatchId) -> BracketResult<()> {
        let mut queue = VecDeque::from([from]);

        while let Some(id) = queue.pop_front() {
            if id.side == BracketSide::GrandFinals {
                self.conclude_grand_finals(id)?;
                continue;
            }

            let m = self.match_mut(id)?;
            let outputs = [
                (m.next_match_id, Outcome::Winner, occupant(&m.winner_id)),
                (m.next_loser_match_id, Outcome::Loser, occupant(&m.loser_id)),
            ];

            for (target, outcome, value) in outputs {
                let Some(target) = target else { continue };
                *self.fed_slot(target, id, outcome)? = value;
                if self.settle(target)? {
                    queue.push_back(target);
                }
            }
        }

        Ok(())
    }

    fn fed_slot(
        &mut self,
        target: MatchId,
        source: MatchId,
        outcome: Outcome,
    ) -> BracketResult<&mut Slot> {
        let m = self.match_mut(target)?;
        let index = m.feed_slot(source, outcome).ok_or_else(|| {
            BracketError::InconsistentBracket(format!(
                "{} is not fed by {} of {}",
                target,
                outcome_name(outcome),
                source
            ))
        })?;
        Ok(m.slot_mut(index))
    }

    /// Undo everything downstream of a completed match
    ///
    /// Slots it filled go back to pending; matches that already used those
    /// occupants lose their results, recursively.
    fn retract(&mut self, from: MatchId) -> BracketResult<()> {
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            if id.side == BracketSide::GrandFinals {
                if id.round == 1 {
                    self.undo_reset(id)?;
                }
                continue;
            }

            let m = self.match_mut(id)?;
            let outputs = [
                (m.next_match_id, Outcome::Winner),
                (m.next_loser_match_id, Outcome::Loser),
            ];

            for (target, outcome) in outputs {
                let Some(target) = target else { continue };
                *self.fed_slot(target, id, outcome)? = Slot::Pending(SlotSource {
                    match_id: id,
                    outcome,
                });

                let downstream = self.match_mut(target)?;
                if downstream.is_completed() {
                    downstream.clear_result();
                    stack.push(target);
                }
            }
        }

        Ok(())
    }

    /// Grand finals result: spawn the reset match or end the tournament
    fn conclude_grand_finals(&mut self, id: MatchId) -> BracketResult<()> {
        let reset_mode = self.config.grand_finals == GrandFinalsMode::Reset;
        let gf = self.match_mut(id)?;

        let losers_champion_won = gf.loser_id.is_some()
            && gf.winner_id.is_some()
            && gf.slot2.competitor() == gf.winner_id.as_ref();

        if id.round == 1 && losers_champion_won && reset_mode {
            let reset_id = MatchId::grand_finals(2);
            let mut reset = Match::new(reset_id);
            reset.slot1 = gf.slot1.clone();
            reset.slot2 = gf.slot2.clone();
            reset.previous_match1_id = Some(id);
            reset.previous_match2_id = Some(id);

            gf.reset_occurred = true;
            gf.next_match_id = Some(reset_id);
            gf.next_loser_match_id = Some(reset_id);

            log::info!(
                "Tournament {}: bracket reset, {} and {} play again",
                self.tournament_id,
                reset.slot1.competitor().map(|c| c.as_str()).unwrap_or("?"),
                reset.slot2.competitor().map(|c| c.as_str()).unwrap_or("?")
            );
            self.matches.insert(reset_id, reset);
            return Ok(());
        }

        if let Some(champion) = gf.winner_id.clone() {
            log::info!(
                "Tournament {}: {} is champion",
                self.tournament_id,
                champion
            );
        }
        Ok(())
    }

    fn undo_reset(&mut self, id: MatchId) -> BracketResult<()> {
        let gf = self.match_mut(id)?;
        if !gf.reset_occurred {
            return Ok(());
        }
        gf.reset_occurred = false;
        gf.next_match_id = None;
        gf.next_loser_match_id = None;

        if self.matches.remove(&MatchId::grand_finals(2)).is_some() {
            log::debug!("Tournament {}: reset match removed", self.tournament_id);
        }
        Ok(())
    }
}

/// Check a report against the match; returns whether the winner sits in slot 1
fn validate(m: &Match, report: &MatchReport) -> BracketResult<bool> {
    let invalid = |reason: String| BracketError::InvalidResult {
        match_id: m.id,
        reason,
    };

    if m.slot1.is_pending() || m.slot2.is_pending() {
        return Err(BracketError::MatchNotReady(m.id));
    }

    let Some((first, second)) = m.occupants() else {
        return Err(invalid("match was decided by a bye".to_string()));
    };

    if report.winner_id == report.loser_id {
        return Err(invalid(format!(
            "{} cannot be both winner and loser",
            report.winner_id
        )));
    }

    if &report.winner_id == first && &report.loser_id == second {
        Ok(true)
    } else if &report.winner_id == second && &report.loser_id == first {
        Ok(false)
    } else {
        Err(invalid(format!(
            "{} vs {} is played by {} and {}",
            report.winner_id, report.loser_id, first, second
        )))
    }
}

fn occupant(id: &Option<CompetitorId>) -> Slot {
    match id {
        Some(id) => Slot::Competitor(id.clone()),
        None => Slot::Empty,
    }
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Winner => "the winner",
        Outcome::Loser => "the loser",
    }
}
