//! Bracket data models: competitors, match ids, slots and the match arena.

use super::config::BracketConfig;
use super::errors::{BracketError, BracketResult};
use crate::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque competitor identifier supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub String);

impl CompetitorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompetitorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CompetitorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Registration entry, already ranked best-first by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    /// Competitor ID
    pub id: CompetitorId,
    /// Display name
    pub name: String,
}

impl Entrant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CompetitorId::new(id),
            name: name.into(),
        }
    }
}

/// Seeded competitor, immutable once the bracket is generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// Competitor ID
    pub id: CompetitorId,
    /// Display name
    pub name: String,
    /// Seed (1 = best)
    pub seed: u32,
}

/// Bracket side
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BracketSide {
    Winners,
    Losers,
    GrandFinals,
}

impl fmt::Display for BracketSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketSide::Winners => write!(f, "winners"),
            BracketSide::Losers => write!(f, "losers"),
            BracketSide::GrandFinals => write!(f, "grand finals"),
        }
    }
}

/// Stable match identifier
///
/// Renders as `W{round}-{position}`, `L{round}-{position}` or `GF{round}`
/// and orders by side, then round, then position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId {
    pub side: BracketSide,
    pub round: u32,
    pub position: u32,
}

impl MatchId {
    pub fn winners(round: u32, position: u32) -> Self {
        Self {
            side: BracketSide::Winners,
            round,
            position,
        }
    }

    pub fn losers(round: u32, position: u32) -> Self {
        Self {
            side: BracketSide::Losers,
            round,
            position,
        }
    }

    /// Grand finals match; round 2 is the bracket reset
    pub fn grand_finals(round: u32) -> Self {
        Self {
            side: BracketSide::GrandFinals,
            round,
            position: 1,
        }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            BracketSide::Winners => write!(f, "W{}-{}", self.round, self.position),
            BracketSide::Losers => write!(f, "L{}-{}", self.round, self.position),
            BracketSide::GrandFinals => write!(f, "GF{}", self.round),
        }
    }
}

impl FromStr for MatchId {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BracketError::InvalidMatchId(s.to_string());
        let number = |part: &str| match part.parse::<u32>() {
            Ok(n) if n > 0 && part.bytes().all(|b| b.is_ascii_digit()) => Ok(n),
            _ => Err(invalid()),
        };

        if let Some(round) = s.strip_prefix("GF") {
            return Ok(Self::grand_finals(number(round)?));
        }

        let (side, rest) = if let Some(rest) = s.strip_prefix('W') {
            (BracketSide::Winners, rest)
        } else if let Some(rest) = s.strip_prefix('L') {
            (BracketSide::Losers, rest)
        } else {
            return Err(invalid());
        };

        let (round, position) = rest.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            side,
            round: number(round)?,
            position: number(position)?,
        })
    }
}

impl TryFrom<String> for MatchId {
    type Error = BracketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

/// Match status; in-game states belong to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pending,
    Completed,
}

/// Which result of a match feeds a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner,
    Loser,
}

/// Reference to a match result that has not arrived yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSource {
    pub match_id: MatchId,
    pub outcome: Outcome,
}

impl SlotSource {
    pub fn winner_of(match_id: MatchId) -> Self {
        Self {
            match_id,
            outcome: Outcome::Winner,
        }
    }

    pub fn loser_of(match_id: MatchId) -> Self {
        Self {
            match_id,
            outcome: Outcome::Loser,
        }
    }
}

/// Contents of one side of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Slot {
    /// Resolved occupant
    Competitor(CompetitorId),
    /// Waiting on another match's winner or loser
    Pending(SlotSource),
    /// Nobody will ever arrive here (bye)
    Empty,
}

impl Slot {
    pub fn competitor(&self) -> Option<&CompetitorId> {
        match self {
            Slot::Competitor(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Slot position within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotIndex {
    First,
    Second,
}

/// A single match in the bracket graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub bracket_side: BracketSide,
    pub round_number: u32,
    pub position: u32,
    pub slot1: Slot,
    pub slot2: Slot,
    pub slot1_score: u32,
    pub slot2_score: u32,
    pub winner_id: Option<CompetitorId>,
    pub loser_id: Option<CompetitorId>,
    pub status: MatchStatus,
    /// Receives this match's winner
    pub next_match_id: Option<MatchId>,
    /// Receives this match's loser (winners side only)
    pub next_loser_match_id: Option<MatchId>,
    pub previous_match1_id: Option<MatchId>,
    pub previous_match2_id: Option<MatchId>,
    /// Decided without a game: one or both slots empty
    #[serde(default)]
    pub bye: bool,
    /// Grand finals only: losers-bracket champion won and a reset match exists
    #[serde(default)]
    pub reset_occurred: bool,
}

impl Match {
    /// Create an empty pending match
    pub fn new(id: MatchId) -> Self {
        Self {
            id,
            bracket_side: id.side,
            round_number: id.round,
            position: id.position,
            slot1: Slot::Empty,
            slot2: Slot::Empty,
            slot1_score: 0,
            slot2_score: 0,
            winner_id: None,
            loser_id: None,
            status: MatchStatus::Pending,
            next_match_id: None,
            next_loser_match_id: None,
            previous_match1_id: None,
            previous_match2_id: None,
            bye: false,
            reset_occurred: false,
        }
    }

    /// Both occupants, once neither slot is pending or empty
    pub fn occupants(&self) -> Option<(&CompetitorId, &CompetitorId)> {
        Some((self.slot1.competitor()?, self.slot2.competitor()?))
    }

    /// Both occupants known and no result yet
    pub fn is_playable(&self) -> bool {
        self.status == MatchStatus::Pending && self.occupants().is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Completed without anyone in it
    pub fn is_void(&self) -> bool {
        self.is_completed() && self.winner_id.is_none()
    }

    pub fn involves(&self, competitor: &CompetitorId) -> bool {
        self.slot1.competitor() == Some(competitor) || self.slot2.competitor() == Some(competitor)
    }

    pub(crate) fn slot_mut(&mut self, index: SlotIndex) -> &mut Slot {
        match index {
            SlotIndex::First => &mut self.slot1,
            SlotIndex::Second => &mut self.slot2,
        }
    }

    /// Slot fed by `source`'s `outcome`
    ///
    /// Matched on the previous-match back-references. When both slots come
    /// from the same match the winner takes slot 1 and the loser slot 2.
    pub(crate) fn feed_slot(&self, source: MatchId, outcome: Outcome) -> Option<SlotIndex> {
        let first = self.previous_match1_id == Some(source);
        let second = self.previous_match2_id == Some(source);
        match (first, second, outcome) {
            (true, true, Outcome::Winner) | (true, false, _) => Some(SlotIndex::First),
            (true, true, Outcome::Loser) | (false, true, _) => Some(SlotIndex::Second),
            (false, false, _) => None,
        }
    }

    /// Drop any recorded result and return to pending
    pub(crate) fn clear_result(&mut self) {
        self.slot1_score = 0;
        self.slot2_score = 0;
        self.winner_id = None;
        self.loser_id = None;
        self.status = MatchStatus::Pending;
        self.bye = false;
    }
}

/// Full double-elimination bracket for one tournament
///
/// Matches live in a flat arena keyed by [`MatchId`]; every cross-reference
/// between matches is an id lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub tournament_id: TournamentId,
    pub config: BracketConfig,
    /// Competitors ordered by seed
    pub competitors: Vec<Competitor>,
    /// Next power of two at or above the competitor count
    pub bracket_size: u32,
    pub winners_rounds: u32,
    pub losers_rounds: u32,
    pub(crate) matches: BTreeMap<MatchId, Match>,
}

impl Bracket {
    pub fn get_match(&self, id: &MatchId) -> Option<&Match> {
        self.matches.get(id)
    }

    pub(crate) fn match_mut(&mut self, id: MatchId) -> BracketResult<&mut Match> {
        self.matches
            .get_mut(&id)
            .ok_or(BracketError::MatchNotFound(id))
    }

    /// All matches ordered by side, round and position
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn matches_on_side(&self, side: BracketSide) -> impl Iterator<Item = &Match> {
        self.matches.values().filter(move |m| m.bracket_side == side)
    }

    /// Matches of one round, ordered by position
    pub fn round(&self, side: BracketSide, round: u32) -> Vec<&Match> {
        self.matches_on_side(side)
            .filter(|m| m.round_number == round)
            .collect()
    }

    /// Matches waiting only on a reported result
    pub fn playable_matches(&self) -> Vec<&Match> {
        self.matches.values().filter(|m| m.is_playable()).collect()
    }

    pub fn competitor(&self, id: &CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| &c.id == id)
    }

    pub fn winners_final_id(&self) -> MatchId {
        MatchId::winners(self.winners_rounds, 1)
    }

    /// Final losers-bracket match; absent for two-competitor brackets
    pub fn losers_final_id(&self) -> Option<MatchId> {
        (self.losers_rounds > 0).then(|| MatchId::losers(self.losers_rounds, 1))
    }

    pub fn grand_finals(&self) -> Option<&Match> {
        self.matches.get(&MatchId::grand_finals(1))
    }

    /// Second grand finals match, present only after a bracket reset
    pub fn reset_match(&self) -> Option<&Match> {
        self.matches.get(&MatchId::grand_finals(2))
    }

    /// Tournament winner once the last grand finals match is decided
    pub fn champion(&self) -> Option<&CompetitorId> {
        let decider = self.reset_match().or_else(|| self.grand_finals())?;
        if decider.is_completed() && !decider.reset_occurred {
            decider.winner_id.as_ref()
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    pub fn to_json(&self) -> BracketResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> BracketResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> BracketResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
