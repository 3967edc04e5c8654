//! Tournament data models.

use crate::bracket::CompetitorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tournament ID type
pub type TournamentId = i64;

/// Tournament state, derived from its bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentState {
    /// Matches still to be played
    Running,
    /// Champion decided
    Finished,
}

/// Tournament summary for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentInfo {
    /// Tournament ID
    pub id: TournamentId,
    /// Current state
    pub state: TournamentState,
    /// Seeded competitors
    pub competitor_count: usize,
    /// Matches waiting for a result
    pub playable_matches: usize,
    /// Winner once finished
    pub champion: Option<CompetitorId>,
    /// Last (re)generation of the bracket
    pub generated_at: DateTime<Utc>,
    /// Last accepted result or regeneration
    pub updated_at: DateTime<Utc>,
}
