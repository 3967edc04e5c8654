//! Bracket error types.

use super::models::{CompetitorId, MatchId};
use thiserror::Error;

/// Bracket errors
#[derive(Debug, Error)]
pub enum BracketError {
    /// Fewer than two entrants
    #[error("Insufficient competitors: need at least 2, have {count}")]
    InsufficientCompetitors { count: usize },

    /// Result reported before both slots were resolved
    #[error("Match {0} is not ready: a slot is still waiting on an earlier match")]
    MatchNotReady(MatchId),

    /// Declared winner/loser do not match the occupants
    #[error("Invalid result for match {match_id}: {reason}")]
    InvalidResult { match_id: MatchId, reason: String },

    /// Unknown match id
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Same competitor entered twice
    #[error("Duplicate competitor: {0}")]
    DuplicateCompetitor(CompetitorId),

    /// Seeds are not exactly 1..=N
    #[error("Invalid seeding: {0}")]
    InvalidSeeding(String),

    /// Textual match id could not be parsed
    #[error("Invalid match id: {0}")]
    InvalidMatchId(String),

    /// Match references that do not line up (usually a hand-edited bracket)
    #[error("Inconsistent bracket: {0}")]
    InconsistentBracket(String),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BracketError {
    /// Get a message that is safe to show to an admin UI
    ///
    /// Wiring and serialization details are collapsed, everything else is
    /// already phrased for the caller.
    pub fn client_message(&self) -> String {
        match self {
            BracketError::InconsistentBracket(_) => {
                "Bracket data is inconsistent, regenerate the bracket".to_string()
            }
            BracketError::Serialization(_) => "Bracket data could not be read".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the caller can fix the request and resubmit
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BracketError::InsufficientCompetitors { .. })
    }
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BracketError::InsufficientCompetitors { count: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient competitors: need at least 2, have 1"
        );

        let err = BracketError::MatchNotReady(MatchId::winners(2, 1));
        assert!(err.to_string().contains("W2-1"));
    }

    #[test]
    fn test_client_message_hides_wiring_details() {
        let err = BracketError::InconsistentBracket("L1-1 has no slot fed by W1-7".to_string());
        assert!(!err.client_message().contains("W1-7"));

        let err = BracketError::MatchNotFound(MatchId::losers(3, 2));
        assert_eq!(err.client_message(), "Match not found: L3-2");
    }

    #[test]
    fn test_recoverable() {
        assert!(!BracketError::InsufficientCompetitors { count: 0 }.is_recoverable());
        assert!(BracketError::MatchNotFound(MatchId::grand_finals(1)).is_recoverable());
    }
}
