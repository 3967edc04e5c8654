//! # Bracket Engine
//!
//! Deterministic double-elimination brackets: seeding, match-graph
//! construction with byes, and result propagation including the grand
//! finals bracket reset.
//!
//! The engine is pure and synchronous. It persists nothing; callers store
//! the returned [`bracket::Bracket`] (it serializes with serde) and hand it
//! back for every reported result.
//!
//! ## Core Modules
//!
//! - [`bracket`]: seeding, bracket builder, result propagator and standings
//! - [`tournament`]: in-memory registry that serializes writes per tournament
//!
//! ## Example
//!
//! ```
//! use bracket_engine::bracket::{Entrant, assign_seeds, build_bracket};
//!
//! let competitors = assign_seeds(vec![
//!     Entrant::new("1", "First"),
//!     Entrant::new("2", "Second"),
//!     Entrant::new("3", "Third"),
//! ])?;
//! let bracket = build_bracket(1, &competitors)?;
//! assert_eq!(bracket.bracket_size, 4);
//! # Ok::<(), bracket_engine::bracket::BracketError>(())
//! ```

/// Seeding, bracket construction and result propagation.
pub mod bracket;
pub use bracket::{
    Bracket, BracketConfig, BracketError, BracketResult, Competitor, CompetitorId, Entrant,
    MatchId, MatchReport, assign_seeds, build_bracket, report_result,
};

/// Per-tournament bracket registry.
pub mod tournament;
pub use tournament::{TournamentError, TournamentId, TournamentManager, TournamentResult};
