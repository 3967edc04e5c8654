//! Double-elimination bracket engine.
//!
//! Three pieces cooperate:
//! - [`seeding`]: assigns seeds and orders first-round slots so top seeds meet late
//! - [`builder`]: constructs the winners, losers and grand finals match graph
//! - [`propagator`]: records results and moves competitors into downstream slots
//!
//! Everything is synchronous and works on an in-memory [`Bracket`]. Callers
//! that share brackets between tasks must serialize writes per tournament;
//! [`crate::tournament::TournamentManager`] does that for in-memory use.
//!
//! ## Example
//!
//! ```
//! use bracket_engine::bracket::{
//!     BracketSide, Entrant, MatchId, MatchReport, assign_seeds, build_bracket,
//! };
//!
//! let competitors = assign_seeds(vec![
//!     Entrant::new("ana", "Ana"),
//!     Entrant::new("bo", "Bo"),
//!     Entrant::new("cy", "Cy"),
//!     Entrant::new("di", "Di"),
//! ])?;
//! let mut bracket = build_bracket(7, &competitors)?;
//! assert_eq!(bracket.round(BracketSide::Winners, 1).len(), 2);
//!
//! bracket.apply_result(&MatchReport::new(MatchId::winners(1, 1), "ana", "di"))?;
//! assert_eq!(
//!     bracket.get_match(&MatchId::winners(2, 1)).unwrap().slot1.competitor(),
//!     Some(&"ana".into())
//! );
//! # Ok::<(), bracket_engine::bracket::BracketError>(())
//! ```

pub mod builder;
pub mod config;
pub mod errors;
pub mod models;
pub mod propagator;
pub mod seeding;
pub mod standings;

pub use builder::{build_bracket, build_bracket_with_config};
pub use config::{BracketConfig, ByePolicy, GrandFinalsMode};
pub use errors::{BracketError, BracketResult};
pub use models::{
    Bracket, BracketSide, Competitor, CompetitorId, Entrant, Match, MatchId, MatchStatus, Outcome,
    Slot, SlotSource,
};
pub use propagator::{MatchReport, report_result};
pub use seeding::{assign_seeds, bracket_size, first_round_pairings, seeding_order};
pub use standings::{CompetitorRecord, record_for, standings};
