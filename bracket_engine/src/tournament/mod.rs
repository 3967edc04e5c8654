//! Tournament module: in-memory bracket registry.
//!
//! The bracket engine itself holds no locks. This module keeps one bracket per
//! tournament and enforces a single writer per tournament:
//! - Bracket generation (full replacement on regeneration)
//! - Result reporting, serialized with generation
//! - Snapshot reads that never block on other tournaments
//!
//! ## Example
//!
//! ```
//! use bracket_engine::bracket::{BracketConfig, Entrant, MatchId, MatchReport};
//! use bracket_engine::tournament::TournamentManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TournamentManager::new(BracketConfig::default());
//!
//!     manager
//!         .generate_bracket(1, vec![Entrant::new("a", "Ann"), Entrant::new("b", "Ben")])
//!         .await?;
//!     let bracket = manager
//!         .report_result(1, MatchReport::new(MatchId::winners(1, 1), "a", "b"))
//!         .await?;
//!     assert!(bracket.grand_finals().unwrap().is_playable());
//!
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::{TournamentError, TournamentManager, TournamentResult};
pub use models::{TournamentId, TournamentInfo, TournamentState};
