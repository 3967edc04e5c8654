//! Tournament manager holding one bracket per tournament in memory.

use super::models::{TournamentId, TournamentInfo, TournamentState};
use crate::bracket::{
    Bracket, BracketConfig, BracketError, Entrant, MatchReport, assign_seeds,
    build_bracket_with_config, report_result,
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error(transparent)]
    Bracket(#[from] BracketError),
}

pub type TournamentResult<T> = Result<T, TournamentError>;

struct TournamentEntry {
    bracket: Bracket,
    generated_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TournamentEntry {
    fn new(bracket: Bracket) -> Self {
        let now = Utc::now();
        Self {
            bracket,
            generated_at: now,
            updated_at: now,
        }
    }

    fn info(&self, id: TournamentId) -> TournamentInfo {
        let champion = self.bracket.champion().cloned();
        TournamentInfo {
            id,
            state: if champion.is_some() {
                TournamentState::Finished
            } else {
                TournamentState::Running
            },
            competitor_count: self.bracket.competitors.len(),
            playable_matches: self.bracket.playable_matches().len(),
            champion,
            generated_at: self.generated_at,
            updated_at: self.updated_at,
        }
    }
}

/// Tournament manager
///
/// Generation and result reporting for the same tournament are mutually
/// exclusive; different tournaments never wait on each other beyond the
/// registry lookup.
#[derive(Clone)]
pub struct TournamentManager {
    /// Configuration for newly generated brackets
    config: BracketConfig,

    /// Brackets by tournament, each behind its own writer lock
    tournaments: Arc<RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>>,
}

impl TournamentManager {
    /// Create a new tournament manager
    pub fn new(config: BracketConfig) -> Self {
        Self {
            config,
            tournaments: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed ranked entrants and build a fresh bracket
    ///
    /// Replaces any existing bracket for the tournament, discarding all
    /// reported results.
    ///
    /// # Arguments
    ///
    /// * `tournament_id` - Tournament to (re)generate
    /// * `ranked` - Entrants ordered best-first
    ///
    /// # Returns
    ///
    /// * `TournamentResult<Bracket>` - Snapshot of the new bracket
    pub async fn generate_bracket(
        &self,
        tournament_id: TournamentId,
        ranked: Vec<Entrant>,
    ) -> TournamentResult<Bracket> {
        let competitors = assign_seeds(ranked)?;
        let bracket = build_bracket_with_config(tournament_id, &competitors, self.config.clone())?;

        let entry = {
            let mut tournaments = self.tournaments.write().await;
            tournaments
                .entry(tournament_id)
                .or_insert_with(|| Arc::new(Mutex::new(TournamentEntry::new(bracket.clone()))))
                .clone()
        };

        *entry.lock().await = TournamentEntry::new(bracket.clone());
        log::info!(
            "Generated bracket for tournament {} ({} competitors)",
            tournament_id,
            competitors.len()
        );

        Ok(bracket)
    }

    /// Record a result for a tournament's bracket
    ///
    /// # Returns
    ///
    /// * `TournamentResult<Bracket>` - Snapshot after propagation
    ///
    /// # Errors
    ///
    /// Rejected reports leave the stored bracket untouched.
    pub async fn report_result(
        &self,
        tournament_id: TournamentId,
        report: MatchReport,
    ) -> TournamentResult<Bracket> {
        let entry = self.entry(tournament_id).await?;
        let mut entry = entry.lock().await;

        let updated = report_result(&entry.bracket, &report).inspect_err(|e| {
            log::warn!(
                "Tournament {}: rejected result for {}: {}",
                tournament_id,
                report.match_id,
                e
            );
        })?;

        entry.bracket = updated;
        entry.updated_at = Utc::now();

        if let Some(champion) = entry.bracket.champion() {
            log::info!("Tournament {} finished, champion {}", tournament_id, champion);
        }

        Ok(entry.bracket.clone())
    }

    /// Snapshot of the current bracket
    pub async fn get_bracket(&self, tournament_id: TournamentId) -> TournamentResult<Bracket> {
        let entry = self.entry(tournament_id).await?;
        let entry = entry.lock().await;
        Ok(entry.bracket.clone())
    }

    /// Get tournament information
    pub async fn get_tournament_info(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<TournamentInfo> {
        let entry = self.entry(tournament_id).await?;
        let entry = entry.lock().await;
        Ok(entry.info(tournament_id))
    }

    /// List all tournaments, ordered by id
    pub async fn list_tournaments(
        &self,
        state_filter: Option<TournamentState>,
    ) -> Vec<TournamentInfo> {
        let entries: Vec<(TournamentId, Arc<Mutex<TournamentEntry>>)> = {
            let tournaments = self.tournaments.read().await;
            tournaments
                .iter()
                .map(|(id, entry)| (*id, entry.clone()))
                .collect()
        };

        let mut infos = Vec::with_capacity(entries.len());
        for (id, entry) in entries {
            let info = entry.lock().await.info(id);
            if state_filter.is_none_or(|state| state == info.state) {
                infos.push(info);
            }
        }
        infos.sort_by_key(|info| info.id);
        infos
    }

    /// Delete a tournament and its bracket
    pub async fn delete_tournament(&self, tournament_id: TournamentId) -> TournamentResult<()> {
        let removed = self.tournaments.write().await.remove(&tournament_id);
        match removed {
            Some(_) => {
                log::info!("Deleted tournament {}", tournament_id);
                Ok(())
            }
            None => Err(TournamentError::NotFound(tournament_id)),
        }
    }

    async fn entry(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<Arc<Mutex<TournamentEntry>>> {
        self.tournaments
            .read()
            .await
            .get(&tournament_id)
            .cloned()
            .ok_or(TournamentError::NotFound(tournament_id))
    }
}

impl Default for TournamentManager {
    fn default() -> Self {
        Self::new(BracketConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::MatchId;

    fn entrants(count: usize) -> Vec<Entrant> {
        (1..=count)
            .map(|i| Entrant::new(format!("p{i}"), format!("Player {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_unknown_tournament() {
        let manager = TournamentManager::default();
        assert!(matches!(
            manager.get_bracket(3).await,
            Err(TournamentError::NotFound(3))
        ));
        assert!(matches!(
            manager.delete_tournament(3).await,
            Err(TournamentError::NotFound(3))
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_small_field() {
        let manager = TournamentManager::default();
        let err = manager.generate_bracket(1, entrants(1)).await.unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Bracket(BracketError::InsufficientCompetitors { count: 1 })
        ));
        assert!(manager.list_tournaments(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_report_keeps_state() {
        let manager = TournamentManager::default();
        manager.generate_bracket(1, entrants(4)).await.unwrap();
        let before = manager.get_bracket(1).await.unwrap();

        let err = manager
            .report_result(1, MatchReport::new(MatchId::winners(2, 1), "p1", "p2"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Bracket(BracketError::MatchNotReady(_))
        ));
        assert_eq!(manager.get_bracket(1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_regeneration_discards_results() {
        let manager = TournamentManager::default();
        let fresh = manager.generate_bracket(1, entrants(4)).await.unwrap();
        manager
            .report_result(1, MatchReport::new(MatchId::winners(1, 1), "p1", "p4"))
            .await
            .unwrap();

        let regenerated = manager.generate_bracket(1, entrants(4)).await.unwrap();
        assert_eq!(regenerated, fresh);
        assert_eq!(manager.get_bracket(1).await.unwrap(), fresh);
    }
}
