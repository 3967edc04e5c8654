//! Subcommand implementations over bracket JSON.
//!
//! Each command takes already-read input and returns what should be written,
//! so `main` only deals with files and arguments.

use crate::config::CliConfig;
use anyhow::{Context, Result, bail};
use bracket_engine::bracket::{
    Bracket, BracketSide, Entrant, MatchId, MatchReport, assign_seeds, build_bracket_with_config,
    standings,
};
use bracket_engine::tournament::TournamentId;
use std::fmt::Write;

/// Seed a ranked entrant list and build its bracket
pub fn build(
    entrants_json: &str,
    tournament_id: TournamentId,
    config: &CliConfig,
) -> Result<Bracket> {
    let entrants: Vec<Entrant> = serde_json::from_str(entrants_json)
        .context("Entrants must be a JSON array of {id, name}")?;

    if entrants.len() > config.max_competitors {
        bail!(
            "{} entrants exceeds the limit of {}",
            entrants.len(),
            config.max_competitors
        );
    }

    let competitors = assign_seeds(entrants)?;
    let bracket = build_bracket_with_config(tournament_id, &competitors, config.bracket.clone())?;
    Ok(bracket)
}

/// Apply one match result
pub fn report(
    bracket: &mut Bracket,
    match_id: &str,
    winner: &str,
    loser: &str,
    score: Option<&str>,
) -> Result<()> {
    let match_id: MatchId = match_id.parse()?;
    let mut report = MatchReport::new(match_id, winner, loser);
    if let Some(score) = score {
        let (winner_score, loser_score) = parse_score(score)?;
        report = report.with_scores(winner_score, loser_score);
    }

    bracket
        .apply_result(&report)
        .map_err(|e| anyhow::anyhow!(e.client_message()))
        .with_context(|| format!("Result for {} rejected", match_id))?;

    if let Some(champion) = bracket.champion() {
        log::info!("{} won tournament {}", champion, bracket.tournament_id);
    }
    Ok(())
}

/// Parse a `W-L` score such as `3-1`
pub fn parse_score(score: &str) -> Result<(u32, u32)> {
    let Some((winner, loser)) = score.split_once('-') else {
        bail!("Score '{}' must look like 3-1", score);
    };
    let winner = winner
        .trim()
        .parse()
        .with_context(|| format!("Invalid winner score in '{}'", score))?;
    let loser = loser
        .trim()
        .parse()
        .with_context(|| format!("Invalid loser score in '{}'", score))?;
    Ok((winner, loser))
}

/// Read a bracket file's contents
pub fn load(json: &str) -> Result<Bracket> {
    Bracket::from_json(json).context("Not a bracket file")
}

pub fn to_json(bracket: &Bracket, config: &CliConfig) -> Result<String> {
    let json = if config.pretty_json {
        bracket.to_json_pretty()?
    } else {
        bracket.to_json()?
    };
    Ok(json)
}

/// One line per competitor: placement, record and byes
pub fn render_standings(bracket: &Bracket) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:<5} {:<20} {:>4} {:>6} {:>4}",
        "PLACE", "SEED", "COMPETITOR", "WINS", "LOSSES", "BYES"
    );

    for record in standings(bracket) {
        let place = match record.placement {
            Some(placement) => placement.to_string(),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<6} {:<5} {:<20} {:>4} {:>6} {:>4}",
            place, record.seed, record.name, record.wins, record.losses, record.byes
        );
    }

    match bracket.champion() {
        Some(champion) => {
            let name = bracket
                .competitor(champion)
                .map_or(champion.as_str(), |c| c.name.as_str());
            let _ = writeln!(out, "\nChampion: {}", name);
        }
        None => {
            let _ = writeln!(
                out,
                "\n{} match(es) playable",
                bracket.playable_matches().len()
            );
        }
    }
    out
}

/// Matches waiting for a result, grouped by bracket side
pub fn render_playable(bracket: &Bracket) -> String {
    let mut out = String::new();
    let playable = bracket.playable_matches();
    if playable.is_empty() {
        out.push_str("No playable matches\n");
        return out;
    }

    for m in playable {
        let Some((first, second)) = m.occupants() else {
            continue;
        };
        let side = match m.bracket_side {
            BracketSide::Winners => "winners",
            BracketSide::Losers => "losers",
            BracketSide::GrandFinals => "grand finals",
        };
        let _ = writeln!(
            out,
            "{:<6} {:<13} {} vs {}",
            m.id.to_string(),
            side,
            first,
            second
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR: &str = r#"[
        {"id": "A", "name": "Alpha"},
        {"id": "B", "name": "Bravo"},
        {"id": "C", "name": "Charlie"},
        {"id": "D", "name": "Delta"}
    ]"#;

    #[test]
    fn test_build_from_json() {
        let bracket = build(FOUR, 3, &CliConfig::default()).unwrap();
        assert_eq!(bracket.tournament_id, 3);
        assert_eq!(bracket.competitors[3].id.as_str(), "D");
        assert_eq!(bracket.competitors[3].seed, 4);
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(build("{}", 1, &CliConfig::default()).is_err());
        assert!(build(r#"[{"id": "A", "name": "Alpha"}]"#, 1, &CliConfig::default()).is_err());

        let config = CliConfig {
            max_competitors: 3,
            ..CliConfig::default()
        };
        let err = build(FOUR, 1, &config).unwrap_err();
        assert!(err.to_string().contains("limit of 3"));
    }

    #[test]
    fn test_report_and_reload() {
        let config = CliConfig::default();
        let mut bracket = build(FOUR, 1, &config).unwrap();
        report(&mut bracket, "W1-1", "A", "D", Some("2-0")).unwrap();

        let reloaded = load(&to_json(&bracket, &config).unwrap()).unwrap();
        assert_eq!(reloaded, bracket);
        let m = reloaded.get_match(&"W1-1".parse().unwrap()).unwrap();
        assert_eq!((m.slot1_score, m.slot2_score), (2, 0));
    }

    #[test]
    fn test_report_errors() {
        let mut bracket = build(FOUR, 1, &CliConfig::default()).unwrap();
        assert!(report(&mut bracket, "X9", "A", "D", None).is_err());
        assert!(report(&mut bracket, "W1-1", "A", "B", None).is_err());
        assert!(report(&mut bracket, "W1-1", "A", "D", Some("two-nil")).is_err());
        assert_eq!(bracket.playable_matches().len(), 2);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("3-1").unwrap(), (3, 1));
        assert_eq!(parse_score(" 2 - 0 ").unwrap(), (2, 0));
        assert!(parse_score("3:1").is_err());
        assert!(parse_score("-1").is_err());
    }

    #[test]
    fn test_render_playable() {
        let mut bracket = build(FOUR, 1, &CliConfig::default()).unwrap();
        let text = render_playable(&bracket);
        assert!(text.contains("W1-1   winners       A vs D"));
        assert!(text.contains("W1-2"));

        for (id, winner, loser) in [
            ("W1-1", "A", "D"),
            ("W1-2", "B", "C"),
            ("W2-1", "A", "B"),
            ("L1-1", "C", "D"),
            ("L2-1", "C", "B"),
        ] {
            report(&mut bracket, id, winner, loser, None).unwrap();
        }
        assert!(render_playable(&bracket).contains("GF1    grand finals  A vs C"));

        report(&mut bracket, "GF1", "A", "C", None).unwrap();
        assert_eq!(render_playable(&bracket), "No playable matches\n");
    }

    #[test]
    fn test_render_standings() {
        let mut bracket = build(FOUR, 1, &CliConfig::default()).unwrap();
        for (id, winner, loser) in [
            ("W1-1", "A", "D"),
            ("W1-2", "B", "C"),
            ("W2-1", "A", "B"),
            ("L1-1", "C", "D"),
            ("L2-1", "C", "B"),
            ("GF1", "A", "C"),
        ] {
            report(&mut bracket, id, winner, loser, None).unwrap();
        }

        let text = render_standings(&bracket);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("PLACE"));
        assert!(lines[1].starts_with("1") && lines[1].contains("Alpha"));
        assert!(lines[4].starts_with("4") && lines[4].contains("Delta"));
        assert!(text.contains("Champion: Alpha"));
    }
}
