//! Bracket configuration models.

use serde::{Deserialize, Serialize};

/// How first-round byes show up in competitor statistics
///
/// Byes never change the match graph; this only affects standings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByePolicy {
    /// A bye is recorded but never counted as a win
    #[default]
    Exclude,
    /// A bye counts as a win for the advancing competitor
    Count,
}

impl std::fmt::Display for ByePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByePolicy::Exclude => write!(f, "exclude"),
            ByePolicy::Count => write!(f, "count"),
        }
    }
}

impl std::str::FromStr for ByePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exclude" => Ok(ByePolicy::Exclude),
            "count" => Ok(ByePolicy::Count),
            other => Err(format!("unknown bye policy '{other}'")),
        }
    }
}

/// Grand finals format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrandFinalsMode {
    /// Losers-bracket champion winning game one forces a second match
    #[default]
    Reset,
    /// One match decides the tournament
    Single,
}

impl std::fmt::Display for GrandFinalsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrandFinalsMode::Reset => write!(f, "reset"),
            GrandFinalsMode::Single => write!(f, "single"),
        }
    }
}

impl std::str::FromStr for GrandFinalsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reset" => Ok(GrandFinalsMode::Reset),
            "single" => Ok(GrandFinalsMode::Single),
            other => Err(format!("unknown grand finals mode '{other}'")),
        }
    }
}

/// Bracket configuration, stored on the bracket it was built with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketConfig {
    /// Bye accounting in standings
    #[serde(default)]
    pub bye_policy: ByePolicy,

    /// Grand finals format
    #[serde(default)]
    pub grand_finals: GrandFinalsMode,
}

impl BracketConfig {
    /// Set the bye policy
    pub fn with_bye_policy(mut self, bye_policy: ByePolicy) -> Self {
        self.bye_policy = bye_policy;
        self
    }

    /// Set the grand finals format
    pub fn with_grand_finals(mut self, grand_finals: GrandFinalsMode) -> Self {
        self.grand_finals = grand_finals;
        self
    }
}
