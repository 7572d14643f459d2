//! Arena configuration: who plays and under which limits.

use crate::error::ConfigError;
use crate::orchestrator::{DEFAULT_MAX_TURNS, MatchSettings};
use crate::proposers::{Proposer, ProposerKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name used in logs and notifications.
    name: String,

    /// Which built-in proposer plays this seat.
    kind: ProposerKind,

    /// Replies for the scripted proposer.
    #[serde(default)]
    replies: Vec<String>,
}

impl PlayerConfig {
    /// Creates a seat configuration.
    pub fn new(name: impl Into<String>, kind: ProposerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            replies: Vec::new(),
        }
    }

    /// Replaces the proposer kind, keeping the name.
    pub fn with_kind(mut self, kind: ProposerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builds the configured proposer.
    pub fn build(&self, seed: Option<u64>) -> Box<dyn Proposer> {
        self.kind.build(self.name.clone(), self.replies.clone(), seed)
    }
}

/// Limits for every match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Turns allowed before the match is abandoned.
    #[serde(default = "default_max_turns")]
    max_turns: usize,

    /// Seconds a proposer may think before forfeiting the turn.
    #[serde(default)]
    turn_timeout_secs: Option<u64>,

    /// Seed for the extractor fallback and noisy proposers.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            turn_timeout_secs: None,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Orchestrator limits derived from this config.
    pub fn settings(&self) -> MatchSettings {
        MatchSettings {
            max_turns: self.max_turns,
            turn_timeout: self.turn_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Full arena configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Match limits.
    #[serde(default, rename = "match")]
    match_config: MatchConfig,

    /// Seat X (moves first).
    #[serde(default = "default_player_x")]
    player_x: PlayerConfig,

    /// Seat O.
    #[serde(default = "default_player_o")]
    player_o: PlayerConfig,
}

fn default_player_x() -> PlayerConfig {
    PlayerConfig::new("StrategicXAgent", ProposerKind::Strategist)
}

fn default_player_o() -> PlayerConfig {
    PlayerConfig::new("AggressiveOAgent", ProposerKind::Aggressive)
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            player_x: default_player_x(),
            player_o: default_player_o(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Proposer kind for X.
    pub x: Option<ProposerKind>,
    /// Proposer kind for O.
    pub o: Option<ProposerKind>,
    /// Random seed.
    pub seed: Option<u64>,
    /// Turn timeout in seconds.
    pub turn_timeout_secs: Option<u64>,
    /// Turn cap.
    pub max_turns: Option<usize>,
}

impl ArenaConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            player_x = %config.player_x.name,
            player_o = %config.player_o.name,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn apply(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(kind) = overrides.x {
            self.player_x = self.player_x.with_kind(kind);
        }
        if let Some(kind) = overrides.o {
            self.player_o = self.player_o.with_kind(kind);
        }
        if let Some(seed) = overrides.seed {
            self.match_config.seed = Some(seed);
        }
        if let Some(secs) = overrides.turn_timeout_secs {
            self.match_config.turn_timeout_secs = Some(secs);
        }
        if let Some(max_turns) = overrides.max_turns {
            self.match_config.max_turns = max_turns;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.match_config.max_turns == 0 {
            return Err(ConfigError::new("max_turns must be at least 1".to_string()));
        }
        if self.match_config.turn_timeout_secs == Some(0) {
            return Err(ConfigError::new(
                "turn_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.player_x.name == self.player_o.name {
            return Err(ConfigError::new(format!(
                "Both seats are named '{}'",
                self.player_x.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_personas() {
        let config = ArenaConfig::default();
        assert_eq!(config.player_x().kind(), &ProposerKind::Strategist);
        assert_eq!(config.player_o().kind(), &ProposerKind::Aggressive);
        assert_eq!(config.match_config().max_turns(), &DEFAULT_MAX_TURNS);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = ArenaConfig::default()
            .apply(Overrides {
                x: Some(ProposerKind::Lowest),
                seed: Some(9),
                turn_timeout_secs: Some(5),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(config.player_x().kind(), &ProposerKind::Lowest);
        assert_eq!(config.player_x().name(), "StrategicXAgent");
        assert_eq!(config.match_config().seed(), &Some(9));
        assert_eq!(
            config.match_config().settings().turn_timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_zero_turn_cap_rejected() {
        let result = ArenaConfig::default().apply(Overrides {
            max_turns: Some(0),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }
}
