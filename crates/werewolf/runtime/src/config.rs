//! Table configuration

use crate::ledger::DEFAULT_EFFECTIVE_THRESHOLD;
use serde::{Deserialize, Serialize};
use werewolf_types::{WerewolfError, WerewolfResult};

/// Number of night discussion rounds among werewolves
pub const DEFAULT_DISCUSSION_ROUNDS: u32 = 3;

/// Weights used by the heuristic decision policy
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Probability a werewolf goes for a key good-camp target
    pub key_target_bias: f64,
    /// Probability the witch resurrects while a key target is alive
    pub resurrect_weight: f64,
    /// Probability the witch poisons while a werewolf is alive
    pub poison_weight: f64,
    /// Win fraction above which a target becomes effective
    pub effective_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            key_target_bias: 0.7,
            resurrect_weight: 0.7,
            poison_weight: 0.8,
            effective_threshold: DEFAULT_EFFECTIVE_THRESHOLD,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> WerewolfResult<()> {
        let weights = [
            ("key_target_bias", self.key_target_bias),
            ("resurrect_weight", self.resurrect_weight),
            ("poison_weight", self.poison_weight),
            ("effective_threshold", self.effective_threshold),
        ];
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(WerewolfError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for a moderator and every session it runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
    pub discussion_rounds: u32,
    pub policy: PolicyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            discussion_rounds: DEFAULT_DISCUSSION_ROUNDS,
            policy: PolicyConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> WerewolfResult<()> {
        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.discussion_rounds, 3);
        assert!(config.seed.is_none());
        assert_eq!(config.policy.poison_weight, 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.discussion_rounds, DEFAULT_DISCUSSION_ROUNDS);
        assert_eq!(config.policy, PolicyConfig::default());
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let mut config = GameConfig::default();
        config.policy.resurrect_weight = 1.5;
        assert!(matches!(
            config.validate(),
            Err(WerewolfError::InvalidConfig(_))
        ));
    }
}
