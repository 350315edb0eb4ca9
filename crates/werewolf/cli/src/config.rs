//! CLI configuration
//!
//! Read from `config.toml` under the platform config directory unless a path
//! is given. A missing file yields the defaults.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use werewolf_runtime::GameConfig;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Sessions per `play` invocation when `--sessions` is absent
    pub sessions: Option<usize>,

    /// Where moderator state is persisted between invocations
    pub state_file: Option<PathBuf>,

    /// Table configuration handed to the moderator
    pub game: GameConfig,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            Ok(CliConfig::default())
        }
    }

    pub fn from_toml(contents: &str) -> CliResult<Self> {
        let config: CliConfig =
            toml::from_str(contents).map_err(|e| CliError::Config(e.to_string()))?;
        config.game.validate()?;
        Ok(config)
    }

    /// State file to use: explicit flag, then config, then the data directory
    pub fn resolve_state_file(&self, flag: Option<&Path>) -> CliResult<PathBuf> {
        if let Some(path) = flag.or(self.state_file.as_deref()) {
            return Ok(path.to_path_buf());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CliError::Config("Cannot find data directory".into()))?;
        Ok(data_dir.join("werewolf").join("state.json"))
    }

    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("werewolf").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config() {
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = CliConfig::from_toml(
            r#"
            sessions = 5
            state_file = "/tmp/werewolf.json"

            [game]
            seed = 42
            discussion_rounds = 2

            [game.policy]
            poison_weight = 0.6
            "#,
        )
        .unwrap();

        assert_eq!(config.sessions, Some(5));
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.game.discussion_rounds, 2);
        assert_eq!(config.game.policy.poison_weight, 0.6);
        assert_eq!(config.game.policy.key_target_bias, 0.7);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let result = CliConfig::from_toml("[game.policy]\nkey_target_bias = 2.0\n");
        assert!(matches!(result, Err(CliError::Game(_))));
    }

    #[test]
    fn test_state_file_precedence() {
        let config = CliConfig {
            state_file: Some(PathBuf::from("/from/config.json")),
            ..CliConfig::default()
        };
        assert_eq!(
            config
                .resolve_state_file(Some(Path::new("/from/flag.json")))
                .unwrap(),
            PathBuf::from("/from/flag.json")
        );
        assert_eq!(
            config.resolve_state_file(None).unwrap(),
            PathBuf::from("/from/config.json")
        );
    }
}
