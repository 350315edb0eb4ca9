//! Moderator state on disk

use crate::error::CliResult;
use std::path::{Path, PathBuf};
use tracing::debug;
use werewolf_runtime::{GameConfig, Moderator, ModeratorState};

/// A JSON state file; absent until the first save
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> CliResult<Option<ModeratorState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No state file yet");
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(ModeratorState::from_json(&contents)?))
    }

    pub fn save(&self, state: &ModeratorState) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, state.to_json()?)?;
        debug!(path = %self.path.display(), "State saved");
        Ok(())
    }

    /// A moderator continuing from the stored state, or a fresh one
    pub fn moderator(&self, config: GameConfig) -> CliResult<Moderator> {
        let moderator = match self.load()? {
            Some(state) => Moderator::restore(config, state)?,
            None => Moderator::new(config)?,
        };
        Ok(moderator)
    }
}
