use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::difficulty::Difficulty;

pub const DEFAULT_TICK_RATE_MS: u64 = 10;

/// Preferences read at startup. The ranking is never part of this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub player: Option<String>,
    pub difficulty: Difficulty,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: None,
            difficulty: Difficulty::default(),
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
        }
    }
}

impl Config {
    /// Layer command line values over the file values
    pub fn merged(
        mut self,
        player: Option<String>,
        difficulty: Option<Difficulty>,
        tick_rate_ms: Option<u64>,
    ) -> Self {
        if player.is_some() {
            self.player = player;
        }
        if let Some(d) = difficulty {
            self.difficulty = d;
        }
        if let Some(t) = tick_rate_ms {
            self.tick_rate_ms = t;
        }
        self.tick_rate_ms = self.tick_rate_ms.max(1);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "snapkey") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("snapkey_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
