use crate::model::Difficulty;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,

    #[serde(default = "default_reveal_duration_ms")]
    pub reveal_duration_ms: u64,

    #[serde(default = "default_match_check_delay_ms")]
    pub match_check_delay_ms: u64,

    #[serde(default = "default_mismatch_delay_ms")]
    pub mismatch_delay_ms: u64,

    #[serde(default = "default_symbol_pool_size")]
    pub symbol_pool_size: u32,

    #[serde(default = "default_leaderboard_limit")]
    pub leaderboard_limit: usize,

    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    #[serde(default)]
    pub seed: Option<u64>,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_time_limit_secs() -> u32 {
    60
}
fn default_reveal_duration_ms() -> u64 {
    10_000
}
fn default_match_check_delay_ms() -> u64 {
    200
}
fn default_mismatch_delay_ms() -> u64 {
    300
}
fn default_symbol_pool_size() -> u32 {
    15
}
fn default_leaderboard_limit() -> usize {
    10
}
fn default_asset_root() -> PathBuf {
    PathBuf::from("static/images")
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            difficulty: Difficulty::default(),
            time_limit_secs: default_time_limit_secs(),
            reveal_duration_ms: default_reveal_duration_ms(),
            match_check_delay_ms: default_match_check_delay_ms(),
            mismatch_delay_ms: default_mismatch_delay_ms(),
            symbol_pool_size: default_symbol_pool_size(),
            leaderboard_limit: default_leaderboard_limit(),
            asset_root: default_asset_root(),
            seed: None,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable. Environment overrides are applied last.
    pub fn load(path: &Path) -> Self {
        let mut settings = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    settings
                }
                Err(err) => {
                    warn!(target: "settings", "Ignoring malformed {}: {}", path.display(), err);
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };
        if let Some(seed) = Self::seed_from_env() {
            settings.seed = Some(seed);
        }
        settings
    }

    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 measured the reveal in seconds
            0 | 1 => {
                if self.reveal_duration_ms < 1_000 {
                    self.reveal_duration_ms *= 1_000;
                }
                self.version = 2;
            }
            _ => (),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    pub fn match_check_delay(&self) -> Duration {
        Duration::from_millis(self.match_check_delay_ms)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty, Difficulty::Normal);
        assert_eq!(settings.time_limit_secs, 60);
        assert_eq!(settings.reveal_duration(), Duration::from_secs(10));
        assert_eq!(settings.match_check_delay(), Duration::from_millis(200));
        assert_eq!(settings.mismatch_delay(), Duration::from_millis(300));
        assert_eq!(settings.symbol_pool_size, 15);
        assert_eq!(settings.leaderboard_limit, 10);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let parsed: Settings =
            serde_json::from_str(r#"{"version": 2, "difficulty": "hard", "time_limit_secs": 90}"#)
                .unwrap();
        assert_eq!(parsed.difficulty, Difficulty::Hard);
        assert_eq!(parsed.time_limit_secs, 90);
        assert_eq!(parsed.mismatch_delay_ms, 300);
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn test_migrate_v1_reveal_seconds() {
        let mut parsed: Settings =
            serde_json::from_str(r#"{"version": 1, "reveal_duration_ms": 5}"#).unwrap();
        parsed.migrate();
        assert_eq!(parsed.version(), 2);
        assert_eq!(parsed.reveal_duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("memory-match-settings-{}", uuid::Uuid::new_v4()));
        let path = dir.join("settings.json");
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Easy;
        settings.mismatch_delay_ms = 450;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        assert_eq!(loaded.mismatch_delay_ms, 450);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("memory-match-settings-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.time_limit_secs, 60);
        let _ = fs::remove_dir_all(dir);
    }
}
