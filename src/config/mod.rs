//! # Configuration Management Module
//!
//! Centralized configuration for the grindbot engine: type-safe sections
//! with serde serialization, validated values, and sensible defaults.
//!
//! ## Configuration Structure
//!
//! - [`BotConfig`] - Bot identity and operator settings
//! - [`StorageConfig`] - Data persistence settings
//! - [`CooldownConfig`] - Per-activity cooldown durations
//! - [`SessionConfig`] - Interactive session timeouts
//! - [`WagerConfig`] - Stake limits and game toggles
//! - [`LoggingConfig`] - Logging and debugging settings
//!
//! ## Configuration File Format
//!
//! Grindbot uses TOML for human-readable configuration:
//!
//! ```toml
//! [bot]
//! name = "Grindbot"
//! operator = "sysop"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [cooldowns]
//! explore_secs = 30
//! work_secs = 300
//! ```
//!
//! Values load with a clear precedence order: CLI args > config file >
//! defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::actions::SessionTimeouts;
use crate::game::cooldown::CooldownSchedule;

/// Bot identity and operator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub name: String,
    /// Operator account allowed to run grant/sweep commands.
    pub operator: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Optional override for the sled database path; defaults to
    /// `<data_dir>/game`.
    #[serde(default)]
    pub game_db_path: Option<String>,
}

impl StorageConfig {
    pub fn game_db_path(&self) -> String {
        self.game_db_path
            .clone()
            .unwrap_or_else(|| format!("{}/game", self.data_dir))
    }
}

/// Per-activity cooldown durations, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    #[serde(default = "default_explore_secs")]
    pub explore_secs: u32,
    #[serde(default = "default_mine_secs")]
    pub mine_secs: u32,
    #[serde(default = "default_fish_secs")]
    pub fish_secs: u32,
    #[serde(default = "default_work_secs")]
    pub work_secs: u32,
    #[serde(default = "default_boss_fight_secs")]
    pub boss_fight_secs: u32,
    #[serde(default = "default_clan_war_secs")]
    pub clan_war_secs: u32,
    #[serde(default = "default_wager_secs")]
    pub wager_secs: u32,
}

fn default_explore_secs() -> u32 {
    30
}
fn default_mine_secs() -> u32 {
    45
}
fn default_fish_secs() -> u32 {
    60
}
fn default_work_secs() -> u32 {
    300
}
fn default_boss_fight_secs() -> u32 {
    180
}
fn default_clan_war_secs() -> u32 {
    600
}
fn default_wager_secs() -> u32 {
    15
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            explore_secs: default_explore_secs(),
            mine_secs: default_mine_secs(),
            fish_secs: default_fish_secs(),
            work_secs: default_work_secs(),
            boss_fight_secs: default_boss_fight_secs(),
            clan_war_secs: default_clan_war_secs(),
            wager_secs: default_wager_secs(),
        }
    }
}

impl CooldownConfig {
    pub fn schedule(&self) -> CooldownSchedule {
        CooldownSchedule {
            explore_secs: self.explore_secs,
            mine_secs: self.mine_secs,
            fish_secs: self.fish_secs,
            work_secs: self.work_secs,
            boss_fight_secs: self.boss_fight_secs,
            clan_war_secs: self.clan_war_secs,
            wager_secs: self.wager_secs,
        }
    }
}

/// Interactive session timeouts, seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_chest_secs")]
    pub chest_secs: i64,
    #[serde(default = "default_replacement_secs")]
    pub replacement_secs: i64,
    #[serde(default = "default_weapon_secs")]
    pub weapon_secs: i64,
    #[serde(default = "default_blackjack_secs")]
    pub blackjack_secs: i64,
}

fn default_chest_secs() -> i64 {
    60
}
fn default_replacement_secs() -> i64 {
    60
}
fn default_weapon_secs() -> i64 {
    30
}
fn default_blackjack_secs() -> i64 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chest_secs: default_chest_secs(),
            replacement_secs: default_replacement_secs(),
            weapon_secs: default_weapon_secs(),
            blackjack_secs: default_blackjack_secs(),
        }
    }
}

impl SessionConfig {
    pub fn timeouts(&self) -> SessionTimeouts {
        SessionTimeouts {
            chest_secs: self.chest_secs,
            replacement_secs: self.replacement_secs,
            weapon_secs: self.weapon_secs,
            blackjack_secs: self.blackjack_secs,
        }
    }
}

/// Stake limits and per-game toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagerConfig {
    pub max_stake: u64,
    #[serde(default = "default_true")]
    pub blackjack_enabled: bool,
    #[serde(default = "default_true")]
    pub roulette_enabled: bool,
    #[serde(default = "default_true")]
    pub slots_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WagerConfig {
    fn default() -> Self {
        Self {
            max_stake: 1_000_000,
            blackjack_enabled: true,
            roulette_enabled: true,
            slots_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub cooldowns: CooldownConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
    #[serde(default)]
    pub wagers: WagerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir cannot be empty"));
        }
        if self.wagers.max_stake == 0 {
            return Err(anyhow!("wagers.max_stake must be greater than zero"));
        }
        if self.sessions.chest_secs < 0
            || self.sessions.replacement_secs < 0
            || self.sessions.weapon_secs < 0
            || self.sessions.blackjack_secs < 0
        {
            return Err(anyhow!("session timeouts cannot be negative"));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => return Err(anyhow!("unknown logging.level '{}'", other)),
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot: BotConfig {
                name: "Grindbot".to_string(),
                operator: "sysop".to_string(),
                description: "A game bot for chat platforms".to_string(),
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
                game_db_path: None,
            },
            cooldowns: CooldownConfig::default(),
            sessions: SessionConfig::default(),
            wagers: WagerConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("grindbot.log".to_string()),
            },
        }
    }
}
