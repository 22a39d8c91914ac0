use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use teloxide::types::ChatId;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// Chats where games may be played. Empty means everywhere.
    #[serde(default)]
    allowed_chats: Vec<i64>,
    /// Directory for logs. Defaults to current directory.
    data_dir: Option<String>,
    #[serde(default)]
    game: GameSettingsFile,
}

#[derive(Deserialize)]
#[serde(default)]
struct GameSettingsFile {
    timeout_secs: u64,
    default_rounds: usize,
    min_rounds: usize,
    max_rounds: usize,
    success_reaction: String,
}

impl Default for GameSettingsFile {
    fn default() -> Self {
        Self {
            timeout_secs: crate::game::runner::DEFAULT_GAME_TIMEOUT.as_secs(),
            default_rounds: 5,
            min_rounds: 3,
            max_rounds: 10,
            success_reaction: "👍".to_string(),
        }
    }
}

/// Tunables for the strategem game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Time allowed for the whole game, not per round.
    pub timeout: Duration,
    pub default_rounds: usize,
    pub min_rounds: usize,
    pub max_rounds: usize,
    /// Emoji reaction put on a correct answer.
    pub success_reaction: String,
}

impl GameSettings {
    /// Round count for a request, clamped into the configured range.
    pub fn rounds_for(&self, requested: Option<i64>) -> usize {
        crate::game::clamp_rounds(requested, self.default_rounds, self.min_rounds, self.max_rounds)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettingsFile::default().into()
    }
}

impl From<GameSettingsFile> for GameSettings {
    fn from(file: GameSettingsFile) -> Self {
        Self {
            timeout: Duration::from_secs(file.timeout_secs),
            default_rounds: file.default_rounds,
            min_rounds: file.min_rounds,
            max_rounds: file.max_rounds,
            success_reaction: file.success_reaction,
        }
    }
}

pub struct Config {
    /// Path to the config file.
    pub config_path: PathBuf,
    pub telegram_bot_token: String,
    pub allowed_chats: HashSet<ChatId>,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
    pub game: GameSettings,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        let game = &file.game;
        if game.timeout_secs == 0 {
            return Err(ConfigError::Validation("game.timeout_secs must be positive".into()));
        }
        if game.min_rounds == 0 {
            return Err(ConfigError::Validation("game.min_rounds must be at least 1".into()));
        }
        if game.min_rounds > game.max_rounds {
            return Err(ConfigError::Validation(format!(
                "game.min_rounds ({}) exceeds game.max_rounds ({})",
                game.min_rounds, game.max_rounds
            )));
        }
        if game.success_reaction.is_empty() {
            return Err(ConfigError::Validation("game.success_reaction must not be empty".into()));
        }

        let allowed_chats = file.allowed_chats.into_iter().map(ChatId).collect();
        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            config_path,
            telegram_bot_token: file.telegram_bot_token,
            allowed_chats,
            data_dir,
            game: file.game.into(),
        })
    }

    pub fn is_allowed_chat(&self, chat_id: ChatId) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }
}
