use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HabitusConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub summary: SummaryConfig,
    pub assistant: AssistantConfig,
    pub board: BoardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub history_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummaryConfig {
    pub default_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AssistantConfig {
    /// Full URL of the text-generation endpoint (Ollama `/api/generate`).
    pub endpoint: String,
    pub model: String,
    /// How many of the most recent history snapshots go into the prompt.
    pub context_entries: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoardConfig {
    pub tasks: Vec<TaskSpec>,
}

/// A habit shown on the board: display name plus an icon.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

impl TaskSpec {
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

impl Default for HabitusConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            summary: SummaryConfig::default(),
            assistant: AssistantConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_habitus_dir();
        Self {
            db_path: dir.join("progress.db").to_string_lossy().into_owned(),
            history_path: dir.join("history.json").to_string_lossy().into_owned(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { default_days: 7 }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".into(),
            model: "llama3".into(),
            context_entries: 7,
            timeout_secs: 120,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tasks: vec![
                TaskSpec::new("Read books consistently", "📚"),
                TaskSpec::new("Meditate daily", "🧘"),
                TaskSpec::new("Exercise daily", "💪"),
                TaskSpec::new("Clean workspace", "🧹"),
                TaskSpec::new("Do Coding", "💻"),
                TaskSpec::new("Listen Tech podcasts daily", "🎧"),
                TaskSpec::new("Family time", "👪"),
                TaskSpec::new("Drink water", "💧"),
            ],
        }
    }
}

/// Returns `~/.habitus/`, falling back to the working directory when no home is set.
pub fn default_habitus_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".habitus")
}

/// Returns the default config file path: `~/.habitus/config.toml`
pub fn default_config_path() -> PathBuf {
    default_habitus_dir().join("config.toml")
}

impl HabitusConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            HabitusConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (HABITUS_DB, HABITUS_HISTORY,
    /// HABITUS_LOG_LEVEL, HABITUS_ASSISTANT_URL, HABITUS_MODEL, HABITUS_PORT).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HABITUS_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("HABITUS_HISTORY") {
            self.storage.history_path = val;
        }
        if let Ok(val) = std::env::var("HABITUS_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("HABITUS_ASSISTANT_URL") {
            self.assistant.endpoint = val;
        }
        if let Ok(val) = std::env::var("HABITUS_MODEL") {
            self.assistant.model = val;
        }
        if let Ok(val) = std::env::var("HABITUS_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid HABITUS_PORT"),
            }
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the history file path, expanding `~` if needed.
    pub fn resolved_history_path(&self) -> PathBuf {
        expand_tilde(&self.storage.history_path)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
