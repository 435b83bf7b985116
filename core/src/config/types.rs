use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub form: FormConfig,

    #[serde(default)]
    pub replay: ReplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `api_key` in the simulate request. Empty lets the service use its own.
    #[serde(default)]
    pub api_key: String,

    /// Upper bound on a single simulate request. Unset means wait indefinitely.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_catalog_timeout_ms() -> u64 {
    10_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            request_timeout_ms: None,
            catalog_timeout_ms: default_catalog_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Substituted whenever a player selects "custom" and leaves the override blank.
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_players")]
    pub default_players: usize,

    #[serde(default = "default_min_players")]
    pub min_players: usize,

    #[serde(default = "default_max_players")]
    pub max_players: usize,
}

/// Built-in fallback model identifier.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_players() -> usize {
    3
}

fn default_min_players() -> usize {
    1
}

fn default_max_players() -> usize {
    8
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            default_players: default_players(),
            min_players: default_min_players(),
            max_players: default_max_players(),
        }
    }
}

impl FormConfig {
    pub fn clamp_players(&self, n: usize) -> usize {
        let min = self.min_players.max(1);
        let max = self.max_players.max(min);
        n.clamp(min, max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Pause between two narrated events.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Refresh period of the elapsed-time display while a request is in flight.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    1_500
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "escoba_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
}

fn default_update_interval_ms() -> u64 {
    100
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            update_interval_ms: default_update_interval_ms(),
        }
    }
}
