use serde::Deserialize;

/// High-level narrator configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct NarratorConfig {
    #[serde(default = "crate::config::defaults::default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "crate::config::defaults::default_voice_id")]
    pub voice_id: String,
    #[serde(default = "crate::config::defaults::default_synthesis_timeout_secs")]
    pub synthesis_timeout_secs: u64,
    #[serde(default = "crate::config::defaults::default_per_word_seconds")]
    pub per_word_seconds: f64,
    #[serde(default = "crate::config::defaults::default_highlight_hold_ms")]
    pub highlight_hold_ms: u64,
    #[serde(default = "crate::config::defaults::default_page_turn_lead_ms")]
    pub page_turn_lead_ms: u64,
    #[serde(default = "crate::config::defaults::default_page_turn_settle_ms")]
    pub page_turn_settle_ms: u64,
    #[serde(default = "crate::config::defaults::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_volume")]
    pub volume: f32,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        NarratorConfig {
            gateway_url: crate::config::defaults::default_gateway_url(),
            voice_id: crate::config::defaults::default_voice_id(),
            synthesis_timeout_secs: crate::config::defaults::default_synthesis_timeout_secs(),
            per_word_seconds: crate::config::defaults::default_per_word_seconds(),
            highlight_hold_ms: crate::config::defaults::default_highlight_hold_ms(),
            page_turn_lead_ms: crate::config::defaults::default_page_turn_lead_ms(),
            page_turn_settle_ms: crate::config::defaults::default_page_turn_settle_ms(),
            tick_interval_ms: crate::config::defaults::default_tick_interval_ms(),
            volume: crate::config::defaults::default_volume(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            log_level: crate::config::defaults::default_log_level(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
