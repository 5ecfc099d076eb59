pub(crate) fn default_gateway_url() -> String {
    "http://127.0.0.1:8000/generate".to_string()
}

pub(crate) fn default_voice_id() -> String {
    "storyteller-warm".to_string()
}

pub(crate) fn default_synthesis_timeout_secs() -> u64 {
    20
}

/// Approximation used to reconstruct the gateway's duration estimate during
/// alignment rescaling; a heuristic, not a measured constant.
pub(crate) fn default_per_word_seconds() -> f64 {
    0.4
}

pub(crate) fn default_highlight_hold_ms() -> u64 {
    600
}

pub(crate) fn default_page_turn_lead_ms() -> u64 {
    400
}

pub(crate) fn default_page_turn_settle_ms() -> u64 {
    400
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    100
}

pub(crate) fn default_volume() -> f32 {
    1.0
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}
