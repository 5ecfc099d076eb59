use super::models::NarratorConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Load configuration from disk, falling back to defaults on any problem.
/// Numeric fields are clamped so one bad value cannot wedge playback timing.
pub fn load_config(path: &Path) -> NarratorConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded config");
            data
        }
        Err(err) => {
            warn!(path = %path.display(), "Falling back to default config: {err}");
            return clamp_config(NarratorConfig::default());
        }
    };

    match toml::from_str::<NarratorConfig>(&contents) {
        Ok(config) => {
            debug!("Parsed configuration from disk");
            clamp_config(config)
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            clamp_config(NarratorConfig::default())
        }
    }
}

fn clamp_config(mut config: NarratorConfig) -> NarratorConfig {
    config.synthesis_timeout_secs = config.synthesis_timeout_secs.clamp(1, 120);
    config.per_word_seconds = config.per_word_seconds.clamp(0.05, 2.0);
    config.highlight_hold_ms = config.highlight_hold_ms.min(5_000);
    config.page_turn_lead_ms = config.page_turn_lead_ms.min(5_000);
    config.page_turn_settle_ms = config.page_turn_settle_ms.min(5_000);
    config.tick_interval_ms = config.tick_interval_ms.clamp(16, 1_000);
    config.volume = config.volume.clamp(0.0, 2.0);
    if config.cache_dir.trim().is_empty() {
        config.cache_dir = crate::config::defaults::default_cache_dir();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/definitely/not/here.toml"));
        assert_eq!(config.per_word_seconds, 0.4);
        assert_eq!(config.highlight_hold_ms, 600);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("story-narrator-config-{nonce}.toml"));
        fs::write(
            &path,
            "per_word_seconds = 9.0\ntick_interval_ms = 1\nvolume = 5.0\ncache_dir = \"  \"\n",
        )
        .unwrap();
        let config = load_config(&path);
        assert_eq!(config.per_word_seconds, 2.0);
        assert_eq!(config.tick_interval_ms, 16);
        assert_eq!(config.volume, 2.0);
        assert_eq!(config.cache_dir, ".cache");
        let _ = fs::remove_file(path);
    }
}
