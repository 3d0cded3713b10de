use anyhow::Context;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub use chatline_model::LimitsConfig;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "chatline.toml",
    "config/chatline.toml",
    "crates/config/chatline.toml",
];

/// Offsets must stay strictly within one day either side of UTC.
const MAX_OFFSET_MINUTES: i32 = 24 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

/// How timestamps and date headings are rendered.
///
/// ```
/// use chatline_config::DisplayConfig;
///
/// let display = DisplayConfig { utc_offset_minutes: 90 };
/// assert_eq!(display.offset().local_minus_utc(), 5400);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl DisplayConfig {
    /// Display offset; falls back to UTC when out of range
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.utc_offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES.unsigned_abs() {
            anyhow::bail!(
                "display.utc_offset_minutes must be within ±{} (got {})",
                MAX_OFFSET_MINUTES - 1,
                self.utc_offset_minutes
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "SuggestionConfig::default_max_results")]
    pub max_results: usize,
}

impl SuggestionConfig {
    const fn default_max_results() -> usize {
        8
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_results: Self::default_max_results(),
        }
    }
}

fn to_i64(value: impl TryInto<i64>) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

/// Load the configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use chatline_config::load;
///
/// std::env::remove_var("CHATLINE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(config.limits.max_content_length > 0);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default(
            "limits.max_content_length",
            to_i64(defaults.limits.max_content_length),
        )?
        .set_default(
            "limits.max_attachments",
            to_i64(defaults.limits.max_attachments),
        )?
        .set_default(
            "limits.max_attachment_bytes",
            to_i64(defaults.limits.max_attachment_bytes),
        )?
        .set_default(
            "limits.max_thread_depth",
            to_i64(defaults.limits.max_thread_depth),
        )?
        .set_default(
            "display.utc_offset_minutes",
            i64::from(defaults.display.utc_offset_minutes),
        )?
        .set_default(
            "suggestions.max_results",
            to_i64(defaults.suggestions.max_results),
        )?;

    let environment_overrides = config::Environment::with_prefix("CHATLINE").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CHATLINE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CHATLINE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    config.display.validate().context("invalid configuration")?;

    debug!(?config, "loaded chatline configuration");
    Ok(config)
}
