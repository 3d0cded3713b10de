use serde::{Deserialize, Serialize};

/// Size and nesting limits applied when validating messages.
///
/// ```
/// use chatline_model::LimitsConfig;
///
/// let limits = LimitsConfig::default();
/// assert_eq!(limits.max_content_length, 100_000);
/// assert_eq!(limits.max_thread_depth, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "LimitsConfig::default_max_content_length")]
    pub max_content_length: usize,
    #[serde(default = "LimitsConfig::default_max_attachments")]
    pub max_attachments: usize,
    #[serde(default = "LimitsConfig::default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,
    /// Deepest allowed reply; a top-level message is depth 0.
    #[serde(default = "LimitsConfig::default_max_thread_depth")]
    pub max_thread_depth: usize,
}

impl LimitsConfig {
    const fn default_max_content_length() -> usize {
        100_000
    }

    const fn default_max_attachments() -> usize {
        10
    }

    const fn default_max_attachment_bytes() -> u64 {
        100 * 1024 * 1024
    }

    const fn default_max_thread_depth() -> usize {
        2
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_content_length: Self::default_max_content_length(),
            max_attachments: Self::default_max_attachments(),
            max_attachment_bytes: Self::default_max_attachment_bytes(),
            max_thread_depth: Self::default_max_thread_depth(),
        }
    }
}
