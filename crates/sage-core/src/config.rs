use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration for the Sage assistant.
///
/// Loaded from `~/.sage/config.toml` by default. Every section is optional
/// in the file and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl SageConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SageConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the session database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.sage/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Knowledge provider endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Instant-answer endpoint (structured abstract/answer/definition).
    pub instant_answer_url: String,
    /// Encyclopedic summary endpoint; the topic is appended as a path segment.
    pub summary_url: String,
    /// User-Agent sent with every provider request.
    pub user_agent: String,
    /// Optional per-request timeout. `None` means requests are never cut short.
    pub timeout_secs: Option<u64>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            instant_answer_url: "https://api.duckduckgo.com/".to_string(),
            summary_url: "https://en.wikipedia.org/api/rest_v1/page/summary/".to_string(),
            user_agent: format!("sage/{} (terminal assistant)", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

/// Conversation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum accepted input length in characters.
    pub max_message_length: usize,
    /// Resume the most recent stored session instead of starting a fresh one.
    pub resume_latest: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            resume_latest: false,
        }
    }
}

/// Speech output and capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Whether replies are spoken at all.
    pub speech_enabled: bool,
    /// Text-to-speech program; the text is passed as its last argument.
    pub tts_command: Option<String>,
    /// Speech-to-text program; must print one transcript line on stdout.
    pub stt_command: Option<String>,
    /// Recognition language hint passed to the capture program.
    pub language: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speech_enabled: true,
            tts_command: None,
            stt_command: None,
            language: "en-US".to_string(),
        }
    }
}

/// History export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default file name for exported history.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "sage_chat_history.json".to_string(),
        }
    }
}
