// src/config.rs
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not found in environment or .env")]
    MissingApiKey,
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Shape of the `/call` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCallMode {
    WithText,
    AudioOnly,
}

/// Process-wide settings, built once at startup and handed to `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub host: IpAddr,
    pub port: u16,
    pub media_dir: PathBuf,
    pub tts_language: String,
    pub voice_call_mode: VoiceCallMode,
    pub generation_timeout: Duration,
    pub tts_timeout: Duration,
    pub log_json: bool,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            host: parse_or(get("HEALTHBOT_HOST"), "HEALTHBOT_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(get("HEALTHBOT_PORT"), "HEALTHBOT_PORT", 3000)?,
            media_dir: get("HEALTHBOT_MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("media")),
            tts_language: get("HEALTHBOT_TTS_LANG").unwrap_or_else(|| "en".to_string()),
            voice_call_mode: if flag(get("HEALTHBOT_CALL_AUDIO_ONLY"), "HEALTHBOT_CALL_AUDIO_ONLY")? {
                VoiceCallMode::AudioOnly
            } else {
                VoiceCallMode::WithText
            },
            generation_timeout: Duration::from_secs(parse_or(
                get("HEALTHBOT_GENERATION_TIMEOUT_SECS"),
                "HEALTHBOT_GENERATION_TIMEOUT_SECS",
                30,
            )?),
            tts_timeout: Duration::from_secs(parse_or(
                get("HEALTHBOT_TTS_TIMEOUT_SECS"),
                "HEALTHBOT_TTS_TIMEOUT_SECS",
                30,
            )?),
            log_json: flag(get("HEALTHBOT_LOG_JSON"), "HEALTHBOT_LOG_JSON")?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn flag(raw: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
