#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use healthbot_backend::config::{AppConfig, VoiceCallMode};
use healthbot_backend::services::generation::{GenerationError, TextGenerator};
use healthbot_backend::services::speech::{SpeechError, SpeechSynthesizer};
use healthbot_backend::state::AppState;

/// Records prompts and answers with a canned reply, or fails when `reply` is `None`.
pub struct MockGenerator {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or(GenerationError::Status { status: 503, body: "unavailable".to_string() })
    }
}

/// Records the text it was asked to speak and returns fake mp3 bytes.
pub struct MockSpeech {
    pub fail: bool,
    pub texts: Mutex<Vec<String>>,
}

impl MockSpeech {
    pub fn working() -> Arc<Self> {
        Arc::new(Self { fail: false, texts: Mutex::new(Vec::new()) })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self { fail: true, texts: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> usize {
        self.texts.lock().unwrap().len()
    }

    pub fn last_text(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str, _language: &str) -> Result<Vec<u8>, SpeechError> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(SpeechError::Status { status: 500 });
        }
        Ok(b"ID3\x04\x00fake-mp3".to_vec())
    }
}

pub fn test_config(media_dir: &Path, mode: VoiceCallMode) -> AppConfig {
    let mut config = AppConfig::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        _ => None,
    })
    .unwrap();
    config.media_dir = media_dir.to_path_buf();
    config.voice_call_mode = mode;
    config.generation_timeout = Duration::from_secs(2);
    config.tts_timeout = Duration::from_secs(2);
    config
}

pub fn test_state(
    media_dir: &Path,
    mode: VoiceCallMode,
    generator: Arc<MockGenerator>,
    speech: Arc<MockSpeech>,
) -> Arc<AppState> {
    Arc::new(AppState::with_services(&test_config(media_dir, mode), generator, speech))
}

pub fn media_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
