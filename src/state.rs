// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::audio::AudioSynthesizer;
use crate::services::generation::{GeminiClient, GenerationClient, TextGenerator};
use crate::services::pipeline::Pipeline;
use crate::services::speech::{GoogleTts, SpeechSynthesizer};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pipeline: Pipeline,
}

impl AppState {
    /// Production wiring: Gemini for text, Google TTS for audio.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("healthbot-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let generator = GeminiClient::new(http.clone(), &config.model, &config.api_key);
        let speech = GoogleTts::new(http);
        Ok(Self::with_services(config, Arc::new(generator), Arc::new(speech)))
    }

    pub fn with_services(
        config: &AppConfig,
        generator: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let generator = GenerationClient::new(generator, config.generation_timeout);
        let audio = AudioSynthesizer::new(speech, &config.media_dir, config.tts_timeout);
        Self {
            pipeline: Pipeline::new(
                generator,
                audio,
                &config.tts_language,
                config.voice_call_mode,
            ),
        }
    }
}
