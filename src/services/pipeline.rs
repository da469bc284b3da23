// src/services/pipeline.rs
use crate::config::VoiceCallMode;
use crate::message::ChatResponse;

use super::audio::{AudioSynthesizer, SynthesisError};
use super::generation::GenerationClient;
use super::prompt::{EndpointKind, build_prompt};
use super::response::{GeneratedReply, assemble, short_circuit};
use super::sanitizer::clean;

/// One request, start to finish: validate, generate, sanitize, synthesize,
/// assemble. Holds no per-request state, so it is shared by all handlers.
#[derive(Clone)]
pub struct Pipeline {
    generator: GenerationClient,
    audio: AudioSynthesizer,
    language: String,
    voice_call_mode: VoiceCallMode,
}

impl Pipeline {
    pub fn new(
        generator: GenerationClient,
        audio: AudioSynthesizer,
        language: impl Into<String>,
        voice_call_mode: VoiceCallMode,
    ) -> Self {
        Self {
            generator,
            audio,
            language: language.into(),
            voice_call_mode,
        }
    }

    pub fn audio(&self) -> &AudioSynthesizer {
        &self.audio
    }

    #[tracing::instrument(skip_all, fields(kind = kind.as_str(), len = message.len()))]
    pub async fn run(&self, kind: EndpointKind, message: &str) -> Result<ChatResponse, SynthesisError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            tracing::debug!("blank message, short-circuiting");
            return Ok(short_circuit(kind));
        }

        let prompt = build_prompt(kind, trimmed);
        let raw_text = self.generator.generate(&prompt).await;
        let reply = GeneratedReply {
            cleaned_text: clean(&raw_text),
            raw_text,
        };

        let artifact = self
            .audio
            .synthesize(kind, &reply.cleaned_text, &self.language)
            .await?;

        Ok(assemble(kind, self.voice_call_mode, reply, artifact))
    }
}
