use crate::config::VoiceCallMode;
use crate::message::ChatResponse;

use super::audio::AudioArtifact;
use super::prompt::EndpointKind;

pub const EMPTY_CHAT_NOTICE: &str = "Please type a message.";
pub const NO_INPUT_ERROR: &str = "No input detected";

/// Model output in the two forms the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    /// Shown to the user.
    pub raw_text: String,
    /// Fed to speech synthesis.
    pub cleaned_text: String,
}

/// Body for a blank message; no service has been called.
pub fn short_circuit(kind: EndpointKind) -> ChatResponse {
    match kind {
        EndpointKind::Chat => ChatResponse::notice(EMPTY_CHAT_NOTICE),
        EndpointKind::VoiceCall => ChatResponse::error(NO_INPUT_ERROR),
    }
}

pub fn assemble(
    kind: EndpointKind,
    mode: VoiceCallMode,
    reply: GeneratedReply,
    artifact: AudioArtifact,
) -> ChatResponse {
    match (kind, mode) {
        (EndpointKind::VoiceCall, VoiceCallMode::AudioOnly) => ChatResponse::audio_only(artifact.relative_url),
        _ => ChatResponse::reply_with_audio(reply.raw_text, artifact.relative_url),
    }
}
