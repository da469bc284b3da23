/// Sentence the model is told to use for off-topic questions.
pub const REFUSAL: &str = "Sorry, I cannot answer that. I only provide healthcare-related guidance.";

/// Which endpoint a request came through. Selects the prompt variant, the
/// audio filename prefix and the response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Chat,
    VoiceCall,
}

impl EndpointKind {
    pub fn audio_prefix(self) -> &'static str {
        match self {
            EndpointKind::Chat => "bot",
            EndpointKind::VoiceCall => "ai_call",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::Chat => "chat",
            EndpointKind::VoiceCall => "voice_call",
        }
    }
}

pub fn build_prompt(kind: EndpointKind, user_message: &str) -> String {
    let mut prompt = String::from(
        "You are HealthBot, a friendly virtual healthcare assistant.\n\
         Only answer healthcare-related questions (diet, exercise, symptoms, medications, etc.).\n",
    );

    match kind {
        EndpointKind::Chat => {
            prompt.push_str(&format!("If asked something unrelated, reply: \"{REFUSAL}\"\n"));
            prompt.push_str("Keep responses concise and professional.\n");
        }
        EndpointKind::VoiceCall => {
            prompt.push_str(&format!("If asked something unrelated, say: {REFUSAL}\n"));
            prompt.push_str("Keep responses concise and professional.\n");
            prompt.push_str(
                "Your answer will be read aloud. Answer naturally like a human speaking, \
                 in short plain sentences. Only voice output: no text formatting, no lists, \
                 no markdown, no symbols.\n",
            );
        }
    }

    prompt.push_str("User said: ");
    prompt.push_str(user_message);
    prompt
}
