use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use super::prompt::EndpointKind;
use super::speech::{SpeechError, SpeechSynthesizer};

/// URL prefix under which the media directory is served.
pub const MEDIA_URL_PREFIX: &str = "/media";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech service: {0}")]
    Speech(#[from] SpeechError),
    #[error("speech service timed out after {0:?}")]
    Timeout(Duration),
    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub filename: String,
    pub relative_url: String,
}

impl AudioArtifact {
    fn new(filename: String) -> Self {
        let relative_url = format!("{MEDIA_URL_PREFIX}/{filename}");
        Self { filename, relative_url }
    }
}

/// `<prefix>_<32 hex chars>.mp3`
pub fn artifact_filename(prefix: &str) -> String {
    format!("{}_{}.mp3", prefix, Uuid::new_v4().simple())
}

/// Turns sanitized text into an mp3 file in the media directory.
#[derive(Clone)]
pub struct AudioSynthesizer {
    engine: Arc<dyn SpeechSynthesizer>,
    media_dir: PathBuf,
    timeout: Duration,
}

impl AudioSynthesizer {
    pub fn new(engine: Arc<dyn SpeechSynthesizer>, media_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            engine,
            media_dir: media_dir.into(),
            timeout,
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    pub async fn synthesize(
        &self,
        kind: EndpointKind,
        text: &str,
        language: &str,
    ) -> Result<AudioArtifact, SynthesisError> {
        let audio = tokio::time::timeout(self.timeout, self.engine.synthesize(text, language))
            .await
            .map_err(|_| SynthesisError::Timeout(self.timeout))??;

        tokio::fs::create_dir_all(&self.media_dir)
            .await
            .map_err(|source| SynthesisError::Io {
                path: self.media_dir.clone(),
                source,
            })?;

        let filename = artifact_filename(kind.audio_prefix());
        let path = self.media_dir.join(&filename);
        tokio::fs::write(&path, &audio)
            .await
            .map_err(|source| SynthesisError::Io { path, source })?;

        tracing::info!(file = %filename, bytes = audio.len(), "audio written");
        Ok(AudioArtifact::new(filename))
    }
}
