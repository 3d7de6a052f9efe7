//! Spoken prompts. The quiz never waits on any of this: synthesis and
//! playback run on worker threads and report back through `Pronouncer`.

pub mod gemini;
pub mod google_cloud;
pub mod playback;
pub mod pronouncer;

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::warn;

use crate::config::SpeechConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechProvider {
    Gemini,
    GoogleCloud,
    Off,
}

impl SpeechProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeechProvider::Gemini => "gemini",
            SpeechProvider::GoogleCloud => "google-cloud",
            SpeechProvider::Off => "off",
        }
    }

    pub fn default_key_env(self) -> &'static str {
        match self {
            SpeechProvider::GoogleCloud => "GOOGLE_TTS_API_KEY",
            SpeechProvider::Gemini | SpeechProvider::Off => "GEMINI_API_KEY",
        }
    }
}

impl FromStr for SpeechProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(SpeechProvider::Gemini),
            "google-cloud" | "google" | "cloud" => Ok(SpeechProvider::GoogleCloud),
            "off" | "none" => Ok(SpeechProvider::Off),
            other => Err(format!("unknown speech provider '{other}'")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioFormat {
    /// A container the decoder sniffs (MP3 from the cloud endpoint).
    Encoded,
    /// Raw signed 16-bit little-endian samples.
    Pcm16 { sample_rate: u32, channels: u16 },
}

#[derive(Clone, Debug)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioClip {
    pub fn pcm_samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    pub fn duration_secs(&self) -> Option<f64> {
        match self.format {
            AudioFormat::Pcm16 {
                sample_rate,
                channels,
            } if sample_rate > 0 && channels > 0 => {
                let frames = self.bytes.len() / 2 / channels as usize;
                Some(frames as f64 / sample_rate as f64)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("provider answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    BadResponse(String),
    #[error("no audio data in response{}", model_note(.0))]
    NoAudio(Option<String>),
    #[error("could not decode audio: {0}")]
    Decode(String),
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("cancelled")]
    Cancelled,
}

fn model_note(text: &Option<String>) -> String {
    match text {
        Some(text) => format!(" (model said: {text})"),
        None => String::new(),
    }
}

/// Turns text into audio.
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError>;
}

/// Plays a clip to completion, or until `cancel` fires.
pub trait AudioSink: Send + Sync {
    fn play(&self, clip: &AudioClip, cancel: &CancelToken) -> Result<(), SpeechError>;
}

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Build the configured provider. `None` means speech is off, either by
/// choice or because no API key was found.
pub fn build_synthesizer(config: &SpeechConfig) -> Option<Arc<dyn SpeechSynthesizer>> {
    let provider = config.provider();
    if provider == SpeechProvider::Off {
        return None;
    }
    let Some(api_key) = config.resolve_api_key() else {
        warn!(provider = provider.as_str(), "API key not found, speech disabled");
        return None;
    };
    http_synthesizer(provider, api_key, config)
}

#[cfg(feature = "network")]
fn http_synthesizer(
    provider: SpeechProvider,
    api_key: String,
    config: &SpeechConfig,
) -> Option<Arc<dyn SpeechSynthesizer>> {
    let built: Result<Arc<dyn SpeechSynthesizer>, SpeechError> = match provider {
        SpeechProvider::Gemini => {
            gemini::GeminiSynthesizer::new(api_key, config)
                .map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>)
        }
        SpeechProvider::GoogleCloud => {
            google_cloud::CloudSynthesizer::new(api_key, config)
                .map(|s| Arc::new(s) as Arc<dyn SpeechSynthesizer>)
        }
        SpeechProvider::Off => return None,
    };
    match built {
        Ok(synth) => Some(synth),
        Err(err) => {
            warn!(error = %err, "could not set up speech client");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn http_synthesizer(
    provider: SpeechProvider,
    _api_key: String,
    _config: &SpeechConfig,
) -> Option<Arc<dyn SpeechSynthesizer>> {
    warn!(
        provider = provider.as_str(),
        "built without network support, speech disabled"
    );
    None
}
