#![cfg_attr(not(feature = "network"), allow(dead_code))]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::speech::{AudioClip, AudioFormat, SpeechError};

pub const DEFAULT_VOICE: &str = "en-US-Wavenet-D";
const ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceParams,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams {
    language_code: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
}

impl SynthesizeRequest {
    pub fn mp3(text: &str, language_code: &str, voice: &str, speaking_rate: f32) -> Self {
        Self {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceParams {
                language_code: language_code.to_string(),
                name: voice.to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

impl SynthesizeResponse {
    pub fn into_clip(self) -> Result<AudioClip, SpeechError> {
        let encoded = self
            .audio_content
            .filter(|a| !a.is_empty())
            .ok_or(SpeechError::NoAudio(None))?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| SpeechError::Decode(e.to_string()))?;
        Ok(AudioClip {
            bytes,
            format: AudioFormat::Encoded,
        })
    }
}

#[cfg(feature = "network")]
pub use client::CloudSynthesizer;

#[cfg(feature = "network")]
mod client {
    use std::time::Duration;

    use tracing::debug;

    use super::*;
    use crate::config::SpeechConfig;
    use crate::speech::SpeechSynthesizer;

    pub struct CloudSynthesizer {
        client: reqwest::blocking::Client,
        api_key: String,
        language_code: String,
        voice: String,
        speaking_rate: f32,
    }

    impl CloudSynthesizer {
        pub fn new(api_key: String, config: &SpeechConfig) -> Result<Self, SpeechError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| SpeechError::Http(e.to_string()))?;
            Ok(Self {
                client,
                api_key,
                language_code: config.language_code.clone(),
                voice: config
                    .voice
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
                speaking_rate: config.speaking_rate,
            })
        }
    }

    impl SpeechSynthesizer for CloudSynthesizer {
        fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
            debug!(word = text, voice = %self.voice, "requesting cloud speech");
            let body =
                SynthesizeRequest::mp3(text, &self.language_code, &self.voice, self.speaking_rate);
            let response = self
                .client
                .post(ENDPOINT)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .map_err(|e| SpeechError::Http(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(SpeechError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            response
                .json::<SynthesizeResponse>()
                .map_err(|e| SpeechError::BadResponse(e.to_string()))?
                .into_clip()
        }
    }
}
