#![cfg_attr(not(feature = "network"), allow(dead_code))]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::speech::{AudioClip, AudioFormat, SpeechError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";
pub const SENTENCE_MODEL: &str = "gemini-2.0-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    speech_config: VoiceSelection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoice,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoice {
    voice_name: String,
}

impl GenerateRequest {
    /// The prompt is the bare word: anything longer tempts the model into
    /// answering in text instead of speaking.
    pub fn speak(word: &str, voice: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: word.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["AUDIO"],
                speech_config: VoiceSelection {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoice {
                            voice_name: voice.to_string(),
                        },
                    },
                },
            }),
        }
    }

    /// Plain text generation: one prompt, default modalities.
    pub fn text(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: None,
        }
    }

    /// Ask for an example sentence with `word` masked as `_`.
    pub fn example_sentence(word: &str) -> Self {
        Self::text(format!(
            "Write a simple sentence using the word '{word}'. The sentence should clarify \
             the meaning of the word. Replace the word '{word}' (and any variations like \
             plurals if used) with a single underscore '_'. Output ONLY the sentence."
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateResponse {
    /// The first part of the first candidate holds base64 PCM, 16-bit mono.
    pub fn into_clip(self) -> Result<AudioClip, SpeechError> {
        let part = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .unwrap_or_default();
        let Some(inline) = part.inline_data else {
            return Err(SpeechError::NoAudio(part.text));
        };
        let bytes = STANDARD
            .decode(inline.data.trim())
            .map_err(|e| SpeechError::Decode(e.to_string()))?;
        let sample_rate = inline
            .mime_type
            .as_deref()
            .and_then(sample_rate_from_mime)
            .unwrap_or(DEFAULT_SAMPLE_RATE);
        Ok(AudioClip {
            bytes,
            format: AudioFormat::Pcm16 {
                sample_rate,
                channels: 1,
            },
        })
    }
}

impl GenerateResponse {
    /// Trimmed text of the first part of the first candidate.
    pub fn into_text(self) -> Result<String, SpeechError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SpeechError::BadResponse("no text in response".to_string()))
    }
}

/// `audio/L16;codec=pcm;rate=24000` -> 24000
fn sample_rate_from_mime(mime: &str) -> Option<u32> {
    mime.split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
}

#[cfg(feature = "network")]
pub use client::{GeminiSynthesizer, SentenceWriter};

#[cfg(feature = "network")]
mod client {
    use std::time::Duration;

    use tracing::debug;

    use super::*;
    use crate::config::SpeechConfig;
    use crate::speech::SpeechSynthesizer;

    pub struct GeminiSynthesizer {
        client: reqwest::blocking::Client,
        api_key: String,
        voice: String,
    }

    impl GeminiSynthesizer {
        pub fn new(api_key: String, config: &SpeechConfig) -> Result<Self, SpeechError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .map_err(|e| SpeechError::Http(e.to_string()))?;
            Ok(Self {
                client,
                api_key,
                voice: config
                    .voice
                    .clone()
                    .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            })
        }
    }

    impl SpeechSynthesizer for GeminiSynthesizer {
        fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
            debug!(word = text, voice = %self.voice, "requesting gemini speech");
            let request = GenerateRequest::speak(text, &self.voice);
            generate(&self.client, &self.api_key, DEFAULT_MODEL, &request)?.into_clip()
        }
    }

    /// Writes masked example sentences for the sentences CSV.
    pub struct SentenceWriter {
        client: reqwest::blocking::Client,
        api_key: String,
    }

    impl SentenceWriter {
        pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, SpeechError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .map_err(|e| SpeechError::Http(e.to_string()))?;
            Ok(Self { client, api_key })
        }

        pub fn sentence(&self, word: &str) -> Result<String, SpeechError> {
            debug!(word, model = SENTENCE_MODEL, "requesting example sentence");
            let request = GenerateRequest::example_sentence(word);
            generate(&self.client, &self.api_key, SENTENCE_MODEL, &request)?.into_text()
        }
    }

    fn generate(
        client: &reqwest::blocking::Client,
        api_key: &str,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, SpeechError> {
        let url = format!("{ENDPOINT}/{model}:generateContent");
        let response = client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(request)
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
            .json::<GenerateResponse>()
            .map_err(|e| SpeechError::BadResponse(e.to_string()))
    }
}
