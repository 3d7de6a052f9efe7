use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::speech::SpeechProvider;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_word_sets")]
    pub word_sets: Vec<WordSetConfig>,
    #[serde(default = "default_auto_pronounce")]
    pub auto_pronounce: bool,
    #[serde(default = "default_show_sentences")]
    pub show_sentences: bool,
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// A selectable group of spelling lists, e.g. one school grade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSetConfig {
    pub name: String,
    /// Path (relative to `data_dir`), http(s) URL, or `builtin:<file>`.
    pub lists: String,
    #[serde(default)]
    pub sentences: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_provider")]
    pub provider: String,
    /// Inline key; takes precedence over `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spellbee")
        .join("lists")
        .to_string_lossy()
        .to_string()
}
fn default_word_sets() -> Vec<WordSetConfig> {
    vec![
        WordSetConfig {
            name: "Grade 4".to_string(),
            lists: "lists.csv".to_string(),
            sentences: Some("sentences.csv".to_string()),
        },
        WordSetConfig {
            name: "Grade 5".to_string(),
            lists: "lists_grade5.csv".to_string(),
            sentences: Some("sentences_grade5.csv".to_string()),
        },
        WordSetConfig {
            name: "Sample".to_string(),
            lists: "builtin:sample_lists.csv".to_string(),
            sentences: Some("builtin:sample_sentences.csv".to_string()),
        },
    ]
}
fn default_auto_pronounce() -> bool {
    true
}
fn default_show_sentences() -> bool {
    true
}
fn default_speech_provider() -> String {
    SpeechProvider::Gemini.as_str().to_string()
}
fn default_language_code() -> String {
    "en-US".to_string()
}
fn default_speaking_rate() -> f32 {
    0.75
}
fn default_volume() -> f32 {
    1.0
}
fn default_timeout_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            data_dir: default_data_dir(),
            word_sets: default_word_sets(),
            auto_pronounce: default_auto_pronounce(),
            show_sentences: default_show_sentences(),
            speech: SpeechConfig::default(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: default_speech_provider(),
            api_key: None,
            api_key_env: None,
            voice: None,
            language_code: default_language_code(),
            speaking_rate: default_speaking_rate(),
            volume: default_volume(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Write the current settings, returning where they went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spellbee")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Repair values a hand-edited file may get wrong.
    pub fn normalize(&mut self) {
        if self.speech.provider.parse::<SpeechProvider>().is_err() {
            self.speech.provider = default_speech_provider();
        }
        if !self.speech.volume.is_finite() {
            self.speech.volume = default_volume();
        }
        self.speech.volume = self.speech.volume.clamp(0.0, 1.0);
        if !(0.25..=4.0).contains(&self.speech.speaking_rate) {
            self.speech.speaking_rate = default_speaking_rate();
        }
        self.word_sets
            .retain(|set| !set.name.trim().is_empty() && !set.lists.trim().is_empty());
        if self.word_sets.is_empty() {
            self.word_sets = default_word_sets();
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }
}

impl SpeechConfig {
    pub fn provider(&self) -> SpeechProvider {
        self.provider.parse().unwrap_or(SpeechProvider::Gemini)
    }

    /// Key from the config file, else from the environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.trim().to_string());
        }
        let var = self
            .api_key_env
            .clone()
            .unwrap_or_else(|| self.provider().default_key_env().to_string());
        std::env::var(var).ok().filter(|k| !k.trim().is_empty())
    }
}
