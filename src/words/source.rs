use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::WordSetConfig;
use crate::words::csv_table::{SpellingLists, parse_table};
use crate::words::sentences::SentenceMap;

#[derive(Embed)]
#[folder = "assets/lists/"]
struct ListAssets;

const BUILTIN_PREFIX: &str = "builtin:";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("cannot fetch {0}: built without network support")]
    NetworkDisabled(String),
    #[error("no built-in word file named {0}")]
    MissingBuiltin(String),
    #[error("Whoops. I don't have the words for {0} yet.")]
    NotCsv(String),
    #[error("no spelling lists found in {0}")]
    NoLists(String),
}

/// Where a CSV file comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Path(PathBuf),
    Url(String),
    Builtin(String),
}

impl Location {
    /// Relative paths resolve against `data_dir`.
    pub fn parse(raw: &str, data_dir: &Path) -> Self {
        let raw = raw.trim();
        if let Some(name) = raw.strip_prefix(BUILTIN_PREFIX) {
            return Location::Builtin(name.to_string());
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Location::Url(raw.to_string());
        }
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            Location::Path(path)
        } else {
            Location::Path(data_dir.join(path))
        }
    }

    pub fn fetch_text(&self) -> Result<String, LoadError> {
        match self {
            Location::Path(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            Location::Url(url) => fetch_url(url),
            Location::Builtin(name) => ListAssets::get(name)
                .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
                .ok_or_else(|| LoadError::MissingBuiltin(name.clone())),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Path(path) => write!(f, "{}", path.display()),
            Location::Url(url) => f.write_str(url),
            Location::Builtin(name) => write!(f, "{BUILTIN_PREFIX}{name}"),
        }
    }
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Result<String, LoadError> {
    let http_err = |e: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(http_err)?;
    let response = client.get(url).send().map_err(http_err)?;
    if !response.status().is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    response.text().map_err(http_err)
}

#[cfg(not(feature = "network"))]
fn fetch_url(url: &str) -> Result<String, LoadError> {
    Err(LoadError::NetworkDisabled(url.to_string()))
}

/// A static file server answering with its index page instead of the CSV.
fn looks_like_html(text: &str) -> bool {
    let head: String = text.trim_start().chars().take(9).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

#[derive(Clone, Debug, Default)]
pub struct LoadedWordSet {
    pub name: String,
    pub lists: SpellingLists,
    pub sentences: SentenceMap,
}

pub fn load_word_set(set: &WordSetConfig, data_dir: &Path) -> Result<LoadedWordSet, LoadError> {
    let lists_location = Location::parse(&set.lists, data_dir);
    let text = lists_location.fetch_text()?;
    if looks_like_html(&text) {
        return Err(LoadError::NotCsv(set.name.clone()));
    }
    let lists = parse_table(&text);
    if !lists.has_words() {
        return Err(LoadError::NoLists(lists_location.to_string()));
    }

    let sentences = match &set.sentences {
        Some(raw) => load_sentences(&Location::parse(raw, data_dir)),
        None => SentenceMap::default(),
    };

    info!(
        word_set = %set.name,
        lists = lists.len(),
        sentences = sentences.len(),
        "loaded word set"
    );
    Ok(LoadedWordSet {
        name: set.name.clone(),
        lists,
        sentences,
    })
}

/// Sentences are optional: any failure leaves the map empty.
fn load_sentences(location: &Location) -> SentenceMap {
    match location.fetch_text() {
        Ok(text) if !looks_like_html(&text) => SentenceMap::parse(&text),
        Ok(_) => {
            warn!(%location, "sentence file is not CSV, continuing without sentences");
            SentenceMap::default()
        }
        Err(err) => {
            warn!(%location, error = %err, "no example sentences");
            SentenceMap::default()
        }
    }
}
