//! Authoritative data fetcher.
//!
//! [`ReferenceProvider`] is the seam to the external reference dictionary;
//! [`DictionaryApiProvider`] speaks the free dictionary API's wire format
//! and normalizes it into the engine's [`EntrySet`] shape, assigning
//! `entry_index`/`sense_index` by source ordering. Any non-success status,
//! timeout, or malformed payload yields a [`FetchError`], which the
//! resolver treats as a fallback trigger, not a fatal error.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::FetchError;
use crate::model::{EntrySet, Sense, WordEntry};

/// External reference provider, queried by word. Returns entries, senses,
/// and pronunciation in provider-defined ordering.
#[async_trait]
pub trait ReferenceProvider: Send + Sync {
    async fn fetch(&self, word: &str) -> Result<EntrySet, FetchError>;
}

/// Raw wire shapes for the dictionary API. Kept private to this module;
/// everything downstream sees only the normalized [`EntrySet`].
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<RawPhonetic>,
    #[serde(default)]
    meanings: Vec<RawMeaning>,
}

#[derive(Debug, Deserialize)]
struct RawPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMeaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<RawDefinition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

/// HTTP client for a dictionaryapi.dev-compatible endpoint, bounded by a
/// sub-second-class timeout.
#[derive(Clone, Debug)]
pub struct DictionaryApiProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DictionaryApiProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ReferenceProvider for DictionaryApiProvider {
    async fn fetch(&self, word: &str) -> Result<EntrySet, FetchError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), word);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        elapsed_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    FetchError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let raw: Vec<RawEntry> = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        normalize(word, raw)
    }
}

/// Normalize provider output into the engine's addressing skeleton.
///
/// Entries keep provider order; senses flatten each meaning's definitions
/// in order, so `(entry_index, sense_index)` is stable for the lifetime of
/// the provider payload.
fn normalize(word: &str, raw: Vec<RawEntry>) -> Result<EntrySet, FetchError> {
    if raw.is_empty() {
        return Err(FetchError::Malformed("empty entry list".to_string()));
    }

    let entries = raw
        .into_iter()
        .enumerate()
        .map(|(entry_index, entry)| {
            let (pronunciation, audio_url) = pick_phonetics(&entry);
            let mut senses = Vec::new();
            for meaning in &entry.meanings {
                for def in &meaning.definitions {
                    if def.definition.is_empty() {
                        continue;
                    }
                    let synonyms = if def.synonyms.is_empty() {
                        meaning.synonyms.clone()
                    } else {
                        def.synonyms.clone()
                    };
                    let antonyms = if def.antonyms.is_empty() {
                        meaning.antonyms.clone()
                    } else {
                        def.antonyms.clone()
                    };
                    senses.push(Sense {
                        sense_index: senses.len(),
                        definition: def.definition.clone(),
                        part_of_speech: meaning.part_of_speech.clone(),
                        examples: def.example.iter().cloned().collect(),
                        synonyms,
                        antonyms,
                    });
                }
            }
            WordEntry {
                entry_index,
                pronunciation,
                audio_url,
                senses,
            }
        })
        .collect::<Vec<_>>();

    if entries.iter().all(|e| e.senses.is_empty()) {
        return Err(FetchError::Malformed(
            "no definitions in provider payload".to_string(),
        ));
    }

    Ok(EntrySet::new(word, entries))
}

/// Prefer a phonetic variant carrying both IPA text and audio; fall back
/// to the first text, the first audio, then the bare `phonetic` field.
fn pick_phonetics(entry: &RawEntry) -> (String, String) {
    let mut pronunciation = String::new();
    let mut audio_url = String::new();
    for p in &entry.phonetics {
        let text = p.text.as_deref().unwrap_or("");
        let audio = p.audio.as_deref().unwrap_or("");
        if !text.is_empty() && !audio.is_empty() {
            pronunciation = text.to_string();
            audio_url = audio.to_string();
            break;
        }
        if !text.is_empty() && pronunciation.is_empty() {
            pronunciation = text.to_string();
        }
        if !audio.is_empty() && audio_url.is_empty() {
            audio_url = audio.to_string();
        }
    }
    if pronunciation.is_empty() {
        pronunciation = entry.phonetic.clone().unwrap_or_default();
    }
    (pronunciation, audio_url)
}
