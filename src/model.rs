//! Lexical data model: entries, senses, and controlled vocabularies.
//!
//! An [`EntrySet`] is the skeleton the `basic` section establishes for a
//! word: one [`WordEntry`] per headword reading, each owning an ordered
//! sequence of [`Sense`]s. Indices are assigned by source ordering (the
//! authoritative provider's, or the discovery task's) and stay stable for
//! the lifetime of the cached response, which is what makes
//! `(entry_index, sense_index)` addressing reliable across requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::section::SenseAddress;

/// The primary connotation of one sense.
///
/// Controlled vocabulary; unknown values are deserialization errors, not
/// silently coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Humorous,
    Derogatory,
    Pejorative,
    Approving,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Positive => "positive",
            Tone::Negative => "negative",
            Tone::Neutral => "neutral",
            Tone::Humorous => "humorous",
            Tone::Derogatory => "derogatory",
            Tone::Pejorative => "pejorative",
            Tone::Approving => "approving",
        };
        f.write_str(s)
    }
}

/// How common a word is in modern usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    VeryCommon,
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrequencyBand::VeryCommon => "very_common",
            FrequencyBand::Common => "common",
            FrequencyBand::Uncommon => "uncommon",
            FrequencyBand::Rare => "rare",
            FrequencyBand::VeryRare => "very_rare",
        };
        f.write_str(s)
    }
}

/// One meaning within an entry.
///
/// Only `definition` is guaranteed at discovery time; the remaining fields
/// are populated incrementally as different sections are requested and
/// merged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    /// Position within the owning entry, assigned by source ordering.
    pub sense_index: usize,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
}

impl Sense {
    pub fn new(sense_index: usize, definition: impl Into<String>) -> Self {
        Self {
            sense_index,
            definition: definition.into(),
            ..Default::default()
        }
    }
}

/// One headword reading: pronunciation plus an ordered sequence of senses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Position within the word's result set, assigned by source ordering.
    pub entry_index: usize,
    #[serde(default)]
    pub pronunciation: String,
    /// Playable audio for the pronunciation; empty when only the discovery
    /// task produced this entry (generated entries carry no audio).
    #[serde(default)]
    pub audio_url: String,
    pub senses: Vec<Sense>,
}

impl WordEntry {
    pub fn sense(&self, sense_index: usize) -> Option<&Sense> {
        self.senses.get(sense_index)
    }
}

/// The full entry/sense skeleton for one word.
///
/// Created by the authoritative fetcher (ordering from source) or
/// synthesized by the discovery task when no authoritative data exists.
/// Address bounds for every other section are read from here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntrySet {
    pub headword: String,
    pub entries: Vec<WordEntry>,
}

impl EntrySet {
    pub fn new(headword: impl Into<String>, entries: Vec<WordEntry>) -> Self {
        Self {
            headword: headword.into(),
            entries,
        }
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Sense count for one entry, or `None` if the entry index itself is
    /// out of range.
    pub fn sense_count(&self, entry_index: usize) -> Option<usize> {
        self.entries.get(entry_index).map(|e| e.senses.len())
    }

    /// Total senses across all entries.
    #[must_use]
    pub fn total_senses(&self) -> usize {
        self.entries.iter().map(|e| e.senses.len()).sum()
    }

    /// Look up the sense behind an address, if within bounds.
    pub fn sense_at(&self, address: SenseAddress) -> Option<&Sense> {
        self.entries
            .get(address.entry_index)
            .and_then(|e| e.sense(address.sense_index))
    }

    /// Every valid address, in entry-major order.
    pub fn addresses(&self) -> impl Iterator<Item = SenseAddress> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .senses
                .iter()
                .map(move |sense| SenseAddress::new(entry.entry_index, sense.sense_index))
        })
    }

    /// Pronunciation of the first entry that has one.
    #[must_use]
    pub fn pronunciation(&self) -> &str {
        self.entries
            .iter()
            .map(|e| e.pronunciation.as_str())
            .find(|p| !p.is_empty())
            .unwrap_or("")
    }

    /// Audio URL of the first entry that has one.
    #[must_use]
    pub fn audio_url(&self) -> &str {
        self.entries
            .iter()
            .map(|e| e.audio_url.as_str())
            .find(|a| !a.is_empty())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> EntrySet {
        EntrySet::new(
            "run",
            vec![
                WordEntry {
                    entry_index: 0,
                    pronunciation: "/rʌn/".into(),
                    audio_url: "https://audio.example/run.mp3".into(),
                    senses: vec![
                        Sense::new(0, "move at a speed faster than a walk"),
                        Sense::new(1, "manage or operate"),
                    ],
                },
                WordEntry {
                    entry_index: 1,
                    pronunciation: String::new(),
                    audio_url: String::new(),
                    senses: vec![Sense::new(0, "a continuous period of something")],
                },
            ],
        )
    }

    #[test]
    fn bounds_helpers_follow_source_ordering() {
        let set = sample_set();
        assert_eq!(set.entry_count(), 2);
        assert_eq!(set.sense_count(0), Some(2));
        assert_eq!(set.sense_count(1), Some(1));
        assert_eq!(set.sense_count(2), None);
        assert_eq!(set.total_senses(), 3);
    }

    #[test]
    fn sense_at_rejects_out_of_range_addresses() {
        let set = sample_set();
        assert!(set.sense_at(SenseAddress::new(0, 1)).is_some());
        assert!(set.sense_at(SenseAddress::new(0, 2)).is_none());
        assert!(set.sense_at(SenseAddress::new(2, 0)).is_none());
    }

    #[test]
    fn addresses_enumerate_entry_major() {
        let set = sample_set();
        let addrs: Vec<String> = set.addresses().map(|a| a.to_string()).collect();
        assert_eq!(addrs, vec!["0.0", "0.1", "1.0"]);
    }

    #[test]
    fn pronunciation_prefers_first_non_empty() {
        let set = sample_set();
        assert_eq!(set.pronunciation(), "/rʌn/");
        assert_eq!(set.audio_url(), "https://audio.example/run.mp3");
    }

    #[test]
    fn tone_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Tone::Derogatory).unwrap(),
            "\"derogatory\""
        );
        assert!(serde_json::from_str::<Tone>("\"archaic\"").is_err());
    }
}
