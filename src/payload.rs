//! Typed section payloads and generative fragments.
//!
//! Each [`TaskKind`] produces one [`Fragment`]; the merger assembles
//! fragments into the requested section's [`SectionPayload`] variant.
//! Fragment structs mirror the schemas the backend is instructed to emit,
//! so `Fragment::parse` is an ordinary `serde_json` deserialization and a
//! mismatch is a per-task schema failure, never a silently defaulted value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaskError;
use crate::model::{EntrySet, FrequencyBand, Tone, WordEntry};
use crate::request::DataSource;
use crate::section::TaskKind;

/// Etymology and historical development.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EtymologyInfo {
    /// Narrative of the word's origin, history, and meaning evolution.
    pub etymology: String,
    /// Breakdown of roots, prefixes, and suffixes with their meanings.
    #[serde(default)]
    pub root_analysis: String,
}

/// Words derived from the same root or sharing the same base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordFamilyInfo {
    #[serde(default)]
    pub word_family: Vec<String>,
}

/// Modern usage context and trends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageContextInfo {
    #[serde(default)]
    pub modern_relevance: String,
    /// Words/phrases often confused with this one, with brief discriminators.
    #[serde(default)]
    pub common_confusions: Vec<String>,
    /// Differences in meaning, spelling, or usage between English variants.
    #[serde(default)]
    pub regional_variations: Vec<String>,
}

/// Overarching cultural and linguistic notes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CulturalNotesInfo {
    #[serde(default)]
    pub notes: String,
}

/// Frequency band estimation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyInfo {
    pub frequency: FrequencyBand,
}

/// `detailed_sense` decomposition: core metadata without the definition
/// (the discovery skeleton already provides the definition).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenseCoreMetadata {
    pub part_of_speech: String,
    /// Appropriate contexts: formal, informal, colloquial, slang, archaic,
    /// literary, professional, academic, neutral.
    pub usage_register: Vec<String>,
    /// Specific fields of use, e.g. biology, law, gaming. May be empty.
    #[serde(default)]
    pub domain: Vec<String>,
    pub tone: Tone,
}

/// `detailed_sense` decomposition: examples and collocations. Counts are
/// dynamic, smaller when authoritative seed data already covers them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenseUsageExamples {
    #[serde(default)]
    pub examples: Vec<String>,
    /// Frequent word partners, e.g. "strong evidence", "gather evidence".
    #[serde(default)]
    pub collocations: Vec<String>,
}

/// `detailed_sense` decomposition: synonyms, antonyms, and fixed phrases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenseRelatedWords {
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    /// Fixed expressions, phrasal verbs, or idioms built around this sense.
    #[serde(default)]
    pub word_specific_phrases: Vec<String>,
}

/// `detailed_sense` decomposition: learner guidance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenseUsageNotes {
    #[serde(default)]
    pub usage_notes: String,
}

/// Full single-task profile of one sense, used by the comprehensive word
/// report where each discovered sense gets one analysis task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SenseAnalysis {
    pub part_of_speech: String,
    pub usage_register: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
    pub tone: Tone,
    #[serde(default)]
    pub usage_notes: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub collocations: Vec<String>,
    #[serde(default)]
    pub word_specific_phrases: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// Entry/sense skeleton synthesized by the discovery task when the
/// authoritative path produced nothing. Generated entries carry no audio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredEntries {
    #[serde(default)]
    pub pronunciation: String,
    pub entries: Vec<DiscoveredEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredEntry {
    #[serde(default)]
    pub pronunciation: String,
    pub senses: Vec<DiscoveredSense>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredSense {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

impl DiscoveredEntries {
    /// Materialize the synthesized skeleton with source-order indices.
    #[must_use]
    pub fn into_entry_set(self, headword: &str) -> EntrySet {
        let fallback = self.pronunciation;
        let entries = self
            .entries
            .into_iter()
            .enumerate()
            .map(|(entry_index, entry)| WordEntry {
                entry_index,
                pronunciation: if entry.pronunciation.is_empty() {
                    fallback.clone()
                } else {
                    entry.pronunciation
                },
                audio_url: String::new(),
                senses: entry
                    .senses
                    .into_iter()
                    .enumerate()
                    .map(|(sense_index, sense)| crate::model::Sense {
                        sense_index,
                        definition: sense.definition,
                        part_of_speech: sense.part_of_speech,
                        ..Default::default()
                    })
                    .collect(),
            })
            .collect();
        EntrySet::new(headword, entries)
    }
}

/// One typed fragment produced by a completed task.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    Discovery(DiscoveredEntries),
    Etymology(EtymologyInfo),
    WordFamily(WordFamilyInfo),
    UsageContext(UsageContextInfo),
    CulturalNotes(CulturalNotesInfo),
    Frequency(FrequencyInfo),
    CoreMetadata(SenseCoreMetadata),
    UsageExamples(SenseUsageExamples),
    RelatedWords(SenseRelatedWords),
    UsageNotes(SenseUsageNotes),
    SenseAnalysis(SenseAnalysis),
    /// Opaque ranked candidates from the auxiliary search provider; the
    /// engine never inspects the items.
    MediaClips(Vec<Value>),
}

impl Fragment {
    /// Parse a backend JSON value into the typed fragment for `kind`.
    ///
    /// A mismatch is a [`TaskError::Schema`] for that task alone.
    pub fn parse(kind: TaskKind, value: Value) -> Result<Self, TaskError> {
        let schema_err = |e: serde_json::Error| TaskError::Schema {
            kind,
            message: e.to_string(),
        };
        Ok(match kind {
            TaskKind::SenseDiscovery => {
                Fragment::Discovery(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::Etymology => {
                Fragment::Etymology(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::WordFamily => {
                Fragment::WordFamily(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::UsageContext => {
                Fragment::UsageContext(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::CulturalNotes => {
                Fragment::CulturalNotes(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::Frequency => {
                Fragment::Frequency(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::CoreMetadata => {
                Fragment::CoreMetadata(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::UsageExamples => {
                Fragment::UsageExamples(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::RelatedWords => {
                Fragment::RelatedWords(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::UsageNotes => {
                Fragment::UsageNotes(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::SenseAnalysis => {
                Fragment::SenseAnalysis(serde_json::from_value(value).map_err(schema_err)?)
            }
            TaskKind::MediaClips => {
                Fragment::MediaClips(serde_json::from_value(value).map_err(schema_err)?)
            }
        })
    }

    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            Fragment::Discovery(_) => TaskKind::SenseDiscovery,
            Fragment::Etymology(_) => TaskKind::Etymology,
            Fragment::WordFamily(_) => TaskKind::WordFamily,
            Fragment::UsageContext(_) => TaskKind::UsageContext,
            Fragment::CulturalNotes(_) => TaskKind::CulturalNotes,
            Fragment::Frequency(_) => TaskKind::Frequency,
            Fragment::CoreMetadata(_) => TaskKind::CoreMetadata,
            Fragment::UsageExamples(_) => TaskKind::UsageExamples,
            Fragment::RelatedWords(_) => TaskKind::RelatedWords,
            Fragment::UsageNotes(_) => TaskKind::UsageNotes,
            Fragment::SenseAnalysis(_) => TaskKind::SenseAnalysis,
            Fragment::MediaClips(_) => TaskKind::MediaClips,
        }
    }
}

/// Basic-section payload: the addressing skeleton plus word-level facts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub headword: String,
    pub pronunciation: String,
    #[serde(default)]
    pub audio_url: String,
    pub total_entries: usize,
    pub total_senses: usize,
    pub entries: Vec<WordEntry>,
}

impl BasicInfo {
    #[must_use]
    pub fn from_entry_set(set: &EntrySet) -> Self {
        Self {
            headword: set.headword.clone(),
            pronunciation: set.pronunciation().to_string(),
            audio_url: set.audio_url().to_string(),
            total_entries: set.entry_count(),
            total_senses: set.total_senses(),
            entries: set.entries.clone(),
        }
    }

    /// Rebuild the addressing skeleton from a cached basic payload.
    #[must_use]
    pub fn to_entry_set(&self) -> EntrySet {
        EntrySet::new(self.headword.clone(), self.entries.clone())
    }
}

/// Merged `detailed_sense` payload for one address.
///
/// Sub-fragments a failed task would have produced stay `None` (absent,
/// not defaulted) and their fields appear in the response's
/// `missing_fields`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailedSenseInfo {
    pub entry_index: usize,
    pub sense_index: usize,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<SenseCoreMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<SenseUsageExamples>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<SenseRelatedWords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_notes: Option<SenseUsageNotes>,
}

impl DetailedSenseInfo {
    /// Fold a full single-task analysis into the merged shape.
    #[must_use]
    pub fn from_analysis(
        entry_index: usize,
        sense_index: usize,
        definition: String,
        analysis: SenseAnalysis,
    ) -> Self {
        Self {
            entry_index,
            sense_index,
            definition,
            core: Some(SenseCoreMetadata {
                part_of_speech: analysis.part_of_speech,
                usage_register: analysis.usage_register,
                domain: analysis.domain,
                tone: analysis.tone,
            }),
            examples: Some(SenseUsageExamples {
                examples: analysis.examples,
                collocations: analysis.collocations,
            }),
            related: Some(SenseRelatedWords {
                synonyms: analysis.synonyms,
                antonyms: analysis.antonyms,
                word_specific_phrases: analysis.word_specific_phrases,
            }),
            usage_notes: Some(SenseUsageNotes {
                usage_notes: analysis.usage_notes,
            }),
        }
    }
}

/// The typed payload of one section response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum SectionPayload {
    Basic(BasicInfo),
    Etymology(EtymologyInfo),
    WordFamily(WordFamilyInfo),
    UsageContext(UsageContextInfo),
    CulturalNotes(CulturalNotesInfo),
    Frequency(FrequencyInfo),
    DetailedSense(DetailedSenseInfo),
    MediaClips { clips: Vec<Value> },
}

/// Comprehensive single-shot report: discovery plus every word-level
/// section plus one analysis per discovered sense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordReport {
    pub headword: String,
    pub pronunciation: String,
    #[serde(default)]
    pub audio_url: String,
    pub data_source: DataSource,
    pub total_senses: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FrequencyBand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etymology: Option<EtymologyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_family: Option<WordFamilyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_context: Option<UsageContextInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_notes: Option<CulturalNotesInfo>,
    pub detailed_senses: Vec<DetailedSenseInfo>,
    pub execution_time: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_routes_value_to_typed_fragment() {
        let fragment = Fragment::parse(
            TaskKind::Etymology,
            json!({"etymology": "from Old English rinnan", "root_analysis": ""}),
        )
        .unwrap();
        assert_eq!(fragment.kind(), TaskKind::Etymology);
    }

    #[test]
    fn parse_mismatch_is_schema_error_for_that_kind() {
        let err = Fragment::parse(TaskKind::Frequency, json!({"frequency": "sometimes"}))
            .unwrap_err();
        assert_eq!(err.kind(), TaskKind::Frequency);
        assert!(matches!(err, crate::error::TaskError::Schema { .. }));
    }

    #[test]
    fn discovered_entries_materialize_with_source_order_indices() {
        let discovered = DiscoveredEntries {
            pronunciation: "/tɛst/".into(),
            entries: vec![DiscoveredEntry {
                pronunciation: String::new(),
                senses: vec![
                    DiscoveredSense {
                        definition: "first".into(),
                        part_of_speech: Some("noun".into()),
                    },
                    DiscoveredSense {
                        definition: "second".into(),
                        part_of_speech: None,
                    },
                ],
            }],
        };
        let set = discovered.into_entry_set("test");
        assert_eq!(set.entries[0].pronunciation, "/tɛst/");
        assert_eq!(set.entries[0].audio_url, "");
        assert_eq!(set.entries[0].senses[1].sense_index, 1);
        assert_eq!(set.total_senses(), 2);
    }

    #[test]
    fn detailed_sense_serializes_without_absent_fragments() {
        let info = DetailedSenseInfo {
            entry_index: 0,
            sense_index: 0,
            definition: "move fast".into(),
            core: None,
            examples: None,
            related: None,
            usage_notes: None,
        };
        let v = serde_json::to_value(&info).unwrap();
        assert!(v.get("core").is_none());
        assert!(v.get("examples").is_none());
    }
}
