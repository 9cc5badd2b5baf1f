//! Core addressing types for the lexweave lookup engine.
//!
//! This module defines the fundamental types used throughout the engine for
//! naming sections and fragments of word data. These are the core domain
//! concepts that define what a lookup *is*.
//!
//! # Key Types
//!
//! - [`Section`]: the enumerated, independently retrievable request category
//! - [`TaskKind`]: the identity of one generative fragment within a fan-out
//! - [`TaskId`]: a task kind plus the optional sense address it targets
//! - [`SenseAddress`]: the two-dimensional `(entry_index, sense_index)` pair
//!
//! Sections are an exhaustive enum rather than free-form strings so every
//! dispatch site is a compile-checked match bound to its task-catalog entry.
//!
//! # Examples
//!
//! ```rust
//! use lexweave::section::{Section, SenseAddress};
//!
//! let section = Section::DetailedSense;
//! assert_eq!(section.encode(), "detailed_sense");
//! assert_eq!(Section::decode("detailed_sense"), Some(section));
//! assert!(section.requires_address());
//!
//! let addr = SenseAddress::new(0, 2);
//! assert_eq!(addr.to_string(), "0.2");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, independently retrievable category of word data.
///
/// Each section maps to a fixed task-catalog entry (see
/// [`TaskCatalog`](crate::catalog::TaskCatalog)). Single-task sections fan
/// out one generative task; `DetailedSense` decomposes into four tasks
/// dispatched together; `MediaClips` wraps the auxiliary content-search
/// provider as one opaque-list task.
///
/// # Wire format
///
/// Sections serialize to their snake_case names (`"basic"`,
/// `"detailed_sense"`, ...) and round-trip through
/// [`encode`](Self::encode)/[`decode`](Self::decode).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Headword, pronunciation, and the entry/sense skeleton that
    /// establishes the addressing bounds for every other section.
    Basic,
    /// Origin narrative and root analysis.
    Etymology,
    /// Words derived from the same root or base.
    WordFamily,
    /// Modern relevance, common confusions, regional variations.
    UsageContext,
    /// Overarching cultural and linguistic notes.
    CulturalNotes,
    /// Frequency band estimation for modern usage.
    Frequency,
    /// Per-sense deep analysis, addressed by `(entry_index, sense_index)`.
    DetailedSense,
    /// Opaque ranked media candidates from the auxiliary search provider.
    MediaClips,
}

impl Section {
    /// All sections, in catalog order.
    pub const ALL: [Section; 8] = [
        Section::Basic,
        Section::Etymology,
        Section::WordFamily,
        Section::UsageContext,
        Section::CulturalNotes,
        Section::Frequency,
        Section::DetailedSense,
        Section::MediaClips,
    ];

    /// Encode a section into its persisted wire form.
    #[must_use]
    pub fn encode(&self) -> &'static str {
        match self {
            Section::Basic => "basic",
            Section::Etymology => "etymology",
            Section::WordFamily => "word_family",
            Section::UsageContext => "usage_context",
            Section::CulturalNotes => "cultural_notes",
            Section::Frequency => "frequency",
            Section::DetailedSense => "detailed_sense",
            Section::MediaClips => "media_clips",
        }
    }

    /// Decode a wire-form string back into a section.
    ///
    /// Returns `None` for unrecognized names; the router maps that to
    /// [`LookupError::InvalidSection`](crate::error::LookupError::InvalidSection)
    /// before any I/O happens.
    pub fn decode(s: &str) -> Option<Self> {
        Section::ALL.iter().copied().find(|sec| sec.encode() == s)
    }

    /// Whether requests for this section must carry both
    /// `entry_index` and `sense_index`.
    #[must_use]
    pub fn requires_address(&self) -> bool {
        matches!(self, Section::DetailedSense)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode())
    }
}

impl std::str::FromStr for Section {
    type Err = crate::error::LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::decode(s).ok_or_else(|| crate::error::LookupError::InvalidSection(s.to_string()))
    }
}

/// The two-dimensional address of one sense: which entry, which sense
/// within it.
///
/// Indices are established by the `basic` section's entry/sense counts and
/// are validated against those bounds before any fan-out; out-of-range
/// addresses are client errors, never clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SenseAddress {
    pub entry_index: usize,
    pub sense_index: usize,
}

impl SenseAddress {
    #[must_use]
    pub fn new(entry_index: usize, sense_index: usize) -> Self {
        Self {
            entry_index,
            sense_index,
        }
    }
}

impl fmt::Display for SenseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entry_index, self.sense_index)
    }
}

/// Identity of one fragment kind inside a fan-out.
///
/// A kind names the unit of generative work and the payload fields it is
/// responsible for; [`fields`](Self::fields) is the manifest used for
/// missing-field accounting when a task fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Synthesize the entry/sense skeleton when the authoritative path
    /// produced nothing.
    SenseDiscovery,
    Etymology,
    WordFamily,
    UsageContext,
    CulturalNotes,
    Frequency,
    /// `detailed_sense` decomposition: part of speech, register, domain, tone.
    CoreMetadata,
    /// `detailed_sense` decomposition: example sentences and collocations.
    UsageExamples,
    /// `detailed_sense` decomposition: synonyms, antonyms, fixed phrases.
    RelatedWords,
    /// `detailed_sense` decomposition: learner guidance.
    UsageNotes,
    /// Single-task full-profile analysis of one sense, used by the
    /// comprehensive word report.
    SenseAnalysis,
    MediaClips,
}

impl TaskKind {
    /// Stable label used in logs and outcome maps.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::SenseDiscovery => "sense_discovery",
            TaskKind::Etymology => "etymology",
            TaskKind::WordFamily => "word_family",
            TaskKind::UsageContext => "usage_context",
            TaskKind::CulturalNotes => "cultural_notes",
            TaskKind::Frequency => "frequency",
            TaskKind::CoreMetadata => "core_metadata",
            TaskKind::UsageExamples => "usage_examples",
            TaskKind::RelatedWords => "related_words",
            TaskKind::UsageNotes => "usage_notes",
            TaskKind::SenseAnalysis => "sense_analysis",
            TaskKind::MediaClips => "media_clips",
        }
    }

    /// The payload fields this fragment is responsible for.
    ///
    /// When a task fails, exactly these names are reported in
    /// `missing_fields`; nothing is fabricated in their place.
    #[must_use]
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            TaskKind::SenseDiscovery => &["entries", "pronunciation"],
            TaskKind::Etymology => &["etymology", "root_analysis"],
            TaskKind::WordFamily => &["word_family"],
            TaskKind::UsageContext => &[
                "modern_relevance",
                "common_confusions",
                "regional_variations",
            ],
            TaskKind::CulturalNotes => &["notes"],
            TaskKind::Frequency => &["frequency"],
            TaskKind::CoreMetadata => &["part_of_speech", "usage_register", "domain", "tone"],
            TaskKind::UsageExamples => &["examples", "collocations"],
            TaskKind::RelatedWords => &["synonyms", "antonyms", "word_specific_phrases"],
            TaskKind::UsageNotes => &["usage_notes"],
            TaskKind::SenseAnalysis => &[
                "part_of_speech",
                "usage_register",
                "domain",
                "tone",
                "usage_notes",
                "examples",
                "collocations",
                "word_specific_phrases",
                "synonyms",
                "antonyms",
            ],
            TaskKind::MediaClips => &["clips"],
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A task kind plus the sense it targets, if any.
///
/// Section fan-outs key their outcome maps by `TaskId` so the comprehensive
/// word report can run one [`TaskKind::SenseAnalysis`] per discovered sense
/// without collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId {
    pub kind: TaskKind,
    pub address: Option<SenseAddress>,
}

impl TaskId {
    #[must_use]
    pub fn word_scoped(kind: TaskKind) -> Self {
        Self {
            kind,
            address: None,
        }
    }

    #[must_use]
    pub fn sense_scoped(kind: TaskKind, address: SenseAddress) -> Self {
        Self {
            kind,
            address: Some(address),
        }
    }

    /// Field names for missing-field accounting, qualified by sense
    /// address when the task targets one sense of many.
    #[must_use]
    pub fn qualified_fields(&self) -> Vec<String> {
        match self.address {
            None => self.kind.fields().iter().map(|f| (*f).to_string()).collect(),
            Some(addr) => self
                .kind
                .fields()
                .iter()
                .map(|f| format!("senses[{addr}].{f}"))
                .collect(),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{}@{addr}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_encode_decode_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::decode(section.encode()), Some(section));
        }
        assert_eq!(Section::decode("pronounciation"), None);
    }

    #[test]
    fn only_detailed_sense_requires_address() {
        for section in Section::ALL {
            assert_eq!(
                section.requires_address(),
                section == Section::DetailedSense
            );
        }
    }

    #[test]
    fn task_id_display_includes_address() {
        let id = TaskId::sense_scoped(TaskKind::CoreMetadata, SenseAddress::new(1, 3));
        assert_eq!(id.to_string(), "core_metadata@1.3");
        assert_eq!(
            TaskId::word_scoped(TaskKind::Etymology).to_string(),
            "etymology"
        );
    }

    #[test]
    fn qualified_fields_prefix_sense_scope() {
        let id = TaskId::sense_scoped(TaskKind::UsageNotes, SenseAddress::new(0, 1));
        assert_eq!(id.qualified_fields(), vec!["senses[0.1].usage_notes"]);
    }
}
