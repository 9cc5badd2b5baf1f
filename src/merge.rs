//! Result merger: commutative assembly of section payloads.
//!
//! The merger walks the catalog's expected task list in catalog order and
//! pulls each fragment out of the outcome map, so the assembled payload
//! never depends on which parallel task finished first. A failed required
//! fragment leaves its slot absent (nothing is fabricated) and its field
//! names are appended to `missing_fields` in catalog order, which keeps
//! the accounting deterministic too.

use crate::model::EntrySet;
use crate::payload::{
    BasicInfo, DetailedSenseInfo, Fragment, SectionPayload, WordReport,
};
use crate::pool::FanOutReport;
use crate::request::DataSource;
use crate::section::{Section, SenseAddress, TaskId, TaskKind};

/// Outcome of merging one section fan-out.
#[derive(Clone, Debug)]
pub struct MergeReport {
    pub payload: Option<SectionPayload>,
    pub missing_fields: Vec<String>,
}

impl MergeReport {
    /// Whether every required fragment arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Assemble the payload for one section request.
///
/// `discovery` is the word's addressing skeleton (authoritative or
/// synthesized); `address` is present only for sense-scoped sections.
#[must_use]
pub fn merge_section(
    section: Section,
    discovery: &EntrySet,
    address: Option<SenseAddress>,
    fanout: &FanOutReport,
) -> MergeReport {
    match section {
        Section::Basic => MergeReport {
            payload: Some(SectionPayload::Basic(BasicInfo::from_entry_set(discovery))),
            missing_fields: Vec::new(),
        },
        Section::Etymology => single(fanout, TaskKind::Etymology, |frag| match frag {
            Fragment::Etymology(info) => Some(SectionPayload::Etymology(info.clone())),
            _ => None,
        }),
        Section::WordFamily => single(fanout, TaskKind::WordFamily, |frag| match frag {
            Fragment::WordFamily(info) => Some(SectionPayload::WordFamily(info.clone())),
            _ => None,
        }),
        Section::UsageContext => single(fanout, TaskKind::UsageContext, |frag| match frag {
            Fragment::UsageContext(info) => Some(SectionPayload::UsageContext(info.clone())),
            _ => None,
        }),
        Section::CulturalNotes => single(fanout, TaskKind::CulturalNotes, |frag| match frag {
            Fragment::CulturalNotes(info) => Some(SectionPayload::CulturalNotes(info.clone())),
            _ => None,
        }),
        Section::Frequency => single(fanout, TaskKind::Frequency, |frag| match frag {
            Fragment::Frequency(info) => Some(SectionPayload::Frequency(info.clone())),
            _ => None,
        }),
        Section::MediaClips => single(fanout, TaskKind::MediaClips, |frag| match frag {
            Fragment::MediaClips(clips) => Some(SectionPayload::MediaClips {
                clips: clips.clone(),
            }),
            _ => None,
        }),
        Section::DetailedSense => {
            let address = address.expect("detailed_sense merge requires an address");
            merge_detailed_sense(discovery, address, fanout)
        }
    }
}

fn single(
    fanout: &FanOutReport,
    kind: TaskKind,
    extract: impl Fn(&Fragment) -> Option<SectionPayload>,
) -> MergeReport {
    let id = TaskId::word_scoped(kind);
    match fanout.fragment(&id).and_then(&extract) {
        Some(payload) => MergeReport {
            payload: Some(payload),
            missing_fields: Vec::new(),
        },
        None => MergeReport {
            payload: None,
            missing_fields: id.qualified_fields(),
        },
    }
}

fn merge_detailed_sense(
    discovery: &EntrySet,
    address: SenseAddress,
    fanout: &FanOutReport,
) -> MergeReport {
    let definition = discovery
        .sense_at(address)
        .map(|s| s.definition.clone())
        .unwrap_or_default();

    let mut info = DetailedSenseInfo {
        entry_index: address.entry_index,
        sense_index: address.sense_index,
        definition,
        core: None,
        examples: None,
        related: None,
        usage_notes: None,
    };
    let mut missing = Vec::new();

    for kind in crate::catalog::TaskCatalog::kinds(Section::DetailedSense) {
        let id = TaskId::sense_scoped(*kind, address);
        match fanout.fragment(&id) {
            Some(Fragment::CoreMetadata(core)) => info.core = Some(core.clone()),
            Some(Fragment::UsageExamples(examples)) => info.examples = Some(examples.clone()),
            Some(Fragment::RelatedWords(related)) => info.related = Some(related.clone()),
            Some(Fragment::UsageNotes(notes)) => info.usage_notes = Some(notes.clone()),
            _ => missing.extend(kind.fields().iter().map(|f| (*f).to_string())),
        }
    }

    MergeReport {
        payload: Some(SectionPayload::DetailedSense(info)),
        missing_fields: missing,
    }
}

/// Assemble the comprehensive word report from a combined fan-out.
#[must_use]
pub fn merge_word_report(
    discovery: &EntrySet,
    fanout: &FanOutReport,
    data_source: DataSource,
    execution_time: f64,
) -> WordReport {
    let mut missing = Vec::new();

    macro_rules! word_fragment {
        ($kind:expr, $variant:path) => {{
            let id = TaskId::word_scoped($kind);
            match fanout.fragment(&id) {
                Some($variant(info)) => Some(info.clone()),
                _ => {
                    missing.extend(id.qualified_fields());
                    None
                }
            }
        }};
    }

    let etymology = word_fragment!(TaskKind::Etymology, Fragment::Etymology);
    let word_family = word_fragment!(TaskKind::WordFamily, Fragment::WordFamily);
    let usage_context = word_fragment!(TaskKind::UsageContext, Fragment::UsageContext);
    let cultural_notes = word_fragment!(TaskKind::CulturalNotes, Fragment::CulturalNotes);
    let frequency = word_fragment!(TaskKind::Frequency, Fragment::Frequency)
        .map(|info| info.frequency);

    let mut detailed_senses = Vec::new();
    for addr in discovery.addresses() {
        let definition = discovery
            .sense_at(addr)
            .map(|s| s.definition.clone())
            .unwrap_or_default();
        let id = TaskId::sense_scoped(TaskKind::SenseAnalysis, addr);
        match fanout.fragment(&id) {
            Some(Fragment::SenseAnalysis(analysis)) => {
                detailed_senses.push(DetailedSenseInfo::from_analysis(
                    addr.entry_index,
                    addr.sense_index,
                    definition,
                    analysis.clone(),
                ));
            }
            _ => {
                missing.extend(id.qualified_fields());
                detailed_senses.push(DetailedSenseInfo {
                    entry_index: addr.entry_index,
                    sense_index: addr.sense_index,
                    definition,
                    core: None,
                    examples: None,
                    related: None,
                    usage_notes: None,
                });
            }
        }
    }

    let success = missing.is_empty();
    WordReport {
        headword: discovery.headword.clone(),
        pronunciation: discovery.pronunciation().to_string(),
        audio_url: discovery.audio_url().to_string(),
        data_source,
        total_senses: discovery.total_senses(),
        frequency,
        etymology,
        word_family,
        usage_context,
        cultural_notes,
        detailed_senses,
        execution_time,
        success,
        missing_fields: missing,
        error: None,
    }
}
