//! Generative fallback controller: the fixed section → task catalog.
//!
//! Each section maps to a small, fixed set of task kinds with token/time
//! budgets. Single-task sections dispatch one task; the `detailed_sense`
//! family decomposes into four tasks dispatched together; the
//! comprehensive word report combines the word-level tasks with one
//! analysis task per discovered sense. Task shapes are a catalog, not
//! user-defined pipelines.
//!
//! When authoritative fragments exist they are attached as seed context
//! and the task's output budget shrinks. That is a data-dependent
//! optimization, not a correctness requirement.

pub mod render;

use serde_json::{Value, json};
use std::time::Duration;

use crate::model::EntrySet;
use crate::section::{Section, SenseAddress, TaskId, TaskKind};
use render::RenderInput;

/// Token/time budget for one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskBudget {
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl TaskBudget {
    pub const fn new(max_tokens: u32, timeout: Duration) -> Self {
        Self {
            max_tokens,
            timeout,
        }
    }

    /// Frequency, word family: short list outputs.
    pub const fn simple() -> Self {
        Self::new(256, Duration::from_secs(45))
    }

    /// Etymology, usage context, cultural notes: paragraph outputs.
    pub const fn medium() -> Self {
        Self::new(512, Duration::from_secs(45))
    }

    /// Sense analysis: the largest structured outputs, on the tightest
    /// timeout to keep tail latency bounded.
    pub const fn complex() -> Self {
        Self::new(600, Duration::from_secs(30))
    }

    /// Discovery has to enumerate every sense of the word.
    pub const fn discovery() -> Self {
        Self::new(1024, Duration::from_secs(45))
    }

    /// Shrunk budget for tasks seeded with authoritative context.
    #[must_use]
    pub fn seeded(self) -> Self {
        Self {
            max_tokens: (self.max_tokens / 4) * 3,
            timeout: self.timeout,
        }
    }
}

/// A bounded unit of generative work scoped to one fragment kind.
#[derive(Clone, Debug)]
pub struct AgentTask {
    pub id: TaskId,
    pub instruction: String,
    /// Schema name handed to the backend alongside the instruction.
    pub schema: &'static str,
    pub budget: TaskBudget,
}

/// The fixed section → task mapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskCatalog;

impl TaskCatalog {
    /// Task kinds for a section, in dispatch order.
    #[must_use]
    pub fn kinds(section: Section) -> &'static [TaskKind] {
        match section {
            Section::Basic => &[TaskKind::SenseDiscovery],
            Section::Etymology => &[TaskKind::Etymology],
            Section::WordFamily => &[TaskKind::WordFamily],
            Section::UsageContext => &[TaskKind::UsageContext],
            Section::CulturalNotes => &[TaskKind::CulturalNotes],
            Section::Frequency => &[TaskKind::Frequency],
            Section::DetailedSense => &[
                TaskKind::CoreMetadata,
                TaskKind::UsageExamples,
                TaskKind::RelatedWords,
                TaskKind::UsageNotes,
            ],
            Section::MediaClips => &[TaskKind::MediaClips],
        }
    }

    /// Worst-case fan-out across all fixed section entries.
    #[must_use]
    pub fn max_section_fanout() -> usize {
        Section::ALL
            .iter()
            .map(|s| Self::kinds(*s).len())
            .max()
            .unwrap_or(1)
    }

    #[must_use]
    pub fn budget(kind: TaskKind) -> TaskBudget {
        match kind {
            TaskKind::SenseDiscovery => TaskBudget::discovery(),
            TaskKind::Etymology | TaskKind::UsageContext | TaskKind::CulturalNotes => {
                TaskBudget::medium()
            }
            TaskKind::WordFamily | TaskKind::Frequency | TaskKind::MediaClips => {
                TaskBudget::simple()
            }
            TaskKind::CoreMetadata
            | TaskKind::UsageExamples
            | TaskKind::RelatedWords
            | TaskKind::UsageNotes
            | TaskKind::SenseAnalysis => TaskBudget::complex(),
        }
    }

    /// Schema name the backend is asked to match for a kind.
    #[must_use]
    pub fn schema(kind: TaskKind) -> &'static str {
        match kind {
            TaskKind::SenseDiscovery => "DiscoveredEntries",
            TaskKind::Etymology => "EtymologyInfo",
            TaskKind::WordFamily => "WordFamilyInfo",
            TaskKind::UsageContext => "UsageContextInfo",
            TaskKind::CulturalNotes => "CulturalNotesInfo",
            TaskKind::Frequency => "FrequencyInfo",
            TaskKind::CoreMetadata => "SenseCoreMetadata",
            TaskKind::UsageExamples => "SenseUsageExamples",
            TaskKind::RelatedWords => "SenseRelatedWords",
            TaskKind::UsageNotes => "SenseUsageNotes",
            TaskKind::SenseAnalysis => "SenseAnalysis",
            TaskKind::MediaClips => "MediaClips",
        }
    }

    /// The standalone discovery task used when the authoritative path
    /// produced nothing.
    #[must_use]
    pub fn discovery_task(&self, word: &str) -> AgentTask {
        self.build(
            TaskId::word_scoped(TaskKind::SenseDiscovery),
            &RenderInput::word(word),
            false,
        )
    }

    /// Build the task set for one section request.
    ///
    /// `authoritative` marks the discovery skeleton as reference-sourced;
    /// only then are seeds attached and budgets shrunk.
    #[must_use]
    pub fn section_tasks(
        &self,
        word: &str,
        section: Section,
        discovery: &EntrySet,
        authoritative: bool,
        address: Option<SenseAddress>,
    ) -> Vec<AgentTask> {
        let word_seed = authoritative.then(|| word_seed(discovery));
        let sense_seed = match (authoritative, address) {
            (true, Some(addr)) => sense_seed(discovery, addr),
            _ => None,
        };
        let definition =
            address.and_then(|addr| discovery.sense_at(addr).map(|s| s.definition.clone()));

        Self::kinds(section)
            .iter()
            .map(|kind| {
                let (id, seed) = match address {
                    Some(addr) if is_sense_scoped(*kind) => {
                        (TaskId::sense_scoped(*kind, addr), sense_seed.as_ref())
                    }
                    _ => (TaskId::word_scoped(*kind), word_seed.as_ref()),
                };
                let input = RenderInput {
                    word,
                    address: id.address,
                    definition: definition.as_deref(),
                    seed,
                };
                self.build(id, &input, seed.is_some())
            })
            .collect()
    }

    /// Build the comprehensive word-report task set: every word-level
    /// single-task section plus one analysis task per discovered sense.
    #[must_use]
    pub fn report_tasks(
        &self,
        word: &str,
        discovery: &EntrySet,
        authoritative: bool,
    ) -> Vec<AgentTask> {
        let word_seed = authoritative.then(|| word_seed(discovery));
        let mut tasks: Vec<AgentTask> = [
            TaskKind::Etymology,
            TaskKind::WordFamily,
            TaskKind::UsageContext,
            TaskKind::CulturalNotes,
            TaskKind::Frequency,
        ]
        .iter()
        .map(|kind| {
            let input = RenderInput {
                word,
                address: None,
                definition: None,
                seed: word_seed.as_ref(),
            };
            self.build(TaskId::word_scoped(*kind), &input, word_seed.is_some())
        })
        .collect();

        for addr in discovery.addresses() {
            let seed = authoritative
                .then(|| sense_seed(discovery, addr))
                .flatten();
            let definition = discovery.sense_at(addr).map(|s| s.definition.clone());
            let input = RenderInput {
                word,
                address: Some(addr),
                definition: definition.as_deref(),
                seed: seed.as_ref(),
            };
            tasks.push(self.build(
                TaskId::sense_scoped(TaskKind::SenseAnalysis, addr),
                &input,
                seed.is_some(),
            ));
        }
        tasks
    }

    fn build(&self, id: TaskId, input: &RenderInput<'_>, seeded: bool) -> AgentTask {
        let base = Self::budget(id.kind);
        AgentTask {
            id,
            instruction: render::render(id.kind, input),
            schema: Self::schema(id.kind),
            budget: if seeded { base.seeded() } else { base },
        }
    }
}

fn is_sense_scoped(kind: TaskKind) -> bool {
    matches!(
        kind,
        TaskKind::CoreMetadata
            | TaskKind::UsageExamples
            | TaskKind::RelatedWords
            | TaskKind::UsageNotes
            | TaskKind::SenseAnalysis
    )
}

/// Compact word-level seed: pronunciation plus the leading definitions.
fn word_seed(set: &EntrySet) -> Value {
    let definitions: Vec<&str> = set
        .entries
        .iter()
        .flat_map(|e| e.senses.iter().map(|s| s.definition.as_str()))
        .take(6)
        .collect();
    json!({
        "pronunciation": set.pronunciation(),
        "definitions": definitions,
    })
}

/// Per-sense seed: everything the reference provider knows about the
/// addressed sense.
fn sense_seed(set: &EntrySet, address: SenseAddress) -> Option<Value> {
    set.sense_at(address).map(|sense| {
        json!({
            "definition": sense.definition,
            "part_of_speech": sense.part_of_speech,
            "synonyms": sense.synonyms,
            "antonyms": sense.antonyms,
            "examples": sense.examples,
        })
    })
}
