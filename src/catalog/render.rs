//! Pure instruction rendering.
//!
//! Each fragment kind has a rendering function `(context) -> instruction`
//! with no I/O and no backend dependency, so prompt content is testable in
//! isolation. When authoritative seed data is present it is embedded in
//! the instruction and the task is told to fill gaps rather than repeat
//! known facts, which is what lets seeded tasks run on smaller budgets.

use serde_json::Value;

use crate::section::{SenseAddress, TaskKind};

/// Everything a rendering function may draw on.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderInput<'a> {
    pub word: &'a str,
    pub address: Option<SenseAddress>,
    /// The sense's baseline definition, for sense-scoped kinds.
    pub definition: Option<&'a str>,
    /// Authoritative fragments to seed the task with.
    pub seed: Option<&'a Value>,
}

impl<'a> RenderInput<'a> {
    pub fn word(word: &'a str) -> Self {
        Self {
            word,
            ..Default::default()
        }
    }
}

/// Render the instruction for one task kind.
#[must_use]
pub fn render(kind: TaskKind, input: &RenderInput<'_>) -> String {
    match kind {
        TaskKind::SenseDiscovery => discovery(input.word),
        TaskKind::Etymology => etymology(input.word, input.seed),
        TaskKind::WordFamily => word_family(input.word, input.seed),
        TaskKind::UsageContext => usage_context(input.word, input.seed),
        TaskKind::CulturalNotes => cultural_notes(input.word, input.seed),
        TaskKind::Frequency => frequency(input.word, input.seed),
        TaskKind::CoreMetadata => sense_scoped(
            input,
            "Provide the core metadata for this sense: part of speech, usage register \
             (formal, informal, colloquial, slang, archaic, literary, professional, academic, neutral), \
             domain of use, and tone. \
             Tone MUST be one of: positive, negative, neutral, humorous, derogatory, pejorative, approving.",
        ),
        TaskKind::UsageExamples => sense_scoped(
            input,
            "Provide example sentences and frequent collocations for this sense. \
             At most 2 examples and 3 collocations; fewer when the reference data already covers them.",
        ),
        TaskKind::RelatedWords => sense_scoped(
            input,
            "Provide close synonyms, close antonyms, and fixed expressions, phrasal verbs, \
             or idioms built around this sense.",
        ),
        TaskKind::UsageNotes => sense_scoped(
            input,
            "Provide critical guidance on when and how to use this sense, \
             including common pitfalls for language learners.",
        ),
        TaskKind::SenseAnalysis => sense_scoped(
            input,
            "Provide a complete analysis of this sense: part of speech, usage register, \
             domain, tone, usage notes, 2 example sentences, collocations, \
             word-specific phrases, synonyms, and antonyms. \
             Tone MUST be one of: positive, negative, neutral, humorous, derogatory, pejorative, approving.",
        ),
        TaskKind::MediaClips => input.word.to_string(),
    }
}

fn discovery(word: &str) -> String {
    format!(
        "Analyze the word \"{word}\" and discover ALL its distinct meanings.\n\
         Group senses into entries, one entry per headword reading, ordered by frequency \
         (most common first). For each sense give a clear, concise definition and the part \
         of speech. Include rare, archaic, and specialized meanings, and provide a \
         pronunciation (IPA) for each entry."
    )
}

fn etymology(word: &str, seed: Option<&Value>) -> String {
    with_seed(
        format!(
            "Provide the etymology of \"{word}\": a narrative of its origin, historical \
             development, and meaning evolution, plus a breakdown of roots, prefixes, \
             and suffixes with their meanings."
        ),
        seed,
    )
}

fn word_family(word: &str, seed: Option<&Value>) -> String {
    with_seed(
        format!(
            "List the word family of \"{word}\": direct derivatives, related terms from \
             the same linguistic root, and words in the same semantic field. Focus on \
             relationships that help language learners."
        ),
        seed,
    )
}

fn usage_context(word: &str, seed: Option<&Value>) -> String {
    with_seed(
        format!(
            "Describe the modern usage context of \"{word}\": current usage trends, words \
             or phrases it is commonly confused with (with brief discriminators), and \
             notable regional variations between English variants."
        ),
        seed,
    )
}

fn cultural_notes(word: &str, seed: Option<&Value>) -> String {
    with_seed(
        format!(
            "Provide cultural and linguistic notes for \"{word}\": cultural associations, \
             connotations or sensitivities, historical or literary significance, and any \
             overarching observations about its place in the language."
        ),
        seed,
    )
}

fn frequency(word: &str, seed: Option<&Value>) -> String {
    with_seed(
        format!(
            "Estimate how common the word \"{word}\" is in modern usage. \
             Answer with exactly one of: very_common, common, uncommon, rare, very_rare."
        ),
        seed,
    )
}

fn sense_scoped(input: &RenderInput<'_>, task_body: &str) -> String {
    let ordinal = input
        .address
        .map(|a| format!(" (entry {}, sense {})", a.entry_index, a.sense_index))
        .unwrap_or_default();
    let definition = input.definition.unwrap_or("");
    with_seed(
        format!(
            "Analyze one specific sense of the word \"{}\"{ordinal}.\n\
             Baseline definition: \"{definition}\"\n\
             {task_body}",
            input.word
        ),
        input.seed,
    )
}

fn with_seed(instruction: String, seed: Option<&Value>) -> String {
    match seed {
        Some(seed) => format!(
            "{instruction}\n\
             Known reference data: {seed}\n\
             Do not repeat facts the reference data already covers; fill the gaps."
        ),
        None => instruction,
    }
}
