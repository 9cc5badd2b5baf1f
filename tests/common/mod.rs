#![allow(dead_code)]

//! Shared scripted collaborators for the integration suites.
//!
//! Every upstream seam the resolver talks to has a scripted stand-in here:
//! a reference provider serving a fixed entry set (or always failing), a
//! generative backend answering from canned fragments with per-schema
//! overrides, and a media provider returning a fixed clip list. All of
//! them count invocations so tests can assert that validation happens
//! before any upstream call.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lexweave::error::{BackendError, FetchError, MediaError};
use lexweave::model::{EntrySet, Sense, WordEntry};
use lexweave::providers::{GenerationRequest, GenerativeBackend, MediaSearchProvider, ReferenceProvider};

/// "run" with one entry and the requested number of senses.
pub fn entry_set_with_senses(total: usize) -> EntrySet {
    let senses = (0..total)
        .map(|i| Sense {
            sense_index: i,
            definition: format!("reference definition {i}"),
            part_of_speech: Some("verb".into()),
            synonyms: vec!["sprint".into()],
            antonyms: vec![],
            examples: vec![format!("reference example {i}")],
        })
        .collect();
    EntrySet::new(
        "run",
        vec![WordEntry {
            entry_index: 0,
            pronunciation: "/rʌn/".into(),
            audio_url: "https://audio.example/run.mp3".into(),
            senses,
        }],
    )
}

/// Reference provider that always serves a fixed entry set.
pub struct StaticReference {
    set: EntrySet,
    calls: AtomicUsize,
}

impl StaticReference {
    pub fn new(set: EntrySet) -> Arc<Self> {
        Arc::new(Self {
            set,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceProvider for StaticReference {
    async fn fetch(&self, _word: &str) -> Result<EntrySet, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.set.clone())
    }
}

/// Reference provider with no matches: every fetch is a 404.
pub struct FailingReference {
    calls: AtomicUsize,
}

impl FailingReference {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReferenceProvider for FailingReference {
    async fn fetch(&self, _word: &str) -> Result<EntrySet, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Status { status: 404 })
    }
}

/// Per-schema scripted behavior for [`ScriptedBackend`].
pub enum Script {
    /// Fail with a transport error.
    Fail,
    /// Sleep, then answer with the canned fragment.
    Delay(Duration),
    /// Answer with this exact value.
    Value(Value),
}

/// Generative backend answering from canned, schema-valid fragments.
pub struct ScriptedBackend {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    scripts: Mutex<FxHashMap<&'static str, Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            scripts: Mutex::new(FxHashMap::default()),
        })
    }

    /// Override the behavior for one schema name.
    pub fn script(&self, schema: &'static str, script: Script) {
        self.scripts.lock().unwrap().insert(schema, script);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrently running generate calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Clone the scripted behavior out so the lock is not held across
        // an await point. Scripts are persistent until overwritten.
        let script = {
            let scripts = self.scripts.lock().unwrap();
            scripts.get(request.schema).map(|s| match s {
                Script::Fail => Script::Fail,
                Script::Delay(d) => Script::Delay(*d),
                Script::Value(v) => Script::Value(v.clone()),
            })
        };
        let result = match script {
            Some(Script::Fail) => Err(BackendError::Transport("scripted failure".into())),
            Some(Script::Delay(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(canned_fragment(request.schema))
            }
            Some(Script::Value(value)) => Ok(value),
            None => Ok(canned_fragment(request.schema)),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A schema-valid canned fragment for each backend schema.
pub fn canned_fragment(schema: &str) -> Value {
    match schema {
        "DiscoveredEntries" => json!({
            "pronunciation": "/rʌn/",
            "entries": [{
                "pronunciation": "",
                "senses": [
                    {"definition": "synthesized meaning one", "part_of_speech": "verb"},
                    {"definition": "synthesized meaning two", "part_of_speech": "noun"}
                ]
            }]
        }),
        "EtymologyInfo" => json!({
            "etymology": "from Old English rinnan",
            "root_analysis": "rinn- (to flow) + -an (infinitive)"
        }),
        "WordFamilyInfo" => json!({"word_family": ["runner", "running", "rerun"]}),
        "UsageContextInfo" => json!({
            "modern_relevance": "steady across registers",
            "common_confusions": ["run vs. jog"],
            "regional_variations": []
        }),
        "CulturalNotesInfo" => json!({"notes": "central to countless idioms"}),
        "FrequencyInfo" => json!({"frequency": "very_common"}),
        "SenseCoreMetadata" => json!({
            "part_of_speech": "verb",
            "usage_register": ["neutral"],
            "domain": [],
            "tone": "neutral"
        }),
        "SenseUsageExamples" => json!({
            "examples": ["She runs every morning.", "He ran to catch the bus."],
            "collocations": ["run fast", "run a race"]
        }),
        "SenseRelatedWords" => json!({
            "synonyms": ["sprint", "dash"],
            "antonyms": ["walk"],
            "word_specific_phrases": ["in the long run"]
        }),
        "SenseUsageNotes" => json!({
            "usage_notes": "Prefer over 'jog' when speed matters."
        }),
        "SenseAnalysis" => json!({
            "part_of_speech": "verb",
            "usage_register": ["neutral"],
            "domain": [],
            "tone": "neutral",
            "usage_notes": "Common in both literal and figurative use.",
            "examples": ["She runs every morning.", "The engine runs smoothly."],
            "collocations": ["run smoothly"],
            "word_specific_phrases": ["run out of"],
            "synonyms": ["operate"],
            "antonyms": ["stall"],
        }),
        other => json!({"unknown_schema": other}),
    }
}

/// Media provider returning a fixed, pre-ranked clip list.
pub struct StaticMedia {
    clips: Vec<Value>,
    calls: AtomicUsize,
}

impl StaticMedia {
    pub fn new(clips: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            clips,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSearchProvider for StaticMedia {
    async fn search(&self, _word: &str) -> Result<Vec<Value>, MediaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.clips.clone())
    }
}
