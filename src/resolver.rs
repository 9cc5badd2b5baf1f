//! Request router / section dispatcher.
//!
//! [`Resolver`] is the engine's single entry point. One call moves through
//! the fixed pipeline: shape validation → cache lookup → discovery
//! (cached skeleton, then authoritative fetch, then generative discovery)
//! → index bounds validation → task-set construction → bounded fan-out →
//! merge → cache write → decision event. Client errors fail before any
//! network or generative call; internal errors degrade along the
//! authoritative → generative chain; only exhaustion of every source
//! produces a user-visible failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::instrument;

use crate::cache::{CacheKey, Clock, ResponseCache, SystemClock};
use crate::catalog::TaskCatalog;
use crate::config::{EngineConfig, PartialPolicy, SynthesisPolicy, TimeoutPolicy};
use crate::decision::{DecisionEvent, DecisionLog, DecisionOutcome};
use crate::error::LookupError;
use crate::merge;
use crate::model::EntrySet;
use crate::payload::{Fragment, SectionPayload, WordReport};
use crate::pool::{AgentPool, FanOutReport};
use crate::providers::{
    DictionaryApiProvider, GenerativeBackend, MediaSearchProvider, OpenAiCompatBackend,
    ReferenceProvider,
};
use crate::request::{DataSource, LookupRequest, LookupResponse};
use crate::section::{Section, TaskId, TaskKind};

/// How the addressing skeleton for a word was obtained.
struct Discovery {
    set: EntrySet,
    authoritative: bool,
    elapsed: Duration,
}

/// The hybrid lookup orchestration engine.
///
/// Construct through [`Resolver::builder`]; every upstream seam is
/// injectable, which is what the integration tests use to script
/// providers.
///
/// # Examples
///
/// ```rust,no_run
/// use lexweave::config::EngineConfig;
/// use lexweave::request::LookupRequest;
/// use lexweave::resolver::Resolver;
/// use lexweave::section::Section;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = Resolver::builder()
///     .config(EngineConfig::default())
///     .build();
///
/// let response = resolver
///     .resolve(&LookupRequest::word_section("run", Section::Basic))
///     .await?;
/// println!("{} via {}", response.headword, response.data_source);
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    config: EngineConfig,
    catalog: TaskCatalog,
    cache: ResponseCache,
    pool: AgentPool,
    reference: Arc<dyn ReferenceProvider>,
    decisions: DecisionLog,
}

/// Builder for [`Resolver`], with injectable collaborator seams.
#[derive(Default)]
pub struct ResolverBuilder {
    config: Option<EngineConfig>,
    reference: Option<Arc<dyn ReferenceProvider>>,
    backend: Option<Arc<dyn GenerativeBackend>>,
    media: Option<Arc<dyn MediaSearchProvider>>,
    clock: Option<Arc<dyn Clock>>,
    decisions: Option<DecisionLog>,
}

impl ResolverBuilder {
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn reference(mut self, provider: Arc<dyn ReferenceProvider>) -> Self {
        self.reference = Some(provider);
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn GenerativeBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn media(mut self, media: Arc<dyn MediaSearchProvider>) -> Self {
        self.media = Some(media);
        self
    }

    /// Inject a clock for deterministic cache TTL behavior in tests.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub fn decisions(mut self, decisions: DecisionLog) -> Self {
        self.decisions = Some(decisions);
        self
    }

    #[must_use]
    pub fn build(self) -> Resolver {
        let config = self.config.unwrap_or_default();
        let reference = self.reference.unwrap_or_else(|| {
            Arc::new(DictionaryApiProvider::new(
                config.reference_url.clone(),
                config.fetch_timeout,
            ))
        });
        let backend = self.backend.unwrap_or_else(|| {
            Arc::new(OpenAiCompatBackend::new(
                config.backend_url.clone(),
                config.backend_model.clone(),
                config.api_key.clone(),
            ))
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        let cache = ResponseCache::with_clock(config.cache_ttl, clock);
        let pool = AgentPool::new(backend, self.media, config.max_concurrency);
        Resolver {
            pool,
            cache,
            reference,
            decisions: self.decisions.unwrap_or_default(),
            catalog: TaskCatalog,
            config,
        }
    }
}

impl Resolver {
    #[must_use]
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    /// The response cache, exposed for inspection in tests and embedders.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Resolve one section request.
    ///
    /// Client errors (`MissingParameter`, `IndexOutOfRange`) are returned
    /// as `Err` with zero generative calls issued for the failing request;
    /// every downstream condition is reported inside the response
    /// envelope, with `success = false` and a diagnostic `error` when all
    /// sources failed.
    #[instrument(skip(self, request), fields(word = %request.word, section = %request.section), err)]
    pub async fn resolve(&self, request: &LookupRequest) -> Result<LookupResponse, LookupError> {
        let started = Instant::now();
        let section = request.section;

        let address = match request.validate_shape() {
            Ok(address) => address,
            Err(e) => {
                self.record(request, None, started, DecisionOutcome::ClientError);
                return Err(e);
            }
        };

        let key = CacheKey::new(
            &request.word,
            section,
            request.entry_index,
            request.sense_index,
        );
        if let Some(hit) = self.cache.get(&key) {
            self.record(
                request,
                Some(hit.data_source),
                started,
                DecisionOutcome::CacheHit,
            );
            return Ok(hit);
        }

        let discovery = match self.discover(&request.word).await {
            Ok(discovery) => discovery,
            Err(message) => {
                self.record(request, Some(DataSource::Generative), started, DecisionOutcome::Failed);
                return Ok(LookupResponse::failure(
                    &request.word,
                    DataSource::Generative,
                    self.elapsed_time(started.elapsed(), Duration::ZERO),
                    message,
                ));
            }
        };

        // Bounds are established by the basic skeleton; violations are
        // client errors surfaced before any fan-out is dispatched.
        if let Some(addr) = address {
            if discovery.set.sense_at(addr).is_none() {
                self.record(request, None, started, DecisionOutcome::ClientError);
                return Err(LookupError::IndexOutOfRange {
                    requested: addr,
                    entry_count: discovery.set.entry_count(),
                    sense_count: discovery.set.sense_count(addr.entry_index).unwrap_or(0),
                });
            }
        }

        // The basic section is served straight from the skeleton; every
        // other section fans out its catalog entry.
        let fanout = if section == Section::Basic {
            FanOutReport::default()
        } else {
            let tasks = self.catalog.section_tasks(
                &request.word,
                section,
                &discovery.set,
                discovery.authoritative,
                address,
            );
            let ceiling = self
                .config
                .aggregate_ceiling
                .saturating_sub(discovery.elapsed);
            self.pool.run(&request.word, tasks, ceiling).await
        };

        let data_source = self.data_source(&discovery, section);

        if fanout.ceiling_hit && self.config.timeout_policy == TimeoutPolicy::Discard {
            self.record(request, Some(data_source), started, DecisionOutcome::Failed);
            return Ok(LookupResponse::failure(
                &request.word,
                data_source,
                self.elapsed_time(discovery.elapsed, fanout.max_latency()),
                format!(
                    "aggregate ceiling of {:?} exceeded; partial fragments discarded by policy",
                    self.config.aggregate_ceiling
                ),
            ));
        }

        let report = merge::merge_section(section, &discovery.set, address, &fanout);
        let execution_time = self.elapsed_time(discovery.elapsed, fanout.max_latency());
        let success = report.is_complete();

        let mut response = LookupResponse {
            headword: discovery.set.headword.clone(),
            data_source,
            payload: report.payload,
            execution_time,
            success,
            missing_fields: report.missing_fields,
            error: None,
        };

        if !response.success && self.config.partial_policy == PartialPolicy::FailClosed {
            response.payload = None;
            response.error = Some(format!(
                "{} required fragment field(s) missing; partial payload withheld by policy",
                response.missing_fields.len()
            ));
        }

        if !discovery.authoritative
            && self.config.synthesis_policy == SynthesisPolicy::Strict
            && response.success
        {
            response.success = false;
            response.error = Some(format!(
                "no authoritative match for \"{}\"; synthesized entries rejected by strict policy",
                request.word
            ));
        }

        if response.success {
            self.cache.put(key, response.clone());
            self.record(request, Some(data_source), started, DecisionOutcome::Complete);
        } else {
            self.record(request, Some(data_source), started, DecisionOutcome::Partial);
        }
        Ok(response)
    }

    /// Comprehensive single-shot lookup: discovery plus every word-level
    /// section plus one analysis per discovered sense, one combined
    /// fan-out, one merged report.
    #[instrument(skip(self), fields(word = %word))]
    pub async fn lookup_word(&self, word: &str) -> WordReport {
        let started = Instant::now();

        let discovery = match self.discover(word).await {
            Ok(discovery) => discovery,
            Err(message) => {
                self.decisions.record(DecisionEvent::new(
                    word,
                    "word_report",
                    Some(DataSource::Generative),
                    started.elapsed().as_secs_f64(),
                    DecisionOutcome::Failed,
                ));
                return WordReport {
                    headword: word.to_string(),
                    pronunciation: String::new(),
                    audio_url: String::new(),
                    data_source: DataSource::Generative,
                    total_senses: 0,
                    frequency: None,
                    etymology: None,
                    word_family: None,
                    usage_context: None,
                    cultural_notes: None,
                    detailed_senses: Vec::new(),
                    execution_time: self.elapsed_time(started.elapsed(), Duration::ZERO),
                    success: false,
                    missing_fields: Vec::new(),
                    error: Some(message),
                };
            }
        };

        let tasks = self
            .catalog
            .report_tasks(word, &discovery.set, discovery.authoritative);
        let ceiling = self
            .config
            .aggregate_ceiling
            .saturating_sub(discovery.elapsed);
        let fanout = self.pool.run(word, tasks, ceiling).await;

        let data_source = if discovery.authoritative {
            DataSource::Hybrid
        } else {
            DataSource::Generative
        };
        let execution_time = self.elapsed_time(discovery.elapsed, fanout.max_latency());
        let mut report =
            merge::merge_word_report(&discovery.set, &fanout, data_source, execution_time);

        if !discovery.authoritative && self.config.synthesis_policy == SynthesisPolicy::Strict {
            report.success = false;
        }

        let outcome = if report.success {
            DecisionOutcome::Complete
        } else {
            DecisionOutcome::Partial
        };
        self.decisions.record(DecisionEvent::new(
            word,
            "word_report",
            Some(data_source),
            started.elapsed().as_secs_f64(),
            outcome,
        ));
        report
    }

    /// Resolve the word's addressing skeleton.
    ///
    /// Order: cached `basic` response, then one authoritative fetch, then
    /// the generative discovery task. Once the authoritative path has
    /// failed for this request it is never re-attempted mid-flight.
    async fn discover(&self, word: &str) -> Result<Discovery, String> {
        let started = Instant::now();

        if let Some(cached) = self.cache.get(&CacheKey::basic(word)) {
            if let Some(SectionPayload::Basic(info)) = &cached.payload {
                return Ok(Discovery {
                    set: info.to_entry_set(),
                    authoritative: cached.data_source == DataSource::Authoritative,
                    elapsed: started.elapsed(),
                });
            }
        }

        let fetch_error = match self.reference.fetch(word).await {
            Ok(set) => {
                return Ok(Discovery {
                    set,
                    authoritative: true,
                    elapsed: started.elapsed(),
                });
            }
            Err(e) => e,
        };
        tracing::debug!(word, error = %fetch_error, "authoritative fetch failed; using generative discovery");

        let task = self.catalog.discovery_task(word);
        let mut fanout = self
            .pool
            .run(word, vec![task], self.config.aggregate_ceiling)
            .await;
        let id = TaskId::word_scoped(TaskKind::SenseDiscovery);
        match fanout.outcomes.remove(&id).map(|o| o.result) {
            Some(Ok(Fragment::Discovery(discovered))) => Ok(Discovery {
                set: discovered.into_entry_set(word),
                authoritative: false,
                elapsed: started.elapsed(),
            }),
            Some(Err(task_error)) => Err(format!(
                "authoritative fetch failed ({fetch_error}); generative discovery failed ({task_error})"
            )),
            _ => Err(format!(
                "authoritative fetch failed ({fetch_error}); generative discovery produced no entries"
            )),
        }
    }

    /// Sourcing provenance for one response.
    fn data_source(&self, discovery: &Discovery, section: Section) -> DataSource {
        match (discovery.authoritative, section) {
            (true, Section::Basic) => DataSource::Authoritative,
            (true, _) => DataSource::Hybrid,
            (false, _) => DataSource::Generative,
        }
    }

    /// Wall-clock time: sequential discovery phase, plus the slowest
    /// parallel task, plus fixed merge overhead. Never a sum of sibling
    /// latencies.
    fn elapsed_time(&self, discovery: Duration, max_task_latency: Duration) -> f64 {
        (discovery + max_task_latency + self.config.merge_overhead).as_secs_f64()
    }

    fn record(
        &self,
        request: &LookupRequest,
        data_source: Option<DataSource>,
        started: Instant,
        outcome: DecisionOutcome,
    ) {
        self.decisions.record(DecisionEvent::new(
            &request.word,
            request.section.encode(),
            data_source,
            started.elapsed().as_secs_f64(),
            outcome,
        ));
    }
}
