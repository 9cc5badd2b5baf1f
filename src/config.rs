//! Engine configuration and the explicit behavior switches.
//!
//! Defaults come from the environment (via `dotenvy`, resolved once) with
//! programmatic `with_*` overrides for tests and embedders. The three
//! policy enums exist so that partial-result handling, cancellation
//! handling, and generative-only strictness are configured decisions, not
//! accidental behavior.

use std::time::Duration;

/// Whether a fan-out with failed required fragments still returns its
/// assembled partial payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartialPolicy {
    /// Return the partial payload with `success = false` and exact
    /// `missing_fields`.
    ReturnPartial,
    /// Collapse to a payload-free failure envelope.
    FailClosed,
}

/// What happens to fragments that completed before the aggregate ceiling
/// cancelled the rest of the fan-out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Merge whatever finished; cancelled tasks count as missing.
    MergeCompleted,
    /// Discard everything and return a timeout failure.
    Discard,
}

/// Success semantics for words with no authoritative match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SynthesisPolicy {
    /// Synthesized entries are first-class: `success = true`.
    Accept,
    /// Synthesized entries are served but marked `success = false`
    /// (and therefore never cached).
    Strict,
}

/// Configuration for a [`Resolver`](crate::resolver::Resolver).
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Authoritative fetch budget; sub-second class.
    pub fetch_timeout: Duration,
    /// Wall-clock ceiling for one request's whole fan-out.
    pub aggregate_ceiling: Duration,
    /// Pool permits; the fixed catalog's worst fan-out is 4, the
    /// comprehensive report queues beyond the bound.
    pub max_concurrency: usize,
    pub cache_ttl: Duration,
    /// Fixed merge overhead added to the slowest task latency when
    /// computing `execution_time`.
    pub merge_overhead: Duration,
    pub partial_policy: PartialPolicy,
    pub timeout_policy: TimeoutPolicy,
    pub synthesis_policy: SynthesisPolicy,
    /// Base URL of the reference dictionary API.
    pub reference_url: String,
    /// Base URL of the OpenAI-compatible generative endpoint.
    pub backend_url: String,
    pub backend_model: String,
    pub api_key: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        dotenvy::dotenv().ok();
        Self {
            fetch_timeout: Duration::from_millis(800),
            aggregate_ceiling: Duration::from_secs(60),
            max_concurrency: 8,
            cache_ttl: Duration::from_secs(
                env_u64("LEXWEAVE_CACHE_TTL_SECS").unwrap_or(3600),
            ),
            merge_overhead: Duration::from_millis(5),
            partial_policy: PartialPolicy::ReturnPartial,
            timeout_policy: TimeoutPolicy::MergeCompleted,
            synthesis_policy: SynthesisPolicy::Accept,
            reference_url: std::env::var("LEXWEAVE_REFERENCE_URL").unwrap_or_else(|_| {
                "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
            }),
            backend_url: std::env::var("LEXWEAVE_BACKEND_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com".to_string()),
            backend_model: std::env::var("LEXWEAVE_BACKEND_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".to_string()),
            api_key: std::env::var("LEXWEAVE_API_KEY").ok(),
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.parse().ok()
}

impl EngineConfig {
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_aggregate_ceiling(mut self, ceiling: Duration) -> Self {
        self.aggregate_ceiling = ceiling;
        self
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, permits: usize) -> Self {
        self.max_concurrency = permits.max(1);
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_partial_policy(mut self, policy: PartialPolicy) -> Self {
        self.partial_policy = policy;
        self
    }

    #[must_use]
    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    #[must_use]
    pub fn with_synthesis_policy(mut self, policy: SynthesisPolicy) -> Self {
        self.synthesis_policy = policy;
        self
    }

    #[must_use]
    pub fn with_reference_url(mut self, url: impl Into<String>) -> Self {
        self.reference_url = url.into();
        self
    }

    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }
}
