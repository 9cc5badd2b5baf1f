use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::request::DataSource;

/// Terminal classification of one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Every required fragment present; response cached.
    Complete,
    /// Some fragments missing; served (or collapsed) per policy, uncached.
    Partial,
    /// Served from cache without touching any upstream.
    CacheHit,
    /// Request rejected before any I/O.
    ClientError,
    /// Every available source failed.
    Failed,
}

/// One structured provenance event per request.
///
/// Enables observability of authoritative-vs-fallback ratios without
/// affecting control flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub request_id: Uuid,
    pub word: String,
    /// Section wire name, or `"word_report"` for the comprehensive lookup.
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    /// Wall-clock seconds for the whole request.
    pub latency: f64,
    pub outcome: DecisionOutcome,
    pub when: DateTime<Utc>,
}

impl DecisionEvent {
    pub fn new(
        word: impl Into<String>,
        section: impl Into<String>,
        data_source: Option<DataSource>,
        latency: f64,
        outcome: DecisionOutcome,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            word: word.into(),
            section: section.into(),
            data_source,
            latency,
            outcome,
            when: Utc::now(),
        }
    }
}

impl fmt::Display for DecisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {:?} source={} latency={:.3}s",
            self.word,
            self.section,
            self.outcome,
            self.data_source
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.latency
        )
    }
}
