//! Error taxonomy for the lookup engine.
//!
//! Three tiers, matching the propagation policy:
//!
//! 1. **Client errors** ([`LookupError`]) fail fast before any network or
//!    generative call is issued.
//! 2. **Internal errors** ([`FetchError`], [`BackendError`], [`MediaError`])
//!    degrade gracefully along the authoritative → generative chain.
//! 3. **Per-task errors** ([`TaskError`]) stay isolated inside the fan-out
//!    and feed partial-result accounting in the merger.
//!
//! Only exhaustion of every available source produces a user-visible
//! failure, surfaced in the response envelope rather than as an `Err`.

use miette::Diagnostic;
use thiserror::Error;

use crate::section::{Section, SenseAddress, TaskKind};

/// Client-side request errors.
///
/// These are the only errors [`Resolver::resolve`](crate::resolver::Resolver::resolve)
/// returns as `Err`; everything downstream of validation is reported inside
/// the [`LookupResponse`](crate::request::LookupResponse) envelope.
#[derive(Debug, Error, Diagnostic)]
pub enum LookupError {
    /// A section-required index field is absent from the request.
    #[error("missing parameter `{field}` for section `{section}`")]
    #[diagnostic(
        code(lexweave::request::missing_parameter),
        help("detailed_sense requests must carry both entry_index and sense_index.")
    )]
    MissingParameter {
        section: Section,
        field: &'static str,
    },

    /// The request named a section outside the fixed catalog.
    #[error("unknown section: {0}")]
    #[diagnostic(
        code(lexweave::request::invalid_section),
        help("valid sections: basic, etymology, word_family, usage_context, cultural_notes, frequency, detailed_sense, media_clips")
    )]
    InvalidSection(String),

    /// Supplied indices fall outside the bounds the `basic` section
    /// established for this word. Never clamped.
    #[error(
        "sense address {requested} out of range: word has {entry_count} entries, entry has {sense_count} senses"
    )]
    #[diagnostic(
        code(lexweave::request::index_out_of_range),
        help("fetch the basic section first and use the entry/sense counts it reports.")
    )]
    IndexOutOfRange {
        requested: SenseAddress,
        entry_count: usize,
        sense_count: usize,
    },
}

/// Failures of the authoritative reference provider.
///
/// Internal: a fallback trigger, never fatal on its own. Surfaced to the
/// caller only when the generative path also fails.
#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("reference provider returned status {status}")]
    #[diagnostic(code(lexweave::fetch::status))]
    Status { status: u16 },

    #[error("reference provider timed out after {elapsed_ms}ms")]
    #[diagnostic(code(lexweave::fetch::timeout))]
    Timeout { elapsed_ms: u64 },

    #[error("reference payload malformed: {0}")]
    #[diagnostic(code(lexweave::fetch::malformed))]
    Malformed(String),

    #[error("reference transport error: {0}")]
    #[diagnostic(code(lexweave::fetch::transport))]
    Transport(String),
}

/// Failures of the generative backend, before fragment typing.
#[derive(Debug, Error, Diagnostic)]
pub enum BackendError {
    #[error("backend returned status {status}")]
    #[diagnostic(code(lexweave::backend::status))]
    Status { status: u16 },

    #[error("backend returned no content")]
    #[diagnostic(code(lexweave::backend::empty))]
    Empty,

    #[error("backend content was not valid JSON: {0}")]
    #[diagnostic(code(lexweave::backend::non_json))]
    NonJson(String),

    #[error("backend transport error: {0}")]
    #[diagnostic(code(lexweave::backend::transport))]
    Transport(String),
}

/// Failures of the auxiliary content-search provider.
#[derive(Debug, Error, Diagnostic)]
pub enum MediaError {
    #[error("media search failed: {0}")]
    #[diagnostic(code(lexweave::media::search))]
    Search(String),
}

/// Per-task failure inside a fan-out.
///
/// Isolated: one task's failure or timeout never cancels siblings, and
/// there are no retries; fast-fail trades completeness for bounded tail
/// latency.
#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    #[error("task {kind} exceeded its {budget_ms}ms budget")]
    #[diagnostic(code(lexweave::task::timeout))]
    Timeout { kind: TaskKind, budget_ms: u64 },

    #[error("task {kind} backend failure: {message}")]
    #[diagnostic(code(lexweave::task::backend))]
    Backend { kind: TaskKind, message: String },

    #[error("task {kind} produced a fragment that does not match its schema: {message}")]
    #[diagnostic(
        code(lexweave::task::schema),
        help("the backend is instructed to emit JSON matching the fragment schema; mismatches are counted as task failures, not coerced.")
    )]
    Schema { kind: TaskKind, message: String },

    #[error("task {kind} cancelled by the request's aggregate ceiling")]
    #[diagnostic(code(lexweave::task::cancelled))]
    Cancelled { kind: TaskKind },
}

impl TaskError {
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskError::Timeout { kind, .. }
            | TaskError::Backend { kind, .. }
            | TaskError::Schema { kind, .. }
            | TaskError::Cancelled { kind } => *kind,
        }
    }

    /// Whether this failure came from the cooperative stop signal rather
    /// than the task's own budget or backend.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled { .. })
    }
}
