//! # Lexweave: Hybrid Lexical Lookup Orchestration Engine
//!
//! Lexweave resolves structured lexical information for a word on demand,
//! combining an authoritative reference source with generative enrichment
//! and serving results through a section-addressable, progressively
//! loadable API.
//!
//! ## Core Concepts
//!
//! - **Sections**: enumerated request categories (`basic`, `etymology`,
//!   `detailed_sense`, ...), each bound to a fixed task-catalog entry
//! - **Addressing**: every sense is identified by the two-dimensional
//!   `(entry_index, sense_index)` pair the `basic` section establishes
//! - **Fan-out**: one request spawns a bounded set of parallel generative
//!   tasks under structured, request-scoped concurrency with per-task budgets
//! - **Merging**: fragments assemble commutatively; completion order never
//!   changes the payload, and missing fragments are reported, not faked
//! - **Caching**: completed responses are memoized in-process under a TTL
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lexweave::request::LookupRequest;
//! use lexweave::resolver::Resolver;
//! use lexweave::section::{Section, SenseAddress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::builder().build();
//!
//! // Establish the addressing skeleton first.
//! let basic = resolver
//!     .resolve(&LookupRequest::word_section("run", Section::Basic))
//!     .await?;
//! println!("source: {}", basic.data_source);
//!
//! // Then drill into one sense; indices come from the basic payload.
//! let detailed = resolver
//!     .resolve(&LookupRequest::detailed("run", SenseAddress::new(0, 0)))
//!     .await?;
//! assert!(detailed.execution_time > 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sourcing Decisions
//!
//! Every request is served along the authoritative → generative chain:
//! the reference provider is tried once (sub-second budget); on failure
//! the whole request moves to the generative fallback with no mid-flight
//! re-attempt. Responses carry their provenance as
//! [`DataSource`](request::DataSource), and a
//! [`DecisionLog`](decision::DecisionLog) event records
//! `{word, section, data_source, latency, outcome}` per request so
//! authoritative-vs-fallback ratios are observable without touching
//! control flow.
//!
//! ## Partial Failure
//!
//! Task failures are isolated: one timed-out fragment never cancels its
//! siblings, and the response reports exactly the fields that are absent.
//! Whether partial payloads are returned or collapsed, and whether
//! fragments that survived an aggregate-ceiling cancellation are merged,
//! are explicit [`config`] switches.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod decision;
pub mod error;
pub mod merge;
pub mod model;
pub mod payload;
pub mod pool;
pub mod providers;
pub mod request;
pub mod resolver;
pub mod section;
pub mod telemetry;

pub use config::EngineConfig;
pub use request::{DataSource, LookupRequest, LookupResponse};
pub use resolver::Resolver;
pub use section::{Section, SenseAddress};
