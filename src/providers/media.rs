//! Auxiliary content-search seam.
//!
//! The provider returns a candidate list already filtered and ranked by
//! criteria external to this engine; the engine wraps it as the
//! `media_clips` single-task catalog entry and never inspects the items.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::MediaError;

/// External media search, queried by headword. The returned values are
/// opaque to the engine.
#[async_trait]
pub trait MediaSearchProvider: Send + Sync {
    async fn search(&self, word: &str) -> Result<Vec<Value>, MediaError>;
}
