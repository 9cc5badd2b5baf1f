//! Request and response envelopes for the single `resolve` entry point.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;
use crate::payload::SectionPayload;
use crate::section::{Section, SenseAddress};

/// Where a response's content came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Served entirely from the reference provider.
    Authoritative,
    /// Authoritative skeleton enriched by generative tasks.
    Hybrid,
    /// No authoritative data contributed; fallback path only.
    Generative,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::Authoritative => "authoritative",
            DataSource::Hybrid => "hybrid",
            DataSource::Generative => "generative",
        };
        f.write_str(s)
    }
}

/// One lookup request. Which index fields are required is a function of
/// `section`; shape violations fail before any network or generative call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub word: String,
    pub section: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_index: Option<usize>,
}

impl LookupRequest {
    /// A request for a section that carries no indices.
    pub fn word_section(word: impl Into<String>, section: Section) -> Self {
        Self {
            word: word.into(),
            section,
            entry_index: None,
            sense_index: None,
        }
    }

    /// A `detailed_sense` request for one address.
    pub fn detailed(word: impl Into<String>, address: SenseAddress) -> Self {
        Self {
            word: word.into(),
            section: Section::DetailedSense,
            entry_index: Some(address.entry_index),
            sense_index: Some(address.sense_index),
        }
    }

    /// Validate the request shape against the section's required fields.
    ///
    /// Returns the address for index-carrying sections. This is pure
    /// in-memory validation; bounds checking against the word's actual
    /// entry/sense counts happens later, still before any fan-out.
    pub fn validate_shape(&self) -> Result<Option<SenseAddress>, LookupError> {
        if !self.section.requires_address() {
            return Ok(None);
        }
        let entry_index = self.entry_index.ok_or(LookupError::MissingParameter {
            section: self.section,
            field: "entry_index",
        })?;
        let sense_index = self.sense_index.ok_or(LookupError::MissingParameter {
            section: self.section,
            field: "sense_index",
        })?;
        Ok(Some(SenseAddress::new(entry_index, sense_index)))
    }
}

/// Response envelope for one lookup.
///
/// `success == false` responses may still carry a partial payload (under
/// the `ReturnPartial` policy) with `missing_fields` naming exactly what is
/// absent. Failed or partial responses are never cached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub headword: String,
    pub data_source: DataSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SectionPayload>,
    /// Wall-clock seconds: discovery phase plus the slowest parallel task
    /// plus fixed merge overhead. Never the sum of task latencies.
    pub execution_time: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    /// Failure envelope with no payload (all sources exhausted, or the
    /// configured policy collapsed a partial result).
    pub fn failure(
        headword: impl Into<String>,
        data_source: DataSource,
        execution_time: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            headword: headword.into(),
            data_source,
            payload: None,
            execution_time,
            success: false,
            missing_fields: Vec::new(),
            error: Some(error.into()),
        }
    }
}
