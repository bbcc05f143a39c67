//! Query Analysis - Output structure of the brain.
//!
//! Owns every intermediate result of one pipeline run by value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::{Operation, Subtopic, Topic};
use super::confidence::{self, CONFIDENCE_THRESHOLD};
use super::entity::EntityMatch;
use super::proposal::DispatchProposal;

/// Complete analysis of a single query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// Original user query, untouched
    pub query: String,

    /// Lower-cased, diacritic-folded copy used for matching
    pub normalized: String,

    pub topic: Topic,
    pub subtopic: Subtopic,
    pub operation: Operation,

    /// Extracted equation or expression, if any
    pub entity: Option<EntityMatch>,

    /// Confidence in [0.0, 1.0]
    pub confidence: f32,

    /// Proposed routing
    pub proposal: DispatchProposal,

    /// Processing time in microseconds
    pub processing_time_us: u64,

    /// Timestamp of analysis
    pub timestamp: DateTime<Utc>,
}

impl QueryAnalysis {
    /// Create an empty analysis for `query`, nothing determined yet
    pub fn new(query: String) -> Self {
        Self {
            query,
            normalized: String::new(),
            topic: Topic::Undetermined,
            subtopic: Subtopic::Undetermined,
            operation: Operation::Undetermined,
            entity: None,
            confidence: 0.0,
            proposal: DispatchProposal::undetermined(),
            processing_time_us: 0,
            timestamp: Utc::now(),
        }
    }

    /// Whether the default threshold is cleared
    pub fn is_confident(&self) -> bool {
        confidence::is_confident(self.confidence, CONFIDENCE_THRESHOLD)
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Topic: {} / {:?}, Operation: {:?}, Entity: {}, Confidence: {:.0}%, Proposal: {}::{:?} ({})",
            self.topic,
            self.subtopic,
            self.operation,
            self.entity.as_ref().map_or("-", EntityMatch::text),
            self.confidence * 100.0,
            self.proposal.module,
            self.proposal.function,
            self.proposal.rule,
        )
    }
}
