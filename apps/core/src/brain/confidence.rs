//! Confidence scoring for a classified query.
//!
//! Weights are kept in tenths so the sum is exact: 0.3 + 0.3 + 0.2 + 0.2.

use super::classifier::{Operation, Subtopic, Topic};

/// Minimum confidence below which a query is sent back for clarification.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

const TOPIC_WEIGHT: u8 = 3;
const SUBTOPIC_WEIGHT: u8 = 3;
const OPERATION_WEIGHT: u8 = 2;
const ENTITY_WEIGHT: u8 = 2;
const MAX_TENTHS: u8 = 10;

/// Score in `[0.0, 1.0]` from which classification stages succeeded.
pub fn score(topic: Topic, subtopic: Subtopic, operation: Operation, entity_found: bool) -> f32 {
    let mut tenths = 0u8;

    if topic.is_determined() {
        tenths += TOPIC_WEIGHT;
    }
    if subtopic.is_determined() {
        tenths += SUBTOPIC_WEIGHT;
    }
    if operation.is_determined() {
        tenths += OPERATION_WEIGHT;
    }
    if entity_found {
        tenths += ENTITY_WEIGHT;
    }

    f32::from(tenths.min(MAX_TENTHS)) / 10.0
}

/// Whether `confidence` clears `threshold`.
pub fn is_confident(confidence: f32, threshold: f32) -> bool {
    confidence >= threshold
}
