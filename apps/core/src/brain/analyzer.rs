//! Brain Analyzer - Main orchestrator for the brain module.
//!
//! Runs the pipeline in a fixed order: normalize, extract the entity,
//! classify topic, subtopic and operation, score confidence, then build the
//! dispatch proposal. Each stage only reads what earlier stages produced.

use chrono::Utc;
use std::time::Instant;
use tracing::debug;

use super::analysis::QueryAnalysis;
use super::classifier::QueryClassifier;
use super::confidence;
use super::entity::EntityExtractor;
use super::normalize::normalize;
use super::proposal::{ProposalBuilder, RuleContext};

/// Main brain analyzer that orchestrates all analysis components
#[derive(Debug, Clone, Copy)]
pub struct BrainAnalyzer {
    extractor: EntityExtractor,
    classifier: QueryClassifier,
    proposals: ProposalBuilder,
}

impl Default for BrainAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BrainAnalyzer {
    /// Create a new analyzer over the standard keyword tables
    pub fn new() -> Self {
        Self {
            extractor: EntityExtractor::new(),
            classifier: QueryClassifier::new(),
            proposals: ProposalBuilder::new(),
        }
    }

    /// Analyze a query and produce its full analysis
    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        let start = Instant::now();

        let mut analysis = QueryAnalysis::new(query.to_string());
        analysis.normalized = normalize(query);
        let text = analysis.normalized.as_str();

        // 1. Entity
        analysis.entity = self.extractor.extract(text);

        // 2-4. Topic, subtopic, operation
        let topic = self.classifier.classify_topic(text);
        let subtopic = self.classifier.classify_subtopic(text, topic.label);
        let operation = self.classifier.classify_operation(text);
        debug!(
            topic = %topic.label,
            topic_hits = topic.hits,
            topic_priority = topic.priority,
            subtopic = ?subtopic.label,
            operation = ?operation.label,
            "Query classified"
        );
        analysis.topic = topic.label;
        analysis.subtopic = subtopic.label;
        analysis.operation = operation.label;

        // 5. Confidence
        analysis.confidence = confidence::score(
            analysis.topic,
            analysis.subtopic,
            analysis.operation,
            analysis.entity.is_some(),
        );

        // 6. Proposal
        let context = RuleContext {
            normalized: &analysis.normalized,
            topic: analysis.topic,
            subtopic: analysis.subtopic,
            operation: analysis.operation,
            entity: analysis.entity.as_ref(),
        };
        let proposal = self.proposals.build(&context);
        analysis.proposal = proposal;

        analysis.processing_time_us = start.elapsed().as_micros() as u64;
        analysis.timestamp = Utc::now();

        debug!("{}", analysis.summary());
        analysis
    }
}
