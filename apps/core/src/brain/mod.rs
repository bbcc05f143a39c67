//! # Brain Module
//!
//! Rule-based analysis of Turkish math questions. No model, no grammar:
//! keyword tables and regular expressions only.
//!
//! ## Components
//! - `normalize`: lower-casing and diacritic folding
//! - `keywords`: static keyword tables
//! - `entity`: equation/expression extraction
//! - `classifier`: topic, subtopic and operation scoring
//! - `confidence`: confidence scoring
//! - `params`: parameter values and extractors
//! - `proposal`: ordered dispatch rules
//! - `analysis`: output data structure
//! - `analyzer`: main orchestrator

pub mod analysis;
pub mod analyzer;
pub mod classifier;
pub mod confidence;
pub mod entity;
pub mod keywords;
pub mod normalize;
pub mod params;
pub mod proposal;

// Re-export main types for convenience
pub use analysis::QueryAnalysis;
pub use analyzer::BrainAnalyzer;
pub use classifier::{Classification, Operation, QueryClassifier, Subtopic, Topic};
pub use confidence::CONFIDENCE_THRESHOLD;
pub use entity::{EntityExtractor, EntityMatch};
pub use keywords::{KeywordTable, KeywordTables};
pub use normalize::normalize;
pub use params::{AngleConversion, AngleUnit, ParamMap, ParamValue};
pub use proposal::{
    DispatchProposal, DispatchRule, Function, Module, ProposalBuilder, RuleContext, RULES,
};
