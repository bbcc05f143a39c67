//! Topic, subtopic and operation classification by keyword scoring.
//!
//! Matching is plain substring containment on the normalized query, so a
//! keyword may hit inside a longer word. No tokenizer, no model.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::keywords::{KeywordTable, KeywordTables};

/// Top-level subject area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Algebra,
    Geometry,
    Trigonometry,
    Calculus,
    Combinatorics,
    Undetermined,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Algebra => "algebra",
            Topic::Geometry => "geometry",
            Topic::Trigonometry => "trigonometry",
            Topic::Calculus => "calculus",
            Topic::Combinatorics => "combinatorics",
            Topic::Undetermined => "undetermined",
        }
    }

    pub fn is_determined(&self) -> bool {
        *self != Topic::Undetermined
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Operation family inside a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subtopic {
    // Algebra
    Quadratic,
    Factoring,
    // Geometry
    Triangle,
    Quadrilateral,
    Circle,
    AreaCalculation,
    PerimeterCalculation,
    VolumeCalculation,
    CoordinateGeometry,
    // Trigonometry
    TrigFunction,
    InverseTrigFunction,
    AngleConversion,
    TrigEquation,
    TrigExpression,
    MixedTrigEquation,
    TrigCalculus,
    // Calculus
    Derivative,
    Integral,
    Limit,
    // Combinatorics
    Factorial,
    Permutation,
    Combination,
    BasicProbability,
    BinomialDistribution,
    Undetermined,
}

impl Subtopic {
    pub fn is_determined(&self) -> bool {
        *self != Subtopic::Undetermined
    }
}

/// What the user asks to be done, independent of topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Solve,
    Factor,
    Plot,
    TrigEvaluate,
    GeometryCalc,
    InverseTrig,
    AngleConvert,
    TrigExpression,
    Derivative,
    Integral,
    Factorial,
    Permutation,
    Combination,
    Probability,
    Undetermined,
}

impl Operation {
    pub fn is_determined(&self) -> bool {
        *self != Operation::Undetermined
    }
}

/// Result of one scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification<K> {
    /// Winning label, or the undetermined sentinel
    pub label: K,
    /// Number of keywords of the winner found in the text
    pub hits: usize,
    /// True when a priority marker decided the label without scoring
    pub priority: bool,
}

impl<K> Classification<K> {
    fn scored(label: K, hits: usize) -> Self {
        Self {
            label,
            hits,
            priority: false,
        }
    }

    fn forced(label: K, hits: usize) -> Self {
        Self {
            label,
            hits,
            priority: true,
        }
    }
}

// `P(` / `C(` call syntax, not the tail of a longer word
static CALL_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^a-z0-9])([pc])\s*\(").expect("Invalid regex: P(/C( call syntax")
});

/// Score `text` against every entry of `table`.
///
/// The strictly greatest hit count wins; ties keep the earliest entry. A best
/// count of zero yields `undetermined`.
pub fn classify<K: Copy + PartialEq>(
    text: &str,
    table: &KeywordTable<K>,
    undetermined: K,
) -> Classification<K> {
    let mut best = Classification::scored(undetermined, 0);

    for (label, keywords) in table.entries() {
        let hits = keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count();

        if hits > best.hits {
            best = Classification::scored(*label, hits);
        }
    }

    best
}

fn call_syntax(text: &str, letter: &str) -> bool {
    CALL_SYNTAX
        .captures_iter(text)
        .any(|caps| caps.get(1).is_some_and(|m| m.as_str() == letter))
}

fn count_markers(text: &str, markers: &[String]) -> usize {
    markers.iter().filter(|m| text.contains(m.as_str())).count()
}

/// Keyword classifier over the process-wide tables.
#[derive(Debug, Clone, Copy)]
pub struct QueryClassifier {
    tables: &'static KeywordTables,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier {
    pub fn new() -> Self {
        Self::with_tables(KeywordTables::standard())
    }

    pub fn with_tables(tables: &'static KeywordTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'static KeywordTables {
        self.tables
    }

    /// Detect the topic of a normalized query.
    ///
    /// Calculus markers win over everything, then combinatorics markers, then
    /// generic scoring.
    pub fn classify_topic(&self, text: &str) -> Classification<Topic> {
        let calculus = count_markers(text, self.tables.calculus_priority());
        if calculus > 0 {
            return Classification::forced(Topic::Calculus, calculus);
        }

        let mut combinatorics = count_markers(text, self.tables.combinatorics_priority());
        if call_syntax(text, "p") || call_syntax(text, "c") {
            combinatorics += 1;
        }
        if combinatorics > 0 {
            return Classification::forced(Topic::Combinatorics, combinatorics);
        }

        classify(text, self.tables.topics(), Topic::Undetermined)
    }

    /// Detect the subtopic within an already chosen topic.
    pub fn classify_subtopic(&self, text: &str, topic: Topic) -> Classification<Subtopic> {
        match self.tables.subtopics(topic) {
            Some(table) => classify(text, table, Subtopic::Undetermined),
            None => Classification::scored(Subtopic::Undetermined, 0),
        }
    }

    /// Detect the requested operation.
    pub fn classify_operation(&self, text: &str) -> Classification<Operation> {
        if text.contains("integral") || text.contains('∫') {
            return Classification::forced(Operation::Integral, 1);
        }
        if text.contains("turev") || text.contains("d/dx") {
            return Classification::forced(Operation::Derivative, 1);
        }
        if text.contains('!') {
            return Classification::forced(Operation::Factorial, 1);
        }
        if call_syntax(text, "p") {
            return Classification::forced(Operation::Permutation, 1);
        }
        if call_syntax(text, "c") {
            return Classification::forced(Operation::Combination, 1);
        }

        classify(text, self.tables.operations(), Operation::Undetermined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::normalize::normalize;

    fn topic_of(query: &str) -> Topic {
        QueryClassifier::new().classify_topic(&normalize(query)).label
    }

    #[test]
    fn test_topic_detection() {
        assert_eq!(topic_of("x² - 5x + 6 = 0 denkleminin köklerini bul"), Topic::Algebra);
        assert_eq!(topic_of("sin(30) hesapla"), Topic::Trigonometry);
        assert_eq!(topic_of("dik üçgenin hipotenüsünü bul"), Topic::Geometry);
        assert_eq!(topic_of("bugün hava çok güzel"), Topic::Undetermined);
    }

    #[test]
    fn test_calculus_priority() {
        let result = QueryClassifier::new().classify_topic(&normalize("sin(x) integralini hesapla"));
        assert_eq!(result.label, Topic::Calculus);
        assert!(result.priority);
        assert_eq!(topic_of("x² türevini al"), Topic::Calculus);
    }

    #[test]
    fn test_combinatorics_priority() {
        assert_eq!(topic_of("5! hesapla"), Topic::Combinatorics);
        assert_eq!(topic_of("C(10,3) kombinasyonu"), Topic::Combinatorics);
        assert_eq!(topic_of("P(5,2) hesapla"), Topic::Combinatorics);
    }

    #[test]
    fn test_call_syntax_needs_word_start() {
        assert!(call_syntax("p(5,2)", "p"));
        assert!(call_syntax("hesapla c(10,3)", "c"));
        assert!(!call_syntax("arccos(0.5)", "c"));
        assert!(!call_syntax("tip(3)", "p"));
    }

    const TIED: &[(Topic, &[&str])] = &[(Topic::Algebra, &["a"]), (Topic::Geometry, &["b"])];
    const SINGLE: &[(Topic, &[&str])] = &[(Topic::Algebra, &["denklem"])];

    #[test]
    fn test_tie_keeps_first_entry() {
        let table = KeywordTable::new(TIED);
        let result = classify("a b", &table, Topic::Undetermined);
        assert_eq!(result.label, Topic::Algebra);
        assert_eq!(result.hits, 1);
    }

    #[test]
    fn test_zero_hits_is_undetermined() {
        let table = KeywordTable::new(SINGLE);
        let result = classify("hava", &table, Topic::Undetermined);
        assert_eq!(result.label, Topic::Undetermined);
        assert_eq!(result.hits, 0);
    }

    #[test]
    fn test_subtopic_scoped_to_topic() {
        let classifier = QueryClassifier::new();
        let text = normalize("çarpanlara ayır: x² - 9");
        assert_eq!(
            classifier.classify_subtopic(&text, Topic::Algebra).label,
            Subtopic::Factoring
        );
        assert_eq!(
            classifier.classify_subtopic(&text, Topic::Undetermined).label,
            Subtopic::Undetermined
        );
    }

    #[test]
    fn test_operation_shortcuts() {
        let classifier = QueryClassifier::new();
        let op = |q: &str| classifier.classify_operation(&normalize(q)).label;
        assert_eq!(op("sin(x) integralini al"), Operation::Integral);
        assert_eq!(op("x² türevini al"), Operation::Derivative);
        assert_eq!(op("5! hesapla"), Operation::Factorial);
        assert_eq!(op("P(5,2) hesapla"), Operation::Permutation);
        assert_eq!(op("C(10,3) hesapla"), Operation::Combination);
    }

    #[test]
    fn test_operation_scoring() {
        let classifier = QueryClassifier::new();
        let op = |q: &str| classifier.classify_operation(&normalize(q)).label;
        assert_eq!(op("x² - 9 çarpanlarına ayır"), Operation::Factor);
        assert_eq!(op("x² - 5x + 6 = 0 köklerini bul"), Operation::Solve);
        assert_eq!(op("bugün hava çok güzel"), Operation::Undetermined);
    }
}
