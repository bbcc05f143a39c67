//! Static keyword tables for topic, subtopic and operation scoring.
//!
//! Tables are written in plain Turkish and folded with [`normalize`] once,
//! when the process-wide [`KeywordTables`] singleton is first touched.
//! Declaration order matters: on a scoring tie the earliest entry wins.

use std::sync::LazyLock;

use super::classifier::{Operation, Subtopic, Topic};
use super::normalize::normalize;

/// Topic keywords, in tie-break order.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Algebra,
        &[
            "cebir", "denklem", "kök", "çarpan", "polinom", "faktör", "çöz", "=", "x²", "x^2",
            "kuadratik",
        ],
    ),
    (
        Topic::Geometry,
        &[
            "geometri",
            "üçgen",
            "kare",
            "daire",
            "alan",
            "çevre",
            "hacim",
            "pisagor",
            "pitagor",
            "hipotenüs",
            "kenar",
            "kosinüs kuralı",
            "cosinus",
            "sinus kuralı",
            "dikdörtgen",
            "küp",
            "silindir",
            "küre",
            "üçüncü kenar",
            "dik üçgen",
            "yay",
            "kesit",
            "koordinat",
        ],
    ),
    (
        Topic::Trigonometry,
        &[
            "trigonometri", "sinüs", "kosinüs", "tanjant", "açı", "sin", "cos", "tan", "arcsin",
            "arccos", "arctan", "derece", "radyan",
        ],
    ),
    (
        Topic::Calculus,
        &["analiz", "türev", "integral", "limit", "sürekli"],
    ),
    (
        Topic::Combinatorics,
        &["olasılık", "istatistik", "dağılım", "ortalama", "varyans"],
    ),
];

const ALGEBRA_SUBTOPICS: &[(Subtopic, &[&str])] = &[
    (
        Subtopic::Quadratic,
        &["ikinci dereceden", "kuadratik", "x²", "x^2", "kök bul"],
    ),
    (
        Subtopic::Factoring,
        &["çarpan", "faktör", "çarpanlara ayır", "faktörel"],
    ),
];

const GEOMETRY_SUBTOPICS: &[(Subtopic, &[&str])] = &[
    (
        Subtopic::Triangle,
        &[
            "üçgen",
            "pisagor",
            "pitagor",
            "hipotenüs",
            "dik üçgen",
            "üçüncü kenar",
            "kosinüs kuralı",
            "sinus kuralı",
        ],
    ),
    (
        Subtopic::Quadrilateral,
        &["kare", "dikdörtgen", "yamuk", "paralelkenar", "eşkenar dörtgen"],
    ),
    (
        Subtopic::Circle,
        &["daire", "çember", "yay", "kesit", "yarıçap", "çap"],
    ),
    (Subtopic::AreaCalculation, &["alan", "yüzey", "m²", "metrekare"]),
    (Subtopic::PerimeterCalculation, &["çevre", "kenar", "uzunluk"]),
    (
        Subtopic::VolumeCalculation,
        &["hacim", "küp", "silindir", "küre", "prizma", "piramit", "m³"],
    ),
    (
        Subtopic::CoordinateGeometry,
        &["koordinat", "nokta", "doğru", "eğim", "mesafe"],
    ),
];

const TRIGONOMETRY_SUBTOPICS: &[(Subtopic, &[&str])] = &[
    (
        Subtopic::TrigFunction,
        &["sin", "cos", "tan", "sinüs", "kosinüs", "tanjant"],
    ),
    (
        Subtopic::InverseTrigFunction,
        &["arcsin", "arccos", "arctan", "ters"],
    ),
    (
        Subtopic::AngleConversion,
        &["derece", "radyan", "dönüştür", "çevir"],
    ),
    (
        Subtopic::TrigEquation,
        &["denklem", "çöz", "=", "sin(x)", "cos(x)", "tan(x)"],
    ),
    (
        Subtopic::TrigExpression,
        &["hesapla", "+", "-", "*", "/", "toplam", "fark"],
    ),
    (
        Subtopic::MixedTrigEquation,
        &["sin(x)", "cos(x)", "tan(x)", "ise", "x hesapla"],
    ),
    (Subtopic::TrigCalculus, &["türev", "integral", "d/dx", "∫"]),
];

const CALCULUS_SUBTOPICS: &[(Subtopic, &[&str])] = &[
    (
        Subtopic::Derivative,
        &["türev", "diferansiyel", "d/dx", "türevini al"],
    ),
    (
        Subtopic::Integral,
        &["integral", "∫", "integrali", "belirsiz", "belirli"],
    ),
    (Subtopic::Limit, &["limit", "yaklaşır", "sonsuza", "∞"]),
];

const COMBINATORICS_SUBTOPICS: &[(Subtopic, &[&str])] = &[
    (Subtopic::Factorial, &["faktöriyel", "n!", "!"]),
    (
        Subtopic::Permutation,
        &["permutasyon", "düzenleme", "P(", "sıralama"],
    ),
    (Subtopic::Combination, &["kombinasyon", "seçim", "C(", "choose"]),
    (
        Subtopic::BasicProbability,
        &["olasılık", "şans", "ihtimal", "/"],
    ),
    (
        Subtopic::BinomialDistribution,
        &["binom", "dağılım", "deneme", "başarı"],
    ),
];

/// Operation keywords, in tie-break order.
const OPERATION_KEYWORDS: &[(Operation, &[&str])] = &[
    (Operation::Solve, &["çöz", "bul", "hesapla", "kök", "sonuç"]),
    (Operation::Factor, &["çarpan", "faktör", "ayır"]),
    (Operation::Plot, &["çiz", "grafik", "görselleştir"]),
    (
        Operation::TrigEvaluate,
        &["hesapla", "değer", "sin", "cos", "tan"],
    ),
    // Side and rule words are geometry operations too, not just the
    // measure words, so `hipotenüs` or `kosinüs kuralı` queries score one.
    (
        Operation::GeometryCalc,
        &[
            "alan",
            "çevre",
            "hacim",
            "kenar",
            "hipotenüs",
            "üçüncü kenar",
            "pisagor",
            "kosinüs kuralı",
        ],
    ),
    (Operation::InverseTrig, &["arcsin", "arccos", "arctan", "ters"]),
    (
        Operation::AngleConvert,
        &["dönüştür", "çevir", "derece", "radyan"],
    ),
    (
        Operation::TrigExpression,
        &["hesapla", "+", "-", "toplam", "fark", "ifade"],
    ),
    (
        Operation::Derivative,
        &["türev", "türevini", "d/dx", "diferansiyel"],
    ),
    (
        Operation::Integral,
        &["integral", "integrali", "∫", "belirsiz", "belirli"],
    ),
    (Operation::Factorial, &["faktöriyel", "n!", "!"]),
    (
        Operation::Permutation,
        &["permutasyon", "düzenleme", "P(", "sıralama"],
    ),
    (
        Operation::Combination,
        &["kombinasyon", "seçim", "C(", "choose"],
    ),
    (Operation::Probability, &["olasılık", "şans", "ihtimal"]),
];

/// Markers that force the calculus topic before any scoring.
pub const CALCULUS_PRIORITY: &[&str] = &["türev", "türevini", "integral", "integralini", "d/dx", "∫"];

/// Markers that force the combinatorics topic (after calculus). `P(`/`C(`
/// call syntax is matched separately, see the classifier.
pub const COMBINATORICS_PRIORITY: &[&str] = &["faktöriyel", "!", "permutasyon", "kombinasyon"];

/// An ordered mapping from a label to its folded keyword strings.
#[derive(Debug, Clone)]
pub struct KeywordTable<K> {
    entries: Vec<(K, Vec<String>)>,
}

impl<K: Copy + PartialEq> KeywordTable<K> {
    /// Build a table, folding every keyword the same way queries are folded.
    pub fn new(raw: &[(K, &[&str])]) -> Self {
        let entries = raw
            .iter()
            .map(|(label, words)| (*label, words.iter().map(|w| normalize(w)).collect()))
            .collect();

        Self { entries }
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[(K, Vec<String>)] {
        &self.entries
    }

    /// Keywords registered for a label.
    pub fn keywords(&self, label: K) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, words)| words.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All keyword tables used by the classifier.
#[derive(Debug)]
pub struct KeywordTables {
    topics: KeywordTable<Topic>,
    subtopics: Vec<(Topic, KeywordTable<Subtopic>)>,
    operations: KeywordTable<Operation>,
    calculus_priority: Vec<String>,
    combinatorics_priority: Vec<String>,
}

static STANDARD_TABLES: LazyLock<KeywordTables> = LazyLock::new(KeywordTables::build);

impl KeywordTables {
    /// The process-wide, read-only tables.
    pub fn standard() -> &'static KeywordTables {
        &STANDARD_TABLES
    }

    fn build() -> Self {
        Self {
            topics: KeywordTable::new(TOPIC_KEYWORDS),
            subtopics: vec![
                (Topic::Algebra, KeywordTable::new(ALGEBRA_SUBTOPICS)),
                (Topic::Geometry, KeywordTable::new(GEOMETRY_SUBTOPICS)),
                (Topic::Trigonometry, KeywordTable::new(TRIGONOMETRY_SUBTOPICS)),
                (Topic::Calculus, KeywordTable::new(CALCULUS_SUBTOPICS)),
                (Topic::Combinatorics, KeywordTable::new(COMBINATORICS_SUBTOPICS)),
            ],
            operations: KeywordTable::new(OPERATION_KEYWORDS),
            calculus_priority: CALCULUS_PRIORITY.iter().map(|w| normalize(w)).collect(),
            combinatorics_priority: COMBINATORICS_PRIORITY
                .iter()
                .map(|w| normalize(w))
                .collect(),
        }
    }

    pub fn topics(&self) -> &KeywordTable<Topic> {
        &self.topics
    }

    /// Subtopic table scoped to a topic. `None` for [`Topic::Undetermined`].
    pub fn subtopics(&self, topic: Topic) -> Option<&KeywordTable<Subtopic>> {
        self.subtopics
            .iter()
            .find(|(t, _)| *t == topic)
            .map(|(_, table)| table)
    }

    pub fn operations(&self) -> &KeywordTable<Operation> {
        &self.operations
    }

    pub fn calculus_priority(&self) -> &[String] {
        &self.calculus_priority
    }

    pub fn combinatorics_priority(&self) -> &[String] {
        &self.combinatorics_priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_folded() {
        let tables = KeywordTables::standard();
        let algebra = tables.topics().keywords(Topic::Algebra).unwrap();
        assert!(algebra.iter().any(|k| k == "carpan"));
        assert!(algebra.iter().any(|k| k == "coz"));
        assert!(!algebra.iter().any(|k| k.contains('ç')));
    }

    #[test]
    fn test_topic_order_is_declaration_order() {
        let labels: Vec<Topic> = KeywordTables::standard()
            .topics()
            .entries()
            .iter()
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(
            labels,
            vec![
                Topic::Algebra,
                Topic::Geometry,
                Topic::Trigonometry,
                Topic::Calculus,
                Topic::Combinatorics
            ]
        );
    }

    #[test]
    fn test_every_topic_has_subtopics() {
        let tables = KeywordTables::standard();
        for (topic, _) in tables.topics().entries() {
            let subtopics = tables.subtopics(*topic).unwrap();
            assert!(!subtopics.is_empty(), "no subtopics for {:?}", topic);
        }
        assert!(tables.subtopics(Topic::Undetermined).is_none());
    }

    #[test]
    fn test_call_syntax_keywords_lowercased() {
        let ops = KeywordTables::standard().operations();
        let perm = ops.keywords(Operation::Permutation).unwrap();
        assert!(perm.iter().any(|k| k == "p("));
    }

    #[test]
    fn test_priority_markers() {
        let tables = KeywordTables::standard();
        assert!(tables.calculus_priority().iter().any(|k| k == "turev"));
        assert!(tables.combinatorics_priority().iter().any(|k| k == "faktoriyel"));
    }
}
