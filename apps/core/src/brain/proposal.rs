//! Dispatch proposals: which solver module and function should handle a
//! query, and with which literal parameters.
//!
//! Rules are tried in a fixed order and the first one that commits wins.
//! Overlaps between rules are resolved by that order alone.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use super::classifier::{Operation, Subtopic, Topic};
use super::entity::{trig_token_count, EntityMatch};
use super::params::{geometry_params, ParamMap, ParamValue};

/// Solver module a proposal is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Algebra,
    Trigonometry,
    Calculus,
    Combinatorics,
    Geometry,
    Undetermined,
}

impl Module {
    pub fn label(&self) -> &'static str {
        match self {
            Module::Algebra => "algebra",
            Module::Trigonometry => "trigonometry",
            Module::Calculus => "calculus",
            Module::Combinatorics => "combinatorics",
            Module::Geometry => "geometry",
            Module::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Function inside a solver module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Function {
    // Algebra
    QuadraticSolve,
    Factor,
    // Trigonometry
    TrigEvaluate,
    InverseTrigEvaluate,
    AngleConvert,
    TrigEquationSolve,
    TrigExpressionEvaluate,
    MixedTrigEquationSolve,
    // Calculus
    Derivative,
    Integral,
    // Combinatorics
    Factorial,
    Permutation,
    Combination,
    // Geometry
    TriangleArea,
    TrianglePerimeter,
    TriangleThirdSide,
    TrianglePythagorean,
    TriangleCosineRule,
    TriangleSineRule,
    SquareArea,
    SquarePerimeter,
    RectangleArea,
    RectanglePerimeter,
    CircleArea,
    CirclePerimeter,
    GeometryUndetermined,
    Undetermined,
}

impl Function {
    /// The module this function belongs to.
    pub fn module(&self) -> Module {
        use Function::*;
        match self {
            QuadraticSolve | Factor => Module::Algebra,
            TrigEvaluate
            | InverseTrigEvaluate
            | AngleConvert
            | TrigEquationSolve
            | TrigExpressionEvaluate
            | MixedTrigEquationSolve => Module::Trigonometry,
            Derivative | Integral => Module::Calculus,
            Factorial | Permutation | Combination => Module::Combinatorics,
            TriangleArea
            | TrianglePerimeter
            | TriangleThirdSide
            | TrianglePythagorean
            | TriangleCosineRule
            | TriangleSineRule
            | SquareArea
            | SquarePerimeter
            | RectangleArea
            | RectanglePerimeter
            | CircleArea
            | CirclePerimeter
            | GeometryUndetermined => Module::Geometry,
            Undetermined => Module::Undetermined,
        }
    }
}

/// Proposed routing for one query. Never modified once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchProposal {
    pub module: Module,
    pub function: Function,
    pub parameters: ParamMap,
    /// Short Turkish description of what will be computed
    pub rationale: String,
    /// Name of the rule that produced this proposal
    pub rule: String,
}

impl DispatchProposal {
    pub fn new(function: Function, rationale: &str) -> Self {
        Self {
            module: function.module(),
            function,
            parameters: ParamMap::new(),
            rationale: rationale.to_string(),
            rule: String::new(),
        }
    }

    pub fn undetermined() -> Self {
        Self::new(Function::Undetermined, "Sorgu anlaşılamadı")
    }

    pub fn with_param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }

    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.parameters.extend(params);
        self
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn is_undetermined(&self) -> bool {
        self.module == Module::Undetermined
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub normalized: &'a str,
    pub topic: Topic,
    pub subtopic: Subtopic,
    pub operation: Operation,
    pub entity: Option<&'a EntityMatch>,
}

impl RuleContext<'_> {
    fn entity_contains(&self, needle: &str) -> bool {
        self.entity.is_some_and(|e| e.contains(needle))
    }
}

/// A named rule that either commits to a proposal or falls through.
#[derive(Clone, Copy)]
pub struct DispatchRule {
    pub name: &'static str,
    pub apply: fn(&RuleContext<'_>) -> Option<DispatchProposal>,
}

impl fmt::Debug for DispatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRule").field("name", &self.name).finish()
    }
}

/// The rule list, in evaluation order.
pub static RULES: &[DispatchRule] = &[
    DispatchRule {
        name: "calculus",
        apply: calculus_rule,
    },
    DispatchRule {
        name: "combinatorics",
        apply: combinatorics_rule,
    },
    DispatchRule {
        name: "mixed_trig_equation",
        apply: mixed_trig_equation_rule,
    },
    DispatchRule {
        name: "trig_equation",
        apply: trig_equation_rule,
    },
    DispatchRule {
        name: "trigonometry",
        apply: trigonometry_rule,
    },
    DispatchRule {
        name: "algebra",
        apply: algebra_rule,
    },
    DispatchRule {
        name: "geometry",
        apply: geometry_rule,
    },
    DispatchRule {
        name: "fallback",
        apply: fallback_rule,
    },
];

const SIMPLE_EQUATION_TOKENS: &[&str] = &["sin(x)", "cos(x)", "tan(x)", "sinx", "cosx", "tanx"];
const INVERSE_NAMES: &[&str] = &["arcsin", "arccos", "arctan"];
const CONVERSION_CUES: &[&str] = &["derece", "radyan", "donustur", "cevir"];
const FACTORING_CUES: &[&str] = &["carpan", "faktor"];

static MIXED_PAIRS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?:sin|cos|tan)\s*\(\s*x\s*\)\s*[+\-]\s*(?:sin|cos|tan)\s*\(\s*\d+\s*\)")
            .expect("Invalid regex: variable-first mixed pair"),
        Regex::new(r"(?:sin|cos|tan)\s*\(\s*\d+\s*\)\s*[+\-]\s*(?:sin|cos|tan)\s*\(\s*x\s*\)")
            .expect("Invalid regex: constant-first mixed pair"),
    ]
});

// Most specific phrase first; `\w*` lets possessive suffixes through
// (`ucgenin alani`, `dairenin cevresi`).
static GEOMETRY_PHRASES: LazyLock<Vec<(Regex, Function)>> = LazyLock::new(|| {
    let table: &[(&str, Function)] = &[
        (r"(?:kosinus|cosinus) kurali", Function::TriangleCosineRule),
        (r"sinus kurali", Function::TriangleSineRule),
        (r"ucuncu kenar|3\. kenar", Function::TriangleThirdSide),
        (r"pisagor|pitagor|hipotenus", Function::TrianglePythagorean),
        (r"\bucgen\w*\s+alan", Function::TriangleArea),
        (r"\bucgen\w*\s+cevre", Function::TrianglePerimeter),
        (r"\bdikdortgen\w*\s+alan", Function::RectangleArea),
        (r"\bdikdortgen\w*\s+cevre", Function::RectanglePerimeter),
        (r"\bkare\w*\s+alan", Function::SquareArea),
        (r"\bkare\w*\s+cevre", Function::SquarePerimeter),
        (r"\b(?:daire|cember)\w*\s+alan", Function::CircleArea),
        (r"\b(?:daire|cember)\w*\s+cevre", Function::CirclePerimeter),
    ];
    table
        .iter()
        .map(|(pattern, function)| {
            let regex = Regex::new(pattern)
                .unwrap_or_else(|e| panic!("Invalid regex: geometry phrase {}: {}", pattern, e));
            (regex, *function)
        })
        .collect()
});

fn is_mixed_equation(entity: &EntityMatch) -> bool {
    entity.contains("=") && MIXED_PAIRS.iter().any(|p| p.is_match(entity.text()))
}

fn is_simple_equation(entity: &EntityMatch) -> bool {
    entity.contains("=") && SIMPLE_EQUATION_TOKENS.iter().any(|t| entity.contains(t))
}

fn mixed_equation(entity: &EntityMatch) -> DispatchProposal {
    DispatchProposal::new(
        Function::MixedTrigEquationSolve,
        "Karma trigonometrik denklem çözülecek",
    )
    .with_param("equation", entity.clone())
}

fn simple_equation(entity: &EntityMatch) -> DispatchProposal {
    DispatchProposal::new(Function::TrigEquationSolve, "Trigonometrik denklem çözülecek")
        .with_param("equation", entity.clone())
}

fn calculus_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    let applies = ctx.topic == Topic::Calculus
        || matches!(ctx.operation, Operation::Integral | Operation::Derivative);
    if !applies {
        return None;
    }

    let integral = ctx.operation == Operation::Integral
        || ctx.normalized.contains("integral")
        || ctx.normalized.contains('∫')
        || (ctx.operation != Operation::Derivative && ctx.subtopic == Subtopic::Integral);

    Some(if integral {
        DispatchProposal::new(Function::Integral, "Fonksiyonun integrali hesaplanacak")
    } else {
        DispatchProposal::new(Function::Derivative, "Fonksiyonun türevi hesaplanacak")
    })
}

fn combinatorics_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    let applies = ctx.topic == Topic::Combinatorics
        || matches!(
            ctx.operation,
            Operation::Factorial | Operation::Permutation | Operation::Combination
        )
        || ["!", "p(", "c("].iter().any(|m| ctx.entity_contains(m));
    if !applies {
        return None;
    }

    if ctx.operation == Operation::Factorial
        || ctx.subtopic == Subtopic::Factorial
        || ctx.entity_contains("!")
    {
        Some(DispatchProposal::new(Function::Factorial, "Faktöriyel hesaplanacak"))
    } else if ctx.operation == Operation::Permutation
        || ctx.subtopic == Subtopic::Permutation
        || ctx.entity_contains("p(")
    {
        Some(DispatchProposal::new(Function::Permutation, "Permutasyon hesaplanacak"))
    } else if ctx.operation == Operation::Combination
        || ctx.subtopic == Subtopic::Combination
        || ctx.entity_contains("c(")
    {
        Some(DispatchProposal::new(Function::Combination, "Kombinasyon hesaplanacak"))
    } else {
        None
    }
}

fn mixed_trig_equation_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    ctx.entity
        .filter(|e| is_mixed_equation(e))
        .map(mixed_equation)
}

fn trig_equation_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    ctx.entity
        .filter(|e| is_simple_equation(e))
        .map(simple_equation)
}

fn trigonometry_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    let entity = ctx.entity?;
    if ctx.topic != Topic::Trigonometry {
        return None;
    }

    if is_mixed_equation(entity) {
        return Some(mixed_equation(entity));
    }
    if is_simple_equation(entity) {
        return Some(simple_equation(entity));
    }

    let proposal = if trig_token_count(entity.text()) > 1 && !entity.contains("=") {
        DispatchProposal::new(
            Function::TrigExpressionEvaluate,
            "Karmaşık trigonometrik ifade hesaplanacak",
        )
    } else if ctx.subtopic == Subtopic::InverseTrigFunction
        || INVERSE_NAMES.iter().any(|n| entity.contains(n))
    {
        DispatchProposal::new(
            Function::InverseTrigEvaluate,
            "Ters trigonometrik fonksiyon hesaplanacak",
        )
    } else if ctx.subtopic == Subtopic::AngleConversion
        || CONVERSION_CUES.iter().any(|c| entity.contains(c))
    {
        DispatchProposal::new(Function::AngleConvert, "Açı birim dönüşümü yapılacak")
    } else {
        DispatchProposal::new(Function::TrigEvaluate, "Trigonometrik fonksiyon hesaplanacak")
    };

    Some(proposal.with_param("expression", entity.clone()))
}

fn algebra_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    let entity = ctx.entity?;
    if ctx.topic != Topic::Algebra {
        return None;
    }

    if ctx.operation == Operation::Factor
        || FACTORING_CUES.iter().any(|c| ctx.normalized.contains(c))
    {
        Some(
            DispatchProposal::new(Function::Factor, "İfade çarpanlarına ayrılacak")
                .with_param("expression", entity.clone()),
        )
    } else if entity.contains("=") || ctx.operation == Operation::Solve {
        Some(
            DispatchProposal::new(Function::QuadraticSolve, "İkinci dereceden denklem çözülecek")
                .with_param("equation", entity.clone()),
        )
    } else {
        None
    }
}

/// Geometry function for a normalized query, by phrase then by fallback cue.
pub fn geometry_function(text: &str) -> Function {
    if let Some((_, function)) = GEOMETRY_PHRASES.iter().find(|(p, _)| p.is_match(text)) {
        return *function;
    }

    if text.contains("dik ucgen") {
        Function::TrianglePythagorean
    } else if text.contains("ucgen") || text.contains("alan") {
        Function::TriangleArea
    } else {
        Function::GeometryUndetermined
    }
}

fn geometry_rule(ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    if ctx.topic != Topic::Geometry && ctx.operation != Operation::GeometryCalc {
        return None;
    }

    let function = geometry_function(ctx.normalized);
    let rationale = match function {
        Function::GeometryUndetermined => "Geometri hesaplama yapılacak",
        Function::TrianglePythagorean => "Pisagor teoremi ile hipotenüs hesaplanacak",
        Function::TriangleThirdSide | Function::TriangleCosineRule => {
            "Kosinüs kuralı ile üçüncü kenar hesaplanacak"
        }
        Function::TriangleSineRule => "Sinüs kuralı ile kenar hesaplanacak",
        Function::TriangleArea => "Üçgen alanı hesaplanacak",
        Function::TrianglePerimeter => "Üçgen çevresi hesaplanacak",
        Function::SquareArea => "Kare alanı hesaplanacak",
        Function::SquarePerimeter => "Kare çevresi hesaplanacak",
        Function::RectangleArea => "Dikdörtgen alanı hesaplanacak",
        Function::RectanglePerimeter => "Dikdörtgen çevresi hesaplanacak",
        Function::CircleArea => "Daire alanı hesaplanacak",
        Function::CirclePerimeter => "Daire çevresi hesaplanacak",
        _ => "Geometri hesaplama yapılacak",
    };

    Some(DispatchProposal::new(function, rationale).with_params(geometry_params(ctx.normalized)))
}

fn fallback_rule(_ctx: &RuleContext<'_>) -> Option<DispatchProposal> {
    Some(DispatchProposal::undetermined())
}

/// Evaluates the ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct ProposalBuilder {
    rules: &'static [DispatchRule],
}

impl Default for ProposalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalBuilder {
    pub fn new() -> Self {
        Self { rules: RULES }
    }

    pub fn rules(&self) -> &'static [DispatchRule] {
        self.rules
    }

    pub fn build(&self, ctx: &RuleContext<'_>) -> DispatchProposal {
        let proposal = self.rules.iter().find_map(|rule| {
            (rule.apply)(ctx).map(|mut proposal| {
                proposal.rule = rule.name.to_string();
                proposal
            })
        });

        match proposal {
            Some(proposal) => {
                debug!(
                    rule = %proposal.rule,
                    module = %proposal.module,
                    function = ?proposal.function,
                    "Dispatch proposal built"
                );
                proposal
            }
            None => {
                let mut proposal = DispatchProposal::undetermined();
                proposal.rule = "fallback".to_string();
                proposal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        normalized: &'a str,
        topic: Topic,
        subtopic: Subtopic,
        operation: Operation,
        entity: Option<&'a EntityMatch>,
    ) -> RuleContext<'a> {
        RuleContext {
            normalized,
            topic,
            subtopic,
            operation,
            entity,
        }
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = ProposalBuilder::new().rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "calculus",
                "combinatorics",
                "mixed_trig_equation",
                "trig_equation",
                "trigonometry",
                "algebra",
                "geometry",
                "fallback"
            ]
        );
    }

    #[test]
    fn test_function_modules() {
        assert_eq!(Function::QuadraticSolve.module(), Module::Algebra);
        assert_eq!(Function::MixedTrigEquationSolve.module(), Module::Trigonometry);
        assert_eq!(Function::Integral.module(), Module::Calculus);
        assert_eq!(Function::Permutation.module(), Module::Combinatorics);
        assert_eq!(Function::GeometryUndetermined.module(), Module::Geometry);
        assert_eq!(Function::Undetermined.module(), Module::Undetermined);
    }

    #[test]
    fn test_calculus_wins_over_trig_equation() {
        let entity = EntityMatch::Trigonometric("sin(x) = 0.5".to_string());
        let context = ctx(
            "sin(x) = 0.5 integralini al",
            Topic::Calculus,
            Subtopic::Undetermined,
            Operation::Integral,
            Some(&entity),
        );
        let proposal = ProposalBuilder::new().build(&context);
        assert_eq!(proposal.function, Function::Integral);
        assert_eq!(proposal.rule, "calculus");
        assert!(proposal.parameters.is_empty());
    }

    #[test]
    fn test_combinatorics_falls_through_without_marker() {
        let context = ctx(
            "olasilik nedir",
            Topic::Combinatorics,
            Subtopic::BasicProbability,
            Operation::Probability,
            None,
        );
        let proposal = ProposalBuilder::new().build(&context);
        assert_eq!(proposal.rule, "fallback");
        assert_eq!(proposal.module, Module::Undetermined);
    }

    #[test]
    fn test_trig_equation_ignores_topic() {
        let entity = EntityMatch::Trigonometric("cos(x) = 0".to_string());
        let context = ctx(
            "cos(x) = 0 coz",
            Topic::Algebra,
            Subtopic::Undetermined,
            Operation::Solve,
            Some(&entity),
        );
        let proposal = ProposalBuilder::new().build(&context);
        assert_eq!(proposal.function, Function::TrigEquationSolve);
        assert_eq!(proposal.rule, "trig_equation");
        assert_eq!(
            proposal.param("equation").and_then(ParamValue::as_text),
            Some("cos(x) = 0")
        );
    }

    #[test]
    fn test_trigonometry_branches() {
        let builder = ProposalBuilder::new();
        let function_for = |entity: &str, subtopic: Subtopic| {
            let entity = EntityMatch::Trigonometric(entity.to_string());
            let context = ctx(
                entity.text(),
                Topic::Trigonometry,
                subtopic,
                Operation::TrigEvaluate,
                Some(&entity),
            );
            builder.build(&context).function
        };

        assert_eq!(
            function_for("sin(30) + cos(45)", Subtopic::TrigFunction),
            Function::TrigExpressionEvaluate
        );
        assert_eq!(
            function_for("arcsin(0.5)", Subtopic::TrigFunction),
            Function::InverseTrigEvaluate
        );
        assert_eq!(
            function_for("90 derece radyana", Subtopic::TrigFunction),
            Function::AngleConvert
        );
        assert_eq!(
            function_for("cos(60)", Subtopic::AngleConversion),
            Function::AngleConvert
        );
        assert_eq!(
            function_for("sin(30)", Subtopic::TrigFunction),
            Function::TrigEvaluate
        );
    }

    #[test]
    fn test_algebra_without_entity_falls_through() {
        let context = ctx(
            "denklem coz",
            Topic::Algebra,
            Subtopic::Undetermined,
            Operation::Solve,
            None,
        );
        assert_eq!(ProposalBuilder::new().build(&context).rule, "fallback");
    }

    #[test]
    fn test_geometry_phrases() {
        assert_eq!(geometry_function("kosinus kurali ile"), Function::TriangleCosineRule);
        assert_eq!(geometry_function("sinus kurali ile"), Function::TriangleSineRule);
        assert_eq!(geometry_function("3. kenar kac"), Function::TriangleThirdSide);
        assert_eq!(geometry_function("hipotenusu bul"), Function::TrianglePythagorean);
        assert_eq!(geometry_function("ucgenin alani"), Function::TriangleArea);
        assert_eq!(geometry_function("ucgenin cevresi"), Function::TrianglePerimeter);
        assert_eq!(geometry_function("dikdortgenin alani"), Function::RectangleArea);
        assert_eq!(geometry_function("dikdortgen cevresi"), Function::RectanglePerimeter);
        assert_eq!(geometry_function("karenin alani"), Function::SquareArea);
        assert_eq!(geometry_function("kare cevresi"), Function::SquarePerimeter);
        assert_eq!(geometry_function("dairenin alani"), Function::CircleArea);
        assert_eq!(geometry_function("cemberin cevresi"), Function::CirclePerimeter);
    }

    #[test]
    fn test_geometry_fallbacks() {
        assert_eq!(geometry_function("dik ucgen 3 4"), Function::TrianglePythagorean);
        assert_eq!(geometry_function("bir ucgen"), Function::TriangleArea);
        assert_eq!(geometry_function("hacim"), Function::GeometryUndetermined);
    }

    #[test]
    fn test_geometry_carries_params() {
        let context = ctx(
            "kenari 4 olan karenin alani",
            Topic::Geometry,
            Subtopic::Quadrilateral,
            Operation::GeometryCalc,
            None,
        );
        let proposal = ProposalBuilder::new().build(&context);
        assert_eq!(proposal.function, Function::SquareArea);
        assert_eq!(proposal.param("side"), Some(&ParamValue::Number(4.0)));
    }
}
