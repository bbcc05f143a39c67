//! End-to-end scenarios: raw query through analyzer and dispatcher screening.

use crate::brain::{
    confidence, BrainAnalyzer, EntityMatch, Function, Module, Operation, ParamValue, Subtopic,
    Topic,
};
use crate::dispatch::Dispatcher;

#[cfg(test)]
mod literal_scenarios {
    use super::*;

    #[test]
    fn test_quadratic_roots() {
        let analysis = BrainAnalyzer::new().analyze("x² - 5x + 6 = 0 denkleminin köklerini bul");

        assert_eq!(analysis.topic, Topic::Algebra);
        assert_eq!(
            analysis.entity,
            Some(EntityMatch::Algebraic("x²-5x+6 = 0".to_string()))
        );
        assert_eq!(analysis.proposal.module, Module::Algebra);
        assert_eq!(analysis.proposal.function, Function::QuadraticSolve);
        assert_eq!(
            analysis.proposal.param("equation").and_then(ParamValue::as_text),
            Some("x²-5x+6 = 0")
        );
    }

    #[test]
    fn test_factoring() {
        let analysis = BrainAnalyzer::new().analyze("x² - 9 çarpanlarına ayır");

        assert_eq!(analysis.topic, Topic::Algebra);
        assert_eq!(analysis.operation, Operation::Factor);
        assert_eq!(analysis.entity.as_ref().map(EntityMatch::text), Some("x²-9"));
        assert!(!analysis.entity.as_ref().is_some_and(|e| e.contains("=")));
        assert_eq!(analysis.proposal.function, Function::Factor);
    }

    #[test]
    fn test_compound_trig_expression() {
        let analysis = BrainAnalyzer::new().analyze("sin(30) + cos(45) hesapla");

        assert_eq!(analysis.topic, Topic::Trigonometry);
        assert_eq!(analysis.proposal.function, Function::TrigExpressionEvaluate);
        assert_eq!(analysis.proposal.rule, "trigonometry");
    }

    #[test]
    fn test_mixed_trig_equation() {
        let query = "sin(x) + cos(45) = 1.20 ise x hesapla";
        let analysis = BrainAnalyzer::new().analyze(query);

        assert_eq!(analysis.proposal.module, Module::Trigonometry);
        assert_eq!(analysis.proposal.function, Function::MixedTrigEquationSolve);
        assert_eq!(analysis.proposal.rule, "mixed_trig_equation");
        assert_eq!(
            analysis.proposal.param("equation").and_then(ParamValue::as_text),
            Some(query)
        );
    }

    #[test]
    fn test_factorial() {
        let analysis = BrainAnalyzer::new().analyze("5! hesapla");

        assert_eq!(analysis.topic, Topic::Combinatorics);
        assert_eq!(analysis.subtopic, Subtopic::Factorial);
        assert_eq!(analysis.proposal.module, Module::Combinatorics);
        assert_eq!(analysis.proposal.function, Function::Factorial);
    }

    #[test]
    fn test_unrelated_text() {
        let analysis = BrainAnalyzer::new().analyze("bugün hava çok güzel");

        assert_eq!(analysis.topic, Topic::Undetermined);
        assert_eq!(analysis.subtopic, Subtopic::Undetermined);
        assert_eq!(analysis.operation, Operation::Undetermined);
        assert!(analysis.entity.is_none());
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.proposal.module, Module::Undetermined);
        assert_eq!(analysis.proposal.rule, "fallback");
    }
}

#[cfg(test)]
mod confidence_properties {
    use super::*;

    #[test]
    fn test_exact_steps() {
        let cases = [
            (Topic::Algebra, Subtopic::Undetermined, Operation::Undetermined, 0.3, 0.5),
            (Topic::Algebra, Subtopic::Quadratic, Operation::Undetermined, 0.6, 0.8),
            (Topic::Algebra, Subtopic::Quadratic, Operation::Solve, 0.8, 1.0),
        ];

        for (topic, subtopic, operation, without, with) in cases {
            assert_eq!(confidence::score(topic, subtopic, operation, false), without);
            assert_eq!(confidence::score(topic, subtopic, operation, true), with);
        }
    }

    #[test]
    fn test_scenario_confidences() {
        let brain = BrainAnalyzer::new();

        assert_eq!(brain.analyze("x² - 5x + 6 = 0 denkleminin köklerini bul").confidence, 1.0);
        assert_eq!(brain.analyze("5! hesapla").confidence, 0.8);
        assert_eq!(brain.analyze("x² türevini al").confidence, 0.8);
    }

    #[test]
    fn test_confidence_in_unit_interval() {
        let brain = BrainAnalyzer::new();

        for query in [
            "",
            "   ",
            "!!!",
            "sin cos tan arcsin derece radyan türev integral",
            "x² - 9 çarpanlarına ayır",
            "P(5,2) permutasyonu",
        ] {
            let c = brain.analyze(query).confidence;
            assert!((0.0..=1.0).contains(&c), "Confidence {} out of range for '{}'", c, query);
        }
    }
}

#[cfg(test)]
mod screening_scenarios {
    use super::*;

    #[test]
    fn test_screen_resolves_factorial_operand() {
        let brain = BrainAnalyzer::new();
        let dispatcher = Dispatcher::default();

        let request = dispatcher.screen(&brain.analyze("5! hesapla")).unwrap();
        assert_eq!(request.function, Function::Factorial);
        assert_eq!(request.parameters.get("n"), Some(&ParamValue::Integer(5)));
    }

    #[test]
    fn test_screen_rejects_unrelated_text() {
        let brain = BrainAnalyzer::new();
        let dispatcher = Dispatcher::default();

        let clarification = dispatcher
            .screen(&brain.analyze("bugün hava çok güzel"))
            .unwrap_err();
        assert!(clarification.message.starts_with("Sorunuzu anlayamadım"));
        assert_eq!(clarification.suggestions.len(), 4);
    }

    #[test]
    fn test_screen_unsupported_but_confident() {
        let brain = BrainAnalyzer::new();
        let dispatcher = Dispatcher::default();

        let analysis = brain.analyze("olasılık nedir");
        assert!(analysis.confidence >= 0.3);
        let clarification = dispatcher.screen(&analysis).unwrap_err();
        assert_eq!(clarification.message, "Bu tür soruları henüz çözemiyorum.");
    }
}
