//! Dispatch of analyzed queries to subject solvers.
//!
//! The dispatcher screens an analysis (confidence, module), completes the
//! proposal's parameters from the query text, and hands the request to the
//! solver registered for its module. Anything it cannot act on comes back as
//! a [`Clarification`] for the user.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::brain::params::{
    angle_conversion, calculus_body, first_integer, inverse_call, n_r_pair, trig_call,
};
use crate::brain::{Function, Module, ParamMap, ParamValue, QueryAnalysis};
use crate::config::DispatcherConfig;

/// A solver for one subject module.
pub trait SubjectSolver: Send + Sync {
    /// The module this solver handles.
    fn module(&self) -> Module;

    /// Run `function` with fully resolved parameters.
    fn solve(&self, function: Function, params: &ParamMap) -> SolverOutcome;
}

/// What a solver returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutcome {
    pub success: bool,
    pub steps: Vec<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl SolverOutcome {
    pub fn solved(result: serde_json::Value, steps: Vec<String>) -> Self {
        Self {
            success: true,
            steps,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            steps: Vec::new(),
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Request sent back to the user instead of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Clarification {
    pub message: String,
    pub suggestions: Vec<String>,
}

impl Clarification {
    pub fn new(message: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            message: message.into(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn low_confidence() -> Self {
        Self::new(
            "Sorunuzu anlayamadım. Lütfen daha açık bir şekilde yazın.",
            &[
                "Sorunuzu daha açık yazın",
                "Matematik denklemini tam olarak yazın",
                "Örnek sorulardan yararlanın",
                "Desteklenen konular: cebir, trigonometri, geometri, analiz, olasılık",
            ],
        )
    }

    fn unsupported() -> Self {
        Self::new(
            "Bu tür soruları henüz çözemiyorum.",
            &[
                "Desteklenen konular: cebir, trigonometri, geometri, analiz, olasılık",
                "Örnek: x² - 5x + 6 = 0 denkleminin köklerini bul",
            ],
        )
    }
}

/// A proposal whose parameters are complete and ready for a solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequest {
    pub module: Module,
    pub function: Function,
    pub parameters: ParamMap,
    /// Rule that produced the underlying proposal
    pub rule: String,
}

fn require_text<'a>(
    params: &'a ParamMap,
    key: &str,
    missing: impl FnOnce() -> Clarification,
) -> Result<&'a str, Clarification> {
    params
        .get(key)
        .and_then(ParamValue::as_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(missing)
}

/// Complete the parameters of `function` from the normalized query.
fn resolve_parameters(
    function: Function,
    text: &str,
    params: &mut ParamMap,
) -> Result<(), Clarification> {
    match function {
        Function::Derivative | Function::Integral => {
            params.insert("function".to_string(), calculus_body(text).into());
        }
        Function::Factorial => {
            params.insert("n".to_string(), first_integer(text));
        }
        Function::Permutation | Function::Combination => {
            let (n, r) = n_r_pair(text).ok_or_else(|| {
                Clarification::new(
                    "r değeri belirlenemedi.",
                    &["n ve r değerlerini birlikte yazın", "Örnek: C(10,3), P(5,2)"],
                )
            })?;
            params.insert("n".to_string(), n);
            params.insert("r".to_string(), r);
        }
        Function::QuadraticSolve => {
            require_text(params, "equation", || {
                Clarification::new(
                    "Denklem tespit edilemedi.",
                    &["Denklemi = işareti ile tam olarak yazın", "Örnek: x² - 5x + 6 = 0"],
                )
            })?;
        }
        Function::Factor => {
            require_text(params, "expression", || {
                Clarification::new(
                    "Çarpanlarına ayrılacak ifade tespit edilemedi.",
                    &["İfadeyi açık bir şekilde yazın", "Örnek: x² - 9"],
                )
            })?;
        }
        Function::TrigEvaluate => {
            let unrecognized = || {
                Clarification::new(
                    "Trigonometrik fonksiyon formatı tanınamadı.",
                    &["Örnek: sin(30), cos 45, tan(60)"],
                )
            };
            let expression = require_text(params, "expression", unrecognized)?;
            let (name, angle) = trig_call(expression).ok_or_else(unrecognized)?;
            params.insert("function".to_string(), name.into());
            params.insert("angle".to_string(), angle.into());
            params.insert("unit".to_string(), "degree".into());
        }
        Function::InverseTrigEvaluate => {
            let unrecognized = || {
                Clarification::new(
                    "Ters trigonometrik fonksiyon formatı tanınamadı.",
                    &["Örnek: arcsin(0.5), arccos(0.707)"],
                )
            };
            let expression = require_text(params, "expression", unrecognized)?;
            let (name, value) = inverse_call(expression).ok_or_else(unrecognized)?;
            params.insert("function".to_string(), name.into());
            params.insert("value".to_string(), value.into());
        }
        Function::AngleConvert => {
            let unrecognized = || {
                Clarification::new(
                    "Açı dönüşüm formatı tanınamadı.",
                    &["Örnek: 90 derece radyan, 1.57 radyan derece"],
                )
            };
            let expression = require_text(params, "expression", unrecognized)?;
            let conversion = angle_conversion(expression).ok_or_else(unrecognized)?;
            params.insert("value".to_string(), conversion.value.into());
            params.insert("from".to_string(), conversion.from.label().into());
            params.insert("to".to_string(), conversion.to.label().into());
        }
        Function::TrigEquationSolve => {
            require_text(params, "equation", || {
                Clarification::new(
                    "Trigonometrik denklem tespit edilemedi.",
                    &["Örnek: sin(x) = 0.5, cos(x) = 0, tan(x) = 1"],
                )
            })?;
        }
        Function::TrigExpressionEvaluate => {
            require_text(params, "expression", || {
                Clarification::new(
                    "Trigonometrik ifade tespit edilemedi.",
                    &["Örnek: sin(30) + cos(45), tan(60) - sin(90)"],
                )
            })?;
        }
        Function::MixedTrigEquationSolve => {
            require_text(params, "equation", || {
                Clarification::new(
                    "Karma trigonometrik denklem tespit edilemedi.",
                    &["Örnek: sin(x) + cos(45) = 1.20, cos(x) - sin(30) = 0.5"],
                )
            })?;
        }
        Function::GeometryUndetermined => {
            return Err(Clarification::new(
                "Belirtilen geometri hesaplama türü tespit edilemedi.",
                &["Desteklenen hesaplamalar: pisagor teoremi, üçgen alanı, kare/dikdörtgen alan/çevre, daire alan/çevre"],
            ));
        }
        Function::TriangleArea
        | Function::TrianglePerimeter
        | Function::TriangleThirdSide
        | Function::TrianglePythagorean
        | Function::TriangleCosineRule
        | Function::TriangleSineRule
        | Function::SquareArea
        | Function::SquarePerimeter
        | Function::RectangleArea
        | Function::RectanglePerimeter
        | Function::CircleArea
        | Function::CirclePerimeter => {}
        Function::Undetermined => return Err(Clarification::unsupported()),
    }

    Ok(())
}

/// Routes analyzed queries to registered solvers.
pub struct Dispatcher {
    config: DispatcherConfig,
    solvers: HashMap<Module, Box<dyn SubjectSolver>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("solvers", &self.solvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            solvers: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Register a solver for its module, returning the one it replaces.
    pub fn register(&mut self, solver: Box<dyn SubjectSolver>) -> Option<Box<dyn SubjectSolver>> {
        let module = solver.module();
        debug!(%module, "Registering solver");
        self.solvers.insert(module, solver)
    }

    pub fn has_solver(&self, module: Module) -> bool {
        self.solvers.contains_key(&module)
    }

    /// Check an analysis and complete its parameters, without solving.
    pub fn screen(&self, analysis: &QueryAnalysis) -> Result<ResolvedRequest, Clarification> {
        if analysis.confidence < self.config.confidence_threshold {
            info!(
                confidence = analysis.confidence,
                threshold = self.config.confidence_threshold,
                "Confidence below threshold, asking for clarification"
            );
            return Err(Clarification::low_confidence());
        }

        let proposal = &analysis.proposal;
        if proposal.is_undetermined() {
            info!(query = %analysis.query, "No module for query");
            return Err(Clarification::unsupported());
        }

        let mut parameters = proposal.parameters.clone();
        resolve_parameters(proposal.function, &analysis.normalized, &mut parameters)
            .inspect_err(|c| warn!(function = ?proposal.function, message = %c, "Parameters unresolved"))?;

        Ok(ResolvedRequest {
            module: proposal.module,
            function: proposal.function,
            parameters,
            rule: proposal.rule.clone(),
        })
    }

    /// Screen an analysis and run it through the matching solver.
    pub fn dispatch(&self, analysis: &QueryAnalysis) -> Result<SolverOutcome, Clarification> {
        let request = self.screen(analysis)?;

        let Some(solver) = self.solvers.get(&request.module) else {
            warn!(module = %request.module, "No solver registered");
            let mut registered: Vec<&str> = self.solvers.keys().map(Module::label).collect();
            registered.sort_unstable();
            let listing = format!("Kayıtlı modüller: {}", registered.join(", "));
            return Err(Clarification::new(
                format!("'{}' modülü henüz hazır değil.", request.module),
                &[listing.as_str()],
            ));
        };

        info!(
            module = %request.module,
            function = ?request.function,
            "Dispatching to solver"
        );
        let outcome = solver.solve(request.function, &request.parameters);
        if !outcome.success {
            warn!(error = ?outcome.error, "Solver reported failure");
        }
        Ok(outcome)
    }
}
