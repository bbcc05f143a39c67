// MathQuery Core
// "The Brain" - Rule-based router for Turkish math questions

pub mod brain;
pub mod config;
pub mod dispatch;
pub mod error;

pub use brain::{BrainAnalyzer, QueryAnalysis};
pub use config::DispatcherConfig;
pub use dispatch::{Clarification, Dispatcher, ResolvedRequest, SolverOutcome, SubjectSolver};
pub use error::AppError;

#[cfg(test)]
mod tests;
