//! Test Module
//!
//! Test suite for the MathQuery core.
//!
//! ## Test Categories
//! - `brain_tests`: classification, entity extraction, confidence, proposals
//! - `scenario_tests`: end-to-end queries through analyzer and dispatcher
//! - `dispatch_tests`: screening, parameter resolution, solver routing
//! - `config_tests`: environment-driven configuration

pub mod config_tests;
pub mod scenario_tests;
