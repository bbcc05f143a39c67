//! Configuration Tests
//!
//! Environment-driven dispatcher settings.

use crate::config::{DispatcherConfig, THRESHOLD_ENV};
use crate::error::AppError;

#[cfg(test)]
mod dispatcher_config_tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        temp_env::with_var_unset(THRESHOLD_ENV, || {
            let config = DispatcherConfig::from_env().expect("Config failed");
            assert_eq!(config.confidence_threshold, 0.3);
        });
    }

    #[test]
    fn test_threshold_from_env() {
        temp_env::with_var(THRESHOLD_ENV, Some(" 0.6 "), || {
            let config = DispatcherConfig::from_env().expect("Config failed");
            assert_eq!(config.confidence_threshold, 0.6);
        });
    }

    #[test]
    fn test_unparsable_threshold() {
        temp_env::with_var(THRESHOLD_ENV, Some("yüksek"), || {
            let err = DispatcherConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(_)));
        });
    }

    #[test]
    fn test_out_of_range_threshold() {
        temp_env::with_var(THRESHOLD_ENV, Some("1.5"), || {
            let err = DispatcherConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        });
    }

    #[test]
    fn test_non_finite_threshold() {
        assert!(DispatcherConfig::with_threshold(f32::NAN).is_err());
        assert!(DispatcherConfig::with_threshold(f32::INFINITY).is_err());
    }

    #[test]
    fn test_explicit_threshold() {
        let config = DispatcherConfig::with_threshold(0.0).expect("Config failed");
        assert_eq!(config.confidence_threshold, 0.0);
        assert!(DispatcherConfig::with_threshold(-0.1).is_err());
    }
}
