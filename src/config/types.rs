//! Configuration types for configuration-tree evaluation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::DEFAULT_MAX_DEPTH;

/// Settings for evaluating a record's configuration tree against a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Skip rules whose target version is ANY and that carry no version bound
    pub require_version: bool,
    /// Result of a node that has neither children nor rules (before negation)
    pub vacuous_result: bool,
    /// Deepest node nesting that is evaluated; deeper subtrees count as false
    #[schemars(range(min = 1))]
    pub max_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            require_version: false,
            vacuous_result: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvaluatorConfig {
    /// Create an `EvaluatorConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_require_version(mut self, require_version: bool) -> Self {
        self.require_version = require_version;
        self
    }

    #[must_use]
    pub const fn with_vacuous_result(mut self, vacuous_result: bool) -> Self {
        self.vacuous_result = vacuous_result;
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();
        if other.require_version != defaults.require_version {
            self.require_version = other.require_version;
        }
        if other.vacuous_result != defaults.vacuous_result {
            self.vacuous_result = other.vacuous_result;
        }
        if other.max_depth != defaults.max_depth {
            self.max_depth = other.max_depth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let config = EvaluatorConfig::new()
            .with_require_version(true)
            .with_vacuous_result(true)
            .with_max_depth(4);
        assert!(config.require_version);
        assert!(config.vacuous_result);
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: EvaluatorConfig =
            serde_yaml::from_str("require_version: true\n").expect("yaml");
        assert!(config.require_version);
        assert!(!config.vacuous_result);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_merge_prefers_non_default_values() {
        let mut base = EvaluatorConfig::new().with_max_depth(8);
        base.merge(&EvaluatorConfig::new().with_require_version(true));
        assert!(base.require_version);
        assert_eq!(base.max_depth, 8);
    }
}
