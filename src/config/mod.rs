//! Configuration module for cvefeed.
//!
//! This module provides:
//! - The [`EvaluatorConfig`] that tunes configuration-tree evaluation
//! - Validation through the [`Validatable`] trait
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cvefeed::config::{ConfigPreset, EvaluatorConfig};
//!
//! // Use defaults
//! let config = EvaluatorConfig::default();
//!
//! // Only count rules that pin a version or a version range
//! let config = EvaluatorConfig::from_preset(ConfigPreset::Strict);
//!
//! // Load from file
//! use cvefeed::config::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.cvefeed.yaml` file in your project root or `~/.config/cvefeed/`:
//!
//! ```yaml
//! require_version: true
//! vacuous_result: false
//! max_depth: 32
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, DEFAULT_MAX_DEPTH};
pub use file::{discover_config_file, load_config_file, load_or_default, ConfigFileError};
pub use types::EvaluatorConfig;
pub use validation::{ConfigError, Validatable};

/// Generate a JSON Schema for the configuration file format.
///
/// # Errors
///
/// Fails only if the schema cannot be serialized.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(EvaluatorConfig);
    serde_json::to_string_pretty(&schema)
}
