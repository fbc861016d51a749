//! **Applicability matching for NVD CVE feed records.**
//!
//! `cvefeed` answers one question for a vulnerability scanner: given a
//! platform's CPE name and a vulnerability record's configuration, is the
//! platform affected?
//!
//! ## Core Concepts & Modules
//!
//! - **[`wfn`]**: CPE names bound into [`Attributes`], with ANY/NA semantics,
//!   parsing of CPE 2.3 formatted strings and CPE 2.2 URIs, and
//!   attribute-wise matching.
//! - **[`schema`]**: Serde types for the NVD CVE JSON 1.0 feed, and
//!   [`load_feed`](schema::load_feed) to read one from disk.
//! - **[`matching`]**: [`VulnerabilityRecord`], its tree of
//!   [`ConfigurationNode`]s, the rule matcher with version-range handling, and
//!   the [`Evaluator`] that combines AND/OR/NOT nodes.
//! - **[`utils`]**: The natural version comparator used for range bounds.
//! - **[`config`]**: [`EvaluatorConfig`] with presets, validation and YAML loading.
//!
//! ## Getting Started
//!
//! ```no_run
//! use cvefeed::{Attributes, Evaluator, VulnerabilityRecord};
//! use std::path::Path;
//!
//! fn main() -> cvefeed::Result<()> {
//!     let feed = cvefeed::schema::load_feed(Path::new("nvdcve-1.1-2021.json"))?;
//!     let records = VulnerabilityRecord::from_feed(&feed);
//!
//!     let platform: Attributes = "cpe:2.3:a:apache:log4j:2.14.1:*:*:*:*:*:*:*".parse()?;
//!     let evaluator = Evaluator::default();
//!     for id in evaluator.affected_by(&records, &platform) {
//!         println!("{id} affects {platform}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Matching never fails: a rule whose CPE cannot be parsed simply never
//! matches. Use [`ApplicabilityRule::resolution_error`] or
//! [`VulnerabilityRecord::resolution_errors`] to tell the two apart.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod matching;
pub mod schema;
pub mod utils;
pub mod wfn;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigPreset, EvaluatorConfig, Validatable};
pub use error::{CvefeedError, ErrorContext, ParseErrorKind, Result};
pub use matching::{
    match_rules, ApplicabilityRule, ConfigurationNode, Evaluator, LogicalTest, Operator,
    VersionRange, VulnerabilityItem, VulnerabilityRecord,
};
pub use utils::compare_versions;
pub use wfn::{AttributeValue, Attributes, CompiledAttributes};
