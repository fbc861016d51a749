//! Applicability matching of platforms against vulnerability records.
//!
//! # Architecture
//!
//! A [`VulnerabilityRecord`] owns a tree of [`ConfigurationNode`]s whose
//! leaves are [`ApplicabilityRule`]s. Trees are walked by an [`Evaluator`]
//! through the [`LogicalTest`] trait, so the evaluator can serve other record
//! types too.
//!
//! - [`match_rules`]: leaf-level decision, including version ranges
//! - [`ConfigurationNode`]: AND/OR/NOT grouping of rules
//! - [`Evaluator`]: combines node results under an [`EvaluatorConfig`](crate::config::EvaluatorConfig)
//!
//! # Example
//!
//! ```ignore
//! use cvefeed::matching::{Evaluator, VulnerabilityRecord};
//! use cvefeed::wfn::Attributes;
//!
//! let feed = cvefeed::schema::parse_feed(&json)?;
//! let records = VulnerabilityRecord::from_feed(&feed);
//!
//! let platform: Attributes = "cpe:2.3:a:apache:log4j:2.14.1:*:*:*:*:*:*:*".parse()?;
//! for id in Evaluator::default().affected_by(&records, &platform) {
//!     println!("{id}");
//! }
//! ```

mod evaluator;
mod node;
mod record;
mod rules;
mod traits;

pub use evaluator::Evaluator;
pub use node::{ConfigurationNode, NodeHeader, Operator};
pub use record::VulnerabilityRecord;
pub use rules::{match_rules, resolve_identifier, ApplicabilityRule, VersionRange};
pub use traits::{LogicalTest, VulnerabilityItem};
