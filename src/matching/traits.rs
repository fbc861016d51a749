//! Trait definitions for configuration-tree evaluation.
//!
//! [`LogicalTest`] is the node contract a generic evaluator walks, and
//! [`VulnerabilityItem`] is what record consumers see. Keeping them as traits
//! lets the [`Evaluator`](super::Evaluator) serve any record type.

use crate::wfn::Attributes;

use super::node::Operator;

/// A node of an applicability tree.
///
/// Every accessor must be total: an absent node answers with neutral values
/// (`Operator::None`, no children, no CPEs, `false`) instead of failing.
pub trait LogicalTest {
    /// Type of the child nodes.
    type Child: LogicalTest;

    /// How child results and the leaf result are combined.
    fn operator(&self) -> Operator;

    /// Invert `b` if this node is negated, otherwise return it unchanged.
    fn negate_if_needed(&self, b: bool) -> bool;

    /// Child nodes, in feed order.
    fn inner_tests(&self) -> &[Self::Child];

    /// Resolved targets of this node's rules; unresolved rules are omitted.
    fn cpes(&self) -> Vec<&Attributes>;

    /// Whether the node carries any rules of its own.
    fn has_rules(&self) -> bool;

    /// True if any of this node's own rules covers `platform`.
    fn match_platform(&self, platform: &Attributes, require_version: bool) -> bool;
}

/// A vulnerability record as exposed to consumers.
pub trait VulnerabilityItem {
    /// Root node type of the record's configuration.
    type Test: LogicalTest;

    /// Record identifier (e.g. "CVE-2021-44228"), empty if unknown.
    fn id(&self) -> &str;

    /// Configuration roots; the record applies if any root evaluates true.
    fn config(&self) -> &[Self::Test];

    /// Weakness classifications (e.g. "CWE-79").
    fn problem_types(&self) -> &[String];

    /// English description, empty if none.
    fn description(&self) -> &str;

    /// CVSS v2 base score, 0.0 if absent.
    fn cvss_v2_base(&self) -> f64;

    /// CVSS v3 base score, 0.0 if absent.
    fn cvss_v3_base(&self) -> f64;
}
