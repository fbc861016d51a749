//! Configuration tree nodes.
//!
//! A feed node becomes a [`ConfigurationNode`]: `Leaf` when it only holds
//! rules, `Branch` when it has children (and possibly rules of its own), and
//! `Empty` for an absent node. Accessors on `Empty` return neutral values, so
//! evaluators never have to special-case missing nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema;
use crate::wfn::Attributes;

use super::rules::{match_rules, ApplicabilityRule};
use super::traits::LogicalTest;

/// Combination operator of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
    /// Unset; evaluated like `Or`
    #[default]
    #[serde(rename = "")]
    None,
}

impl Operator {
    /// Interpret a feed operator string. Unknown values are treated as unset.
    #[must_use]
    pub fn from_feed(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Self::And,
            "OR" => Self::Or,
            "" => Self::None,
            other => {
                tracing::warn!("Unknown configuration node operator '{other}', treating as unset");
                Self::None
            }
        }
    }

    /// Feed spelling: "AND", "OR" or "".
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::None => "",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator and negation flag shared by every present node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeHeader {
    pub operator: Operator,
    pub negate: bool,
}

/// One node of a record's applicability tree. Children are owned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigurationNode {
    /// Absent node
    #[default]
    Empty,
    /// Node without children
    Leaf {
        header: NodeHeader,
        rules: Vec<ApplicabilityRule>,
    },
    /// Node with children, plus any rules declared alongside them
    Branch {
        header: NodeHeader,
        children: Vec<ConfigurationNode>,
        rules: Vec<ApplicabilityRule>,
    },
}

impl ConfigurationNode {
    /// Build a node and its whole subtree, resolving every rule target.
    #[must_use]
    pub fn from_schema(node: &schema::Node) -> Self {
        let header = NodeHeader {
            operator: Operator::from_feed(&node.operator),
            negate: node.negate,
        };
        let rules: Vec<ApplicabilityRule> = node
            .cpe_match
            .iter()
            .map(ApplicabilityRule::from_cpe_match)
            .collect();

        if node.children.is_empty() {
            Self::Leaf { header, rules }
        } else {
            Self::Branch {
                header,
                children: node.children.iter().map(Self::from_schema).collect(),
                rules,
            }
        }
    }

    /// `Empty` for a missing node.
    #[must_use]
    pub fn from_optional(node: Option<&schema::Node>) -> Self {
        node.map_or(Self::Empty, Self::from_schema)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn header(&self) -> NodeHeader {
        match self {
            Self::Empty => NodeHeader::default(),
            Self::Leaf { header, .. } | Self::Branch { header, .. } => *header,
        }
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.header().operator
    }

    #[must_use]
    pub fn negate_if_needed(&self, b: bool) -> bool {
        b != self.header().negate
    }

    #[must_use]
    pub fn children(&self) -> &[ConfigurationNode] {
        match self {
            Self::Branch { children, .. } => children,
            Self::Empty | Self::Leaf { .. } => &[],
        }
    }

    /// This node's own rules.
    #[must_use]
    pub fn rules(&self) -> &[ApplicabilityRule] {
        match self {
            Self::Empty => &[],
            Self::Leaf { rules, .. } | Self::Branch { rules, .. } => rules,
        }
    }

    /// Resolved targets of this node's rules; unresolved rules are skipped.
    #[must_use]
    pub fn leaf_identifiers(&self) -> Vec<&Attributes> {
        self.rules()
            .iter()
            .filter_map(ApplicabilityRule::target)
            .collect()
    }

    /// True if any of this node's own rules covers `platform`.
    #[must_use]
    pub fn match_leaf(&self, platform: &Attributes, require_version: bool) -> bool {
        match_rules(self.rules(), platform, require_version)
    }
}

impl LogicalTest for ConfigurationNode {
    type Child = ConfigurationNode;

    fn operator(&self) -> Operator {
        ConfigurationNode::operator(self)
    }

    fn negate_if_needed(&self, b: bool) -> bool {
        ConfigurationNode::negate_if_needed(self, b)
    }

    fn inner_tests(&self) -> &[ConfigurationNode] {
        self.children()
    }

    fn cpes(&self) -> Vec<&Attributes> {
        self.leaf_identifiers()
    }

    fn has_rules(&self) -> bool {
        !self.rules().is_empty()
    }

    fn match_platform(&self, platform: &Attributes, require_version: bool) -> bool {
        self.match_leaf(platform, require_version)
    }
}

/// A possibly missing node behaves like [`ConfigurationNode::Empty`].
impl LogicalTest for Option<&ConfigurationNode> {
    type Child = ConfigurationNode;

    fn operator(&self) -> Operator {
        self.map_or(Operator::None, ConfigurationNode::operator)
    }

    fn negate_if_needed(&self, b: bool) -> bool {
        self.map_or(b, |node| node.negate_if_needed(b))
    }

    fn inner_tests(&self) -> &[ConfigurationNode] {
        match self {
            Some(node) => node.children(),
            None => &[],
        }
    }

    fn cpes(&self) -> Vec<&Attributes> {
        self.map_or_else(Vec::new, ConfigurationNode::leaf_identifiers)
    }

    fn has_rules(&self) -> bool {
        self.is_some_and(|node| !node.rules().is_empty())
    }

    fn match_platform(&self, platform: &Attributes, require_version: bool) -> bool {
        self.is_some_and(|node| node.match_leaf(platform, require_version))
    }
}
