//! Generic evaluation of applicability trees.
//!
//! `evaluate(node) = negate_if_needed(combine(operator, children ++ [leaf]))`,
//! where the leaf operand is only present if the node has rules of its own.
//! When a whole inventory is evaluated, the leaf operand is true if any of
//! the inventory's platforms satisfies the node's rules.
//! `AND` needs every operand, `OR` and an unset operator need one. A node
//! with no operands at all yields [`EvaluatorConfig::vacuous_result`].

use crate::config::EvaluatorConfig;
use crate::wfn::Attributes;

use super::node::Operator;
use super::traits::{LogicalTest, VulnerabilityItem};

/// Evaluates configuration trees against platforms.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    #[must_use]
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one tree against a platform.
    #[must_use]
    pub fn evaluate<T: LogicalTest>(&self, node: &T, platform: &Attributes) -> bool {
        self.evaluate_at(node, std::slice::from_ref(platform), 1)
    }

    /// Evaluate one tree against every platform present on a host.
    ///
    /// Lets `AND` configurations such as "application running on operating
    /// system" match when the two platforms are distinct entries.
    #[must_use]
    pub fn evaluate_inventory<T: LogicalTest>(&self, node: &T, platforms: &[Attributes]) -> bool {
        self.evaluate_at(node, platforms, 1)
    }

    fn evaluate_at<T: LogicalTest>(&self, node: &T, platforms: &[Attributes], depth: usize) -> bool {
        if depth > self.config.max_depth {
            tracing::warn!(
                max_depth = self.config.max_depth,
                "Configuration tree too deep, treating subtree as not matching"
            );
            return false;
        }

        let children = node
            .inner_tests()
            .iter()
            .map(|child| self.evaluate_at(child, platforms, depth + 1));
        let leaf = node.has_rules().then(|| {
            platforms
                .iter()
                .any(|platform| node.match_platform(platform, self.config.require_version))
        });

        let combined = combine(node.operator(), children.chain(leaf), self.config.vacuous_result);
        node.negate_if_needed(combined)
    }

    /// True if any configuration root of `item` covers `platform`.
    #[must_use]
    pub fn is_affected<V: VulnerabilityItem>(&self, item: &V, platform: &Attributes) -> bool {
        let affected = item
            .config()
            .iter()
            .any(|root| self.evaluate(root, platform));
        tracing::trace!(id = item.id(), %platform, affected, "Evaluated record");
        affected
    }

    /// True if any configuration root of `item` covers the inventory.
    #[must_use]
    pub fn is_inventory_affected<V: VulnerabilityItem>(
        &self,
        item: &V,
        platforms: &[Attributes],
    ) -> bool {
        item.config()
            .iter()
            .any(|root| self.evaluate_inventory(root, platforms))
    }

    /// The platforms individually covered by `item`, in input order.
    #[must_use]
    pub fn matching_platforms<'p, V: VulnerabilityItem>(
        &self,
        item: &V,
        platforms: &'p [Attributes],
    ) -> Vec<&'p Attributes> {
        platforms
            .iter()
            .filter(|platform| self.is_affected(item, platform))
            .collect()
    }

    /// Identifiers of the records covering `platform`, in input order.
    #[must_use]
    pub fn affected_by<'r, V: VulnerabilityItem>(
        &self,
        items: &'r [V],
        platform: &Attributes,
    ) -> Vec<&'r str> {
        items
            .iter()
            .filter(|item| self.is_affected(*item, platform))
            .map(VulnerabilityItem::id)
            .collect()
    }
}

/// Combine operand results; short-circuits, since operands are pure.
fn combine(operator: Operator, operands: impl Iterator<Item = bool>, vacuous: bool) -> bool {
    let mut seen = false;
    for value in operands {
        seen = true;
        match operator {
            Operator::And if !value => return false,
            Operator::Or | Operator::None if value => return true,
            _ => {}
        }
    }

    if seen {
        operator == Operator::And
    } else {
        vacuous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::node::ConfigurationNode;
    use crate::schema::{CpeMatch, Node};

    fn leaf(operator: &str, negate: bool, uris: &[&str]) -> Node {
        Node {
            operator: operator.to_string(),
            negate,
            children: Vec::new(),
            cpe_match: uris
                .iter()
                .map(|u| CpeMatch {
                    vulnerable: true,
                    cpe23_uri: (*u).to_string(),
                    ..CpeMatch::default()
                })
                .collect(),
        }
    }

    fn branch(operator: &str, negate: bool, children: Vec<Node>) -> Node {
        Node {
            operator: operator.to_string(),
            negate,
            children,
            cpe_match: Vec::new(),
        }
    }

    const APP: &str = "cpe:2.3:a:vendor:app:1.0:*:*:*:*:*:*:*";
    const OS: &str = "cpe:2.3:o:vendor:os:*:*:*:*:*:*:*:*";

    fn app() -> Attributes {
        Attributes::application("vendor", "app", "1.0")
    }

    #[test]
    fn test_combine() {
        assert!(combine(Operator::And, [true, true].into_iter(), false));
        assert!(!combine(Operator::And, [true, false].into_iter(), false));
        assert!(combine(Operator::Or, [false, true].into_iter(), false));
        assert!(!combine(Operator::Or, [false, false].into_iter(), false));
        assert!(combine(Operator::None, [true].into_iter(), false));
        assert!(!combine(Operator::And, std::iter::empty(), false));
        assert!(combine(Operator::Or, std::iter::empty(), true));
    }

    #[test]
    fn test_negation_inverts_child_result() {
        let root = ConfigurationNode::from_schema(&branch("OR", true, vec![leaf("OR", false, &[APP])]));
        assert!(!Evaluator::default().evaluate(&root, &app()));
    }

    #[test]
    fn test_and_of_children() {
        let tree = branch("AND", false, vec![leaf("OR", false, &[APP]), leaf("OR", false, &[OS])]);
        let root = ConfigurationNode::from_schema(&tree);
        let evaluator = Evaluator::default();

        // An application platform cannot be the OS at the same time.
        assert!(!evaluator.evaluate(&root, &app()));

        let with_negated_os = branch(
            "AND",
            false,
            vec![leaf("OR", false, &[APP]), leaf("OR", true, &[OS])],
        );
        let root = ConfigurationNode::from_schema(&with_negated_os);
        assert!(evaluator.evaluate(&root, &app()));
    }

    #[test]
    fn test_inventory_satisfies_and_across_platforms() {
        let tree = branch("AND", false, vec![leaf("OR", false, &[APP]), leaf("OR", false, &[OS])]);
        let root = ConfigurationNode::from_schema(&tree);
        let os = crate::wfn::parse("cpe:2.3:o:vendor:os:10:*:*:*:*:*:*:*").expect("os");
        let evaluator = Evaluator::default();

        assert!(evaluator.evaluate_inventory(&root, &[app(), os.clone()]));
        assert!(!evaluator.evaluate_inventory(&root, &[app()]));
        assert!(!evaluator.evaluate_inventory(&root, &[os]));
        assert!(!evaluator.evaluate_inventory(&root, &[]));
    }

    #[test]
    fn test_vacuous_policy() {
        let empty = ConfigurationNode::from_schema(&leaf("AND", false, &[]));
        assert!(!Evaluator::default().evaluate(&empty, &app()));

        let permissive = Evaluator::new(EvaluatorConfig::default().with_vacuous_result(true));
        assert!(permissive.evaluate(&empty, &app()));

        let negated_empty = ConfigurationNode::from_schema(&leaf("AND", true, &[]));
        assert!(Evaluator::default().evaluate(&negated_empty, &app()));
    }

    #[test]
    fn test_absent_node_evaluates_to_vacuous_result() {
        let absent: Option<&ConfigurationNode> = None;
        assert!(!Evaluator::default().evaluate(&absent, &app()));
        assert!(!Evaluator::default().evaluate(&ConfigurationNode::Empty, &app()));
    }

    #[test]
    fn test_require_version_is_forwarded() {
        let root = ConfigurationNode::from_schema(&leaf(
            "OR",
            false,
            &["cpe:2.3:a:vendor:app:*:*:*:*:*:*:*:*"],
        ));
        assert!(Evaluator::default().evaluate(&root, &app()));

        let strict = Evaluator::new(EvaluatorConfig::default().with_require_version(true));
        assert!(!strict.evaluate(&root, &app()));
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = leaf("OR", false, &[APP]);
        for _ in 0..4 {
            tree = branch("OR", false, vec![tree]);
        }
        let root = ConfigurationNode::from_schema(&tree);

        assert!(Evaluator::default().evaluate(&root, &app()));
        let shallow = Evaluator::new(EvaluatorConfig::default().with_max_depth(3));
        assert!(!shallow.evaluate(&root, &app()));
    }
}
