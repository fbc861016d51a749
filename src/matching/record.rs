//! Vulnerability records projected from feed items.

use crate::error::CvefeedError;
use crate::schema::{CveItem, LangString, NvdCveFeed};

use super::node::ConfigurationNode;
use super::rules::ApplicabilityRule;
use super::traits::VulnerabilityItem;

/// An immutable, query-ready view of one feed item.
///
/// Built once; every rule target in the configuration tree is resolved during
/// construction, so a record can be shared between threads for read-only
/// evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VulnerabilityRecord {
    id: String,
    problem_types: Vec<String>,
    description: String,
    cvss_v2_base: f64,
    cvss_v3_base: f64,
    roots: Vec<ConfigurationNode>,
}

impl VulnerabilityRecord {
    /// Project a feed item. Missing sections become empty values.
    #[must_use]
    pub fn from_item(item: &CveItem) -> Self {
        let cve = item.cve.as_ref();

        let id = cve
            .and_then(|c| c.cve_data_meta.as_ref())
            .map(|meta| meta.id.clone())
            .unwrap_or_default();

        let problem_types = if id.is_empty() {
            Vec::new()
        } else {
            cve.and_then(|c| c.problemtype.as_ref())
                .map(|pt| {
                    pt.problemtype_data
                        .iter()
                        .map(|data| english_or_first(&data.description).to_string())
                        .collect()
                })
                .unwrap_or_default()
        };

        let description = cve
            .and_then(|c| c.description.as_ref())
            .map(|d| english_or_first(&d.description_data).to_string())
            .unwrap_or_default();

        let impact = item.impact.as_ref();
        let cvss_v2_base = impact
            .and_then(|i| i.base_metric_v2.as_ref())
            .and_then(|m| m.cvss_v2.as_ref())
            .map_or(0.0, |c| c.base_score);
        let cvss_v3_base = impact
            .and_then(|i| i.base_metric_v3.as_ref())
            .and_then(|m| m.cvss_v3.as_ref())
            .map_or(0.0, |c| c.base_score);

        let roots = item
            .configurations
            .as_ref()
            .map(|conf| conf.nodes.iter().map(ConfigurationNode::from_schema).collect())
            .unwrap_or_default();

        Self {
            id,
            problem_types,
            description,
            cvss_v2_base,
            cvss_v3_base,
            roots,
        }
    }

    /// Project every item of a feed, in feed order.
    #[must_use]
    pub fn from_feed(feed: &NvdCveFeed) -> Vec<Self> {
        let records: Vec<Self> = feed.cve_items.iter().map(Self::from_item).collect();
        tracing::debug!(records = records.len(), "Projected feed records");
        records
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn problem_types(&self) -> &[String] {
        &self.problem_types
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn cvss_v2_base(&self) -> f64 {
        self.cvss_v2_base
    }

    #[must_use]
    pub fn cvss_v3_base(&self) -> f64 {
        self.cvss_v3_base
    }

    /// Configuration roots, in feed order.
    #[must_use]
    pub fn configuration_roots(&self) -> &[ConfigurationNode] {
        &self.roots
    }

    /// Number of rules across the whole tree whose target failed to resolve.
    #[must_use]
    pub fn unresolved_rule_count(&self) -> usize {
        self.unresolved_rules().len()
    }

    /// One error per rule whose target failed to resolve, in tree order.
    ///
    /// Each error's context names the record and the raw identifier.
    #[must_use]
    pub fn resolution_errors(&self) -> Vec<CvefeedError> {
        self.unresolved_rules()
            .into_iter()
            .filter_map(|rule| {
                let kind = rule.resolution_error()?.clone();
                Some(CvefeedError::parse(
                    format!("{}: {}", self.id, rule.raw_identifier()),
                    kind,
                ))
            })
            .collect()
    }

    fn unresolved_rules(&self) -> Vec<&ApplicabilityRule> {
        fn collect<'a>(node: &'a ConfigurationNode, out: &mut Vec<&'a ApplicabilityRule>) {
            out.extend(node.rules().iter().filter(|r| r.resolution_error().is_some()));
            for child in node.children() {
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        for root in &self.roots {
            collect(root, &mut out);
        }
        out
    }
}

impl From<&CveItem> for VulnerabilityRecord {
    fn from(item: &CveItem) -> Self {
        Self::from_item(item)
    }
}

impl VulnerabilityItem for VulnerabilityRecord {
    type Test = ConfigurationNode;

    fn id(&self) -> &str {
        VulnerabilityRecord::id(self)
    }

    fn config(&self) -> &[ConfigurationNode] {
        self.configuration_roots()
    }

    fn problem_types(&self) -> &[String] {
        VulnerabilityRecord::problem_types(self)
    }

    fn description(&self) -> &str {
        VulnerabilityRecord::description(self)
    }

    fn cvss_v2_base(&self) -> f64 {
        VulnerabilityRecord::cvss_v2_base(self)
    }

    fn cvss_v3_base(&self) -> f64 {
        VulnerabilityRecord::cvss_v3_base(self)
    }
}

/// Value of the first English entry, else of the first entry, else "".
fn english_or_first(strings: &[LangString]) -> &str {
    strings
        .iter()
        .find(|s| s.lang == "en")
        .or_else(|| strings.first())
        .map_or("", |s| s.value.as_str())
}
