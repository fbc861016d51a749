//! Applicability rules and the leaf-level matcher.
//!
//! An [`ApplicabilityRule`] pairs a target CPE name with optional version
//! bounds. The target is resolved once, when the rule is built; a rule whose
//! target cannot be parsed never matches and never fails a query.

use crate::error::ParseErrorKind;
use crate::schema::CpeMatch;
use crate::utils::compare_versions;
use crate::wfn::{self, AttributeValue, Attributes, CompiledAttributes};
use std::cmp::Ordering;

/// Resolve a rule target, preferring the CPE 2.3 binding over the legacy URI.
///
/// The fallback is only consulted when `primary` is empty.
pub fn resolve_identifier(primary: &str, fallback: &str) -> Result<Attributes, ParseErrorKind> {
    let raw = if primary.is_empty() { fallback } else { primary };
    wfn::parse(raw)
}

/// Version bounds of a rule. All present bounds must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRange {
    pub start_including: Option<String>,
    pub start_excluding: Option<String>,
    pub end_including: Option<String>,
    pub end_excluding: Option<String>,
}

impl VersionRange {
    /// Bounds declared by a feed rule; empty strings are absent bounds.
    #[must_use]
    pub fn from_cpe_match(m: &CpeMatch) -> Self {
        let bound = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            start_including: bound(&m.version_start_including),
            start_excluding: bound(&m.version_start_excluding),
            end_including: bound(&m.version_end_including),
            end_excluding: bound(&m.version_end_excluding),
        }
    }

    /// True when no bound is present.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start_including.is_none()
            && self.start_excluding.is_none()
            && self.end_including.is_none()
            && self.end_excluding.is_none()
    }

    /// Check an unquoted version against every present bound.
    #[must_use]
    pub fn contains(&self, version: &str) -> bool {
        let cmp = |bound: &Option<String>| bound.as_deref().map(|b| compare_versions(version, b));

        !matches!(cmp(&self.start_including), Some(Ordering::Less))
            && !matches!(
                cmp(&self.start_excluding),
                Some(Ordering::Less | Ordering::Equal)
            )
            && !matches!(cmp(&self.end_including), Some(Ordering::Greater))
            && !matches!(
                cmp(&self.end_excluding),
                Some(Ordering::Greater | Ordering::Equal)
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedTarget {
    /// As parsed from the feed
    parsed: Attributes,
    /// What is structurally matched; version forced to ANY for range rules
    effective: CompiledAttributes,
}

/// A single leaf condition of a configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicabilityRule {
    cpe23_uri: String,
    cpe22_uri: String,
    vulnerable: bool,
    range: VersionRange,
    target: Result<ResolvedTarget, ParseErrorKind>,
}

impl ApplicabilityRule {
    /// Build a rule, resolving its target immediately.
    #[must_use]
    pub fn new(cpe23_uri: &str, cpe22_uri: &str, range: VersionRange) -> Self {
        let target = resolve_identifier(cpe23_uri, cpe22_uri).and_then(|parsed| {
            let mut effective = parsed.clone();
            if !range.is_unbounded() {
                effective.version = AttributeValue::Any;
            }
            Ok(ResolvedTarget {
                parsed,
                effective: CompiledAttributes::new(effective)?,
            })
        });

        if let Err(e) = &target {
            tracing::debug!(
                cpe23_uri,
                cpe22_uri,
                "Excluding applicability rule with unparseable target: {e}"
            );
        }

        Self {
            cpe23_uri: cpe23_uri.to_string(),
            cpe22_uri: cpe22_uri.to_string(),
            vulnerable: true,
            range,
            target,
        }
    }

    /// Build a rule from a feed `cpe_match` entry.
    #[must_use]
    pub fn from_cpe_match(m: &CpeMatch) -> Self {
        Self {
            vulnerable: m.vulnerable,
            ..Self::new(&m.cpe23_uri, &m.cpe22_uri, VersionRange::from_cpe_match(m))
        }
    }

    /// The resolved target as parsed, or `None` if it failed to resolve.
    #[must_use]
    pub fn target(&self) -> Option<&Attributes> {
        self.target.as_ref().ok().map(|t| &t.parsed)
    }

    /// Why the target failed to resolve, if it did.
    #[must_use]
    pub fn resolution_error(&self) -> Option<&ParseErrorKind> {
        self.target.as_ref().err()
    }

    /// The raw identifier the target was resolved from.
    #[must_use]
    pub fn raw_identifier(&self) -> &str {
        if self.cpe23_uri.is_empty() {
            &self.cpe22_uri
        } else {
            &self.cpe23_uri
        }
    }

    #[must_use]
    pub fn range(&self) -> &VersionRange {
        &self.range
    }

    /// The feed's `vulnerable` flag. It is informational and does not take
    /// part in matching.
    #[must_use]
    pub fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    /// Decide whether this rule covers `platform`.
    ///
    /// With `require_version`, rules targeting any version without bounds are
    /// skipped.
    #[must_use]
    pub fn matches(&self, platform: &Attributes, require_version: bool) -> bool {
        let Ok(target) = &self.target else {
            return false;
        };

        if self.range.is_unbounded() && require_version && target.parsed.version.is_any() {
            return false;
        }

        if !target.effective.matches(platform) {
            return false;
        }

        let version = match &platform.version {
            AttributeValue::Any | AttributeValue::Na => return true,
            AttributeValue::Literal(v) => v,
        };

        if self.range.is_unbounded() {
            return true;
        }

        // A range cannot be satisfied by a target declared not applicable.
        if target.parsed.version.is_na() {
            return false;
        }

        self.range.contains(&wfn::strip_slashes(version))
    }
}

/// True if any rule covers `platform`. Rules are tried in order.
#[must_use]
pub fn match_rules(rules: &[ApplicabilityRule], platform: &Attributes, require_version: bool) -> bool {
    rules
        .iter()
        .any(|rule| rule.matches(platform, require_version))
}
