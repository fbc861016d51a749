//! NVD CVE JSON 1.0 feed types.
//!
//! These types model the NVD JSON feed format as already-materialized data.
//! Every wire field that the feed may omit is optional or defaulted, so a
//! sparse record deserializes into neutral values instead of failing.
//! See: https://nvd.nist.gov/vuln/data-feeds

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CvefeedError, ErrorContext, Result};

/// Decode a feed document.
pub fn parse_feed(json: &str) -> Result<NvdCveFeed> {
    Ok(serde_json::from_str(json)?)
}

/// Read and decode a feed file.
///
/// Errors carry the file path: IO failures as [`CvefeedError::Io`], malformed
/// JSON as [`CvefeedError::Feed`].
pub fn load_feed(path: &Path) -> Result<NvdCveFeed> {
    let json = std::fs::read_to_string(path).map_err(|e| CvefeedError::io(path, e))?;
    let feed = parse_feed(&json).with_context(|| path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        items = feed.cve_items.len(),
        "Loaded CVE feed"
    );
    Ok(feed)
}

/// Top-level feed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NvdCveFeed {
    #[serde(rename = "CVE_data_type")]
    pub data_type: String,
    #[serde(rename = "CVE_data_format")]
    pub data_format: String,
    #[serde(rename = "CVE_data_version")]
    pub data_version: String,
    #[serde(rename = "CVE_data_numberOfCVEs", skip_serializing_if = "Option::is_none")]
    pub number_of_cves: Option<String>,
    #[serde(rename = "CVE_Items")]
    pub cve_items: Vec<CveItem>,
}

/// One vulnerability record in the feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CveItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve: Option<Cve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurations: Option<Configurations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    #[serde(rename = "publishedDate", skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(rename = "lastModifiedDate", skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
}

/// CVE section of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Cve {
    pub data_type: String,
    pub data_format: String,
    pub data_version: String,
    #[serde(rename = "CVE_data_meta", skip_serializing_if = "Option::is_none")]
    pub cve_data_meta: Option<CveDataMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problemtype: Option<ProblemType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
}

/// Record identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CveDataMeta {
    /// e.g. "CVE-2021-44228"
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ASSIGNER")]
    pub assigner: String,
}

/// Weakness classifications (CWE).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemType {
    pub problemtype_data: Vec<ProblemTypeData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemTypeData {
    /// Language variants of one classification
    pub description: Vec<LangString>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Description {
    pub description_data: Vec<LangString>,
}

/// Text tagged with a language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangString {
    pub lang: String,
    pub value: String,
}

/// Applicability configuration of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configurations {
    #[serde(rename = "CVE_data_version")]
    pub data_version: String,
    pub nodes: Vec<Node>,
}

/// One node of the applicability tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// "AND", "OR" or empty
    pub operator: String,
    pub negate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cpe_match: Vec<CpeMatch>,
}

/// A single applicability rule.
///
/// Empty bound strings mean the bound is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpeMatch {
    pub vulnerable: bool,
    #[serde(rename = "cpe23Uri")]
    pub cpe23_uri: String,
    #[serde(rename = "cpe22Uri", skip_serializing_if = "String::is_empty")]
    pub cpe22_uri: String,
    #[serde(rename = "versionStartIncluding", skip_serializing_if = "String::is_empty")]
    pub version_start_including: String,
    #[serde(rename = "versionStartExcluding", skip_serializing_if = "String::is_empty")]
    pub version_start_excluding: String,
    #[serde(rename = "versionEndIncluding", skip_serializing_if = "String::is_empty")]
    pub version_end_including: String,
    #[serde(rename = "versionEndExcluding", skip_serializing_if = "String::is_empty")]
    pub version_end_excluding: String,
}

/// Impact metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Impact {
    #[serde(rename = "baseMetricV2", skip_serializing_if = "Option::is_none")]
    pub base_metric_v2: Option<BaseMetricV2>,
    #[serde(rename = "baseMetricV3", skip_serializing_if = "Option::is_none")]
    pub base_metric_v3: Option<BaseMetricV3>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMetricV2 {
    #[serde(rename = "cvssV2", skip_serializing_if = "Option::is_none")]
    pub cvss_v2: Option<CvssV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvssV2 {
    #[serde(rename = "baseScore")]
    pub base_score: f64,
    #[serde(rename = "vectorString")]
    pub vector_string: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseMetricV3 {
    #[serde(rename = "cvssV3", skip_serializing_if = "Option::is_none")]
    pub cvss_v3: Option<CvssV3>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvssV3 {
    #[serde(rename = "baseScore")]
    pub base_score: f64,
    #[serde(rename = "baseSeverity")]
    pub base_severity: String,
    #[serde(rename = "vectorString")]
    pub vector_string: String,
}
