//! Well-formed CPE names (WFN).
//!
//! A platform identifier is bound into [`Attributes`]: eleven attributes, each
//! holding either a literal, the logical value ANY ("matches anything") or the
//! logical value NA ("not applicable; matches only NA or ANY").
//!
//! Literal values are kept in quoted form: every character other than ASCII
//! alphanumerics and `_` is preceded by a backslash (`1.0` is stored as
//! `1\.0`). Unquoted `*` and `?` inside a literal are wildcards. Use
//! [`strip_slashes`] to recover the plain text, e.g. before comparing versions.
//!
//! Two bindings are accepted by [`parse`]:
//!
//! - **Formatted string** (CPE 2.3): `cpe:2.3:a:vendor:product:1.0:*:*:*:*:*:*:*`
//! - **URI** (CPE 2.2): `cpe:/a:vendor:product:1.0`

mod parse;

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CvefeedError, ErrorContext, ParseErrorKind};

pub use parse::parse;

/// Value of a single WFN attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AttributeValue {
    /// Logical ANY, matches every value
    #[default]
    Any,
    /// Logical NA, the attribute does not apply
    Na,
    /// Quoted literal, possibly containing unquoted `*`/`?` wildcards
    Literal(String),
}

impl AttributeValue {
    /// Build a literal from plain text, quoting every special character.
    ///
    /// `AttributeValue::literal("2.3.1")` holds `2\.3\.1`. Empty text has no
    /// literal binding and yields ANY.
    #[must_use]
    pub fn literal(plain: &str) -> Self {
        if plain.is_empty() {
            return Self::Any;
        }
        let mut quoted = String::with_capacity(plain.len() * 2);
        for c in plain.chars() {
            if !is_unquoted(c) {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        Self::Literal(quoted)
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    #[must_use]
    pub fn is_na(&self) -> bool {
        matches!(self, Self::Na)
    }

    /// The quoted literal, or `None` for ANY/NA.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Attribute-level match with `self` as the source value.
    ///
    /// ANY on either side matches, NA matches only NA, literals compare
    /// case-insensitively with `self`'s unquoted wildcards honoured.
    #[must_use]
    pub fn matches(&self, target: &Self) -> bool {
        match (self, target) {
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::Na, Self::Na) => true,
            (Self::Na, _) | (_, Self::Na) => false,
            (Self::Literal(src), Self::Literal(dst)) => literal_matches(src, dst),
        }
    }

    /// The compiled wildcard pattern of a literal holding unquoted `*`/`?`.
    fn wildcard_pattern(&self) -> Option<Result<Regex, ParseErrorKind>> {
        match self {
            Self::Literal(s) if has_unquoted_wildcard(s) => Some(compile_wildcard(s)),
            _ => None,
        }
    }

    fn fmt_fs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Na => f.write_str("-"),
            Self::Literal(s) => {
                let mut chars = s.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        match chars.next() {
                            Some(q @ ('.' | '-' | '_')) => write!(f, "{q}")?,
                            Some(q) => write!(f, "\\{q}")?,
                            None => f.write_str("\\\\")?,
                        }
                    } else {
                        write!(f, "{c}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// A CPE name bound into its attributes.
///
/// `Default` is the all-ANY name, which matches every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    /// `a` (application), `o` (operating system) or `h` (hardware)
    pub part: AttributeValue,
    pub vendor: AttributeValue,
    pub product: AttributeValue,
    pub version: AttributeValue,
    pub update: AttributeValue,
    pub edition: AttributeValue,
    pub language: AttributeValue,
    pub sw_edition: AttributeValue,
    pub target_sw: AttributeValue,
    pub target_hw: AttributeValue,
    pub other: AttributeValue,
}

impl Attributes {
    /// Build an application name from plain vendor, product and version text.
    #[must_use]
    pub fn application(vendor: &str, product: &str, version: &str) -> Self {
        Self {
            part: AttributeValue::Literal("a".to_string()),
            vendor: AttributeValue::literal(vendor),
            product: AttributeValue::literal(product),
            version: AttributeValue::literal(version),
            ..Self::default()
        }
    }

    /// Structural match of `self` (the source, e.g. a rule target) against a
    /// platform, attribute by attribute.
    ///
    /// Version is compared like every other attribute; range handling is the
    /// caller's concern.
    #[must_use]
    pub fn matches(&self, platform: &Self) -> bool {
        self.fields()
            .iter()
            .zip(platform.fields())
            .all(|(src, dst)| src.matches(dst))
    }

    fn fields(&self) -> [&AttributeValue; 11] {
        [
            &self.part,
            &self.vendor,
            &self.product,
            &self.version,
            &self.update,
            &self.edition,
            &self.language,
            &self.sw_edition,
            &self.target_sw,
            &self.target_hw,
            &self.other,
        ]
    }
}

/// A source name prepared for repeated matching.
///
/// Wildcard literals are compiled into regexes once, here, so that matching
/// many platforms against the same name never recompiles them.
#[derive(Debug, Clone)]
pub struct CompiledAttributes {
    attrs: Attributes,
    /// One entry per attribute, `Some` for wildcard literals
    patterns: Vec<Option<Regex>>,
}

impl CompiledAttributes {
    /// Compile every wildcard literal of `attrs`.
    pub fn new(attrs: Attributes) -> Result<Self, ParseErrorKind> {
        let patterns = attrs
            .fields()
            .iter()
            .map(|value| value.wildcard_pattern().transpose())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { attrs, patterns })
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    /// Same result as [`Attributes::matches`], using the compiled patterns.
    #[must_use]
    pub fn matches(&self, platform: &Attributes) -> bool {
        self.attrs
            .fields()
            .iter()
            .zip(platform.fields())
            .zip(&self.patterns)
            .all(|((src, dst), pattern)| match (pattern, dst) {
                (Some(re), AttributeValue::Literal(text)) => re.is_match(&strip_slashes(text)),
                _ => src.matches(dst),
            })
    }
}

impl PartialEq for CompiledAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.attrs == other.attrs
    }
}

impl Eq for CompiledAttributes {}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cpe:2.3")?;
        for value in self.fields() {
            f.write_str(":")?;
            value.fmt_fs(f)?;
        }
        Ok(())
    }
}

impl FromStr for Attributes {
    type Err = CvefeedError;

    /// Bind `s`, keeping the offending text in the error context.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).with_context(|| s.trim().to_string())
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Remove WFN quoting from a literal (`2\.3\.1` becomes `2.3.1`).
#[must_use]
pub fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Characters that are never quoted inside a literal.
pub(crate) fn is_unquoted(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True if `s` holds an unquoted `*` or `?`.
fn has_unquoted_wildcard(s: &str) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

/// Compile a quoted literal with wildcards into an anchored, case-insensitive
/// regex over plain text: unquoted `*` is `.*`, unquoted `?` is `.`.
fn compile_wildcard(quoted: &str) -> Result<Regex, ParseErrorKind> {
    let mut pattern = String::with_capacity(quoted.len() * 2 + 2);
    pattern.push('^');
    let mut buf = [0u8; 4];
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().unwrap_or('\\');
                pattern.push_str(&regex::escape(escaped.encode_utf8(&mut buf)));
            }
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    pattern.push('$');

    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| ParseErrorKind::InvalidPattern(format!("{quoted}: {e}")))
}

fn literal_matches(src: &str, dst: &str) -> bool {
    if !has_unquoted_wildcard(src) {
        return src.eq_ignore_ascii_case(dst);
    }
    compile_wildcard(src).is_ok_and(|re| re.is_match(&strip_slashes(dst)))
}
