//! Version comparison utilities.
//!
//! Feed version bounds are free-form strings ("2.4.1", "95SE", "11b.4.16-beta"),
//! so they are compared with a natural ordering rather than semantic versioning:
//! digit runs compare as integers, the text that follows them compares
//! byte-wise, and ASCII punctuation separates the parts.

use std::cmp::Ordering;

/// Compare two version strings.
///
/// Gives meaningful results when both sides follow the same convention,
/// e.g. "95SE" vs "98SP1" or "16.3.2" vs "3.7.0", but not "2000" vs "11.7".
/// When every compared part is equal, the longer string is greater.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (mut s1, mut s2) = (a.as_bytes(), b.as_bytes());

    while !s1.is_empty() && !s2.is_empty() {
        let p1 = VersionPart::scan(s1);
        let p2 = VersionPart::scan(s2);

        match compare_numbers(p1.number(s1), p2.number(s2)) {
            Ordering::Equal => {}
            other => return other,
        }
        match p1.literal(s1).cmp(p2.literal(s2)) {
            Ordering::Equal => {}
            other => return other,
        }

        s1 = &s1[p1.next..];
        s2 = &s2[p2.next..];
    }

    a.len().cmp(&b.len())
}

/// Compare two ASCII digit runs by value, with no size limit.
///
/// An empty run counts as zero.
fn compare_numbers(a: &[u8], b: &[u8]) -> Ordering {
    let (a, b) = (strip_leading_zeros(a), strip_leading_zeros(b));
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let zeros = digits.iter().take_while(|&&d| d == b'0').count();
    &digits[zeros..]
}

/// Boundaries of the leading part of a version string.
///
/// `scan(b"11b.4.16-New_Year_Edition")` yields `digits = 2`,
/// `literal_end = 3` and `next = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VersionPart {
    /// Length of the leading digit run
    digits: usize,
    /// End of the span compared as text (exclusive)
    literal_end: usize,
    /// Where the next part starts (past one separator, if any)
    next: usize,
}

impl VersionPart {
    fn scan(v: &[u8]) -> Self {
        let digits = v.iter().take_while(|b| b.is_ascii_digit()).count();

        if digits == v.len() {
            return Self {
                digits,
                literal_end: digits,
                next: digits,
            };
        }

        match v.iter().position(|&b| b.is_ascii_punctuation()) {
            Some(sep) => Self {
                digits,
                literal_end: sep,
                next: sep + 1,
            },
            None => Self {
                digits,
                literal_end: v.len(),
                next: v.len(),
            },
        }
    }

    fn number<'a>(&self, v: &'a [u8]) -> &'a [u8] {
        &v[..self.digits]
    }

    fn literal<'a>(&self, v: &'a [u8]) -> &'a [u8] {
        &v[self.digits..self.literal_end]
    }
}
