//! Unbinding of CPE formatted strings and URIs into [`Attributes`].

use super::{is_unquoted, AttributeValue, Attributes};
use crate::error::ParseErrorKind;

const FS_PREFIX: &str = "cpe:2.3:";
const URI_PREFIX: &str = "cpe:/";

/// Attributes following the prefix of a formatted string.
const FS_COMPONENTS: usize = 11;
/// Attributes a URI may carry (part through language).
const URI_COMPONENTS: usize = 7;

/// Parse a CPE 2.3 formatted string or a CPE 2.2 URI.
pub fn parse(raw: &str) -> Result<Attributes, ParseErrorKind> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ParseErrorKind::Empty);
    }

    let attrs = if let Some(rest) = raw.strip_prefix(FS_PREFIX) {
        parse_formatted(rest)?
    } else if let Some(rest) = raw.strip_prefix(URI_PREFIX) {
        parse_uri(rest)?
    } else {
        return Err(ParseErrorKind::InvalidPrefix);
    };

    validate_part(&attrs.part)?;
    Ok(attrs)
}

fn parse_formatted(rest: &str) -> Result<Attributes, ParseErrorKind> {
    let parts = split_unescaped(rest);
    if parts.len() != FS_COMPONENTS {
        return Err(ParseErrorKind::ComponentCount {
            expected: FS_COMPONENTS.to_string(),
            found: parts.len(),
        });
    }

    let mut values = parts
        .into_iter()
        .map(fs_value)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let mut next = || values.next().unwrap_or_default();

    Ok(Attributes {
        part: next(),
        vendor: next(),
        product: next(),
        version: next(),
        update: next(),
        edition: next(),
        language: next(),
        sw_edition: next(),
        target_sw: next(),
        target_hw: next(),
        other: next(),
    })
}

/// Split on `:` that is not preceded by a backslash escape.
fn split_unescaped(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b':' => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn fs_value(component: &str) -> Result<AttributeValue, ParseErrorKind> {
    match component {
        "" | "*" => return Ok(AttributeValue::Any),
        "-" => return Ok(AttributeValue::Na),
        _ => {}
    }

    let mut quoted = String::with_capacity(component.len() * 2);
    let mut chars = component.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| ParseErrorKind::InvalidEscape(component.to_string()))?;
                quoted.push('\\');
                quoted.push(escaped);
            }
            '*' | '?' => quoted.push(c),
            c if is_unquoted(c) => quoted.push(c),
            c => {
                quoted.push('\\');
                quoted.push(c);
            }
        }
    }
    Ok(AttributeValue::Literal(quoted))
}

fn parse_uri(rest: &str) -> Result<Attributes, ParseErrorKind> {
    let parts: Vec<&str> = rest.split(':').collect();
    if parts.len() > URI_COMPONENTS {
        return Err(ParseErrorKind::ComponentCount {
            expected: format!("at most {URI_COMPONENTS}"),
            found: parts.len(),
        });
    }

    let value = |i: usize| parts.get(i).map_or(Ok(AttributeValue::Any), |c| uri_value(c));

    let mut attrs = Attributes {
        part: value(0)?,
        vendor: value(1)?,
        product: value(2)?,
        version: value(3)?,
        update: value(4)?,
        language: value(6)?,
        ..Attributes::default()
    };

    match parts.get(5) {
        Some(edition) if is_packed_edition(edition) => {
            let packed: Vec<&str> = edition.split('~').collect();
            attrs.edition = uri_value(packed[1])?;
            attrs.sw_edition = uri_value(packed[2])?;
            attrs.target_sw = uri_value(packed[3])?;
            attrs.target_hw = uri_value(packed[4])?;
            attrs.other = uri_value(packed[5])?;
        }
        Some(edition) => attrs.edition = uri_value(edition)?,
        None => {}
    }

    Ok(attrs)
}

/// `~edition~sw_edition~target_sw~target_hw~other`
fn is_packed_edition(edition: &str) -> bool {
    edition.starts_with('~') && edition.split('~').count() == 6
}

fn uri_value(component: &str) -> Result<AttributeValue, ParseErrorKind> {
    match component {
        "" => return Ok(AttributeValue::Any),
        "-" => return Ok(AttributeValue::Na),
        _ => {}
    }

    let invalid = || ParseErrorKind::InvalidPercentEncoding(component.to_string());
    let mut quoted = String::with_capacity(component.len() * 2);
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = char::from(bytes[i]);
        if c == '%' {
            let hex = component
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(invalid)?;
            let byte = u8::from_str_radix(hex, 16).map_err(|_| invalid())?;
            match byte {
                0x01 => quoted.push('?'),
                0x02 => quoted.push('*'),
                b if b.is_ascii_graphic() => push_quoted(&mut quoted, char::from(b)),
                _ => return Err(invalid()),
            }
            i += 3;
            continue;
        }
        if !c.is_ascii() {
            return Err(invalid());
        }
        push_quoted(&mut quoted, c);
        i += 1;
    }
    Ok(AttributeValue::Literal(quoted))
}

fn push_quoted(out: &mut String, c: char) {
    if !is_unquoted(c) {
        out.push('\\');
    }
    out.push(c);
}

fn validate_part(part: &AttributeValue) -> Result<(), ParseErrorKind> {
    match part {
        AttributeValue::Any => Ok(()),
        AttributeValue::Literal(p) if matches!(p.to_ascii_lowercase().as_str(), "a" | "o" | "h") => {
            Ok(())
        }
        AttributeValue::Literal(p) => Err(ParseErrorKind::InvalidPart(p.clone())),
        AttributeValue::Na => Err(ParseErrorKind::InvalidPart("-".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> AttributeValue {
        AttributeValue::Literal(s.to_string())
    }

    #[test]
    fn test_parse_formatted_string() {
        let cpe = parse("cpe:2.3:a:apache:log4j:2.14.1:*:*:*:*:*:*:*").expect("valid");
        assert_eq!(cpe.part, lit("a"));
        assert_eq!(cpe.vendor, lit("apache"));
        assert_eq!(cpe.product, lit("log4j"));
        assert_eq!(cpe.version, lit("2\\.14\\.1"));
        assert_eq!(cpe.update, AttributeValue::Any);
        assert_eq!(cpe.other, AttributeValue::Any);
    }

    #[test]
    fn test_parse_formatted_na_and_escapes() {
        let cpe = parse("cpe:2.3:o:microsoft:windows\\:nt:-:sp1:*:*:*:*:x64:*").expect("valid");
        assert_eq!(cpe.product, lit("windows\\:nt"));
        assert_eq!(cpe.version, AttributeValue::Na);
        assert_eq!(cpe.update, lit("sp1"));
        assert_eq!(cpe.target_hw, lit("x64"));
    }

    #[test]
    fn test_parse_formatted_wildcards() {
        let cpe = parse("cpe:2.3:a:vendor:product:1.*:*:*:*:*:*:*:*").expect("valid");
        assert_eq!(cpe.version, lit("1\\.*"));
    }

    #[test]
    fn test_parse_uri() {
        let cpe = parse("cpe:/a:apache:http_server:2.4.52").expect("valid");
        assert_eq!(cpe.part, lit("a"));
        assert_eq!(cpe.product, lit("http_server"));
        assert_eq!(cpe.version, lit("2\\.4\\.52"));
        assert_eq!(cpe.update, AttributeValue::Any);
        assert_eq!(cpe.language, AttributeValue::Any);
    }

    #[test]
    fn test_parse_uri_percent_and_packed_edition() {
        let cpe = parse("cpe:/a:foo%21bar:baz:1.0:-:~~~android~~:en").expect("valid");
        assert_eq!(cpe.vendor, lit("foo\\!bar"));
        assert_eq!(cpe.update, AttributeValue::Na);
        assert_eq!(cpe.edition, AttributeValue::Any);
        assert_eq!(cpe.target_sw, lit("android"));
        assert_eq!(cpe.language, lit("en"));
    }

    #[test]
    fn test_formatted_and_uri_agree() {
        let fs = parse("cpe:2.3:a:openssl:openssl:1.0.1f:*:*:*:*:*:*:*").expect("fs");
        let uri = parse("cpe:/a:openssl:openssl:1.0.1f").expect("uri");
        assert_eq!(fs, uri);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(ParseErrorKind::Empty));
        assert_eq!(parse("   "), Err(ParseErrorKind::Empty));
        assert_eq!(parse("pkg:npm/left-pad"), Err(ParseErrorKind::InvalidPrefix));
        assert!(matches!(
            parse("cpe:2.3:a:vendor:product"),
            Err(ParseErrorKind::ComponentCount { found: 3, .. })
        ));
        assert!(matches!(
            parse("cpe:2.3:x:vendor:product:1:*:*:*:*:*:*:*"),
            Err(ParseErrorKind::InvalidPart(_))
        ));
        assert!(matches!(
            parse("cpe:2.3:a:vendor:product\\"),
            Err(ParseErrorKind::ComponentCount { .. })
        ));
        assert!(matches!(
            parse("cpe:/a:vendor:product:1%zz"),
            Err(ParseErrorKind::InvalidPercentEncoding(_))
        ));
        assert!(matches!(
            parse("cpe:/a:b:c:d:e:f:g:h"),
            Err(ParseErrorKind::ComponentCount { found: 8, .. })
        ));
    }

    #[test]
    fn test_dangling_escape() {
        assert!(matches!(
            fs_value("abc\\"),
            Err(ParseErrorKind::InvalidEscape(_))
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let raw = "cpe:2.3:a:vendor:my-product:1.0:beta:*:*:*:*:*:*";
        let cpe = parse(raw).expect("valid");
        assert_eq!(cpe.to_string(), raw);
        assert_eq!(parse(&cpe.to_string()).expect("round trip"), cpe);
    }
}
