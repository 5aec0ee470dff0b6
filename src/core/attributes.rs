//! XML Attribute Parsing
//!
//! Parses XML attributes from tag content.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use std::borrow::Cow;
use std::collections::HashSet;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a str,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, str>,
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'.
/// Values must be quoted, names unique, and consecutive attributes
/// separated by whitespace. Literal tabs and line breaks in values become
/// spaces; character references to them are kept.
pub fn parse_attributes(input: &str) -> Result<Vec<Attribute<'_>>, &'static str> {
    let bytes = input.as_bytes();
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut pos = 0;

    loop {
        let ws_start = pos;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        if pos == ws_start && !attrs.is_empty() {
            return Err("Whitespace required between attributes");
        }

        // Parse attribute name
        if !is_name_start_char(bytes[pos]) {
            return Err("Attribute name must start with letter, underscore, or colon");
        }
        let name_start = pos;
        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        // Skip whitespace around '='
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if bytes.get(pos) != Some(&b'=') {
            return Err("Attribute value required");
        }
        pos += 1;
        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        let quote = match bytes.get(pos).copied() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err("Attribute value must be quoted"),
        };
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() && bytes[pos] != quote {
            if bytes[pos] == b'<' {
                return Err("Attribute value cannot contain '<'");
            }
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err("Attribute value has mismatched quotes");
        }

        let value = attribute_value(&input[value_start..pos])?;
        pos += 1; // Skip closing quote

        if !seen.insert(name) {
            return Err("Duplicate attribute");
        }
        attrs.push(Attribute { name, value });
    }

    Ok(attrs)
}

/// Normalize literal whitespace, then decode references
fn attribute_value(raw: &str) -> Result<Cow<'_, str>, &'static str> {
    if !raw.bytes().any(|b| matches!(b, b'\t' | b'\n' | b'\r')) {
        return decode_text(raw);
    }

    // "\r\n" is a single line break
    let normalized = raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " ");
    decode_text(&normalized).map(|value| Cow::Owned(value.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_attributes() {
        let attrs = parse_attributes(" type=\"virtualuser\" avg=\"1,234\"").unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "type");
        assert_eq!(attrs[0].value, "virtualuser");
        assert_eq!(attrs[1].name, "avg");
        assert_eq!(attrs[1].value, "1,234");
    }

    #[test]
    fn test_single_quoted() {
        let attrs = parse_attributes(" id='test'").unwrap();
        assert_eq!(attrs[0].value, "test");
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(" avg=\"&lt;0.01\"").unwrap();
        assert_eq!(attrs[0].value, "<0.01");
    }

    #[test]
    fn test_empty_attributes() {
        assert!(parse_attributes("").unwrap().is_empty());
        assert!(parse_attributes("   ").unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_handling() {
        let attrs = parse_attributes("  id  =  \"test\"  ").unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name, "id");
        assert_eq!(attrs[0].value, "test");
    }

    #[test]
    fn test_value_whitespace_normalized() {
        let attrs = parse_attributes(" avg=\"1\n234\" b=\"2,5\t%\" c=\"x\r\ny\ry\"").unwrap();
        assert_eq!(attrs[0].value, "1 234");
        assert_eq!(attrs[1].value, "2,5 %");
        assert_eq!(attrs[2].value, "x y y");
    }

    #[test]
    fn test_whitespace_references_kept() {
        let attrs = parse_attributes(" a=\"1&#10;2&#9;3\" b=\"&#13;\n&lt;\"").unwrap();
        assert_eq!(attrs[0].value, "1\n2\t3");
        assert_eq!(attrs[1].value, "\r <");
    }

    #[test]
    fn test_many_attributes() {
        let input: String = (0..5000).map(|i| format!(" a{i}=\"{i}\"")).collect();
        let attrs = parse_attributes(&input).unwrap();
        assert_eq!(attrs.len(), 5000);
        assert_eq!(attrs[4999].value, "4999");
        assert!(parse_attributes(&format!("{input} a17=\"x\"")).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_attributes(" a=b").is_err());
        assert!(parse_attributes(" a").is_err());
        assert!(parse_attributes(" a=\"1").is_err());
        assert!(parse_attributes(" a=\"1\"b=\"2\"").is_err());
        assert!(parse_attributes(" a=\"1\" a=\"2\"").is_err());
        assert!(parse_attributes(" a=\"<\"").is_err());
    }
}
