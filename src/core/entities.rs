//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references
///
/// Returns Borrowed if no entities present (zero-copy), Owned otherwise.
/// Bare `&`, unterminated references and entities other than the five
/// predefined ones are rejected, since no DTD is ever consulted.
#[inline]
pub fn decode_text(input: &str) -> Result<Cow<'_, str>, &'static str> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_entities(input).map(Cow::Owned)
}

fn decode_entities(input: &str) -> Result<String, &'static str> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp_pos) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp_pos]);
        rest = &rest[amp_pos + 1..];

        let semi = memchr(b';', rest.as_bytes()).ok_or("Unterminated entity reference")?;
        let entity = &rest[..semi];
        result.push(decode_entity(entity)?);
        rest = &rest[semi + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Result<char, &'static str> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric).ok_or("Invalid character reference");
    }

    match entity {
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        "" => Err("Bare '&' not allowed"),
        _ => Err("Undeclared entity reference"),
    }
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => entity.parse::<u32>().ok()?,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

/// Encode text for XML output (escape markup characters)
pub fn encode_text(input: &str) -> Cow<'_, str> {
    encode_with(input, false)
}

/// Encode text for use in double-quoted XML attributes
pub fn encode_attribute(input: &str) -> Cow<'_, str> {
    encode_with(input, true)
}

fn encode_with(input: &str, in_attribute: bool) -> Cow<'_, str> {
    let needs_escape = |b: u8| {
        matches!(b, b'<' | b'>' | b'&') || (in_attribute && matches!(b, b'"' | b'\t' | b'\n' | b'\r'))
    };
    if !input.bytes().any(needs_escape) {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' if in_attribute => result.push_str("&quot;"),
            // Literal whitespace would be normalized to a space on re-parse
            '\t' if in_attribute => result.push_str("&#9;"),
            '\n' if in_attribute => result.push_str("&#10;"),
            '\r' if in_attribute => result.push_str("&#13;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
