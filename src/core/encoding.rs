//! XML Encoding Detection and Conversion
//!
//! Handles detection of UTF-16 based on BOM or byte patterns and converts
//! everything to a UTF-8 `String` for parsing.

use crate::error::ParseError;

/// Detected encoding of XML input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] => XmlEncoding::Utf16Be,
            // No BOM - '<' next to a NUL byte means UTF-16
            [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            _ => XmlEncoding::Utf8,
        }
    }
}

/// Decode raw document bytes into UTF-8 text, dropping any byte order mark
pub fn decode_document(input: Vec<u8>) -> Result<String, ParseError> {
    match XmlEncoding::detect(&input) {
        XmlEncoding::Utf8 => {
            let mut input = input;
            if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
                input.drain(..3);
            }
            String::from_utf8(input)
                .map_err(|e| ParseError::new("Invalid UTF-8 encoding", e.utf8_error().valid_up_to()))
        }
        XmlEncoding::Utf16Le => decode_utf16(&input, [0xFF, 0xFE], u16::from_le_bytes),
        XmlEncoding::Utf16Be => decode_utf16(&input, [0xFE, 0xFF], u16::from_be_bytes),
    }
}

fn decode_utf16(input: &[u8], bom: [u8; 2], to_unit: fn([u8; 2]) -> u16) -> Result<String, ParseError> {
    let bytes = input.strip_prefix(&bom[..]).unwrap_or(input);

    if bytes.len() % 2 != 0 {
        return Err(ParseError::new("Invalid UTF-16: odd number of bytes", input.len()));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| to_unit([chunk[0], chunk[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|_| ParseError::new("Invalid UTF-16 encoding", 0))
}
