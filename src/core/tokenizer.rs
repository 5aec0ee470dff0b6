//! XML Tokenizer - pull tokenizer with well-formedness checks
//!
//! Extracts XML tokens from already-decoded UTF-8 text:
//! - Element start/end/empty tags (attributes parsed and decoded)
//! - Text content (entities decoded)
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (skipped, internal subset included)
//!
//! Structural checks that need a tag stack (matching end tags, single root)
//! are done by the DOM builder.

use super::attributes::{parse_attributes, Attribute};
use super::entities::decode_text;
use super::scanner::{is_whitespace, Scanner};
use crate::error::ParseError;
use std::borrow::Cow;

/// A parsed XML token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `<name attrs...>` or `<name attrs.../>` when `empty`
    StartTag {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
        empty: bool,
    },
    /// `</name>`
    EndTag { name: &'a str },
    /// Text content between tags
    Text(Cow<'a, str>),
    /// `<![CDATA[...]]>` content
    CData(&'a str),
    /// `<!--...-->` content
    Comment(&'a str),
    /// `<?target data?>`
    ProcessingInstruction { target: &'a str, data: &'a str },
    /// `<?xml ...?>`
    XmlDeclaration,
    /// `<!DOCTYPE ...>`
    DocType,
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    text: &'a str,
    scanner: Scanner<'a>,
    /// Offset where the current token started, for error reporting
    token_start: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            scanner: Scanner::new(text.as_bytes()),
            token_start: 0,
        }
    }

    /// Byte offset where the most recent token started
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.token_start)
    }

    fn unexpected_eof(&self) -> ParseError {
        ParseError::new("Unexpected end of input", self.text.len())
    }

    /// Slice the source text; every boundary we use sits on an ASCII delimiter
    fn str_slice(&self, start: usize, end: usize) -> Result<&'a str, ParseError> {
        self.text
            .get(start..end)
            .ok_or_else(|| ParseError::new("Invalid UTF-8 boundary", start))
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if self.scanner.is_eof() {
            return Ok(None);
        }
        self.token_start = self.scanner.position();

        let token = match self.scanner.peek() {
            Some(b'<') => self.parse_markup(),
            Some(_) => self.parse_text(),
            None => return Ok(None),
        };
        if token.is_err() {
            // Stop at the first error
            self.scanner.set_position(self.text.len());
        }
        token.map(Some)
    }

    fn parse_markup(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '<'

        if self.scanner.starts_with(b"/") {
            self.parse_end_tag()
        } else if self.scanner.starts_with(b"!--") {
            self.parse_comment()
        } else if self.scanner.starts_with(b"![CDATA[") {
            self.parse_cdata()
        } else if self.scanner.starts_with(b"!DOCTYPE") {
            self.parse_doctype()
        } else if self.scanner.starts_with(b"!") {
            Err(self.error("Invalid declaration - expected comment, CDATA, or DOCTYPE"))
        } else if self.scanner.starts_with(b"?") {
            self.parse_pi()
        } else if self.scanner.is_eof() {
            Err(self.unexpected_eof())
        } else {
            self.parse_start_tag()
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self) -> Result<Token<'a>, ParseError> {
        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid element name: must start with letter, underscore, or colon"));
        }
        let name_end = self.scanner.position();

        let end = self.scanner.find_tag_end_quoted().ok_or_else(|| self.unexpected_eof())?;
        let empty = end > name_end && self.text.as_bytes()[end - 1] == b'/';
        let attr_end = if empty { end - 1 } else { end };

        let name = self.str_slice(name_start, name_end)?;
        let attr_content = self.str_slice(name_end, attr_end)?;
        if !attr_content.is_empty() && !is_whitespace(attr_content.as_bytes()[0]) {
            return Err(self.error(format!("Invalid character in element name <{}", name)));
        }
        let attributes = parse_attributes(attr_content).map_err(|msg| self.error(msg))?;

        self.scanner.set_position(end + 1);
        Ok(Token::StartTag { name, attributes, empty })
    }

    fn parse_end_tag(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '/'

        let name_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid element name in end tag"));
        }
        let name = self.str_slice(name_start, self.scanner.position())?;

        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => self.scanner.advance(1),
            Some(_) => return Err(self.error("End tag cannot have attributes or other content")),
            None => return Err(self.unexpected_eof()),
        }

        Ok(Token::EndTag { name })
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(3); // Skip '!--'
        let content_start = self.scanner.position();
        let end = self.scanner.find_sequence(b"-->").ok_or_else(|| self.unexpected_eof())?;
        let content = self.str_slice(content_start, end)?;

        if content.contains("--") || content.ends_with('-') {
            return Err(self.error("'--' not allowed inside comment"));
        }

        self.scanner.set_position(end + 3);
        Ok(Token::Comment(content))
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(8); // Skip '![CDATA['
        let content_start = self.scanner.position();
        let end = self.scanner.find_sequence(b"]]>").ok_or_else(|| self.unexpected_eof())?;
        let content = self.str_slice(content_start, end)?;

        self.scanner.set_position(end + 3);
        Ok(Token::CData(content))
    }

    /// Skip a DOCTYPE declaration, including any internal subset
    fn parse_doctype(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(8); // Skip '!DOCTYPE'

        let mut quote: Option<u8> = None;
        let mut subset_depth = 0usize;
        while let Some(b) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, b) {
                (Some(q), _) if q == b => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => subset_depth += 1,
                (None, b']') => subset_depth = subset_depth.saturating_sub(1),
                (None, b'>') if subset_depth == 0 => return Ok(Token::DocType),
                _ => {}
            }
        }
        Err(self.unexpected_eof())
    }

    /// Parse a processing instruction or the XML declaration
    fn parse_pi(&mut self) -> Result<Token<'a>, ParseError> {
        self.scanner.advance(1); // Skip '?'

        let target_start = self.scanner.position();
        if self.scanner.read_name().is_none() {
            return Err(self.error("Invalid processing instruction target"));
        }
        let target = self.str_slice(target_start, self.scanner.position())?;

        let end = self.scanner.find_sequence(b"?>").ok_or_else(|| self.unexpected_eof())?;
        let data_start = self.scanner.position();
        if data_start < end && !is_whitespace(self.text.as_bytes()[data_start]) {
            return Err(self.error("Invalid character after PI target name"));
        }
        let data = self.str_slice(data_start, end)?.trim_start();
        self.scanner.set_position(end + 2);

        if target == "xml" {
            if self.token_start != 0 {
                return Err(self.error("XML declaration must come first in the document"));
            }
            return Ok(Token::XmlDeclaration);
        }
        if target.eq_ignore_ascii_case("xml") {
            return Err(self.error("Processing instruction target cannot be 'xml' (reserved name)"));
        }

        Ok(Token::ProcessingInstruction { target, data })
    }

    /// Parse text content up to the next '<'
    fn parse_text(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start().unwrap_or(self.text.len());
        let content = self.str_slice(start, end)?;

        if content.contains("]]>") {
            return Err(self.error("']]>' not allowed in text content"));
        }
        let decoded = decode_text(content).map_err(|msg| self.error(msg))?;

        self.scanner.set_position(end);
        Ok(Token::Text(decoded))
    }
}

/// Iterator adapter for tokenizer
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}
