//! Path Parser
//!
//! Recursive descent parser for the path subset:
//!
//! ```text
//! path     := '/' relative? | relative
//! relative := step ('/' step)*
//! step     := '.' | test predicate* | '@' (name | '*') predicate*
//! test     := name | '*' | 'text' '(' ')' | 'node' '(' ')'
//! predicate := '[' integer ']'
//! ```
//!
//! An attribute step may only appear last.

use super::lexer::{Lexer, Token};

/// Parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    /// Starts at the document node rather than the context node
    pub absolute: bool,
    pub steps: Vec<Step>,
}

/// Location step in a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub test: NodeTest,
    /// 1-based positions, applied in order to each parent's matches
    pub positions: Vec<usize>,
}

/// What a step selects from the current node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// . - the node itself
    SelfNode,
    /// Child elements with this name
    Name(String),
    /// * - any child element
    AnyElement,
    /// text() - child text and CDATA nodes
    Text,
    /// node() - any child node
    Node,
    /// @name
    Attribute(String),
    /// @*
    AnyAttribute,
}

impl NodeTest {
    pub fn is_attribute(&self) -> bool {
        matches!(self, NodeTest::Attribute(_) | NodeTest::AnyAttribute)
    }
}

/// Path parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, String> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Parser { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            token if token == expected => Ok(()),
            token => Err(format!("expected {:?}, found {:?}", expected, token)),
        }
    }

    /// Parse the whole input as a path
    pub fn parse(&mut self) -> Result<PathExpr, String> {
        let absolute = match self.peek() {
            Token::Eof => return Err("empty path".to_string()),
            Token::Slash => {
                self.next();
                true
            }
            _ => false,
        };

        let mut steps = Vec::new();
        if absolute && *self.peek() == Token::Eof {
            return Ok(PathExpr { absolute, steps });
        }

        loop {
            let step = self.parse_step()?;
            let attribute = step.test.is_attribute();
            steps.push(step);

            match self.next() {
                Token::Eof => break,
                Token::Slash if attribute => {
                    return Err("attribute step must be the last step".to_string());
                }
                Token::Slash => {}
                token => return Err(unexpected(&token)),
            }
        }

        Ok(PathExpr { absolute, steps })
    }

    fn parse_step(&mut self) -> Result<Step, String> {
        let test = match self.next() {
            Token::Dot => return Ok(Step { test: NodeTest::SelfNode, positions: Vec::new() }),
            Token::Name(name) => NodeTest::Name(name),
            Token::Star => NodeTest::AnyElement,
            Token::NodeType(kind) => {
                self.expect(Token::LeftParen)?;
                self.expect(Token::RightParen)?;
                if kind == "text" {
                    NodeTest::Text
                } else {
                    NodeTest::Node
                }
            }
            Token::At => match self.next() {
                Token::Name(name) => NodeTest::Attribute(name),
                Token::Star => NodeTest::AnyAttribute,
                token => return Err(format!("expected attribute name after '@', found {:?}", token)),
            },
            token => return Err(unexpected(&token)),
        };

        let mut positions = Vec::new();
        while *self.peek() == Token::LeftBracket {
            self.next();
            match self.next() {
                Token::Number(n) => positions.push(n),
                token => return Err(format!("only numeric positions are supported, found {:?}", token)),
            }
            self.expect(Token::RightBracket)?;
        }

        Ok(Step { test, positions })
    }
}

fn unexpected(token: &Token) -> String {
    match token {
        Token::DoubleSlash => "descendant steps '//' are not supported".to_string(),
        Token::DoubleDot => "parent steps '..' are not supported".to_string(),
        Token::Eof => "unexpected end of path".to_string(),
        other => format!("unexpected {:?}", other),
    }
}

/// Parse a path string
pub fn parse(path: &str) -> Result<PathExpr, String> {
    Parser::new(path)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Step {
        Step { test: NodeTest::Name(n.to_string()), positions: Vec::new() }
    }

    #[test]
    fn test_parse_absolute() {
        let expr = parse("/report/summary").unwrap();
        assert!(expr.absolute);
        assert_eq!(expr.steps, [name("report"), name("summary")]);
    }

    #[test]
    fn test_parse_root_only() {
        let expr = parse("/").unwrap();
        assert!(expr.absolute);
        assert!(expr.steps.is_empty());
    }

    #[test]
    fn test_parse_relative_attribute() {
        let expr = parse("@type").unwrap();
        assert!(!expr.absolute);
        assert_eq!(expr.steps[0].test, NodeTest::Attribute("type".to_string()));
    }

    #[test]
    fn test_parse_positions() {
        let expr = parse("/bookstore/book[2][1]/title/text()").unwrap();
        assert_eq!(expr.steps[1].positions, [2, 1]);
        assert_eq!(expr.steps[3].test, NodeTest::Text);
    }

    #[test]
    fn test_parse_wildcards() {
        let expr = parse("./*/node()/@*").unwrap();
        let tests: Vec<_> = expr.steps.iter().map(|s| s.test.clone()).collect();
        assert_eq!(
            tests,
            [NodeTest::SelfNode, NodeTest::AnyElement, NodeTest::Node, NodeTest::AnyAttribute]
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "//a", "a/", "a/../b", "@a/b", "a[", "a[b]", "a]", "text(", "@", "a b", ".[1]"] {
            assert!(parse(bad).is_err(), "should reject {:?}", bad);
        }
    }
}
