//! Path Lexer
//!
//! Tokenizes path expressions. Only the tokens the path subset can use are
//! produced; anything else is reported as an error so the parser can name it.

/// Path token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Slash,       // /
    DoubleSlash, // //
    Dot,         // .
    DoubleDot,   // ..
    At,          // @
    Star,        // *

    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]

    /// Unsigned integer literal
    Number(usize),
    /// Element or attribute name
    Name(String),
    /// node() or text()
    NodeType(String),

    Eof,
}

/// Path lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance by n bytes
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance(c.len_utf8());
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };

        let token = match c {
            '/' => {
                self.advance(1);
                if self.peek() == Some('/') {
                    self.advance(1);
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '.' => {
                self.advance(1);
                if self.peek() == Some('.') {
                    self.advance(1);
                    Token::DoubleDot
                } else {
                    Token::Dot
                }
            }
            '@' => {
                self.advance(1);
                Token::At
            }
            '*' => {
                self.advance(1);
                Token::Star
            }
            '(' => {
                self.advance(1);
                Token::LeftParen
            }
            ')' => {
                self.advance(1);
                Token::RightParen
            }
            '[' => {
                self.advance(1);
                Token::LeftBracket
            }
            ']' => {
                self.advance(1);
                Token::RightBracket
            }
            '0'..='9' => self.read_number()?,
            _ if is_name_start_char(c) => self.read_name()?,
            _ => return Err(format!("unexpected character '{}' at offset {}", c, self.pos)),
        };

        Ok(token)
    }

    fn read_number(&mut self) -> Result<Token, String> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }
        if self.peek() == Some('.') {
            return Err(format!("only integer positions are supported (offset {})", start));
        }

        let digits = self.input.get(start..self.pos).unwrap_or_default();
        digits
            .parse()
            .map(Token::Number)
            .map_err(|_| format!("position {} is out of range", digits))
    }

    fn read_name(&mut self) -> Result<Token, String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_name_char(c) {
                break;
            }
            self.advance(c.len_utf8());
        }
        let name = self.input.get(start..self.pos).unwrap_or_default();

        self.skip_whitespace();
        if self.remaining().starts_with("::") {
            return Err(format!("axis '{}::' is not supported", name));
        }
        if self.peek() == Some('(') {
            return match name {
                "node" | "text" => Ok(Token::NodeType(name.to_string())),
                _ => Err(format!("function '{}()' is not supported", name)),
            };
        }
        if self.peek() == Some(':') {
            return Err(format!("prefixed name '{}:' is not supported", name));
        }

        Ok(Token::Name(name.to_string()))
    }

    /// Tokenize entire input, excluding the trailing Eof
    pub fn tokenize(&mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => break,
                token => tokens.push(token),
            }
        }
        Ok(tokens)
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path() {
        let tokens = Lexer::new("/report/summary/all-summary/statistic-item").tokenize().unwrap();
        assert_eq!(tokens.len(), 8);
        assert_eq!(tokens[0], Token::Slash);
        assert_eq!(tokens[5], Token::Name("all-summary".to_string()));
        assert_eq!(tokens[7], Token::Name("statistic-item".to_string()));
    }

    #[test]
    fn test_attribute_and_predicate() {
        let mut lexer = Lexer::new("book[ 1 ]/@lang");
        assert_eq!(lexer.next_token(), Ok(Token::Name("book".to_string())));
        assert_eq!(lexer.next_token(), Ok(Token::LeftBracket));
        assert_eq!(lexer.next_token(), Ok(Token::Number(1)));
        assert_eq!(lexer.next_token(), Ok(Token::RightBracket));
        assert_eq!(lexer.next_token(), Ok(Token::Slash));
        assert_eq!(lexer.next_token(), Ok(Token::At));
        assert_eq!(lexer.next_token(), Ok(Token::Name("lang".to_string())));
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
    }

    #[test]
    fn test_node_types() {
        let tokens = Lexer::new("text()").tokenize().unwrap();
        assert_eq!(
            tokens,
            [Token::NodeType("text".to_string()), Token::LeftParen, Token::RightParen]
        );
    }

    #[test]
    fn test_dots() {
        let tokens = Lexer::new("./..").tokenize().unwrap();
        assert_eq!(tokens, [Token::Dot, Token::Slash, Token::DoubleDot]);
    }

    #[test]
    fn test_unsupported() {
        assert!(Lexer::new("child::a").tokenize().is_err());
        assert!(Lexer::new("count(a)").tokenize().is_err());
        assert!(Lexer::new("ns:a").tokenize().is_err());
        assert!(Lexer::new("a[@x='1']").tokenize().is_err());
        assert!(Lexer::new("a[1.5]").tokenize().is_err());
    }
}
