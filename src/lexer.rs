use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::{ComparisonOp, FunctionName, LogicalKeyword, Token, TokenKind};

/// Character offset into the filter source.
pub type Position = usize;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString { position: Position },

    #[error("invalid numeric literal '{text}' at position {position}")]
    InvalidNumber { text: String, position: Position },

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::InvalidNumber { position, .. }
            | LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

/// Tokenize a complete filter string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Consume the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        tracing::trace!(count = tokens.len(), "tokenized filter");
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// First non-whitespace character at or after the cursor.
    fn next_significant_char(&self) -> Option<char> {
        self.input[self.position..]
            .iter()
            .find(|c| !c.is_whitespace())
            .copied()
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch != '\'' {
                result.push(ch);
            } else if self.current_char() == Some('\'') {
                result.push('\'');
                self.advance();
            } else {
                return Ok(result);
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_digits(&mut self, into: &mut String) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut text = String::new();
        let mut malformed = false;

        if self.current_char() == Some('-') {
            text.push('-');
            self.advance();
        }

        self.read_digits(&mut text);

        if self.current_char() == Some('.') {
            text.push('.');
            self.advance();
            if self.read_digits(&mut text) == 0 {
                malformed = true;
            }
        }

        // Anything glued to the literal (`1.2.3`, `12abc`) belongs to the bad lexeme
        while let Some(ch) = self.current_char() {
            if is_word_char(ch) || ch == '.' {
                text.push(ch);
                self.advance();
                malformed = true;
            } else {
                break;
            }
        }

        let value = if malformed {
            None
        } else {
            Decimal::from_str_exact(&text).ok()
        };

        match value {
            Some(value) => Ok(Token::new(TokenKind::NumberLiteral(value), text, start)),
            None => Err(LexError::InvalidNumber {
                text,
                position: start,
            }),
        }
    }

    fn read_keyword_or_identifier(&mut self) -> Token {
        let start = self.position;
        let word = self.read_word();

        if word.contains('/') {
            return Token::new(TokenKind::Identifier, word, start);
        }

        let kind = match word.to_ascii_lowercase().as_str() {
            "true" => TokenKind::BooleanLiteral(true),
            "false" => TokenKind::BooleanLiteral(false),
            "null" => TokenKind::NullLiteral,
            "and" => TokenKind::LogicalKeyword(LogicalKeyword::And),
            "or" => TokenKind::LogicalKeyword(LogicalKeyword::Or),
            "not" => TokenKind::LogicalKeyword(LogicalKeyword::Not),
            lower => {
                if let Some(op) = ComparisonOp::from_keyword(lower) {
                    TokenKind::Operator(op)
                } else if let Some(name) = FunctionName::from_keyword(lower)
                    && self.next_significant_char() == Some('(')
                {
                    TokenKind::Function(name)
                } else {
                    TokenKind::Identifier
                }
            }
        };

        Token::new(kind, word, start)
    }

    fn punctuation(&mut self, kind: TokenKind, ch: char) -> Token {
        let token = Token::new(kind, ch.to_string(), self.position);
        self.advance();
        token
    }

    /// Next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => self.punctuation(TokenKind::LParen, ch),
            ')' => self.punctuation(TokenKind::RParen, ch),
            ',' => self.punctuation(TokenKind::Comma, ch),
            '\'' => {
                let start = self.position;
                let value = self.read_string()?;
                Token::new(TokenKind::StringLiteral, value, start)
            }
            c if c.is_ascii_digit() => self.read_number()?,
            '-' if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number()?,
            c if c.is_alphabetic() || c == '_' => self.read_keyword_or_identifier(),
            c => {
                return Err(LexError::UnexpectedCharacter {
                    ch: c,
                    position: self.position,
                });
            }
        };

        Ok(Some(token))
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '/'
}

#[test]
fn test_keywords() {
    let kinds: Vec<TokenKind> = tokenize("and OR Not true FALSE null")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::LogicalKeyword(LogicalKeyword::And),
            TokenKind::LogicalKeyword(LogicalKeyword::Or),
            TokenKind::LogicalKeyword(LogicalKeyword::Not),
            TokenKind::BooleanLiteral(true),
            TokenKind::BooleanLiteral(false),
            TokenKind::NullLiteral,
        ]
    );
}

#[test]
fn test_comparison() {
    let mut lexer = Lexer::new("Price gt 5");
    assert_eq!(
        lexer.next_token().unwrap(),
        Some(Token::new(TokenKind::Identifier, "Price", 0))
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Some(Token::new(TokenKind::Operator(ComparisonOp::Gt), "gt", 6))
    );
    assert_eq!(
        lexer.next_token().unwrap(),
        Some(Token::new(TokenKind::NumberLiteral(Decimal::from(5)), "5", 9))
    );
    assert_eq!(lexer.next_token().unwrap(), None);
}
