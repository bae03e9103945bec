use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOp, FunctionName};

/// A lexical token together with its raw text and source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// What the lexeme is, with keyword values already resolved
    pub kind: TokenKind,

    /// The lexeme as written. String literals hold their unescaped value.
    pub text: String,

    /// Character offset of the first character of the lexeme
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::StringLiteral => format!("string '{}'", self.text),
            TokenKind::NumberLiteral(_) => format!("number {}", self.text),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Literals
    /// Field name, possibly with `/`-separated navigation segments
    ///
    /// # Examples
    /// ```text
    /// Name
    /// Address/City
    /// _internal
    /// ```
    Identifier,

    /// Single-quoted string, `''` escapes a quote
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'O''Brien'
    /// ```
    StringLiteral,

    /// Decimal number with an optional sign and fraction
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.25
    /// ```
    NumberLiteral(Decimal),

    /// `true` or `false`, any case
    BooleanLiteral(bool),

    /// `null`, any case
    NullLiteral,

    // Keywords
    /// Comparison operator keyword (`eq`, `ne`, `gt`, `ge`, `lt`, `le`)
    Operator(ComparisonOp),

    /// `and`, `or` or `not`
    LogicalKeyword(LogicalKeyword),

    /// Built-in function name, only when directly followed by `(`
    ///
    /// # Examples
    /// ```text
    /// contains(Name, 'foo')
    /// startswith(Code, 'A')
    /// ```
    Function(FunctionName),

    // Punctuation
    LParen,
    RParen,
    Comma,
}

/// Logical keywords as they appear in the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalKeyword {
    And,
    Or,
    Not,
}

impl LogicalKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalKeyword::And => "and",
            LogicalKeyword::Or => "or",
            LogicalKeyword::Not => "not",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::StringLiteral => write!(f, "string"),
            TokenKind::NumberLiteral(_) => write!(f, "number"),
            TokenKind::BooleanLiteral(_) => write!(f, "boolean"),
            TokenKind::NullLiteral => write!(f, "null"),
            TokenKind::Operator(op) => write!(f, "operator '{}'", op),
            TokenKind::LogicalKeyword(kw) => write!(f, "keyword '{}'", kw.as_str()),
            TokenKind::Function(name) => write!(f, "function '{}'", name),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
        }
    }
}
