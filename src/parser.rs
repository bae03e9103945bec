use thiserror::Error;

use crate::{
    ast::{FieldPath, FilterNode, FunctionName, Literal, LogicalKeyword, LogicalOp, Token, TokenKind},
    error::FilterError,
    lexer::{self, Position},
};

/// Default cap on `not`/parenthesis nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default cap on the height of the built tree, flat `and`/`or` chains included.
pub const DEFAULT_MAX_HEIGHT: usize = 1024;

/// A parsed subtree and its height (a single predicate has height 1).
type Subtree = (FilterNode, usize);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("empty filter expression")]
    EmptyInput,

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    #[error("unmatched parenthesis at position {position}")]
    UnmatchedParen { position: Position },

    #[error("unsupported operator '{operator}' at position {position}")]
    UnsupportedOperator { operator: String, position: Position },

    #[error(
        "unsupported function '{name}' at position {position} (supported: contains, startswith, endswith)"
    )]
    UnsupportedFunction { name: String, position: Position },

    #[error("function '{function}' expects {expected} arguments, found {found} at position {position}")]
    FunctionArity {
        function: FunctionName,
        expected: usize,
        found: usize,
        position: Position,
    },

    #[error("invalid argument to '{function}' at position {position}: {message}")]
    InvalidArgument {
        function: FunctionName,
        message: String,
        position: Position,
    },

    #[error("invalid field path '{path}' at position {position}")]
    InvalidFieldPath { path: String, position: Position },

    #[error("unexpected {found} at position {position} after a complete expression")]
    TrailingTokens { found: String, position: Position },

    #[error("expression nested deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: Position },

    #[error("expression tree taller than {limit} levels at position {position}")]
    ExpressionTooDeep { limit: usize, position: Position },
}

impl SyntaxError {
    pub fn position(&self) -> Option<Position> {
        match self {
            SyntaxError::EmptyInput | SyntaxError::UnexpectedEnd { .. } => None,
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnmatchedParen { position }
            | SyntaxError::UnsupportedOperator { position, .. }
            | SyntaxError::UnsupportedFunction { position, .. }
            | SyntaxError::FunctionArity { position, .. }
            | SyntaxError::InvalidArgument { position, .. }
            | SyntaxError::InvalidFieldPath { position, .. }
            | SyntaxError::TrailingTokens { position, .. }
            | SyntaxError::NestingTooDeep { position, .. }
            | SyntaxError::ExpressionTooDeep { position, .. } => Some(*position),
        }
    }
}

/// Tokenize and parse a raw `$filter` value.
pub fn parse_filter(input: &str) -> Result<FilterNode, FilterError> {
    let tokens = lexer::tokenize(input)?;
    Ok(parse(&tokens)?)
}

/// Parse a token sequence produced by [`lexer::tokenize`].
pub fn parse(tokens: &[Token]) -> Result<FilterNode, SyntaxError> {
    Parser::new(tokens).parse()
}

/// Recursive-descent parser over a borrowed token slice.
///
/// A parser is built per call and consumed by [`Parser::parse`].
pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
    max_depth: usize,
    max_height: usize,
    open_groups: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_height: DEFAULT_MAX_HEIGHT,
            open_groups: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Cap the height of the resulting tree. Every consumer of a
    /// [`FilterNode`] recurses once per level, so this bounds their stack use.
    pub fn with_max_height(mut self, max_height: usize) -> Self {
        self.max_height = max_height;
        self
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + offset)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consume the current token if it is of `kind`.
    fn consume(&mut self, kind: TokenKind) -> Option<&'a Token> {
        let token = self.current().filter(|t| t.kind == kind)?;
        self.advance();
        Some(token)
    }

    fn unexpected(expected: impl Into<String>, found: Option<&Token>) -> SyntaxError {
        match found {
            Some(token) => SyntaxError::UnexpectedToken {
                expected: expected.into(),
                found: token.describe(),
                position: token.position,
            },
            None => SyntaxError::UnexpectedEnd {
                expected: expected.into(),
            },
        }
    }

    fn enter(&mut self, token: &Token) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                limit: self.max_depth,
                position: token.position,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Height of a node built by `operator` over children at most `height` tall.
    fn grow(&self, height: usize, operator: &Token) -> Result<usize, SyntaxError> {
        let height = height + 1;
        if height > self.max_height {
            return Err(SyntaxError::ExpressionTooDeep {
                limit: self.max_height,
                position: operator.position,
            });
        }
        Ok(height)
    }

    /// Parse a complete expression; every token must be consumed.
    pub fn parse(mut self) -> Result<FilterNode, SyntaxError> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::EmptyInput);
        }

        let (node, height) = self.parse_expression()?;

        match self.current() {
            None => {
                tracing::trace!(tokens = self.tokens.len(), height, "parsed filter");
                Ok(node)
            }
            Some(token) if token.kind == TokenKind::RParen => Err(SyntaxError::UnmatchedParen {
                position: token.position,
            }),
            Some(token) => Err(SyntaxError::TrailingTokens {
                found: token.describe(),
                position: token.position,
            }),
        }
    }

    fn parse_expression(&mut self) -> Result<Subtree, SyntaxError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Subtree, SyntaxError> {
        let (mut left, mut height) = self.parse_and()?;

        while let Some(operator) = self.consume(TokenKind::LogicalKeyword(LogicalKeyword::Or)) {
            let (right, right_height) = self.parse_and()?;
            height = self.grow(height.max(right_height), operator)?;
            left = FilterNode::logical(LogicalOp::Or, left, right);
        }
        Ok((left, height))
    }

    fn parse_and(&mut self) -> Result<Subtree, SyntaxError> {
        let (mut left, mut height) = self.parse_unary()?;

        while let Some(operator) = self.consume(TokenKind::LogicalKeyword(LogicalKeyword::And)) {
            let (right, right_height) = self.parse_unary()?;
            height = self.grow(height.max(right_height), operator)?;
            left = FilterNode::logical(LogicalOp::And, left, right);
        }
        Ok((left, height))
    }

    fn parse_unary(&mut self) -> Result<Subtree, SyntaxError> {
        match self.consume(TokenKind::LogicalKeyword(LogicalKeyword::Not)) {
            Some(token) => {
                self.enter(token)?;
                let (operand, height) = self.parse_unary()?;
                self.leave();
                Ok((FilterNode::not(operand), self.grow(height, token)?))
            }
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Subtree, SyntaxError> {
        const EXPECTED: &str = "a comparison, function call or '('";

        let Some(token) = self.current() else {
            return Err(Self::unexpected(EXPECTED, None));
        };

        match token.kind {
            TokenKind::LParen => {
                self.advance();
                self.enter(token)?;
                self.open_groups += 1;
                let expr = self.parse_expression()?;
                self.open_groups -= 1;
                self.leave();
                self.expect_closing(token)?;
                Ok(expr)
            }
            TokenKind::RParen if self.open_groups == 0 => Err(SyntaxError::UnmatchedParen {
                position: token.position,
            }),
            TokenKind::Function(name) => Ok((self.parse_function_call(name, token)?, 1)),
            TokenKind::Identifier => {
                if self.peek(1).is_some_and(|t| t.kind == TokenKind::LParen) {
                    return Err(SyntaxError::UnsupportedFunction {
                        name: token.text.clone(),
                        position: token.position,
                    });
                }
                Ok((self.parse_comparison(token)?, 1))
            }
            _ => Err(Self::unexpected(EXPECTED, Some(token))),
        }
    }

    /// Consume the `)` matching `open`.
    fn expect_closing(&mut self, open: &Token) -> Result<(), SyntaxError> {
        match self.current() {
            Some(token) if token.kind == TokenKind::RParen => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(Self::unexpected("')'", Some(token))),
            None => Err(SyntaxError::UnmatchedParen {
                position: open.position,
            }),
        }
    }

    fn parse_field_path(token: &Token) -> Result<FieldPath, SyntaxError> {
        FieldPath::parse(&token.text).ok_or_else(|| SyntaxError::InvalidFieldPath {
            path: token.text.clone(),
            position: token.position,
        })
    }

    fn parse_comparison(&mut self, field: &Token) -> Result<FilterNode, SyntaxError> {
        let field_path = Self::parse_field_path(field)?;
        self.advance();

        let operator = match self.current() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => *op,
            Some(token) if token.kind == TokenKind::Identifier => {
                return Err(SyntaxError::UnsupportedOperator {
                    operator: token.text.clone(),
                    position: token.position,
                });
            }
            other => {
                return Err(Self::unexpected(
                    format!("a comparison operator after '{}'", field.text),
                    other,
                ));
            }
        };
        self.advance();

        let value = self.parse_literal()?;
        Ok(FilterNode::comparison(field_path, operator, value))
    }

    fn parse_literal(&mut self) -> Result<Literal, SyntaxError> {
        let token = self.current();
        let literal = token.and_then(literal_of);

        match literal {
            Some(literal) => {
                self.advance();
                Ok(literal)
            }
            None => Err(Self::unexpected("a literal value", token)),
        }
    }

    fn parse_function_call(&mut self, name: FunctionName, func: &Token) -> Result<FilterNode, SyntaxError> {
        self.advance();

        let open = match self.current() {
            Some(token) if token.kind == TokenKind::LParen => token,
            other => return Err(Self::unexpected(format!("'(' after '{}'", name), other)),
        };
        self.advance();

        let mut arguments: Vec<&Token> = Vec::new();
        loop {
            let Some(token) = self.current() else {
                return Err(SyntaxError::UnmatchedParen {
                    position: open.position,
                });
            };

            match token.kind {
                TokenKind::RParen if arguments.is_empty() => {
                    self.advance();
                    break;
                }
                TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::NumberLiteral(_)
                | TokenKind::BooleanLiteral(_)
                | TokenKind::NullLiteral => {
                    self.advance();
                    arguments.push(token);
                }
                _ => {
                    return Err(Self::unexpected(
                        format!("an argument to '{}'", name),
                        Some(token),
                    ));
                }
            }

            match self.current() {
                Some(token) if token.kind == TokenKind::Comma => self.advance(),
                Some(token) if token.kind == TokenKind::RParen => {
                    self.advance();
                    break;
                }
                Some(token) => return Err(Self::unexpected("',' or ')'", Some(token))),
                None => {
                    return Err(SyntaxError::UnmatchedParen {
                        position: open.position,
                    });
                }
            }
        }

        let &[field, argument] = arguments.as_slice() else {
            return Err(SyntaxError::FunctionArity {
                function: name,
                expected: name.arity(),
                found: arguments.len(),
                position: func.position,
            });
        };

        if field.kind != TokenKind::Identifier {
            return Err(SyntaxError::InvalidArgument {
                function: name,
                message: format!("first argument must be a field path, found {}", field.describe()),
                position: field.position,
            });
        }
        let field_path = Self::parse_field_path(field)?;

        if argument.kind != TokenKind::StringLiteral {
            let found = match literal_of(argument) {
                Some(literal) => format!("a {} literal", literal.type_name()),
                None => argument.describe(),
            };
            return Err(SyntaxError::InvalidArgument {
                function: name,
                message: format!("second argument must be a string literal, found {}", found),
                position: argument.position,
            });
        }

        Ok(FilterNode::function_call(
            name,
            field_path,
            Literal::String(argument.text.clone()),
        ))
    }
}

fn literal_of(token: &Token) -> Option<Literal> {
    match token.kind {
        TokenKind::StringLiteral => Some(Literal::String(token.text.clone())),
        TokenKind::NumberLiteral(n) => Some(Literal::Number(n)),
        TokenKind::BooleanLiteral(b) => Some(Literal::Boolean(b)),
        TokenKind::NullLiteral => Some(Literal::Null),
        _ => None,
    }
}
