use thiserror::Error;

use crate::{lexer::LexError, lexer::Position, parser::SyntaxError};

/// Failure of [`crate::parse_filter`]: either stage can reject the input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl FilterError {
    pub fn position(&self) -> Option<Position> {
        match self {
            FilterError::Lex(e) => Some(e.position()),
            FilterError::Syntax(e) => e.position(),
        }
    }
}
