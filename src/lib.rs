pub mod ast;
pub mod error;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod query;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{ComparisonOp, FieldPath, FilterNode, FilterVisitor, FunctionName, Literal, LogicalOp, Token, TokenKind, UnaryOp};
pub use error::FilterError;
pub use lexer::{LexError, Lexer, Position, tokenize};
pub use output::{to_filter_string, to_json, to_json_pretty};
pub use parser::{Parser, SyntaxError, parse, parse_filter};
pub use query::{QueryError, QueryOptions, parse_query_string, parse_url};
