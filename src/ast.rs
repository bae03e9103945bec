//! # OData Filter - Abstract Syntax Tree
//!
//! This module defines the tokens and the tree produced when parsing an
//! OData V4 `$filter` expression.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Comparison, logical and unary operators, function names
//! - **[nodes]** - The [`FilterNode`] tree, field paths and literals
//! - **[visitor]** - Post-order traversal for query builders
//!
//! ## Quick Start
//!
//! ```text
//! Price gt 100 and (Category eq 'Books' or contains(Name, 'rust'))
//! ```
//!
//! parses to
//!
//! ```text
//! Logical(and,
//!     Comparison([Price], gt, Number(100)),
//!     Logical(or,
//!         Comparison([Category], eq, String("Books")),
//!         FunctionCall(contains, [Name], String("rust"))))
//! ```
//!
//! ## Precedence
//!
//! From loosest to tightest: `or`, `and`, `not`. Both binary operators are
//! left-associative, so `a eq 1 and b eq 2 and c eq 3` leans left.
//!
//! ## Field Paths
//!
//! Navigation into related structures uses `/`: `Address/City` becomes the
//! two-segment path `["Address", "City"]`. The left side of a comparison is
//! always a field path and the right side is always a literal.
pub mod nodes;
pub mod operators;
pub mod tokens;
pub mod visitor;

pub use nodes::{FieldPath, FilterNode, Literal};
pub use operators::{ComparisonOp, FunctionName, LogicalOp, UnaryOp};
pub use tokens::{LogicalKeyword, Token, TokenKind};
pub use visitor::FilterVisitor;
