//! Text and JSON output for parsed filters.
//!
//! - **Canonical text** via [`to_filter_string()`] (also the `Display` impl):
//!   lowercase keywords, `''`-escaped strings, and only the parentheses the tree
//!   structure needs. Parsing the output again yields an identical tree.
//! - **JSON** via [`to_json()`] and [`to_json_pretty()`], using the serde
//!   representation of the AST.
//!
//! # Examples
//!
//! ```
//! use odata_filter::{parse_filter, output::to_filter_string};
//!
//! let node = parse_filter("(A EQ 1 OR B eq 2) and not C eq 'x'").unwrap();
//! assert_eq!(to_filter_string(&node), "(A eq 1 or B eq 2) and not C eq 'x'");
//! ```

use std::fmt;

use crate::ast::{FilterNode, LogicalOp};

/// Binding strength, loosest first.
fn precedence(node: &FilterNode) -> u8 {
    match node {
        FilterNode::Logical {
            operator: LogicalOp::Or,
            ..
        } => 1,
        FilterNode::Logical {
            operator: LogicalOp::And,
            ..
        } => 2,
        FilterNode::Unary { .. } | FilterNode::Comparison { .. } | FilterNode::FunctionCall { .. } => 3,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &FilterNode, parenthesize: bool) -> fmt::Result {
    if parenthesize {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterNode::Comparison {
                field_path,
                operator,
                value,
            } => write!(f, "{} {} {}", field_path, operator, value),
            FilterNode::FunctionCall {
                name,
                field_path,
                argument,
            } => write!(f, "{}({}, {})", name, field_path, argument),
            FilterNode::Unary { operator, operand } => {
                write!(f, "{} ", operator)?;
                write_operand(f, operand, precedence(operand) < 3)
            }
            FilterNode::Logical {
                operator,
                left,
                right,
            } => {
                // Left-associative: an equal-precedence right operand was grouped explicitly
                let own = precedence(self);
                write_operand(f, left, precedence(left) < own)?;
                write!(f, " {} ", operator)?;
                write_operand(f, right, precedence(right) <= own)
            }
        }
    }
}

pub fn to_filter_string(node: &FilterNode) -> String {
    node.to_string()
}

pub fn to_json(node: &FilterNode) -> Result<String, serde_json::Error> {
    serde_json::to_string(node)
}

pub fn to_json_pretty(node: &FilterNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}
