use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::{ComparisonOp, FunctionName, LogicalOp, UnaryOp};

/// Parsed `$filter` expression.
///
/// The tree is closed: every consumer matches on these four variants.
/// Parenthesised groups only steer parsing and leave no node behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    /// `field_path operator value`
    ///
    /// # Example
    /// ```text
    /// Address/City eq 'Berlin'
    /// ```
    Comparison {
        field_path: FieldPath,
        operator: ComparisonOp,
        value: Literal,
    },

    /// `left and right`, `left or right`
    Logical {
        operator: LogicalOp,
        left: Box<FilterNode>,
        right: Box<FilterNode>,
    },

    /// `not operand`
    Unary {
        operator: UnaryOp,
        operand: Box<FilterNode>,
    },

    /// `name(field_path, argument)`
    ///
    /// # Example
    /// ```text
    /// startswith(Name, 'Jo')
    /// ```
    FunctionCall {
        name: FunctionName,
        field_path: FieldPath,
        argument: Literal,
    },
}

impl FilterNode {
    pub fn comparison(field_path: FieldPath, operator: ComparisonOp, value: impl Into<Literal>) -> Self {
        FilterNode::Comparison {
            field_path,
            operator,
            value: value.into(),
        }
    }

    pub fn logical(operator: LogicalOp, left: FilterNode, right: FilterNode) -> Self {
        FilterNode::Logical {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: FilterNode, right: FilterNode) -> Self {
        Self::logical(LogicalOp::And, left, right)
    }

    pub fn or(left: FilterNode, right: FilterNode) -> Self {
        Self::logical(LogicalOp::Or, left, right)
    }

    pub fn not(operand: FilterNode) -> Self {
        FilterNode::Unary {
            operator: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn function_call(name: FunctionName, field_path: FieldPath, argument: impl Into<Literal>) -> Self {
        FilterNode::FunctionCall {
            name,
            field_path,
            argument: argument.into(),
        }
    }
}

/// Property path such as `Address/City`, stored as its segments.
///
/// Paths built by the parser or deserialized always have at least one
/// segment and no empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath(segments.into_iter().map(Into::into).collect())
    }

    /// Split a `/`-separated path. Returns `None` if any segment is empty.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<String> = path.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(FieldPath(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether the path navigates into a related structure (`a/b`).
    pub fn is_navigation(&self) -> bool {
        self.0.len() > 1
    }
}

impl TryFrom<Vec<String>> for FieldPath {
    type Error = String;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        if segments.is_empty() {
            return Err("field path has no segments".to_string());
        }
        if segments.iter().any(String::is_empty) {
            return Err(format!("field path '{}' has an empty segment", segments.join("/")));
        }
        Ok(FieldPath(segments))
    }
}

impl From<FieldPath> for Vec<String> {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Literal operand of a comparison or function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    String(String),
    Number(Decimal),
    Boolean(bool),
    Null,
}

impl Literal {
    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Number(_) => "number",
            Literal::Boolean(_) => "boolean",
            Literal::Null => "null",
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<Decimal> for Literal {
    fn from(n: Decimal) -> Self {
        Literal::Number(n)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(Decimal::from(n))
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

/// Single-quoted form with embedded quotes doubled, so the output lexes back
/// to the same value.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("null"),
        }
    }
}
