use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    /// Equal (`eq`)
    Eq,
    /// Not equal (`ne`)
    Ne,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`ge`)
    Ge,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`le`)
    Le,
}

impl ComparisonOp {
    /// Lookup by lowercase keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "eq" => Some(ComparisonOp::Eq),
            "ne" => Some(ComparisonOp::Ne),
            "gt" => Some(ComparisonOp::Gt),
            "ge" => Some(ComparisonOp::Ge),
            "lt" => Some(ComparisonOp::Lt),
            "le" => Some(ComparisonOp::Le),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
        }
    }
}

/// Binary logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Unary operators. `not` is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaryOp {
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
        }
    }
}

/// Supported string functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionName {
    /// `contains(field, 'text')`
    Contains,
    /// `startswith(field, 'text')`
    StartsWith,
    /// `endswith(field, 'text')`
    EndsWith,
}

impl FunctionName {
    /// Lookup by lowercase keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "contains" => Some(FunctionName::Contains),
            "startswith" => Some(FunctionName::StartsWith),
            "endswith" => Some(FunctionName::EndsWith),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FunctionName::Contains => "contains",
            FunctionName::StartsWith => "startswith",
            FunctionName::EndsWith => "endswith",
        }
    }

    /// Number of arguments the function takes: a field path and a string.
    pub fn arity(self) -> usize {
        2
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
