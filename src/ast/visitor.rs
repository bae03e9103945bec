//! Post-order traversal of a [`FilterNode`] tree.
//!
//! Query builders implement [`FilterVisitor`] to turn a parsed filter into
//! their native predicate type. Children are visited before their parent, so
//! `visit_logical` and `visit_unary` receive already-built outputs.

use crate::ast::{ComparisonOp, FieldPath, FilterNode, FunctionName, Literal, LogicalOp, UnaryOp};

pub trait FilterVisitor {
    type Output;

    fn visit_comparison(
        &mut self,
        field_path: &FieldPath,
        operator: ComparisonOp,
        value: &Literal,
    ) -> Self::Output;

    fn visit_function_call(
        &mut self,
        name: FunctionName,
        field_path: &FieldPath,
        argument: &Literal,
    ) -> Self::Output;

    fn visit_unary(&mut self, operator: UnaryOp, operand: Self::Output) -> Self::Output;

    fn visit_logical(
        &mut self,
        operator: LogicalOp,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;
}

/// Walk `node` with `visitor`, left child first.
pub fn walk<V: FilterVisitor + ?Sized>(visitor: &mut V, node: &FilterNode) -> V::Output {
    match node {
        FilterNode::Comparison {
            field_path,
            operator,
            value,
        } => visitor.visit_comparison(field_path, *operator, value),
        FilterNode::FunctionCall {
            name,
            field_path,
            argument,
        } => visitor.visit_function_call(*name, field_path, argument),
        FilterNode::Unary { operator, operand } => {
            let operand = walk(visitor, operand);
            visitor.visit_unary(*operator, operand)
        }
        FilterNode::Logical {
            operator,
            left,
            right,
        } => {
            let left = walk(visitor, left);
            let right = walk(visitor, right);
            visitor.visit_logical(*operator, left, right)
        }
    }
}

impl FilterNode {
    pub fn accept<V: FilterVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        walk(visitor, self)
    }

    /// Every field path referenced by the filter, in source order.
    pub fn field_paths(&self) -> Vec<FieldPath> {
        self.accept(&mut FieldCollector)
    }
}

struct FieldCollector;

impl FilterVisitor for FieldCollector {
    type Output = Vec<FieldPath>;

    fn visit_comparison(&mut self, field_path: &FieldPath, _: ComparisonOp, _: &Literal) -> Self::Output {
        vec![field_path.clone()]
    }

    fn visit_function_call(&mut self, _: FunctionName, field_path: &FieldPath, _: &Literal) -> Self::Output {
        vec![field_path.clone()]
    }

    fn visit_unary(&mut self, _: UnaryOp, operand: Self::Output) -> Self::Output {
        operand
    }

    fn visit_logical(&mut self, _: LogicalOp, mut left: Self::Output, right: Self::Output) -> Self::Output {
        left.extend(right);
        left
    }
}
