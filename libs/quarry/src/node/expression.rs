// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use super::{
    select::SelectQueryNode,
    table::{ColumnNode, TableNode},
    value::Value,
};

/// Any value-producing construct: `"person"."first_name"`, `$1`, `lower("name")`, `(SELECT ...)`,
/// a raw fragment, and so on.
///
/// Composite variants hold their payload behind an `Arc` so that cloning an expression (which
/// happens every time a builder derives a new query) shares the subtree instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A (possibly table-qualified) column reference
    Reference(ReferenceNode),
    /// A literal value. Always rendered as a placeholder.
    Value(Value),
    /// A raw SQL fragment with embedded parameters
    Raw(Arc<RawNode>),
    Binary(Arc<BinaryOperationNode>),
    Unary(Arc<UnaryOperationNode>),
    Function(Arc<FunctionNode>),
    Alias(Arc<AliasNode>),
    /// A parenthesized list such as `($1, $2, $3)` (the right side of `IN`)
    List(Arc<[Expression]>),
    /// A sub-select, rendered in parentheses
    SelectQuery(Arc<SelectQueryNode>),
    /// `*` or `"table".*`
    Star(Option<TableNode>),
    /// The dialect's marker for "use the column default" inside a `VALUES` row
    DefaultInsertValue,
}

impl Expression {
    pub fn reference(table: Option<TableNode>, column: impl Into<String>) -> Self {
        Expression::Reference(ReferenceNode {
            table,
            column: ColumnNode::new(column),
        })
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Expression::Value(value.into())
    }

    pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(Arc::new(BinaryOperationNode {
            left,
            operator,
            right,
        }))
    }

    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary(Arc::new(UnaryOperationNode { operator, operand }))
    }

    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::Function(Arc::new(FunctionNode {
            name: name.into(),
            arguments: arguments.into(),
        }))
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        Expression::Alias(Arc::new(AliasNode {
            expression: self,
            alias: alias.into(),
        }))
    }

    pub fn list(items: Vec<Expression>) -> Self {
        Expression::List(items.into())
    }

    /// Combine with another expression using `AND`. Used to accumulate repeated `where` calls.
    pub fn and(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::And, other)
    }

    pub fn or(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Or, other)
    }
}

/// `"column"` or `"table"."column"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceNode {
    pub table: Option<TableNode>,
    pub column: ColumnNode,
}

/// A raw SQL fragment: `sql_fragments[0] param[0] sql_fragments[1] param[1] ... sql_fragments[n]`.
///
/// There is always exactly one more fragment than there are parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub sql_fragments: Vec<String>,
    pub parameters: Vec<Expression>,
}

impl RawNode {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql_fragments: vec![sql.into()],
            parameters: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperationNode {
    pub left: Expression,
    pub operator: BinaryOperator,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperationNode {
    pub operator: UnaryOperator,
    pub operand: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: String,
    pub arguments: Arc<[Expression]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasNode {
    pub expression: Expression,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    ILike,
    In,
    NotIn,
    Is,
    IsNot,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Concat,
}

impl BinaryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Lte => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Gte => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::ILike => "ILIKE",
            BinaryOperator::In => "IN",
            BinaryOperator::NotIn => "NOT IN",
            BinaryOperator::Is => "IS",
            BinaryOperator::IsNot => "IS NOT",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Concat => "||",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Exists,
    NotExists,
    Negate,
}

impl UnaryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT ",
            UnaryOperator::Exists => "EXISTS ",
            UnaryOperator::NotExists => "NOT EXISTS ",
            UnaryOperator::Negate => "-",
        }
    }
}
