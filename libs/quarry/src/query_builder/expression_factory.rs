// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    executor::{QueryExecutor, QueryId},
    node::{BinaryOperator, Expression, SelectQueryNode, UnaryOperator, Value},
    parser::{RawBuilder, parse_from_item, parse_reference, raw},
};

use super::SelectQueryBuilder;

/// Expression helpers handed to callbacks such as `values_with` and `set_with`, and available
/// from `QueryCreator::expression_factory`.
#[derive(Debug, Clone)]
pub struct ExpressionFactory {
    executor: QueryExecutor,
}

impl ExpressionFactory {
    /// Subqueries started from this factory run no plugins of their own; the enclosing query's
    /// plugins transform them as part of the whole tree.
    pub(crate) fn new(executor: QueryExecutor) -> Self {
        Self {
            executor: executor.without_plugins(),
        }
    }

    /// A column reference: `"age"`, `"person.age"`, `"person.*"`
    pub fn ref_(&self, reference: &str) -> Expression {
        parse_reference(reference)
    }

    /// A bound parameter
    pub fn val(&self, value: impl Into<Value>) -> Expression {
        Expression::Value(value.into())
    }

    pub fn raw(&self, sql: impl Into<String>) -> RawBuilder {
        raw(sql)
    }

    /// A function call: `fn_("lower", vec![eb.ref_("name")])`
    pub fn fn_(&self, name: &str, arguments: Vec<Expression>) -> Expression {
        Expression::function(name, arguments)
    }

    pub fn bin(
        &self,
        lhs: impl Into<Expression>,
        operator: BinaryOperator,
        rhs: impl Into<Expression>,
    ) -> Expression {
        Expression::binary(lhs.into(), operator, rhs.into())
    }

    /// `<reference> <operator> <value>`
    pub fn cmp(
        &self,
        reference: &str,
        operator: BinaryOperator,
        value: impl Into<Expression>,
    ) -> Expression {
        self.bin(parse_reference(reference), operator, value)
    }

    /// All of `predicates`. An empty list is `true`.
    pub fn and(&self, predicates: Vec<Expression>) -> Expression {
        predicates
            .into_iter()
            .reduce(Expression::and)
            .unwrap_or_else(|| Expression::value(true))
    }

    /// Any of `predicates`. An empty list is `false`.
    pub fn or(&self, predicates: Vec<Expression>) -> Expression {
        predicates
            .into_iter()
            .reduce(Expression::or)
            .unwrap_or_else(|| Expression::value(false))
    }

    pub fn not(&self, expression: impl Into<Expression>) -> Expression {
        Expression::unary(UnaryOperator::Not, expression.into())
    }

    pub fn exists(&self, query: impl Into<Expression>) -> Expression {
        Expression::unary(UnaryOperator::Exists, query.into())
    }

    /// Start a subquery
    pub fn select_from(&self, from: &str) -> SelectQueryBuilder {
        SelectQueryBuilder::new(
            QueryId::new(),
            SelectQueryNode::new(vec![parse_from_item(from)]),
            self.executor.clone(),
        )
    }
}
